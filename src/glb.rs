use crate::{GltfError, Result};

pub const MAGIC: u32 = 0x4654_6C67;
pub const VERSION: u32 = 2;
pub const CHUNK_JSON: u32 = 0x4E4F_534A;
pub const CHUNK_BIN: u32 = 0x004E_4942;

pub const HEADER_LEN: usize = 12;
pub const CHUNK_HEADER_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub magic: u32,
    pub version: u32,
    pub length: u32,
}

/// A parsed container. Both payloads borrow from the input slice.
///
/// Layout, all fields little-endian `u32`:
///
/// ```text
/// header  magic "glTF" | version 2 | total length
/// chunk 0 length | "JSON"   | length bytes of UTF-8 JSON
/// chunk 1 length | "BIN\0"  | length bytes of buffer 0
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Glb<'a> {
    pub header: Header,
    pub json: &'a [u8],
    pub bin: &'a [u8],
}

impl<'a> Glb<'a> {
    /// Frames `json` and `bin` with a header covering both 4-byte aligned chunks.
    pub fn new(json: &'a [u8], bin: &'a [u8]) -> Self {
        let length = HEADER_LEN
            + CHUNK_HEADER_LEN
            + padded_len(json.len())
            + CHUNK_HEADER_LEN
            + padded_len(bin.len());
        Glb {
            header: Header {
                magic: MAGIC,
                version: VERSION,
                length: length as u32,
            },
            json,
            bin,
        }
    }

    /// Serializes the container. JSON is padded with spaces, the binary
    /// chunk with zeros; the written length always matches the padded chunks.
    pub fn to_vec(&self) -> Vec<u8> {
        let header = Glb::new(self.json, self.bin).header;
        let mut out = Vec::with_capacity(header.length as usize);
        out.extend_from_slice(&header.magic.to_le_bytes());
        out.extend_from_slice(&header.version.to_le_bytes());
        out.extend_from_slice(&header.length.to_le_bytes());
        write_chunk(&mut out, CHUNK_JSON, self.json, b' ');
        write_chunk(&mut out, CHUNK_BIN, self.bin, 0);
        out
    }

    pub fn from_slice(data: &'a [u8]) -> Result<Self> {
        let (offset, header) = parse_header(data)?;
        let (offset, json) = parse_chunk(data, offset, CHUNK_JSON)?;
        let (offset, bin) = parse_chunk(data, offset, CHUNK_BIN)?;

        if offset != header.length as usize {
            return Err(format_error(
                offset,
                format!(
                    "chunks end at byte {offset} but the header declares {} bytes",
                    header.length
                ),
            ));
        }
        if data.len() != offset {
            return Err(format_error(
                offset,
                format!("{} trailing bytes after the container", data.len() - offset),
            ));
        }

        tracing::debug!(
            json_len = json.len(),
            bin_len = bin.len(),
            "parsed GLB container"
        );
        Ok(Glb { header, json, bin })
    }

    /// Parses the JSON chunk into a generic value tree.
    pub fn json_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_slice(self.json)?)
    }
}

fn format_error(offset: usize, message: impl Into<String>) -> GltfError {
    GltfError::Format {
        offset,
        message: message.into(),
    }
}

fn padded_len(len: usize) -> usize {
    len.next_multiple_of(4)
}

fn write_chunk(out: &mut Vec<u8>, kind: u32, payload: &[u8], pad: u8) {
    let length = padded_len(payload.len());
    out.extend_from_slice(&(length as u32).to_le_bytes());
    out.extend_from_slice(&kind.to_le_bytes());
    out.extend_from_slice(payload);
    out.extend(std::iter::repeat_n(pad, length - payload.len()));
}

fn read_u32(data: &[u8], offset: usize) -> Result<u32> {
    let bytes = offset
        .checked_add(4)
        .and_then(|end| data.get(offset..end))
        .ok_or_else(|| format_error(offset, "unexpected end of data"))?;
    Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

fn parse_header(data: &[u8]) -> Result<(usize, Header)> {
    let header = Header {
        magic: read_u32(data, 0)?,
        version: read_u32(data, 4)?,
        length: read_u32(data, 8)?,
    };
    if header.magic != MAGIC {
        return Err(format_error(
            0,
            format!("bad magic {:#010x}, expected {MAGIC:#010x}", header.magic),
        ));
    }
    if header.version != VERSION {
        return Err(format_error(
            4,
            format!("unsupported version {}, expected {VERSION}", header.version),
        ));
    }
    Ok((HEADER_LEN, header))
}

fn parse_chunk(data: &[u8], offset: usize, expected: u32) -> Result<(usize, &[u8])> {
    let length = read_u32(data, offset)? as usize;
    let kind = read_u32(data, offset + 4)?;
    if kind != expected {
        return Err(format_error(
            offset + 4,
            format!("chunk type {kind:#010x}, expected {expected:#010x}"),
        ));
    }

    let start = offset + CHUNK_HEADER_LEN;
    let payload = start
        .checked_add(length)
        .and_then(|end| data.get(start..end))
        .ok_or_else(|| {
            format_error(
                start,
                format!(
                    "chunk declares {length} bytes but only {} remain",
                    data.len().saturating_sub(start)
                ),
            )
        })?;
    Ok((start + length, payload))
}
