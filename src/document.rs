use std::borrow::Cow;
use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::accessor::{self, Elements};
use crate::glb::Glb;
use crate::mesh;
use crate::options::LoadOptions;
use crate::scene::{self, SceneGraph};
use crate::schema::{Accessor, BufferView, Mesh, Node, Root, Skin};
use crate::{GltfError, Result};

/// Data URI prefixes accepted for buffers of a `.gltf` file.
pub const DATA_URI_PREFIXES: [&str; 2] = [
    "data:application/octet-stream;base64,",
    "data:application/gltf-buffer;base64,",
];

/// Largest amount of zero padding tolerated after buffer 0 in a GLB binary chunk.
const MAX_BIN_PADDING: usize = 3;

/// Which container flavour a blob is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Glb,
    Gltf,
}

impl Kind {
    pub fn from_path(path: &Path) -> Result<Kind> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("glb") => Ok(Kind::Glb),
            Some("gltf") => Ok(Kind::Gltf),
            _ => Err(GltfError::Unsupported(format!(
                "cannot tell the glTF flavour of {}",
                path.display()
            ))),
        }
    }
}

/// A decoded asset: the scene description plus its raw buffers.
///
/// Buffers of a GLB borrow the caller's bytes; buffers decoded from base64 are
/// owned. A `Document` is never mutated after loading.
#[derive(Debug, Clone)]
pub struct Document<'a> {
    json: serde_json::Value,
    root: Root,
    buffers: Vec<Cow<'a, [u8]>>,
    options: LoadOptions,
}

impl<'a> Document<'a> {
    pub fn from_slice(data: &'a [u8], kind: Kind, options: &LoadOptions) -> Result<Self> {
        match kind {
            Kind::Glb => Document::from_glb(data, options),
            Kind::Gltf => Document::from_gltf(data, options),
        }
    }

    /// Loads a binary container. Buffer 0 borrows the binary chunk.
    pub fn from_glb(data: &'a [u8], options: &LoadOptions) -> Result<Self> {
        let glb = Glb::from_slice(data)?;
        let json = glb.json_value()?;
        let root: Root = serde_json::from_value(json.clone())?;

        let bin = match root.buffers.as_slice() {
            [] => {
                if !glb.bin.is_empty() {
                    tracing::debug!(len = glb.bin.len(), "no buffer declared, ignoring binary chunk");
                }
                return Document::new(json, root, Vec::new(), options);
            }
            [buffer] => {
                if buffer.uri.is_some() {
                    return Err(GltfError::UnsupportedBufferSource {
                        buffer: 0,
                        uri: buffer.uri.clone(),
                    });
                }
                let padding = glb.bin.len().checked_sub(buffer.byte_length);
                match padding {
                    Some(0) => glb.bin,
                    Some(n) if n <= MAX_BIN_PADDING => {
                        tracing::debug!(padding = n, "trimming GLB binary chunk padding");
                        &glb.bin[..buffer.byte_length]
                    }
                    _ => {
                        return Err(GltfError::SizeMismatch {
                            buffer: 0,
                            declared: buffer.byte_length,
                            actual: glb.bin.len(),
                        });
                    }
                }
            }
            buffers => {
                return Err(GltfError::Unsupported(format!(
                    "GLB with {} buffers",
                    buffers.len()
                )));
            }
        };

        Document::new(json, root, vec![Cow::Borrowed(bin)], options)
    }

    pub fn json(&self) -> &serde_json::Value {
        &self.json
    }

    pub fn root(&self) -> &Root {
        &self.root
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    pub fn buffers(&self) -> impl ExactSizeIterator<Item = &[u8]> + '_ {
        self.buffers.iter().map(|b| &**b)
    }

    pub fn buffer(&self, index: usize) -> Result<&[u8]> {
        lookup(&self.buffers, "buffer", index).map(|b| &**b)
    }

    pub fn buffer_view(&self, index: usize) -> Result<&BufferView> {
        lookup(&self.root.buffer_views, "bufferView", index)
    }

    pub fn accessor(&self, index: usize) -> Result<&Accessor> {
        lookup(&self.root.accessors, "accessor", index)
    }

    pub fn node(&self, index: usize) -> Result<&Node> {
        lookup(&self.root.nodes, "node", index)
    }

    pub fn mesh(&self, index: usize) -> Result<&Mesh> {
        lookup(&self.root.meshes, "mesh", index)
    }

    pub fn skin(&self, index: usize) -> Result<&Skin> {
        lookup(&self.root.skins, "skin", index)
    }

    /// Decodes accessor `index`, see [`accessor::decode`].
    pub fn decode(&self, index: usize) -> Result<Elements<'_>> {
        accessor::decode(self, self.accessor(index)?)
    }

    pub fn scene_graph(&self) -> Result<SceneGraph> {
        scene::build(self)
    }

    /// Detaches the document from the bytes it was parsed from.
    pub fn into_owned(self) -> Document<'static> {
        Document {
            json: self.json,
            root: self.root,
            buffers: self
                .buffers
                .into_iter()
                .map(|b| Cow::Owned(b.into_owned()))
                .collect(),
            options: self.options,
        }
    }

    fn new(
        json: serde_json::Value,
        root: Root,
        buffers: Vec<Cow<'a, [u8]>>,
        options: &LoadOptions,
    ) -> Result<Self> {
        check_references(&root, &buffers)?;
        if options.validate_meshes {
            for (ix, m) in root.meshes.iter().enumerate() {
                mesh::validate_indexed(ix, m)?;
            }
        }

        tracing::debug!(
            nodes = root.nodes.len(),
            meshes = root.meshes.len(),
            accessors = root.accessors.len(),
            buffers = buffers.len(),
            "loaded glTF document"
        );
        Ok(Document {
            json,
            root,
            buffers,
            options: options.clone(),
        })
    }
}

impl Document<'static> {
    /// Loads a `.gltf` file whose buffers are all embedded as base64 data URIs.
    pub fn from_gltf(data: &[u8], options: &LoadOptions) -> Result<Self> {
        let json: serde_json::Value = serde_json::from_slice(data)?;
        let root: Root = serde_json::from_value(json.clone())?;

        let buffers = root
            .buffers
            .iter()
            .enumerate()
            .map(|(ix, buffer)| {
                let payload = buffer
                    .uri
                    .as_deref()
                    .and_then(strip_data_uri)
                    .ok_or_else(|| GltfError::UnsupportedBufferSource {
                        buffer: ix,
                        uri: buffer.uri.clone(),
                    })?;
                let bytes = STANDARD.decode(payload)?;
                if bytes.len() != buffer.byte_length {
                    return Err(GltfError::SizeMismatch {
                        buffer: ix,
                        declared: buffer.byte_length,
                        actual: bytes.len(),
                    });
                }
                Ok(Cow::Owned(bytes))
            })
            .collect::<Result<Vec<_>>>()?;

        Document::new(json, root, buffers, options)
    }

    /// Reads `path` and loads it according to its extension.
    pub fn open(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Self> {
        let path = path.as_ref();
        let kind = Kind::from_path(path)?;
        let data = std::fs::read(path)?;
        tracing::debug!(path = %path.display(), ?kind, len = data.len(), "read glTF file");
        Ok(Document::from_slice(&data, kind, options)?.into_owned())
    }
}

fn strip_data_uri(uri: &str) -> Option<&str> {
    DATA_URI_PREFIXES
        .iter()
        .find_map(|prefix| uri.strip_prefix(prefix))
}

fn lookup<'s, T>(items: &'s [T], kind: &'static str, index: usize) -> Result<&'s T> {
    items.get(index).ok_or(GltfError::InvalidReference {
        kind,
        index,
        len: items.len(),
    })
}

fn check_index(kind: &'static str, index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(GltfError::InvalidReference { kind, index, len })
    }
}

/// Verifies every cross-reference between top-level arrays once, so later
/// lookups only fail on documents assembled by hand.
fn check_references(root: &Root, buffers: &[Cow<'_, [u8]>]) -> Result<()> {
    let accessors = root.accessors.len();
    let nodes = root.nodes.len();

    for (ix, view) in root.buffer_views.iter().enumerate() {
        check_index("buffer", view.buffer, buffers.len())?;
        let len = buffers[view.buffer].len();
        let end = view.byte_offset.checked_add(view.byte_length);
        if end.is_none_or(|end| end > len) {
            return Err(GltfError::OutOfBounds {
                region: format!("bufferView {ix}"),
                start: view.byte_offset,
                end: end.unwrap_or(usize::MAX),
                limit_start: 0,
                limit_end: len,
            });
        }
    }

    for accessor in &root.accessors {
        if let Some(view) = accessor.buffer_view {
            check_index("bufferView", view, root.buffer_views.len())?;
        }
    }

    for node in &root.nodes {
        for &child in &node.children {
            check_index("node", child, nodes)?;
        }
        if let Some(m) = node.mesh {
            check_index("mesh", m, root.meshes.len())?;
        }
        if let Some(s) = node.skin {
            check_index("skin", s, root.skins.len())?;
        }
    }

    for scene in &root.scenes {
        for &node in &scene.nodes {
            check_index("node", node, nodes)?;
        }
    }
    if let Some(scene) = root.scene {
        check_index("scene", scene, root.scenes.len())?;
    }

    for m in &root.meshes {
        for primitive in &m.primitives {
            for &a in primitive.attributes.values() {
                check_index("accessor", a, accessors)?;
            }
            if let Some(a) = primitive.indices {
                check_index("accessor", a, accessors)?;
            }
        }
    }

    for skin in &root.skins {
        if let Some(a) = skin.inverse_bind_matrices {
            check_index("accessor", a, accessors)?;
        }
        for &joint in &skin.joints {
            check_index("node", joint, nodes)?;
        }
        if let Some(node) = skin.skeleton {
            check_index("node", node, nodes)?;
        }
    }

    for animation in &root.animations {
        for sampler in &animation.samplers {
            check_index("accessor", sampler.input, accessors)?;
            check_index("accessor", sampler.output, accessors)?;
        }
        for channel in &animation.channels {
            check_index("animation sampler", channel.sampler, animation.samplers.len())?;
            if let Some(node) = channel.target.node {
                check_index("node", node, nodes)?;
            }
        }
    }

    Ok(())
}
