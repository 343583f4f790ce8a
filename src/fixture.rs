use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde_json::json;

use crate::glb::Glb;
use crate::{Document, LoadOptions, Result};

pub fn assemble_glb(json: &[u8], bin: &[u8]) -> Vec<u8> {
    Glb::new(json, bin).to_vec()
}

pub fn data_uri(bytes: &[u8]) -> String {
    format!("data:application/octet-stream;base64,{}", STANDARD.encode(bytes))
}

/// Loads a `.gltf` document whose single buffer embeds `bin`.
pub fn embedded(mut root: serde_json::Value, bin: &[u8]) -> Result<Document<'static>> {
    root["buffers"] = json!([{ "byteLength": bin.len(), "uri": data_uri(bin) }]);
    let text = serde_json::to_vec(&root)?;
    Document::from_gltf(&text, &LoadOptions::default())
}

/// One triangle: three `VEC3` float positions followed by three `u16` indices,
/// referenced by node 1, a child of node 0.
pub fn triangle_document() -> Result<Document<'static>> {
    let mut bin = Vec::new();
    for v in [0.0f32, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0] {
        bin.extend_from_slice(&v.to_le_bytes());
    }
    for i in [0u16, 1, 2] {
        bin.extend_from_slice(&i.to_le_bytes());
    }

    embedded(
        json!({
            "asset": { "version": "2.0" },
            "nodes": [{ "children": [1] }, { "mesh": 0 }],
            "meshes": [{ "primitives": [{ "attributes": { "POSITION": 0 }, "indices": 1 }] }],
            "accessors": [
                { "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3" },
                { "bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR" }
            ],
            "bufferViews": [
                { "buffer": 0, "byteOffset": 0, "byteLength": 36 },
                { "buffer": 0, "byteOffset": 36, "byteLength": 6 }
            ]
        }),
        &bin,
    )
}
