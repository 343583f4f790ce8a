//! Programmatic glTF assets for the integration tests.
#![allow(dead_code)]

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use gltf_bake::glb::Glb;
use serde_json::{Value, json};

/// Frames `root` and `buffer_data` as a GLB container.
pub fn assemble_glb(root: &Value, buffer_data: &[u8]) -> Vec<u8> {
    let json = serde_json::to_vec(root).expect("Failed to serialize JSON");
    Glb::new(&json, buffer_data).to_vec()
}

/// Serializes `root` as a `.gltf` file with `bin` embedded as buffer 0.
pub fn embed_gltf(root: &Value, bin: &[u8]) -> Vec<u8> {
    let mut root = root.clone();
    root["buffers"] = json!([{
        "byteLength": bin.len(),
        "uri": format!("data:application/gltf-buffer;base64,{}", STANDARD.encode(bin)),
    }]);
    serde_json::to_vec_pretty(&root).expect("Failed to serialize JSON")
}

pub const POSITIONS: [[f32; 3]; 3] = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
pub const INDICES: [u16; 3] = [0, 1, 2];
pub const JOINTS: [[u8; 4]; 3] = [[0, 1, 0, 0], [0, 1, 0, 0], [1, 0, 0, 0]];
pub const WEIGHTS: [[f32; 4]; 3] = [
    [0.5, 0.5, 0.0, 0.0],
    [0.75, 0.25, 0.0, 0.0],
    [1.0, 0.0, 0.0, 0.0],
];
pub const KEY_TIMES: [f32; 2] = [0.0, 1.0];
pub const KEY_ROTATIONS: [[f32; 4]; 2] = [[0.0, 0.0, 0.0, 1.0], [0.0, 0.0, 0.70710677, 0.70710677]];

pub fn inverse_bind_matrices() -> [[f32; 16]; 2] {
    let mut identity = [0.0f32; 16];
    for i in 0..4 {
        identity[i * 5] = 1.0;
    }
    let mut lowered = identity;
    lowered[13] = -1.0; // translation y, column-major
    [identity, lowered]
}

struct BinBuilder {
    data: Vec<u8>,
    views: Vec<Value>,
}

impl BinBuilder {
    fn view(&mut self, bytes: &[u8]) -> usize {
        while self.data.len() % 4 != 0 {
            self.data.push(0);
        }
        self.views.push(json!({
            "buffer": 0,
            "byteOffset": self.data.len(),
            "byteLength": bytes.len(),
        }));
        self.data.extend_from_slice(bytes);
        self.views.len() - 1
    }
}

fn f32_bytes<'a>(values: impl IntoIterator<Item = &'a f32>) -> Vec<u8> {
    values.into_iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// A skinned triangle driven by a two-joint skeleton with one rotation
/// animation. Node tree: 0 -> [1 (mesh, skin), 2 -> [3]], joints [2, 3].
pub fn skinned_asset() -> (Value, Vec<u8>) {
    let mut bin = BinBuilder {
        data: Vec::new(),
        views: Vec::new(),
    };

    let positions = bin.view(&f32_bytes(POSITIONS.iter().flatten()));
    let indices = bin.view(&INDICES.iter().flat_map(|i| i.to_le_bytes()).collect::<Vec<_>>());
    let joints = bin.view(JOINTS.as_flattened());
    let weights = bin.view(&f32_bytes(WEIGHTS.iter().flatten()));
    let ibm = bin.view(&f32_bytes(inverse_bind_matrices().iter().flatten()));
    let times = bin.view(&f32_bytes(KEY_TIMES.iter()));
    let rotations = bin.view(&f32_bytes(KEY_ROTATIONS.iter().flatten()));

    let root = json!({
        "asset": { "version": "2.0", "generator": "gltf-bake tests" },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
        "nodes": [
            { "name": "root", "children": [1, 2] },
            { "name": "body", "mesh": 0, "skin": 0 },
            { "name": "hip", "children": [3], "translation": [0.0, 1.0, 0.0] },
            { "name": "knee", "rotation": [0.0, 0.0, 0.0, 1.0], "scale": [2.0, 2.0, 2.0] }
        ],
        "meshes": [{
            "primitives": [{
                "attributes": { "POSITION": 0, "JOINTS_0": 2, "WEIGHTS_0": 3 },
                "indices": 1,
                "mode": 4
            }]
        }],
        "skins": [{ "inverseBindMatrices": 4, "joints": [2, 3] }],
        "animations": [{
            "channels": [{ "sampler": 0, "target": { "node": 3, "path": "rotation" } }],
            "samplers": [{ "input": 5, "output": 6, "interpolation": "LINEAR" }]
        }],
        "accessors": [
            { "bufferView": positions, "componentType": 5126, "count": 3, "type": "VEC3",
              "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] },
            { "bufferView": indices, "componentType": 5123, "count": 3, "type": "SCALAR" },
            { "bufferView": joints, "componentType": 5121, "count": 3, "type": "VEC4" },
            { "bufferView": weights, "componentType": 5126, "count": 3, "type": "VEC4" },
            { "bufferView": ibm, "componentType": 5126, "count": 2, "type": "MAT4" },
            { "bufferView": times, "componentType": 5126, "count": 2, "type": "SCALAR",
              "min": [0.0], "max": [1.0] },
            { "bufferView": rotations, "componentType": 5126, "count": 2, "type": "VEC4" }
        ],
        "bufferViews": bin.views,
        "buffers": [{ "byteLength": bin.data.len() }]
    });

    (root, bin.data)
}
