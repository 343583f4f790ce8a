//! Property tests for the accessor layout arithmetic.

mod support;

use gltf_bake::{Component, Document, Element, GltfError, LoadOptions, decode_all, read_scalars};
use proptest::prelude::*;
use serde_json::json;

/// A `.glb` holding `values` as u16 scalars spaced `stride` bytes apart.
fn u16_document(values: &[u16], stride: usize) -> Vec<u8> {
    let mut bin = vec![0u8; values.len() * stride];
    for (i, v) in values.iter().enumerate() {
        bin[i * stride..i * stride + 2].copy_from_slice(&v.to_le_bytes());
    }
    let mut view = json!({ "buffer": 0, "byteLength": bin.len() });
    if stride != 2 {
        view["byteStride"] = stride.into();
    }
    let root = json!({
        "bufferViews": [view],
        "accessors": [{ "bufferView": 0, "componentType": 5123, "count": values.len(), "type": "SCALAR" }],
        "buffers": [{ "byteLength": bin.len() }]
    });
    support::assemble_glb(&root, &bin)
}

proptest! {
    #[test]
    fn decode_preserves_count_and_values(
        values in proptest::collection::vec(any::<u16>(), 0..64),
        padding in 0usize..6,
    ) {
        let stride = 2 + padding * 2;
        let glb = u16_document(&values, stride);
        let document = Document::from_glb(&glb, &LoadOptions::default()).unwrap();
        let accessor = document.accessor(0).unwrap();

        let elements = decode_all(&document, accessor).unwrap();
        prop_assert_eq!(elements.len(), accessor.count);
        let expected: Vec<Element> = values.iter().map(|&v| Element::Scalar(Component::U16(v))).collect();
        prop_assert_eq!(&elements, &expected);
        prop_assert_eq!(read_scalars::<u16>(&document, accessor).unwrap(), values);
    }

    #[test]
    fn decode_is_deterministic(values in proptest::collection::vec(any::<u16>(), 1..32)) {
        let glb = u16_document(&values, 4);
        let document = Document::from_glb(&glb, &LoadOptions::default()).unwrap();
        let first: Vec<_> = document.decode(0).unwrap().collect::<Result<_, _>>().unwrap();
        let second: Vec<_> = document.decode(0).unwrap().collect::<Result<_, _>>().unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn short_stride_is_rejected(stride in 0usize..12, count in 0usize..4) {
        let bin = vec![0u8; 48];
        let root = json!({
            "bufferViews": [{ "buffer": 0, "byteLength": 48, "byteStride": stride }],
            "accessors": [{ "bufferView": 0, "componentType": 5126, "count": count, "type": "VEC3" }],
            "buffers": [{ "byteLength": 48 }]
        });
        let glb = support::assemble_glb(&root, &bin);
        let document = Document::from_glb(&glb, &LoadOptions::default()).unwrap();
        let err = document.decode(0).unwrap_err();
        let is_invalid_stride = matches!(err, GltfError::InvalidStride { natural: 12, .. });
        prop_assert!(is_invalid_stride);
    }

    #[test]
    fn overlong_count_fails_not_truncates(values in proptest::collection::vec(any::<u16>(), 0..16), extra in 1usize..4) {
        let mut root = json!({
            "bufferViews": [{ "buffer": 0, "byteLength": values.len() * 2 }],
            "accessors": [{ "bufferView": 0, "componentType": 5123, "count": values.len() + extra, "type": "SCALAR" }],
            "buffers": [{ "byteLength": values.len() * 2 }]
        });
        let bin: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        root["buffers"][0]["byteLength"] = bin.len().into();
        let glb = support::assemble_glb(&root, &bin);
        let document = Document::from_glb(&glb, &LoadOptions::default()).unwrap();

        let results: Vec<_> = document.decode(0).unwrap().collect();
        prop_assert_eq!(results.len(), values.len() + 1);
        prop_assert!(results[..values.len()].iter().all(Result::is_ok));
        let is_out_of_bounds = matches!(results[values.len()], Err(GltfError::OutOfBounds { .. }));
        prop_assert!(is_out_of_bounds);
    }
}

#[test]
fn test_uint16_round_trip() {
    let glb = u16_document(&[1, 2, 3], 2);
    let document = Document::from_glb(&glb, &LoadOptions::default()).unwrap();
    let values = read_scalars::<u16>(&document, document.accessor(0).unwrap()).unwrap();
    assert_eq!(values, vec![1, 2, 3]);
}
