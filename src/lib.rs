pub mod accessor;
pub mod document;
pub mod glb;
pub mod mesh;
pub mod options;
pub mod scene;
pub mod schema;

mod mapping;

#[cfg(test)]
mod fixture;

pub use accessor::{Component, Element, Elements, decode, decode_all, read, read_scalars};
pub use document::{Document, Kind};
pub use mapping::{ComponentType, ComponentValue, ElementType, Semantic};
pub use mesh::{MeshPrimitive, primitive_view, validate as validate_mesh};
pub use options::LoadOptions;
pub use scene::{SceneGraph, build as build_scene_graph};

pub type Result<T> = std::result::Result<T, GltfError>;

#[derive(Debug, thiserror::Error)]
pub enum GltfError {
    #[error("malformed GLB container at byte {offset}: {message}")]
    Format { offset: usize, message: String },
    #[error("buffer {buffer} has unsupported source {uri:?} (only base64 data URIs are accepted)")]
    UnsupportedBufferSource { buffer: usize, uri: Option<String> },
    #[error("buffer {buffer} declares {declared} bytes but {actual} were provided")]
    SizeMismatch {
        buffer: usize,
        declared: usize,
        actual: usize,
    },
    #[error("buffer view {view} declares byteStride {stride}, smaller than the element size {natural}")]
    InvalidStride {
        view: usize,
        stride: usize,
        natural: usize,
    },
    #[error("{region}: byte range {start}..{end} lies outside {limit_start}..{limit_end}")]
    OutOfBounds {
        region: String,
        start: usize,
        end: usize,
        limit_start: usize,
        limit_end: usize,
    },
    #[error("node {child} is a child of both node {first} and node {second}")]
    DuplicateParent {
        child: usize,
        first: usize,
        second: usize,
    },
    #[error("scene graph has several root nodes: {roots:?}")]
    AmbiguousRoot { roots: Vec<usize> },
    #[error("scene graph has no root node")]
    NoRoot,
    #[error("node {node} is its own ancestor")]
    Cycle { node: usize },
    #[error("node {node} is not reachable from the root")]
    DetachedNode { node: usize },
    #[error("node {parent} lists child {child}, which does not come after it")]
    ChildOrder { parent: usize, child: usize },
    #[error("{kind} index {index} out of range (have {len})")]
    InvalidReference {
        kind: &'static str,
        index: usize,
        len: usize,
    },
    #[error("unsupported mesh shape: {reason}")]
    Validation { mesh: Option<usize>, reason: String },
    #[error("accessor holds {actual}, requested {requested}")]
    TypeMismatch { requested: String, actual: String },
    #[error("unsupported: {0}")]
    Unsupported(String),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
