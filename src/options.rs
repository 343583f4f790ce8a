use serde::{Deserialize, Serialize};

/// Structural policies applied while loading a [`Document`](crate::Document).
///
/// The defaults match what the code generators expect: a single-rooted node
/// tree and triangle-list meshes only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Reject any child index that is not strictly greater than its parent's.
    pub require_ascending_children: bool,
    /// Accept a forest: every node that is never a child becomes a root.
    pub allow_multiple_roots: bool,
    /// Run [`validate_mesh`](crate::validate_mesh) on every mesh at load time.
    pub validate_meshes: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            require_ascending_children: false,
            allow_multiple_roots: false,
            validate_meshes: true,
        }
    }
}
