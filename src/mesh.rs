use crate::mapping::Semantic;
use crate::schema::{Mesh, Primitive};
use crate::{GltfError, Result};

/// `mode` value of an indexed triangle list.
pub const TRIANGLES: u32 = 4;

/// Accessor indices of the one primitive in a validated mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshPrimitive {
    pub position: usize,
    pub normal: Option<usize>,
    pub texcoord_0: Option<usize>,
    pub joints_0: Option<usize>,
    pub weights_0: Option<usize>,
    pub indices: usize,
}

/// Fails unless `mesh` has exactly one primitive whose mode is absent or
/// [`TRIANGLES`].
pub fn validate(mesh: &Mesh) -> Result<()> {
    single_primitive(mesh).map(|_| ())
}

pub(crate) fn validate_indexed(index: usize, mesh: &Mesh) -> Result<()> {
    validate(mesh).map_err(|err| match err {
        GltfError::Validation { reason, .. } => GltfError::Validation {
            mesh: Some(index),
            reason,
        },
        other => other,
    })
}

/// Validates `mesh` and resolves the attributes the generators consume.
pub fn primitive_view(mesh: &Mesh) -> Result<MeshPrimitive> {
    let primitive = single_primitive(mesh)?;
    let attribute = |semantic: Semantic| {
        primitive
            .attributes
            .iter()
            .find(|(key, _)| Semantic::parse(key) == Some(semantic))
            .map(|(_, &accessor)| accessor)
    };

    Ok(MeshPrimitive {
        position: attribute(Semantic::Positions)
            .ok_or_else(|| invalid("primitive has no POSITION attribute"))?,
        normal: attribute(Semantic::Normals),
        texcoord_0: attribute(Semantic::TexCoords(0)),
        joints_0: attribute(Semantic::Joints(0)),
        weights_0: attribute(Semantic::Weights(0)),
        indices: primitive
            .indices
            .ok_or_else(|| invalid("primitive is not indexed"))?,
    })
}

fn single_primitive(mesh: &Mesh) -> Result<&Primitive> {
    let [primitive] = mesh.primitives.as_slice() else {
        return Err(invalid(format!(
            "expected exactly one primitive, found {}",
            mesh.primitives.len()
        )));
    };
    match primitive.mode {
        None | Some(TRIANGLES) => Ok(primitive),
        Some(mode) => Err(invalid(format!(
            "primitive mode {mode} is not a triangle list"
        ))),
    }
}

fn invalid(reason: impl Into<String>) -> GltfError {
    GltfError::Validation {
        mesh: None,
        reason: reason.into(),
    }
}
