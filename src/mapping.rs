use serde::{Deserialize, Serialize};

/// Numeric encoding of a single accessor component, keyed by its GL enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum ComponentType {
    I8,
    U8,
    I16,
    U16,
    U32,
    F32,
}

impl ComponentType {
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            5120 => Some(ComponentType::I8),
            5121 => Some(ComponentType::U8),
            5122 => Some(ComponentType::I16),
            5123 => Some(ComponentType::U16),
            5125 => Some(ComponentType::U32),
            5126 => Some(ComponentType::F32),
            _ => None,
        }
    }

    pub fn code(self) -> u32 {
        match self {
            ComponentType::I8 => 5120,
            ComponentType::U8 => 5121,
            ComponentType::I16 => 5122,
            ComponentType::U16 => 5123,
            ComponentType::U32 => 5125,
            ComponentType::F32 => 5126,
        }
    }

    /// Width in bytes of one component.
    pub fn size(self) -> usize {
        match self {
            ComponentType::I8 | ComponentType::U8 => 1,
            ComponentType::I16 | ComponentType::U16 => 2,
            ComponentType::U32 | ComponentType::F32 => 4,
        }
    }
}

impl TryFrom<u32> for ComponentType {
    type Error = String;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        ComponentType::from_code(code).ok_or_else(|| format!("unknown componentType {code}"))
    }
}

impl From<ComponentType> for u32 {
    fn from(ct: ComponentType) -> u32 {
        ct.code()
    }
}

/// Shape of one accessor element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ElementType {
    Scalar,
    Vec2,
    Vec3,
    Vec4,
    Mat2,
    Mat3,
    Mat4,
}

impl ElementType {
    pub fn components(self) -> usize {
        match self {
            ElementType::Scalar => 1,
            ElementType::Vec2 => 2,
            ElementType::Vec3 => 3,
            ElementType::Vec4 | ElementType::Mat2 => 4,
            ElementType::Mat3 => 9,
            ElementType::Mat4 => 16,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ElementType::Scalar => "SCALAR",
            ElementType::Vec2 => "VEC2",
            ElementType::Vec3 => "VEC3",
            ElementType::Vec4 => "VEC4",
            ElementType::Mat2 => "MAT2",
            ElementType::Mat3 => "MAT3",
            ElementType::Mat4 => "MAT4",
        }
    }
}

/// Vertex attribute semantic, parsed from a primitive's attribute key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Semantic {
    Positions,
    Normals,
    Tangents,
    TexCoords(u32),
    Colors(u32),
    Joints(u32),
    Weights(u32),
}

impl Semantic {
    pub fn parse(key: &str) -> Option<Semantic> {
        match key {
            "POSITION" => return Some(Semantic::Positions),
            "NORMAL" => return Some(Semantic::Normals),
            "TANGENT" => return Some(Semantic::Tangents),
            _ => {}
        }

        let (kind, idx_s) = key.split_once('_')?;
        // "TEXCOORD_00" and "COLOR_+1" name no set
        if !idx_s.bytes().all(|b| b.is_ascii_digit()) || (idx_s.len() > 1 && idx_s.starts_with('0')) {
            return None;
        }
        let idx: u32 = idx_s.parse().ok()?;
        match kind {
            "TEXCOORD" => Some(Semantic::TexCoords(idx)),
            "COLOR" => Some(Semantic::Colors(idx)),
            "JOINTS" => Some(Semantic::Joints(idx)),
            "WEIGHTS" => Some(Semantic::Weights(idx)),
            _ => None,
        }
    }

    pub fn key(self) -> String {
        match self {
            Semantic::Positions => "POSITION".to_owned(),
            Semantic::Normals => "NORMAL".to_owned(),
            Semantic::Tangents => "TANGENT".to_owned(),
            Semantic::TexCoords(set) => format!("TEXCOORD_{set}"),
            Semantic::Colors(set) => format!("COLOR_{set}"),
            Semantic::Joints(set) => format!("JOINTS_{set}"),
            Semantic::Weights(set) => format!("WEIGHTS_{set}"),
        }
    }
}

/// Rust scalar that can be read straight out of a little-endian component.
pub trait ComponentValue: Copy + Default + 'static {
    const COMPONENT_TYPE: ComponentType;

    /// Reads the value from the first `COMPONENT_TYPE.size()` bytes.
    fn read_le(bytes: &[u8]) -> Self;
}

macro_rules! component_value {
    ($t:ty, $ct:expr, $n:literal) => {
        impl ComponentValue for $t {
            const COMPONENT_TYPE: ComponentType = $ct;

            fn read_le(bytes: &[u8]) -> Self {
                let mut raw = [0u8; $n];
                raw.copy_from_slice(&bytes[..$n]);
                <$t>::from_le_bytes(raw)
            }
        }
    };
}

component_value!(i8, ComponentType::I8, 1);
component_value!(u8, ComponentType::U8, 1);
component_value!(i16, ComponentType::I16, 2);
component_value!(u16, ComponentType::U16, 2);
component_value!(u32, ComponentType::U32, 4);
component_value!(f32, ComponentType::F32, 4);
