use std::iter::FusedIterator;

use smallvec::SmallVec;

use crate::document::Document;
use crate::mapping::{ComponentType, ComponentValue, ElementType};
use crate::schema::Accessor;
use crate::{GltfError, Result};

/// One decoded component, tagged with its encoding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Component {
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    U32(u32),
    F32(f32),
}

impl Component {
    /// Reads one component from the front of `bytes`, which must hold at
    /// least `ty.size()` bytes.
    pub fn read(ty: ComponentType, bytes: &[u8]) -> Component {
        match ty {
            ComponentType::I8 => Component::I8(i8::read_le(bytes)),
            ComponentType::U8 => Component::U8(u8::read_le(bytes)),
            ComponentType::I16 => Component::I16(i16::read_le(bytes)),
            ComponentType::U16 => Component::U16(u16::read_le(bytes)),
            ComponentType::U32 => Component::U32(u32::read_le(bytes)),
            ComponentType::F32 => Component::F32(f32::read_le(bytes)),
        }
    }

    pub fn component_type(self) -> ComponentType {
        match self {
            Component::I8(_) => ComponentType::I8,
            Component::U8(_) => ComponentType::U8,
            Component::I16(_) => ComponentType::I16,
            Component::U16(_) => ComponentType::U16,
            Component::U32(_) => ComponentType::U32,
            Component::F32(_) => ComponentType::F32,
        }
    }

    pub fn as_f32(self) -> f32 {
        match self {
            Component::I8(v) => v as f32,
            Component::U8(v) => v as f32,
            Component::I16(v) => v as f32,
            Component::U16(v) => v as f32,
            Component::U32(v) => v as f32,
            Component::F32(v) => v,
        }
    }

    /// Integer value, `None` for float components.
    pub fn as_i64(self) -> Option<i64> {
        match self {
            Component::I8(v) => Some(v.into()),
            Component::U8(v) => Some(v.into()),
            Component::I16(v) => Some(v.into()),
            Component::U16(v) => Some(v.into()),
            Component::U32(v) => Some(v.into()),
            Component::F32(_) => None,
        }
    }
}

/// One decoded element: a bare component for `SCALAR` accessors, otherwise
/// the components in the order they are stored.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Scalar(Component),
    Tuple(SmallVec<[Component; 4]>),
}

impl Element {
    pub fn components(&self) -> &[Component] {
        match self {
            Element::Scalar(c) => std::slice::from_ref(c),
            Element::Tuple(cs) => cs.as_slice(),
        }
    }

    pub fn scalar(&self) -> Option<Component> {
        match self {
            Element::Scalar(c) => Some(*c),
            Element::Tuple(_) => None,
        }
    }
}

/// Resolved byte geometry of an accessor.
#[derive(Debug, Clone, Copy)]
struct Layout<'d> {
    bytes: &'d [u8],
    view_start: usize,
    view_end: usize,
    base: usize,
    stride: usize,
    element_size: usize,
    component_type: ComponentType,
    element_type: ElementType,
}

impl<'d> Layout<'d> {
    fn resolve(document: &'d Document<'_>, accessor: &Accessor) -> Result<Self> {
        if accessor.sparse.is_some() {
            return Err(GltfError::Unsupported("sparse accessor".to_owned()));
        }
        let view_ix = accessor.buffer_view.ok_or_else(|| {
            GltfError::Unsupported("accessor without a bufferView".to_owned())
        })?;
        let view = document.buffer_view(view_ix)?;
        let bytes = document.buffer(view.buffer)?;

        let component_type = accessor.component_type;
        let element_type = accessor.element_type;
        let element_size = component_type.size() * element_type.components();
        let stride = match view.byte_stride {
            Some(stride) if stride < element_size => {
                return Err(GltfError::InvalidStride {
                    view: view_ix,
                    stride,
                    natural: element_size,
                });
            }
            Some(stride) => stride,
            None => element_size,
        };

        let view_start = view.byte_offset;
        let view_end = view_start
            .checked_add(view.byte_length)
            .filter(|&end| end <= bytes.len())
            .ok_or_else(|| GltfError::OutOfBounds {
                region: format!("bufferView {view_ix}"),
                start: view_start,
                end: view_start.saturating_add(view.byte_length),
                limit_start: 0,
                limit_end: bytes.len(),
            })?;
        let base = view_start.saturating_add(accessor.byte_offset);

        Ok(Layout {
            bytes,
            view_start,
            view_end,
            base,
            stride,
            element_size,
            component_type,
            element_type,
        })
    }

    /// Bytes of element `e`, bounds-checked against the buffer view.
    fn element(&self, e: usize) -> Result<&'d [u8]> {
        let start = e
            .checked_mul(self.stride)
            .and_then(|offset| offset.checked_add(self.base));
        let end = start.and_then(|start| start.checked_add(self.element_size));
        match (start, end) {
            (Some(start), Some(end)) if end <= self.view_end => Ok(&self.bytes[start..end]),
            _ => Err(GltfError::OutOfBounds {
                region: format!("accessor element {e}"),
                start: start.unwrap_or(usize::MAX),
                end: end.unwrap_or(usize::MAX),
                limit_start: self.view_start,
                limit_end: self.view_end,
            }),
        }
    }
}

/// Iterator over the elements of one accessor.
///
/// Yields `count` items when every element is in bounds. The first error ends
/// the sequence early, so the upper bound of `size_hint` is only a maximum.
/// Call [`decode`] again to re-scan.
#[derive(Debug, Clone)]
pub struct Elements<'d> {
    layout: Layout<'d>,
    next: usize,
    count: usize,
}

impl Iterator for Elements<'_> {
    type Item = Result<Element>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.count {
            return None;
        }
        let e = self.next;
        let bytes = match self.layout.element(e) {
            Ok(bytes) => bytes,
            Err(err) => {
                self.next = self.count;
                return Some(Err(err));
            }
        };
        self.next += 1;

        let ct = self.layout.component_type;
        let element = match self.layout.element_type {
            ElementType::Scalar => Element::Scalar(Component::read(ct, bytes)),
            _ => Element::Tuple(
                bytes
                    .chunks_exact(ct.size())
                    .map(|c| Component::read(ct, c))
                    .collect(),
            ),
        };
        Some(Ok(element))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.next;
        (remaining.min(1), Some(remaining))
    }
}

impl FusedIterator for Elements<'_> {}

/// Starts decoding `accessor`. Layout errors (stride, missing view, sparse
/// storage) are reported here; per-element bounds errors come from the iterator.
pub fn decode<'d>(document: &'d Document<'_>, accessor: &Accessor) -> Result<Elements<'d>> {
    let layout = Layout::resolve(document, accessor)?;
    if accessor.normalized {
        tracing::debug!("normalized accessor decoded as raw integers");
    }
    tracing::trace!(
        count = accessor.count,
        stride = layout.stride,
        base = layout.base,
        ty = accessor.element_type.name(),
        "decoding accessor"
    );
    Ok(Elements {
        layout,
        next: 0,
        count: accessor.count,
    })
}

/// Decodes every element of `accessor` into a vector.
pub fn decode_all(document: &Document<'_>, accessor: &Accessor) -> Result<Vec<Element>> {
    decode(document, accessor)?.collect()
}

/// Reads an accessor whose layout is statically known, e.g. `read::<f32, 3>`
/// for `VEC3` float positions or `read::<f32, 16>` for `MAT4` matrices.
pub fn read<T: ComponentValue, const N: usize>(
    document: &Document<'_>,
    accessor: &Accessor,
) -> Result<Vec<[T; N]>> {
    if accessor.component_type != T::COMPONENT_TYPE || accessor.element_type.components() != N {
        return Err(GltfError::TypeMismatch {
            requested: format!("{:?} x {N}", T::COMPONENT_TYPE),
            actual: format!(
                "{:?} {}",
                accessor.component_type,
                accessor.element_type.name()
            ),
        });
    }

    let layout = Layout::resolve(document, accessor)?;
    let size = T::COMPONENT_TYPE.size();
    (0..accessor.count)
        .map(|e| {
            let bytes = layout.element(e)?;
            let mut v = [T::default(); N];
            for (i, slot) in v.iter_mut().enumerate() {
                *slot = T::read_le(&bytes[i * size..]);
            }
            Ok(v)
        })
        .collect()
}

/// [`read`] for `SCALAR` accessors.
pub fn read_scalars<T: ComponentValue>(
    document: &Document<'_>,
    accessor: &Accessor,
) -> Result<Vec<T>> {
    Ok(read::<T, 1>(document, accessor)?
        .into_iter()
        .map(|[v]| v)
        .collect())
}
