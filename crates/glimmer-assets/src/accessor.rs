//! Bounds-checked typed views over accessor data.

use gltf::json::accessor::{ComponentType, Type};
use gltf::json::validation::Checked;

use crate::document::{to_usize, Document};
use crate::error::ResolveError;

/// A validated window onto one accessor's elements.
///
/// Every element `i < count` lies within `bytes`, so element reads never go out
/// of range once a view has been constructed.
#[derive(Debug, Clone, Copy)]
pub struct TypedView<'a> {
    bytes: &'a [u8],
    component_type: ComponentType,
    shape: Type,
    stride: usize,
    count: usize,
}

/// Resolve an accessor through its buffer view and buffer into a typed view.
///
/// The full extent `byteOffset + (count - 1) * stride + elementSize` is checked
/// against the buffer view, and the buffer view against its buffer, before any
/// element is read.
pub fn resolve(document: &Document, accessor_index: usize) -> Result<TypedView<'_>, ResolveError> {
    let accessor = document
        .root
        .accessors
        .get(accessor_index)
        .ok_or(ResolveError::MissingAccessor(accessor_index))?;

    let (component_type, shape) = match (&accessor.component_type, &accessor.type_) {
        (Checked::Valid(component_type), Checked::Valid(shape)) => (component_type.0, *shape),
        _ => return Err(ResolveError::UnknownFormat(accessor_index)),
    };

    let view_index = accessor
        .buffer_view
        .as_ref()
        .map(|index| index.value())
        .ok_or(ResolveError::NoBufferView(accessor_index))?;
    let view = document
        .root
        .buffer_views
        .get(view_index)
        .ok_or(ResolveError::MissingBufferView {
            accessor: accessor_index,
            view: view_index,
        })?;
    let buffer_index = view.buffer.value();
    let buffer = document
        .buffers
        .get(buffer_index)
        .ok_or(ResolveError::MissingBuffer {
            view: view_index,
            buffer: buffer_index,
        })?;

    let out_of_bounds = |required: usize, available: usize| ResolveError::OutOfBounds {
        accessor: accessor_index,
        required,
        available,
    };

    let view_offset = view.byte_offset.as_ref().map_or(0, |offset| to_usize(offset.0));
    let view_end = view_offset
        .checked_add(to_usize(view.byte_length.0))
        .ok_or(out_of_bounds(usize::MAX, buffer.len()))?;
    let view_bytes = buffer
        .data
        .get(view_offset..view_end)
        .ok_or(out_of_bounds(view_end, buffer.len()))?;

    let element_size = component_size(component_type) * shape_components(shape);
    let stride = match view.byte_stride.as_ref().map(|stride| stride.0) {
        Some(stride) if stride < element_size => {
            return Err(ResolveError::InvalidStride {
                stride,
                element_size,
            })
        }
        Some(stride) => stride,
        None => element_size,
    };

    let count = to_usize(accessor.count.0);
    let extent = match count {
        0 => 0,
        count => (count - 1)
            .checked_mul(stride)
            .and_then(|n| n.checked_add(element_size))
            .ok_or(out_of_bounds(usize::MAX, view_bytes.len()))?,
    };
    let byte_offset = accessor.byte_offset.as_ref().map_or(0, |offset| to_usize(offset.0));
    let required = byte_offset
        .checked_add(extent)
        .ok_or(out_of_bounds(usize::MAX, view_bytes.len()))?;
    if required > view_bytes.len() {
        return Err(out_of_bounds(required, view_bytes.len()));
    }

    Ok(TypedView {
        bytes: &view_bytes[byte_offset..required],
        component_type,
        shape,
        stride,
        count,
    })
}

fn component_size(component_type: ComponentType) -> usize {
    match component_type {
        ComponentType::I8 | ComponentType::U8 => 1,
        ComponentType::I16 | ComponentType::U16 => 2,
        ComponentType::U32 | ComponentType::F32 => 4,
    }
}

fn shape_components(shape: Type) -> usize {
    match shape {
        Type::Scalar => 1,
        Type::Vec2 => 2,
        Type::Vec3 => 3,
        Type::Vec4 | Type::Mat2 => 4,
        Type::Mat3 => 9,
        Type::Mat4 => 16,
    }
}

impl<'a> TypedView<'a> {
    pub fn component_type(&self) -> ComponentType {
        self.component_type
    }

    pub fn shape(&self) -> Type {
        self.shape
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    fn element_size(&self) -> usize {
        component_size(self.component_type) * shape_components(self.shape)
    }

    fn element(&self, index: usize) -> &'a [u8] {
        let start = index * self.stride;
        &self.bytes[start..start + self.element_size()]
    }

    fn expect(&self, component_type: ComponentType, shape: Type) -> Result<(), ResolveError> {
        if self.component_type == component_type && self.shape == shape {
            Ok(())
        } else {
            Err(ResolveError::UnexpectedFormat {
                expected_type: component_type,
                expected_shape: shape,
                found_type: self.component_type,
                found_shape: self.shape,
            })
        }
    }

    /// Read every element as three little-endian `f32`s.
    pub fn read_vec3_f32(&self) -> Result<Vec<[f32; 3]>, ResolveError> {
        self.expect(ComponentType::F32, Type::Vec3)?;
        Ok((0..self.count)
            .map(|i| {
                let e = self.element(i);
                [f32_at(e, 0), f32_at(e, 4), f32_at(e, 8)]
            })
            .collect())
    }

    /// Read every element as two little-endian `f32`s.
    pub fn read_vec2_f32(&self) -> Result<Vec<[f32; 2]>, ResolveError> {
        self.expect(ComponentType::F32, Type::Vec2)?;
        Ok((0..self.count)
            .map(|i| {
                let e = self.element(i);
                [f32_at(e, 0), f32_at(e, 4)]
            })
            .collect())
    }

    /// Read scalar 16- or 32-bit unsigned indices, widened to `u32`.
    pub fn read_indices(&self) -> Result<Vec<u32>, ResolveError> {
        match self.component_type {
            ComponentType::U16 => {
                self.expect(ComponentType::U16, Type::Scalar)?;
                Ok((0..self.count)
                    .map(|i| {
                        let e = self.element(i);
                        u16::from_le_bytes([e[0], e[1]]) as u32
                    })
                    .collect())
            }
            ComponentType::U32 => {
                self.expect(ComponentType::U32, Type::Scalar)?;
                Ok((0..self.count)
                    .map(|i| {
                        let e = self.element(i);
                        u32::from_le_bytes([e[0], e[1], e[2], e[3]])
                    })
                    .collect())
            }
            other => Err(ResolveError::UnsupportedIndexType(other)),
        }
    }
}

fn f32_at(bytes: &[u8], offset: usize) -> f32 {
    f32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}
