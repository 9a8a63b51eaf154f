use bytemuck::{Pod, Zeroable};
use glimmer_core::{BoundingSphere, Placement};

use crate::texture::TextureAsset;

/// Interleaved vertex: position, normal, texture coordinate.
///
/// The layout is fixed (32 bytes, offsets 0/12/24) because the renderer uploads
/// vertex arrays as raw bytes.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coord: [f32; 2],
}

impl Vertex {
    /// A vertex at `position` with zero normal and zero texture coordinate.
    pub fn at(position: [f32; 3]) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }
}

/// A renderable mesh built from one primitive.
///
/// Every index is `< vertices.len()`.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub name: Option<String>,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub bounds: BoundingSphere,
    pub texture: Option<TextureAsset>,
    pub placement: Placement,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn has_texture(&self) -> bool {
        self.texture.is_some()
    }
}
