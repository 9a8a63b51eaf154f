//! Vertex layout description for the interleaved glimmer vertex

use std::mem::{offset_of, size_of};

use glimmer_assets::Vertex;

/// One attribute within the interleaved vertex.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexAttribute {
    pub location: u32,
    pub name: &'static str,
    /// Byte offset from the start of the vertex
    pub offset: u32,
    /// Number of `f32` components
    pub components: u32,
}

/// Interleaved vertex buffer layout
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexLayout {
    pub stride: u32,
    pub attributes: [VertexAttribute; 3],
}

impl VertexLayout {
    /// Layout of [`Vertex`]: position (location 0), normal (1), texture
    /// coordinate (2).
    pub fn standard() -> Self {
        Self {
            stride: size_of::<Vertex>() as u32,
            attributes: [
                VertexAttribute {
                    location: 0,
                    name: "position",
                    offset: offset_of!(Vertex, position) as u32,
                    components: 3,
                },
                VertexAttribute {
                    location: 1,
                    name: "normal",
                    offset: offset_of!(Vertex, normal) as u32,
                    components: 3,
                },
                VertexAttribute {
                    location: 2,
                    name: "tex_coord",
                    offset: offset_of!(Vertex, tex_coord) as u32,
                    components: 2,
                },
            ],
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&VertexAttribute> {
        self.attributes.iter().find(|a| a.name == name)
    }
}
