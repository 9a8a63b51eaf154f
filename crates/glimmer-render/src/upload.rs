//! Upload preparation for built meshes

use glimmer_assets::{Mesh, MeshHook, TextureFormat};
use glimmer_core::{BoundingSphere, Mat4};
use tracing::debug;

/// Pixel data for one texture upload
#[derive(Clone, Debug, PartialEq)]
pub struct TextureUpload {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    pub format: TextureFormat,
    pub pixels: Vec<u8>,
}

/// Everything the GPU side needs for one mesh, as raw bytes
#[derive(Clone, Debug, PartialEq)]
pub struct MeshUpload {
    pub name: Option<String>,
    /// Interleaved vertices, see [`crate::VertexLayout::standard`]
    pub vertex_bytes: Vec<u8>,
    /// `u32` indices
    pub index_bytes: Vec<u8>,
    pub vertex_count: usize,
    pub index_count: usize,
    pub model: Mat4,
    pub bounds: BoundingSphere,
    pub texture: Option<TextureUpload>,
}

impl MeshUpload {
    pub fn from_mesh(mesh: &Mesh) -> Self {
        Self {
            name: mesh.name.clone(),
            vertex_bytes: bytemuck::cast_slice(&mesh.vertices).to_vec(),
            index_bytes: bytemuck::cast_slice(&mesh.indices).to_vec(),
            vertex_count: mesh.vertices.len(),
            index_count: mesh.indices.len(),
            model: mesh.placement.matrix(),
            bounds: mesh.bounds,
            texture: mesh.texture.as_ref().map(|t| TextureUpload {
                width: t.width,
                height: t.height,
                channels: t.channels(),
                format: t.format,
                pixels: t.data.clone(),
            }),
        }
    }
}

/// Mesh creation hook that captures an upload per mesh, in scene order
#[derive(Debug, Default)]
pub struct UploadRecorder {
    uploads: Vec<MeshUpload>,
}

impl UploadRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn uploads(&self) -> &[MeshUpload] {
        &self.uploads
    }

    pub fn clear(&mut self) {
        self.uploads.clear();
    }

    /// Total bytes across vertex, index and pixel buffers.
    pub fn total_bytes(&self) -> usize {
        self.uploads
            .iter()
            .map(|u| {
                u.vertex_bytes.len()
                    + u.index_bytes.len()
                    + u.texture.as_ref().map_or(0, |t| t.pixels.len())
            })
            .sum()
    }
}

impl MeshHook for UploadRecorder {
    fn create_gpu_objects(&mut self, mesh: &Mesh) {
        let upload = MeshUpload::from_mesh(mesh);
        debug!(
            "Prepared upload: {} vertices, {} indices, texture: {}",
            upload.vertex_count,
            upload.index_count,
            upload.texture.is_some()
        );
        self.uploads.push(upload);
    }
}
