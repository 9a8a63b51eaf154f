//! Glimmer Render - renderer-side half of the mesh contract
//!
//! Describes the fixed interleaved vertex layout and turns built meshes into
//! byte buffers ready for GPU upload.

pub mod upload;
pub mod vertex;

pub use upload::{MeshUpload, TextureUpload, UploadRecorder};
pub use vertex::{VertexAttribute, VertexLayout};
