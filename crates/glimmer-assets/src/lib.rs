//! Glimmer Assets - Binary glTF decoding
//!
//! Turns a binary glTF container into a flat list of renderable meshes:
//! container framing, bounds-checked accessor views, embedded image decoding,
//! mesh building and material/texture binding.

mod accessor;
mod builder;
mod config;
mod diagnostics;
mod document;
mod error;
mod glb;
mod material;
mod mesh;
mod resource;
mod scene;
mod texture;

#[cfg(test)]
pub(crate) mod test_support;

pub use accessor::{resolve, TypedView};
pub use builder::{build, PrimitiveOutcome, SkipReason};
pub use config::DecodeConfig;
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Site};
pub use document::{attribute, base_color_texture, Buffer, Document, Image};
pub use error::{AssetError, ParseError, ResolveError};
pub use glb::{parse, parse_with};
pub use gltf::json;
pub use material::{TextureIssue, TexturePool};
pub use mesh::{Mesh, Vertex};
pub use resource::{FileLoader, MemoryLoader, ResourceLoader};
pub use scene::{LoadSummary, MeshHook, NullHook, Scene};
pub use texture::{decode, TextureAsset, TextureFormat};
