//! Structural metadata of a binary glTF container.
//!
//! The JSON chunk is deserialized into a [`json::Root`] without the validation
//! pass, so dangling indices survive parsing and are reported per primitive
//! later. Buffers and images are bound against the binary chunks afterwards,
//! see [`crate::glb`].

use gltf::json;
use gltf::json::mesh::Semantic;
use gltf::json::validation::Checked;

/// Parsed container contents. Read-only scratch state for one load.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub root: json::Root,
    /// Bound BIN chunk data, index-aligned with `root.buffers`.
    pub buffers: Vec<Buffer>,
    /// Decoded images, index-aligned with `root.images`.
    pub images: Vec<Image>,
}

impl Document {
    pub fn meshes(&self) -> &[json::Mesh] {
        &self.root.meshes
    }
}

/// Raw bytes of one binary chunk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Buffer {
    pub data: Vec<u8>,
}

impl Buffer {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Embedded image: 8-bit channels, row-major, tightly packed.
///
/// Images larger than the configured texture limit are not decoded; they keep
/// their dimensions but carry no channels and no pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub name: Option<String>,
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    pub pixels: Vec<u8>,
}

impl Image {
    pub fn is_decoded(&self) -> bool {
        !self.pixels.is_empty()
    }
}

/// Accessor index bound to `semantic` in a primitive's attribute map.
pub fn attribute(primitive: &json::mesh::Primitive, semantic: Semantic) -> Option<usize> {
    primitive
        .attributes
        .get(&Checked::Valid(semantic))
        .map(|index| index.value())
}

/// Index of a material's base-color texture, if it has one.
pub fn base_color_texture(material: &json::Material) -> Option<usize> {
    material
        .pbr_metallic_roughness
        .base_color_texture
        .as_ref()
        .map(|info| info.index.value())
}

/// Saturating conversion for the 64-bit sizes in the metadata. An oversized
/// value fails the later bounds checks instead of wrapping.
pub(crate) fn to_usize(value: u64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}
