//! Material to texture binding.

use tracing::debug;

use crate::config::DecodeConfig;
use crate::diagnostics::{DiagnosticKind, Diagnostics, Site};
use crate::document::{base_color_texture, Document, Image};
use crate::texture::{self, TextureAsset};

/// Why a primitive ended up without the texture its material asks for.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TextureIssue {
    #[error("material {0} does not exist")]
    MaterialOutOfRange(usize),

    #[error("texture index {0} is out of range")]
    TextureOutOfRange(usize),

    #[error("texture {texture} references missing image {image}")]
    ImageOutOfRange { texture: usize, image: usize },

    #[error("image {0} is already owned by an earlier mesh")]
    AlreadyClaimed(usize),
}

#[derive(Debug)]
enum Slot {
    Ready(TextureAsset),
    Rejected,
    Claimed,
}

/// Decoded textures, one slot per document image.
///
/// Each asset can be taken exactly once so every texture ends up owned by a
/// single mesh.
#[derive(Debug, Default)]
pub struct TexturePool {
    slots: Vec<Slot>,
}

impl TexturePool {
    /// Turn the document's images into textures, recording a diagnostic for
    /// each image that cannot become one. Pixel buffers move into the pool.
    pub fn decode(images: Vec<Image>, config: &DecodeConfig, diagnostics: &mut Diagnostics) -> Self {
        let slots = images
            .into_iter()
            .enumerate()
            .map(|(index, image)| {
                if !config.accepts_texture(image.width, image.height) {
                    diagnostics.record(
                        Site::Image(index),
                        DiagnosticKind::TextureTooLarge {
                            width: image.width,
                            height: image.height,
                            limit: config.max_texture_dimension,
                        },
                    );
                    return Slot::Rejected;
                }

                let channels = image.channels;
                match texture::decode(image) {
                    Some(asset) => {
                        debug!(
                            "Loaded texture {} size: {}x{}",
                            index, asset.width, asset.height
                        );
                        Slot::Ready(asset)
                    }
                    None => {
                        diagnostics.record(
                            Site::Image(index),
                            DiagnosticKind::UnsupportedChannels { channels },
                        );
                        Slot::Rejected
                    }
                }
            })
            .collect();

        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of textures still available to be claimed.
    pub fn available(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| matches!(slot, Slot::Ready(_)))
            .count()
    }

    fn claim(&mut self, image: usize) -> Result<Option<TextureAsset>, TextureIssue> {
        let Some(slot) = self.slots.get_mut(image) else {
            return Ok(None);
        };
        match std::mem::replace(slot, Slot::Claimed) {
            Slot::Ready(asset) => Ok(Some(asset)),
            Slot::Claimed => Err(TextureIssue::AlreadyClaimed(image)),
            Slot::Rejected => {
                *slot = Slot::Rejected;
                Ok(None)
            }
        }
    }
}

/// Resolve the base-color texture of a primitive's material.
///
/// `Ok(None)` means the primitive simply has no texture: no material, no
/// base-color reference, or an image that was already rejected at decode time
/// (and reported then). `Err` means the reference is broken and should be
/// reported; the mesh is still built, just untextured.
pub fn resolve(
    document: &Document,
    material_index: Option<usize>,
    pool: &mut TexturePool,
) -> Result<Option<TextureAsset>, TextureIssue> {
    let Some(material_index) = material_index else {
        return Ok(None);
    };
    let material = document
        .root
        .materials
        .get(material_index)
        .ok_or(TextureIssue::MaterialOutOfRange(material_index))?;

    let Some(texture_index) = base_color_texture(material) else {
        return Ok(None);
    };
    let texture = document
        .root
        .textures
        .get(texture_index)
        .ok_or(TextureIssue::TextureOutOfRange(texture_index))?;
    let image = texture.source.value();

    if image >= pool.len() {
        return Err(TextureIssue::ImageOutOfRange {
            texture: texture_index,
            image,
        });
    }

    pool.claim(image)
}
