use glimmer_core::Placement;
use serde::{Deserialize, Serialize};

/// Decoder configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeConfig {
    /// Placement given to every built mesh.
    pub placement: Placement,
    /// Images wider or taller than this are not turned into textures.
    pub max_texture_dimension: u32,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            placement: Placement::default(),
            max_texture_dimension: 16384,
        }
    }
}

impl DecodeConfig {
    /// Whether an image of the given size may become a texture.
    pub fn accepts_texture(&self, width: u32, height: u32) -> bool {
        width <= self.max_texture_dimension && height <= self.max_texture_dimension
    }
}
