use image::{RgbImage, RgbaImage};

use crate::document::Image;

/// Pixel format of a decoded texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFormat {
    Rgb8,
    Rgba8,
}

impl TextureFormat {
    /// Map a channel count to a format. Only 3- and 4-channel images are
    /// supported.
    pub fn from_channels(channels: u8) -> Option<Self> {
        match channels {
            3 => Some(TextureFormat::Rgb8),
            4 => Some(TextureFormat::Rgba8),
            _ => None,
        }
    }

    pub fn channels(self) -> u8 {
        match self {
            TextureFormat::Rgb8 => 3,
            TextureFormat::Rgba8 => 4,
        }
    }
}

/// A decoded texture with raw pixel data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureAsset {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub format: TextureFormat,
}

impl TextureAsset {
    pub fn channels(&self) -> u8 {
        self.format.channels()
    }
}

/// Turn an embedded image into a texture asset.
///
/// Returns `None` for channel counts other than 3 or 4, or when the pixel data
/// is too short for the declared dimensions. Width, height and channel count
/// are preserved exactly. The pixel buffer is moved into the asset.
pub fn decode(image: Image) -> Option<TextureAsset> {
    let format = TextureFormat::from_channels(image.channels)?;
    let (width, height) = (image.width, image.height);

    let data = match format {
        TextureFormat::Rgb8 => RgbImage::from_raw(width, height, image.pixels)?.into_raw(),
        TextureFormat::Rgba8 => RgbaImage::from_raw(width, height, image.pixels)?.into_raw(),
    };

    Some(TextureAsset {
        width,
        height,
        data,
        format,
    })
}
