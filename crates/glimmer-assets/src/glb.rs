//! Binary glTF container framing.
//!
//! Layout: a 12-byte header (magic, version, total length) followed by
//! length-framed chunks. The first chunk holds the JSON metadata, every BIN
//! chunk after it is one raw buffer section.

use std::io::Cursor;

use gltf::json;
use image::{DynamicImage, ImageFormat, ImageReader};
use tracing::debug;

use crate::config::DecodeConfig;
use crate::document::{to_usize, Buffer, Document, Image};
use crate::error::ParseError;

pub const MAGIC: u32 = 0x4654_6C67;
pub const VERSION: u32 = 2;
pub const CHUNK_JSON: u32 = 0x4E4F_534A;
pub const CHUNK_BIN: u32 = 0x004E_4942;

const HEADER_LEN: usize = 12;
const CHUNK_HEADER_LEN: usize = 8;

/// Split a binary container into its structural document and raw buffers,
/// using the default decode configuration.
pub fn parse(bytes: &[u8]) -> Result<Document, ParseError> {
    parse_with(bytes, &DecodeConfig::default())
}

/// Split a binary container into its structural document and raw buffers.
///
/// Nothing partial is returned: any framing, metadata or embedded image error
/// fails the whole parse. Images beyond `config.max_texture_dimension` are
/// sized but not decoded.
pub fn parse_with(bytes: &[u8], config: &DecodeConfig) -> Result<Document, ParseError> {
    let magic = read_u32(bytes, 0)?;
    if magic != MAGIC {
        return Err(ParseError::InvalidMagic(magic));
    }

    let version = read_u32(bytes, 4)?;
    if version != VERSION {
        return Err(ParseError::UnsupportedVersion(version));
    }

    let total = read_u32(bytes, 8)? as usize;
    if total > bytes.len() {
        return Err(ParseError::Truncated {
            needed: total,
            available: bytes.len(),
        });
    }
    let bytes = &bytes[..total];

    let mut chunks = Chunks {
        bytes,
        offset: HEADER_LEN,
    };

    let (kind, json_chunk) = chunks.next_chunk()?.ok_or(ParseError::Truncated {
        needed: HEADER_LEN + CHUNK_HEADER_LEN,
        available: bytes.len(),
    })?;
    if kind != CHUNK_JSON {
        return Err(ParseError::MissingJsonChunk(kind));
    }

    let mut bins = Vec::new();
    while let Some((kind, data)) = chunks.next_chunk()? {
        if kind == CHUNK_BIN {
            bins.push(data);
        } else {
            debug!("Skipping unknown chunk type 0x{:08x}", kind);
        }
    }

    let root: json::Root = json::deserialize::from_slice(json_chunk)?;
    debug!(
        "Container v{} ({}): {} buffers, {} meshes, {} images",
        root.asset.version,
        root.asset.generator.as_deref().unwrap_or("unknown generator"),
        root.buffers.len(),
        root.meshes.len(),
        root.images.len()
    );

    let buffers = bind_buffers(&root.buffers, &bins)?;
    let mut document = Document {
        root,
        buffers,
        images: Vec::new(),
    };

    let images = document
        .root
        .images
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            let image = decode_embedded_image(&document, raw, config)
                .map_err(|reason| ParseError::Image { index, reason })?;
            debug!(
                "Image {}: {}x{}, {} channels",
                index, image.width, image.height, image.channels
            );
            Ok(image)
        })
        .collect::<Result<Vec<_>, ParseError>>()?;
    document.images = images;

    Ok(document)
}

fn read_u32(bytes: &[u8], offset: usize) -> Result<u32, ParseError> {
    let end = offset + 4;
    bytes
        .get(offset..end)
        .and_then(|b| b.try_into().ok())
        .map(u32::from_le_bytes)
        .ok_or(ParseError::Truncated {
            needed: end,
            available: bytes.len(),
        })
}

struct Chunks<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Chunks<'a> {
    fn next_chunk(&mut self) -> Result<Option<(u32, &'a [u8])>, ParseError> {
        if self.offset >= self.bytes.len() {
            return Ok(None);
        }

        let length = read_u32(self.bytes, self.offset)? as usize;
        let kind = read_u32(self.bytes, self.offset + 4)?;
        let start = self.offset + CHUNK_HEADER_LEN;
        let end = start.checked_add(length).ok_or(ParseError::Truncated {
            needed: usize::MAX,
            available: self.bytes.len(),
        })?;

        let data = self.bytes.get(start..end).ok_or(ParseError::Truncated {
            needed: end,
            available: self.bytes.len(),
        })?;

        self.offset = end;
        Ok(Some((kind, data)))
    }
}

/// Bind each uri-less buffer to the next BIN chunk, in order.
fn bind_buffers(raw: &[json::Buffer], bins: &[&[u8]]) -> Result<Vec<Buffer>, ParseError> {
    let mut bins = bins.iter();

    raw.iter()
        .enumerate()
        .map(|(index, buffer)| {
            if buffer.uri.is_some() {
                return Err(ParseError::ExternalBuffer(index));
            }
            let chunk = bins.next().ok_or(ParseError::MissingBinaryChunk(index))?;
            let byte_length = to_usize(buffer.byte_length.0);
            let data = chunk.get(..byte_length).ok_or(ParseError::Truncated {
                needed: byte_length,
                available: chunk.len(),
            })?;
            Ok(Buffer {
                data: data.to_vec(),
            })
        })
        .collect()
}

fn decode_embedded_image(
    document: &Document,
    raw: &json::Image,
    config: &DecodeConfig,
) -> Result<Image, String> {
    if raw.uri.is_some() {
        return Err("images referenced by uri are not supported".into());
    }

    let view_index = raw
        .buffer_view
        .as_ref()
        .map(|index| index.value())
        .ok_or_else(|| String::from("image has neither a buffer view nor a uri"))?;
    let view = document
        .root
        .buffer_views
        .get(view_index)
        .ok_or_else(|| format!("buffer view {view_index} does not exist"))?;
    let buffer = document
        .buffers
        .get(view.buffer.value())
        .ok_or_else(|| format!("buffer {} does not exist", view.buffer.value()))?;
    let offset = view.byte_offset.as_ref().map_or(0, |o| to_usize(o.0));
    let bytes = offset
        .checked_add(to_usize(view.byte_length.0))
        .and_then(|end| buffer.data.get(offset..end))
        .ok_or_else(|| format!("buffer view {view_index} is out of range"))?;

    let mime_type = raw.mime_type.as_ref().map(|m| m.0.as_str());
    let name = raw.name.clone();

    let (width, height) = reader(bytes, mime_type)?
        .into_dimensions()
        .map_err(|e| e.to_string())?;
    if !config.accepts_texture(width, height) {
        debug!("Image {}x{} exceeds the texture limit, not decoding", width, height);
        return Ok(Image {
            name,
            width,
            height,
            channels: 0,
            pixels: Vec::new(),
        });
    }

    let decoded = reader(bytes, mime_type)?.decode().map_err(|e| e.to_string())?;
    let (channels, pixels) = into_8bit_pixels(decoded);

    Ok(Image {
        name,
        width,
        height,
        channels,
        pixels,
    })
}

fn reader<'b>(bytes: &'b [u8], mime_type: Option<&str>) -> Result<ImageReader<Cursor<&'b [u8]>>, String> {
    match mime_type.and_then(ImageFormat::from_mime_type) {
        Some(format) => Ok(ImageReader::with_format(Cursor::new(bytes), format)),
        None => ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| e.to_string()),
    }
}

/// Keep the source channel count, narrowing deeper formats to 8 bits.
fn into_8bit_pixels(image: DynamicImage) -> (u8, Vec<u8>) {
    match image {
        DynamicImage::ImageLuma8(buf) => (1, buf.into_raw()),
        DynamicImage::ImageLumaA8(buf) => (2, buf.into_raw()),
        DynamicImage::ImageRgb8(buf) => (3, buf.into_raw()),
        DynamicImage::ImageRgba8(buf) => (4, buf.into_raw()),
        other => match other.color().channel_count() {
            1 => (1, other.to_luma8().into_raw()),
            2 => (2, other.to_luma_alpha8().into_raw()),
            3 => (3, other.to_rgb8().into_raw()),
            _ => (4, other.to_rgba8().into_raw()),
        },
    }
}
