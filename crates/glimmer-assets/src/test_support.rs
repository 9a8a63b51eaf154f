//! In-memory binary glTF fixtures for tests.

use std::io::Cursor;

use image::{DynamicImage, GrayAlphaImage, ImageFormat, LumaA, Rgb, RgbImage, Rgba, RgbaImage};
use serde_json::{json, Value};

use crate::glb::{CHUNK_BIN, CHUNK_JSON, MAGIC, VERSION};

/// Frame a JSON chunk and binary chunks into a container, padding each chunk
/// to four bytes.
pub(crate) fn assemble(json: &[u8], bins: &[&[u8]]) -> Vec<u8> {
    let mut chunks = Vec::new();

    let mut push_chunk = |kind: u32, data: &[u8], pad: u8| {
        let mut data = data.to_vec();
        while data.len() % 4 != 0 {
            data.push(pad);
        }
        chunks.extend_from_slice(&(data.len() as u32).to_le_bytes());
        chunks.extend_from_slice(&kind.to_le_bytes());
        chunks.extend_from_slice(&data);
    };

    push_chunk(CHUNK_JSON, json, b' ');
    for bin in bins {
        push_chunk(CHUNK_BIN, bin, 0);
    }

    let mut bytes = Vec::with_capacity(12 + chunks.len());
    bytes.extend_from_slice(&MAGIC.to_le_bytes());
    bytes.extend_from_slice(&VERSION.to_le_bytes());
    bytes.extend_from_slice(&((12 + chunks.len()) as u32).to_le_bytes());
    bytes.extend_from_slice(&chunks);
    bytes
}

/// A primitive JSON object.
pub(crate) fn primitive(
    attributes: &[(&str, usize)],
    indices: Option<usize>,
    material: Option<usize>,
) -> Value {
    let attributes: serde_json::Map<String, Value> = attributes
        .iter()
        .map(|(name, accessor)| (name.to_string(), json!(accessor)))
        .collect();

    let mut value = json!({ "attributes": attributes });
    if let Some(indices) = indices {
        value["indices"] = json!(indices);
    }
    if let Some(material) = material {
        value["material"] = json!(material);
    }
    value
}

/// Accumulates a single binary buffer plus the metadata pointing into it.
#[derive(Default)]
pub(crate) struct GlbBuilder {
    bin: Vec<u8>,
    views: Vec<Value>,
    accessors: Vec<Value>,
    images: Vec<Value>,
    textures: Vec<Value>,
    materials: Vec<Value>,
    meshes: Vec<Value>,
}

impl GlbBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// One mesh, one unindexed triangle with positions only.
    pub fn triangle() -> Self {
        let mut builder = Self::new();
        let positions = builder.vec3_f32(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        builder.mesh(vec![primitive(&[("POSITION", positions)], None, None)]);
        builder
    }

    /// Append bytes as a new buffer view, aligned to four bytes.
    pub fn raw_view(&mut self, bytes: &[u8]) -> usize {
        while self.bin.len() % 4 != 0 {
            self.bin.push(0);
        }
        let offset = self.bin.len();
        self.bin.extend_from_slice(bytes);
        self.views.push(json!({
            "buffer": 0,
            "byteOffset": offset,
            "byteLength": bytes.len()
        }));
        self.views.len() - 1
    }

    pub fn raw_view_value(&mut self, value: Value) -> usize {
        self.views.push(value);
        self.views.len() - 1
    }

    pub fn raw_accessor(&mut self, value: Value) -> usize {
        self.accessors.push(value);
        self.accessors.len() - 1
    }

    fn accessor(&mut self, bytes: &[u8], component_type: u32, count: usize, shape: &str) -> usize {
        let view = self.raw_view(bytes);
        self.raw_accessor(json!({
            "bufferView": view,
            "componentType": component_type,
            "count": count,
            "type": shape
        }))
    }

    pub fn vec3_f32(&mut self, data: &[[f32; 3]]) -> usize {
        let bytes: Vec<u8> = data.iter().flatten().flat_map(|f| f.to_le_bytes()).collect();
        self.accessor(&bytes, 5126, data.len(), "VEC3")
    }

    pub fn vec2_f32(&mut self, data: &[[f32; 2]]) -> usize {
        let bytes: Vec<u8> = data.iter().flatten().flat_map(|f| f.to_le_bytes()).collect();
        self.accessor(&bytes, 5126, data.len(), "VEC2")
    }

    pub fn indices_u8(&mut self, data: &[u8]) -> usize {
        self.accessor(data, 5121, data.len(), "SCALAR")
    }

    pub fn indices_u16(&mut self, data: &[u16]) -> usize {
        let bytes: Vec<u8> = data.iter().flat_map(|i| i.to_le_bytes()).collect();
        self.accessor(&bytes, 5123, data.len(), "SCALAR")
    }

    pub fn indices_u32(&mut self, data: &[u32]) -> usize {
        let bytes: Vec<u8> = data.iter().flat_map(|i| i.to_le_bytes()).collect();
        self.accessor(&bytes, 5125, data.len(), "SCALAR")
    }

    /// Embed a solid-color PNG with 2, 3 or 4 channels.
    pub fn png_image(&mut self, width: u32, height: u32, channels: u8) -> usize {
        let image = match channels {
            2 => DynamicImage::ImageLumaA8(GrayAlphaImage::from_pixel(width, height, LumaA([128, 255]))),
            3 => DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([255, 0, 0]))),
            _ => DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([0, 255, 0, 255]))),
        };

        let mut png = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .expect("encode png fixture");

        let view = self.raw_view(&png);
        self.raw_image(json!({ "bufferView": view, "mimeType": "image/png" }))
    }

    pub fn raw_image(&mut self, value: Value) -> usize {
        self.images.push(value);
        self.images.len() - 1
    }

    pub fn texture(&mut self, source: usize) -> usize {
        self.textures.push(json!({ "source": source }));
        self.textures.len() - 1
    }

    pub fn material(&mut self, base_color_texture: Option<usize>) -> usize {
        let value = match base_color_texture {
            Some(index) => json!({
                "pbrMetallicRoughness": { "baseColorTexture": { "index": index } }
            }),
            None => json!({ "pbrMetallicRoughness": {} }),
        };
        self.materials.push(value);
        self.materials.len() - 1
    }

    pub fn mesh(&mut self, primitives: Vec<Value>) -> usize {
        self.meshes.push(json!({ "primitives": primitives }));
        self.meshes.len() - 1
    }

    pub fn json(&self) -> Value {
        let mut root = json!({
            "asset": { "version": "2.0", "generator": "glimmer tests" },
            "bufferViews": self.views,
            "accessors": self.accessors,
            "images": self.images,
            "textures": self.textures,
            "materials": self.materials,
            "meshes": self.meshes,
        });
        if self.has_buffer() {
            root["buffers"] = json!([{ "byteLength": self.bin.len() }]);
        }
        root
    }

    pub fn build(&self) -> Vec<u8> {
        let json = serde_json::to_vec(&self.json()).expect("serialize fixture json");
        if self.has_buffer() {
            assemble(&json, &[&self.bin])
        } else {
            assemble(&json, &[])
        }
    }

    fn has_buffer(&self) -> bool {
        !self.bin.is_empty() || !self.views.is_empty()
    }

    /// Parse the built container into a document.
    pub fn document(&self) -> crate::document::Document {
        crate::glb::parse(&self.build()).expect("fixture parses")
    }
}
