use std::path::PathBuf;

use gltf::json::accessor::{ComponentType, Type};

/// Errors that abort a whole load.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("asset not found: {0}")]
    NotFound(PathBuf),

    #[error("resource '{0}' is not registered")]
    ResourceNotFound(String),

    #[error("I/O error loading '{0}': {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to parse container: {0}")]
    Parse(#[from] ParseError),
}

/// Malformed container framing or structural metadata.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("invalid magic 0x{0:08x}, expected binary glTF")]
    InvalidMagic(u32),

    #[error("unsupported container version {0}")]
    UnsupportedVersion(u32),

    #[error("truncated container: needed {needed} bytes, {available} available")]
    Truncated { needed: usize, available: usize },

    #[error("first chunk must be JSON, found chunk type 0x{0:08x}")]
    MissingJsonChunk(u32),

    #[error("buffer {0} has no binary chunk to bind to")]
    MissingBinaryChunk(usize),

    #[error("buffer {0} references an external uri, only embedded buffers are supported")]
    ExternalBuffer(usize),

    #[error("malformed structural metadata: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image {index}: {reason}")]
    Image { index: usize, reason: String },
}

/// Failure to produce a typed view for one accessor. Local to a primitive.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("accessor {0} does not exist")]
    MissingAccessor(usize),

    #[error("accessor {0} has no buffer view")]
    NoBufferView(usize),

    #[error("accessor {accessor} references missing buffer view {view}")]
    MissingBufferView { accessor: usize, view: usize },

    #[error("buffer view {view} references missing buffer {buffer}")]
    MissingBuffer { view: usize, buffer: usize },

    #[error("accessor {0} has an unknown component type or element type")]
    UnknownFormat(usize),

    #[error("byte stride {stride} is smaller than element size {element_size}")]
    InvalidStride { stride: usize, element_size: usize },

    #[error("accessor {accessor} reads {required} bytes but only {available} are available")]
    OutOfBounds {
        accessor: usize,
        required: usize,
        available: usize,
    },

    #[error("expected {expected_type:?} {expected_shape:?} data, found {found_type:?} {found_shape:?}")]
    UnexpectedFormat {
        expected_type: ComponentType,
        expected_shape: Type,
        found_type: ComponentType,
        found_shape: Type,
    },

    #[error("unsupported index type {0:?}")]
    UnsupportedIndexType(ComponentType),

    #[error("{attribute} has {found} elements but POSITION has {expected}")]
    CountMismatch {
        attribute: String,
        expected: usize,
        found: usize,
    },
}
