//! Recoverable anomalies recorded during a load.

use std::fmt;

use tracing::warn;

use crate::builder::SkipReason;
use crate::error::ResolveError;
use crate::material::TextureIssue;

/// Where in the document an anomaly occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Site {
    Image(usize),
    Primitive { mesh: usize, primitive: usize },
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Site::Image(index) => write!(f, "image {index}"),
            Site::Primitive { mesh, primitive } => write!(f, "mesh {mesh} primitive {primitive}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiagnosticKind {
    #[error("primitive skipped: {0}")]
    Skipped(SkipReason),

    #[error("primitive failed: {0}")]
    Failed(ResolveError),

    #[error("{attribute} ignored: {error}")]
    AttributeIgnored {
        attribute: String,
        error: ResolveError,
    },

    #[error("unsupported image format with {channels} channels")]
    UnsupportedChannels { channels: u8 },

    #[error("image is {width}x{height}, larger than the {limit} texel limit")]
    TextureTooLarge { width: u32, height: u32, limit: u32 },

    #[error(transparent)]
    Texture(TextureIssue),
}

impl DiagnosticKind {
    /// Whether the anomaly dropped the primitive rather than degrading it.
    pub fn drops_primitive(&self) -> bool {
        matches!(self, DiagnosticKind::Skipped(_) | DiagnosticKind::Failed(_))
    }
}

/// A single recorded anomaly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub site: Site,
    pub kind: DiagnosticKind,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.site, self.kind)
    }
}

/// Ordered log of anomalies for one load. Every entry is also emitted as a
/// warning.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, site: Site, kind: DiagnosticKind) {
        let diagnostic = Diagnostic { site, kind };
        warn!("{}", diagnostic);
        self.entries.push(diagnostic);
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries that degraded output without dropping a primitive.
    pub fn warning_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|d| !d.kind.drops_primitive())
            .count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }
}
