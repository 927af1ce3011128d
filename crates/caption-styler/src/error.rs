use std::path::PathBuf;
use strum_macros::{AsRefStr, Display};
use thiserror::Error;

pub type CaptionResult<T> = std::result::Result<T, CaptionError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum DecorationPool {
    Emoji,
    Hashtag,
}

#[derive(Error, Debug)]
pub enum CaptionError {
    #[error("captioning failed: {reason}")]
    Captioning { reason: String },

    #[error("generation failed for style {style} at index {index}: {source:#}")]
    Generation {
        style: String,
        index: usize,
        #[source]
        source: anyhow::Error,
    },

    #[error("style {style} has {available} {pool} entries, at least 2 are required{}", .index.map(|i| format!(" (index {})", i)).unwrap_or_default())]
    Decoration {
        style: String,
        index: Option<usize>,
        pool: DecorationPool,
        available: usize,
    },

    #[error("failed to read catalog {}: {source}", .path.display())]
    CatalogRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog {}: {source}", .path.display())]
    CatalogParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl CaptionError {
    pub fn is_generation(&self) -> bool {
        matches!(self, Self::Generation { .. })
    }

    pub fn is_decoration(&self) -> bool {
        matches!(self, Self::Decoration { .. })
    }

    /// Attach the batch iteration index to a decoration error.
    pub(crate) fn at_index(self, at: usize) -> Self {
        match self {
            Self::Decoration {
                style,
                pool,
                available,
                ..
            } => Self::Decoration {
                style,
                index: Some(at),
                pool,
                available,
            },
            other => other,
        }
    }
}
