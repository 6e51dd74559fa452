//! Errors raised while turning a resource into a drawable

use std::io;

/// Result alias for decode operations
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Why a resource could not be decoded
///
/// Callers treat every variant as "no drawable available"; nothing here is
/// cached or retried.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// No asset is registered under this identifier
    #[error("resource {0} not found")]
    NotFound(u32),

    /// The vector document could not be parsed
    #[error("failed to parse vector resource {id}: {reason}")]
    Parse { id: u32, reason: String },

    /// The raster asset could not be decoded
    #[error("failed to decode raster resource {id}: {source}")]
    Image {
        id: u32,
        #[source]
        source: image::ImageError,
    },

    /// Reading the asset failed
    #[error("I/O error reading resource {id}: {source}")]
    Io {
        id: u32,
        #[source]
        source: io::Error,
    },
}

impl DecodeError {
    /// Identifier of the resource that failed
    pub fn resource_id(&self) -> u32 {
        match self {
            DecodeError::NotFound(id) => *id,
            DecodeError::Parse { id, .. }
            | DecodeError::Image { id, .. }
            | DecodeError::Io { id, .. } => *id,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DecodeError::NotFound(_))
    }
}
