//! Error types for heightmesh.
//!
//! Structural invariants of the triangulation (half-edge symmetry, queue
//! bookkeeping) are enforced with assertions and never show up here. This
//! module only covers failures a caller can act on: unreadable inputs,
//! unwritable outputs and bad parameters.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`HeightmeshError`].
pub type Result<T> = std::result::Result<T, HeightmeshError>;

/// Errors that can occur while building, triangulating or exporting.
#[derive(Error, Debug)]
pub enum HeightmeshError {
    /// The height field has no samples.
    #[error("height field is empty ({width} x {height})")]
    EmptyHeightmap {
        /// Width in samples.
        width: usize,
        /// Height in samples.
        height: usize,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error loading a height field from file.
    #[error("failed to load height field from {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Error saving a mesh or image to file.
    #[error("failed to save {path}: {message}")]
    SaveError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl HeightmeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        HeightmeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let e = HeightmeshError::EmptyHeightmap { width: 0, height: 4 };
        assert_eq!(e.to_string(), "height field is empty (0 x 4)");

        let e = HeightmeshError::invalid_param("gamma", -1.0, "must be positive");
        assert_eq!(e.to_string(), "invalid parameter: gamma = -1 (must be positive)");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let e: HeightmeshError = io.into();
        assert!(matches!(e, HeightmeshError::Io(_)));
    }
}
