//! Error types for reading theme documents.
//!
//! Resolution itself never fails: malformed rules degrade to permissive
//! defaults. Errors only surface when raw theme text cannot be read or
//! deserialized into the document shape.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading raw theme documents.
#[derive(Debug, Error)]
pub enum ThemeError {
    /// The text did not deserialize into a theme document.
    #[error("failed to parse theme{}: {message}", display_path(.path))]
    Parse {
        /// Source file, when the text came from disk.
        path: Option<PathBuf>,
        /// Message from the JSON/YAML deserializer.
        message: String,
    },

    /// A theme file could not be read.
    #[error("failed to read theme {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file extension is not one of the supported theme formats.
    #[error("unsupported theme file extension: {}", .path.display())]
    UnsupportedExtension { path: PathBuf },

    /// No theme is registered under the requested name.
    #[error("theme not found: {name}")]
    NotFound { name: String },
}

impl ThemeError {
    pub(crate) fn parse(path: Option<PathBuf>, err: impl std::fmt::Display) -> Self {
        ThemeError::Parse {
            path,
            message: err.to_string(),
        }
    }
}

fn display_path(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" {}", p.display()))
        .unwrap_or_default()
}

/// Result type for theme loading operations.
pub type Result<T> = std::result::Result<T, ThemeError>;
