//! Error types for configuration loading and the external collaborators.
//!
//! Uses [`thiserror`] for ergonomic error derivation. [`FontMapError`] is the
//! only fatal error in the crate and converts to [`PdfError`].

use pagerecon_core::PdfError;
use thiserror::Error;

/// Error loading or validating a font substitution map.
#[derive(Debug, Error)]
pub enum FontMapError {
    /// Error reading the configuration file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration is not valid JSON or has the wrong shape.
    #[error("invalid font map: {0}")]
    Json(#[from] serde_json::Error),

    /// A pattern flagged as a regular expression does not compile.
    #[error("invalid pattern {pattern:?}: {source}")]
    Regex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A font entry names an entity table that is not defined.
    #[error("font entry {pattern:?} references unknown table {table:?}")]
    UnknownTable { pattern: String, table: String },

    /// An entity table maps a key to a value that is not a Unicode scalar.
    #[error("table {table:?} maps {key:?} to invalid code point {value:#x}")]
    InvalidCodePoint {
        table: String,
        key: String,
        value: u32,
    },
}

impl From<FontMapError> for PdfError {
    fn from(err: FontMapError) -> Self {
        match err {
            FontMapError::Io(e) => PdfError::IoError(e.to_string()),
            other => PdfError::ConfigError(other.to_string()),
        }
    }
}

/// Error reported by an [`ImageEncoder`](crate::ImageEncoder).
#[derive(Debug, Clone, PartialEq, Error)]
#[error("image encoding failed: {0}")]
pub struct ImageEncodeError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_map_error_io_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "fontmap.json");
        let err: FontMapError = io_err.into();
        assert!(matches!(err, FontMapError::Io(_)));
        let pdf_err: PdfError = err.into();
        assert!(matches!(pdf_err, PdfError::IoError(_)));
        assert!(pdf_err.to_string().contains("fontmap.json"));
    }

    #[test]
    fn test_font_map_error_json_to_config_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let pdf_err: PdfError = FontMapError::from(json_err).into();
        assert!(matches!(pdf_err, PdfError::ConfigError(_)));
    }

    #[test]
    fn test_unknown_table_message() {
        let err = FontMapError::UnknownTable {
            pattern: "Wingdings".to_string(),
            table: "dings".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "font entry \"Wingdings\" references unknown table \"dings\""
        );
    }

    #[test]
    fn test_regex_error_keeps_source() {
        let source = regex::Regex::new("(").unwrap_err();
        let err = FontMapError::Regex {
            pattern: "(".to_string(),
            source,
        };
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_image_encode_error_display() {
        let err = ImageEncodeError("unsupported filter JBIG2Decode".to_string());
        assert_eq!(
            err.to_string(),
            "image encoding failed: unsupported filter JBIG2Decode"
        );
    }
}
