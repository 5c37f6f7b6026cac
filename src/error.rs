//! Error types

use crate::formats::SubtitleFormat;
use thiserror::Error;

/// Errors raised while turning raw bytes into normalized text
#[derive(Debug, Error)]
pub enum CharsetError {
    /// The charset detector could not produce a verdict
    #[error("failed to detect character type: {0}")]
    DetectionFailed(String),

    /// The detector is confident about a charset we do not decode
    #[error("unhandled charset {charset:?} (confidence {confidence:.0})")]
    UnsupportedCharset { charset: String, confidence: f32 },
}

/// Errors raised by [`crate::parse`] and [`crate::Decoder`]
#[derive(Debug, Error)]
pub enum SubtitleError {
    #[error("parse: failed to convert to utf8: {0}")]
    Encoding(#[from] CharsetError),

    #[error("parse: unrecognized subtitle type")]
    UnrecognizedFormat,

    /// A structural parser rejected the text
    #[error("parse: {format} parser failed")]
    Format {
        format: SubtitleFormat,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SubtitleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_error_has_parse_context() {
        let err = SubtitleError::from(CharsetError::DetectionFailed("empty input".into()));
        assert_eq!(
            err.to_string(),
            "parse: failed to convert to utf8: failed to detect character type: empty input"
        );
    }

    #[test]
    fn test_format_error_keeps_source() {
        let err = SubtitleError::Format {
            format: SubtitleFormat::Ssa,
            source: anyhow::anyhow!("missing [Events] section"),
        };
        assert_eq!(err.to_string(), "parse: SSA parser failed");
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "missing [Events] section");
    }

    #[test]
    fn test_unsupported_charset_message() {
        let err = CharsetError::UnsupportedCharset {
            charset: "Shift_JIS".into(),
            confidence: 99.0,
        };
        assert_eq!(err.to_string(), "unhandled charset \"Shift_JIS\" (confidence 99)");
    }
}
