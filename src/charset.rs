//! Statistical charset detection

use crate::error::CharsetError;

/// Verdict of a charset detector
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedCharset {
    /// Charset name as reported by the engine
    pub name: String,
    /// Confidence in the range 0..=100
    pub confidence: f32,
}

impl DetectedCharset {
    pub fn new(name: impl Into<String>, confidence: f32) -> Self {
        Self {
            name: name.into(),
            confidence: confidence.clamp(0.0, 100.0),
        }
    }

    /// Map the engine's name onto a charset we know how to decode
    pub fn charset(&self) -> Option<Charset> {
        Charset::from_name(&self.name)
    }
}

/// Charsets the normalizer decodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    /// ISO-8859-1 and its windows-1252 superset, decoded byte for code point
    Latin1,
    Utf16Be,
    Utf16Le,
    /// UTF-16 with the byte order left to the marker
    Utf16,
    /// UTF-8, including pure ASCII
    Utf8,
}

impl Charset {
    /// Resolve a detector-reported name, ignoring case
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "iso-8859-1" | "windows-1252" => Some(Charset::Latin1),
            "utf-16be" => Some(Charset::Utf16Be),
            "utf-16le" => Some(Charset::Utf16Le),
            "utf-16" => Some(Charset::Utf16),
            "utf-8" | "utf-8-sig" | "ascii" => Some(Charset::Utf8),
            _ => None,
        }
    }
}

/// Seam between the normalizer and the detection engine
pub trait CharsetDetector {
    fn detect(&self, bytes: &[u8]) -> Result<DetectedCharset, CharsetError>;
}

/// Default detector backed by the `chardet` crate.
///
/// Holds no state, so one value can serve any number of calls and threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatisticalDetector;

impl CharsetDetector for StatisticalDetector {
    fn detect(&self, bytes: &[u8]) -> Result<DetectedCharset, CharsetError> {
        if bytes.is_empty() {
            return Err(CharsetError::DetectionFailed("no bytes to inspect".to_string()));
        }

        let (name, confidence, _language) = chardet::detect(&bytes.to_vec());
        // chardet scores in 0..=1
        Ok(DetectedCharset::new(name, confidence * 100.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_charset_from_name() {
        assert_eq!(Charset::from_name("ISO-8859-1"), Some(Charset::Latin1));
        assert_eq!(Charset::from_name("Windows-1252"), Some(Charset::Latin1));
        assert_eq!(Charset::from_name("UTF-16BE"), Some(Charset::Utf16Be));
        assert_eq!(Charset::from_name("utf-16le"), Some(Charset::Utf16Le));
        assert_eq!(Charset::from_name("UTF-8-SIG"), Some(Charset::Utf8));
        assert_eq!(Charset::from_name("ascii"), Some(Charset::Utf8));
        assert_eq!(Charset::from_name("Shift_JIS"), None);
        assert_eq!(Charset::from_name(""), None);
    }

    #[test]
    fn test_confidence_is_clamped() {
        assert_eq!(DetectedCharset::new("UTF-8", 150.0).confidence, 100.0);
        assert_eq!(DetectedCharset::new("UTF-8", -1.0).confidence, 0.0);
    }

    #[test]
    fn test_empty_input_fails_detection() {
        let err = StatisticalDetector.detect(b"").unwrap_err();
        assert!(matches!(err, CharsetError::DetectionFailed(_)));
    }

    #[test]
    fn test_detect_plain_ascii() {
        let detected = StatisticalDetector
            .detect(b"1\n00:00:01,000 --> 00:00:02,000\nHello there\n")
            .unwrap();
        assert!((0.0..=100.0).contains(&detected.confidence));
    }
}
