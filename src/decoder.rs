//! Subtitle decoder: normalize, sniff, dispatch

use crate::charset::{CharsetDetector, StatisticalDetector};
use crate::error::{CharsetError, Result, SubtitleError};
use crate::formats::{SubtitleFormat, SIGNATURES};
use crate::normalize::Normalizer;
use crate::subtitle::Subtitle;
use log::debug;

/// Decodes raw subtitle bytes of unknown encoding and format
#[derive(Debug, Clone, Default)]
pub struct Decoder<D = StatisticalDetector> {
    normalizer: Normalizer<D>,
}

impl Decoder {
    /// Create a decoder with the default normalizer
    pub fn new() -> Self {
        Self::default()
    }
}

impl<D: CharsetDetector> Decoder<D> {
    /// Create a decoder around a configured normalizer
    pub fn with_normalizer(normalizer: Normalizer<D>) -> Self {
        Self { normalizer }
    }

    /// Decode a subtitle file
    pub fn decode(&self, bytes: &[u8]) -> Result<Subtitle> {
        let text = self.normalizer.normalize(bytes)?;
        self.decode_str(&text)
    }

    /// Dispatch text that is already normalized
    pub fn decode_str(&self, text: &str) -> Result<Subtitle> {
        let Some(signature) = SIGNATURES.iter().find(|sig| sig.matches(text)) else {
            debug!("no subtitle signature matched {} bytes of text", text.len());
            return Err(SubtitleError::UnrecognizedFormat);
        };

        debug!("text looks like {}", signature.format);
        signature.parse(text).map_err(|source| SubtitleError::Format {
            format: signature.format,
            source,
        })
    }

    /// Normalize and report the matching format without parsing it
    pub fn detect(&self, bytes: &[u8]) -> std::result::Result<Option<SubtitleFormat>, CharsetError> {
        let text = self.normalizer.normalize(bytes)?;
        Ok(crate::formats::detect_format(&text))
    }

    /// Whether `bytes` match any known text subtitle signature
    pub fn looks_like_text_subtitle(&self, bytes: &[u8]) -> std::result::Result<bool, CharsetError> {
        Ok(self.detect(bytes)?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charset::DetectedCharset;
    use std::time::Duration;

    struct Fixed(&'static str, f32);

    impl CharsetDetector for Fixed {
        fn detect(&self, _bytes: &[u8]) -> std::result::Result<DetectedCharset, CharsetError> {
            Ok(DetectedCharset::new(self.0, self.1))
        }
    }

    fn utf8_decoder() -> Decoder<Fixed> {
        Decoder::with_normalizer(Normalizer::with_detector(Fixed("UTF-8", 99.0)))
    }

    #[test]
    fn test_decode_srt() {
        let sub = utf8_decoder()
            .decode(b"1\r\n00:00:01,000 --> 00:00:02,000\r\nHello\r\n\r\n")
            .unwrap();
        assert_eq!(sub.len(), 1);
        assert_eq!(sub.captions[0].text, vec!["Hello"]);
        assert_eq!(sub.captions[0].end, Duration::from_secs(2));
    }

    #[test]
    fn test_hybrid_goes_to_ssa() {
        let text = "1\n00:00:01,000 --> 00:00:02,000\nfrom srt\n\n[Script Info]\n\n[Events]\nDialogue: 0,0:00:05.00,0:00:06.00,Default,,0,0,0,,from ssa\n";
        let sub = utf8_decoder().decode_str(text).unwrap();
        assert_eq!(sub.len(), 1);
        assert_eq!(sub.captions[0].text, vec!["from ssa"]);
    }

    #[test]
    fn test_unrecognized_format() {
        let err = utf8_decoder().decode(b"hello world\n").unwrap_err();
        assert!(matches!(err, SubtitleError::UnrecognizedFormat));
    }

    #[test]
    fn test_binary_is_unrecognized() {
        let decoder = Decoder::with_normalizer(Normalizer::with_detector(Fixed("", 0.0)));
        let binary = [0x00, 0x9f, 0x92, 0x96, 0x01, 0xff, 0x10, 0x80, 0x7f, 0x00];
        assert!(matches!(
            decoder.decode(&binary),
            Err(SubtitleError::UnrecognizedFormat)
        ));
    }

    #[test]
    fn test_structural_error_is_wrapped() {
        // Matches the SSA signature but has no events
        let err = utf8_decoder().decode(b"[Script Info]\nTitle: x\n").unwrap_err();
        match err {
            SubtitleError::Format { format, source } => {
                assert_eq!(format, SubtitleFormat::Ssa);
                assert!(source.to_string().contains("[Events]"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_timestamp_overflow_is_wrapped() {
        let err = utf8_decoder()
            .decode(b"1\n99999999999999999:00:00,000 --> 00:00:01,000\nx\n")
            .unwrap_err();
        assert!(matches!(
            err,
            SubtitleError::Format { format: SubtitleFormat::Srt, .. }
        ));
    }

    #[test]
    fn test_unsupported_charset_is_wrapped() {
        let decoder = Decoder::with_normalizer(Normalizer::with_detector(Fixed("GB18030", 95.0)));
        let err = decoder.decode(b"anything").unwrap_err();
        assert!(matches!(
            err,
            SubtitleError::Encoding(CharsetError::UnsupportedCharset { .. })
        ));
        assert!(decoder.looks_like_text_subtitle(b"anything").is_err());
    }

    #[test]
    fn test_looks_like_text_subtitle() {
        let decoder = utf8_decoder();
        assert!(decoder.looks_like_text_subtitle(b"WEBVTT\n\n00:01.000 --> 00:02.000\nx\n").unwrap());
        assert!(!decoder.looks_like_text_subtitle(b"plain text\n").unwrap());
        assert_eq!(
            decoder.detect(b"[Script Info]\n").unwrap(),
            Some(SubtitleFormat::Ssa)
        );
    }
}
