use emx_subtitles::formats::srt;
use emx_subtitles::normalize::normalize_line_feeds;
use emx_subtitles::{Caption, CharsetDetector, CharsetError, Decoder, DetectedCharset, Normalizer};
use proptest::prelude::*;

/// Detector that trusts the bytes to be UTF-8
struct AssumeUtf8;

impl CharsetDetector for AssumeUtf8 {
    fn detect(&self, _bytes: &[u8]) -> Result<DetectedCharset, CharsetError> {
        Ok(DetectedCharset::new("UTF-8", 100.0))
    }
}

/// Detector that never has an opinion
struct Unsure;

impl CharsetDetector for Unsure {
    fn detect(&self, _bytes: &[u8]) -> Result<DetectedCharset, CharsetError> {
        Ok(DetectedCharset::new("", 0.0))
    }
}

fn caption_text() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[A-Za-zåäöÅÄÖ ,.!?-]{0,30}[A-Za-zåäö.!?]", 1..4)
}

proptest! {
    #[test]
    fn test_normalized_text_is_unchanged(text in "[^\r\u{feff}]{0,200}") {
        let out = Normalizer::with_detector(AssumeUtf8).normalize(text.as_bytes()).unwrap();
        prop_assert_eq!(out, text);
    }

    #[test]
    fn test_utf8_marker_is_stripped(text in "[^\r]{0,200}") {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(text.as_bytes());
        for out in [
            Normalizer::with_detector(AssumeUtf8).normalize(&bytes).unwrap(),
            Normalizer::with_detector(Unsure).normalize(&bytes).unwrap(),
        ] {
            prop_assert_eq!(&out, &text);
        }
    }

    #[test]
    fn test_lf_only_window_is_noop(text in "[^\r]{0,200}") {
        prop_assert_eq!(normalize_line_feeds(&text, 80), text);
    }

    #[test]
    fn test_cr_only_window_converts_everything(
        lines in prop::collection::vec("[a-z ]{16,20}", 5..10),
        tail in "[a-z\r\n]{0,100}",
    ) {
        let text = format!("{}\r{}", lines.join("\r"), tail);
        let out = normalize_line_feeds(&text, 80);
        prop_assert!(!out.contains('\r'));
        prop_assert_eq!(out.len(), text.len());
    }

    #[test]
    fn test_srt_caption_round_trip(
        start in 0u64..360_000_000,
        len in 0u64..10_000_000,
        text in caption_text(),
    ) {
        let caption = Caption::new(1, start, start + len, text);
        let parsed = srt::parse(&caption.as_srt()).unwrap();
        prop_assert_eq!(parsed.captions.len(), 1);
        prop_assert_eq!(&parsed.captions[0], &caption);
    }

    #[test]
    fn test_arbitrary_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        let decoder = Decoder::with_normalizer(Normalizer::with_detector(Unsure));
        let _ = decoder.decode(&bytes);
    }
}
