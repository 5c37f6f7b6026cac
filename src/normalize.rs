//! Byte stream to normalized UTF-8 text
//!
//! Decoding order:
//! 1. Ask the [`CharsetDetector`] for a verdict
//! 2. Above the confidence threshold, decode as the reported charset
//!    (unknown charsets are an error)
//! 3. Otherwise sniff byte order marks, UTF-8 validity and Swedish Latin-1 letters
//! 4. Canonicalize line feeds to `\n`
//!
//! The Latin-1 heuristic only counts `å ä ö Å Ä Ö`, so Latin-1 text in other
//! languages falls through to the verbatim path when the detector is unsure.

use crate::charset::{Charset, CharsetDetector, StatisticalDetector};
use crate::error::CharsetError;
use encoding_rs::{UTF_16BE, UTF_16LE};
use log::{debug, trace, warn};

pub const UTF8_MARKER: [u8; 3] = [0xEF, 0xBB, 0xBF];
pub const UTF16_BE_MARKER: [u8; 2] = [0xFE, 0xFF];
pub const UTF16_LE_MARKER: [u8; 2] = [0xFF, 0xFE];

// å ä ö Ä Å Ö
const SWEDISH_LATIN1: [u8; 6] = [0xE5, 0xE4, 0xF6, 0xC4, 0xC5, 0xD6];

/// Tuning knobs for [`Normalizer`]
#[derive(Debug, Clone)]
pub struct NormalizerConfig {
    /// Detector verdicts at or below this score are ignored
    pub confidence_threshold: f32,
    /// Number of leading characters inspected to pick the line feed policy
    pub line_feed_window: usize,
    /// Share of Swedish letters (in percent) that marks a stream as Latin-1
    pub latin1_min_percent: f64,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 50.0,
            line_feed_window: 80,
            latin1_min_percent: 1.0,
        }
    }
}

/// Converts raw bytes of unknown encoding to `\n`-terminated UTF-8 text
#[derive(Debug, Clone, Default)]
pub struct Normalizer<D = StatisticalDetector> {
    detector: D,
    config: NormalizerConfig,
}

impl Normalizer {
    /// Create a normalizer with the statistical detector and default config
    pub fn new() -> Self {
        Self::default()
    }
}

impl<D: CharsetDetector> Normalizer<D> {
    /// Create a normalizer around a custom detector
    pub fn with_detector(detector: D) -> Self {
        Self {
            detector,
            config: NormalizerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: NormalizerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Decode `bytes` and canonicalize its line feeds
    pub fn normalize(&self, bytes: &[u8]) -> Result<String, CharsetError> {
        let detected = self.detector.detect(bytes)?;
        debug!(
            "charset detector reported {:?} with confidence {:.0}",
            detected.name, detected.confidence
        );

        let mut decoded = None;
        if detected.confidence > self.config.confidence_threshold {
            let charset = detected.charset().ok_or_else(|| CharsetError::UnsupportedCharset {
                charset: detected.name.clone(),
                confidence: detected.confidence,
            })?;
            decoded = decode_as(charset, bytes);
        }

        let text = match decoded {
            Some(text) => text,
            None => self.sniff_and_decode(bytes),
        };

        Ok(normalize_line_feeds(&text, self.config.line_feed_window))
    }

    /// Fallback when the detector is unsure or its UTF-8 verdict did not hold
    fn sniff_and_decode(&self, bytes: &[u8]) -> String {
        if bytes.starts_with(&UTF16_BE_MARKER) {
            debug!("fallback: UTF-16BE marker");
            decode_utf16(&bytes[2..], true)
        } else if bytes.starts_with(&UTF16_LE_MARKER) {
            debug!("fallback: UTF-16LE marker");
            decode_utf16(&bytes[2..], false)
        } else if bytes.starts_with(&UTF8_MARKER) {
            debug!("fallback: UTF-8 marker");
            String::from_utf8_lossy(&bytes[3..]).into_owned()
        } else if let Ok(text) = std::str::from_utf8(bytes) {
            debug!("fallback: valid UTF-8");
            text.to_string()
        } else if looks_like_latin1(bytes, self.config.latin1_min_percent) {
            debug!("fallback: Swedish letters suggest Latin-1");
            latin1_to_utf8(bytes)
        } else {
            warn!("no encoding matched, keeping {} bytes verbatim", bytes.len());
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}

/// Decode with the default normalizer
pub fn convert_to_utf8(bytes: &[u8]) -> Result<String, CharsetError> {
    Normalizer::new().normalize(bytes)
}

/// Decode as a charset the detector is confident about.
/// `None` means the verdict did not hold and the byte sniffing fallback should run.
fn decode_as(charset: Charset, bytes: &[u8]) -> Option<String> {
    match charset {
        Charset::Latin1 => Some(latin1_to_utf8(bytes)),
        Charset::Utf16Be => Some(decode_utf16(strip_marker(bytes, &UTF16_BE_MARKER), true)),
        Charset::Utf16Le => Some(decode_utf16(strip_marker(bytes, &UTF16_LE_MARKER), false)),
        Charset::Utf16 => {
            if bytes.starts_with(&UTF16_BE_MARKER) {
                Some(decode_utf16(&bytes[2..], true))
            } else if bytes.starts_with(&UTF16_LE_MARKER) {
                Some(decode_utf16(&bytes[2..], false))
            } else {
                None
            }
        }
        Charset::Utf8 => {
            if bytes.starts_with(&UTF8_MARKER) {
                Some(String::from_utf8_lossy(&bytes[3..]).into_owned())
            } else {
                std::str::from_utf8(bytes).ok().map(str::to_string)
            }
        }
    }
}

fn strip_marker<'a>(bytes: &'a [u8], marker: &[u8]) -> &'a [u8] {
    bytes.strip_prefix(marker).unwrap_or(bytes)
}

/// Map every byte to the code point of the same value
pub fn latin1_to_utf8(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Decode UTF-16 code units without marker handling.
/// Unpaired surrogates and a dangling odd byte become U+FFFD.
pub fn decode_utf16(bytes: &[u8], big_endian: bool) -> String {
    let encoding = if big_endian { UTF_16BE } else { UTF_16LE };
    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    if had_errors {
        warn!("malformed {} sequence replaced", encoding.name());
    }
    text.into_owned()
}

/// True when Swedish Latin-1 letters make up at least `min_percent` of the bytes
pub fn looks_like_latin1(bytes: &[u8], min_percent: f64) -> bool {
    if bytes.is_empty() {
        return false;
    }
    let swedish = bytes.iter().filter(|&&b| SWEDISH_LATIN1.contains(&b)).count();
    let pct = swedish as f64 / bytes.len() as f64 * 100.0;
    trace!("{:.2}% Swedish Latin-1 letters", pct);
    pct >= min_percent
}

/// Canonicalize line feeds, picking the policy from the first `window` characters.
///
/// A window with `\r` but no `\n` means classic Mac line feeds, and every `\r`
/// in the text is replaced. Otherwise only `\r\n` pairs are collapsed.
pub fn normalize_line_feeds(text: &str, window: usize) -> String {
    let (mut cr, mut lf) = (0usize, 0usize);
    for c in text.chars().take(window) {
        match c {
            '\r' => cr += 1,
            '\n' => lf += 1,
            _ => {}
        }
    }

    if lf == 0 && cr > 0 {
        trace!("classic Mac line feeds");
        return text.replace('\r', "\n");
    }
    text.replace("\r\n", "\n")
}
