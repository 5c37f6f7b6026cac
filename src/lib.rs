//! # emx-subtitles
//!
//! Text subtitle decoding for files of unknown encoding and unknown format.
//!
//! ## Pipeline
//!
//! ```text
//! raw bytes -> Normalizer -> UTF-8 text with \n line feeds -> signature table -> parser -> Subtitle
//! ```
//!
//! ## Encoding Detection
//!
//! [`Normalizer`] asks a [`CharsetDetector`] for a verdict. Above the
//! confidence threshold (50 by default) the reported charset is decoded:
//! - `ISO-8859-1` / `windows-1252` → each byte is one code point
//! - `UTF-16BE` / `UTF-16LE` → marker stripped, code units decoded
//! - `UTF-8` → marker stripped, or passed through if already valid
//! - anything else → [`CharsetError::UnsupportedCharset`]
//!
//! Otherwise the bytes are sniffed directly: UTF-16 markers, UTF-8 marker,
//! valid UTF-8, Swedish Latin-1 letters (`å ä ö Å Ä Ö` making up at least 1%
//! of the bytes), and finally the raw bytes as they are.
//!
//! Line feeds are canonicalized from the first 80 characters only: `\r` with
//! no `\n` there means every `\r` becomes `\n`, otherwise `\r\n` becomes `\n`.
//!
//! ## Format Detection Rules
//!
//! Signatures are evaluated in order, first match wins:
//! 1. Closed-caption capture: `HH:MM:SS:FF<TAB>HH:MM:SS:FF` on the first line
//! 2. SSA/ASS: a `[Script Info]` line
//! 3. DCSub: a `<DCSubtitle` element
//! 4. SRT: a sequence number followed by a `-->` timing line
//! 5. WebVTT: a `WEBVTT` header
//!
//! ## Example
//!
//! ```
//! let sub = emx_subtitles::parse(b"1\r\n00:00:01,000 --> 00:00:02,000\r\nHello\r\n").unwrap();
//! assert_eq!(sub.captions[0].as_srt(), "1\n00:00:01,000 --> 00:00:02,000\nHello\n\n");
//! ```

pub mod charset;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod formats;
pub mod normalize;
pub mod subtitle;

pub use charset::{Charset, CharsetDetector, DetectedCharset, StatisticalDetector};
pub use decoder::Decoder;
pub use encoder::{Encoder, OutputFormat};
pub use error::{CharsetError, Result, SubtitleError};
pub use formats::{detect_format, SubtitleFormat};
pub use normalize::{convert_to_utf8, Normalizer, NormalizerConfig};
pub use subtitle::{Caption, Subtitle};

use std::path::Path;

/// Decode a subtitle file of unknown encoding and format
pub fn parse(bytes: &[u8]) -> Result<Subtitle> {
    Decoder::new().decode(bytes)
}

/// Whether `bytes` look like one of the supported text subtitle formats
pub fn looks_like_text_subtitle(bytes: &[u8]) -> std::result::Result<bool, CharsetError> {
    Decoder::new().looks_like_text_subtitle(bytes)
}

/// Read `path` and check it with [`looks_like_text_subtitle`]
pub fn looks_like_text_subtitle_file(path: impl AsRef<Path>) -> Result<bool> {
    let data = std::fs::read(path)?;
    Ok(looks_like_text_subtitle(&data)?)
}
