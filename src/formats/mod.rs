//! Format signatures and structural parsers
//!
//! Signatures only look at a bounded prefix of the text. They are not
//! mutually exclusive, so [`SIGNATURES`] is evaluated in order and the first
//! hit wins:
//!
//! 1. closed-caption capture
//! 2. SSA/ASS
//! 3. DCSub
//! 4. SRT
//! 5. WebVTT

pub mod ccdb;
pub mod dcsub;
pub mod srt;
pub mod ssa;
pub mod vtt;

use crate::subtitle::Subtitle;
use std::fmt;

/// Bytes of normalized text a signature may inspect
pub const SNIFF_WINDOW: usize = 1024;

/// Leading lines a line-oriented signature may inspect
pub(crate) const SNIFF_LINES: usize = 8;

/// Text subtitle dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubtitleFormat {
    /// Tab separated SMPTE timecode capture
    CcdbCapture,
    Ssa,
    DcSub,
    Srt,
    WebVtt,
}

impl SubtitleFormat {
    /// Run this dialect's structural parser
    pub fn parse(self, text: &str) -> anyhow::Result<Subtitle> {
        match self {
            SubtitleFormat::CcdbCapture => ccdb::parse(text),
            SubtitleFormat::Ssa => ssa::parse(text),
            SubtitleFormat::DcSub => dcsub::parse(text),
            SubtitleFormat::Srt => srt::parse(text),
            SubtitleFormat::WebVtt => vtt::parse(text),
        }
    }

    /// Cheap structural check for this dialect
    pub fn looks_like(self, text: &str) -> bool {
        match self {
            SubtitleFormat::CcdbCapture => ccdb::looks_like(text),
            SubtitleFormat::Ssa => ssa::looks_like(text),
            SubtitleFormat::DcSub => dcsub::looks_like(text),
            SubtitleFormat::Srt => srt::looks_like(text),
            SubtitleFormat::WebVtt => vtt::looks_like(text),
        }
    }
}

impl fmt::Display for SubtitleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SubtitleFormat::CcdbCapture => "CCDB capture",
            SubtitleFormat::Ssa => "SSA",
            SubtitleFormat::DcSub => "DCSub",
            SubtitleFormat::Srt => "SRT",
            SubtitleFormat::WebVtt => "WebVTT",
        };
        f.write_str(name)
    }
}

/// A signature predicate paired with the parser it selects
pub struct Signature {
    pub format: SubtitleFormat,
    looks_like: fn(&str) -> bool,
    parse: fn(&str) -> anyhow::Result<Subtitle>,
}

impl Signature {
    pub fn matches(&self, text: &str) -> bool {
        (self.looks_like)(text)
    }

    pub fn parse(&self, text: &str) -> anyhow::Result<Subtitle> {
        (self.parse)(text)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signature").field("format", &self.format).finish()
    }
}

/// Dispatch table in priority order
pub static SIGNATURES: [Signature; 5] = [
    Signature {
        format: SubtitleFormat::CcdbCapture,
        looks_like: ccdb::looks_like,
        parse: ccdb::parse,
    },
    Signature {
        format: SubtitleFormat::Ssa,
        looks_like: ssa::looks_like,
        parse: ssa::parse,
    },
    Signature {
        format: SubtitleFormat::DcSub,
        looks_like: dcsub::looks_like,
        parse: dcsub::parse,
    },
    Signature {
        format: SubtitleFormat::Srt,
        looks_like: srt::looks_like,
        parse: srt::parse,
    },
    Signature {
        format: SubtitleFormat::WebVtt,
        looks_like: vtt::looks_like,
        parse: vtt::parse,
    },
];

/// First dialect whose signature matches, if any
pub fn detect_format(text: &str) -> Option<SubtitleFormat> {
    SIGNATURES
        .iter()
        .find(|sig| sig.matches(text))
        .map(|sig| sig.format)
}

/// Leading slice of `text`, at most [`SNIFF_WINDOW`] bytes, cut on a char boundary
pub(crate) fn sniff_window(text: &str) -> &str {
    if text.len() <= SNIFF_WINDOW {
        return text;
    }
    let mut end = SNIFF_WINDOW;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Leading non-blank lines of the sniff window
pub(crate) fn leading_lines(text: &str) -> impl Iterator<Item = &str> {
    sniff_window(text)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(SNIFF_LINES)
}
