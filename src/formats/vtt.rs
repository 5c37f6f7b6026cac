//! WebVTT (`.vtt`)

use crate::subtitle::{clock, Subtitle};
use anyhow::{anyhow, bail, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;

const HEADER: &str = "WEBVTT";

static TIMING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^((?:\d+:)?\d{2}:\d{2}\.\d{3})\s+-->\s+((?:\d+:)?\d{2}:\d{2}\.\d{3})").unwrap()
});

/// `WEBVTT` on the first line
pub fn looks_like(text: &str) -> bool {
    let text = text.trim_start();
    match text.strip_prefix(HEADER) {
        Some(rest) => rest.is_empty() || rest.starts_with(&[' ', '\t', '\n'][..]),
        None => false,
    }
}

/// Parse WebVTT cues, skipping NOTE, STYLE and REGION blocks
pub fn parse(text: &str) -> Result<Subtitle> {
    if !looks_like(text) {
        bail!("missing {} header", HEADER);
    }

    let mut blocks = text.trim_start().split("\n\n").map(|b| b.trim_matches('\n'));
    // header block, may carry metadata lines
    blocks.next();

    let mut sub = Subtitle::new();
    for block in blocks.filter(|b| !b.trim().is_empty()) {
        let mut lines = block.lines();
        let Some(first) = lines.next() else { continue };
        if first.starts_with("NOTE") || first.starts_with("STYLE") || first.starts_with("REGION") {
            continue;
        }

        // optional cue identifier
        let timing = if first.contains("-->") {
            first
        } else {
            match lines.next() {
                Some(line) if line.contains("-->") => line,
                _ => {
                    log::debug!("skipping WebVTT block without timing: {:?}", first);
                    continue;
                }
            }
        };

        let caps = TIMING_REGEX
            .captures(timing.trim())
            .ok_or_else(|| anyhow!("bad WebVTT timing line {:?}", timing))?;
        let start = parse_time(&caps[1]).with_context(|| format!("in cue {:?}", timing))?;
        let end = parse_time(&caps[2]).with_context(|| format!("in cue {:?}", timing))?;

        let mut text_lines: Vec<String> = lines.map(|l| l.trim_end().to_string()).collect();
        if text_lines.is_empty() {
            text_lines.push(String::new());
        }
        sub.push(start, end, text_lines);
    }

    if sub.is_empty() {
        bail!("no WebVTT cues found");
    }
    Ok(sub)
}

/// `[HH:]MM:SS.mmm`
fn parse_time(s: &str) -> Result<Duration> {
    let (clock_part, millis) = s
        .split_once('.')
        .ok_or_else(|| anyhow!("missing milliseconds in {:?}", s))?;
    let fields = clock_part
        .split(':')
        .map(|f| f.parse::<u64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .with_context(|| format!("invalid timestamp {:?}", s))?;
    let millis = millis.parse::<u64>()?;

    match fields.as_slice() {
        [m, sec] => clock(0, *m, *sec, millis),
        [h, m, sec] => clock(*h, *m, *sec, millis),
        _ => bail!("invalid timestamp {:?}", s),
    }
}
