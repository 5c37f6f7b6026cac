//! SubRip (`.srt`)

use super::leading_lines;
use crate::subtitle::{clock, Subtitle};
use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::time::Duration;

static TIMING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+):(\d{1,2}):(\d{1,2})[,.](\d{1,3})\s*-->\s*(\d+):(\d{1,2}):(\d{1,2})[,.](\d{1,3})")
        .unwrap()
});

fn is_sequence_number(line: &str) -> bool {
    !line.is_empty() && line.bytes().all(|b| b.is_ascii_digit())
}

fn is_timing_line(line: &str) -> bool {
    TIMING_REGEX.is_match(line.trim())
}

/// A sequence number followed by a timing line
pub fn looks_like(text: &str) -> bool {
    let mut lines = leading_lines(text);
    match (lines.next(), lines.next()) {
        (Some(seq), Some(timing)) => is_sequence_number(seq) && is_timing_line(timing),
        _ => false,
    }
}

/// Parse SRT text into captions numbered from 1
pub fn parse(text: &str) -> Result<Subtitle> {
    let lines: Vec<&str> = text.lines().collect();
    let mut sub = Subtitle::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i].trim();
        if line.is_empty() {
            i += 1;
            continue;
        }

        // The sequence number is optional, the timing line is not
        if is_sequence_number(line) && lines.get(i + 1).is_some_and(|l| is_timing_line(l)) {
            i += 1;
        }
        let Some(caps) = TIMING_REGEX.captures(lines[i].trim()) else {
            log::debug!("skipping SRT block without timing at line {}", i + 1);
            i = skip_block(&lines, i);
            continue;
        };
        let (start, end) =
            parse_timing(&caps).with_context(|| format!("bad SRT timing at line {}", i + 1))?;
        i += 1;

        let mut text_lines = Vec::new();
        while i < lines.len() && !lines[i].trim().is_empty() {
            // A missing blank line before the next block
            if is_sequence_number(lines[i].trim())
                && lines.get(i + 1).is_some_and(|l| is_timing_line(l))
            {
                break;
            }
            text_lines.push(lines[i].trim_end().to_string());
            i += 1;
        }
        if text_lines.is_empty() {
            text_lines.push(String::new());
        }
        sub.push(start, end, text_lines);
    }

    if sub.is_empty() {
        return Err(anyhow!("no SRT captions found"));
    }
    Ok(sub)
}

fn skip_block(lines: &[&str], mut i: usize) -> usize {
    while i < lines.len() && !lines[i].trim().is_empty() {
        i += 1;
    }
    i
}

fn parse_timing(caps: &Captures) -> Result<(Duration, Duration)> {
    Ok((parse_time(caps, 1)?, parse_time(caps, 5)?))
}

fn parse_time(caps: &Captures, first: usize) -> Result<Duration> {
    let field = |n: usize| -> Result<u64> {
        caps[first + n]
            .parse::<u64>()
            .map_err(|e| anyhow!("invalid number {:?}: {}", &caps[first + n], e))
    };
    // "5" after the comma is half a second
    let frac = &caps[first + 3];
    let millis = field(3)? * 10u64.pow(3 - frac.len() as u32);
    clock(field(0)?, field(1)?, field(2)?, millis)
}
