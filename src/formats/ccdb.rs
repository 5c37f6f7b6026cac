//! Closed-caption capture dumps
//!
//! One caption per line, as `start<TAB>end<TAB>text` with SMPTE timecodes
//! (`HH:MM:SS:FF`, 25 frames per second). Lines that do not start with a
//! timecode pair continue the text of the caption above them.

use super::leading_lines;
use crate::subtitle::{clock, Subtitle};
use anyhow::{anyhow, bail, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;

const FRAMES_PER_SECOND: u64 = 25;

static TIMECODE_PAIR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}:\d{2}:\d{2}:\d{2}\t\d{2}:\d{2}:\d{2}:\d{2}(\t|$)").unwrap());

fn starts_with_timecodes(line: &str) -> bool {
    TIMECODE_PAIR_REGEX.is_match(line)
}

/// The first non-blank line opens with two tab separated timecodes
pub fn looks_like(text: &str) -> bool {
    leading_lines(text).next().is_some_and(starts_with_timecodes)
}

pub fn parse(text: &str) -> Result<Subtitle> {
    let mut sub = Subtitle::new();
    let mut current: Option<(Duration, Duration, Vec<String>)> = None;

    for (line_num, line) in text.lines().enumerate() {
        let line = line.trim_end();
        if line.trim().is_empty() {
            continue;
        }

        if starts_with_timecodes(line) {
            if let Some((start, end, lines)) = current.take() {
                sub.push(start, end, lines);
            }
            current = Some(
                parse_caption_line(line).with_context(|| format!("bad capture line {}", line_num + 1))?,
            );
        } else if let Some((_, _, ref mut lines)) = current {
            lines.push(line.trim().to_string());
        } else {
            log::debug!("ignoring capture text before first timecode: {:?}", line);
        }
    }

    if let Some((start, end, lines)) = current.take() {
        sub.push(start, end, lines);
    }

    if sub.is_empty() {
        bail!("no timecoded captions found");
    }
    Ok(sub)
}

fn parse_caption_line(line: &str) -> Result<(Duration, Duration, Vec<String>)> {
    let fields: Vec<&str> = line.splitn(3, '\t').collect();
    let [start, end, text] = fields[..] else {
        bail!("expected start, end and text, found {} fields", fields.len());
    };
    Ok((parse_timecode(start)?, parse_timecode(end)?, vec![text.trim().to_string()]))
}

/// `HH:MM:SS:FF`
fn parse_timecode(s: &str) -> Result<Duration> {
    let parts = s
        .split(':')
        .map(str::parse::<u64>)
        .collect::<std::result::Result<Vec<_>, _>>()
        .with_context(|| format!("invalid timecode {:?}", s))?;
    let [h, m, sec, frames] = parts[..] else {
        return Err(anyhow!("invalid timecode {:?}", s));
    };
    if frames >= FRAMES_PER_SECOND {
        bail!("frame {} out of range in {:?}", frames, s);
    }
    clock(h, m, sec, frames * 1000 / FRAMES_PER_SECOND)
}
