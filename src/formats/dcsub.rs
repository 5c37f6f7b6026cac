//! Interop digital cinema subtitles (`<DCSubtitle>` XML)

use super::sniff_window;
use crate::subtitle::{clock, Subtitle};
use anyhow::{anyhow, bail, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;

const ROOT_TAG: &str = "<DCSubtitle";

// Interop time units are 4 ms ticks
const MILLIS_PER_TICK: u64 = 4;

static SUBTITLE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<Subtitle\b([^>]*)>(.*?)</Subtitle>").unwrap());
static TEXT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<Text\b[^>]*>(.*?)</Text>").unwrap());
static TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

pub fn looks_like(text: &str) -> bool {
    sniff_window(text).contains(ROOT_TAG)
}

/// One caption per `<Subtitle>`, one line per `<Text>`
pub fn parse(text: &str) -> Result<Subtitle> {
    let mut sub = Subtitle::new();

    for caps in SUBTITLE_REGEX.captures_iter(text) {
        let attrs = &caps[1];
        let spot = attribute(attrs, "SpotNumber").unwrap_or("?");
        let time_in = attribute(attrs, "TimeIn")
            .ok_or_else(|| anyhow!("subtitle {} has no TimeIn", spot))?;
        let time_out = attribute(attrs, "TimeOut")
            .ok_or_else(|| anyhow!("subtitle {} has no TimeOut", spot))?;
        let start = parse_time(time_in).with_context(|| format!("subtitle {}", spot))?;
        let end = parse_time(time_out).with_context(|| format!("subtitle {}", spot))?;

        let mut lines: Vec<String> = TEXT_REGEX
            .captures_iter(&caps[2])
            .map(|t| unescape(TAG_REGEX.replace_all(&t[1], "").trim()))
            .collect();
        if lines.is_empty() {
            lines.push(String::new());
        }
        sub.push(start, end, lines);
    }

    if sub.is_empty() {
        bail!("no <Subtitle> elements found");
    }
    Ok(sub)
}

/// Value of `name="..."` (or single quoted) inside a start tag
fn attribute<'a>(attrs: &'a str, name: &str) -> Option<&'a str> {
    let mut rest = attrs;
    while let Some(pos) = rest.find(name) {
        let after = rest[pos + name.len()..].trim_start();
        let boundary = pos == 0 || rest[..pos].ends_with(char::is_whitespace);
        if let (true, Some(value)) = (boundary, after.strip_prefix('=')) {
            let value = value.trim_start();
            let quote = value.chars().next()?;
            if quote == '"' || quote == '\'' {
                let value = &value[1..];
                return value.find(quote).map(|end| &value[..end]);
            }
        }
        rest = &rest[pos + name.len()..];
    }
    None
}

/// `HH:MM:SS:ttt` in ticks, or `HH:MM:SS.mmm`
fn parse_time(s: &str) -> Result<Duration> {
    let s = s.trim();
    let (hms, millis) = if let Some((hms, frac)) = s.split_once('.') {
        if frac.is_empty() || frac.len() > 3 {
            bail!("invalid DCSub fraction {:?}", s);
        }
        // ".5" is half a second
        (hms, frac.parse::<u64>()? * 10u64.pow(3 - frac.len() as u32))
    } else {
        let (hms, ticks) = s
            .rsplit_once(':')
            .ok_or_else(|| anyhow!("invalid DCSub time {:?}", s))?;
        let millis = ticks
            .parse::<u64>()?
            .checked_mul(MILLIS_PER_TICK)
            .ok_or_else(|| anyhow!("DCSub time {:?} out of range", s))?;
        (hms, millis)
    };

    let parts = hms
        .split(':')
        .map(str::parse::<u64>)
        .collect::<std::result::Result<Vec<_>, _>>()
        .with_context(|| format!("invalid DCSub time {:?}", s))?;
    let [h, m, sec] = parts[..] else {
        bail!("invalid DCSub time {:?}", s);
    };
    clock(h, m, sec, millis)
}

fn unescape(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
