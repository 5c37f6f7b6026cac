//! SubStation Alpha / Advanced SubStation Alpha (`.ssa`, `.ass`)

use super::sniff_window;
use crate::subtitle::{clock, Subtitle};
use anyhow::{anyhow, bail, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;

const SCRIPT_INFO: &str = "[script info]";
const EVENTS: &str = "[events]";

// ASS v4+ order, used when the section has no Format line
const DEFAULT_FORMAT: [&str; 10] = [
    "layer", "start", "end", "style", "name", "marginl", "marginr", "marginv", "effect", "text",
];

static OVERRIDE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{[^}]*\}").unwrap());

/// A `[Script Info]` section header near the top
pub fn looks_like(text: &str) -> bool {
    sniff_window(text)
        .lines()
        .any(|line| line.trim().eq_ignore_ascii_case(SCRIPT_INFO))
}

/// Parse the `Dialogue:` lines of the `[Events]` section
pub fn parse(text: &str) -> Result<Subtitle> {
    let mut in_events = false;
    let mut seen_events = false;
    let mut format: Vec<String> = DEFAULT_FORMAT.iter().map(|s| s.to_string()).collect();
    let mut sub = Subtitle::new();

    for (line_num, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.starts_with('[') && line.ends_with(']') {
            in_events = line.eq_ignore_ascii_case(EVENTS);
            seen_events |= in_events;
            continue;
        }
        if !in_events {
            continue;
        }

        let Some((key, value)) = line.split_once(':') else { continue };
        match key.trim().to_ascii_lowercase().as_str() {
            "format" => {
                format = value.split(',').map(|f| f.trim().to_ascii_lowercase()).collect();
            }
            "dialogue" => {
                let (start, end, lines) = parse_dialogue(value, &format)
                    .with_context(|| format!("bad Dialogue at line {}", line_num + 1))?;
                sub.push(start, end, lines);
            }
            // Comment, Picture, Sound, Movie, Command
            _ => {}
        }
    }

    if !seen_events {
        bail!("missing [Events] section");
    }
    Ok(sub)
}

fn parse_dialogue(value: &str, format: &[String]) -> Result<(Duration, Duration, Vec<String>)> {
    // Text is last and may itself contain commas
    let fields: Vec<&str> = value.splitn(format.len(), ',').map(str::trim).collect();
    if fields.len() != format.len() {
        bail!("expected {} fields, found {}", format.len(), fields.len());
    }

    let start = parse_time(field(format, &fields, "start")?)?;
    let end = parse_time(field(format, &fields, "end")?)?;
    let lines = split_text(field(format, &fields, "text")?);
    Ok((start, end, lines))
}

fn field<'a>(format: &[String], fields: &[&'a str], name: &str) -> Result<&'a str> {
    format
        .iter()
        .position(|f| f == name)
        .map(|i| fields[i])
        .ok_or_else(|| anyhow!("Format line has no {:?} field", name))
}

/// Drop `{...}` override blocks and split on `\N` / `\n`
fn split_text(text: &str) -> Vec<String> {
    let plain = OVERRIDE_REGEX.replace_all(text, "");
    plain
        .replace("\\N", "\n")
        .replace("\\n", "\n")
        .replace("\\h", "\u{a0}")
        .split('\n')
        .map(|l| l.trim().to_string())
        .collect()
}

/// `H:MM:SS.cc`
fn parse_time(s: &str) -> Result<Duration> {
    let (hms, frac) = s
        .split_once('.')
        .ok_or_else(|| anyhow!("invalid SSA time {:?}", s))?;
    let parts = hms
        .split(':')
        .map(|p| p.trim().parse::<u64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .with_context(|| format!("invalid SSA time {:?}", s))?;
    let [h, m, sec] = parts[..] else {
        bail!("invalid SSA time {:?}", s);
    };

    // centiseconds, tolerate milliseconds
    let millis = match frac.len() {
        1 => frac.parse::<u64>()? * 100,
        2 => frac.parse::<u64>()? * 10,
        3 => frac.parse::<u64>()?,
        _ => bail!("invalid SSA fraction {:?}", s),
    };
    clock(h, m, sec, millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "[Script Info]
Title: sample
ScriptType: v4.00+

[V4+ Styles]
Format: Name, Fontname, Fontsize
Style: Default,Arial,20

[Events]
Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text
Comment: 0,0:00:00.00,0:00:01.00,Default,,0,0,0,,ignored
Dialogue: 0,0:00:01.50,0:00:04.00,Default,,0,0,0,,{\\i1}Hello{\\i0}, world\\Nsecond line
Dialogue: 0,1:02:03.04,1:02:05.00,Default,,0,0,0,,Later
";

    #[test]
    fn test_looks_like() {
        assert!(looks_like(SAMPLE));
        assert!(looks_like("\n[script info]\n"));
        assert!(!looks_like("Script Info\n"));
    }

    #[test]
    fn test_parse_sample() {
        let sub = parse(SAMPLE).unwrap();
        assert_eq!(sub.len(), 2);
        assert_eq!(sub.captions[0].start, Duration::from_millis(1_500));
        assert_eq!(sub.captions[0].end, Duration::from_millis(4_000));
        assert_eq!(sub.captions[0].text, vec!["Hello, world", "second line"]);
        assert_eq!(sub.captions[1].start, clock(1, 2, 3, 40).unwrap());
    }

    #[test]
    fn test_ssa_v4_format_order() {
        let text = "[Script Info]\n\n[Events]\nFormat: Marked, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\nDialogue: Marked=0,0:00:01.00,0:00:02.00,*Default,NTP,0000,0000,0000,!Effect,Hi\n";
        let sub = parse(text).unwrap();
        assert_eq!(sub.captions[0].text, vec!["Hi"]);
    }

    #[test]
    fn test_default_format_without_format_line() {
        let sub = parse("[Events]\nDialogue: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,Hi\n").unwrap();
        assert_eq!(sub.len(), 1);
    }

    #[test]
    fn test_missing_events_section() {
        let err = parse("[Script Info]\nTitle: x\n").unwrap_err();
        assert!(err.to_string().contains("[Events]"));
    }

    #[test]
    fn test_huge_hours_is_error() {
        let err = parse("[Events]\nDialogue: 0,99999999999999999:00:00.00,0:00:01.00,Default,,0,0,0,,x\n")
            .unwrap_err();
        assert!(format!("{:#}", err).contains("out of range"));
    }

    #[test]
    fn test_short_dialogue_is_error() {
        let err = parse("[Events]\nDialogue: 0,0:00:01.00\n").unwrap_err();
        assert!(format!("{:#}", err).contains("expected 10 fields"));
    }
}
