//! Caption data structures

use std::fmt;
use std::time::Duration;

/// One timed subtitle unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caption {
    /// 1-based position in the subtitle
    pub seq: usize,
    pub start: Duration,
    pub end: Duration,
    /// Text lines, without line terminators
    pub text: Vec<String>,
}

impl Caption {
    /// Create a caption from millisecond offsets
    pub fn new(seq: usize, start_ms: u64, end_ms: u64, text: Vec<String>) -> Self {
        Self {
            seq,
            start: Duration::from_millis(start_ms),
            end: Duration::from_millis(end_ms),
            text,
        }
    }

    /// Render as an SRT block, including the trailing blank line
    pub fn as_srt(&self) -> String {
        let mut out = format!(
            "{}\n{} --> {}\n",
            self.seq,
            format_srt_time(self.start),
            format_srt_time(self.end)
        );
        for line in &self.text {
            out.push_str(line);
            out.push('\n');
        }
        out.push('\n');
        out
    }

    /// Render as a WebVTT cue, including the trailing blank line
    pub fn as_vtt(&self) -> String {
        let mut out = format!(
            "{} --> {}\n",
            format_vtt_time(self.start),
            format_vtt_time(self.end)
        );
        for line in &self.text {
            out.push_str(line);
            out.push('\n');
        }
        out.push('\n');
        out
    }
}

/// Captions in source order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subtitle {
    pub captions: Vec<Caption>,
}

impl Subtitle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a caption, numbering it after the ones already present
    pub fn push(&mut self, start: Duration, end: Duration, text: Vec<String>) {
        if end < start {
            log::warn!(
                "caption {} ends before it starts ({:?} < {:?})",
                self.captions.len() + 1,
                end,
                start
            );
        }
        self.captions.push(Caption {
            seq: self.captions.len() + 1,
            start,
            end,
            text,
        });
    }

    pub fn len(&self) -> usize {
        self.captions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.captions.is_empty()
    }

    pub fn as_srt(&self) -> String {
        self.captions.iter().map(Caption::as_srt).collect()
    }

    pub fn as_vtt(&self) -> String {
        let mut out = String::from("WEBVTT\n\n");
        for caption in &self.captions {
            out.push_str(&caption.as_vtt());
        }
        out
    }
}

impl fmt::Display for Subtitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_srt())
    }
}

fn split_time(t: Duration) -> (u128, u128, u128, u128) {
    let total_millis = t.as_millis();
    let millis = total_millis % 1000;
    let total_seconds = total_millis / 1000;
    let secs = total_seconds % 60;
    let total_minutes = total_seconds / 60;
    (total_minutes / 60, total_minutes % 60, secs, millis)
}

/// Format as `HH:MM:SS,mmm`
pub fn format_srt_time(t: Duration) -> String {
    let (h, m, s, ms) = split_time(t);
    format!("{:02}:{:02}:{:02},{:03}", h, m, s, ms)
}

/// Format as `HH:MM:SS.mmm`
pub fn format_vtt_time(t: Duration) -> String {
    let (h, m, s, ms) = split_time(t);
    format!("{:02}:{:02}:{:02}.{:03}", h, m, s, ms)
}

/// Build a duration from clock fields, failing when it does not fit in `u64` milliseconds
pub(crate) fn clock(hours: u64, minutes: u64, seconds: u64, millis: u64) -> anyhow::Result<Duration> {
    hours
        .checked_mul(60)
        .and_then(|m| m.checked_add(minutes))
        .and_then(|m| m.checked_mul(60))
        .and_then(|s| s.checked_add(seconds))
        .and_then(|s| s.checked_mul(1000))
        .and_then(|ms| ms.checked_add(millis))
        .map(Duration::from_millis)
        .ok_or_else(|| {
            anyhow::anyhow!(
                "timestamp {}:{:02}:{:02}.{:03} out of range",
                hours,
                minutes,
                seconds,
                millis
            )
        })
}
