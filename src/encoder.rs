//! Subtitle encoder

use crate::subtitle::Subtitle;
use anyhow::Result;

/// Textual formats a [`Subtitle`] can be written as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Srt,
    Vtt,
}

/// Encodes captions into a textual subtitle format
pub struct Encoder {
    format: OutputFormat,
}

impl Encoder {
    /// Create an SRT encoder
    pub fn new() -> Self {
        Self {
            format: OutputFormat::Srt,
        }
    }

    /// Select the output format
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Encode a subtitle to a string
    pub fn encode(&self, subtitle: &Subtitle) -> String {
        match self.format {
            OutputFormat::Srt => subtitle.as_srt(),
            OutputFormat::Vtt => subtitle.as_vtt(),
        }
    }

    /// Encode a subtitle directly to a writer
    pub fn encode_to_writer<W: std::io::Write>(&self, subtitle: &Subtitle, mut writer: W) -> Result<()> {
        let encoded = self.encode(subtitle);
        writer.write_all(encoded.as_bytes())?;
        Ok(())
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}
