use crate::cue::Cue;
use crate::discovery::file_name;
use crate::error::Error;
use crate::parser::{ParseOptions, Parser};

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// The subtitle formats understood by the parsers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubtitleFormat {
    Srt,
    Vtt,
    Ass,
    #[serde(rename = "sub")]
    MicroDvd,
}

impl SubtitleFormat {
    /// Maps a file extension, without the dot, to a format. Case is ignored.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "srt" => Some(SubtitleFormat::Srt),
            "vtt" | "webvtt" => Some(SubtitleFormat::Vtt),
            "ass" | "ssa" => Some(SubtitleFormat::Ass),
            "sub" => Some(SubtitleFormat::MicroDvd),
            _ => None,
        }
    }

    /// Detects the format from the extension of a path using either `/` or
    /// `\` as separator.
    pub fn from_path(path: &str) -> Option<Self> {
        let (stem, ext) = file_name(path).rsplit_once('.')?;
        if stem.is_empty() {
            return None;
        }
        Self::from_extension(ext)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            SubtitleFormat::Srt => "srt",
            SubtitleFormat::Vtt => "vtt",
            SubtitleFormat::Ass => "ass",
            SubtitleFormat::MicroDvd => "sub",
        }
    }

    pub fn parse(&self, input: &str, options: &ParseOptions) -> Vec<Cue> {
        Parser::new(*self).with_options(*options).parse(input)
    }
}

impl fmt::Display for SubtitleFormat {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{}", self.extension())
    }
}

impl FromStr for SubtitleFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().trim_start_matches('.');
        Self::from_extension(s)
            .or_else(|| (s.eq_ignore_ascii_case("microdvd")).then_some(SubtitleFormat::MicroDvd))
            .ok_or_else(|| Error::UnsupportedFormat(s.to_string()))
    }
}
