//! Format parsers.
//!
//! Every parser is total: it takes the whole text of a file and returns the
//! cues it could make sense of. Units that do not match the grammar of the
//! format are skipped, so a partially broken file still yields its valid
//! cues, numbered 1..N in file order.

pub mod ass;
pub mod microdvd;
pub mod srt;
pub mod vtt;

use crate::cue::Cue;
use crate::error::{Error, Result};
use crate::format::SubtitleFormat;
use crate::timecode::DEFAULT_FRAME_RATE;

use once_cell::sync::Lazy;
use regex::Regex;

/// Knobs for formats that cannot be parsed from the text alone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParseOptions {
    frame_rate: f64,
    declared_frame_rate: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            frame_rate: DEFAULT_FRAME_RATE,
            declared_frame_rate: false,
        }
    }
}

impl ParseOptions {
    /// MicroDVD frame rate. Files carry no rate of their own, so this one is
    /// used unless [`ParseOptions::use_declared_frame_rate`] is set.
    pub fn with_frame_rate(mut self, frame_rate: f64) -> Result<Self> {
        if !frame_rate.is_finite() || frame_rate <= 0.0 {
            return Err(Error::InvalidFrameRate(frame_rate));
        }
        self.frame_rate = frame_rate;
        Ok(self)
    }

    /// Trust a leading `{1}{1}23.976` line in MicroDVD files over the
    /// configured rate. The line itself is never a cue.
    pub fn use_declared_frame_rate(mut self, declared: bool) -> Self {
        self.declared_frame_rate = declared;
        self
    }

    pub fn frame_rate(&self) -> f64 {
        self.frame_rate
    }

    pub fn uses_declared_frame_rate(&self) -> bool {
        self.declared_frame_rate
    }
}

/// A parser bound to one format.
#[derive(Debug, Clone, Copy)]
pub struct Parser {
    format: SubtitleFormat,
    options: ParseOptions,
}

impl Parser {
    pub fn new(format: SubtitleFormat) -> Self {
        Self {
            format,
            options: ParseOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    pub fn format(&self) -> SubtitleFormat {
        self.format
    }

    pub fn parse(&self, input: &str) -> Vec<Cue> {
        let input = strip_bom(input);
        match self.format {
            SubtitleFormat::Srt => srt::parse(input),
            SubtitleFormat::Vtt => vtt::parse(input),
            SubtitleFormat::Ass => ass::parse(input),
            SubtitleFormat::MicroDvd => microdvd::parse(input, &self.options),
        }
    }
}

pub(crate) fn strip_bom(input: &str) -> &str {
    input.strip_prefix('\u{FEFF}').unwrap_or(input)
}

/// Groups lines into blocks separated by one or more blank lines.
pub(crate) fn blocks(input: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();
    for line in input.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

/// Position of the timing line in a block. It is either the first line or
/// follows a single index/identifier line.
pub(crate) fn timing_line_position(block: &[&str]) -> Option<usize> {
    block.iter().take(2).position(|line| line.contains("-->"))
}

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"</?[A-Za-z][^>]*>").unwrap());
static BRACE_OVERRIDE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\\[^}]*\}").unwrap());

/// Removes `<i>`, `<font color=..>` style tags and `{\an8}` overrides, which
/// show up in SRT files produced by ASS converters.
pub(crate) fn strip_markup(line: &str) -> String {
    let line = HTML_TAG.replace_all(line, "");
    BRACE_OVERRIDE.replace_all(&line, "").into_owned()
}
