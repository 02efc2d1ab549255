use crate::cue::{Cue, RawCue};
use crate::parser::ParseOptions;
use crate::processor::normalise;
use crate::timecode::frames_to_seconds;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static FRAME_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\{(\d+)\}\{(\d+)\}(.*)$").unwrap());
static STYLE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{[A-Za-z]:[^}]*\}").unwrap());

struct FrameLine<'a> {
    start: u64,
    end: u64,
    text: &'a str,
}

/// Parses MicroDVD `{start}{end}text` lines. Frames are converted with the
/// frame rate from `options`. A leading `{1}{1}23.976` line is dropped, and
/// its rate only used when the options ask for it.
pub fn parse(input: &str, options: &ParseOptions) -> Vec<Cue> {
    let lines: Vec<FrameLine> = input.lines().filter_map(frame_line).collect();

    let mut frame_rate = options.frame_rate();
    let mut body = &lines[..];
    if let Some((first, rest)) = lines.split_first() {
        if let Some(declared) = declared_frame_rate(first) {
            body = rest;
            if options.uses_declared_frame_rate() {
                frame_rate = declared;
            } else {
                debug!(declared, frame_rate, "Ignoring declared frame rate");
            }
        }
    }

    normalise(body.iter().map(|line| {
        RawCue::new(
            frames_to_seconds(line.start, frame_rate),
            frames_to_seconds(line.end, frame_rate),
            line.text.split('|').map(clean_line),
        )
    }))
}

fn frame_line(line: &str) -> Option<FrameLine<'_>> {
    let caps = FRAME_LINE.captures(line.trim())?;
    Some(FrameLine {
        start: caps.get(1)?.as_str().parse().ok()?,
        end: caps.get(2)?.as_str().parse().ok()?,
        text: caps.get(3)?.as_str(),
    })
}

/// A `{1}{1}25` or `{0}{0}25` line carries the frame rate instead of text.
fn declared_frame_rate(line: &FrameLine) -> Option<f64> {
    if line.start != line.end || line.start > 1 {
        return None;
    }
    let rate: f64 = line.text.trim().parse().ok()?;
    (rate.is_finite() && rate > 0.0).then_some(rate)
}

/// Drops `{y:i}` style codes and the leading `/` that marks an italic line.
fn clean_line(line: &str) -> String {
    let line = STYLE_CODE.replace_all(line, "");
    let line = line.trim_start();
    line.strip_prefix('/').unwrap_or(line).to_string()
}
