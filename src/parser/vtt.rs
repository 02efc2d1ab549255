use crate::cue::{Cue, RawCue};
use crate::parser::{blocks, timing_line_position};
use crate::processor::normalise;
use crate::timecode::{timing_line, DOT_SEPARATOR};

use once_cell::sync::Lazy;
use regex::Regex;

/// Blocks that carry no cue and are skipped whole.
const NON_CUE_BLOCKS: &[&str] = &["NOTE", "STYLE", "REGION"];

/// Parses WebVTT text. Cue identifiers and cue settings are ignored.
pub fn parse(input: &str) -> Vec<Cue> {
    let body = skip_header(input);
    normalise(
        blocks(body)
            .iter()
            .filter(|block| !is_non_cue_block(block))
            .filter_map(|block| subtitle(block)),
    )
}

/// Drops the `WEBVTT` signature line. Header metadata that follows it has no
/// timing line and falls out with the other non-cue blocks.
fn skip_header(input: &str) -> &str {
    let trimmed = input.trim_start();
    if trimmed.starts_with("WEBVTT") {
        trimmed.find('\n').map_or("", |at| &trimmed[at + 1..])
    } else {
        input
    }
}

fn is_non_cue_block(block: &[&str]) -> bool {
    let first = block[0].trim_start();
    NON_CUE_BLOCKS.iter().any(|kind| {
        first
            .strip_prefix(kind)
            .map_or(false, |rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
    })
}

fn subtitle(block: &[&str]) -> Option<RawCue> {
    let at = timing_line_position(block)?;
    let (start, end, _settings) = timing_line(block[at], DOT_SEPARATOR)?;
    let text = block[at + 1..].iter().map(|line| clean_text(line));
    Some(RawCue::new(start, end, text))
}

static CUE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"</?[A-Za-z0-9:.][^>]*>").unwrap());

/// Strips voice, class and inline timestamp tags and decodes the entities
/// WebVTT requires escaping.
fn clean_text(line: &str) -> String {
    CUE_TAG
        .replace_all(line, "")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", "\u{a0}")
        .replace("&lrm;", "\u{200e}")
        .replace("&rlm;", "\u{200f}")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "WEBVTT
Kind: captions
Language: en

NOTE This is a comment
spanning two lines

STYLE
::cue { color: yellow }

intro
00:00:01.000 --> 00:00:05.000 align:start position:10%
first line
second line

00:00:06.000 --> 00:00:10.000
<v Roger>single line</v>

3
00:11.500 --> 00:15.750 line:0
<c.yellow>fish</c> &amp; chips
";

    #[test]
    fn parses_sample() {
        let cues = parse(SAMPLE);
        assert_eq!(cues.len(), 3);
        assert_eq!(cues[0].index, 1);
        assert_eq!(cues[0].start_time, 1.0);
        assert_eq!(cues[0].end_time, 5.0);
        assert_eq!(cues[0].text, "first line\nsecond line");
        assert_eq!(cues[1].index, 2);
        assert_eq!(cues[1].text, "single line");
        assert_eq!(cues[2].index, 3);
        assert_eq!(cues[2].start_time, 11.5);
        assert_eq!(cues[2].end_time, 15.75);
        assert_eq!(cues[2].text, "fish & chips");
    }

    #[test]
    fn header_only() {
        assert!(parse("WEBVTT\n").is_empty());
        assert!(parse("WEBVTT").is_empty());
        assert!(parse("").is_empty());
    }

    #[test]
    fn cue_right_after_signature() {
        let cues = parse("WEBVTT\n00:00:01.000 --> 00:00:02.000\nHi\n");
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].text, "Hi");
    }

    #[test]
    fn strips_inline_timestamps() {
        let cues = parse(
            "WEBVTT\n\n00:00:01.000 --> 00:00:03.000\nOne <00:00:02.000>two &lt;three&gt;\n",
        );
        assert_eq!(cues[0].text, "One two <three>");
    }

    #[test]
    fn skips_cue_with_comma_timestamps() {
        let cues = parse(
            "WEBVTT\n\n00:00:01,000 --> 00:00:02,000\nbad\n\n00:00:03.000 --> 00:00:04.000\ngood\n",
        );
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].text, "good");
        assert_eq!(cues[0].index, 1);
    }
}
