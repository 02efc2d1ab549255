use crate::cue::{Cue, RawCue};
use crate::parser::{blocks, strip_markup, timing_line_position};
use crate::processor::normalise;
use crate::timecode::{timing_line, SRT_SEPARATORS};

/// Parses SubRip text. The sequence numbers in the file only delimit
/// blocks; the returned cues are renumbered.
pub fn parse(input: &str) -> Vec<Cue> {
    normalise(blocks(input).iter().filter_map(|block| subtitle(block)))
}

fn subtitle(block: &[&str]) -> Option<RawCue> {
    let at = timing_line_position(block)?;
    // Anything after the end timestamp is display coordinates (`X1:...`).
    let (show_at, hide_at, _) = timing_line(block[at], SRT_SEPARATORS)?;
    let text = block[at + 1..].iter().map(|line| strip_markup(line));
    Some(RawCue::new(show_at, hide_at, text))
}
