use crate::cue::{Cue, RawCue, LINE_SEPARATOR};

use tracing::debug;

/// Validates raw cues and numbers the survivors 1..N in the order given.
///
/// Lines are trimmed and blank lines removed. A cue is dropped when its
/// text ends up empty, a time is not a finite non-negative number, or it
/// does not end after it starts. Order is preserved, never re-sorted.
pub(crate) fn normalise<I>(raw: I) -> Vec<Cue>
where
    I: IntoIterator<Item = RawCue>,
{
    let mut dropped = 0usize;
    let subs: Vec<Cue> = raw
        .into_iter()
        .filter_map(|raw| {
            let cue = validate(raw);
            if cue.is_none() {
                dropped += 1;
            }
            cue
        })
        .collect();
    if dropped > 0 {
        debug!(dropped, kept = subs.len(), "Dropped invalid cues");
    }
    generate_seqnum(subs)
}

fn validate(raw: RawCue) -> Option<Cue> {
    let RawCue {
        start_time,
        end_time,
        lines,
    } = raw;
    let times_valid = start_time.is_finite()
        && end_time.is_finite()
        && start_time >= 0.0
        && start_time < end_time;
    if !times_valid {
        return None;
    }

    let text = clean_lines(lines.iter().map(String::as_str));
    if text.is_empty() {
        return None;
    }

    Some(Cue {
        index: 0,
        start_time,
        end_time,
        text,
    })
}

/// Trims every line, drops blank ones and joins the rest.
pub(crate) fn clean_lines<'a, I>(lines: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut text = String::new();
    for line in lines.into_iter().map(str::trim).filter(|l| !l.is_empty()) {
        if !text.is_empty() {
            text.push(LINE_SEPARATOR);
        }
        text.push_str(line);
    }
    text
}

fn generate_seqnum(subs: Vec<Cue>) -> Vec<Cue> {
    let mut seqnum = 0;
    subs.into_iter()
        .map(|mut s| {
            seqnum += 1;
            s.index = seqnum;
            s
        })
        .collect()
}
