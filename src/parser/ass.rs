use crate::cue::{Cue, RawCue, LINE_SEPARATOR};
use crate::processor::normalise;
use crate::timecode::{parse_clock, DOT_SEPARATOR};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

const DIALOGUE: &str = "Dialogue:";
const FORMAT: &str = "Format:";
const EVENTS_SECTION: &str = "[events]";

/// Column layout of `Dialogue:` lines.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Columns {
    count: usize,
    start: usize,
    end: usize,
    text: usize,
}

impl Default for Columns {
    /// `Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text`
    fn default() -> Self {
        Self {
            count: 10,
            start: 1,
            end: 2,
            text: 9,
        }
    }
}

impl Columns {
    /// Reads the `Format:` line of the events section. Text has to be the
    /// last column since it may contain commas itself.
    fn from_format(spec: &str) -> Option<Self> {
        let names: Vec<String> = spec
            .split(',')
            .map(|name| name.trim().to_ascii_lowercase())
            .collect();
        let find = |wanted: &str| names.iter().position(|name| name == wanted);
        let columns = Self {
            count: names.len(),
            start: find("start")?,
            end: find("end")?,
            text: find("text")?,
        };
        (columns.text == columns.count - 1).then_some(columns)
    }
}

/// Parses Advanced SubStation Alpha (and SSA) scripts. Only `Dialogue:`
/// events are read; styles and script info are ignored.
pub fn parse(input: &str) -> Vec<Cue> {
    let mut columns = Columns::default();
    let mut in_events = false;
    let mut events = Vec::new();

    for line in input.lines().map(str::trim) {
        if line.starts_with('[') {
            in_events = line.eq_ignore_ascii_case(EVENTS_SECTION);
        } else if let Some(spec) = line.strip_prefix(FORMAT).filter(|_| in_events) {
            columns = Columns::from_format(spec).unwrap_or_else(|| {
                debug!(event_format = spec, "Unusable event format, using default columns");
                Columns::default()
            });
        } else if let Some(fields) = line.strip_prefix(DIALOGUE) {
            events.push(dialogue(fields, columns));
        }
    }

    normalise(events.into_iter().flatten())
}

fn dialogue(fields: &str, columns: Columns) -> Option<RawCue> {
    let fields: Vec<&str> = fields.splitn(columns.count, ',').collect();
    if fields.len() != columns.count {
        return None;
    }
    let start = parse_clock(fields[columns.start], DOT_SEPARATOR)?;
    let end = parse_clock(fields[columns.end], DOT_SEPARATOR)?;
    let text = clean_text(fields[columns.text]);
    Some(RawCue::new(start, end, text.split(LINE_SEPARATOR)))
}

static OVERRIDE_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{[^}]*\}").unwrap());

/// Removes `{\i1}` style override blocks and turns the `\N`/`\n` escapes
/// into line breaks and `\h` into a space.
fn clean_text(text: &str) -> String {
    OVERRIDE_BLOCK
        .replace_all(text, "")
        .replace("\\N", "\n")
        .replace("\\n", "\n")
        .replace("\\h", " ")
}
