use serde::Serialize;

/// Separator between the display lines of a cue's text.
pub const LINE_SEPARATOR: char = '\n';

/// A normalised subtitle entry, times in seconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cue {
    pub index: usize,
    pub start_time: f64,
    pub end_time: f64,
    pub text: String,
}

impl Cue {
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.split(LINE_SEPARATOR)
    }

    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// Half-open: the end time itself is no longer part of the cue.
    pub fn contains(&self, time: f64) -> bool {
        self.start_time <= time && time < self.end_time
    }
}

/// A cue as read from the source format, before validation and numbering.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RawCue {
    pub(crate) start_time: f64,
    pub(crate) end_time: f64,
    pub(crate) lines: Vec<String>,
}

impl RawCue {
    pub(crate) fn new<I, S>(start_time: f64, end_time: f64, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            start_time,
            end_time,
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cue(start_time: f64, end_time: f64) -> Cue {
        Cue {
            index: 1,
            start_time,
            end_time,
            text: "first\nsecond".to_string(),
        }
    }

    #[test]
    fn contains_is_end_exclusive() {
        let c = cue(1.0, 5.0);
        assert!(!c.contains(0.999));
        assert!(c.contains(1.0));
        assert!(c.contains(4.999));
        assert!(!c.contains(5.0));
    }

    #[test]
    fn lines_split_on_separator() {
        let c = cue(1.0, 5.0);
        assert_eq!(c.lines().collect::<Vec<_>>(), vec!["first", "second"]);
        assert_eq!(c.duration(), 4.0);
    }

    #[test]
    fn serialises_with_camel_case_keys() {
        let json = serde_json::to_string(&cue(1.0, 5.0)).unwrap();
        assert_eq!(
            json,
            r#"{"index":1,"startTime":1.0,"endTime":5.0,"text":"first\nsecond"}"#
        );
    }
}
