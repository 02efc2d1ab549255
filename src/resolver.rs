//! Looking up the cue that is on screen at a playback time.
//!
//! Nothing in here holds hidden state: the cues are immutable once parsed and
//! the "what was shown last" bookkeeping lives in a [`Playhead`] owned by the
//! caller.

use crate::cue::Cue;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

/// Reference lookup: the first cue in sequence order with
/// `start_time <= time < end_time`.
pub fn active_cue(cues: &[Cue], time: f64) -> Option<&Cue> {
    cues.iter().find(|cue| cue.contains(time))
}

static NEXT_INDEX_ID: AtomicU64 = AtomicU64::new(0);

/// Cues sorted by start time, with the running maximum of their end times so
/// lookups are a binary search even when cues overlap.
///
/// Every index built by [`CueIndex::new`] gets its own id, which a
/// [`Playhead`] uses to tell cue #1 of one track from cue #1 of the next.
/// Clones share the id.
#[derive(Debug, Clone)]
pub struct CueIndex {
    id: u64,
    cues: Vec<Cue>,
    max_end: Vec<f64>,
}

impl CueIndex {
    pub fn new(cues: Vec<Cue>) -> Self {
        let mut running = f64::NEG_INFINITY;
        let max_end = cues
            .iter()
            .map(|cue| {
                running = running.max(cue.end_time);
                running
            })
            .collect();
        Self {
            id: NEXT_INDEX_ID.fetch_add(1, Ordering::Relaxed),
            cues,
            max_end,
        }
    }

    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// Same answer as [`active_cue`] for cues in non-decreasing start order.
    pub fn active(&self, time: f64) -> Option<&Cue> {
        // Every cue before `first` has ended by `time`. If `first` has not
        // started yet, no later cue has either.
        let first = self.max_end.partition_point(|&end| end <= time);
        let cue = self.cues.get(first)?;
        cue.contains(time).then_some(cue)
    }
}

impl Default for CueIndex {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl PartialEq for CueIndex {
    fn eq(&self, other: &Self) -> bool {
        self.cues == other.cues
    }
}

impl From<Vec<Cue>> for CueIndex {
    fn from(cues: Vec<Cue>) -> Self {
        Self::new(cues)
    }
}

/// The subtitle track currently shown for a media file.
///
/// Loading a track builds a complete [`CueIndex`] first and then swaps it in
/// with a single pointer store, so a reader on the playback side sees either
/// the old track or the new one, never a mix.
#[derive(Debug, Default)]
pub struct CueTrack {
    current: RwLock<Arc<CueIndex>>,
}

impl CueTrack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a new track and returns the one it replaced.
    pub fn install(&self, cues: Vec<Cue>) -> Arc<CueIndex> {
        let next = Arc::new(CueIndex::new(cues));
        std::mem::replace(&mut *self.current.write(), next)
    }

    pub fn clear(&self) -> Arc<CueIndex> {
        self.install(Vec::new())
    }

    /// The installed track. Holding on to it does not block `install`.
    pub fn snapshot(&self) -> Arc<CueIndex> {
        Arc::clone(&self.current.read())
    }

    pub fn active(&self, time: f64) -> Option<Cue> {
        self.snapshot().active(time).cloned()
    }
}

/// What changed on screen between two playback ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CueChange<'a> {
    Unchanged,
    /// A cue appeared where none was shown.
    Entered(&'a Cue),
    /// A different cue replaced the one shown.
    Changed(&'a Cue),
    /// The shown cue went away and nothing replaced it.
    Left,
}

/// The cue last reported to the caller: the id of its [`CueIndex`] and its
/// sequence number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Playhead {
    shown: Option<(u64, usize)>,
}

impl Playhead {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sequence number of the cue last reported.
    pub fn shown(&self) -> Option<usize> {
        self.shown.map(|(_, seq)| seq)
    }

    /// Forget what was shown, so the next cue is reported as entered.
    pub fn reset(&mut self) {
        self.shown = None;
    }

    /// Compares the cue active at `time` with the one last reported. A cue
    /// from a different index, such as a freshly installed track, counts as
    /// a change even when its sequence number matches.
    pub fn update<'a>(&mut self, index: &'a CueIndex, time: f64) -> CueChange<'a> {
        let active = index.active(time);
        let change = match (self.shown, active) {
            (None, None) => CueChange::Unchanged,
            (Some(_), None) => CueChange::Left,
            (None, Some(cue)) => CueChange::Entered(cue),
            (Some(shown), Some(cue)) if shown == (index.id, cue.index) => CueChange::Unchanged,
            (Some(_), Some(cue)) => CueChange::Changed(cue),
        };
        self.shown = active.map(|cue| (index.id, cue.index));
        change
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cue(index: usize, start_time: f64, end_time: f64) -> Cue {
        Cue {
            index,
            start_time,
            end_time,
            text: format!("cue {}", index),
        }
    }

    fn two_cues() -> Vec<Cue> {
        vec![cue(1, 1.0, 5.0), cue(2, 6.0, 10.0)]
    }

    macro_rules! test_resolve {
        ($($name:ident: $value:expr,)*) => {
        $(
            #[test]
            fn $name() {
                let (time, expected): (f64, Option<usize>) = $value;

                let cues = two_cues();
                let index = CueIndex::new(cues.clone());

                assert_eq!(active_cue(&cues, time).map(|c| c.index), expected);
                assert_eq!(index.active(time).map(|c| c.index), expected);
            }
        )*
        }
    }

    test_resolve! {
        resolve_before_first: (0.5, None),
        resolve_at_start: (1.0, Some(1)),
        resolve_inside_first: (3.0, Some(1)),
        resolve_at_first_end: (5.0, None),
        resolve_in_gap: (5.5, None),
        resolve_inside_second: (9.999, Some(2)),
        resolve_at_last_end: (10.0, None),
        resolve_after_last: (42.0, None),
        resolve_negative: (-1.0, None),
        resolve_nan: (f64::NAN, None),
    }

    #[test]
    fn empty_sequence() {
        assert!(active_cue(&[], 1.0).is_none());
        assert!(CueIndex::default().active(1.0).is_none());
    }

    #[test]
    fn overlapping_cues_prefer_the_first() {
        let cues = vec![
            cue(1, 0.0, 2.0),
            cue(2, 1.0, 10.0),
            cue(3, 3.0, 4.0),
            cue(4, 3.5, 5.0),
            cue(5, 12.0, 13.0),
        ];
        let index = CueIndex::new(cues.clone());
        let mut time = -0.5;
        while time < 14.0 {
            assert_eq!(
                index.active(time).map(|c| c.index),
                active_cue(&cues, time).map(|c| c.index),
                "at {}",
                time
            );
            time += 0.25;
        }
        assert_eq!(index.active(3.5).map(|c| c.index), Some(2));
        assert_eq!(index.active(11.0).map(|c| c.index), None);
    }

    #[test]
    fn track_swaps_whole_sequences() {
        let track = CueTrack::new();
        assert!(track.active(3.0).is_none());

        track.install(two_cues());
        let before = track.snapshot();
        assert_eq!(track.active(3.0).map(|c| c.index), Some(1));

        let replaced = track.install(vec![cue(1, 2.0, 4.0)]);
        assert_eq!(replaced.len(), 2);
        assert_eq!(before.len(), 2);
        assert_eq!(track.active(7.0), None);
        assert_eq!(track.snapshot().len(), 1);

        track.clear();
        assert!(track.snapshot().is_empty());
    }

    #[test]
    fn track_is_shared_between_threads() {
        let track = Arc::new(CueTrack::new());
        track.install(two_cues());

        let reader = {
            let track = Arc::clone(&track);
            std::thread::spawn(move || {
                for _ in 0..1000 {
                    let snapshot = track.snapshot();
                    assert!(snapshot.len() == 2 || snapshot.len() == 3);
                }
            })
        };
        for _ in 0..100 {
            track.install(vec![cue(1, 0.0, 1.0), cue(2, 1.0, 2.0), cue(3, 2.0, 3.0)]);
            track.install(two_cues());
        }
        reader.join().unwrap();
    }

    #[test]
    fn playhead_reports_transitions() {
        let index = CueIndex::new(two_cues());
        let mut playhead = Playhead::new();

        assert_eq!(playhead.update(&index, 0.5), CueChange::Unchanged);
        assert!(matches!(playhead.update(&index, 1.5), CueChange::Entered(c) if c.index == 1));
        assert_eq!(playhead.update(&index, 2.0), CueChange::Unchanged);
        assert_eq!(playhead.update(&index, 5.5), CueChange::Left);
        assert!(matches!(playhead.update(&index, 6.0), CueChange::Entered(c) if c.index == 2));
        assert_eq!(playhead.shown(), Some(2));

        // Seeking straight from one cue into another.
        assert!(matches!(playhead.update(&index, 2.0), CueChange::Changed(c) if c.index == 1));

        playhead.reset();
        assert_eq!(playhead.shown(), None);
    }

    #[test]
    fn playhead_notices_a_new_track() {
        let track = CueTrack::new();
        track.install(two_cues());
        let mut playhead = Playhead::new();

        let before = track.snapshot();
        assert!(matches!(playhead.update(&before, 3.0), CueChange::Entered(c) if c.index == 1));

        track.install(vec![cue(1, 2.0, 4.0)]);
        let after = track.snapshot();
        assert!(matches!(playhead.update(&after, 3.0), CueChange::Changed(c) if c.start_time == 2.0));
        assert_eq!(playhead.update(&after, 3.5), CueChange::Unchanged);

        // A clone is the same track.
        let cloned = (*after).clone();
        assert_eq!(playhead.update(&cloned, 3.5), CueChange::Unchanged);
    }
}
