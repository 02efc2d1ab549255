//! Subtitle parsing for media players.
//!
//! Parses SRT, WebVTT, ASS/SSA and MicroDVD files into one normalised,
//! time ordered list of [`Cue`]s, finds the subtitle files that belong to a
//! media file and answers which cue is on screen at a given time.
//!
//! ```
//! use subcue::{CueIndex, ParseOptions, SubtitleFormat};
//!
//! let text = "1\n00:00:01,000 --> 00:00:05,000\nHello\n";
//! let cues = SubtitleFormat::Srt.parse(text, &ParseOptions::default());
//! let index = CueIndex::new(cues);
//! assert_eq!(index.active(2.0).map(|c| c.text.as_str()), Some("Hello"));
//! assert!(index.active(5.0).is_none());
//! ```

pub mod cue;
pub mod discovery;
pub mod error;
pub mod format;
pub mod loader;
pub mod parser;
mod processor;
pub mod resolver;
pub mod timecode;

pub use crate::cue::{Cue, LINE_SEPARATOR};
pub use crate::discovery::{find_subtitle_files, find_subtitle_files_timeout, SubtitleFile};
pub use crate::error::{Error, Result};
pub use crate::format::SubtitleFormat;
pub use crate::loader::{load_subtitle_file, read_subtitle_text};
pub use crate::parser::{ParseOptions, Parser};
pub use crate::resolver::{active_cue, CueChange, CueIndex, CueTrack, Playhead};
