//! Finding the subtitle tracks that belong to a media file.
//!
//! A track lives next to the media file and shares its base name, either
//! exactly (`movie.srt`) or followed by a tag such as a language
//! (`movie.en.srt`). Only recognised subtitle extensions are returned.

use crate::error::{Error, Result};
use crate::format::SubtitleFormat;

use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, trace};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubtitleFile {
    pub path: PathBuf,
    pub format: SubtitleFormat,
    /// The tag between the media base name and the extension, if any.
    pub language: Option<String>,
}

/// Last path component, for paths separated by `/` or `\`.
pub(crate) fn file_name(path: &str) -> &str {
    path.rsplit(&['/', '\\'][..]).next().unwrap_or(path)
}

/// Splits a media path into its directory and base name without extension.
/// A bare file name lives in `.`.
pub fn split_media_path(path: &str) -> (&str, &str) {
    let name = file_name(path);
    let dir = &path[..path.len() - name.len()];
    let dir = match dir.trim_end_matches(&['/', '\\'][..]) {
        "" if dir.is_empty() => ".",
        // The media file sits in the root directory.
        "" => &dir[..1],
        // `C:` alone is the current directory on that drive, not its root.
        trimmed if is_drive(trimmed) && dir.len() > trimmed.len() => &dir[..3],
        trimmed => trimmed,
    };
    let stem = match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    };
    (dir, stem)
}

fn is_drive(dir: &str) -> bool {
    matches!(dir.as_bytes(), [letter, b':'] if letter.is_ascii_alphabetic())
}

/// Lists the subtitle tracks for `media_path`. The exact base name match
/// comes first, tagged tracks follow in file name order. Finding nothing is
/// not an error; failing to read the directory is.
pub fn find_subtitle_files(media_path: &str) -> Result<Vec<SubtitleFile>> {
    let (dir, stem) = split_media_path(media_path);
    let entries = std::fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;

    let mut found = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let path = entry.path();
        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(name) => {
                trace!(?name, "Skipping non UTF-8 file name");
                continue;
            }
        };
        if let Some(file) = match_track(&name, stem, &path) {
            if path.is_file() {
                found.push(file);
            }
        }
    }

    found.sort_by(|a, b| {
        a.language
            .is_some()
            .cmp(&b.language.is_some())
            .then_with(|| a.path.cmp(&b.path))
    });
    debug!(media = media_path, count = found.len(), "Found subtitle files");
    Ok(found)
}

/// Runs [`find_subtitle_files`] on a worker thread and gives up after
/// `timeout`, for directories on slow network mounts. The scan itself is not
/// interrupted; its result is discarded when it arrives late.
pub fn find_subtitle_files_timeout(
    media_path: &str,
    timeout: Duration,
) -> Result<Vec<SubtitleFile>> {
    let (tx, rx) = mpsc::channel();
    let owned = media_path.to_string();
    thread::Builder::new()
        .name("subtitle-scan".to_string())
        .spawn(move || {
            // The receiver is gone if we timed out.
            let _ = tx.send(find_subtitle_files(&owned));
        })
        .map_err(|e| Error::io(split_media_path(media_path).0, e))?;

    wait_for_scan(&rx, split_media_path(media_path).0, timeout)
}

fn wait_for_scan(
    rx: &Receiver<Result<Vec<SubtitleFile>>>,
    dir: &str,
    timeout: Duration,
) -> Result<Vec<SubtitleFile>> {
    match rx.recv_timeout(timeout) {
        Ok(found) => found,
        Err(RecvTimeoutError::Timeout) => Err(Error::Timeout {
            path: PathBuf::from(dir),
            timeout,
        }),
        // The worker died without sending, most likely a panic.
        Err(RecvTimeoutError::Disconnected) => Err(Error::io(
            dir,
            io::Error::new(io::ErrorKind::Other, "subtitle scan stopped unexpectedly"),
        )),
    }
}

fn match_track(name: &str, media_stem: &str, path: &Path) -> Option<SubtitleFile> {
    let (stem, ext) = name.rsplit_once('.')?;
    let format = SubtitleFormat::from_extension(ext)?;
    let language = if stem == media_stem {
        None
    } else {
        let tag = stem.strip_prefix(media_stem)?.strip_prefix('.')?;
        if tag.is_empty() {
            return None;
        }
        Some(tag.to_string())
    };
    Some(SubtitleFile {
        path: path.to_path_buf(),
        format,
        language,
    })
}
