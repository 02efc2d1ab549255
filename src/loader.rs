use crate::cue::Cue;
use crate::error::{Error, Result};
use crate::format::SubtitleFormat;
use crate::parser::ParseOptions;

use std::path::Path;

use tracing::{debug, warn};

/// Reads a subtitle file into a string. UTF-8 is tried first; files that are
/// not valid UTF-8 are decoded as Windows-1252, which is what most legacy
/// subtitle files turn out to be.
pub fn read_subtitle_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
    let text = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            let bytes = e.into_bytes();
            let (text, encoding, replacements) = encoding_rs::WINDOWS_1252.decode(&bytes);
            if replacements {
                warn!(
                    "could not decode {:?} accurately with {}",
                    path,
                    encoding.name()
                );
            }
            text.into_owned()
        }
    };
    Ok(match text.strip_prefix('\u{FEFF}') {
        Some(rest) => rest.to_string(),
        None => text,
    })
}

/// Reads and parses a subtitle file, picking the parser from its extension.
pub fn load_subtitle_file<P: AsRef<Path>>(path: P, options: &ParseOptions) -> Result<Vec<Cue>> {
    let path = path.as_ref();
    let format = path
        .to_str()
        .and_then(SubtitleFormat::from_path)
        .ok_or_else(|| Error::UnsupportedFormat(path.display().to_string()))?;
    let text = read_subtitle_text(path)?;
    let cues = format.parse(&text, options);
    debug!(path = %path.display(), kind = %format, cues = cues.len(), "Loaded subtitles");
    Ok(cues)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    #[test]
    fn loads_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movie.SUB");
        fs::write(&path, "{25}{125}Hello|World\n").unwrap();

        let cues = load_subtitle_file(&path, &ParseOptions::default()).unwrap();
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].text, "Hello\nWorld");
    }

    #[test]
    fn falls_back_to_windows_1252() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movie.srt");
        let mut bytes = b"1\r\n00:00:01,000 --> 00:00:02,000\r\nCaf".to_vec();
        bytes.push(0xE9);
        fs::write(&path, bytes).unwrap();

        let cues = load_subtitle_file(&path, &ParseOptions::default()).unwrap();
        assert_eq!(cues[0].text, "Café");
    }

    #[test]
    fn strips_byte_order_mark() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movie.vtt");
        fs::write(&path, "\u{FEFF}WEBVTT\n\n00:01.000 --> 00:02.000\nHi\n").unwrap();

        let text = read_subtitle_text(&path).unwrap();
        assert!(text.starts_with("WEBVTT"));
        let cues = load_subtitle_file(&path, &ParseOptions::default()).unwrap();
        assert_eq!(cues.len(), 1);
    }

    #[test]
    fn rejects_unknown_extension() {
        let err = load_subtitle_file("movie.txt", &ParseOptions::default()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_subtitle_file(dir.path().join("none.srt"), &ParseOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
