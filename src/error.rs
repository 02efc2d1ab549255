use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Failures at the I/O boundary. Parsing subtitle text never fails; bad
/// input only produces fewer cues.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to access '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Scanning '{}' did not finish within {timeout:?}", path.display())]
    Timeout { path: PathBuf, timeout: Duration },

    #[error("Unsupported subtitle format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid frame rate: {0}")]
    InvalidFrameRate(f64),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
