use std::path::PathBuf;
use thiserror::Error;

/// Caller-visible failures of the transcription core.
///
/// Unvoiced frames and frequencies that match no label are not errors; they
/// travel through the pipeline as `0.0` Hz and `None` labels.
#[derive(Error, Debug)]
pub enum Error {
    /// Source audio could not be opened, probed or decoded.
    #[error("Failed to decode {}: {source:#}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    /// A setting is out of its valid range.
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl Error {
    pub fn decode(path: impl Into<PathBuf>, source: impl Into<anyhow::Error>) -> Self {
        Error::Decode {
            path: path.into(),
            source: source.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
