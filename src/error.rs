use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while detecting silence and writing segments
#[derive(Debug, Error)]
pub enum SegmenterError {
    /// A parameter is out of range (window/step sizes, threshold, sample rate)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The input WAV file could not be opened or decoded
    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    /// The input decoded fine but uses a sample layout we cannot process
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A segment file could not be written
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    /// Filesystem failure (directory listing, staging, rename)
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The manifest could not be serialized
    #[error("failed to serialize manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}

impl SegmenterError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SegmenterError::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_message() {
        let err = SegmenterError::InvalidArgument("step size must be positive".to_string());
        assert_eq!(err.to_string(), "invalid argument: step size must be positive");
    }

    #[test]
    fn test_io_error_mentions_path() {
        let err = SegmenterError::io(
            "/tmp/out",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/tmp/out"));
        assert!(msg.contains("missing"));
    }
}
