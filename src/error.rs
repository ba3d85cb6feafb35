use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn a candidate file into a usable image.
///
/// Discovery treats every variant as a negative probe result, never as a
/// fault: the engine simply moves on to the next candidate.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read image {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image {path:?}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("animated image has no frames: {path:?}")]
    NoFrames { path: PathBuf },

    #[error("decode task for {path:?} did not complete")]
    Interrupted { path: PathBuf },
}

impl LoadError {
    /// True when the candidate simply is not there.
    #[cfg(test)]
    pub fn is_missing(&self) -> bool {
        matches!(
            self,
            LoadError::Read { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}
