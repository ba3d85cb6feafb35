use std::path::PathBuf;
use std::sync::Arc;

use crate::discovery::Extension;

/// Downscaled RGBA pixels produced while the candidate was being verified.
#[derive(Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl std::fmt::Debug for Thumbnail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Thumbnail")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.rgba.len())
            .finish()
    }
}

/// A candidate that decoded successfully. Immutable once accepted.
#[derive(Debug, Clone)]
pub struct DiscoveredPhoto {
    /// Numbered slot the photo was found at (`photo{index}`).
    pub index: u32,
    pub extension: Extension,
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub thumbnail: Option<Arc<Thumbnail>>,
}

impl DiscoveredPhoto {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

impl PartialEq for DiscoveredPhoto {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.extension == other.extension && self.path == other.path
    }
}
