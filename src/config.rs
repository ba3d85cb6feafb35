// Runtime configuration for the showcase page
// Read from SHOWCASE_* environment variables; every value has a default and
// malformed values fall back to it.

use std::path::{Path, PathBuf};

use crate::discovery::probe::DEFAULT_THUMBNAIL_SIZE;
use crate::discovery::engine::DEFAULT_MAX_INDEX;
use crate::gallery::DEFAULT_SCROLL_STEP;
use crate::particles::DEFAULT_PARTICLE_LIMIT;

const DEFAULT_LIGHTBOX_CACHE: usize = 16;

#[derive(Debug, Clone, PartialEq)]
pub struct ShowcaseConfig {
    /// Directory the numbered photos live in.
    pub photo_dir: PathBuf,
    /// Highest photo index probed.
    pub max_photos: u32,
    pub particles_enabled: bool,
    pub particle_limit: usize,
    /// Pixels the gallery moves per scroll control press.
    pub gallery_step: f64,
    pub thumbnail_size: u32,
    /// Full-resolution textures kept for lightbox navigation.
    pub lightbox_cache: usize,
    /// Optional stylesheet replacing the embedded one.
    pub css_override: Option<PathBuf>,
}

impl ShowcaseConfig {
    pub fn from_env(photo_dir: Option<&Path>) -> Self {
        Self::from_lookup(photo_dir, |key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(photo_dir: Option<&Path>, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let photo_dir = photo_dir
            .map(Path::to_path_buf)
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            photo_dir,
            max_photos: parse_or(&lookup, "SHOWCASE_MAX_PHOTOS", DEFAULT_MAX_INDEX),
            particles_enabled: lookup("SHOWCASE_PARTICLES")
                .map(|v| parse_flag(&v))
                .unwrap_or(true),
            particle_limit: parse_or(&lookup, "SHOWCASE_PARTICLE_LIMIT", DEFAULT_PARTICLE_LIMIT),
            gallery_step: lookup("SHOWCASE_GALLERY_STEP")
                .and_then(|v| v.trim().parse::<f64>().ok())
                .filter(|v| v.is_finite() && *v > 0.0)
                .unwrap_or(DEFAULT_SCROLL_STEP),
            thumbnail_size: lookup("SHOWCASE_THUMBNAIL_SIZE")
                .and_then(|v| v.trim().parse::<u32>().ok())
                .filter(|v| *v > 0)
                .unwrap_or(DEFAULT_THUMBNAIL_SIZE),
            lightbox_cache: lookup("SHOWCASE_LIGHTBOX_CACHE")
                .and_then(|v| v.trim().parse::<usize>().ok())
                .filter(|v| *v > 0)
                .unwrap_or(DEFAULT_LIGHTBOX_CACHE),
            css_override: lookup("SHOWCASE_CSS")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key)
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}
