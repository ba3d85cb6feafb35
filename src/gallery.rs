//! Gallery assembly: turns accepted photos into gallery entries as discovery
//! proceeds and publishes the final count.

use crate::discovery::DiscoverySink;
use crate::models::{DiscoveredPhoto, PhotoSet};

/// Shown in place of the gallery when discovery finds nothing.
pub const EMPTY_GALLERY_MESSAGE: &str = "No photos found";

/// Distance the track moves per scroll control press.
pub const DEFAULT_SCROLL_STEP: f64 = 320.0;

/// Where gallery entries end up. Implemented by the GTK track and by test
/// doubles.
pub trait GallerySurface {
    /// Append an entry for `photo` at the end of the track.
    fn append_entry(&mut self, set: &PhotoSet, photo: &DiscoveredPhoto);
    fn set_counter(&mut self, text: &str);
    fn show_placeholder(&mut self, message: &str);
}

pub fn counter_text(count: usize) -> String {
    format!("{count} PHOTOS")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Left,
    Right,
}

/// Target position for a scroll control press, or `None` when the track does
/// not overflow (nothing to scroll).
pub fn scroll_target(
    value: f64,
    direction: ScrollDirection,
    step: f64,
    lower: f64,
    upper: f64,
    page_size: f64,
) -> Option<f64> {
    let max = upper - page_size;
    if max <= lower {
        return None;
    }
    let delta = match direction {
        ScrollDirection::Left => -step,
        ScrollDirection::Right => step,
    };
    Some((value + delta).clamp(lower, max))
}

/// Ease-out cubic for smooth scroll animation, `t` in `[0, 1]`.
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Discovery sink that mirrors the photo set into a [`GallerySurface`].
pub struct GalleryAssembler<S> {
    surface: S,
    entries: usize,
}

impl<S: GallerySurface> GalleryAssembler<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            entries: 0,
        }
    }

    pub fn entries(&self) -> usize {
        self.entries
    }

    #[cfg(test)]
    pub fn surface(&self) -> &S {
        &self.surface
    }
}

impl<S: GallerySurface> DiscoverySink for GalleryAssembler<S> {
    fn photo_accepted(&mut self, set: &PhotoSet, position: usize) {
        if let Some(photo) = set.get(position) {
            self.surface.append_entry(set, &photo);
            self.entries += 1;
        }
    }

    fn discovery_finished(&mut self, set: &PhotoSet) {
        self.surface.set_counter(&counter_text(set.len()));
        if set.is_empty() {
            self.surface.show_placeholder(EMPTY_GALLERY_MESSAGE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::{DiscoveryEngine, DiscoveryOptions, Extension, PhotoProbe, ProbedImage};
    use crate::error::LoadError;
    use std::path::{Path, PathBuf};

    #[derive(Default)]
    struct RecordingSurface {
        entries: Vec<String>,
        counter: Option<String>,
        placeholder: Option<String>,
    }

    impl GallerySurface for RecordingSurface {
        fn append_entry(&mut self, set: &PhotoSet, photo: &DiscoveredPhoto) {
            assert!(set.position_of(&photo.path).is_some());
            self.entries.push(photo.file_name());
        }

        fn set_counter(&mut self, text: &str) {
            self.counter = Some(text.to_string());
        }

        fn show_placeholder(&mut self, message: &str) {
            self.placeholder = Some(message.to_string());
        }
    }

    struct ExistingFiles(Vec<&'static str>);

    impl PhotoProbe for ExistingFiles {
        async fn probe(&self, path: &Path) -> Result<ProbedImage, LoadError> {
            let name = path.file_name().unwrap().to_string_lossy();
            if self.0.iter().any(|f| *f == name) {
                Ok(ProbedImage {
                    width: 1,
                    height: 1,
                    thumbnail: None,
                })
            } else {
                Err(LoadError::NoFrames {
                    path: path.to_path_buf(),
                })
            }
        }
    }

    fn photo(index: u32, name: &str) -> DiscoveredPhoto {
        DiscoveredPhoto {
            index,
            extension: Extension::Jpg,
            path: PathBuf::from(name),
            width: 1,
            height: 1,
            thumbnail: None,
        }
    }

    #[tokio::test]
    async fn test_gallery_mirrors_discovery_order() {
        let engine = DiscoveryEngine::new(
            ExistingFiles(vec!["photo2.jpg", "photo4.webp"]),
            "/page",
            DiscoveryOptions {
                max_index: 5,
                ..DiscoveryOptions::default()
            },
        );
        let set = PhotoSet::new();
        let mut assembler = GalleryAssembler::new(RecordingSurface::default());

        engine.run(&set, &mut assembler).await;

        assert_eq!(assembler.entries(), 2);
        let surface = assembler.surface();
        assert_eq!(surface.entries, vec!["photo2.jpg", "photo4.webp"]);
        assert_eq!(surface.counter.as_deref(), Some("2 PHOTOS"));
        assert_eq!(surface.placeholder, None);
    }

    #[test]
    fn test_zero_photos_shows_placeholder() {
        let set = PhotoSet::new();
        let mut assembler = GalleryAssembler::new(RecordingSurface::default());

        assembler.discovery_finished(&set);

        let surface = assembler.surface();
        assert_eq!(surface.counter.as_deref(), Some("0 PHOTOS"));
        assert_eq!(surface.placeholder.as_deref(), Some(EMPTY_GALLERY_MESSAGE));
        assert!(surface.entries.is_empty());
    }

    #[test]
    fn test_entries_are_appended_as_they_arrive() {
        let set = PhotoSet::new();
        let mut assembler = GalleryAssembler::new(RecordingSurface::default());

        let first = set.push(photo(1, "photo1.jpg"));
        assembler.photo_accepted(&set, first);
        assert_eq!(assembler.surface().entries, vec!["photo1.jpg"]);
        assert_eq!(assembler.surface().counter, None);

        let second = set.push(photo(2, "photo2.jpg"));
        assembler.photo_accepted(&set, second);
        assert_eq!(assembler.entries(), 2);
    }

    #[test]
    fn test_scroll_target_clamps_to_range() {
        // 1000px of content in a 400px viewport.
        let right = scroll_target(0.0, ScrollDirection::Right, 320.0, 0.0, 1000.0, 400.0);
        assert_eq!(right, Some(320.0));

        let clamped = scroll_target(500.0, ScrollDirection::Right, 320.0, 0.0, 1000.0, 400.0);
        assert_eq!(clamped, Some(600.0));

        let left = scroll_target(100.0, ScrollDirection::Left, 320.0, 0.0, 1000.0, 400.0);
        assert_eq!(left, Some(0.0));
    }

    #[test]
    fn test_scroll_without_overflow_is_a_no_op() {
        assert_eq!(
            scroll_target(0.0, ScrollDirection::Right, 320.0, 0.0, 300.0, 400.0),
            None
        );
        assert_eq!(
            scroll_target(0.0, ScrollDirection::Left, 320.0, 0.0, 400.0, 400.0),
            None
        );
    }

    #[test]
    fn test_easing_is_monotonic_and_bounded() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert_eq!(ease_out_cubic(3.0), 1.0);
        let mut last = 0.0;
        for i in 1..=10 {
            let v = ease_out_cubic(i as f64 / 10.0);
            assert!(v >= last);
            last = v;
        }
    }
}
