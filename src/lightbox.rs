//! Lightbox session state machine.
//!
//! At most one session exists at a time. Opening a new one replaces the old
//! one outright; the view is told which session to destroy. Every transition
//! that the view completes later (first frame rendered, close animation
//! finished) carries a [`SessionId`] so callbacks from a replaced session are
//! ignored.

use crate::models::{DiscoveredPhoto, PhotoSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightboxPhase {
    Closed,
    /// Overlay mounted, entry transition not started yet.
    Opening,
    Open,
    /// Exit transition running; overlay still mounted.
    Closing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDirection {
    Backward,
    Forward,
}

impl NavDirection {
    fn offset(self) -> isize {
        match self {
            NavDirection::Backward => -1,
            NavDirection::Forward => 1,
        }
    }
}

/// Where a pointer click on the overlay landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Backdrop,
    Image,
    /// Close or navigation buttons; they handle their own action.
    Control,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(u64);

/// Circular index arithmetic: never out of bounds, never dead-ends.
pub fn wrap_index(current: usize, direction: NavDirection, total: usize) -> usize {
    if total == 0 {
        return 0;
    }
    let total = total as isize;
    let current = current as isize % total;
    ((current + direction.offset() + total) % total) as usize
}

pub fn counter_text(index: usize, total: usize) -> String {
    format!("{} / {}", index + 1, total)
}

/// Area actually painted by an image inside its widget allocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ContentRect {
    pub fn translate(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

/// Rect covered by an `image_w`x`image_h` image scaled to fit the allocation
/// with its aspect ratio kept and centered. An unknown image size covers the
/// whole allocation.
pub fn contain_rect(alloc_w: f64, alloc_h: f64, image_w: f64, image_h: f64) -> ContentRect {
    if image_w <= 0.0 || image_h <= 0.0 {
        return ContentRect {
            x: 0.0,
            y: 0.0,
            width: alloc_w.max(0.0),
            height: alloc_h.max(0.0),
        };
    }
    let scale = (alloc_w / image_w).min(alloc_h / image_h).max(0.0);
    let (width, height) = (image_w * scale, image_h * scale);
    ContentRect {
        x: (alloc_w - width) / 2.0,
        y: (alloc_h - height) / 2.0,
        width,
        height,
    }
}

/// Classify a pointer position on the overlay. Letterbox space around the
/// painted image counts as backdrop.
pub fn classify_click(on_control: bool, image: Option<ContentRect>, x: f64, y: f64) -> ClickTarget {
    if on_control {
        ClickTarget::Control
    } else if image.is_some_and(|rect| rect.contains(x, y)) {
        ClickTarget::Image
    } else {
        ClickTarget::Backdrop
    }
}

/// What the view should display for the current session.
#[derive(Debug, Clone)]
pub struct Frame {
    pub session: SessionId,
    pub index: usize,
    pub total: usize,
    pub photo: DiscoveredPhoto,
}

impl Frame {
    pub fn counter(&self) -> String {
        counter_text(self.index, self.total)
    }
}

#[derive(Debug, Clone)]
pub struct Opened {
    /// Session that must be torn down synchronously, without animation.
    pub replaced: Option<SessionId>,
    pub frame: Frame,
}

#[derive(Debug)]
struct Session {
    id: SessionId,
    photos: PhotoSet,
    index: usize,
    phase: LightboxPhase,
}

impl Session {
    fn frame(&self) -> Option<Frame> {
        let photo = self.photos.get(self.index)?;
        Some(Frame {
            session: self.id,
            index: self.index,
            total: self.photos.len(),
            photo,
        })
    }
}

#[derive(Debug, Default)]
pub struct LightboxNavigator {
    session: Option<Session>,
    next_id: u64,
}

impl LightboxNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn phase(&self) -> LightboxPhase {
        self.session
            .as_ref()
            .map(|s| s.phase)
            .unwrap_or(LightboxPhase::Closed)
    }

    #[cfg(test)]
    pub fn session_id(&self) -> Option<SessionId> {
        self.session.as_ref().map(|s| s.id)
    }

    #[cfg(test)]
    pub fn current_index(&self) -> Option<usize> {
        self.session.as_ref().map(|s| s.index)
    }

    pub fn current_frame(&self) -> Option<Frame> {
        self.session.as_ref().and_then(Session::frame)
    }

    /// Start a session on `photos` at `start`. Any existing session, in any
    /// phase, is replaced. Does nothing for an empty set or a start index
    /// past the end.
    pub fn open(&mut self, photos: PhotoSet, start: usize) -> Option<Opened> {
        if start >= photos.len() {
            return None;
        }

        let replaced = self.session.take().map(|s| s.id);
        self.next_id += 1;
        let session = Session {
            id: SessionId(self.next_id),
            photos,
            index: start,
            phase: LightboxPhase::Opening,
        };
        let frame = session.frame()?;
        self.session = Some(session);
        Some(Opened { replaced, frame })
    }

    /// The first frame after mounting was rendered: Opening -> Open.
    pub fn mark_rendered(&mut self, id: SessionId) -> bool {
        match self.session.as_mut() {
            Some(session) if session.id == id && session.phase == LightboxPhase::Opening => {
                session.phase = LightboxPhase::Open;
                true
            }
            _ => false,
        }
    }

    /// Move to the neighbouring photo. Only valid while Open.
    pub fn navigate(&mut self, direction: NavDirection) -> Option<Frame> {
        let session = self.session.as_mut()?;
        if session.phase != LightboxPhase::Open {
            return None;
        }
        // The set may have grown since the session opened.
        let total = session.photos.len();
        session.index = wrap_index(session.index, direction, total);
        session.frame()
    }

    /// Pointer click on the overlay. Only the backdrop closes the session.
    pub fn click(&mut self, target: ClickTarget) -> Option<SessionId> {
        match target {
            ClickTarget::Backdrop => self.close(),
            ClickTarget::Image | ClickTarget::Control => None,
        }
    }

    /// Begin closing. Valid from Opening or Open; returns the session whose
    /// exit transition should now play.
    pub fn close(&mut self) -> Option<SessionId> {
        let session = self.session.as_mut()?;
        match session.phase {
            LightboxPhase::Opening | LightboxPhase::Open => {
                session.phase = LightboxPhase::Closing;
                Some(session.id)
            }
            LightboxPhase::Closing | LightboxPhase::Closed => None,
        }
    }

    /// Exit transition finished: Closing -> Closed. Ignored for stale ids.
    pub fn finish_close(&mut self, id: SessionId) -> bool {
        match self.session.as_ref() {
            Some(session) if session.id == id && session.phase == LightboxPhase::Closing => {
                self.session = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::Extension;
    use std::path::PathBuf;

    fn set_of(names: &[(&str, Extension)]) -> PhotoSet {
        let set = PhotoSet::new();
        for (i, (name, ext)) in names.iter().enumerate() {
            set.push(DiscoveredPhoto {
                index: i as u32 + 1,
                extension: *ext,
                path: PathBuf::from(name),
                width: 1,
                height: 1,
                thumbnail: None,
            });
        }
        set
    }

    fn open_ready(nav: &mut LightboxNavigator, set: &PhotoSet, start: usize) -> SessionId {
        let opened = nav.open(set.clone(), start).unwrap();
        let id = opened.frame.session;
        assert!(nav.mark_rendered(id));
        id
    }

    #[test]
    fn test_wraparound_for_all_sizes() {
        for total in 1..=6 {
            assert_eq!(wrap_index(total - 1, NavDirection::Forward, total), 0);
            assert_eq!(wrap_index(0, NavDirection::Backward, total), total - 1);
            for i in 0..total {
                let forward = wrap_index(i, NavDirection::Forward, total);
                assert!(forward < total);
                assert_eq!(wrap_index(forward, NavDirection::Backward, total), i);
            }
        }
    }

    #[test]
    fn test_single_photo_wraps_to_itself() {
        let set = set_of(&[("photo1.jpg", Extension::Jpg)]);
        let mut nav = LightboxNavigator::new();
        open_ready(&mut nav, &set, 0);

        let frame = nav.navigate(NavDirection::Forward).unwrap();
        assert_eq!(frame.index, 0);
        assert_eq!(frame.counter(), "1 / 1");
        assert_eq!(nav.navigate(NavDirection::Backward).unwrap().index, 0);
    }

    #[test]
    fn test_navigation_scenario() {
        let set = set_of(&[("photo1.jpg", Extension::Jpg), ("photo2.png", Extension::Png)]);
        let mut nav = LightboxNavigator::new();

        let opened = nav.open(set.clone(), 0).unwrap();
        assert_eq!(opened.frame.counter(), "1 / 2");
        assert!(opened.replaced.is_none());
        assert!(nav.mark_rendered(opened.frame.session));

        let frame = nav.navigate(NavDirection::Forward).unwrap();
        assert_eq!(frame.counter(), "2 / 2");
        assert_eq!(frame.photo.path, PathBuf::from("photo2.png"));

        let frame = nav.navigate(NavDirection::Forward).unwrap();
        assert_eq!(frame.counter(), "1 / 2");
        assert_eq!(frame.photo.path, PathBuf::from("photo1.jpg"));
    }

    #[test]
    fn test_phases_follow_the_lifecycle() {
        let set = set_of(&[("photo1.jpg", Extension::Jpg)]);
        let mut nav = LightboxNavigator::new();
        assert_eq!(nav.phase(), LightboxPhase::Closed);

        let id = nav.open(set, 0).unwrap().frame.session;
        assert_eq!(nav.phase(), LightboxPhase::Opening);
        // Navigation is not accepted until the overlay is interactive.
        assert!(nav.navigate(NavDirection::Forward).is_none());

        assert!(nav.mark_rendered(id));
        assert_eq!(nav.phase(), LightboxPhase::Open);
        assert!(!nav.mark_rendered(id));

        assert_eq!(nav.close(), Some(id));
        assert_eq!(nav.phase(), LightboxPhase::Closing);
        assert!(nav.close().is_none());
        assert!(nav.navigate(NavDirection::Forward).is_none());

        assert!(nav.finish_close(id));
        assert_eq!(nav.phase(), LightboxPhase::Closed);
        assert!(nav.session_id().is_none());
    }

    #[test]
    fn test_close_is_allowed_while_opening() {
        let set = set_of(&[("photo1.jpg", Extension::Jpg)]);
        let mut nav = LightboxNavigator::new();
        let id = nav.open(set, 0).unwrap().frame.session;
        assert_eq!(nav.close(), Some(id));
        assert!(!nav.mark_rendered(id));
    }

    #[test]
    fn test_second_open_replaces_the_first() {
        let set = set_of(&[("photo1.jpg", Extension::Jpg), ("photo2.png", Extension::Png)]);
        let mut nav = LightboxNavigator::new();
        let first = open_ready(&mut nav, &set, 0);

        let opened = nav.open(set.clone(), 1).unwrap();
        assert_eq!(opened.replaced, Some(first));
        assert_ne!(opened.frame.session, first);
        assert_eq!(nav.session_id(), Some(opened.frame.session));
        assert_eq!(nav.current_index(), Some(1));

        // Late callbacks from the replaced session change nothing.
        assert!(!nav.mark_rendered(first));
        assert!(!nav.finish_close(first));
        assert_eq!(nav.phase(), LightboxPhase::Opening);
    }

    #[test]
    fn test_reopening_during_close_replaces_the_closing_session() {
        let set = set_of(&[("photo1.jpg", Extension::Jpg)]);
        let mut nav = LightboxNavigator::new();
        let first = open_ready(&mut nav, &set, 0);
        nav.close();

        let opened = nav.open(set, 0).unwrap();
        assert_eq!(opened.replaced, Some(first));
        assert!(!nav.finish_close(first));
        assert_eq!(nav.phase(), LightboxPhase::Opening);
    }

    #[test]
    fn test_only_backdrop_clicks_close() {
        let set = set_of(&[("photo1.jpg", Extension::Jpg)]);
        let mut nav = LightboxNavigator::new();
        let id = open_ready(&mut nav, &set, 0);

        assert!(nav.click(ClickTarget::Image).is_none());
        assert!(nav.click(ClickTarget::Control).is_none());
        assert_eq!(nav.phase(), LightboxPhase::Open);

        assert_eq!(nav.click(ClickTarget::Backdrop), Some(id));
        assert_eq!(nav.phase(), LightboxPhase::Closing);
    }

    #[test]
    fn test_invalid_open_is_ignored() {
        let mut nav = LightboxNavigator::new();
        assert!(nav.open(PhotoSet::new(), 0).is_none());

        let set = set_of(&[("photo1.jpg", Extension::Jpg)]);
        let id = open_ready(&mut nav, &set, 0);
        assert!(nav.open(set, 5).is_none());
        assert_eq!(nav.session_id(), Some(id));
    }

    #[test]
    fn test_navigation_sees_photos_added_after_open() {
        let set = set_of(&[("photo1.jpg", Extension::Jpg)]);
        let mut nav = LightboxNavigator::new();
        open_ready(&mut nav, &set, 0);

        set.push(DiscoveredPhoto {
            index: 2,
            extension: Extension::Webp,
            path: PathBuf::from("photo2.webp"),
            width: 1,
            height: 1,
            thumbnail: None,
        });

        let frame = nav.navigate(NavDirection::Forward).unwrap();
        assert_eq!(frame.counter(), "2 / 2");
    }

    #[test]
    fn test_contain_rect_letterboxes_portrait_photo() {
        // 3:4 photo in a wide allocation: pillarboxed, full height.
        let rect = contain_rect(1200.0, 800.0, 600.0, 800.0);
        assert_eq!(rect.width, 600.0);
        assert_eq!(rect.height, 800.0);
        assert_eq!(rect.x, 300.0);
        assert_eq!(rect.y, 0.0);

        // Landscape photo scaled up into a tall allocation.
        let rect = contain_rect(400.0, 1000.0, 200.0, 100.0);
        assert_eq!((rect.width, rect.height), (400.0, 200.0));
        assert_eq!((rect.x, rect.y), (0.0, 400.0));
    }

    #[test]
    fn test_contain_rect_without_image_size_covers_allocation() {
        let rect = contain_rect(300.0, 200.0, 0.0, 0.0);
        assert_eq!(
            rect,
            ContentRect {
                x: 0.0,
                y: 0.0,
                width: 300.0,
                height: 200.0
            }
        );
    }

    #[test]
    fn test_letterbox_click_closes_and_image_click_does_not() {
        // Picture allocated at (40, 60) in the overlay, 1150x780, showing a 3:4 photo.
        let image = contain_rect(1150.0, 780.0, 600.0, 800.0).translate(40.0, 60.0);

        assert_eq!(classify_click(false, Some(image), 140.0, 400.0), ClickTarget::Backdrop);
        assert_eq!(classify_click(false, Some(image), 615.0, 450.0), ClickTarget::Image);
        assert_eq!(classify_click(false, Some(image), 10.0, 10.0), ClickTarget::Backdrop);
        assert_eq!(classify_click(true, Some(image), 615.0, 450.0), ClickTarget::Control);
        assert_eq!(classify_click(false, None, 615.0, 450.0), ClickTarget::Backdrop);

        let set = set_of(&[("photo1.jpg", Extension::Jpg)]);
        let mut nav = LightboxNavigator::new();
        let id = open_ready(&mut nav, &set, 0);
        assert!(nav.click(classify_click(false, Some(image), 615.0, 450.0)).is_none());
        assert_eq!(nav.click(classify_click(false, Some(image), 140.0, 400.0)), Some(id));
    }
}
