// Lightbox overlay for the showcase gallery
// Features:
// - Single session at a time; opening replaces any existing overlay at once
// - Entry transition on the first rendered frame, fade-swap on navigation,
//   animated exit followed by teardown
// - Thumbnail shown immediately, full resolution decoded in the background
// - Keyboard bound only while a session is mounted

use anyhow::{Context, Result};
use gdk4::Texture;
use gtk4::prelude::*;
use gtk4::{
    Align, Box as GtkBox, Button, ContentFit, GestureClick, Label, Orientation, Overlay, Picture,
    PickFlags, Widget,
};
use lru::LruCache;
use std::cell::{Cell, RefCell};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::rc::{Rc, Weak};
use std::time::Duration;
use tokio::runtime::Handle;

use super::keybindings::{KeySubscription, LightboxCommand};
use super::texture::{texture_from_rgba, texture_from_thumbnail};
use crate::image_loader;
use crate::lightbox::{
    classify_click, contain_rect, ClickTarget, Frame, LightboxNavigator, NavDirection, SessionId,
};
use crate::models::PhotoSet;

/// Delay between fading the current image out and swapping in the next one
const NAV_SWAP_DELAY: Duration = Duration::from_millis(200);
/// Length of the exit transition before the overlay is removed
const CLOSE_TEARDOWN_DELAY: Duration = Duration::from_millis(300);
/// Longest side of the full-resolution decode
const FULL_DECODE_MAX_SIDE: u32 = 2048;

/// Result of a background full-resolution decode
struct FullImage {
    generation: u64,
    path: PathBuf,
    rgba: Vec<u8>,
    width: u32,
    height: u32,
}

/// Widgets belonging to the mounted session
struct MountedLightbox {
    session: SessionId,
    root: GtkBox,
    picture: Picture,
    counter: Label,
    keys: Option<KeySubscription>,
    swap_timer: Option<glib::SourceId>,
    teardown_timer: Option<glib::SourceId>,
}

impl MountedLightbox {
    fn cancel_timers(&mut self) {
        if let Some(source) = self.swap_timer.take() {
            source.remove();
        }
        if let Some(source) = self.teardown_timer.take() {
            source.remove();
        }
    }
}

fn decode_full(path: &Path) -> Result<crate::models::Thumbnail> {
    let img = image_loader::open_image(path)
        .with_context(|| format!("Failed to open image for lightbox: {:?}", path))?;
    Ok(image_loader::to_rgba_bounded(&img, FULL_DECODE_MAX_SIDE))
}

/// Classify a click on the overlay. Only the painted image is protected;
/// the letterbox inside the picture's allocation is backdrop.
fn click_target(root: &GtkBox, picture: &Picture, x: f64, y: f64) -> ClickTarget {
    let on_control = root
        .pick(x, y, PickFlags::DEFAULT)
        .is_some_and(|hit| hit.ancestor(Button::static_type()).is_some());

    let image = picture.compute_bounds(root).map(|bounds| {
        let (image_w, image_h) = picture
            .paintable()
            .map(|p| (f64::from(p.intrinsic_width()), f64::from(p.intrinsic_height())))
            .unwrap_or((0.0, 0.0));
        contain_rect(
            f64::from(bounds.width()),
            f64::from(bounds.height()),
            image_w,
            image_h,
        )
        .translate(f64::from(bounds.x()), f64::from(bounds.y()))
    });

    classify_click(on_control, image, x, y)
}

pub struct LightboxView {
    self_weak: RefCell<Weak<LightboxView>>,
    host: Overlay,
    key_target: Widget,
    navigator: RefCell<LightboxNavigator>,
    mounted: RefCell<Option<MountedLightbox>>,
    runtime: Handle,
    load_sender: async_channel::Sender<FullImage>,
    load_generation: Cell<u64>,
    textures: RefCell<LruCache<PathBuf, Texture>>,
}

impl LightboxView {
    pub fn new(
        host: &Overlay,
        key_target: &impl IsA<Widget>,
        runtime: Handle,
        cache_entries: usize,
    ) -> Rc<Self> {
        let (load_sender, load_receiver) = async_channel::unbounded::<FullImage>();
        let capacity = NonZeroUsize::new(cache_entries).unwrap_or(NonZeroUsize::MIN);

        let view = Rc::new(Self {
            self_weak: RefCell::new(Weak::new()),
            host: host.clone(),
            key_target: key_target.clone().upcast(),
            navigator: RefCell::new(LightboxNavigator::new()),
            mounted: RefCell::new(None),
            runtime,
            load_sender,
            load_generation: Cell::new(0),
            textures: RefCell::new(LruCache::new(capacity)),
        });
        *view.self_weak.borrow_mut() = Rc::downgrade(&view);

        // Apply decode results on the main thread
        let view_weak = Rc::downgrade(&view);
        glib::spawn_future_local(async move {
            while let Ok(image) = load_receiver.recv().await {
                if let Some(view) = view_weak.upgrade() {
                    view.handle_full_image(image);
                } else {
                    break;
                }
            }
        });

        view
    }

    /// Open a session on `photos` at `start`, replacing any open session
    pub fn open(&self, photos: PhotoSet, start: usize) {
        let opened = self.navigator.borrow_mut().open(photos, start);
        let Some(opened) = opened else {
            tracing::debug!(start, "Ignoring lightbox open outside the photo set");
            return;
        };

        if let Some(replaced) = opened.replaced {
            tracing::debug!(?replaced, "Replacing open lightbox session");
            self.destroy_mounted();
        }

        let session = opened.frame.session;
        let mounted = self.mount(session);
        let root = mounted.root.clone();
        *self.mounted.borrow_mut() = Some(mounted);
        self.show_frame(&opened.frame);

        // Flip to Open once the overlay has been drawn so the entry transition plays
        let view_weak = self.self_weak.borrow().clone();
        root.add_tick_callback(move |root, _clock| {
            if let Some(view) = view_weak.upgrade() {
                if view.navigator.borrow_mut().mark_rendered(session) {
                    root.add_css_class("active");
                }
            }
            glib::ControlFlow::Break
        });

        tracing::info!(
            "Opening lightbox at {} ({})",
            opened.frame.counter(),
            opened.frame.photo.path.display()
        );
    }

    /// Start the exit transition of the current session
    pub fn close(&self) {
        let closing = self.navigator.borrow_mut().close();
        if let Some(session) = closing {
            self.begin_close(session);
        }
    }

    pub fn navigate(&self, direction: NavDirection) {
        let frame = self.navigator.borrow_mut().navigate(direction);
        let Some(frame) = frame else {
            return;
        };

        let mut mounted = self.mounted.borrow_mut();
        let Some(mounted) = mounted.as_mut() else {
            return;
        };
        if mounted.session != frame.session {
            return;
        }

        mounted.picture.add_css_class("fading");
        if let Some(source) = mounted.swap_timer.take() {
            source.remove();
        }

        let view_weak = self.self_weak.borrow().clone();
        mounted.swap_timer = Some(glib::timeout_add_local_once(NAV_SWAP_DELAY, move || {
            if let Some(view) = view_weak.upgrade() {
                view.finish_swap(frame);
            }
        }));
    }

    fn handle_command(&self, command: LightboxCommand) {
        match command {
            LightboxCommand::Close => self.close(),
            LightboxCommand::Previous => self.navigate(NavDirection::Backward),
            LightboxCommand::Next => self.navigate(NavDirection::Forward),
        }
    }

    fn handle_click(&self, target: ClickTarget) {
        let closing = self.navigator.borrow_mut().click(target);
        if let Some(session) = closing {
            self.begin_close(session);
        }
    }

    /// Build the overlay widgets for a session and attach them to the host
    fn mount(&self, session: SessionId) -> MountedLightbox {
        let root = GtkBox::new(Orientation::Vertical, 12);
        root.add_css_class("lightbox");
        root.set_hexpand(true);
        root.set_vexpand(true);
        root.set_halign(Align::Fill);
        root.set_valign(Align::Fill);

        let top_bar = GtkBox::new(Orientation::Horizontal, 8);
        top_bar.set_margin_start(16);
        top_bar.set_margin_end(16);
        top_bar.set_margin_top(16);

        let counter = Label::new(None);
        counter.add_css_class("lightbox-counter");
        counter.set_halign(Align::Start);
        counter.set_hexpand(true);

        let close_btn = Button::with_label("\u{00d7}");
        close_btn.add_css_class("lightbox-close");
        close_btn.set_tooltip_text(Some("Close (Escape)"));

        top_bar.append(&counter);
        top_bar.append(&close_btn);

        let prev_btn = Button::with_label("\u{2039}");
        prev_btn.add_css_class("lightbox-nav");
        prev_btn.set_valign(Align::Center);
        prev_btn.set_tooltip_text(Some("Previous (Left)"));

        let next_btn = Button::with_label("\u{203a}");
        next_btn.add_css_class("lightbox-nav");
        next_btn.set_valign(Align::Center);
        next_btn.set_tooltip_text(Some("Next (Right)"));

        let picture = Picture::new();
        picture.add_css_class("lightbox-image");
        picture.set_content_fit(ContentFit::Contain);
        picture.set_can_shrink(true);
        picture.set_hexpand(true);
        picture.set_vexpand(true);

        let stage = GtkBox::new(Orientation::Horizontal, 12);
        stage.set_margin_start(16);
        stage.set_margin_end(16);
        stage.set_margin_bottom(24);
        stage.set_vexpand(true);
        stage.append(&prev_btn);
        stage.append(&picture);
        stage.append(&next_btn);

        root.append(&top_bar);
        root.append(&stage);

        let backdrop_click = GestureClick::new();
        let view_weak = self.self_weak.borrow().clone();
        let root_weak = root.downgrade();
        let picture_weak = picture.downgrade();
        backdrop_click.connect_released(move |_, _n, x, y| {
            let (Some(view), Some(root), Some(picture)) =
                (view_weak.upgrade(), root_weak.upgrade(), picture_weak.upgrade())
            else {
                return;
            };
            view.handle_click(click_target(&root, &picture, x, y));
        });
        root.add_controller(backdrop_click);

        let view_weak = self.self_weak.borrow().clone();
        close_btn.connect_clicked(move |_| {
            if let Some(view) = view_weak.upgrade() {
                view.close();
            }
        });

        let view_weak = self.self_weak.borrow().clone();
        prev_btn.connect_clicked(move |_| {
            if let Some(view) = view_weak.upgrade() {
                view.navigate(NavDirection::Backward);
            }
        });

        let view_weak = self.self_weak.borrow().clone();
        next_btn.connect_clicked(move |_| {
            if let Some(view) = view_weak.upgrade() {
                view.navigate(NavDirection::Forward);
            }
        });

        self.host.add_overlay(&root);

        let view_weak = self.self_weak.borrow().clone();
        let keys = KeySubscription::attach(&self.key_target, move |command| {
            if let Some(view) = view_weak.upgrade() {
                view.handle_command(command);
            }
        });

        MountedLightbox {
            session,
            root,
            picture,
            counter,
            keys: Some(keys),
            swap_timer: None,
            teardown_timer: None,
        }
    }

    /// Remove the mounted overlay immediately, without animation
    fn destroy_mounted(&self) {
        let mounted = self.mounted.borrow_mut().take();
        if let Some(mut mounted) = mounted {
            mounted.cancel_timers();
            drop(mounted.keys.take());
            self.host.remove_overlay(&mounted.root);
        }
    }

    fn begin_close(&self, session: SessionId) {
        let mut mounted = self.mounted.borrow_mut();
        let Some(mounted) = mounted.as_mut() else {
            return;
        };
        if mounted.session != session {
            return;
        }

        tracing::info!("Closing lightbox");
        mounted.root.remove_css_class("active");
        mounted.root.add_css_class("closing");
        if let Some(keys) = mounted.keys.take() {
            keys.detach();
        }
        if let Some(source) = mounted.swap_timer.take() {
            source.remove();
        }

        let view_weak = self.self_weak.borrow().clone();
        mounted.teardown_timer = Some(glib::timeout_add_local_once(
            CLOSE_TEARDOWN_DELAY,
            move || {
                if let Some(view) = view_weak.upgrade() {
                    view.finish_close(session);
                }
            },
        ));
    }

    fn finish_close(&self, session: SessionId) {
        {
            let mut mounted = self.mounted.borrow_mut();
            match mounted.as_mut() {
                // The timer that called us has already been consumed
                Some(mounted) if mounted.session == session => mounted.teardown_timer = None,
                _ => return,
            }
        }

        if self.navigator.borrow_mut().finish_close(session) {
            self.destroy_mounted();
        }
    }

    fn finish_swap(&self, frame: Frame) {
        {
            let mut mounted = self.mounted.borrow_mut();
            match mounted.as_mut() {
                Some(mounted) if mounted.session == frame.session => mounted.swap_timer = None,
                _ => return,
            }
        }

        self.show_frame(&frame);
        if let Some(mounted) = self.mounted.borrow().as_ref() {
            mounted.picture.remove_css_class("fading");
        }
    }

    /// Display a frame: counter text plus the best texture available
    fn show_frame(&self, frame: &Frame) {
        let path = frame.photo.path.clone();
        let cached = self.textures.borrow_mut().get(&path).cloned();

        {
            let mounted = self.mounted.borrow();
            let Some(mounted) = mounted.as_ref() else {
                return;
            };
            mounted.counter.set_text(&frame.counter());

            if let Some(texture) = cached.as_ref() {
                mounted.picture.set_paintable(Some(texture));
            } else if let Some(texture) =
                frame.photo.thumbnail.as_deref().and_then(texture_from_thumbnail)
            {
                mounted.picture.set_paintable(Some(&texture));
            } else {
                mounted.picture.set_filename(Some(&path));
            }
        }

        if cached.is_none() {
            self.request_full(path);
        }
    }

    fn request_full(&self, path: PathBuf) {
        let generation = self.load_generation.get().wrapping_add(1);
        self.load_generation.set(generation);

        let sender = self.load_sender.clone();
        self.runtime.spawn_blocking(move || match decode_full(&path) {
            Ok(decoded) => {
                let _ = sender.send_blocking(FullImage {
                    generation,
                    path,
                    rgba: decoded.rgba,
                    width: decoded.width,
                    height: decoded.height,
                });
            }
            Err(err) => {
                tracing::debug!(error = ?err, "Full-resolution decode failed");
            }
        });
    }

    fn handle_full_image(&self, image: FullImage) {
        let Some(texture) = texture_from_rgba(image.rgba, image.width, image.height) else {
            return;
        };
        self.textures
            .borrow_mut()
            .put(image.path.clone(), texture.clone());

        // Stale results only warm the cache
        if image.generation != self.load_generation.get() {
            return;
        }
        let current = self.navigator.borrow().current_frame();
        if current.is_some_and(|frame| frame.photo.path == image.path) {
            if let Some(mounted) = self.mounted.borrow().as_ref() {
                mounted.picture.set_paintable(Some(&texture));
            }
        }
    }
}
