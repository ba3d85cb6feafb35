// Gallery track for the showcase page
// Horizontal strip of discovered photos with scroll controls and a counter.
// Entries are appended as discovery accepts photos; clicking one opens the
// lightbox on the shared photo set.

use gtk4::prelude::*;
use gtk4::{
    Align, Box as GtkBox, Button, ContentFit, GestureClick, Label, Orientation, Picture,
    PolicyType, ScrolledWindow, TickCallbackId,
};
use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::Rc;

use super::texture::texture_from_thumbnail;
use crate::gallery::{ease_out_cubic, scroll_target, GallerySurface, ScrollDirection};
use crate::models::{DiscoveredPhoto, PhotoSet};

const ENTRY_WIDTH: i32 = 240;
const ENTRY_HEIGHT: i32 = 170;
/// Duration of the smooth scroll animation in microseconds (frame clock units).
const SCROLL_ANIMATION_US: i64 = 350_000;

type ActivateCallback = Rc<dyn Fn(PhotoSet, usize)>;

pub struct GalleryTrack {
    root: GtkBox,
    strip: GtkBox,
    scroller: ScrolledWindow,
    track: GtkBox,
    counter: Label,
    placeholder: Label,
    scroll_step: f64,
    on_activate: RefCell<Option<ActivateCallback>>,
    scroll_animation: RefCell<Option<TickCallbackId>>,
}

impl GalleryTrack {
    pub fn new(scroll_step: f64) -> Rc<Self> {
        let root = GtkBox::new(Orientation::Vertical, 8);
        root.add_css_class("gallery");

        let counter = Label::new(Some(""));
        counter.set_widget_name("gallery-counter");
        counter.add_css_class("gallery-counter");
        counter.set_halign(Align::End);

        let prev = Button::with_label("\u{2039}");
        prev.set_widget_name("gallery-prev");
        prev.add_css_class("gallery-nav");
        prev.set_valign(Align::Center);
        prev.set_tooltip_text(Some("Scroll left"));

        let next = Button::with_label("\u{203a}");
        next.set_widget_name("gallery-next");
        next.add_css_class("gallery-nav");
        next.set_valign(Align::Center);
        next.set_tooltip_text(Some("Scroll right"));

        let track = GtkBox::new(Orientation::Horizontal, 12);
        track.set_widget_name("gallery-track");
        track.add_css_class("gallery-track");

        let scroller = ScrolledWindow::builder()
            .hscrollbar_policy(PolicyType::External)
            .vscrollbar_policy(PolicyType::Never)
            .hexpand(true)
            .child(&track)
            .build();

        let strip = GtkBox::new(Orientation::Horizontal, 8);
        strip.append(&prev);
        strip.append(&scroller);
        strip.append(&next);

        let placeholder = Label::new(None);
        placeholder.add_css_class("gallery-placeholder");
        placeholder.set_visible(false);

        root.append(&counter);
        root.append(&strip);
        root.append(&placeholder);

        let gallery = Rc::new(Self {
            root,
            strip,
            scroller,
            track,
            counter,
            placeholder,
            scroll_step,
            on_activate: RefCell::new(None),
            scroll_animation: RefCell::new(None),
        });

        let gallery_weak = Rc::downgrade(&gallery);
        prev.connect_clicked(move |_| {
            if let Some(gallery) = gallery_weak.upgrade() {
                gallery.scroll(ScrollDirection::Left);
            }
        });

        let gallery_weak = Rc::downgrade(&gallery);
        next.connect_clicked(move |_| {
            if let Some(gallery) = gallery_weak.upgrade() {
                gallery.scroll(ScrollDirection::Right);
            }
        });

        gallery
    }

    pub fn widget(&self) -> &GtkBox {
        &self.root
    }

    /// Connect callback for clicks on a gallery entry
    pub fn connect_photo_activated<F>(&self, callback: F)
    where
        F: Fn(PhotoSet, usize) + 'static,
    {
        *self.on_activate.borrow_mut() = Some(Rc::new(callback));
    }

    /// Shift the track by one step with an eased animation
    pub fn scroll(self: &Rc<Self>, direction: ScrollDirection) {
        let adjustment = self.scroller.hadjustment();
        let Some(target) = scroll_target(
            adjustment.value(),
            direction,
            self.scroll_step,
            adjustment.lower(),
            adjustment.upper(),
            adjustment.page_size(),
        ) else {
            return;
        };

        self.stop_scroll_animation();

        let start = adjustment.value();
        let started_at: Cell<Option<i64>> = Cell::new(None);
        let gallery_weak = Rc::downgrade(self);
        let id = self.scroller.add_tick_callback(move |_, clock| {
            let now = clock.frame_time();
            let begin = match started_at.get() {
                Some(begin) => begin,
                None => {
                    started_at.set(Some(now));
                    now
                }
            };
            let progress = (now - begin) as f64 / SCROLL_ANIMATION_US as f64;
            adjustment.set_value(start + (target - start) * ease_out_cubic(progress));

            if progress >= 1.0 {
                if let Some(gallery) = gallery_weak.upgrade() {
                    gallery.scroll_animation.borrow_mut().take();
                }
                return glib::ControlFlow::Break;
            }
            glib::ControlFlow::Continue
        });
        *self.scroll_animation.borrow_mut() = Some(id);
    }

    fn stop_scroll_animation(&self) {
        if let Some(id) = self.scroll_animation.borrow_mut().take() {
            id.remove();
        }
    }

    fn build_entry(self: &Rc<Self>, set: &PhotoSet, photo: &DiscoveredPhoto) -> Picture {
        let picture = match photo.thumbnail.as_deref().and_then(texture_from_thumbnail) {
            Some(texture) => Picture::for_paintable(&texture),
            None => Picture::for_filename(&photo.path),
        };
        picture.set_content_fit(ContentFit::Cover);
        picture.set_can_shrink(true);
        picture.set_size_request(ENTRY_WIDTH, ENTRY_HEIGHT);
        picture.add_css_class("gallery-item");
        picture.set_cursor_from_name(Some("pointer"));
        picture.set_tooltip_text(Some(&format!(
            "{} ({}\u{00d7}{})",
            photo.file_name(),
            photo.width,
            photo.height
        )));

        // Resolve the position when clicked; the set only ever grows.
        let click = GestureClick::new();
        let gallery_weak = Rc::downgrade(self);
        let set = set.clone();
        let path: PathBuf = photo.path.clone();
        click.connect_released(move |_, _n, _x, _y| {
            let Some(gallery) = gallery_weak.upgrade() else {
                return;
            };
            let Some(position) = set.position_of(&path) else {
                return;
            };
            let callback = gallery.on_activate.borrow().clone();
            if let Some(callback) = callback {
                callback(set.clone(), position);
            }
        });
        picture.add_controller(click);

        picture
    }
}

impl GallerySurface for Rc<GalleryTrack> {
    fn append_entry(&mut self, set: &PhotoSet, photo: &DiscoveredPhoto) {
        let entry = self.build_entry(set, photo);
        self.track.append(&entry);
    }

    fn set_counter(&mut self, text: &str) {
        self.counter.set_text(text);
    }

    fn show_placeholder(&mut self, message: &str) {
        self.strip.set_visible(false);
        self.placeholder.set_text(message);
        self.placeholder.set_visible(true);
    }
}
