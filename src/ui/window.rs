// Main window for the showcase landing page
// Hero, fact cards and the photo gallery scroll over an ambient particle
// canvas; the lightbox is mounted on the window's root overlay.

use gdk4::Display;
use gtk4::prelude::*;
use gtk4::{
    Align, Application, ApplicationWindow, Box as GtkBox, Button, CssProvider, FlowBox, Justification,
    Label, Orientation, Overlay, PolicyType, ScrolledWindow, SelectionMode, Widget,
    STYLE_PROVIDER_PRIORITY_APPLICATION,
};
use std::cell::RefCell;
use std::path::Path;
use std::rc::{Rc, Weak};
use std::time::Duration;
use tokio::runtime::Handle;

use super::gallery::GalleryTrack;
use super::lightbox::LightboxView;
use super::particles::ParticleCanvas;
use crate::config::ShowcaseConfig;
use crate::content::{self, FACT_CARDS};
use crate::discovery::{DiscoveryEngine, DiscoveryOptions, FsProbe};
use crate::gallery::GalleryAssembler;
use crate::models::PhotoSet;
use crate::reveal::{
    parse_delay, visible_fraction, RevealAction, RevealController, CARD_THRESHOLD,
    HEADER_THRESHOLD,
};

/// Scroll offset after which the header switches to its compact style
const HEADER_SCROLL_OFFSET: f64 = 50.0;
const HERO_FADE_DELAY: Duration = Duration::from_millis(500);

/// Embedded stylesheet, replaceable through `SHOWCASE_CSS`
const FALLBACK_CSS: &str = r#"
window {
    background-color: #0b0f14;
    color: #e6e6e6;
}

.main-header {
    padding: 18px 32px;
    background-color: transparent;
    transition: background-color 300ms ease, padding 300ms ease;
}

.main-header.scrolled {
    padding: 10px 32px;
    background-color: rgba(11, 15, 20, 0.92);
}

.brand {
    font-weight: bold;
    letter-spacing: 4px;
}

.hero {
    min-height: 520px;
}

.hero-content {
    opacity: 0;
    transition: opacity 1200ms ease;
}

.hero-content.loaded {
    opacity: 1;
}

.hero-title {
    font-size: 48px;
    font-weight: 300;
    letter-spacing: 12px;
}

.hero-subtitle {
    color: #9aa4ae;
}

.section {
    padding: 48px 32px;
}

.section-header {
    font-size: 22px;
    letter-spacing: 6px;
    opacity: 0;
    transition: opacity 600ms ease;
}

.section-header.visible {
    opacity: 1;
}

.fact-card {
    padding: 24px;
    background-color: rgba(255, 255, 255, 0.04);
    border: 1px solid rgba(255, 255, 255, 0.08);
    border-radius: 6px;
    opacity: 0;
    transform: translateY(30px);
    transition: opacity 600ms ease, transform 600ms ease;
}

.fact-card.visible {
    opacity: 1;
    transform: none;
}

.fact-title {
    font-weight: bold;
    letter-spacing: 2px;
}

.facts-close {
    min-width: 28px;
    min-height: 28px;
}

.gallery-item {
    border-radius: 4px;
    transition: opacity 200ms ease;
}

.gallery-item:hover {
    opacity: 0.85;
}

.gallery-counter {
    color: #9aa4ae;
    letter-spacing: 3px;
}

.gallery-placeholder {
    color: #6b7580;
    padding: 48px;
}

.lightbox {
    background-color: rgba(0, 0, 0, 0.92);
    opacity: 0;
    transition: opacity 300ms ease;
}

.lightbox.active {
    opacity: 1;
}

.lightbox-image {
    transition: opacity 200ms ease;
}

.lightbox-image.fading {
    opacity: 0;
}

.lightbox-counter {
    letter-spacing: 2px;
}

.lightbox-close,
.lightbox-nav {
    background: transparent;
    border: none;
    color: #e6e6e6;
    font-size: 28px;
}
"#;

fn load_css(override_path: Option<&Path>) {
    let provider = CssProvider::new();

    match override_path {
        Some(path) if path.exists() => {
            provider.load_from_path(path);
            tracing::info!("Loaded CSS from: {}", path.display());
        }
        Some(path) => {
            tracing::warn!("Stylesheet {} not found, using embedded CSS", path.display());
            provider.load_from_string(FALLBACK_CSS);
        }
        None => {
            provider.load_from_string(FALLBACK_CSS);
            tracing::debug!("Loaded embedded CSS");
        }
    }

    if let Some(display) = Display::default() {
        gtk4::style_context_add_provider_for_display(
            &display,
            &provider,
            STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}

fn header_scrolled(offset: f64) -> bool {
    offset > HEADER_SCROLL_OFFSET
}

fn section_header(text: &str) -> Label {
    let label = Label::new(Some(text));
    label.add_css_class("section-header");
    label.set_halign(Align::Start);
    label
}

fn fact_card(card: &content::FactCard) -> GtkBox {
    let widget = GtkBox::new(Orientation::Vertical, 8);
    widget.add_css_class("fact-card");

    let title = Label::new(Some(card.title));
    title.add_css_class("fact-title");
    title.set_halign(Align::Start);

    let body = Label::new(Some(card.body));
    body.set_wrap(true);
    body.set_max_width_chars(36);
    body.set_xalign(0.0);

    widget.append(&title);
    widget.append(&body);
    widget
}

/// Landing page window
pub struct LandingWindow {
    self_weak: RefCell<Weak<LandingWindow>>,
    window: ApplicationWindow,
    scroller: ScrolledWindow,
    page: GtkBox,
    header: GtkBox,
    hero_content: GtkBox,
    gallery: Rc<GalleryTrack>,
    lightbox: Rc<LightboxView>,
    particles: Option<Rc<ParticleCanvas>>,
    reveal: RefCell<RevealController>,
    /// Widget for each reveal slot, indexed by slot
    reveal_targets: RefCell<Vec<Widget>>,
    config: ShowcaseConfig,
    runtime: Handle,
}

impl LandingWindow {
    pub fn new(app: &Application, config: ShowcaseConfig, runtime: Handle) -> Rc<Self> {
        load_css(config.css_override.as_deref());

        let window = ApplicationWindow::builder()
            .application(app)
            .title(content::PAGE_TITLE)
            .default_width(1280)
            .default_height(860)
            .build();

        // Header
        let header = GtkBox::new(Orientation::Horizontal, 24);
        header.set_widget_name("main-header");
        header.add_css_class("main-header");
        header.set_valign(Align::Start);
        let brand = Label::new(Some(content::HERO_TITLE));
        brand.add_css_class("brand");
        brand.set_halign(Align::Start);
        brand.set_hexpand(true);
        header.append(&brand);

        // Hero
        let hero = GtkBox::new(Orientation::Vertical, 0);
        hero.add_css_class("hero");
        let hero_content = GtkBox::new(Orientation::Vertical, 16);
        hero_content.add_css_class("hero-content");
        hero_content.set_valign(Align::Center);
        hero_content.set_vexpand(true);
        let hero_title = Label::new(Some(content::HERO_TITLE));
        hero_title.add_css_class("hero-title");
        let hero_subtitle = Label::new(Some(content::HERO_SUBTITLE));
        hero_subtitle.add_css_class("hero-subtitle");
        hero_subtitle.set_justify(Justification::Center);
        hero_subtitle.set_wrap(true);
        hero_content.append(&hero_title);
        hero_content.append(&hero_subtitle);
        hero.append(&hero_content);

        // Facts
        let facts_section = GtkBox::new(Orientation::Vertical, 24);
        facts_section.set_widget_name("facts-section");
        facts_section.add_css_class("section");

        let facts_bar = GtkBox::new(Orientation::Horizontal, 8);
        let facts_header = section_header(content::FACTS_HEADER);
        facts_header.set_hexpand(true);
        let facts_close = Button::with_label("\u{00d7}");
        facts_close.set_widget_name("facts-close");
        facts_close.add_css_class("facts-close");
        facts_close.set_tooltip_text(Some("Hide"));
        facts_bar.append(&facts_header);
        facts_bar.append(&facts_close);

        let facts_grid = FlowBox::new();
        facts_grid.set_selection_mode(SelectionMode::None);
        facts_grid.set_column_spacing(24);
        facts_grid.set_row_spacing(24);
        facts_grid.set_homogeneous(true);
        facts_grid.set_max_children_per_line(4);

        facts_section.append(&facts_bar);
        facts_section.append(&facts_grid);

        // Gallery
        let gallery_section = GtkBox::new(Orientation::Vertical, 24);
        gallery_section.add_css_class("section");
        let gallery_header = section_header(content::GALLERY_HEADER);
        let gallery = GalleryTrack::new(config.gallery_step);
        gallery_section.append(&gallery_header);
        gallery_section.append(gallery.widget());

        let page = GtkBox::new(Orientation::Vertical, 0);
        page.append(&hero);
        page.append(&facts_section);
        page.append(&gallery_section);

        let scroller = ScrolledWindow::new();
        scroller.set_policy(PolicyType::Never, PolicyType::Automatic);
        scroller.set_child(Some(&page));
        scroller.set_hexpand(true);
        scroller.set_vexpand(true);

        // Layers: particles, page, header
        let page_layer = Overlay::new();
        let particles = config
            .particles_enabled
            .then(|| ParticleCanvas::new(config.particle_limit));
        match particles.as_ref() {
            Some(canvas) => {
                page_layer.set_child(Some(canvas.widget()));
                page_layer.add_overlay(&scroller);
                page_layer.set_measure_overlay(&scroller, true);
            }
            None => page_layer.set_child(Some(&scroller)),
        }
        page_layer.add_overlay(&header);

        let root = Overlay::new();
        root.set_child(Some(&page_layer));
        window.set_child(Some(&root));

        let lightbox = LightboxView::new(&root, &window, runtime.clone(), config.lightbox_cache);

        let landing = Rc::new(Self {
            self_weak: RefCell::new(Weak::new()),
            window,
            scroller,
            page,
            header,
            hero_content,
            gallery,
            lightbox,
            particles,
            reveal: RefCell::new(RevealController::new()),
            reveal_targets: RefCell::new(Vec::new()),
            config,
            runtime,
        });
        *landing.self_weak.borrow_mut() = Rc::downgrade(&landing);

        // Reveal targets
        landing.observe(facts_header.upcast_ref(), Duration::ZERO, HEADER_THRESHOLD);
        for card in FACT_CARDS {
            let widget = fact_card(card);
            facts_grid.insert(&widget, -1);
            landing.observe(widget.upcast_ref(), parse_delay(card.delay), CARD_THRESHOLD);
        }
        landing.observe(gallery_header.upcast_ref(), Duration::ZERO, HEADER_THRESHOLD);

        let landing_weak = Rc::downgrade(&landing);
        let section = facts_section.clone();
        facts_close.connect_clicked(move |_| {
            section.set_visible(false);
            if let Some(landing) = landing_weak.upgrade() {
                landing.update_reveal();
            }
        });

        let lightbox_weak = Rc::downgrade(&landing.lightbox);
        landing.gallery.connect_photo_activated(move |set, index| {
            if let Some(lightbox) = lightbox_weak.upgrade() {
                lightbox.open(set, index);
            }
        });

        landing.setup_scroll_tracking();

        if let Some(canvas) = landing.particles.as_ref() {
            canvas.follow_visibility(&landing.window);
        }

        landing
    }

    pub fn present(&self) {
        self.window.present();
        self.scroller.vadjustment().set_value(0.0);

        let hero = self.hero_content.clone();
        glib::timeout_add_local_once(HERO_FADE_DELAY, move || {
            hero.add_css_class("loaded");
        });

        if let Some(canvas) = self.particles.as_ref() {
            canvas.frame_loop().start();
        }

        self.start_discovery();
        tracing::info!("Showcase loaded from {}", self.config.photo_dir.display());
    }

    pub fn connect_close_request<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.window.connect_close_request(move |_| {
            callback();
            glib::Propagation::Proceed
        });
    }

    fn observe(&self, widget: &Widget, delay: Duration, threshold: f64) {
        let slot = self.reveal.borrow_mut().observe(delay, threshold);
        let mut targets = self.reveal_targets.borrow_mut();
        debug_assert_eq!(slot, targets.len());
        targets.push(widget.clone());
    }

    fn setup_scroll_tracking(&self) {
        let adjustment = self.scroller.vadjustment();

        let landing_weak = self.self_weak.borrow().clone();
        adjustment.connect_value_changed(move |adjustment| {
            if let Some(landing) = landing_weak.upgrade() {
                landing.on_scrolled(adjustment.value());
            }
        });

        // Fires on every relayout, which covers the initial pass and resizes
        let landing_weak = self.self_weak.borrow().clone();
        adjustment.connect_changed(move |adjustment| {
            if let Some(landing) = landing_weak.upgrade() {
                landing.on_scrolled(adjustment.value());
            }
        });
    }

    fn on_scrolled(&self, offset: f64) {
        if header_scrolled(offset) {
            self.header.add_css_class("scrolled");
        } else {
            self.header.remove_css_class("scrolled");
        }
        self.update_reveal();
    }

    /// Feed every observed widget's visible fraction to the reveal controller
    fn update_reveal(&self) {
        let adjustment = self.scroller.vadjustment();
        let (viewport_top, viewport_height) = (adjustment.value(), adjustment.page_size());

        let targets = self.reveal_targets.borrow().clone();
        for (slot, widget) in targets.iter().enumerate() {
            let fraction = if widget.is_mapped() {
                widget
                    .compute_bounds(&self.page)
                    .map(|bounds| {
                        visible_fraction(
                            f64::from(bounds.y()),
                            f64::from(bounds.height()),
                            viewport_top,
                            viewport_height,
                        )
                    })
                    .unwrap_or(0.0)
            } else {
                0.0
            };

            let action = self.reveal.borrow_mut().update(slot, fraction);
            if let Some(action) = action {
                self.apply_reveal(action, widget);
            }
        }
    }

    fn apply_reveal(&self, action: RevealAction, widget: &Widget) {
        match action {
            RevealAction::Show { .. } => widget.add_css_class("visible"),
            RevealAction::Hide { .. } => widget.remove_css_class("visible"),
            RevealAction::ShowAfter { slot, delay, token } => {
                let landing_weak = self.self_weak.borrow().clone();
                let widget = widget.clone();
                glib::timeout_add_local_once(delay, move || {
                    let Some(landing) = landing_weak.upgrade() else {
                        return;
                    };
                    if landing.reveal.borrow_mut().fire(slot, token) {
                        widget.add_css_class("visible");
                    }
                });
            }
        }
    }

    /// Sweep the photo directory on the main context, filling the gallery
    fn start_discovery(&self) {
        let probe = FsProbe::new(self.runtime.clone(), self.config.thumbnail_size);
        let options = DiscoveryOptions {
            max_index: self.config.max_photos,
            ..DiscoveryOptions::default()
        };
        let engine = DiscoveryEngine::new(probe, self.config.photo_dir.clone(), options);
        let gallery = self.gallery.clone();

        glib::spawn_future_local(async move {
            let set = PhotoSet::new();
            let mut assembler = GalleryAssembler::new(gallery);
            let report = engine.run(&set, &mut assembler).await;
            tracing::debug!(
                entries = assembler.entries(),
                attempts = report.attempts,
                "Gallery assembled"
            );
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_switches_after_offset() {
        assert!(!header_scrolled(0.0));
        assert!(!header_scrolled(50.0));
        assert!(header_scrolled(50.5));
        assert!(header_scrolled(800.0));
    }

    #[test]
    fn test_embedded_css_styles_state_classes() {
        for selector in [
            ".lightbox.active",
            ".lightbox-image.fading",
            ".fact-card.visible",
            ".section-header.visible",
            ".main-header.scrolled",
            ".hero-content.loaded",
            ".gallery-item",
            ".gallery-placeholder",
        ] {
            assert!(FALLBACK_CSS.contains(selector), "missing {selector}");
        }
    }
}
