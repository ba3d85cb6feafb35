// Particle canvas drawn behind the page content
// The field is created on the first size allocation and stepped from a
// frame-clock tick callback that can be cancelled and restarted.

use gtk4::prelude::*;
use gtk4::{DrawingArea, TickCallbackId};
use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;

use crate::particles::ParticleField;

type SharedField = Rc<RefCell<Option<ParticleField>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopChange {
    Start,
    Cancel,
}

/// What the frame loop must do when window visibility changes.
fn visibility_change(running: bool, suspended: bool) -> Option<LoopChange> {
    match (running, suspended) {
        (true, true) => Some(LoopChange::Cancel),
        (false, false) => Some(LoopChange::Start),
        _ => None,
    }
}

/// Per-frame driver for the particle field
pub struct FrameLoop {
    area: DrawingArea,
    field: SharedField,
    tick: RefCell<Option<TickCallbackId>>,
}

impl FrameLoop {
    fn new(area: &DrawingArea, field: SharedField) -> Self {
        Self {
            area: area.clone(),
            field,
            tick: RefCell::new(None),
        }
    }

    pub fn is_running(&self) -> bool {
        self.tick.borrow().is_some()
    }

    pub fn start(&self) {
        if self.is_running() {
            return;
        }
        let field = self.field.clone();
        let id = self.area.add_tick_callback(move |area, _clock| {
            if let Some(field) = field.borrow_mut().as_mut() {
                field.step();
            }
            area.queue_draw();
            glib::ControlFlow::Continue
        });
        *self.tick.borrow_mut() = Some(id);
    }

    pub fn cancel(&self) {
        if let Some(id) = self.tick.borrow_mut().take() {
            id.remove();
        }
    }
}

pub struct ParticleCanvas {
    area: DrawingArea,
    frame_loop: FrameLoop,
}

impl ParticleCanvas {
    pub fn new(limit: usize) -> Rc<Self> {
        let area = DrawingArea::new();
        area.set_widget_name("particles");
        area.add_css_class("particles");
        area.set_hexpand(true);
        area.set_vexpand(true);
        area.set_can_target(false);

        let field: SharedField = Rc::new(RefCell::new(None));

        // Count is fixed at first allocation; later resizes only move the bounds
        let field_for_resize = field.clone();
        area.connect_resize(move |_, width, height| {
            let (width, height) = (f64::from(width), f64::from(height));
            let mut slot = field_for_resize.borrow_mut();
            match slot.as_mut() {
                Some(field) => field.resize(width, height),
                None => {
                    let field = ParticleField::new(width, height, limit, &mut rand::thread_rng());
                    tracing::debug!(count = field.particles().len(), "Particle field created");
                    *slot = Some(field);
                }
            }
        });

        let field_for_draw = field.clone();
        area.set_draw_func(move |_, cr, _width, _height| {
            let field = field_for_draw.borrow();
            let Some(field) = field.as_ref() else {
                return;
            };
            for particle in field.particles() {
                cr.set_source_rgba(1.0, 1.0, 1.0, particle.opacity);
                cr.arc(particle.x, particle.y, particle.radius, 0.0, TAU);
                let _ = cr.fill();
            }
        });

        let frame_loop = FrameLoop::new(&area, field);
        Rc::new(Self { area, frame_loop })
    }

    pub fn widget(&self) -> &DrawingArea {
        &self.area
    }

    pub fn frame_loop(&self) -> &FrameLoop {
        &self.frame_loop
    }

    /// Run while `window` is visible, pause while it is suspended.
    pub fn follow_visibility(self: &Rc<Self>, window: &impl IsA<gtk4::Window>) {
        let canvas_weak = Rc::downgrade(self);
        window.connect_suspended_notify(move |window| {
            let Some(canvas) = canvas_weak.upgrade() else {
                return;
            };
            match visibility_change(canvas.frame_loop.is_running(), window.is_suspended()) {
                Some(LoopChange::Cancel) => {
                    tracing::debug!("Window suspended, pausing particles");
                    canvas.frame_loop.cancel();
                }
                Some(LoopChange::Start) => {
                    tracing::debug!("Window visible, resuming particles");
                    canvas.frame_loop.start();
                }
                None => {}
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suspend_cancels_running_loop() {
        assert_eq!(visibility_change(true, true), Some(LoopChange::Cancel));
    }

    #[test]
    fn test_resume_restarts_stopped_loop() {
        assert_eq!(visibility_change(false, false), Some(LoopChange::Start));
    }

    #[test]
    fn test_repeated_notifications_are_ignored() {
        assert_eq!(visibility_change(true, false), None);
        assert_eq!(visibility_change(false, true), None);
    }

    #[test]
    fn test_hide_show_cycle() {
        let mut running = true;
        for suspended in [true, true, false, false, true, false] {
            match visibility_change(running, suspended) {
                Some(LoopChange::Cancel) => running = false,
                Some(LoopChange::Start) => running = true,
                None => {}
            }
            assert_eq!(running, !suspended);
        }
    }
}
