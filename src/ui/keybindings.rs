// Keybindings for the lightbox overlay
//
// Keybindings (only while a lightbox session is open):
// - Escape: Close the lightbox
// - Left: Previous photo
// - Right: Next photo
//
// The key controller lives exactly as long as its `KeySubscription`; dropping
// or detaching the subscription removes it from the widget, so repeated
// open/close cycles never stack handlers.

use gdk4::Key;
use gtk4::prelude::*;
use gtk4::{EventControllerKey, PropagationPhase, Widget};

/// Action requested from the keyboard while the lightbox is open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightboxCommand {
    Close,
    Previous,
    Next,
}

impl LightboxCommand {
    pub fn from_key(keyval: Key) -> Option<Self> {
        match keyval {
            Key::Escape => Some(Self::Close),
            Key::Left => Some(Self::Previous),
            Key::Right => Some(Self::Next),
            _ => None,
        }
    }
}

/// A key controller attached to a widget for a bounded period
pub struct KeySubscription {
    controller: EventControllerKey,
    widget: glib::WeakRef<Widget>,
}

impl KeySubscription {
    /// Attach a capture-phase key controller that forwards lightbox commands
    pub fn attach<F>(widget: &impl IsA<Widget>, handler: F) -> Self
    where
        F: Fn(LightboxCommand) + 'static,
    {
        let controller = EventControllerKey::new();
        controller.set_propagation_phase(PropagationPhase::Capture);

        controller.connect_key_pressed(move |_controller, keyval, _keycode, _state| {
            match LightboxCommand::from_key(keyval) {
                Some(command) => {
                    handler(command);
                    glib::Propagation::Stop
                }
                None => glib::Propagation::Proceed,
            }
        });

        widget.add_controller(controller.clone());
        tracing::trace!("Attached lightbox key controller");

        Self {
            controller,
            widget: widget.upcast_ref::<Widget>().downgrade(),
        }
    }

    /// Remove the controller now
    pub fn detach(self) {
        drop(self);
    }
}

impl Drop for KeySubscription {
    fn drop(&mut self) {
        if let Some(widget) = self.widget.upgrade() {
            widget.remove_controller(&self.controller);
            tracing::trace!("Detached lightbox key controller");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lightbox_keys() {
        assert_eq!(LightboxCommand::from_key(Key::Escape), Some(LightboxCommand::Close));
        assert_eq!(LightboxCommand::from_key(Key::Left), Some(LightboxCommand::Previous));
        assert_eq!(LightboxCommand::from_key(Key::Right), Some(LightboxCommand::Next));
    }

    #[test]
    fn test_other_keys_pass_through() {
        assert_eq!(LightboxCommand::from_key(Key::Up), None);
        assert_eq!(LightboxCommand::from_key(Key::space), None);
        assert_eq!(LightboxCommand::from_key(Key::Return), None);
        assert_eq!(LightboxCommand::from_key(Key::h), None);
    }

    #[test]
    fn test_arrow_scenario_drives_navigation() {
        use crate::discovery::Extension;
        use crate::lightbox::{LightboxNavigator, NavDirection};
        use crate::models::{DiscoveredPhoto, PhotoSet};
        use std::path::PathBuf;

        let set = PhotoSet::new();
        for (index, name, extension) in [
            (1, "photo1.jpg", Extension::Jpg),
            (2, "photo2.png", Extension::Png),
        ] {
            set.push(DiscoveredPhoto {
                index,
                extension,
                path: PathBuf::from(name),
                width: 1,
                height: 1,
                thumbnail: None,
            });
        }

        let mut navigator = LightboxNavigator::new();
        let opened = navigator.open(set, 0).unwrap();
        assert_eq!(opened.frame.counter(), "1 / 2");
        navigator.mark_rendered(opened.frame.session);

        let press = |navigator: &mut LightboxNavigator, key: Key| {
            match LightboxCommand::from_key(key) {
                Some(LightboxCommand::Next) => navigator.navigate(NavDirection::Forward),
                Some(LightboxCommand::Previous) => navigator.navigate(NavDirection::Backward),
                _ => None,
            }
        };

        let frame = press(&mut navigator, Key::Right).unwrap();
        assert_eq!(frame.counter(), "2 / 2");
        assert_eq!(frame.photo.path, PathBuf::from("photo2.png"));

        let frame = press(&mut navigator, Key::Right).unwrap();
        assert_eq!(frame.counter(), "1 / 2");
        assert_eq!(frame.photo.path, PathBuf::from("photo1.jpg"));

        let frame = press(&mut navigator, Key::Left).unwrap();
        assert_eq!(frame.counter(), "2 / 2");
    }
}
