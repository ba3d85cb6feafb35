//! Scroll-triggered reveal of page elements.
//!
//! Elements are shown when enough of them is inside the viewport and hidden
//! again as soon as they leave, so scrolling back re-plays the reveal.

use std::time::Duration;

/// Visible fraction required for fact cards.
pub const CARD_THRESHOLD: f64 = 0.2;
/// Visible fraction required for section headers.
pub const HEADER_THRESHOLD: f64 = 0.15;

/// Parse a per-element delay in milliseconds. Absent, unparsable or
/// negative values mean no delay.
pub fn parse_delay(raw: Option<&str>) -> Duration {
    raw.and_then(|value| value.trim().parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::ZERO)
}

/// Fraction of an element (`top`, `height`) inside the viewport.
pub fn visible_fraction(top: f64, height: f64, viewport_top: f64, viewport_height: f64) -> f64 {
    if height <= 0.0 || viewport_height <= 0.0 {
        return 0.0;
    }
    let start = top.max(viewport_top);
    let end = (top + height).min(viewport_top + viewport_height);
    ((end - start).max(0.0) / height).clamp(0.0, 1.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealToken(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealAction {
    Show { slot: usize },
    /// Show after `delay`, then confirm with [`RevealController::fire`].
    ShowAfter {
        slot: usize,
        delay: Duration,
        token: RevealToken,
    },
    Hide { slot: usize },
}

#[derive(Debug)]
struct Slot {
    delay: Duration,
    threshold: f64,
    in_view: bool,
    visible: bool,
    pending: Option<RevealToken>,
}

#[derive(Debug, Default)]
pub struct RevealController {
    slots: Vec<Slot>,
    next_token: u64,
}

impl RevealController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start watching an element; returns its slot.
    pub fn observe(&mut self, delay: Duration, threshold: f64) -> usize {
        self.slots.push(Slot {
            delay,
            threshold,
            in_view: false,
            visible: false,
            pending: None,
        });
        self.slots.len() - 1
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[cfg(test)]
    pub fn is_visible(&self, slot: usize) -> bool {
        self.slots.get(slot).is_some_and(|s| s.visible)
    }

    /// Feed the current visible fraction of an element. Produces an action
    /// only when the element crosses its threshold.
    pub fn update(&mut self, slot: usize, fraction: f64) -> Option<RevealAction> {
        let slot_state = self.slots.get_mut(slot)?;
        let in_view = fraction > 0.0 && fraction >= slot_state.threshold;
        if in_view == slot_state.in_view {
            return None;
        }
        slot_state.in_view = in_view;

        if !in_view {
            slot_state.pending = None;
            slot_state.visible = false;
            return Some(RevealAction::Hide { slot });
        }

        if slot_state.delay.is_zero() {
            slot_state.visible = true;
            return Some(RevealAction::Show { slot });
        }

        self.next_token += 1;
        let token = RevealToken(self.next_token);
        slot_state.pending = Some(token);
        Some(RevealAction::ShowAfter {
            slot,
            delay: slot_state.delay,
            token,
        })
    }

    /// A delayed reveal timer expired. Returns true if the element should be
    /// shown now; false when it left the viewport in the meantime.
    pub fn fire(&mut self, slot: usize, token: RevealToken) -> bool {
        match self.slots.get_mut(slot) {
            Some(s) if s.in_view && s.pending == Some(token) => {
                s.pending = None;
                s.visible = true;
                true
            }
            _ => false,
        }
    }
}
