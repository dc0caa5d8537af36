//! Routes input events to the three sender-side controllers.

use tracing::{debug, info};

use crate::input::{InputEvent, Key, MouseButton};
use crate::state::pointer::PointerTracker;
use crate::state::region::{AspectRatio, RegionSelector};
use crate::state::target::{CaptureTargetSelector, TargetChange};

/// Owned controller state of the frame producer.
///
/// Events are applied in arrival order. A key-down updates the pressed
/// set before any button event that follows it is interpreted, so a
/// Shift press immediately preceding a click locks the ratio.
#[derive(Debug, Clone, Default)]
pub struct Controls {
    pub target: CaptureTargetSelector,
    pub pointer: PointerTracker,
    pub region: RegionSelector,
}

impl Controls {
    pub fn new(monitor_count: usize) -> Self {
        Self {
            target: CaptureTargetSelector::new(monitor_count),
            pointer: PointerTracker::new(),
            region: RegionSelector::new(),
        }
    }

    /// Apply one event. Returns the target transition it caused, if any.
    pub fn apply(&mut self, event: InputEvent) -> Option<TargetChange> {
        match event {
            InputEvent::KeyDown(key) => {
                let change = self.target.key_down(key);
                if key == Key::Escape {
                    self.region.clear();
                }
                if let Some(change) = change {
                    log_change(change);
                }
                change
            }
            InputEvent::KeyUp(key) => {
                self.target.key_up(key);
                None
            }
            InputEvent::PointerMoved { x, y } => {
                self.pointer.update(x, y);
                if let Some(cursor) = self.pointer.position() {
                    self.region.drag_to(cursor);
                }
                None
            }
            InputEvent::ButtonDown(MouseButton::Primary) => {
                match self.pointer.position() {
                    Some(cursor) => self.region.begin(cursor, self.lock_for_held_keys()),
                    None => debug!("button press before any pointer position, ignored"),
                }
                None
            }
            InputEvent::ButtonUp(MouseButton::Primary) => {
                if let Some(cursor) = self.pointer.position() {
                    self.region.finish(cursor);
                }
                None
            }
            InputEvent::ButtonUp(MouseButton::Secondary) => {
                self.region.clear();
                None
            }
            InputEvent::ButtonDown(_) | InputEvent::ButtonUp(_) => None,
        }
    }

    /// Shift wins over Alt.
    fn lock_for_held_keys(&self) -> Option<AspectRatio> {
        if self.target.shift_held() {
            Some(AspectRatio::WIDE)
        } else if self.target.alt_held() {
            Some(AspectRatio::STANDARD)
        } else {
            None
        }
    }
}

fn log_change(change: TargetChange) {
    match change {
        TargetChange::Started(idx) => info!("streaming monitor {idx}"),
        TargetChange::Switched { from, to } => info!("switched from monitor {from} to {to}"),
        TargetChange::Stopped(idx) => info!("stopped streaming monitor {idx}"),
    }
}

// ── Tests ─────────────────────────────────────────────────────────
