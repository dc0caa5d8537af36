//! Hotkey-driven capture target selection.
//!
//! `Alt+0..9` select ordinals 0–9, `Alt+F9..F12` select 10–13. Pressing
//! the active hotkey again stops streaming; pressing another one while
//! active switches target directly.

use std::collections::HashSet;

use crate::input::Key;

/// Key that must be held for a hotkey to fire.
pub const PRIMARY_MODIFIER: Key = Key::AltLeft;

/// Hotkeys in ordinal order; the position is the monitor index.
pub const HOTKEY_TABLE: [Key; 14] = [
    Key::Digit(0),
    Key::Digit(1),
    Key::Digit(2),
    Key::Digit(3),
    Key::Digit(4),
    Key::Digit(5),
    Key::Digit(6),
    Key::Digit(7),
    Key::Digit(8),
    Key::Digit(9),
    Key::Function(9),
    Key::Function(10),
    Key::Function(11),
    Key::Function(12),
];

/// Monitor index bound to `key`, if any.
pub fn hotkey_index(key: Key) -> Option<usize> {
    HOTKEY_TABLE.iter().position(|k| *k == key)
}

/// Outcome of a hotkey press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetChange {
    Started(usize),
    Switched { from: usize, to: usize },
    Stopped(usize),
}

/// Tracks depressed keys and the selected monitor.
///
/// `selected` is `None` (inactive) or an index below `available`, the
/// number of entries in the capture collaborator's monitor table.
#[derive(Debug, Clone, Default)]
pub struct CaptureTargetSelector {
    selected: Option<usize>,
    pressed: HashSet<Key>,
    available: usize,
}

impl CaptureTargetSelector {
    /// Create an inactive selector for a table of `available` monitors.
    pub fn new(available: usize) -> Self {
        Self {
            selected: None,
            pressed: HashSet::new(),
            available,
        }
    }

    /// The selected monitor index, `None` when not streaming.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn is_active(&self) -> bool {
        self.selected.is_some()
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    /// Whether either shift key is held.
    pub fn shift_held(&self) -> bool {
        self.pressed.iter().any(|k| k.is_shift())
    }

    pub fn alt_held(&self) -> bool {
        self.pressed.iter().any(|k| k.is_alt())
    }

    /// Update the monitor count. A selection that no longer exists is
    /// dropped.
    pub fn set_available(&mut self, available: usize) -> Option<TargetChange> {
        self.available = available;
        match self.selected {
            Some(idx) if idx >= available => {
                self.selected = None;
                Some(TargetChange::Stopped(idx))
            }
            _ => None,
        }
    }

    /// Handle a key-down event.
    pub fn key_down(&mut self, key: Key) -> Option<TargetChange> {
        self.pressed.insert(key);

        if !self.pressed.contains(&PRIMARY_MODIFIER) {
            return None;
        }
        let idx = hotkey_index(key)?;
        if idx >= self.available {
            return None;
        }

        let change = match self.selected {
            Some(current) if current == idx => {
                self.selected = None;
                TargetChange::Stopped(idx)
            }
            Some(current) => {
                self.selected = Some(idx);
                TargetChange::Switched {
                    from: current,
                    to: idx,
                }
            }
            None => {
                self.selected = Some(idx);
                TargetChange::Started(idx)
            }
        };
        Some(change)
    }

    /// Handle a key-up event.
    pub fn key_up(&mut self, key: Key) {
        self.pressed.remove(&key);
    }
}

// ── Tests ─────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn press(sel: &mut CaptureTargetSelector, key: Key) -> Option<TargetChange> {
        let change = sel.key_down(key);
        sel.key_up(key);
        change
    }

    #[test]
    fn hotkey_table_indices() {
        assert_eq!(hotkey_index(Key::Digit(0)), Some(0));
        assert_eq!(hotkey_index(Key::Digit(9)), Some(9));
        assert_eq!(hotkey_index(Key::Function(9)), Some(10));
        assert_eq!(hotkey_index(Key::Function(12)), Some(13));
        assert_eq!(hotkey_index(Key::Function(8)), None);
        assert_eq!(hotkey_index(Key::Char('a')), None);
    }

    #[test]
    fn starts_inactive() {
        let sel = CaptureTargetSelector::new(3);
        assert_eq!(sel.selected(), None);
        assert!(!sel.is_active());
    }

    #[test]
    fn hotkey_without_modifier_is_ignored() {
        let mut sel = CaptureTargetSelector::new(3);
        assert_eq!(press(&mut sel, Key::Digit(1)), None);
        assert_eq!(sel.selected(), None);
    }

    #[test]
    fn same_hotkey_twice_toggles_off() {
        let mut sel = CaptureTargetSelector::new(3);
        sel.key_down(Key::AltLeft);

        assert_eq!(press(&mut sel, Key::Digit(1)), Some(TargetChange::Started(1)));
        assert_eq!(sel.selected(), Some(1));

        assert_eq!(press(&mut sel, Key::Digit(1)), Some(TargetChange::Stopped(1)));
        assert_eq!(sel.selected(), None);
    }

    #[test]
    fn different_hotkey_switches_directly() {
        let mut sel = CaptureTargetSelector::new(14);
        sel.key_down(Key::AltLeft);

        press(&mut sel, Key::Digit(2));
        assert_eq!(
            press(&mut sel, Key::Function(11)),
            Some(TargetChange::Switched { from: 2, to: 12 })
        );
        assert_eq!(sel.selected(), Some(12));
    }

    #[test]
    fn releasing_modifier_keeps_streaming() {
        let mut sel = CaptureTargetSelector::new(3);
        sel.key_down(Key::AltLeft);
        press(&mut sel, Key::Digit(0));
        sel.key_up(Key::AltLeft);

        assert_eq!(sel.selected(), Some(0));
        assert!(!sel.is_pressed(Key::AltLeft));
        // Without the modifier the hotkey no longer toggles.
        assert_eq!(press(&mut sel, Key::Digit(0)), None);
        assert_eq!(sel.selected(), Some(0));
    }

    #[test]
    fn right_alt_is_not_the_modifier() {
        let mut sel = CaptureTargetSelector::new(3);
        sel.key_down(Key::AltRight);
        assert_eq!(press(&mut sel, Key::Digit(1)), None);
    }

    #[test]
    fn out_of_range_hotkey_is_ignored() {
        let mut sel = CaptureTargetSelector::new(2);
        sel.key_down(Key::AltLeft);
        assert_eq!(press(&mut sel, Key::Digit(5)), None);
        assert_eq!(sel.selected(), None);
    }

    #[test]
    fn key_repeat_fires_per_observed_key_down() {
        let mut sel = CaptureTargetSelector::new(3);
        sel.key_down(Key::AltLeft);
        // Auto-repeat: two key-downs, one key-up.
        assert_eq!(sel.key_down(Key::Digit(1)), Some(TargetChange::Started(1)));
        assert_eq!(sel.key_down(Key::Digit(1)), Some(TargetChange::Stopped(1)));
        sel.key_up(Key::Digit(1));
        assert!(!sel.is_pressed(Key::Digit(1)));
    }

    #[test]
    fn key_up_of_unpressed_key_is_harmless() {
        let mut sel = CaptureTargetSelector::new(3);
        sel.key_up(Key::Escape);
        assert!(!sel.is_pressed(Key::Escape));
    }

    #[test]
    fn shrinking_monitor_table_drops_selection() {
        let mut sel = CaptureTargetSelector::new(4);
        sel.key_down(Key::AltLeft);
        press(&mut sel, Key::Digit(3));

        assert_eq!(sel.set_available(2), Some(TargetChange::Stopped(3)));
        assert_eq!(sel.selected(), None);
        assert_eq!(sel.set_available(4), None);
    }

    #[test]
    fn shift_detection() {
        let mut sel = CaptureTargetSelector::new(1);
        assert!(!sel.shift_held());
        sel.key_down(Key::ShiftRight);
        assert!(sel.shift_held());
        sel.key_up(Key::ShiftRight);
        assert!(!sel.shift_held());
    }
}
