//! Platform-neutral global input events.
//!
//! The input collaborator (a global keyboard / pointer hook running on
//! its own thread) translates OS events into [`InputEvent`]s and pushes
//! them into a bounded channel. The frame producer drains that channel
//! once per iteration and feeds the events to [`crate::state::Controls`].

/// A key identity, reduced to what the sender's hotkeys care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    AltLeft,
    AltRight,
    ShiftLeft,
    ShiftRight,
    ControlLeft,
    ControlRight,
    Escape,
    /// Top-row or keypad digit `0..=9`.
    Digit(u8),
    /// Function key `F1..=F24`.
    Function(u8),
    /// Any other printable key.
    Char(char),
    /// Platform keycode with no mapping above.
    Other(u32),
}

impl Key {
    /// Either shift key.
    pub fn is_shift(self) -> bool {
        matches!(self, Key::ShiftLeft | Key::ShiftRight)
    }

    /// Either alt key, AltGr included.
    pub fn is_alt(self) -> bool {
        matches!(self, Key::AltLeft | Key::AltRight)
    }
}

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    /// Usually the left button.
    Primary,
    /// Usually the right button.
    Secondary,
    Middle,
    Other(u8),
}

/// One event from the global input collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    /// The cursor moved to an absolute virtual-screen position.
    PointerMoved { x: i32, y: i32 },
    ButtonDown(MouseButton),
    ButtonUp(MouseButton),
}

/// Capacity of the channel between the input thread and the producer.
pub const INPUT_QUEUE_CAPACITY: usize = 1024;
