//! Global keyboard and pointer hook.
//!
//! `rdev::listen` blocks its thread forever, so it runs on a dedicated
//! thread and forwards translated events through a bounded channel. When
//! the channel is full the event is dropped.

use std::thread::{self, JoinHandle};

use rdev::{Button, EventType};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{error, trace};

use screenshare_core::{InputEvent, Key, MouseButton};

/// Start the hook thread.
pub fn spawn_listener(tx: mpsc::Sender<InputEvent>) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("global-input".into())
        .spawn(move || {
            let result = rdev::listen(move |event| {
                let Some(translated) = translate(&event.event_type) else {
                    return;
                };
                match tx.try_send(translated) {
                    Ok(()) => {}
                    Err(TrySendError::Full(dropped)) => trace!("input queue full, dropped {dropped:?}"),
                    Err(TrySendError::Closed(_)) => {}
                }
            });
            if let Err(e) = result {
                error!("global input hook failed: {e:?}");
            }
        })
}

/// Map an rdev event onto the core input model.
pub fn translate(event: &EventType) -> Option<InputEvent> {
    match *event {
        EventType::KeyPress(key) => Some(InputEvent::KeyDown(map_key(key))),
        EventType::KeyRelease(key) => Some(InputEvent::KeyUp(map_key(key))),
        EventType::ButtonPress(button) => Some(InputEvent::ButtonDown(map_button(button))),
        EventType::ButtonRelease(button) => Some(InputEvent::ButtonUp(map_button(button))),
        EventType::MouseMove { x, y } => Some(InputEvent::PointerMoved {
            x: x.round() as i32,
            y: y.round() as i32,
        }),
        EventType::Wheel { .. } => None,
    }
}

fn map_button(button: Button) -> MouseButton {
    match button {
        Button::Left => MouseButton::Primary,
        Button::Right => MouseButton::Secondary,
        Button::Middle => MouseButton::Middle,
        Button::Unknown(code) => MouseButton::Other(code),
    }
}

pub fn map_key(key: rdev::Key) -> Key {
    use rdev::Key as K;
    match key {
        K::Alt => Key::AltLeft,
        K::AltGr => Key::AltRight,
        K::ShiftLeft => Key::ShiftLeft,
        K::ShiftRight => Key::ShiftRight,
        K::ControlLeft => Key::ControlLeft,
        K::ControlRight => Key::ControlRight,
        K::Escape => Key::Escape,

        K::Num0 | K::Kp0 => Key::Digit(0),
        K::Num1 | K::Kp1 => Key::Digit(1),
        K::Num2 | K::Kp2 => Key::Digit(2),
        K::Num3 | K::Kp3 => Key::Digit(3),
        K::Num4 | K::Kp4 => Key::Digit(4),
        K::Num5 | K::Kp5 => Key::Digit(5),
        K::Num6 | K::Kp6 => Key::Digit(6),
        K::Num7 | K::Kp7 => Key::Digit(7),
        K::Num8 | K::Kp8 => Key::Digit(8),
        K::Num9 | K::Kp9 => Key::Digit(9),

        K::F1 => Key::Function(1),
        K::F2 => Key::Function(2),
        K::F3 => Key::Function(3),
        K::F4 => Key::Function(4),
        K::F5 => Key::Function(5),
        K::F6 => Key::Function(6),
        K::F7 => Key::Function(7),
        K::F8 => Key::Function(8),
        K::F9 => Key::Function(9),
        K::F10 => Key::Function(10),
        K::F11 => Key::Function(11),
        K::F12 => Key::Function(12),

        K::KeyM => Key::Char('m'),
        K::Unknown(code) => Key::Other(code),
        _ => Key::Other(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hotkey_keys_map_to_core_keys() {
        assert_eq!(map_key(rdev::Key::Alt), Key::AltLeft);
        assert_eq!(map_key(rdev::Key::AltGr), Key::AltRight);
        assert_eq!(map_key(rdev::Key::Num7), Key::Digit(7));
        assert_eq!(map_key(rdev::Key::Kp7), Key::Digit(7));
        assert_eq!(map_key(rdev::Key::F11), Key::Function(11));
        assert_eq!(map_key(rdev::Key::Unknown(999)), Key::Other(999));
    }

    #[test]
    fn pointer_and_buttons_translate() {
        assert_eq!(
            translate(&EventType::MouseMove { x: 10.6, y: -3.2 }),
            Some(InputEvent::PointerMoved { x: 11, y: -3 })
        );
        assert_eq!(
            translate(&EventType::ButtonRelease(Button::Right)),
            Some(InputEvent::ButtonUp(MouseButton::Secondary))
        );
        assert_eq!(
            translate(&EventType::Wheel {
                delta_x: 0,
                delta_y: 1
            }),
            None
        );
    }
}
