//! Sender-side controller state.
//!
//! | Module     | Purpose                                         |
//! |------------|-------------------------------------------------|
//! | `target`   | Hotkey → monitor index (or inactive)            |
//! | `pointer`  | Latest global cursor position                   |
//! | `region`   | Drag-to-select crop rectangle with aspect lock  |
//! | `controls` | Event dispatch into the three controllers       |

pub mod controls;
pub mod pointer;
pub mod region;
pub mod target;

pub use controls::Controls;
pub use pointer::{Point, PointerTracker};
pub use region::{AspectRatio, Bounds, MIN_REGION_SIZE, RegionSelector, SelectionPhase, aspect_clip};
pub use target::{CaptureTargetSelector, HOTKEY_TABLE, PRIMARY_MODIFIER, TargetChange, hotkey_index};
