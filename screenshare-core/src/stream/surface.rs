//! Render surface interface shared by the sender preview and the
//! receiver display.

use std::time::Duration;

use image::RgbImage;

use crate::error::ShareError;
use crate::input::Key;

/// Something the user did inside the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceInput {
    Key(Key),
    /// The user asked the process to stop (e.g. Ctrl-C in the surface).
    Interrupt,
}

/// A window-like target for decoded frames.
///
/// The surface is created lazily by the first [`show`](Self::show) and
/// released by [`destroy`](Self::destroy); `show` after `destroy`
/// recreates it. Implementations also release on `Drop`.
pub trait RenderSurface {
    fn show(&mut self, frame: &RgbImage) -> Result<(), ShareError>;

    /// Takes effect on the next [`show`](Self::show).
    fn set_fullscreen(&mut self, fullscreen: bool);

    /// Wait up to `timeout` for one input event.
    fn poll_key(&mut self, timeout: Duration) -> Result<Option<SurfaceInput>, ShareError>;

    /// Release the surface. Idempotent.
    fn destroy(&mut self);

    /// Whether the surface currently exists.
    fn is_open(&self) -> bool;
}
