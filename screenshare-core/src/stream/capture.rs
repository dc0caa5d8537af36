//! Capture collaborator interface.

use crate::error::ShareError;
use crate::stream::types::{MonitorDescriptor, RawFrame};

/// A source of monitor frames.
///
/// Implementations are synchronous; a grab is expected to return within
/// a frame interval.
pub trait CaptureSource {
    /// The current monitor table. Entry 0 is the virtual rectangle
    /// spanning all monitors.
    fn monitors(&mut self) -> Result<Vec<MonitorDescriptor>, ShareError>;

    /// Capture the current contents of `monitor`.
    fn grab(&mut self, monitor: &MonitorDescriptor) -> Result<RawFrame, ShareError>;
}

/// Look up `index` in `monitors`.
pub fn find_monitor(
    monitors: &[MonitorDescriptor],
    index: usize,
) -> Result<MonitorDescriptor, ShareError> {
    monitors
        .iter()
        .find(|m| m.index == index)
        .copied()
        .ok_or(ShareError::UnknownMonitor(index))
}

/// Virtual rectangle spanning `physical` monitors, as entry 0.
pub fn virtual_monitor(physical: &[MonitorDescriptor]) -> Option<MonitorDescriptor> {
    let left = physical.iter().map(|m| m.left).min()?;
    let top = physical.iter().map(|m| m.top).min()?;
    let right = physical.iter().map(|m| m.left as i64 + m.width as i64).max()?;
    let bottom = physical.iter().map(|m| m.top as i64 + m.height as i64).max()?;
    Some(MonitorDescriptor {
        index: 0,
        left,
        top,
        width: (right - left as i64) as u32,
        height: (bottom - top as i64) as u32,
    })
}
