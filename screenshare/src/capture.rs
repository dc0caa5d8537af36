//! Screen capture through `xcap`.
//!
//! Entry 0 of the monitor table is synthesised: it spans every physical
//! monitor and is grabbed by capturing each one and compositing them.

use image::{RgbaImage, imageops};
use tracing::debug;
use xcap::Monitor;

use screenshare_core::stream::{
    CaptureSource, MonitorDescriptor, PixelFormat, RawFrame, virtual_monitor,
};
use screenshare_core::ShareError;

pub struct XcapCapture {
    monitors: Vec<Monitor>,
}

impl XcapCapture {
    pub fn new() -> Result<Self, ShareError> {
        Ok(Self {
            monitors: enumerate()?,
        })
    }

    fn grab_composite(&self, desc: &MonitorDescriptor) -> Result<RgbaImage, ShareError> {
        let mut canvas = RgbaImage::new(desc.width, desc.height);
        for monitor in &self.monitors {
            let shot = capture(monitor)?;
            let x = (monitor.x() - desc.left) as i64;
            let y = (monitor.y() - desc.top) as i64;
            imageops::overlay(&mut canvas, &shot, x, y);
        }
        Ok(canvas)
    }
}

fn enumerate() -> Result<Vec<Monitor>, ShareError> {
    Monitor::all().map_err(|e| ShareError::Capture(format!("monitor enumeration: {e}")))
}

fn capture(monitor: &Monitor) -> Result<RgbaImage, ShareError> {
    monitor
        .capture_image()
        .map_err(|e| ShareError::Capture(format!("{}: {e}", monitor.name())))
}

fn describe(index: usize, monitor: &Monitor) -> MonitorDescriptor {
    MonitorDescriptor {
        index,
        left: monitor.x(),
        top: monitor.y(),
        width: monitor.width(),
        height: monitor.height(),
    }
}

impl CaptureSource for XcapCapture {
    fn monitors(&mut self) -> Result<Vec<MonitorDescriptor>, ShareError> {
        self.monitors = enumerate()?;
        let physical: Vec<MonitorDescriptor> = self
            .monitors
            .iter()
            .enumerate()
            .map(|(i, m)| describe(i + 1, m))
            .collect();

        let mut table = Vec::with_capacity(physical.len() + 1);
        table.extend(virtual_monitor(&physical));
        table.extend(physical);
        Ok(table)
    }

    fn grab(&mut self, desc: &MonitorDescriptor) -> Result<RawFrame, ShareError> {
        let image = match desc.index {
            0 => self.grab_composite(desc)?,
            i => {
                let monitor = self
                    .monitors
                    .get(i - 1)
                    .ok_or(ShareError::UnknownMonitor(i))?;
                capture(monitor)?
            }
        };
        let (width, height) = image.dimensions();
        debug!("grabbed monitor {} at {width}x{height}", desc.index);
        Ok(RawFrame::packed(
            width,
            height,
            PixelFormat::Rgba8,
            image.into_raw(),
        ))
    }
}

/// Human-readable monitor table for `--list-monitors`.
pub fn describe_monitors(capture: &mut XcapCapture) -> Result<Vec<String>, ShareError> {
    let table = capture.monitors()?;
    let names: Vec<String> = capture.monitors.iter().map(|m| m.name().to_string()).collect();
    Ok(table
        .iter()
        .map(|d| {
            let name = match d.index {
                0 => "all monitors",
                i => names.get(i - 1).map(String::as_str).unwrap_or("?"),
            };
            format!(
                "{:>2}  {}x{} at ({}, {})  {name}",
                d.index, d.width, d.height, d.left, d.top
            )
        })
        .collect())
}
