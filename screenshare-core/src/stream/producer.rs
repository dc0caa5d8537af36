//! Sender loop.
//!
//! Each iteration:
//!
//! 1. Drains pending [`InputEvent`]s into the owned [`Controls`].
//! 2. If no target is selected, releases the preview and waits for input.
//! 3. Grabs the selected monitor and converts it to RGB.
//! 4. Draws the cursor indicator (unless hidden).
//! 5. Crops to the committed region, scales, encodes.
//! 6. Sends one wire message; a transport failure drops the frame.
//! 7. Shows the full preview with the region outline and polls it.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use image::{RgbImage, imageops};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::error::{ErrorKind, ShareError};
use crate::input::InputEvent;
use crate::state::{Bounds, Controls};
use crate::stream::capture::{CaptureSource, find_monitor};
use crate::stream::codec::FrameCodec;
use crate::stream::overlay::{draw_cursor, draw_region_outline};
use crate::stream::surface::{RenderSurface, SurfaceInput};
use crate::stream::types::MonitorDescriptor;
use crate::wire::{DEFAULT_SEND_TIMEOUT, send_message};

/// Output height used when no explicit scale is configured.
pub const DEFAULT_TARGET_HEIGHT: u32 = 1080;

// ── ProducerConfig ───────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ProducerConfig {
    /// Receiver address.
    pub peer: SocketAddr,
    /// Budget for one connect + write + close.
    pub send_timeout: Duration,
    /// Fixed scale factor. `None` scales to `target_height`.
    pub scale: Option<f32>,
    pub target_height: u32,
    pub hide_cursor: bool,
    /// Frame cap; 0 = unthrottled.
    pub max_fps: u32,
    /// How long an inactive iteration waits for input.
    pub idle_wait: Duration,
    /// How long the preview is polled for keys after each frame.
    pub preview_poll: Duration,
}

impl ProducerConfig {
    pub fn new(peer: SocketAddr) -> Self {
        Self {
            peer,
            send_timeout: DEFAULT_SEND_TIMEOUT,
            scale: None,
            target_height: DEFAULT_TARGET_HEIGHT,
            hide_cursor: false,
            max_fps: 0,
            idle_wait: Duration::from_millis(50),
            preview_poll: Duration::from_millis(16),
        }
    }
}

/// What one [`FrameProducer::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// No target selected.
    Inactive,
    /// A frame of `width x height` (`bytes` encoded) reached the receiver.
    Sent { width: u32, height: u32, bytes: usize },
    /// A frame was encoded but the transport dropped it.
    Dropped { width: u32, height: u32 },
    /// Capture or codec failed; nothing was sent this iteration.
    Failed,
    /// The user interrupted from the preview.
    Interrupted,
}

/// Scale factor for a monitor frame of `frame_height` rows.
pub fn scale_factor(explicit: Option<f32>, target_height: u32, frame_height: u32) -> f32 {
    match explicit {
        Some(scale) if scale > 0.0 => scale,
        _ if frame_height == 0 => 1.0,
        _ => target_height as f32 / frame_height as f32,
    }
}

/// Resize `img` by `factor`. A factor of one leaves it untouched.
pub fn scale_image(img: RgbImage, factor: f32) -> RgbImage {
    if (factor - 1.0).abs() < f32::EPSILON {
        return img;
    }
    let (w, h) = img.dimensions();
    let nw = ((w as f32 * factor).round() as u32).max(1);
    let nh = ((h as f32 * factor).round() as u32).max(1);
    if (nw, nh) == (w, h) {
        return img;
    }
    imageops::resize(&img, nw, nh, imageops::FilterType::Triangle)
}

struct PreparedFrame {
    outgoing: RgbImage,
    preview: RgbImage,
}

// ── FrameProducer ────────────────────────────────────────────────

pub struct FrameProducer<C, K, S> {
    capture: C,
    codec: K,
    preview: S,
    events: mpsc::Receiver<InputEvent>,
    input_closed: bool,
    controls: Controls,
    monitors: Vec<MonitorDescriptor>,
    config: ProducerConfig,
    running: Arc<AtomicBool>,
    warned_outside: Option<Bounds>,
}

impl<C, K, S> FrameProducer<C, K, S>
where
    C: CaptureSource,
    K: FrameCodec,
    S: RenderSurface,
{
    /// Build a producer. The monitor table is read once here and again
    /// whenever a capture fails.
    pub fn new(
        mut capture: C,
        codec: K,
        preview: S,
        events: mpsc::Receiver<InputEvent>,
        config: ProducerConfig,
    ) -> Result<Self, ShareError> {
        let monitors = capture.monitors()?;
        info!("{} capture targets available", monitors.len());
        Ok(Self {
            capture,
            codec,
            preview,
            events,
            input_closed: false,
            controls: Controls::new(monitors.len()),
            monitors,
            config,
            running: Arc::new(AtomicBool::new(true)),
            warned_outside: None,
        })
    }

    /// Clearing the flag stops [`run`](Self::run) after the current step.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    pub fn preview(&self) -> &S {
        &self.preview
    }

    /// Run until stopped or interrupted.
    pub async fn run(&mut self) -> Result<(), ShareError> {
        info!("sending to {}", self.config.peer);
        while self.running.load(Ordering::SeqCst) {
            let loop_start = Instant::now();
            match self.step().await {
                StepOutcome::Interrupted => {
                    info!("interrupted from preview");
                    break;
                }
                StepOutcome::Inactive => continue,
                StepOutcome::Failed => tokio::time::sleep(self.config.idle_wait).await,
                _ => {}
            }
            self.pace(loop_start).await;
        }
        self.preview.destroy();
        Ok(())
    }

    /// One iteration of the loop.
    pub async fn step(&mut self) -> StepOutcome {
        self.drain_events();

        let Some(index) = self.controls.target.selected() else {
            if self.preview.is_open() {
                self.preview.destroy();
            }
            self.wait_for_input().await;
            return StepOutcome::Inactive;
        };

        let prepared = match self.prepare_frame(index) {
            Ok(frame) => frame,
            Err(e) => {
                error!("frame preparation failed: {e}");
                if e.kind() == ErrorKind::Capture {
                    self.refresh_monitors();
                }
                return StepOutcome::Failed;
            }
        };

        let (width, height) = prepared.outgoing.dimensions();
        let payload = match self.codec.encode(&prepared.outgoing) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!("encode failed: {e}");
                return StepOutcome::Failed;
            }
        };

        let outcome = match send_message(self.config.peer, &payload, self.config.send_timeout).await
        {
            Ok(()) => {
                debug!("sent {width}x{height} frame, {} bytes", payload.len());
                StepOutcome::Sent {
                    width,
                    height,
                    bytes: payload.len(),
                }
            }
            Err(e) => {
                if e.is_transport() {
                    debug!("frame dropped: {e}");
                } else {
                    warn!("frame dropped: {e}");
                }
                StepOutcome::Dropped { width, height }
            }
        };

        if let Err(e) = self.preview.show(&prepared.preview) {
            warn!("preview failed: {e}");
        }
        match self.preview.poll_key(self.config.preview_poll) {
            Ok(Some(SurfaceInput::Interrupt)) => {
                self.preview.destroy();
                return StepOutcome::Interrupted;
            }
            Ok(_) => {}
            Err(e) => warn!("preview input failed: {e}"),
        }

        outcome
    }

    fn drain_events(&mut self) {
        loop {
            match self.events.try_recv() {
                Ok(event) => {
                    self.controls.apply(event);
                }
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    if !self.input_closed {
                        warn!("global input source closed, hotkeys no longer work");
                        self.input_closed = true;
                    }
                    break;
                }
            }
        }
    }

    async fn wait_for_input(&mut self) {
        if self.input_closed {
            tokio::time::sleep(self.config.idle_wait).await;
            return;
        }
        match tokio::time::timeout(self.config.idle_wait, self.events.recv()).await {
            Ok(Some(event)) => {
                self.controls.apply(event);
            }
            Ok(None) => self.input_closed = true,
            Err(_) => {}
        }
    }

    fn refresh_monitors(&mut self) {
        match self.capture.monitors() {
            Ok(monitors) => {
                if self.controls.target.set_available(monitors.len()).is_some() {
                    info!("selected monitor disappeared, streaming stopped");
                }
                self.monitors = monitors;
            }
            Err(e) => error!("monitor enumeration failed: {e}"),
        }
    }

    fn prepare_frame(&mut self, index: usize) -> Result<PreparedFrame, ShareError> {
        let monitor = find_monitor(&self.monitors, index)?;
        let mut frame = self.capture.grab(&monitor)?.to_rgb_image()?;

        if !self.config.hide_cursor {
            if let Some(tip) = self
                .controls
                .pointer
                .position()
                .and_then(|p| monitor.to_local(p))
            {
                draw_cursor(&mut frame, tip);
            }
        }

        let origin = monitor.origin();
        let factor = scale_factor(self.config.scale, self.config.target_height, frame.height());

        let outgoing = match self.controls.region.committed_bounds_relative_to(origin) {
            Some(bounds) => match bounds.clamp_to(frame.width(), frame.height()) {
                Some(crop) => {
                    self.warned_outside = None;
                    imageops::crop_imm(
                        &frame,
                        crop.xmin as u32,
                        crop.ymin as u32,
                        crop.width() as u32,
                        crop.height() as u32,
                    )
                    .to_image()
                }
                None => {
                    if self.warned_outside != Some(bounds) {
                        warn!("selected region lies outside monitor {index}, sending full frame");
                        self.warned_outside = Some(bounds);
                    }
                    frame.clone()
                }
            },
            None => frame.clone(),
        };

        let mut preview = frame;
        if let Some(bounds) = self.controls.region.bounds_relative_to(origin) {
            draw_region_outline(&mut preview, bounds);
        }

        Ok(PreparedFrame {
            outgoing: scale_image(outgoing, factor),
            preview,
        })
    }

    async fn pace(&self, loop_start: Instant) {
        if self.config.max_fps == 0 {
            return;
        }
        let interval = Duration::from_secs_f64(1.0 / self.config.max_fps as f64);
        let elapsed = loop_start.elapsed();
        if elapsed < interval {
            tokio::time::sleep(interval - elapsed).await;
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scale_targets_1080_lines() {
        assert_eq!(scale_factor(None, 1080, 1080), 1.0);
        assert_eq!(scale_factor(None, 1080, 2160), 0.5);
        assert_eq!(scale_factor(Some(0.25), 1080, 2160), 0.25);
        // A non-positive explicit factor falls back to the target height.
        assert_eq!(scale_factor(Some(0.0), 1080, 2160), 0.5);
        assert_eq!(scale_factor(None, 1080, 0), 1.0);
    }

    #[test]
    fn scale_image_dimensions() {
        let uhd = RgbImage::new(3840, 2160);
        assert_eq!(scale_image(uhd, 0.5).dimensions(), (1920, 1080));

        let hd = RgbImage::new(1920, 1080);
        assert_eq!(scale_image(hd, 1.0).dimensions(), (1920, 1080));

        let tiny = RgbImage::new(3, 3);
        assert_eq!(scale_image(tiny, 0.01).dimensions(), (1, 1));
    }

    #[test]
    fn config_defaults() {
        let cfg = ProducerConfig::new("127.0.0.1:8000".parse().unwrap());
        assert_eq!(cfg.send_timeout, Duration::from_millis(200));
        assert_eq!(cfg.target_height, 1080);
        assert_eq!(cfg.max_fps, 0);
        assert!(!cfg.hide_cursor);
    }
}
