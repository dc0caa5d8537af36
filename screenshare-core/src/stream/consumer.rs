//! Receiver loop.
//!
//! Accepts one connection at a time, reads one wire message, decodes and
//! renders it. Failed or timed-out attempts keep the last frame on
//! screen until the liveness grace window runs out, then the display is
//! torn down once. `m` toggles fullscreen.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use crate::error::{ErrorKind, ShareError};
use crate::input::Key;
use crate::stream::codec::FrameCodec;
use crate::stream::liveness::{DEFAULT_GRACE_PERIOD, LivenessTracker};
use crate::stream::surface::{RenderSurface, SurfaceInput};
use crate::wire::FrameListener;

/// Key that toggles fullscreen on the receiver.
pub const FULLSCREEN_TOGGLE: Key = Key::Char('m');

#[derive(Debug, Clone, Copy)]
pub struct ConsumerConfig {
    /// Silence after which the sender counts as disconnected.
    pub grace: Duration,
    /// Initial fullscreen state.
    pub fullscreen: bool,
    /// How long the surface is polled for keys after each attempt.
    pub poll: Duration,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            grace: DEFAULT_GRACE_PERIOD,
            fullscreen: true,
            poll: Duration::from_millis(16),
        }
    }
}

/// What one [`FrameConsumer::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumerEvent {
    Rendered { width: u32, height: u32 },
    /// Nothing arrived or the attempt failed; the last frame stays up.
    Idle,
    /// The grace window elapsed and the display was torn down.
    Disconnected,
    Interrupted,
}

pub struct FrameConsumer<K, S> {
    listener: FrameListener,
    codec: K,
    surface: S,
    liveness: LivenessTracker,
    fullscreen: bool,
    config: ConsumerConfig,
    running: Arc<AtomicBool>,
}

impl<K, S> FrameConsumer<K, S>
where
    K: FrameCodec,
    S: RenderSurface,
{
    pub fn new(listener: FrameListener, codec: K, mut surface: S, config: ConsumerConfig) -> Self {
        surface.set_fullscreen(config.fullscreen);
        Self {
            listener,
            codec,
            surface,
            liveness: LivenessTracker::new(config.grace, Instant::now()),
            fullscreen: config.fullscreen,
            config,
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn liveness(&self) -> &LivenessTracker {
        &self.liveness
    }

    /// Run until stopped or interrupted.
    pub async fn run(&mut self) -> Result<(), ShareError> {
        while self.running.load(Ordering::SeqCst) {
            match self.step().await {
                ConsumerEvent::Interrupted => {
                    info!("interrupted from display");
                    break;
                }
                ConsumerEvent::Disconnected => info!("sender disconnected, waiting for frames"),
                _ => {}
            }
        }
        self.surface.destroy();
        Ok(())
    }

    /// One accept / decode / render attempt followed by a key poll.
    pub async fn step(&mut self) -> ConsumerEvent {
        let event = match self.listener.accept_message().await {
            Ok((payload, peer)) => match self.codec.decode(&payload) {
                Ok(frame) => {
                    if !self.liveness.is_connected() {
                        info!("receiving frames from {peer}");
                    }
                    if let Err(e) = self.surface.show(&frame) {
                        warn!("display failed: {e}");
                    }
                    self.liveness.record_frame(Instant::now());
                    ConsumerEvent::Rendered {
                        width: frame.width(),
                        height: frame.height(),
                    }
                }
                Err(e) => {
                    error!("decode failed: {e}");
                    self.idle()
                }
            },
            Err(e) => {
                self.log_attempt_error(&e);
                self.idle()
            }
        };

        if self.surface.is_open() {
            match self.surface.poll_key(self.config.poll) {
                Ok(Some(SurfaceInput::Interrupt)) => {
                    self.surface.destroy();
                    return ConsumerEvent::Interrupted;
                }
                Ok(Some(SurfaceInput::Key(key))) if key == FULLSCREEN_TOGGLE => {
                    self.fullscreen = !self.fullscreen;
                    self.surface.set_fullscreen(self.fullscreen);
                    debug!("fullscreen {}", if self.fullscreen { "on" } else { "off" });
                }
                Ok(_) => {}
                Err(e) => warn!("display input failed: {e}"),
            }
        }

        event
    }

    fn idle(&mut self) -> ConsumerEvent {
        if self.liveness.on_idle(Instant::now()) {
            self.surface.destroy();
            ConsumerEvent::Disconnected
        } else {
            ConsumerEvent::Idle
        }
    }

    fn log_attempt_error(&self, e: &ShareError) {
        match e {
            ShareError::Timeout(_) => {}
            e if e.kind() == ErrorKind::Framing || e.kind() == ErrorKind::Transport => {
                debug!("receive attempt failed: {e}")
            }
            e => warn!("receive attempt failed: {e}"),
        }
    }
}
