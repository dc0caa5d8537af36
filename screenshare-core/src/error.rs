//! Error taxonomy for the streaming pipeline.
//!
//! Every fallible operation returns `Result<T, ShareError>`. The loops in
//! [`crate::stream`] never propagate steady-state failures: they match on
//! [`ShareError::kind`] and degrade to "no frame this tick". Only
//! [`ErrorKind::Interrupt`] ends a loop.

use std::time::Duration;
use thiserror::Error;

/// The canonical error type of the streaming pipeline.
#[derive(Debug, Error)]
pub enum ShareError {
    // ── Transport Errors ─────────────────────────────────────────
    /// The TCP/IO layer reported an error (refused, reset, ...).
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),

    /// A connect, accept, send or read exceeded its deadline.
    #[error("timeout after {0:?}")]
    Timeout(Duration),

    // ── Framing Errors ───────────────────────────────────────────
    /// The peer closed the stream before the declared length arrived.
    #[error("connection closed after {received} of {expected} bytes")]
    ConnectionClosed { expected: usize, received: usize },

    /// The declared payload length exceeds the configured maximum.
    #[error("payload too large: {size} bytes (max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    // ── Collaborator Errors ──────────────────────────────────────
    /// The capture collaborator failed to list monitors or grab a frame.
    #[error("capture failed: {0}")]
    Capture(String),

    /// The selected monitor index is not part of the monitor table.
    #[error("unknown monitor index {0}")]
    UnknownMonitor(usize),

    /// Encoding or decoding a frame failed.
    #[error("codec error: {0}")]
    Codec(String),

    /// The render surface could not be created or drawn.
    #[error("display error: {0}")]
    Display(String),

    // ── Lifecycle ────────────────────────────────────────────────
    /// The user interrupted the process.
    #[error("interrupted")]
    Interrupted,

    /// Invalid start-up configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Coarse classification used by the loops to decide what to tolerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Framing,
    Capture,
    Codec,
    Display,
    Interrupt,
    Config,
}

impl ShareError {
    /// Which branch of the taxonomy this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ShareError::Transport(_) | ShareError::Timeout(_) => ErrorKind::Transport,
            ShareError::ConnectionClosed { .. } | ShareError::PayloadTooLarge { .. } => {
                ErrorKind::Framing
            }
            ShareError::Capture(_) | ShareError::UnknownMonitor(_) => ErrorKind::Capture,
            ShareError::Codec(_) => ErrorKind::Codec,
            ShareError::Display(_) => ErrorKind::Display,
            ShareError::Interrupted => ErrorKind::Interrupt,
            ShareError::Config(_) => ErrorKind::Config,
        }
    }

    /// Transport and framing faults: the frame is lost, nothing else is.
    pub fn is_transport(&self) -> bool {
        matches!(self.kind(), ErrorKind::Transport | ErrorKind::Framing)
    }
}

impl From<image::ImageError> for ShareError {
    fn from(e: image::ImageError) -> Self {
        ShareError::Codec(e.to_string())
    }
}
