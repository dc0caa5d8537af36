//! # screenshare-core
//!
//! Peer-to-peer screen streaming: a sender captures a monitor (or a
//! region of it) and pushes encoded frames to a receiver, one TCP
//! connection per frame.
//!
//! This crate contains:
//! - **Wire**: `WireCodec` length-prefixed framing and the per-frame TCP transport
//! - **Input**: platform-neutral global key / pointer events
//! - **State**: hotkey target selector, pointer tracker, region selector
//! - **Stream**: sender and receiver loops plus the capture, codec and
//!   render-surface collaborator traits
//! - **Error**: `ShareError`, a `thiserror`-based taxonomy

pub mod error;
pub mod input;
pub mod state;
pub mod stream;
pub mod wire;

// ── Re-exports for ergonomic usage ───────────────────────────────

pub use error::{ErrorKind, ShareError};
pub use input::{INPUT_QUEUE_CAPACITY, InputEvent, Key, MouseButton};
pub use state::{
    AspectRatio, Bounds, CaptureTargetSelector, Controls, Point, PointerTracker, RegionSelector,
    SelectionPhase, TargetChange,
};
pub use stream::{
    CaptureSource, Compression, ConsumerConfig, ConsumerEvent, FrameCodec, FrameConsumer,
    FrameProducer, ImageCodec, MonitorDescriptor, PixelFormat, ProducerConfig, RawFrame,
    RenderSurface, StepOutcome, SurfaceInput,
};
pub use wire::{FrameListener, ListenerConfig, WireCodec};
