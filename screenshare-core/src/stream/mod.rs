//! Frame pipeline: sender loop, receiver loop and their collaborators.
//!
//! | Module     | Purpose                                            |
//! |------------|----------------------------------------------------|
//! | `types`    | Monitor table entries and raw captured frames      |
//! | `capture`  | `CaptureSource` trait                              |
//! | `codec`    | `FrameCodec` trait, JPEG / PNG via `image`         |
//! | `overlay`  | Cursor arrow and region outline                    |
//! | `surface`  | `RenderSurface` trait                              |
//! | `liveness` | Inter-frame timing on the receiver                 |
//! | `producer` | Sender loop                                        |
//! | `consumer` | Receiver loop                                      |

pub mod capture;
pub mod codec;
pub mod consumer;
pub mod liveness;
pub mod overlay;
pub mod producer;
pub mod surface;
pub mod types;

pub use capture::{CaptureSource, find_monitor, virtual_monitor};
pub use codec::{Compression, DEFAULT_JPEG_QUALITY, FrameCodec, ImageCodec};
pub use consumer::{ConsumerConfig, ConsumerEvent, FULLSCREEN_TOGGLE, FrameConsumer};
pub use liveness::{DEFAULT_GRACE_PERIOD, LivenessTracker};
pub use producer::{
    DEFAULT_TARGET_HEIGHT, FrameProducer, ProducerConfig, StepOutcome, scale_factor, scale_image,
};
pub use surface::{RenderSurface, SurfaceInput};
pub use types::{MonitorDescriptor, PixelFormat, RawFrame};
