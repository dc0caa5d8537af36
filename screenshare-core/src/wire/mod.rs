//! Wire protocol shared by the frame producer and the frame consumer.
//!
//! | Module      | Purpose                                            |
//! |-------------|----------------------------------------------------|
//! | `codec`     | `[u32 length][payload]` framing for `tokio_util`   |
//! | `transport` | one-message-per-connection send / accept helpers   |

pub mod codec;
pub mod transport;

pub use codec::{DEFAULT_MAX_PAYLOAD, LENGTH_PREFIX_SIZE, WireCodec, encode_message};
pub use transport::{
    DEFAULT_SEND_TIMEOUT, FrameListener, ListenerConfig, read_message, send_message,
};
