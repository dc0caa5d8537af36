//! Receiver wiring: listener plus terminal display.

use std::net::{Ipv4Addr, SocketAddr};

use screenshare_core::stream::ImageCodec;
use screenshare_core::wire::DEFAULT_MAX_PAYLOAD;
use screenshare_core::{FrameConsumer, FrameListener, ShareError};

use crate::config::ShareConfig;
use crate::display::TerminalSurface;

/// Default TCP port shared by both roles.
pub const DEFAULT_PORT: u16 = 8000;

pub type Receiver = FrameConsumer<ImageCodec, TerminalSurface>;

/// Bind on all interfaces and build the receive loop.
pub async fn build(config: &ShareConfig) -> Result<(Receiver, SocketAddr), ShareError> {
    let bind = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.network.port));
    let listener = FrameListener::bind(bind, config.listener_config()).await?;
    let local = listener.local_addr()?;

    if config.network.max_payload_bytes != DEFAULT_MAX_PAYLOAD {
        tracing::info!("max payload {} bytes", config.network.max_payload_bytes);
    }

    let surface = TerminalSurface::new("screenshare", config.forced_graphics());
    // The decoder sniffs the format, so the configured compression is irrelevant here.
    let consumer = FrameConsumer::new(
        listener,
        ImageCodec::default(),
        surface,
        config.consumer_config(),
    );
    Ok((consumer, local))
}

/// Start-up text telling the user how to point a sender here.
pub fn banner(local: SocketAddr) -> String {
    let port = local.port();
    let port_arg = if port == DEFAULT_PORT {
        String::new()
    } else {
        format!(" --port {port}")
    };
    format!(
        "This is the streaming receiver, listening on {local}.\n\
         On the machine to share, run:\n\n    \
         screenshare --host <this-machine>{port_arg}\n\n\
         Press 'm' to toggle fullscreen, Ctrl-C to quit."
    )
}
