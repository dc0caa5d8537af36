//! Sender wiring: xcap capture, rdev hotkeys, terminal preview.

use std::net::SocketAddr;

use tokio::sync::mpsc;
use tracing::info;

use screenshare_core::stream::ImageCodec;
use screenshare_core::{FrameProducer, INPUT_QUEUE_CAPACITY, ProducerConfig, ShareError};

use crate::capture::XcapCapture;
use crate::config::ShareConfig;
use crate::display::TerminalSurface;
use crate::input;

pub type Sender = FrameProducer<XcapCapture, ImageCodec, TerminalSurface>;

/// Resolve `host` once. IPv4 results are preferred.
pub async fn resolve_peer(host: &str, port: u16) -> Result<SocketAddr, ShareError> {
    let addrs: Vec<SocketAddr> = tokio::net::lookup_host((host, port))
        .await
        .map_err(|e| ShareError::Config(format!("cannot resolve {host}: {e}")))?
        .collect();
    addrs
        .iter()
        .find(|a| a.is_ipv4())
        .or_else(|| addrs.first())
        .copied()
        .ok_or_else(|| ShareError::Config(format!("{host} has no addresses")))
}

pub fn producer_config(config: &ShareConfig, peer: SocketAddr) -> ProducerConfig {
    ProducerConfig {
        send_timeout: config.send_timeout(),
        scale: config.stream.scale,
        target_height: config.stream.target_height.max(1),
        hide_cursor: config.stream.hide_cursor,
        max_fps: config.stream.max_fps,
        ..ProducerConfig::new(peer)
    }
}

/// Build the sender loop and start the global input hook.
pub async fn build(config: &ShareConfig, host: &str) -> Result<Sender, Box<dyn std::error::Error>> {
    let peer = resolve_peer(host, config.network.port).await?;
    info!("{host} resolved to {peer}");

    let capture = XcapCapture::new()?;
    let codec = ImageCodec::new(config.stream.compression)
        .with_jpeg_quality(config.stream.jpeg_quality);

    let (tx, rx) = mpsc::channel(INPUT_QUEUE_CAPACITY);
    input::spawn_listener(tx)?;

    let preview = TerminalSurface::new("screenshare preview", config.forced_graphics());
    let producer = FrameProducer::new(capture, codec, preview, rx, producer_config(config, peer))?;
    Ok(producer)
}

pub fn banner() -> &'static str {
    "This is the streaming sender.\n\
     Press Alt+0 (all monitors), Alt+1..9 or Alt+F9..F12 to toggle streaming a monitor.\n\
     Drag to select a region (Shift 16:9, Alt 4:3), Esc or right-click to clear it."
}
