//! screenshare entry point.
//!
//! ```text
//! screenshare                          Run as receiver on port 8000
//! screenshare --host <receiver>        Run as sender
//! screenshare --compression png        Lossless frames
//! screenshare --scale 0.5              Fixed scale instead of 1080 lines
//! screenshare --hide_cursor            No cursor indicator
//! screenshare --config <path>          Load a custom config TOML
//! screenshare --gen-config             Write default config to stdout
//! screenshare --list-monitors          Print the capture targets
//! ```

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use screenshare::capture::{XcapCapture, describe_monitors};
use screenshare::config::ShareConfig;
use screenshare::{receiver, sender};
use screenshare_core::{Compression, ShareError};

// ── CLI ──────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "screenshare", version, about = "Stream a monitor to another machine")]
struct Cli {
    /// Receiver to stream to. Omit to run as the receiver.
    #[arg(long)]
    host: Option<String>,

    /// TCP port (default 8000).
    #[arg(long)]
    port: Option<u16>,

    /// Frame encoding: jpg or png.
    #[arg(long)]
    compression: Option<Compression>,

    /// Fixed scale factor applied to every frame.
    #[arg(long)]
    scale: Option<f32>,

    /// Do not draw the cursor indicator.
    #[arg(long = "hide_cursor")]
    hide_cursor: bool,

    /// Path to configuration TOML file.
    #[arg(short, long, default_value = "screenshare.toml")]
    config: PathBuf,

    /// Print the default configuration to stdout and exit.
    #[arg(long)]
    gen_config: bool,

    /// Print the monitor table and exit.
    #[arg(long)]
    list_monitors: bool,
}

impl Cli {
    /// CLI flags win over the file.
    fn apply(&self, config: &mut ShareConfig) -> Result<(), ShareError> {
        if let Some(port) = self.port {
            config.network.port = port;
        }
        if let Some(compression) = self.compression {
            config.stream.compression = compression;
        }
        if self.scale.is_some() {
            config.stream.scale = self.scale;
        }
        if self.hide_cursor {
            config.stream.hide_cursor = true;
        }
        match config.stream.scale {
            Some(scale) if !(scale > 0.0 && scale.is_finite()) => {
                Err(ShareError::Config(format!("scale must be positive, got {scale}")))
            }
            _ => Ok(()),
        }
    }
}

fn init_tracing(config: &ShareConfig) -> std::io::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    if config.logging.file.is_empty() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.logging.file)?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    }
    Ok(())
}

fn spawn_ctrl_c(running: Arc<AtomicBool>) {
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Ctrl-C received, shutting down");
        running.store(false, Ordering::SeqCst);
    });
}

// ── Main ─────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.gen_config {
        println!("{}", ShareConfig::default_toml()?);
        return Ok(());
    }

    let (mut config, outcome) = ShareConfig::load(&cli.config);
    cli.apply(&mut config)?;
    init_tracing(&config)?;
    outcome.report(&cli.config);

    info!("screenshare v{}", env!("CARGO_PKG_VERSION"));

    if cli.list_monitors {
        let mut capture = XcapCapture::new()?;
        for line in describe_monitors(&mut capture)? {
            println!("{line}");
        }
        return Ok(());
    }

    match cli.host.as_deref() {
        Some(host) => {
            println!("{}", sender::banner());
            let mut producer = sender::build(&config, host).await?;
            spawn_ctrl_c(producer.stop_handle());
            let scale = match config.stream.scale {
                Some(s) => s.to_string(),
                None => format!("auto ({} lines)", config.stream.target_height),
            };
            info!("compression {}, scale {scale}", config.stream.compression);
            producer.run().await?;
        }
        None => {
            let (mut consumer, local) = receiver::build(&config).await?;
            println!("{}", receiver::banner(local));
            spawn_ctrl_c(consumer.stop_handle());
            consumer.run().await?;
        }
    }

    info!("bye");
    Ok(())
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("screenshare").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn flags_override_config() {
        let cli = parse(&[
            "--host",
            "desk",
            "--port",
            "9000",
            "--compression",
            "png",
            "--scale",
            "0.5",
            "--hide_cursor",
        ]);
        let mut cfg = ShareConfig::default();
        cli.apply(&mut cfg).unwrap();

        assert_eq!(cli.host.as_deref(), Some("desk"));
        assert_eq!(cfg.network.port, 9000);
        assert_eq!(cfg.stream.compression, Compression::Png);
        assert_eq!(cfg.stream.scale, Some(0.5));
        assert!(cfg.stream.hide_cursor);
    }

    #[test]
    fn no_flags_keep_config() {
        let cli = parse(&[]);
        let mut cfg = ShareConfig::default();
        cfg.stream.compression = Compression::Png;
        cli.apply(&mut cfg).unwrap();

        assert!(cli.host.is_none());
        assert_eq!(cfg.network.port, 8000);
        assert_eq!(cfg.stream.compression, Compression::Png);
        assert_eq!(cli.config, PathBuf::from("screenshare.toml"));
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(Cli::try_parse_from(["screenshare", "--compression", "gif"]).is_err());

        let cli = parse(&["--scale=-1"]);
        let err = cli.apply(&mut ShareConfig::default()).unwrap_err();
        assert!(matches!(err, ShareError::Config(_)));
    }
}
