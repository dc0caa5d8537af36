//! Configuration for the screenshare binary.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use screenshare_core::stream::{
    Compression, ConsumerConfig, DEFAULT_JPEG_QUALITY, DEFAULT_TARGET_HEIGHT,
};
use screenshare_core::wire::{DEFAULT_MAX_PAYLOAD, ListenerConfig};

/// How [`ShareConfig::load`] arrived at its result. Reported once the
/// tracing subscriber is installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    Missing,
    Invalid(String),
}

impl LoadOutcome {
    pub fn report(&self, path: &Path) {
        match self {
            LoadOutcome::Loaded => tracing::info!("loaded config from {}", path.display()),
            LoadOutcome::Missing => {
                tracing::info!("no config at {}; using defaults", path.display())
            }
            LoadOutcome::Invalid(e) => {
                tracing::warn!("invalid config {}: {e}; using defaults", path.display())
            }
        }
    }
}

/// Top-level configuration loaded from a TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareConfig {
    pub network: NetworkConfig,
    /// Sender-side frame pipeline.
    pub stream: StreamConfig,
    /// Receiver display and sender preview.
    pub display: DisplayConfig,
    pub logging: LoggingConfig,
}

/// Network configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// TCP port the receiver listens on and the sender connects to.
    pub port: u16,
    /// Budget for one frame send (connect + write + close).
    pub send_timeout_ms: u64,
    pub accept_timeout_ms: u64,
    pub read_timeout_ms: u64,
    /// Largest frame the receiver accepts.
    pub max_payload_bytes: usize,
}

/// Sender pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// "jpg" or "png".
    pub compression: Compression,
    pub jpeg_quality: u8,
    /// Fixed scale factor; unset scales to `target_height`.
    pub scale: Option<f32>,
    pub target_height: u32,
    pub hide_cursor: bool,
    /// Frame cap, 0 = unthrottled.
    pub max_fps: u32,
}

/// Display configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Start the receiver in fullscreen.
    pub fullscreen: bool,
    /// Silence before the receiver tears its display down.
    pub grace_period_ms: u64,
    /// Terminal graphics protocol: "auto", "sixel", "kitty", "iterm2",
    /// "halfblocks".
    pub graphics: String,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
    /// Optional log file path. If empty, logs to stderr.
    pub file: String,
}

// ── Defaults ─────────────────────────────────────────────────────

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            send_timeout_ms: 200,
            accept_timeout_ms: 1000,
            read_timeout_ms: 1000,
            max_payload_bytes: DEFAULT_MAX_PAYLOAD,
        }
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            compression: Compression::Jpeg,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            scale: None,
            target_height: DEFAULT_TARGET_HEIGHT,
            hide_cursor: false,
            max_fps: 0,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            fullscreen: true,
            grace_period_ms: 5000,
            graphics: "auto".into(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            file: String::new(),
        }
    }
}

// ── Loading ──────────────────────────────────────────────────────

impl ShareConfig {
    /// Load configuration from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> (Self, LoadOutcome) {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => (config, LoadOutcome::Loaded),
                Err(e) => (Self::default(), LoadOutcome::Invalid(e.to_string())),
            },
            Err(_) => (Self::default(), LoadOutcome::Missing),
        }
    }

    /// The default configuration as TOML.
    pub fn default_toml() -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(&Self::default())
    }

    /// Receiver listener settings.
    pub fn listener_config(&self) -> ListenerConfig {
        ListenerConfig {
            accept_timeout: Duration::from_millis(self.network.accept_timeout_ms.max(1)),
            read_timeout: Duration::from_millis(self.network.read_timeout_ms.max(1)),
            max_payload: self.network.max_payload_bytes,
        }
    }

    /// Receiver loop settings.
    pub fn consumer_config(&self) -> ConsumerConfig {
        ConsumerConfig {
            grace: Duration::from_millis(self.display.grace_period_ms),
            fullscreen: self.display.fullscreen,
            ..ConsumerConfig::default()
        }
    }

    pub fn send_timeout(&self) -> Duration {
        Duration::from_millis(self.network.send_timeout_ms.max(1))
    }

    /// `None` for "auto".
    pub fn forced_graphics(&self) -> Option<&str> {
        match self.display.graphics.trim() {
            "" | "auto" => None,
            other => Some(other),
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let text = ShareConfig::default_toml().unwrap();
        assert!(text.contains("port = 8000"));
        assert!(text.contains("compression = \"jpg\""));
        // Unset scale is omitted rather than written as a sentinel.
        assert!(!text.contains("scale ="));
    }

    #[test]
    fn roundtrip_config() {
        let text = ShareConfig::default_toml().unwrap();
        let parsed: ShareConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.network.port, 8000);
        assert_eq!(parsed.network.send_timeout_ms, 200);
        assert_eq!(parsed.stream.jpeg_quality, 80);
        assert_eq!(parsed.display.grace_period_ms, 5000);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let parsed: ShareConfig = toml::from_str(
            r#"
            [stream]
            compression = "png"
            scale = 0.5

            [display]
            graphics = "kitty"
            "#,
        )
        .unwrap();
        assert_eq!(parsed.stream.compression, Compression::Png);
        assert_eq!(parsed.stream.scale, Some(0.5));
        assert_eq!(parsed.stream.target_height, 1080);
        assert_eq!(parsed.network.port, 8000);
        assert_eq!(parsed.forced_graphics(), Some("kitty"));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let (cfg, outcome) = ShareConfig::load(Path::new("/nonexistent/screenshare.toml"));
        assert_eq!(outcome, LoadOutcome::Missing);
        assert_eq!(cfg.network.port, 8000);
        assert_eq!(cfg.forced_graphics(), None);
    }

    #[test]
    fn invalid_file_is_reported_not_dropped() {
        let path = std::env::temp_dir().join(format!("screenshare-invalid-{}.toml", std::process::id()));
        std::fs::write(&path, "[network]\nport = \"eight thousand\"\n").unwrap();

        let (cfg, outcome) = ShareConfig::load(&path);
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(outcome, LoadOutcome::Invalid(ref e) if e.contains("port")));
        assert_eq!(cfg.network.port, 8000);
    }

    #[test]
    fn derived_runtime_settings() {
        let mut cfg = ShareConfig::default();
        cfg.network.accept_timeout_ms = 0;
        cfg.display.fullscreen = false;

        let listener = cfg.listener_config();
        assert_eq!(listener.accept_timeout, Duration::from_millis(1));
        assert_eq!(listener.max_payload, DEFAULT_MAX_PAYLOAD);

        let consumer = cfg.consumer_config();
        assert_eq!(consumer.grace, Duration::from_secs(5));
        assert!(!consumer.fullscreen);
        assert_eq!(cfg.send_timeout(), Duration::from_millis(200));
    }
}
