//! Configuration loading
//!
//! Reads the kiosk TOML file, converts it into the core configuration
//! types and validates it. Falls back to the embedded defaults when the
//! default path does not exist.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::Deserialize;

use wopr_core::clock::{TimeOfDay, TimeParseError, TimeWindow};
use wopr_core::config::{
    make_name, KioskConfig, PowerConfig, SourceConfig, ValidationError, DEFAULT_UI_TICK_MS,
    MAX_SOURCES, MAX_VIEWS, MAX_WINDOWS,
};

use crate::fetch::{CommandConfig, DEFAULT_TEMPERATURE_FIELD, DEFAULT_TIMEOUT_S};

/// Configuration file used when none is given
pub const DEFAULT_CONFIG_PATH: &str = "/etc/wopr/kiosk.toml";

/// Environment variable naming the configuration file
pub const CONFIG_ENV: &str = "WOPR_CONFIG";

/// Default backlight power file
pub const DEFAULT_BACKLIGHT_PATH: &str = "/sys/class/backlight/rpi_backlight/bl_power";

/// Embedded default configuration (compiled into the binary)
pub const EMBEDDED_CONFIG: &str = include_str!("../../kiosk.toml");

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("cannot read {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    /// TOML syntax or type error
    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    /// Time window bound is not `HH:MM`
    #[error("window bound `{value}`: {source}")]
    Window {
        value: String,
        source: TimeParseError,
    },
    /// Cross-field validation failed
    #[error("invalid configuration: {0}")]
    Invalid(#[from] ValidationError),
}

/// Where the configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Path given on the command line or in the environment; must exist
    Explicit(PathBuf),
    /// Default path; embedded defaults are used if it is missing
    Default(PathBuf),
}

impl ConfigSource {
    /// Pick the configuration file from the first argument, then the
    /// environment, then the default path
    pub fn resolve(arg: Option<String>, env: Option<String>) -> Self {
        match arg.or(env).filter(|p| !p.is_empty()) {
            Some(path) => ConfigSource::Explicit(PathBuf::from(path)),
            None => ConfigSource::Default(PathBuf::from(DEFAULT_CONFIG_PATH)),
        }
    }
}

/// Everything the kiosk runtime needs from its configuration
#[derive(Debug, Clone)]
pub struct Settings {
    /// Core configuration (sources, power policy, views)
    pub kiosk: KioskConfig,
    /// Fetch command per source, indexed like `kiosk.sources`
    pub commands: Vec<CommandConfig>,
    /// Backlight power file, None when disabled
    pub backlight_path: Option<PathBuf>,
    /// Input devices to read
    pub input_devices: Vec<PathBuf>,
    /// Where to write the JSON frame, if anywhere
    pub snapshot_path: Option<PathBuf>,
}

// Raw file layout

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default = "default_ui_tick_ms")]
    ui_tick_ms: u32,
    #[serde(default)]
    views: Option<Vec<String>>,
    #[serde(default)]
    power: RawPower,
    #[serde(default)]
    backlight: RawBacklight,
    #[serde(default)]
    input: RawInput,
    #[serde(default)]
    output: RawOutput,
    #[serde(default, rename = "source")]
    sources: Vec<RawSource>,
}

fn default_ui_tick_ms() -> u32 {
    DEFAULT_UI_TICK_MS
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPower {
    backlight_timeout_min: Option<u32>,
    backlight_timeout_s: Option<u32>,
    #[serde(default = "default_true")]
    wake_greeting: bool,
    #[serde(default, rename = "window")]
    windows: Vec<RawWindow>,
}

impl Default for RawPower {
    fn default() -> Self {
        Self {
            backlight_timeout_min: None,
            backlight_timeout_s: None,
            wake_greeting: true,
            windows: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawWindow {
    start: String,
    end: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawBacklight {
    path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawInput {
    #[serde(default)]
    devices: Vec<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawOutput {
    snapshot_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSource {
    name: String,
    interval_s: u32,
    interval_off_s: Option<u32>,
    #[serde(default)]
    only_when_display_on: bool,
    #[serde(default)]
    tracks_temperature: bool,
    temperature_field: Option<String>,
    #[serde(default)]
    command: Vec<String>,
    timeout_s: Option<u32>,
}

/// Load configuration from the resolved source
pub fn load_config(source: &ConfigSource) -> Result<Settings, ConfigError> {
    let settings = match source {
        ConfigSource::Explicit(path) => {
            info!("Loading configuration from {}", path.display());
            parse_config(&read(path)?)?
        }
        ConfigSource::Default(path) if path.exists() => {
            info!("Loading configuration from {}", path.display());
            parse_config(&read(path)?)?
        }
        ConfigSource::Default(path) => {
            warn!(
                "{} not found, using embedded default configuration",
                path.display()
            );
            parse_config(EMBEDDED_CONFIG)?
        }
    };

    log_config_summary(&settings);
    Ok(settings)
}

fn read(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_window(raw: &RawWindow) -> Result<TimeWindow, ConfigError> {
    let bound = |value: &str| -> Result<TimeOfDay, ConfigError> {
        value.parse().map_err(|source| ConfigError::Window {
            value: value.to_string(),
            source,
        })
    };
    let window = TimeWindow::new(bound(&raw.start)?, bound(&raw.end)?);
    if window.start > window.end {
        warn!(
            "Window {}-{} crosses midnight and will never match",
            window.start, window.end
        );
    }
    Ok(window)
}

/// Parse and validate TOML configuration text
pub fn parse_config(text: &str) -> Result<Settings, ConfigError> {
    let raw: RawConfig = toml::from_str(text)?;

    // Power policy
    let mut power = PowerConfig {
        wake_greeting: raw.power.wake_greeting,
        ..PowerConfig::default()
    };
    if let Some(minutes) = raw.power.backlight_timeout_min {
        power.backlight_timeout_s = minutes.saturating_mul(60);
    }
    // Seconds win over minutes when both are given
    if let Some(secs) = raw.power.backlight_timeout_s {
        power.backlight_timeout_s = secs;
    }
    for w in &raw.power.windows {
        power
            .windows
            .push(parse_window(w)?)
            .map_err(|_| ValidationError::TooMany(MAX_WINDOWS))?;
    }

    // Views
    let mut kiosk = KioskConfig {
        ui_tick_ms: raw.ui_tick_ms,
        power,
        ..KioskConfig::default()
    };
    if let Some(views) = &raw.views {
        kiosk.views.clear();
        for view in views {
            kiosk
                .views
                .push(make_name(view)?)
                .map_err(|_| ValidationError::TooMany(MAX_VIEWS))?;
        }
    }

    // Sources
    kiosk.sources.clear();
    let mut commands = Vec::with_capacity(raw.sources.len());
    for s in &raw.sources {
        let source = SourceConfig {
            name: make_name(&s.name)?,
            interval_on_s: s.interval_s,
            interval_off_s: s.interval_off_s,
            only_when_display_on: s.only_when_display_on,
            tracks_temperature: s.tracks_temperature,
        };
        kiosk
            .sources
            .push(source)
            .map_err(|_| ValidationError::TooMany(MAX_SOURCES))?;

        commands.push(CommandConfig {
            argv: s.command.clone(),
            timeout_s: s.timeout_s.unwrap_or(DEFAULT_TIMEOUT_S),
            temperature_field: s.tracks_temperature.then(|| {
                s.temperature_field
                    .clone()
                    .unwrap_or_else(|| DEFAULT_TEMPERATURE_FIELD.to_string())
            }),
        });
    }

    kiosk.validate()?;

    let backlight_path = match raw.backlight.path.as_deref() {
        Some("none") => None,
        Some(path) => Some(PathBuf::from(path)),
        None => Some(PathBuf::from(DEFAULT_BACKLIGHT_PATH)),
    };

    Ok(Settings {
        kiosk,
        commands,
        backlight_path,
        input_devices: raw.input.devices,
        snapshot_path: raw.output.snapshot_path,
    })
}

/// Log a summary of the loaded configuration
fn log_config_summary(settings: &Settings) {
    let kiosk = &settings.kiosk;
    info!("Configuration loaded successfully");
    debug!("  ui tick {} ms", kiosk.ui_tick_ms);
    debug!(
        "  backlight timeout {} s, {} windows, greeting {}",
        kiosk.power.backlight_timeout_s,
        kiosk.power.windows.len(),
        kiosk.power.wake_greeting
    );
    debug!("  {} views", kiosk.views.len());
    for (source, command) in kiosk.sources.iter().zip(&settings.commands) {
        debug!(
            "  source {}: every {} s (off: {:?}, display-only: {}) via {:?}",
            source.name,
            source.interval_on_s,
            source.interval_off_s,
            source.only_when_display_on,
            command.argv
        );
    }
    debug!("  {} input devices", settings.input_devices.len());
}
