//! Configuration type definitions
//!
//! These types represent the kiosk configuration after it has been read
//! and converted by the host. Everything here is immutable once the
//! kiosk has started.

use heapless::{String, Vec};

use crate::clock::{Millis, TimeWindow};

#[cfg(feature = "serde")]
use serde::Serialize;

/// Maximum data sources per config
pub const MAX_SOURCES: usize = 8;

/// Maximum source or view name length (bytes)
pub const MAX_NAME_LEN: usize = 24;

/// Maximum views per config
pub const MAX_VIEWS: usize = 8;

/// Maximum daily on-windows
pub const MAX_WINDOWS: usize = 8;

/// Default UI tick period
pub const DEFAULT_UI_TICK_MS: u32 = 50;

/// Allowed UI tick period range (inclusive)
pub const UI_TICK_RANGE_MS: (u32, u32) = (10, 100);

/// Default idle time before the backlight may switch off
pub const DEFAULT_BACKLIGHT_TIMEOUT_S: u32 = 20 * 60;

/// Source or view name
pub type Name = String<MAX_NAME_LEN>;

/// Refresh policy of one data source
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SourceConfig {
    /// Unique source name, also the key in the state store
    pub name: Name,
    /// Refresh interval while the display is on (seconds, > 0)
    pub interval_on_s: u32,
    /// Refresh interval while the display is off; falls back to `interval_on_s`
    pub interval_off_s: Option<u32>,
    /// Skip this source entirely while the display is off
    pub only_when_display_on: bool,
    /// Feed this source's temperature into the trend history
    pub tracks_temperature: bool,
}

impl SourceConfig {
    /// Create a source that refreshes at the same rate regardless of power
    pub fn new(name: &str, interval_on_s: u32) -> Result<Self, ValidationError> {
        Ok(Self {
            name: make_name(name)?,
            interval_on_s,
            interval_off_s: None,
            only_when_display_on: false,
            tracks_temperature: false,
        })
    }

    /// Set a slower cadence for when the display is off
    pub fn with_interval_off(mut self, interval_off_s: u32) -> Self {
        self.interval_off_s = Some(interval_off_s);
        self
    }

    /// Only refresh while the display is on
    pub fn display_on_only(mut self) -> Self {
        self.only_when_display_on = true;
        self
    }

    /// Mark this source as the temperature trend source
    pub fn tracking_temperature(mut self) -> Self {
        self.tracks_temperature = true;
        self
    }

    /// Interval to apply for the given display power, or None when gated off
    pub fn effective_interval_ms(&self, display_on: bool) -> Option<Millis> {
        if display_on {
            Some(self.interval_on_s as Millis * 1000)
        } else if self.only_when_display_on {
            None
        } else {
            let secs = self.interval_off_s.unwrap_or(self.interval_on_s);
            Some(secs as Millis * 1000)
        }
    }
}

/// Display power policy
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PowerConfig {
    /// Idle time after which an override ends and the display may blank
    pub backlight_timeout_s: u32,
    /// Daily windows during which the display is forced on
    pub windows: Vec<TimeWindow, MAX_WINDOWS>,
    /// Play the greeting when woken by touch
    pub wake_greeting: bool,
}

impl Default for PowerConfig {
    fn default() -> Self {
        Self {
            backlight_timeout_s: DEFAULT_BACKLIGHT_TIMEOUT_S,
            windows: Vec::new(),
            wake_greeting: true,
        }
    }
}

impl PowerConfig {
    pub fn backlight_timeout_ms(&self) -> Millis {
        self.backlight_timeout_s as Millis * 1000
    }
}

/// Complete kiosk configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct KioskConfig {
    /// UI tick period
    pub ui_tick_ms: u32,
    /// Display power policy
    pub power: PowerConfig,
    /// View names in rotation order
    pub views: Vec<Name, MAX_VIEWS>,
    /// Data sources in store order
    pub sources: Vec<SourceConfig, MAX_SOURCES>,
}

impl Default for KioskConfig {
    /// Stock board layout: weather, hazards, two transit stops, flights
    /// both ways and electricity prices.
    fn default() -> Self {
        let mut sources = Vec::new();
        for source in default_sources() {
            let _ = sources.push(source);
        }

        let mut views = Vec::new();
        for name in ["transit", "flights", "weather"] {
            if let Ok(name) = make_name(name) {
                let _ = views.push(name);
            }
        }

        Self {
            ui_tick_ms: DEFAULT_UI_TICK_MS,
            power: PowerConfig::default(),
            views,
            sources,
        }
    }
}

fn default_sources() -> impl Iterator<Item = SourceConfig> {
    let table: [(&str, u32, Option<u32>, bool, bool); 7] = [
        ("weather", 300, None, true, true),
        ("hazard", 300, None, true, false),
        ("transit-city", 20, Some(40), false, false),
        ("transit-airport", 20, Some(40), false, false),
        ("flights-departures", 60, None, true, false),
        ("flights-arrivals", 60, None, true, false),
        ("electricity", 600, Some(600), false, false),
    ];

    table
        .into_iter()
        .filter_map(|(name, on, off, only_on, temp)| {
            let name = make_name(name).ok()?;
            Some(SourceConfig {
                name,
                interval_on_s: on,
                interval_off_s: off,
                only_when_display_on: only_on,
                tracks_temperature: temp,
            })
        })
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name is empty")]
    EmptyName,
    #[error("name longer than 24 bytes")]
    NameTooLong,
    #[error("duplicate source name `{0}`")]
    DuplicateSource(Name),
    #[error("source `{0}` has a zero refresh interval")]
    ZeroInterval(Name),
    #[error("more than one source tracks temperature")]
    MultipleTemperatureSources,
    #[error("no data sources configured")]
    NoSources,
    #[error("too many entries (max {0})")]
    TooMany(usize),
    #[error("at least one view is required")]
    NoViews,
    #[error("ui tick of {0} ms outside 10..=100")]
    UiTickOutOfRange(u32),
    #[error("backlight timeout must be positive")]
    ZeroBacklightTimeout,
}

/// Build a bounded name, rejecting empty and oversized input
pub fn make_name(name: &str) -> Result<Name, ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    let mut out = Name::new();
    out.push_str(name)
        .map_err(|_| ValidationError::NameTooLong)?;
    Ok(out)
}

impl KioskConfig {
    /// Check all cross-field invariants
    pub fn validate(&self) -> Result<(), ValidationError> {
        let (min_tick, max_tick) = UI_TICK_RANGE_MS;
        if !(min_tick..=max_tick).contains(&self.ui_tick_ms) {
            return Err(ValidationError::UiTickOutOfRange(self.ui_tick_ms));
        }

        if self.power.backlight_timeout_s == 0 {
            return Err(ValidationError::ZeroBacklightTimeout);
        }

        if self.views.is_empty() {
            return Err(ValidationError::NoViews);
        }
        if self.views.iter().any(|v| v.is_empty()) {
            return Err(ValidationError::EmptyName);
        }

        if self.sources.is_empty() {
            return Err(ValidationError::NoSources);
        }

        let mut trackers = 0;
        for (i, source) in self.sources.iter().enumerate() {
            if source.name.is_empty() {
                return Err(ValidationError::EmptyName);
            }
            if source.interval_on_s == 0 || source.interval_off_s == Some(0) {
                return Err(ValidationError::ZeroInterval(source.name.clone()));
            }
            if self.sources[..i].iter().any(|s| s.name == source.name) {
                return Err(ValidationError::DuplicateSource(source.name.clone()));
            }
            if source.tracks_temperature {
                trackers += 1;
            }
        }

        if trackers > 1 {
            return Err(ValidationError::MultipleTemperatureSources);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = KioskConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.sources.len(), 7);
        assert_eq!(config.views.len(), 3);
        assert_eq!(config.power.backlight_timeout_s, 1200);
        assert!(config.sources[0].tracks_temperature);
    }

    #[test]
    fn test_effective_interval() {
        let transit = SourceConfig::new("transit", 20).unwrap().with_interval_off(40);
        assert_eq!(transit.effective_interval_ms(true), Some(20_000));
        assert_eq!(transit.effective_interval_ms(false), Some(40_000));

        let plain = SourceConfig::new("prices", 600).unwrap();
        assert_eq!(plain.effective_interval_ms(false), Some(600_000));

        let weather = SourceConfig::new("weather", 300).unwrap().display_on_only();
        assert_eq!(weather.effective_interval_ms(true), Some(300_000));
        assert_eq!(weather.effective_interval_ms(false), None);
    }

    #[test]
    fn test_name_bounds() {
        assert_eq!(make_name(""), Err(ValidationError::EmptyName));
        assert!(make_name("flights-departures").is_ok());
        assert_eq!(
            make_name("a-name-that-is-far-too-long-for-a-slot"),
            Err(ValidationError::NameTooLong)
        );
    }

    #[test]
    fn test_zero_interval_rejected() {
        let mut config = KioskConfig::default();
        config.sources[2].interval_on_s = 0;
        assert!(matches!(
            config.validate(),
            Err(ValidationError::ZeroInterval(_))
        ));

        let mut config = KioskConfig::default();
        config.sources[2].interval_off_s = Some(0);
        assert!(matches!(
            config.validate(),
            Err(ValidationError::ZeroInterval(_))
        ));
    }

    #[test]
    fn test_duplicate_source_rejected() {
        let mut config = KioskConfig::default();
        config.sources[1].name = make_name("weather").unwrap();
        config.sources[1].tracks_temperature = false;
        assert_eq!(
            config.validate(),
            Err(ValidationError::DuplicateSource(make_name("weather").unwrap()))
        );
    }

    #[test]
    fn test_single_temperature_source() {
        let mut config = KioskConfig::default();
        config.sources[1].tracks_temperature = true;
        assert_eq!(
            config.validate(),
            Err(ValidationError::MultipleTemperatureSources)
        );
    }

    #[test]
    fn test_views_and_tick_checked() {
        let mut config = KioskConfig::default();
        config.views.clear();
        assert_eq!(config.validate(), Err(ValidationError::NoViews));

        let mut config = KioskConfig::default();
        config.ui_tick_ms = 250;
        assert_eq!(
            config.validate(),
            Err(ValidationError::UiTickOutOfRange(250))
        );

        let mut config = KioskConfig::default();
        config.sources.clear();
        assert_eq!(config.validate(), Err(ValidationError::NoSources));
    }
}
