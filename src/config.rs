//! Tuning constants for every effect
//!
//! Defaults reproduce the landing page exactly. Any subset can be overridden
//! from JSON; missing keys keep their default.

use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::rng::uniform;
use crate::error::ConfigError;

/// Half-open sampling range `[min, max)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f64,
    pub max: f64,
}

impl Span {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        uniform(rng, self.min, self.max)
    }

    #[inline]
    pub fn contains(&self, v: f64) -> bool {
        v >= self.min && v < self.max
    }

    fn check(&self, field: &'static str) -> Result<(), ConfigError> {
        if !(self.min.is_finite() && self.max.is_finite()) || self.min > self.max {
            return Err(ConfigError::invalid(
                field,
                format!("range [{}, {}) is inverted or not finite", self.min, self.max),
            ));
        }
        Ok(())
    }
}

/// Hero particle field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub count: usize,
    pub link_distance: f64,
    /// Per-axis speed bound, px/frame
    pub max_speed: f64,
    pub opacity: Span,
    pub size: Span,
    pub wave_count: usize,
    pub wave_sample_step: f64,
    pub time_step: f64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            count: 40,
            link_distance: 120.0,
            max_speed: 0.25,
            opacity: Span::new(0.3, 0.8),
            size: Span::new(1.0, 3.0),
            wave_count: 3,
            wave_sample_step: 5.0,
            time_step: 0.01,
        }
    }
}

/// "Connected innovation" node network.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub count: usize,
    pub link_distance: f64,
    /// Link distance while the pointer is over the card
    pub active_link_distance: f64,
    pub max_speed: f64,
    pub radius: Span,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            count: 12,
            link_distance: 120.0,
            active_link_distance: 150.0,
            max_speed: 0.15,
            radius: Span::new(2.0, 4.0),
        }
    }
}

/// Full-page tech grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub spacing_x: f64,
    pub spacing_y: f64,
    /// Total jitter width; each axis is offset by U[-jitter/2, jitter/2)
    pub jitter: f64,
    pub link_distance: f64,
    pub initial_active_chance: f64,
    pub initial_timer_max: f64,
    pub timer_reset: Span,
    pub margin: f64,
    /// Fraction of the offset from the base position removed each frame
    pub restoring: f64,
    pub max_speed: f64,
    pub radius: Span,
    pub pulse_speed: Span,
    /// Frames between packet spawn attempts
    pub spawn_period: u32,
    pub packet_speed: Span,
    pub hex_size: f64,
    pub glyph_count: usize,
    pub glyphs: Vec<String>,
    pub time_step: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            spacing_x: 120.0,
            spacing_y: 100.0,
            jitter: 40.0,
            link_distance: 180.0,
            initial_active_chance: 0.3,
            initial_timer_max: 100.0,
            timer_reset: Span::new(50.0, 200.0),
            margin: 50.0,
            restoring: 0.001,
            max_speed: 0.15,
            radius: Span::new(1.5, 3.5),
            pulse_speed: Span::new(0.02, 0.04),
            spawn_period: 30,
            packet_speed: Span::new(0.008, 0.02),
            hex_size: 30.0,
            glyph_count: 20,
            glyphs: ["{ }", "< />", "[ ]", "( )", "0x", "//"]
                .into_iter()
                .map(String::from)
                .collect(),
            time_step: 0.016,
        }
    }
}

/// Hero headline scramble.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecryptConfig {
    pub charset: String,
    pub tick_ms: u32,
    pub delay_ms: u32,
}

pub const DEFAULT_CHARSET: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()_+-=[]{}|;:,.<>?";

impl Default for DecryptConfig {
    fn default() -> Self {
        Self { charset: DEFAULT_CHARSET.to_string(), tick_ms: 50, delay_ms: 0 }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub field: FieldConfig,
    pub network: NetworkConfig,
    pub grid: GridConfig,
    pub decrypt: DecryptConfig,
}

fn positive(field: &'static str, v: f64) -> Result<(), ConfigError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be positive, got {v}")))
    }
}

fn non_negative(field: &'static str, v: f64) -> Result<(), ConfigError> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be non-negative, got {v}")))
    }
}

impl Config {
    /// Parse and validate a (possibly partial) JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        let config = Self::from_json_str(&text)?;
        debug!(path = %path.display(), "Loaded effect config");
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let f = &self.field;
        positive("field.link_distance", f.link_distance)?;
        non_negative("field.max_speed", f.max_speed)?;
        positive("field.wave_sample_step", f.wave_sample_step)?;
        non_negative("field.time_step", f.time_step)?;
        f.opacity.check("field.opacity")?;
        f.size.check("field.size")?;

        let n = &self.network;
        positive("network.link_distance", n.link_distance)?;
        positive("network.active_link_distance", n.active_link_distance)?;
        non_negative("network.max_speed", n.max_speed)?;
        n.radius.check("network.radius")?;

        let g = &self.grid;
        positive("grid.spacing_x", g.spacing_x)?;
        positive("grid.spacing_y", g.spacing_y)?;
        non_negative("grid.jitter", g.jitter)?;
        positive("grid.link_distance", g.link_distance)?;
        if !(0.0..=1.0).contains(&g.initial_active_chance) {
            return Err(ConfigError::invalid(
                "grid.initial_active_chance",
                format!("must be within [0, 1], got {}", g.initial_active_chance),
            ));
        }
        non_negative("grid.initial_timer_max", g.initial_timer_max)?;
        g.timer_reset.check("grid.timer_reset")?;
        positive("grid.timer_reset.min", g.timer_reset.min)?;
        non_negative("grid.margin", g.margin)?;
        non_negative("grid.restoring", g.restoring)?;
        non_negative("grid.max_speed", g.max_speed)?;
        g.radius.check("grid.radius")?;
        g.pulse_speed.check("grid.pulse_speed")?;
        if g.spawn_period == 0 {
            return Err(ConfigError::invalid("grid.spawn_period", "must be at least 1 frame"));
        }
        g.packet_speed.check("grid.packet_speed")?;
        positive("grid.packet_speed.min", g.packet_speed.min)?;
        positive("grid.hex_size", g.hex_size)?;
        if g.glyph_count > 0 && g.glyphs.is_empty() {
            return Err(ConfigError::invalid("grid.glyphs", "empty glyph set with glyph_count > 0"));
        }
        non_negative("grid.time_step", g.time_step)?;

        if self.decrypt.tick_ms == 0 {
            return Err(ConfigError::invalid("decrypt.tick_ms", "must be at least 1 ms"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        Config::default().validate().expect("defaults must validate");
    }

    #[test]
    fn partial_json_overrides_only_named_keys() {
        let config = Config::from_json_str(r#"{ "grid": { "spawn_period": 10 } }"#).unwrap();
        assert_eq!(config.grid.spawn_period, 10);
        assert_eq!(config.grid.spacing_x, 120.0);
        assert_eq!(config.field, FieldConfig::default());
    }

    #[test]
    fn defaults_survive_json() {
        let json = Config::default().to_json_pretty().unwrap();
        assert_eq!(Config::from_json_str(&json).unwrap(), Config::default());
    }

    #[test]
    fn rejects_inverted_range() {
        let err = Config::from_json_str(
            r#"{ "grid": { "timer_reset": { "min": 200.0, "max": 50.0 } } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "grid.timer_reset", .. }), "{err}");
    }

    #[test]
    fn rejects_zero_spawn_period_and_bad_distance() {
        let err = Config::from_json_str(r#"{ "grid": { "spawn_period": 0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "grid.spawn_period", .. }));

        let err = Config::from_json_str(r#"{ "field": { "link_distance": -1.0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "field.link_distance", .. }));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(Config::from_json_str("{ not json"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Config::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
