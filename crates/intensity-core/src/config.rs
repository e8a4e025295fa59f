//! Runtime configuration with `key=value` overrides.
//!
//! Hosts collect pairs from wherever is natural (URL query, argv) and apply
//! them on top of [`ControlConfig::default`].

use crate::bridge::CommandOverrides;
use crate::constants::TELEMETRY_POLL_MS;
use crate::feedback::FeedbackProfile;
use crate::geometry::{DialArc, GeometrySampling};
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown config key `{0}`")]
    UnknownKey(String),
    #[error("invalid value `{value}` for `{key}`")]
    InvalidValue { key: String, value: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct ControlConfig {
    pub feedback: FeedbackProfile,
    pub sampling: GeometrySampling,
    pub dial: DialArc,
    pub telemetry_interval: Duration,
    /// Fields merged into every dispatched command.
    pub overrides: CommandOverrides,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            feedback: FeedbackProfile::default(),
            sampling: GeometrySampling::default(),
            dial: DialArc::default(),
            telemetry_interval: Duration::from_millis(TELEMETRY_POLL_MS),
            overrides: CommandOverrides::default(),
        }
    }
}

fn parse_switch(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value {
        "1" | "on" | "true" | "yes" => Ok(true),
        "0" | "off" | "false" | "no" => Ok(false),
        _ => Err(invalid(key, value)),
    }
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

impl ControlConfig {
    /// Apply a single override.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match key.trim() {
            "thud" => self.feedback.include_thud = parse_switch(key, value)?,
            "geometry" => {
                self.sampling = match value {
                    "cache" => GeometrySampling::CacheAtAcquire,
                    "resample" => GeometrySampling::ResampleOnMove,
                    _ => return Err(invalid(key, value)),
                }
            }
            "camera" => {
                if value.is_empty() {
                    return Err(invalid(key, value));
                }
                self.overrides.camera_id = Some(value.to_string());
            }
            "force_level" => {
                let level = value.parse::<u32>().map_err(|_| invalid(key, value))?;
                self.overrides.force_level = Some(level);
            }
            "burst" => self.overrides.burst = Some(parse_switch(key, value)?),
            "pwm" => self.overrides.use_pwm = Some(parse_switch(key, value)?),
            "poll_ms" => {
                let ms = value.parse::<u64>().map_err(|_| invalid(key, value))?;
                // the browser timer takes an i32 delay
                if ms == 0 || ms > i32::MAX as u64 {
                    return Err(invalid(key, value));
                }
                self.telemetry_interval = Duration::from_millis(ms);
            }
            "arc" => {
                let span = value.parse::<f32>().map_err(|_| invalid(key, value))?;
                if !(1.0..=360.0).contains(&span) {
                    return Err(invalid(key, value));
                }
                self.dial = DialArc::centered_gap(span);
            }
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }

    /// Apply every pair, logging and skipping the ones that fail.
    /// Returns the errors encountered.
    pub fn apply_pairs<'a, I>(&mut self, pairs: I) -> Vec<ConfigError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut errors = Vec::new();
        for (k, v) in pairs {
            if let Err(e) = self.apply(k, v) {
                log::warn!("[config] {}", e);
                errors.push(e);
            }
        }
        errors
    }
}

/// Split `key=value` arguments; entries without `=` are ignored.
pub fn split_pairs<'a>(args: impl IntoIterator<Item = &'a str>) -> Vec<(&'a str, &'a str)> {
    args.into_iter()
        .filter_map(|a| a.split_once('='))
        .collect()
}
