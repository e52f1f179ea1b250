use std::env;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{RelayError, Result};

/// Runtime configuration. The only tunable is the sampling probability; a
/// probability of exactly 0 disables tracing entirely (no sampler is built and
/// batches are skipped wholesale).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub sample_probability: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sample_probability: 0.0,
        }
    }
}

impl Config {
    pub fn new(sample_probability: f64) -> Self {
        Self { sample_probability }
    }

    pub fn load() -> Result<Self> {
        let mut cfg = Self::default();
        let config_path = config_file_path();
        if let Some(file_overrides) = load_file_overrides(&config_path)? {
            apply_overrides(&mut cfg, file_overrides);
        }
        let env_overrides = load_env_overrides()?;
        apply_overrides(&mut cfg, env_overrides);
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_env() -> Result<Self> {
        let mut cfg = Self::default();
        let env_overrides = load_env_overrides()?;
        apply_overrides(&mut cfg, env_overrides);
        cfg.validate()?;
        Ok(cfg)
    }

    /// The single configuration-time check: the probability must lie in
    /// [0, 1]. NaN is outside the interval and rejected.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.sample_probability) {
            return Err(RelayError::Config(
                "sampling probability must be between 0 and 1 inclusive".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigOverrides {
    sample_probability: Option<f64>,
}

fn config_file_path() -> PathBuf {
    if let Ok(path) = env::var("SPANRELAY_CONFIG") {
        return PathBuf::from(path);
    }

    let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
    let config_home = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(home).join(".config"));
    config_home.join("spanrelay/config.toml")
}

fn load_file_overrides(path: &PathBuf) -> Result<Option<ConfigOverrides>> {
    if !path.exists() {
        return Ok(None);
    }

    let raw = fs::read_to_string(path)
        .map_err(|e| RelayError::Config(format!("failed reading {}: {e}", path.display())))?;
    let parsed: ConfigOverrides = toml::from_str(&raw)
        .map_err(|e| RelayError::Config(format!("failed parsing {}: {e}", path.display())))?;
    Ok(Some(parsed))
}

fn load_env_overrides() -> Result<ConfigOverrides> {
    let sample_probability = match env::var("SPANRELAY_SAMPLE_PROBABILITY") {
        Ok(v) => Some(v.parse::<f64>().map_err(|e| {
            RelayError::Config(format!("bad SPANRELAY_SAMPLE_PROBABILITY in environment: {e}"))
        })?),
        Err(_) => None,
    };

    Ok(ConfigOverrides { sample_probability })
}

fn apply_overrides(cfg: &mut Config, overrides: ConfigOverrides) {
    if let Some(v) = overrides.sample_probability {
        cfg.sample_probability = v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_disabled() {
        let cfg = Config::default();
        assert_eq!(cfg.sample_probability, 0.0);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn accepts_interval_bounds() {
        assert!(Config::new(0.0).validate().is_ok());
        assert!(Config::new(0.5).validate().is_ok());
        assert!(Config::new(1.0).validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_probability() {
        for bad in [-0.1, 1.1, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = Config::new(bad).validate().unwrap_err();
            assert_eq!(
                err.to_string(),
                "configuration error: sampling probability must be between 0 and 1 inclusive"
            );
        }
    }

    #[test]
    fn apply_file_overrides_updates_probability() {
        let mut cfg = Config::default();
        let parsed: ConfigOverrides = toml::from_str("sample_probability = 0.25").unwrap();
        apply_overrides(&mut cfg, parsed);
        assert_eq!(cfg.sample_probability, 0.25);
    }

    #[test]
    fn empty_overrides_keep_defaults() {
        let mut cfg = Config::new(0.75);
        apply_overrides(&mut cfg, ConfigOverrides::default());
        assert_eq!(cfg.sample_probability, 0.75);
    }
}
