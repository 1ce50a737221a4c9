//! Runtime configuration for the survey report.

use crate::error::{Result, SurveyError};
use serde::{Deserialize, Serialize};
use std::env;
use tracing::debug;

/// Total mailable population the sample was drawn from.
pub const DEFAULT_UNIVERSE_TOTAL: usize = 24_067;

/// z-score for a 95% confidence level.
pub const DEFAULT_CONFIDENCE_Z: f64 = 1.96;

pub const ENV_CSV_PATH: &str = "SURVEY_CSV_PATH";
pub const ENV_UNIVERSE_TOTAL: &str = "SURVEY_UNIVERSE_TOTAL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyConfig {
    /// Path of the `;`-delimited survey export.
    pub csv_path: String,
    /// Denominator for the response rate.
    pub universe_total: usize,
    pub delimiter: u8,
    pub confidence_z: f64,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            csv_path: "datos.csv".to_string(),
            universe_total: DEFAULT_UNIVERSE_TOTAL,
            delimiter: b';',
            confidence_z: DEFAULT_CONFIDENCE_Z,
        }
    }
}

impl SurveyConfig {
    /// Defaults overlaid with `SURVEY_CSV_PATH` and `SURVEY_UNIVERSE_TOTAL`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`SurveyConfig::from_env`] but reads variables through `lookup`,
    /// which keeps tests away from the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(path) = lookup(ENV_CSV_PATH) {
            let path = path.trim();
            if !path.is_empty() {
                config.csv_path = path.to_string();
            }
        }
        if let Some(raw) = lookup(ENV_UNIVERSE_TOTAL) {
            config.universe_total = parse_universe(&raw)?;
        }
        config.validate()?;
        debug!(?config, "configuration resolved");
        Ok(config)
    }

    pub fn with_csv_path(mut self, path: impl Into<String>) -> Self {
        self.csv_path = path.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.universe_total == 0 {
            return Err(SurveyError::Config {
                message: "universe_total must be greater than zero".to_string(),
            });
        }
        if !(self.confidence_z.is_finite() && self.confidence_z > 0.0) {
            return Err(SurveyError::Config {
                message: format!("confidence_z must be positive, got {}", self.confidence_z),
            });
        }
        Ok(())
    }
}

fn parse_universe(raw: &str) -> Result<usize> {
    let cleaned = raw.trim().replace(['.', ',', '_'], "");
    cleaned.parse::<usize>().map_err(|_| SurveyError::Config {
        message: format!("{} is not a valid population size: {:?}", ENV_UNIVERSE_TOTAL, raw),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_overrides() {
        let config = SurveyConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, SurveyConfig::default());
        assert_eq!(config.universe_total, 24_067);
        assert_eq!(config.delimiter, b';');
    }

    #[test]
    fn overrides_path_and_universe() {
        let config = SurveyConfig::from_lookup(|key| match key {
            ENV_CSV_PATH => Some("data/encuesta.csv".to_string()),
            ENV_UNIVERSE_TOTAL => Some("30.000".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.csv_path, "data/encuesta.csv");
        assert_eq!(config.universe_total, 30_000);
    }

    #[test]
    fn rejects_zero_or_garbage_universe() {
        let zero = SurveyConfig::from_lookup(|key| {
            (key == ENV_UNIVERSE_TOTAL).then(|| "0".to_string())
        });
        assert!(matches!(zero, Err(SurveyError::Config { .. })));

        let garbage = SurveyConfig::from_lookup(|key| {
            (key == ENV_UNIVERSE_TOTAL).then(|| "many".to_string())
        });
        assert!(matches!(garbage, Err(SurveyError::Config { .. })));
    }
}
