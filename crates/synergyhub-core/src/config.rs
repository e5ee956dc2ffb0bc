//! TOML-based configuration.
//!
//! Holds the tunables of the dashboard core:
//! - default scoring weights
//! - timeline canvas width and the "new synergy" badge threshold
//! - committee identities and the purchase-order number prefix
//! - mock ledger seed
//! - an optional JSON snapshot to load instead of the built-in fixtures
//!
//! Configuration is stored at `~/.config/synergyhub/config.toml`
//! (`~/.config/synergyhub-dev/` when `SYNERGYHUB_ENV=dev`).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::scoring::CriteriaWeights;

/// Environment variable selecting the configuration directory flavour.
pub const ENV_VAR: &str = "SYNERGYHUB_ENV";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "default_price_weight")]
    pub price_weight: f64,
    #[serde(default = "default_lead_time_weight")]
    pub lead_time_weight: f64,
    #[serde(default = "default_sla_weight")]
    pub sla_weight: f64,
}

impl ScoringConfig {
    pub fn weights(&self) -> CriteriaWeights {
        CriteriaWeights::new(self.price_weight, self.lead_time_weight, self.sla_weight)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineConfig {
    /// Canvas width used for date-to-pixel mapping.
    #[serde(default = "default_width_px")]
    pub width_px: f64,
    #[serde(default = "default_new_synergy_threshold_hours")]
    pub new_synergy_threshold_hours: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitteeConfig {
    /// Identity recorded on committee decisions.
    #[serde(default = "default_actor")]
    pub actor: String,
    /// Identity recorded on offer evaluations.
    #[serde(default = "default_evaluator")]
    pub evaluator: String,
    #[serde(default = "default_po_prefix")]
    pub po_prefix: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Seed for the mock ledger. Unset means seeded from entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// JSON snapshot of synergies. Unset means built-in sample data.
    #[serde(default)]
    pub synergies_path: Option<String>,
}

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub timeline: TimelineConfig,
    #[serde(default)]
    pub committee: CommitteeConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub data: DataConfig,
}

fn default_price_weight() -> f64 {
    0.6
}
fn default_lead_time_weight() -> f64 {
    0.25
}
fn default_sla_weight() -> f64 {
    0.15
}
fn default_width_px() -> f64 {
    2400.0
}
fn default_new_synergy_threshold_hours() -> i64 {
    24
}
fn default_actor() -> String {
    "comite@cluster.com".into()
}
fn default_evaluator() -> String {
    "auditor@cluster.com".into()
}
fn default_po_prefix() -> String {
    "PO-CLUSTER".into()
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            price_weight: default_price_weight(),
            lead_time_weight: default_lead_time_weight(),
            sla_weight: default_sla_weight(),
        }
    }
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            width_px: default_width_px(),
            new_synergy_threshold_hours: default_new_synergy_threshold_hours(),
        }
    }
}

impl Default for CommitteeConfig {
    fn default() -> Self {
        Self {
            actor: default_actor(),
            evaluator: default_evaluator(),
            po_prefix: default_po_prefix(),
        }
    }
}

/// Returns `~/.config/synergyhub[-dev]/` based on `SYNERGYHUB_ENV`.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var(ENV_VAR).unwrap_or_else(|_| "production".to_string());
    let dir = if env == "dev" {
        base_dir.join("synergyhub-dev")
    } else {
        base_dir.join("synergyhub")
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DirectoryUnavailable(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn coerce(
        key: &str,
        existing: &serde_json::Value,
        value: &str,
    ) -> Result<serde_json::Value, ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let parsed = match existing {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(
                value
                    .parse::<bool>()
                    .map_err(|e| invalid(e.to_string()))?,
            ),
            serde_json::Value::Number(_) => Self::parse_number(value)
                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?,
            // Unset optionals take a number when the text looks like one.
            serde_json::Value::Null => Self::parse_number(value)
                .unwrap_or_else(|| serde_json::Value::String(value.into())),
            serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
            }
            serde_json::Value::String(_) => serde_json::Value::String(value.into()),
        };
        Ok(parsed)
    }

    fn parse_number(value: &str) -> Option<serde_json::Value> {
        if let Ok(n) = value.parse::<i64>() {
            Some(serde_json::Value::Number(n.into()))
        } else if let Ok(n) = value.parse::<f64>() {
            serde_json::Number::from_f64(n).map(serde_json::Value::Number)
        } else {
            None
        }
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;
                let new_value = Self::coerce(key, existing, value)?;
                obj.insert(part.to_string(), new_value);
                return Ok(());
            }
            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Default location of the configuration file.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(config_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            Ok(cfg)
        }
    }

    /// Load from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        for warning in cfg.validate() {
            tracing::warn!(path = %path.display(), "{warning}");
        }
        Ok(cfg)
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Load from disk, returning defaults on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("falling back to default configuration: {e}");
            Self::default()
        })
    }

    /// Get a value as a string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value by dot-separated key, keeping the existing value's type.
    ///
    /// Only updates memory; call [`Config::save`] to persist.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Every leaf key paired with its current value, sorted by key.
    pub fn entries(&self) -> Vec<(String, String)> {
        fn walk(prefix: &str, value: &serde_json::Value, out: &mut Vec<(String, String)>) {
            match value {
                serde_json::Value::Object(map) => {
                    for (k, v) in map {
                        let key = if prefix.is_empty() {
                            k.clone()
                        } else {
                            format!("{prefix}.{k}")
                        };
                        walk(&key, v, out);
                    }
                }
                serde_json::Value::String(s) => out.push((prefix.to_string(), s.clone())),
                other => out.push((prefix.to_string(), other.to_string())),
            }
        }

        let mut out = Vec::new();
        if let Ok(json) = serde_json::to_value(self) {
            walk("", &json, &mut out);
        }
        out
    }

    /// Warnings about values that are accepted but probably unintended.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = self.scoring.weights().warnings();
        if !(self.timeline.width_px.is_finite() && self.timeline.width_px > 0.0) {
            warnings.push(format!(
                "timeline.width_px should be positive, got {}",
                self.timeline.width_px
            ));
        }
        if self.timeline.new_synergy_threshold_hours < 0 {
            warnings.push("timeline.new_synergy_threshold_hours is negative".to_string());
        }
        if self.committee.po_prefix.trim().is_empty() {
            warnings.push("committee.po_prefix is empty".to_string());
        }
        warnings
    }
}
