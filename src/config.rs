//! Runtime engine configuration.
//!
//! [`EngineConfig::default()`] carries the reference tuning. A host may
//! override any subset of fields with a JSON document via
//! [`EngineConfig::from_json`]; missing keys keep their defaults.

use serde::Deserialize;
use thiserror::Error;

/// How the base value of a click is derived.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickPolicy {
    /// Base click is always 1, whatever gem is active.
    Flat,
    /// Base click is the current gem's `base_click`.
    PerGem,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be > 0 (got {value})")]
    NonPositive { field: &'static str, value: f64 },
}

/// Tunable constants for the engine.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // ── Scheduler ─────────────────────────────────────────────
    /// Main income/regen tick interval.
    pub tick_interval_ms: f64,
    /// Auto-click interval once the unlock is owned.
    pub auto_click_interval_ms: f64,
    /// Combo drain evaluation interval (~60 Hz).
    pub combo_interval_ms: f64,
    /// Largest frame delta fed to the timers in one update.
    pub max_frame_delta_ms: f64,

    // ── Economy ───────────────────────────────────────────────
    pub click_policy: ClickPolicy,
    /// Fraction of max health regenerated per second on gems past the first.
    pub regen_rate: f64,

    // ── Combo ─────────────────────────────────────────────────
    /// Delay before the displayed combo tier catches up after a promotion.
    pub combo_promotion_delay_ms: f64,
    /// Hard stop for a single drain run.
    pub combo_safety_timeout_ms: f64,

    // ── Persistence ───────────────────────────────────────────
    pub storage_key: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 200.0,
            auto_click_interval_ms: 1000.0,
            combo_interval_ms: 16.0,
            max_frame_delta_ms: 1000.0,
            click_policy: ClickPolicy::Flat,
            regen_rate: 0.15,
            combo_promotion_delay_ms: 150.0,
            combo_safety_timeout_ms: 30_000.0,
            storage_key: "idle-clicker-save-v1".into(),
        }
    }
}

impl EngineConfig {
    /// Parse a (possibly partial) JSON config and validate the intervals.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let intervals = [
            ("tick_interval_ms", self.tick_interval_ms),
            ("auto_click_interval_ms", self.auto_click_interval_ms),
            ("combo_interval_ms", self.combo_interval_ms),
            ("max_frame_delta_ms", self.max_frame_delta_ms),
        ];
        for (field, value) in intervals {
            // NaN fails this comparison too.
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        Ok(())
    }
}
