use super::traits::{check_fraction, ConfigManifest, ConfigSection, FieldManifest};
use crate::error::DrawkillError;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtectionConfig {
    pub repeat_min_rate: f64,
    pub repeat_min_samples: usize,
    pub repeat_prior: f64,
    pub repeat_scale: f64,

    pub overdue_multiple: f64,
    pub overdue_min_appearances: usize,
    pub overdue_scale: f64,
    pub overdue_cap: f64,

    pub trend_window: usize,
    pub trend_min_delta: i64,
    pub trend_scale: f64,

    pub cyclic_min_appearances: usize,
    pub cyclic_max_cv: f64,
    pub cyclic_low: f64,
    pub cyclic_high: f64,
    pub cyclic_min_score: f64,

    pub burst_min_len: usize,
    pub burst_silence_low: f64,
    pub burst_silence_high: f64,
    pub burst_scale: f64,
    pub burst_cap: f64,

    /// Kill vote multiplier is `max(discount_floor, 1 - score * discount_scale)`.
    pub discount_scale: f64,
    pub discount_floor: f64,
}

impl Default for ProtectionConfig {
    fn default() -> Self {
        Self {
            repeat_min_rate: 0.12,
            repeat_min_samples: 3,
            repeat_prior: 0.14,
            repeat_scale: 3.0,

            overdue_multiple: 1.5,
            overdue_min_appearances: 3,
            overdue_scale: 0.6,
            overdue_cap: 2.5,

            trend_window: 10,
            trend_min_delta: 2,
            trend_scale: 0.3,

            cyclic_min_appearances: 4,
            cyclic_max_cv: 0.6,
            cyclic_low: 0.7,
            cyclic_high: 2.0,
            cyclic_min_score: 0.2,

            burst_min_len: 2,
            burst_silence_low: 3.0,
            burst_silence_high: 8.0,
            burst_scale: 0.5,
            burst_cap: 1.5,

            discount_scale: 0.6,
            discount_floor: 0.05,
        }
    }
}

impl ProtectionConfig {
    pub fn discount_factor(&self, protection_score: f64) -> f64 {
        (1.0 - protection_score * self.discount_scale).max(self.discount_floor)
    }
}

impl ConfigSection for ProtectionConfig {
    fn section_name() -> &'static str {
        "protection"
    }

    fn validate(&self) -> Result<(), DrawkillError> {
        check_fraction("protection.repeat_min_rate", self.repeat_min_rate)?;
        check_fraction("protection.repeat_prior", self.repeat_prior)?;
        check_fraction("protection.discount_floor", self.discount_floor)?;
        if self.trend_window == 0 {
            return Err(DrawkillError::Configuration(
                "protection.trend_window must be at least 1".to_string(),
            ));
        }
        if self.cyclic_low > self.cyclic_high || self.burst_silence_low > self.burst_silence_high {
            return Err(DrawkillError::Configuration(
                "protection bands must satisfy low <= high".to_string(),
            ));
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "Protection".to_string(),
            fields: vec![
                FieldManifest::new(
                    "repeat_min_rate",
                    "float",
                    json!(self.repeat_min_rate),
                    Some((0.0, 1.0)),
                    "One-step repeat rate above which a last-row number is protected",
                ),
                FieldManifest::new(
                    "overdue_multiple",
                    "float",
                    json!(self.overdue_multiple),
                    None,
                    "Miss streak, in average gaps, that triggers overdue protection",
                ),
                FieldManifest::new(
                    "trend_min_delta",
                    "integer",
                    json!(self.trend_min_delta),
                    None,
                    "Window-over-window frequency rise that triggers trend protection",
                ),
                FieldManifest::new(
                    "cyclic_max_cv",
                    "float",
                    json!(self.cyclic_max_cv),
                    None,
                    "Largest gap coefficient of variation still considered regular",
                ),
                FieldManifest::new(
                    "discount_scale",
                    "float",
                    json!(self.discount_scale),
                    None,
                    "Kill vote reduction per unit of protection score",
                ),
                FieldManifest::new(
                    "discount_floor",
                    "float",
                    json!(self.discount_floor),
                    Some((0.0, 1.0)),
                    "Smallest multiplier a protected number's kill vote keeps",
                ),
            ],
        }
    }
}
