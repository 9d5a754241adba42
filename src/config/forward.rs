use super::traits::{check_positive, ConfigManifest, ConfigSection, FieldManifest};
use crate::error::DrawkillError;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForwardConfig {
    /// Numbers returned by M and N.
    pub output_size: usize,
    pub logistic: LogisticParams,
    pub reverse: ReverseParams,
}

impl Default for ForwardConfig {
    fn default() -> Self {
        Self {
            output_size: 7,
            logistic: LogisticParams::default(),
            reverse: ReverseParams::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogisticParams {
    pub short_window: usize,
    pub learning_rate: f64,
    pub epochs: usize,
    pub min_history: usize,
}

impl Default for LogisticParams {
    fn default() -> Self {
        Self {
            short_window: 20,
            learning_rate: 0.1,
            epochs: 200,
            min_history: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReverseParams {
    pub hot_cold_window: usize,
    pub short_window: usize,
    pub long_weight: f64,
    pub recency_weight: f64,
    pub short_weight: f64,
}

impl Default for ReverseParams {
    fn default() -> Self {
        Self {
            hot_cold_window: 15,
            short_window: 20,
            long_weight: 0.3,
            recency_weight: 0.4,
            short_weight: 0.3,
        }
    }
}

impl ConfigSection for ForwardConfig {
    fn section_name() -> &'static str {
        "forward"
    }

    fn validate(&self) -> Result<(), DrawkillError> {
        check_positive("forward.output_size", self.output_size)?;
        check_positive("forward.logistic.short_window", self.logistic.short_window)?;
        check_positive("forward.reverse.hot_cold_window", self.reverse.hot_cold_window)?;
        check_positive("forward.reverse.short_window", self.reverse.short_window)?;
        if self.logistic.learning_rate <= 0.0 {
            return Err(DrawkillError::Configuration(
                "forward.logistic.learning_rate must be positive".to_string(),
            ));
        }
        if self.logistic.min_history < 2 {
            return Err(DrawkillError::Configuration(
                "forward.logistic.min_history must be at least 2".to_string(),
            ));
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "Forward".to_string(),
            fields: vec![
                FieldManifest::new(
                    "output_size",
                    "integer",
                    json!(self.output_size),
                    Some((1.0, 255.0)),
                    "Numbers returned by the logistic and reverse predictors",
                ),
                FieldManifest::new(
                    "logistic.learning_rate",
                    "float",
                    json!(self.logistic.learning_rate),
                    None,
                    "Gradient descent step",
                ),
                FieldManifest::new(
                    "logistic.epochs",
                    "integer",
                    json!(self.logistic.epochs),
                    None,
                    "Full-batch gradient descent iterations",
                ),
                FieldManifest::new(
                    "reverse.recency_weight",
                    "float",
                    json!(self.reverse.recency_weight),
                    Some((0.0, 1.0)),
                    "Weight of normalised miss streak in the reverse predictor",
                ),
            ],
        }
    }
}
