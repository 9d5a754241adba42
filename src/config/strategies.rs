use super::traits::{check_fraction, check_positive, ConfigManifest, ConfigSection, FieldManifest};
use crate::error::DrawkillError;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Thresholds of the kill strategy library. Defaults reproduce the reference scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    pub frequency: FrequencyParams,
    pub miss_cycle: MissCycleParams,
    pub tail_exclusion: WindowParams,
    pub zone_cold: WindowParams,
    pub neighbor: NeighborParams,
    pub parity: ParityParams,
    pub sum_deviation: WindowParams,
    pub transition: TransitionParams,
    pub consecutive_decay: ConsecutiveDecayParams,
    pub tail_constraint: TailConstraintParams,
    pub periodicity: PeriodicityParams,
    pub consecutive_exclusion: ConsecutiveExclusionParams,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            frequency: FrequencyParams::default(),
            miss_cycle: MissCycleParams::default(),
            tail_exclusion: WindowParams { window: 15 },
            zone_cold: WindowParams { window: 10 },
            neighbor: NeighborParams::default(),
            parity: ParityParams::default(),
            sum_deviation: WindowParams { window: 15 },
            transition: TransitionParams::default(),
            consecutive_decay: ConsecutiveDecayParams::default(),
            tail_constraint: TailConstraintParams::default(),
            periodicity: PeriodicityParams::default(),
            consecutive_exclusion: ConsecutiveExclusionParams::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowParams {
    pub window: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrequencyParams {
    pub window: usize,
    /// Multiplier applied when global frequency exceeds recent frequency.
    pub regression_discount: f64,
}

impl Default for FrequencyParams {
    fn default() -> Self {
        Self {
            window: 30,
            regression_discount: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissCycleParams {
    pub low_ratio: f64,
    pub high_ratio: f64,
    pub burst_min_len: usize,
    pub burst_silence_multiple: f64,
    pub burst_discount: f64,
}

impl Default for MissCycleParams {
    fn default() -> Self {
        Self {
            low_ratio: 0.3,
            high_ratio: 2.5,
            burst_min_len: 2,
            burst_silence_multiple: 3.0,
            burst_discount: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeighborParams {
    pub min_samples: usize,
    pub max_follow_rate: f64,
}

impl Default for NeighborParams {
    fn default() -> Self {
        Self {
            min_samples: 5,
            max_follow_rate: 0.15,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParityParams {
    pub window: usize,
    /// Share of one parity above which the other is considered starved.
    pub imbalance: f64,
}

impl Default for ParityParams {
    fn default() -> Self {
        Self {
            window: 10,
            imbalance: 0.55,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionParams {
    pub min_source_occurrences: u32,
}

impl Default for TransitionParams {
    fn default() -> Self {
        Self {
            min_source_occurrences: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsecutiveDecayParams {
    /// Continuation rate assumed when no run of the same length was ever observed.
    pub repeat_prior: f64,
}

impl Default for ConsecutiveDecayParams {
    fn default() -> Self {
        Self { repeat_prior: 0.14 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TailConstraintParams {
    pub window: usize,
    pub min_diversity: usize,
    pub self_repeat_count: u32,
    pub self_repeat_discount: f64,
}

impl Default for TailConstraintParams {
    fn default() -> Self {
        Self {
            window: 20,
            min_diversity: 3,
            self_repeat_count: 2,
            self_repeat_discount: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeriodicityParams {
    pub due_low: f64,
    pub due_high: f64,
    pub early_ratio: f64,
}

impl Default for PeriodicityParams {
    fn default() -> Self {
        Self {
            due_low: 0.8,
            due_high: 1.2,
            early_ratio: 0.3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsecutiveExclusionParams {
    pub base: f64,
    pub per_run: f64,
}

impl Default for ConsecutiveExclusionParams {
    fn default() -> Self {
        Self {
            base: 20.0,
            per_run: 2.0,
        }
    }
}

impl ConfigSection for StrategyConfig {
    fn section_name() -> &'static str {
        "strategies"
    }

    fn validate(&self) -> Result<(), DrawkillError> {
        check_positive("strategies.frequency.window", self.frequency.window)?;
        check_positive("strategies.tail_exclusion.window", self.tail_exclusion.window)?;
        check_positive("strategies.zone_cold.window", self.zone_cold.window)?;
        check_positive("strategies.parity.window", self.parity.window)?;
        check_positive("strategies.sum_deviation.window", self.sum_deviation.window)?;
        check_positive("strategies.tail_constraint.window", self.tail_constraint.window)?;
        check_fraction("strategies.frequency.regression_discount", self.frequency.regression_discount)?;
        check_fraction("strategies.miss_cycle.burst_discount", self.miss_cycle.burst_discount)?;
        check_fraction("strategies.neighbor.max_follow_rate", self.neighbor.max_follow_rate)?;
        check_fraction("strategies.parity.imbalance", self.parity.imbalance)?;
        check_fraction("strategies.consecutive_decay.repeat_prior", self.consecutive_decay.repeat_prior)?;
        check_fraction(
            "strategies.tail_constraint.self_repeat_discount",
            self.tail_constraint.self_repeat_discount,
        )?;
        if self.neighbor.max_follow_rate == 0.0 {
            return Err(DrawkillError::Configuration(
                "strategies.neighbor.max_follow_rate must be positive".to_string(),
            ));
        }
        if self.miss_cycle.low_ratio <= 0.0 || self.miss_cycle.low_ratio >= self.miss_cycle.high_ratio {
            return Err(DrawkillError::Configuration(
                "strategies.miss_cycle requires 0 < low_ratio < high_ratio".to_string(),
            ));
        }
        if self.periodicity.early_ratio <= 0.0
            || self.periodicity.early_ratio >= self.periodicity.due_low
            || self.periodicity.due_low > self.periodicity.due_high
        {
            return Err(DrawkillError::Configuration(
                "strategies.periodicity requires 0 < early_ratio < due_low <= due_high".to_string(),
            ));
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "Strategies".to_string(),
            fields: vec![
                FieldManifest::new(
                    "frequency.window",
                    "integer",
                    json!(self.frequency.window),
                    Some((1.0, 1000.0)),
                    "S1 recent window",
                ),
                FieldManifest::new(
                    "miss_cycle.low_ratio",
                    "float",
                    json!(self.miss_cycle.low_ratio),
                    None,
                    "S2 gap ratio below which a return is considered too early",
                ),
                FieldManifest::new(
                    "miss_cycle.high_ratio",
                    "float",
                    json!(self.miss_cycle.high_ratio),
                    None,
                    "S2 gap ratio above which a number is considered overdue",
                ),
                FieldManifest::new(
                    "neighbor.max_follow_rate",
                    "float",
                    json!(self.neighbor.max_follow_rate),
                    Some((0.0, 1.0)),
                    "S5 follow rate under which an adjacent number is killed",
                ),
                FieldManifest::new(
                    "parity.imbalance",
                    "float",
                    json!(self.parity.imbalance),
                    Some((0.5, 1.0)),
                    "S6 parity share that triggers killing the over-represented side",
                ),
                FieldManifest::new(
                    "transition.min_source_occurrences",
                    "integer",
                    json!(self.transition.min_source_occurrences),
                    Some((1.0, 1000.0)),
                    "S8 occurrences a source number needs before its transitions count",
                ),
                FieldManifest::new(
                    "consecutive_decay.repeat_prior",
                    "float",
                    json!(self.consecutive_decay.repeat_prior),
                    Some((0.0, 1.0)),
                    "S9 continuation rate used without samples",
                ),
                FieldManifest::new(
                    "periodicity.due_low",
                    "float",
                    json!(self.periodicity.due_low),
                    None,
                    "K2 lower bound of the protected near-due gap ratio",
                ),
                FieldManifest::new(
                    "consecutive_exclusion.base",
                    "float",
                    json!(self.consecutive_exclusion.base),
                    None,
                    "K3 score offset for a running streak",
                ),
            ],
        }
    }
}
