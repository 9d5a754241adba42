use super::traits::{check_positive, ConfigManifest, ConfigSection, FieldManifest};
use crate::error::DrawkillError;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnsembleConfig {
    /// Upper bound on walk-forward test points.
    pub backtest_max_window: usize,
    /// Rows reserved before the first test point; window is `min(max, N - reserve)`.
    pub backtest_reserve: usize,
    /// Candidates per strategy checked at each test point.
    pub backtest_top_n: usize,
    /// Protection score above which a number counts as protected in the backtest.
    pub protection_backtest_threshold: f64,

    /// Ranked candidates per strategy that receive a positional vote.
    pub vote_depth: usize,
    /// Protection score above which the candidate carries an annotation.
    pub protection_note_threshold: f64,

    pub selection_size: usize,
    pub zone_cap: usize,
    pub tail_cap: usize,

    /// Rows needed by the simple combiner.
    pub simple_min_history: usize,
    pub simple_depth: usize,

    /// Run strategies on the rayon pool.
    pub parallel: bool,
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        Self {
            backtest_max_window: 20,
            backtest_reserve: 15,
            backtest_top_n: 10,
            protection_backtest_threshold: 0.5,
            vote_depth: 15,
            protection_note_threshold: 0.3,
            selection_size: 10,
            zone_cap: 3,
            tail_cap: 2,
            simple_min_history: 5,
            simple_depth: 10,
            parallel: true,
        }
    }
}

impl EnsembleConfig {
    /// Walk-forward window for a history of `len` rows.
    pub fn backtest_window(&self, len: usize) -> usize {
        self.backtest_max_window
            .min(len.saturating_sub(self.backtest_reserve))
    }
}

impl ConfigSection for EnsembleConfig {
    fn section_name() -> &'static str {
        "ensemble"
    }

    fn validate(&self) -> Result<(), DrawkillError> {
        check_positive("ensemble.backtest_top_n", self.backtest_top_n)?;
        check_positive("ensemble.vote_depth", self.vote_depth)?;
        check_positive("ensemble.selection_size", self.selection_size)?;
        check_positive("ensemble.zone_cap", self.zone_cap)?;
        check_positive("ensemble.tail_cap", self.tail_cap)?;
        check_positive("ensemble.simple_depth", self.simple_depth)?;
        if self.simple_min_history < 2 {
            return Err(DrawkillError::Configuration(
                "ensemble.simple_min_history must be at least 2".to_string(),
            ));
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "Ensemble".to_string(),
            fields: vec![
                FieldManifest::new(
                    "backtest_max_window",
                    "integer",
                    json!(self.backtest_max_window),
                    Some((0.0, 1000.0)),
                    "Maximum walk-forward test points per strategy",
                ),
                FieldManifest::new(
                    "backtest_reserve",
                    "integer",
                    json!(self.backtest_reserve),
                    None,
                    "Rows kept out of the walk-forward window",
                ),
                FieldManifest::new(
                    "vote_depth",
                    "integer",
                    json!(self.vote_depth),
                    Some((1.0, 255.0)),
                    "Ranked candidates per strategy that vote",
                ),
                FieldManifest::new(
                    "selection_size",
                    "integer",
                    json!(self.selection_size),
                    Some((1.0, 255.0)),
                    "Numbers in the final kill list",
                ),
                FieldManifest::new(
                    "zone_cap",
                    "integer",
                    json!(self.zone_cap),
                    None,
                    "Maximum selections per zone",
                ),
                FieldManifest::new(
                    "tail_cap",
                    "integer",
                    json!(self.tail_cap),
                    None,
                    "Maximum selections per tail digit",
                ),
                FieldManifest::new(
                    "parallel",
                    "bool",
                    json!(self.parallel),
                    None,
                    "Evaluate strategies on the rayon thread pool",
                ),
            ],
        }
    }
}
