use super::{DifferenceContinuation, LinearFit, LogisticPredictor, MeanDifference};
use crate::config::ForwardConfig;
use crate::functions::{stats, traits::{ForwardPredictor, KillStrategy}};
use crate::types::{Prefix, RankedNumber, ScoredRanking};
use std::collections::BTreeSet;

/// N: drop every number a forward signal points at (B, C, I, M, hot and cold
/// sets), then rank what is left by long-run rarity, miss streak and short-run rarity.
pub struct ReversePredictor {
    config: ForwardConfig,
    forward: Vec<Box<dyn ForwardPredictor>>,
}

impl ReversePredictor {
    pub fn new(config: ForwardConfig) -> Self {
        let forward: Vec<Box<dyn ForwardPredictor>> = vec![
            Box::new(LinearFit),
            Box::new(DifferenceContinuation),
            Box::new(MeanDifference),
            Box::new(LogisticPredictor::new(
                config.logistic.clone(),
                config.output_size,
            )),
        ];
        Self { config, forward }
    }

    /// Most and least frequent numbers of the recent window.
    fn hot_and_cold(&self, prefix: &Prefix<'_>) -> BTreeSet<u8> {
        let window = prefix.window(self.config.reverse.hot_cold_window);
        let counts = stats::counts(window, prefix.pool);
        let mut by_count: Vec<(u8, u32)> = counts.iter().map(|(n, &c)| (n, c)).collect();
        let take = self.config.output_size;

        by_count.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        let mut set: BTreeSet<u8> = by_count.iter().take(take).map(|&(n, _)| n).collect();
        by_count.sort_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)));
        set.extend(by_count.iter().take(take).map(|&(n, _)| n));
        set
    }

    pub fn exclusions(&self, prefix: &Prefix<'_>) -> BTreeSet<u8> {
        let mut excluded = self.hot_and_cold(prefix);
        for predictor in &self.forward {
            // A predictor without enough history contributes nothing
            if let Some(numbers) = predictor.predict(prefix) {
                excluded.extend(numbers);
            }
        }
        excluded
    }

    /// Blended scores of the best non-excluded numbers, highest first.
    pub fn scored(&self, prefix: &Prefix<'_>) -> Option<Vec<RankedNumber>> {
        if prefix.len() < ForwardPredictor::min_rows(self) {
            return None;
        }
        let pool = prefix.pool;
        let params = &self.config.reverse;
        let excluded = self.exclusions(prefix);
        let rows = prefix.len() as f64;
        let short_window = prefix.window(params.short_window);
        let long = stats::counts(prefix.draws, pool);
        let short = stats::counts(short_window, pool);

        let mut ranked: Vec<RankedNumber> = pool
            .numbers()
            .filter(|n| !excluded.contains(n))
            .map(|n| {
                let inverse_long = 1.0 - long[n] as f64 / rows;
                let recency = stats::miss_streak(prefix.draws, n).unwrap_or(prefix.len()) as f64 / rows;
                let inverse_short = 1.0 - short[n] as f64 / short_window.len() as f64;
                RankedNumber {
                    number: n,
                    score: params.long_weight * inverse_long
                        + params.recency_weight * recency
                        + params.short_weight * inverse_short,
                }
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.number.cmp(&b.number))
        });
        ranked.truncate(self.config.output_size);
        Some(ranked)
    }
}

impl ForwardPredictor for ReversePredictor {
    fn alias(&self) -> &'static str {
        "N"
    }

    fn ui_name(&self) -> &'static str {
        "Reverse Predictor"
    }

    fn min_rows(&self) -> usize {
        2
    }

    fn calculate(&self, prefix: &Prefix<'_>) -> Vec<u8> {
        self.scored(prefix)
            .unwrap_or_default()
            .into_iter()
            .map(|r| r.number)
            .collect()
    }
}

/// The reverse predictor's picks as a kill vote source.
pub struct ReverseKill {
    predictor: ReversePredictor,
}

impl ReverseKill {
    pub fn new(config: ForwardConfig) -> Self {
        Self {
            predictor: ReversePredictor::new(config),
        }
    }
}

impl KillStrategy for ReverseKill {
    fn alias(&self) -> &'static str {
        "N"
    }

    fn ui_name(&self) -> &'static str {
        "Reverse Predictor"
    }

    fn min_rows(&self) -> usize {
        2
    }

    fn calculate(&self, prefix: &Prefix<'_>) -> ScoredRanking {
        let mut ranking = ScoredRanking::new(prefix.pool);
        for pick in self.predictor.scored(prefix).unwrap_or_default() {
            ranking.set(pick.number, pick.score);
        }
        ranking
    }
}
