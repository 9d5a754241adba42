use crate::config::strategies::PeriodicityParams;
use crate::functions::{stats, traits::KillStrategy};
use crate::types::{Prefix, ScoredRanking};

/// K2: compares each number's miss streak with its empirical cycle.
/// Near-due numbers are protected, very early returns are the strongest kills.
pub struct PeriodicityExclusion {
    params: PeriodicityParams,
}

impl PeriodicityExclusion {
    pub fn new(params: PeriodicityParams) -> Self {
        Self { params }
    }

    pub fn score_ratio(&self, ratio: f64) -> f64 {
        let p = &self.params;
        if ratio >= p.due_low && ratio <= p.due_high {
            0.0
        } else if ratio < p.early_ratio {
            60.0 + 40.0 * (1.0 - ratio / p.early_ratio)
        } else if ratio < p.due_low {
            20.0 + 20.0 * (p.due_low - ratio) / (p.due_low - p.early_ratio)
        } else {
            10.0 + ((ratio - p.due_high) * 10.0).min(30.0)
        }
    }
}

impl KillStrategy for PeriodicityExclusion {
    fn alias(&self) -> &'static str {
        "K2"
    }

    fn ui_name(&self) -> &'static str {
        "Periodicity Exclusion"
    }

    fn min_rows(&self) -> usize {
        5
    }

    fn calculate(&self, prefix: &Prefix<'_>) -> ScoredRanking {
        let pool = prefix.pool;
        let prior_cycle = pool.size as f64 / pool.draw_size as f64;
        let mut ranking = ScoredRanking::new(pool);

        for n in pool.numbers() {
            let indices = stats::appearances(prefix.draws, n);
            let cycle = stats::mean_gap(&indices).unwrap_or(prior_cycle);
            let gap = stats::miss_streak(prefix.draws, n).unwrap_or(prefix.len());
            ranking.set(n, self.score_ratio(gap as f64 / cycle));
        }
        ranking
    }
}
