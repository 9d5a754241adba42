use crate::config::strategies::MissCycleParams;
use crate::functions::{stats, traits::KillStrategy};
use crate::types::{Prefix, ScoredRanking};

/// S2: U-curve over the ratio of the current miss streak to the average gap.
///
/// Numbers in the middle of their usual cycle are the safest kills. A number that
/// just appeared, or one long overdue, scores low.
pub struct MissCycle {
    params: MissCycleParams,
}

impl MissCycle {
    pub fn new(params: MissCycleParams) -> Self {
        Self { params }
    }

    /// Peaks at 1.0 for a ratio of 1, falls to 0.6 at either band edge.
    pub fn u_curve(&self, ratio: f64) -> f64 {
        let (low, high) = (self.params.low_ratio, self.params.high_ratio);
        if ratio < low {
            0.6 * ratio / low
        } else if ratio <= high {
            let span = if ratio < 1.0 { 1.0 - low } else { high - 1.0 };
            if span <= 0.0 {
                return 1.0;
            }
            1.0 - 0.4 * (ratio - 1.0).abs() / span
        } else {
            0.6 * (high / ratio).powi(2)
        }
    }
}

impl KillStrategy for MissCycle {
    fn alias(&self) -> &'static str {
        "S2"
    }

    fn ui_name(&self) -> &'static str {
        "Miss Cycle"
    }

    fn min_rows(&self) -> usize {
        10
    }

    fn calculate(&self, prefix: &Prefix<'_>) -> ScoredRanking {
        let pool = prefix.pool;
        let prior_gap = pool.size as f64 / pool.draw_size as f64;

        let mut ranking = ScoredRanking::new(pool);
        for n in pool.numbers() {
            let indices = stats::appearances(prefix.draws, n);
            let average = stats::mean_gap(&indices).unwrap_or(prior_gap);
            let gap = stats::miss_streak(prefix.draws, n).unwrap_or(prefix.len());
            let mut score = self.u_curve(gap as f64 / average);

            if let Some(run) = stats::latest_run(prefix.draws, n) {
                if run.len >= self.params.burst_min_len
                    && run.silence > 0
                    && run.silence as f64 > self.params.burst_silence_multiple * run.len as f64
                {
                    score *= self.params.burst_discount;
                }
            }
            ranking.set(n, score);
        }
        ranking
    }
}
