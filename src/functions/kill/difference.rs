use crate::functions::{stats, traits::KillStrategy};
use crate::types::{Prefix, ScoredRanking};
use std::collections::HashMap;

/// K4: per positional slot, the historical distribution of row-to-row deltas.
/// A number only reachable through deltas never observed in any slot is flagged.
pub struct DifferenceInversion;

impl DifferenceInversion {
    const UNREACHABLE: f64 = 100.0;
    const RARE: f64 = 50.0;
}

impl KillStrategy for DifferenceInversion {
    fn alias(&self) -> &'static str {
        "K4"
    }

    fn ui_name(&self) -> &'static str {
        "Difference Inversion"
    }

    fn min_rows(&self) -> usize {
        5
    }

    fn calculate(&self, prefix: &Prefix<'_>) -> ScoredRanking {
        let pool = prefix.pool;
        let series = stats::slot_series(prefix.draws, pool);

        let deltas: Vec<HashMap<i32, u32>> = series
            .iter()
            .map(|values| {
                let mut freq = HashMap::new();
                for pair in values.windows(2) {
                    *freq.entry((pair[1] - pair[0]) as i32).or_insert(0) += 1;
                }
                freq
            })
            .collect();
        let last: Vec<i32> = series
            .iter()
            .map(|values| values.last().copied().unwrap_or(0.0) as i32)
            .collect();

        let support: Vec<(u8, u32)> = pool
            .numbers()
            .map(|n| {
                let total = deltas
                    .iter()
                    .zip(&last)
                    .map(|(freq, &from)| freq.get(&(n as i32 - from)).copied().unwrap_or(0))
                    .sum();
                (n, total)
            })
            .collect();
        let max_support = support.iter().map(|&(_, s)| s).max().unwrap_or(0);

        let mut ranking = ScoredRanking::new(pool);
        for (n, s) in support {
            let score = if s == 0 {
                Self::UNREACHABLE
            } else {
                Self::RARE * (1.0 - s as f64 / max_support as f64)
            };
            ranking.set(n, score);
        }
        ranking
    }
}
