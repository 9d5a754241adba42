use crate::config::strategies::WindowParams;
use crate::functions::traits::KillStrategy;
use crate::types::{Prefix, ScoredRanking};

/// S7: a recent mean sum above the theoretical centre pushes kills toward
/// high numbers, below it toward low numbers.
pub struct SumDeviation {
    params: WindowParams,
}

impl SumDeviation {
    pub fn new(params: WindowParams) -> Self {
        Self { params }
    }
}

impl KillStrategy for SumDeviation {
    fn alias(&self) -> &'static str {
        "S7"
    }

    fn ui_name(&self) -> &'static str {
        "Sum Deviation"
    }

    fn min_rows(&self) -> usize {
        5
    }

    fn calculate(&self, prefix: &Prefix<'_>) -> ScoredRanking {
        let pool = prefix.pool;
        let window = prefix.window(self.params.window);
        let mut ranking = ScoredRanking::new(pool);

        let mean = window.iter().map(|d| d.sum() as f64).sum::<f64>() / window.len() as f64;
        let center = pool.center_sum();
        let deviation = (mean - center) / center;
        if deviation == 0.0 {
            return ranking;
        }
        let strength = deviation.abs().min(1.0);
        let span = (pool.size as f64 - 1.0).max(1.0);

        for n in pool.numbers() {
            let position = if deviation > 0.0 {
                (n as f64 - 1.0) / span
            } else {
                (pool.size as f64 - n as f64) / span
            };
            ranking.set(n, strength * position);
        }
        ranking
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{History, Pool};

    #[test]
    fn test_high_sums_kill_high_numbers() {
        let rows = vec![vec![43, 44, 45, 46, 47, 48, 49]; 15];
        let history = History::from_rows(Pool::default(), rows).unwrap();
        let ranking = SumDeviation::new(WindowParams { window: 15 })
            .score(&history.view())
            .unwrap();

        assert_eq!(ranking.score(1), 0.0);
        assert!(ranking.score(49) > ranking.score(25));
        // (322 - 175) / 175 = 0.84
        assert!((ranking.score(49) - 0.84).abs() < 1e-12);
    }

    #[test]
    fn test_low_sums_kill_low_numbers() {
        let rows = vec![vec![1, 2, 3, 4, 5, 6, 7]; 15];
        let history = History::from_rows(Pool::default(), rows).unwrap();
        let ranking = SumDeviation::new(WindowParams { window: 15 })
            .score(&history.view())
            .unwrap();

        assert_eq!(ranking.score(49), 0.0);
        assert!(ranking.score(1) > ranking.score(30));
    }
}
