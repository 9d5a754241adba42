use crate::config::strategies::FrequencyParams;
use crate::functions::{stats, traits::KillStrategy};
use crate::types::{Prefix, ScoredRanking};

/// S1: numbers rarely drawn recently are killed; a number whose long-run
/// frequency is higher than its recent one may regress upward, so it is discounted.
pub struct FrequencyInverse {
    params: FrequencyParams,
}

impl FrequencyInverse {
    pub fn new(params: FrequencyParams) -> Self {
        Self { params }
    }
}

impl KillStrategy for FrequencyInverse {
    fn alias(&self) -> &'static str {
        "S1"
    }

    fn ui_name(&self) -> &'static str {
        "Frequency Inverse"
    }

    fn min_rows(&self) -> usize {
        10
    }

    fn calculate(&self, prefix: &Prefix<'_>) -> ScoredRanking {
        let pool = prefix.pool;
        let window = prefix.window(self.params.window);
        let recent = stats::counts(window, pool);
        let global = stats::counts(prefix.draws, pool);

        let mut ranking = ScoredRanking::new(pool);
        for n in pool.numbers() {
            let recent_rate = recent[n] as f64 / window.len() as f64;
            let global_rate = global[n] as f64 / prefix.len() as f64;
            let mut score = 1.0 - recent_rate;
            if global_rate > recent_rate {
                score *= self.params.regression_discount;
            }
            ranking.set(n, score);
        }
        ranking
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{History, Pool};

    #[test]
    fn test_repeated_rows_kill_absent_numbers() {
        let rows = vec![vec![1, 2, 3, 4, 5, 6, 7]; 20];
        let history = History::from_rows(Pool::default(), rows).unwrap();
        let ranking = FrequencyInverse::new(FrequencyParams::default())
            .score(&history.view())
            .unwrap();

        for absent in 8..=49 {
            for present in 1..=7 {
                assert!(ranking.score(absent) > ranking.score(present));
            }
        }
    }

    #[test]
    fn test_regression_discount() {
        // 40 drawn early, then silent for the recent window
        let mut rows = vec![vec![40, 41, 42, 43, 44, 45, 46]; 10];
        rows.extend(vec![vec![1, 2, 3, 4, 5, 6, 7]; 30]);
        let history = History::from_rows(Pool::default(), rows).unwrap();
        let ranking = FrequencyInverse::new(FrequencyParams::default())
            .score(&history.view())
            .unwrap();

        assert_eq!(ranking.score(20), 1.0);
        assert_eq!(ranking.score(40), 0.5);
    }

    #[test]
    fn test_abstains_on_short_history() {
        let history = History::from_rows(Pool::default(), vec![vec![1, 2, 3, 4, 5, 6, 7]; 9]).unwrap();
        assert!(FrequencyInverse::new(FrequencyParams::default())
            .score(&history.view())
            .is_none());
    }
}
