use crate::config::strategies::ParityParams;
use crate::functions::traits::KillStrategy;
use crate::types::{Prefix, ScoredRanking};

/// S6: when one parity dominates the recent window, kill that parity.
pub struct OddEvenBalance {
    params: ParityParams,
}

impl OddEvenBalance {
    pub fn new(params: ParityParams) -> Self {
        Self { params }
    }
}

impl KillStrategy for OddEvenBalance {
    fn alias(&self) -> &'static str {
        "S6"
    }

    fn ui_name(&self) -> &'static str {
        "Odd/Even Balance"
    }

    fn min_rows(&self) -> usize {
        5
    }

    fn calculate(&self, prefix: &Prefix<'_>) -> ScoredRanking {
        let pool = prefix.pool;
        let window = prefix.window(self.params.window);
        let (odd, total) = window
            .iter()
            .flat_map(|d| d.numbers().iter())
            .fold((0usize, 0usize), |(odd, total), &n| (odd + (n % 2) as usize, total + 1));

        let mut ranking = ScoredRanking::new(pool);
        if total == 0 {
            return ranking;
        }
        let odd_share = odd as f64 / total as f64;
        let imbalance = self.params.imbalance;

        let (kill_odd, strength) = if odd_share > imbalance {
            (true, (odd_share - 0.5) * 2.0)
        } else if odd_share < 1.0 - imbalance {
            (false, (0.5 - odd_share) * 2.0)
        } else {
            return ranking;
        };

        for n in pool.numbers().filter(|n| (n % 2 == 1) == kill_odd) {
            ranking.set(n, strength);
        }
        ranking
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{History, Pool};

    #[test]
    fn test_odd_heavy_window_kills_odds() {
        let rows = vec![vec![1, 3, 5, 7, 9, 11, 2]; 10];
        let history = History::from_rows(Pool::default(), rows).unwrap();
        let ranking = OddEvenBalance::new(ParityParams::default())
            .score(&history.view())
            .unwrap();

        let expected = (6.0 / 7.0 - 0.5) * 2.0;
        assert!((ranking.score(13) - expected).abs() < 1e-12);
        assert_eq!(ranking.score(14), 0.0);
    }

    #[test]
    fn test_balanced_window_abstains_from_scoring() {
        let rows: Vec<Vec<u8>> = (0..10)
            .map(|i| if i % 2 == 0 { vec![1, 2, 3, 4, 5, 6, 7] } else { vec![2, 3, 4, 5, 6, 7, 8] })
            .collect();
        let history = History::from_rows(Pool::default(), rows).unwrap();
        let ranking = OddEvenBalance::new(ParityParams::default())
            .score(&history.view())
            .unwrap();
        assert!(ranking.top(49).is_empty());
    }
}
