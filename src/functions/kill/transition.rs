use crate::config::strategies::TransitionParams;
use crate::functions::{stats::TransitionMatrix, traits::KillStrategy};
use crate::types::{Prefix, ScoredRanking};

/// S8: low average transition probability from the last draw's numbers.
pub struct TransitionProbability {
    params: TransitionParams,
}

impl TransitionProbability {
    pub fn new(params: TransitionParams) -> Self {
        Self { params }
    }
}

impl KillStrategy for TransitionProbability {
    fn alias(&self) -> &'static str {
        "S8"
    }

    fn ui_name(&self) -> &'static str {
        "Transition Probability"
    }

    fn min_rows(&self) -> usize {
        10
    }

    fn calculate(&self, prefix: &Prefix<'_>) -> ScoredRanking {
        let pool = prefix.pool;
        let matrix = TransitionMatrix::build(prefix.draws, pool);
        let mut ranking = ScoredRanking::new(pool);
        let Some(last) = prefix.last() else {
            return ranking;
        };

        let sources: Vec<(u8, f64)> = last
            .numbers()
            .iter()
            .map(|&a| (a, matrix.source_occurrences(a)))
            .filter(|&(_, occurrences)| occurrences >= self.params.min_source_occurrences)
            .map(|(a, occurrences)| (a, occurrences as f64))
            .collect();
        let prior = pool.draw_size as f64 / pool.size as f64;

        for n in pool.numbers() {
            let probability = if sources.is_empty() {
                prior
            } else {
                sources
                    .iter()
                    .map(|&(a, occurrences)| matrix.count(a, n) as f64 / occurrences)
                    .sum::<f64>()
                    / sources.len() as f64
            };
            ranking.set(n, 1.0 - probability);
        }
        ranking
    }
}

/// K1: total transition count into each number from the last draw; the
/// smallest incoming mass ranks first.
pub struct MarkovReverse;

impl KillStrategy for MarkovReverse {
    fn alias(&self) -> &'static str {
        "K1"
    }

    fn ui_name(&self) -> &'static str {
        "Markov Reverse"
    }

    fn min_rows(&self) -> usize {
        3
    }

    fn calculate(&self, prefix: &Prefix<'_>) -> ScoredRanking {
        let pool = prefix.pool;
        let matrix = TransitionMatrix::build(prefix.draws, pool);
        let mut ranking = ScoredRanking::new(pool);
        let Some(last) = prefix.last() else {
            return ranking;
        };

        for n in pool.numbers() {
            let incoming: u32 = last.numbers().iter().map(|&a| matrix.count(a, n)).sum();
            ranking.set(n, 1.0 / (1.0 + incoming as f64));
        }
        ranking
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{History, Pool};

    fn alternating(rows: usize) -> History {
        let a = vec![1, 2, 3, 4, 5, 6, 7];
        let b = vec![11, 12, 13, 14, 15, 16, 17];
        let rows = (0..rows)
            .map(|i| if i % 2 == 0 { a.clone() } else { b.clone() })
            .collect();
        History::from_rows(Pool::default(), rows).unwrap()
    }

    #[test]
    fn test_transition_probability() {
        // 11 rows end on A
        let history = alternating(11);
        let ranking = TransitionProbability::new(TransitionParams::default())
            .score(&history.view())
            .unwrap();

        // A is always followed by B
        assert_eq!(ranking.score(11), 0.0);
        assert_eq!(ranking.score(1), 1.0);
        assert_eq!(ranking.score(30), 1.0);
    }

    #[test]
    fn test_falls_back_to_prior_without_samples() {
        let mut rows = vec![vec![1, 2, 3, 4, 5, 6, 7]; 9];
        rows.push(vec![41, 42, 43, 44, 45, 46, 47]);
        let history = History::from_rows(Pool::default(), rows).unwrap();
        let ranking = TransitionProbability::new(TransitionParams::default())
            .score(&history.view())
            .unwrap();

        let expected = 1.0 - 7.0 / 49.0;
        assert!((ranking.score(20) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_markov_reverse_orders_by_incoming_mass() {
        let history = alternating(11);
        let ranking = MarkovReverse.score(&history.view()).unwrap();

        // 5 transitions A -> B from each of the 7 last-row numbers
        assert!((ranking.score(11) - 1.0 / 36.0).abs() < 1e-12);
        assert_eq!(ranking.score(30), 1.0);
        assert_eq!(ranking.ranked().last().map(|r| r.number), Some(17));
    }
}
