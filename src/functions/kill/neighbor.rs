use crate::config::strategies::NeighborParams;
use crate::functions::traits::KillStrategy;
use crate::types::{Prefix, ScoredRanking};
use std::collections::BTreeSet;

/// S5: numbers adjacent (±1) to the last draw that historically rarely follow
/// an appearance of one of their neighbours.
pub struct NeighborExclusion {
    params: NeighborParams,
}

impl NeighborExclusion {
    pub fn new(params: NeighborParams) -> Self {
        Self { params }
    }

    /// `(hits, samples)`: rows after a neighbour of `number` appeared, and how
    /// many of those contained `number`.
    fn follow_counts(prefix: &Prefix<'_>, number: u8) -> (usize, usize) {
        let below = number.checked_sub(1).filter(|&n| prefix.pool.contains(n));
        let above = number.checked_add(1).filter(|&n| prefix.pool.contains(n));
        let mut hits = 0;
        let mut samples = 0;
        for pair in prefix.draws.windows(2) {
            let neighbour_drawn = below.map_or(false, |n| pair[0].contains(n))
                || above.map_or(false, |n| pair[0].contains(n));
            if neighbour_drawn {
                samples += 1;
                if pair[1].contains(number) {
                    hits += 1;
                }
            }
        }
        (hits, samples)
    }
}

impl KillStrategy for NeighborExclusion {
    fn alias(&self) -> &'static str {
        "S5"
    }

    fn ui_name(&self) -> &'static str {
        "Neighbor Exclusion"
    }

    fn min_rows(&self) -> usize {
        10
    }

    fn calculate(&self, prefix: &Prefix<'_>) -> ScoredRanking {
        let pool = prefix.pool;
        let mut ranking = ScoredRanking::new(pool);
        let Some(last) = prefix.last() else {
            return ranking;
        };

        let candidates: BTreeSet<u8> = last
            .numbers()
            .iter()
            .flat_map(|&n| [n.checked_sub(1), n.checked_add(1)])
            .flatten()
            .filter(|&n| pool.contains(n))
            .collect();

        for candidate in candidates {
            let (hits, samples) = Self::follow_counts(prefix, candidate);
            if samples < self.params.min_samples {
                continue;
            }
            let rate = hits as f64 / samples as f64;
            if rate < self.params.max_follow_rate {
                ranking.set(candidate, 1.0 - rate / self.params.max_follow_rate);
            }
        }
        ranking
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{History, Pool};

    #[test]
    fn test_only_neighbours_of_last_row_are_scored() {
        let mut rows = Vec::new();
        for _ in 0..6 {
            rows.push(vec![10, 20, 30, 40, 1, 2, 3]);
            rows.push(vec![5, 6, 7, 8, 44, 45, 46]);
        }
        rows.push(vec![10, 20, 30, 40, 1, 2, 3]);
        let history = History::from_rows(Pool::default(), rows).unwrap();
        let ranking = NeighborExclusion::new(NeighborParams::default())
            .score(&history.view())
            .unwrap();

        // Neighbours of 11, 9, 4 and 1 appear often but they never follow.
        assert_eq!(ranking.score(11), 1.0);
        assert_eq!(ranking.score(9), 1.0);
        assert_eq!(ranking.score(4), 1.0);
        assert_eq!(ranking.score(1), 1.0);
        // Not adjacent to the last row.
        assert_eq!(ranking.score(25), 0.0);
    }
}
