use crate::config::strategies::{TailConstraintParams, WindowParams};
use crate::functions::{stats, traits::KillStrategy};
use crate::types::{Draw, Pool, Prefix, ScoredRanking, TAILS};
use std::collections::HashSet;

struct TailActivity {
    appearances: [u32; TAILS],
    distinct: [usize; TAILS],
}

fn tail_activity(window: &[Draw], pool: &Pool) -> TailActivity {
    let mut appearances = [0u32; TAILS];
    let mut seen: [HashSet<u8>; TAILS] = Default::default();
    for draw in window {
        for &n in draw.numbers() {
            let tail = pool.tail_of(n);
            appearances[tail] += 1;
            seen[tail].insert(n);
        }
    }
    let mut distinct = [0usize; TAILS];
    for (tail, set) in seen.iter().enumerate() {
        distinct[tail] = set.len();
    }
    TailActivity {
        appearances,
        distinct,
    }
}

fn populated_tails(pool: &Pool) -> Vec<usize> {
    (0..TAILS).filter(|&t| pool.tail_size(t) > 0).collect()
}

/// S3: kill every number whose tail digit runs colder than the cross-tail average.
pub struct TailExclusion {
    params: WindowParams,
}

impl TailExclusion {
    pub fn new(params: WindowParams) -> Self {
        Self { params }
    }
}

impl KillStrategy for TailExclusion {
    fn alias(&self) -> &'static str {
        "S3"
    }

    fn ui_name(&self) -> &'static str {
        "Tail Exclusion"
    }

    fn min_rows(&self) -> usize {
        5
    }

    fn calculate(&self, prefix: &Prefix<'_>) -> ScoredRanking {
        let pool = prefix.pool;
        let window = prefix.window(self.params.window);
        let activity = tail_activity(window, pool);
        let tails = populated_tails(pool);

        let mut rates = [0.0f64; TAILS];
        for &t in &tails {
            rates[t] = activity.appearances[t] as f64;
        }
        let average = tails.iter().map(|&t| rates[t]).sum::<f64>() / tails.len() as f64;

        let mut ranking = ScoredRanking::new(pool);
        if average <= 0.0 {
            return ranking;
        }
        for n in pool.numbers() {
            let rate = rates[pool.tail_of(n)];
            if rate < average {
                ranking.set(n, (average - rate) / average);
            }
        }
        ranking
    }
}

/// S10: protect tails that are both busy and spread over several numbers,
/// kill numbers on quiet tails.
pub struct TailConstraint {
    params: TailConstraintParams,
}

impl TailConstraint {
    pub fn new(params: TailConstraintParams) -> Self {
        Self { params }
    }
}

impl KillStrategy for TailConstraint {
    fn alias(&self) -> &'static str {
        "S10"
    }

    fn ui_name(&self) -> &'static str {
        "Tail Constraint"
    }

    fn min_rows(&self) -> usize {
        10
    }

    fn calculate(&self, prefix: &Prefix<'_>) -> ScoredRanking {
        let pool = prefix.pool;
        let window = prefix.window(self.params.window);
        let activity = tail_activity(window, pool);
        let own = stats::counts(window, pool);
        let tails = populated_tails(pool);
        let average = tails
            .iter()
            .map(|&t| activity.appearances[t] as f64)
            .sum::<f64>()
            / tails.len() as f64;

        let mut ranking = ScoredRanking::new(pool);
        for n in pool.numbers() {
            let tail = pool.tail_of(n);
            let busy = activity.appearances[tail] as f64;
            let mut score = if busy < average {
                1.0 - busy / average
            } else if activity.distinct[tail] >= self.params.min_diversity {
                0.0
            } else if own[n] == 0 {
                // Active tail carried by one or two numbers: the others are mild kills
                0.3
            } else {
                0.0
            };
            if own[n] >= self.params.self_repeat_count {
                score *= self.params.self_repeat_discount;
            }
            ranking.set(n, score);
        }
        ranking
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::History;

    fn rows_without_tail_nine(count: usize) -> Vec<Vec<u8>> {
        let palette: [[u8; 7]; 3] = [
            [1, 12, 23, 34, 45, 6, 17],
            [2, 13, 24, 35, 46, 7, 18],
            [10, 21, 32, 43, 4, 15, 26],
        ];
        (0..count).map(|i| palette[i % 3].to_vec()).collect()
    }

    #[test]
    fn test_cold_tail_is_killed() {
        let history = History::from_rows(Pool::default(), rows_without_tail_nine(15)).unwrap();
        let ranking = TailExclusion::new(WindowParams { window: 15 })
            .score(&history.view())
            .unwrap();

        for n in [9, 19, 29, 39, 49] {
            assert_eq!(ranking.score(n), 1.0);
        }
        assert!(ranking.score(1) < ranking.score(9));
    }

    #[test]
    fn test_tails_compared_by_raw_frequency() {
        // tails 0 and 8 both appear 5 times; tail 0 just has one number fewer
        let history = History::from_rows(Pool::default(), rows_without_tail_nine(15)).unwrap();
        let ranking = TailExclusion::new(WindowParams { window: 15 })
            .score(&history.view())
            .unwrap();

        assert_eq!(ranking.score(10), ranking.score(8));
        assert!((ranking.score(8) - 5.5 / 10.5).abs() < 1e-12);
    }

    #[test]
    fn test_quiet_tail_killed_and_repeaters_discounted() {
        let history = History::from_rows(Pool::default(), rows_without_tail_nine(20)).unwrap();
        let ranking = TailConstraint::new(TailConstraintParams::default())
            .score(&history.view())
            .unwrap();

        assert_eq!(ranking.score(9), 1.0);
        // 1 appeared 7 times in the window: whatever it scores is halved.
        let s1 = ranking.score(1);
        assert!(s1 <= 0.5);
    }
}
