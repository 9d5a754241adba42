use crate::functions::{stats::CoOccurrence, traits::KillStrategy};
use crate::types::{Prefix, ScoredRanking};

/// K5: the last draw's numbers rank first at 100, every other number follows
/// by how rarely it was drawn together with them.
pub struct CoOccurrenceInversion;

impl CoOccurrenceInversion {
    const LAST_ROW: f64 = 100.0;
    const SPAN: f64 = 90.0;
}

impl KillStrategy for CoOccurrenceInversion {
    fn alias(&self) -> &'static str {
        "K5"
    }

    fn ui_name(&self) -> &'static str {
        "Co-occurrence Inversion"
    }

    fn min_rows(&self) -> usize {
        3
    }

    fn calculate(&self, prefix: &Prefix<'_>) -> ScoredRanking {
        let pool = prefix.pool;
        let mut ranking = ScoredRanking::new(pool);
        let Some(last) = prefix.last() else {
            return ranking;
        };
        let co = CoOccurrence::build(prefix.draws, pool);

        let others: Vec<(u8, u32)> = pool
            .numbers()
            .filter(|&n| !last.contains(n))
            .map(|n| (n, last.numbers().iter().map(|&a| co.count(a, n)).sum()))
            .collect();
        let max = others.iter().map(|&(_, c)| c).max().unwrap_or(0);

        for &n in last.numbers() {
            ranking.set(n, Self::LAST_ROW);
        }
        for (n, c) in others {
            let score = if max == 0 {
                Self::SPAN / 2.0
            } else {
                Self::SPAN * (max - c) as f64 / max as f64
            };
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
    fn test_last_row_first_then_rare_partners() {
        let rows = vec![
            vec![1, 2, 3, 4, 5, 6, 20],
            vec![1, 2, 3, 4, 5, 6, 20],
            vec![1, 2, 3, 4, 5, 6, 30],
            vec![1, 2, 3, 4, 5, 6, 7],
        ];
        let history = History::from_rows(Pool::default(), rows).unwrap();
        let ranking = CoOccurrenceInversion.score(&history.view()).unwrap();

        let top: Vec<u8> = ranking.top(7).iter().map(|r| r.number).collect();
        assert_eq!(top, vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(ranking.score(7), 100.0);
        // 20 co-occurred most with the last row
        assert_eq!(ranking.score(20), 0.0);
        assert!(ranking.score(40) > ranking.score(30));
        assert!(ranking.score(30) > ranking.score(20));
    }
}
