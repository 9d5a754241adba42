use crate::types::{KillCandidate, NumberMap, Pool, RankedNumber, Vote};

/// Unweighted rank vote for histories too short to calibrate.
///
/// Every source's top `depth` entries vote once; rank `r` adds `(depth - r) / depth`
/// to the tie-break weight. Candidates sort by vote count, then weight.
pub struct SimpleCombiner {
    depth: usize,
    size: usize,
}

impl SimpleCombiner {
    pub fn new(depth: usize, size: usize) -> Self {
        Self { depth, size }
    }

    pub fn combine(&self, pool: &Pool, sources: &[(&str, &[RankedNumber])]) -> Vec<KillCandidate> {
        let mut votes = NumberMap::new(pool, Vote::default());
        for &(source, ranked) in sources {
            for (rank, candidate) in ranked.iter().take(self.depth).enumerate() {
                if let Some(vote) = votes.get_mut(candidate.number) {
                    vote.add((self.depth - rank) as f64 / self.depth as f64, source);
                }
            }
        }

        let mut candidates: Vec<KillCandidate> = votes
            .iter()
            .filter(|(_, v)| !v.contributors.is_empty())
            .map(|(number, v)| KillCandidate {
                number,
                votes: v.contributors.len(),
                weight: v.score,
                contributors: v.contributors.clone(),
                protection: None,
            })
            .collect();
        candidates.sort_by(|a, b| {
            b.votes
                .cmp(&a.votes)
                .then(
                    b.weight
                        .partial_cmp(&a.weight)
                        .unwrap_or(std::cmp::Ordering::Equal),
                )
                .then(a.number.cmp(&b.number))
        });
        candidates.truncate(self.size);
        candidates
    }
}
