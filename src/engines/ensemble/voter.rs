use crate::config::EnsembleConfig;
use crate::engines::protection::ProtectionEvaluator;
use crate::types::{KillCandidate, NumberMap, Pool, ProtectionRecord, RankedNumber, Vote};

/// One strategy's contribution: its ranked candidates and backtest weight.
pub struct Ballot<'a> {
    pub source: &'a str,
    pub candidates: &'a [RankedNumber],
    pub weight: f64,
}

/// Weighted vote accumulation with a protection discount.
pub struct EnsembleVoter {
    config: EnsembleConfig,
}

impl EnsembleVoter {
    pub fn new(config: EnsembleConfig) -> Self {
        Self { config }
    }

    /// Rank `r` of a ballot adds `(depth - r) / depth * weight * score`.
    pub fn accumulate(&self, pool: &Pool, ballots: &[Ballot<'_>]) -> NumberMap<Vote> {
        let depth = self.config.vote_depth;
        let mut votes = NumberMap::new(pool, Vote::default());
        for ballot in ballots {
            if ballot.weight <= 0.0 {
                continue;
            }
            for (rank, candidate) in ballot.candidates.iter().take(depth).enumerate() {
                let positional = (depth - rank) as f64 / depth as f64;
                // Out-of-pool numbers from a corrupt ranking are dropped
                if let Some(vote) = votes.get_mut(candidate.number) {
                    vote.add(positional * ballot.weight * candidate.score, ballot.source);
                }
            }
        }
        votes
    }

    /// Multiplies protected votes by their discount factor and returns the
    /// annotation for every number whose protection is strong enough to mention.
    pub fn apply_protection(
        &self,
        votes: &mut NumberMap<Vote>,
        records: &NumberMap<ProtectionRecord>,
        evaluator: &ProtectionEvaluator,
    ) -> NumberMap<Option<String>> {
        let mut notes: NumberMap<Option<String>> = votes.map(|_| None);
        for (number, record) in records.iter() {
            if record.score <= 0.0 {
                continue;
            }
            let factor = evaluator.discount_factor(record.score);
            if let Some(vote) = votes.get_mut(number) {
                vote.score *= factor;
            }
            if record.score > self.config.protection_note_threshold {
                if let Some(note) = notes.get_mut(number) {
                    *note = Some(format!(
                        "protected x{:.2}: {}",
                        factor,
                        record.reasons.join(", ")
                    ));
                }
            }
        }
        notes
    }

    /// Numbers with a positive vote, strongest first.
    pub fn rank(&self, votes: &NumberMap<Vote>, notes: &NumberMap<Option<String>>) -> Vec<KillCandidate> {
        let mut candidates: Vec<KillCandidate> = votes
            .iter()
            .filter(|(_, v)| v.score > 0.0)
            .map(|(number, v)| KillCandidate {
                number,
                votes: v.contributors.len(),
                weight: v.score,
                contributors: v.contributors.clone(),
                protection: notes.get(number).cloned().flatten(),
            })
            .collect();
        candidates.sort_by(|a, b| {
            b.weight
                .partial_cmp(&a.weight)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.number.cmp(&b.number))
        });
        candidates
    }
}
