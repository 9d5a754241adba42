use crate::config::strategies::{ConsecutiveDecayParams, ConsecutiveExclusionParams};
use crate::functions::{stats, traits::KillStrategy};
use crate::types::{Prefix, ScoredRanking};
use std::collections::HashMap;

/// S9: a number on a streak is killed by how rarely streaks of the same length
/// continued in the past. Score is `1 - continuation_rate`.
pub struct ConsecutiveDecay {
    params: ConsecutiveDecayParams,
}

impl ConsecutiveDecay {
    pub fn new(params: ConsecutiveDecayParams) -> Self {
        Self { params }
    }
}

/// `(continued, samples)` for a number's runs of exactly `len`, ignoring the latest row.
fn continuation(runs: &[usize], len: usize) -> (usize, usize) {
    let mut continued = 0;
    let mut samples = 0;
    for pair in runs.windows(2) {
        if pair[0] == len {
            samples += 1;
            if pair[1] > 0 {
                continued += 1;
            }
        }
    }
    (continued, samples)
}

impl KillStrategy for ConsecutiveDecay {
    fn alias(&self) -> &'static str {
        "S9"
    }

    fn ui_name(&self) -> &'static str {
        "Consecutive Decay"
    }

    fn min_rows(&self) -> usize {
        5
    }

    fn calculate(&self, prefix: &Prefix<'_>) -> ScoredRanking {
        let pool = prefix.pool;
        let runs: Vec<(u8, Vec<usize>)> = pool
            .numbers()
            .map(|n| (n, stats::run_lengths(prefix.draws, n)))
            .collect();

        // Pool-wide continuation by run length, used when a number has no sample of its own
        let mut pooled: HashMap<usize, (usize, usize)> = HashMap::new();
        for (_, number_runs) in &runs {
            for pair in number_runs.windows(2) {
                if pair[0] > 0 {
                    let entry = pooled.entry(pair[0]).or_insert((0, 0));
                    entry.1 += 1;
                    if pair[1] > 0 {
                        entry.0 += 1;
                    }
                }
            }
        }

        let mut ranking = ScoredRanking::new(pool);
        for (n, number_runs) in &runs {
            let run = number_runs.last().copied().unwrap_or(0);
            if run == 0 {
                continue;
            }
            let (continued, samples) = if run == 1 {
                stats::repeat_counts(prefix.draws, *n)
            } else {
                continuation(number_runs, run)
            };
            let (continued, samples) = if samples > 0 {
                (continued, samples)
            } else {
                pooled.get(&run).copied().unwrap_or((0, 0))
            };
            let rate = if samples > 0 {
                continued as f64 / samples as f64
            } else {
                self.params.repeat_prior
            };
            ranking.set(*n, 1.0 - rate);
        }
        ranking
    }
}

/// K3: the longer the current streak, the stronger the kill (`base + per_run * run`).
pub struct ConsecutiveExclusion {
    params: ConsecutiveExclusionParams,
}

impl ConsecutiveExclusion {
    pub fn new(params: ConsecutiveExclusionParams) -> Self {
        Self { params }
    }
}

impl KillStrategy for ConsecutiveExclusion {
    fn alias(&self) -> &'static str {
        "K3"
    }

    fn ui_name(&self) -> &'static str {
        "Consecutive Exclusion"
    }

    fn min_rows(&self) -> usize {
        2
    }

    fn calculate(&self, prefix: &Prefix<'_>) -> ScoredRanking {
        let pool = prefix.pool;
        let mut ranking = ScoredRanking::new(pool);
        for n in pool.numbers() {
            let run = stats::current_run(prefix.draws, n);
            if run > 0 {
                ranking.set(n, self.params.base + self.params.per_run * run as f64);
            }
        }
        ranking
    }
}
