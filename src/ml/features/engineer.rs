use crate::types::{Draw, Pool};
use std::collections::VecDeque;

pub const FEATURE_COUNT: usize = 3;

/// `[short-window frequency, long-run frequency, normalised recency]`
pub type FeatureVector = [f64; FEATURE_COUNT];

pub struct FeatureEngineer {
    short_window: usize,
}

/// Labelled examples: one per (cut point, number), label 1.0 if drawn next.
pub struct TrainingSet {
    pub features: Vec<FeatureVector>,
    pub labels: Vec<f64>,
}

impl FeatureEngineer {
    pub fn new(short_window: usize) -> Self {
        Self {
            short_window: short_window.max(1),
        }
    }

    /// Walk the history once, emitting features after every row.
    /// `visit(t, number, features)` sees only `draws[..=t]` (no look-ahead).
    fn walk<F>(&self, draws: &[Draw], pool: &Pool, mut visit: F)
    where
        F: FnMut(usize, u8, FeatureVector),
    {
        let slots = pool.size as usize + 1;
        let mut long = vec![0u32; slots];
        let mut short = vec![0u32; slots];
        let mut last_seen: Vec<Option<usize>> = vec![None; slots];
        let mut window: VecDeque<&Draw> = VecDeque::with_capacity(self.short_window + 1);

        for (t, draw) in draws.iter().enumerate() {
            for &n in draw.numbers() {
                long[n as usize] += 1;
                short[n as usize] += 1;
                last_seen[n as usize] = Some(t);
            }
            window.push_back(draw);
            if window.len() > self.short_window {
                if let Some(expired) = window.pop_front() {
                    for &n in expired.numbers() {
                        short[n as usize] -= 1;
                    }
                }
            }

            let rows = (t + 1) as f64;
            for n in pool.numbers() {
                let i = n as usize;
                let recency = match last_seen[i] {
                    Some(seen) => (t - seen) as f64 / rows,
                    None => 1.0,
                };
                visit(
                    t,
                    n,
                    [
                        short[i] as f64 / window.len() as f64,
                        long[i] as f64 / rows,
                        recency,
                    ],
                );
            }
        }
    }

    /// Every historical transition as labelled examples.
    pub fn training_set(&self, draws: &[Draw], pool: &Pool) -> TrainingSet {
        let mut features = Vec::new();
        let mut labels = Vec::new();
        self.walk(draws, pool, |t, n, x| {
            if let Some(next) = draws.get(t + 1) {
                features.push(x);
                labels.push(if next.contains(n) { 1.0 } else { 0.0 });
            }
        });
        TrainingSet { features, labels }
    }

    /// Features of every number after the latest row, indexed by `number - 1`.
    pub fn latest(&self, draws: &[Draw], pool: &Pool) -> Vec<(u8, FeatureVector)> {
        let last = draws.len().saturating_sub(1);
        let mut latest = Vec::with_capacity(pool.size as usize);
        self.walk(draws, pool, |t, n, x| {
            if t == last {
                latest.push((n, x));
            }
        });
        latest
    }
}
