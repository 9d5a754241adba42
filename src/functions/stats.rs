//! History statistics shared by strategies, predictors and the protection evaluator.
//!
//! Every function is a pure scan of a draw slice; index 0 is the oldest draw.

use crate::types::{Draw, NumberMap, Pool};

/// Appearance counts per number over `draws`.
pub fn counts(draws: &[Draw], pool: &Pool) -> NumberMap<u32> {
    let mut counts = NumberMap::new(pool, 0u32);
    for draw in draws {
        for &n in draw.numbers() {
            if let Some(c) = counts.get_mut(n) {
                *c += 1;
            }
        }
    }
    counts
}

/// Row indices containing `number`, ascending.
pub fn appearances(draws: &[Draw], number: u8) -> Vec<usize> {
    draws
        .iter()
        .enumerate()
        .filter(|(_, d)| d.contains(number))
        .map(|(i, _)| i)
        .collect()
}

/// Rows since the last appearance (0 when in the latest row), `None` if never drawn.
pub fn miss_streak(draws: &[Draw], number: u8) -> Option<usize> {
    draws
        .iter()
        .rev()
        .position(|d| d.contains(number))
}

/// Consecutive rows, counted back from the latest, that contain `number`.
pub fn current_run(draws: &[Draw], number: u8) -> usize {
    draws
        .iter()
        .rev()
        .take_while(|d| d.contains(number))
        .count()
}

/// Differences between consecutive appearance indices.
pub fn gaps(indices: &[usize]) -> Vec<f64> {
    indices.windows(2).map(|w| (w[1] - w[0]) as f64).collect()
}

/// Mean inter-appearance gap; needs at least two appearances.
pub fn mean_gap(indices: &[usize]) -> Option<f64> {
    let gaps = gaps(indices);
    if gaps.is_empty() {
        return None;
    }
    Some(gaps.iter().sum::<f64>() / gaps.len() as f64)
}

/// Population mean and standard deviation.
pub fn mean_std(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    Some((mean, variance.sqrt()))
}

/// The most recent maximal run of consecutive appearances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub len: usize,
    /// Rows since the run ended; 0 while it is still going.
    pub silence: usize,
}

pub fn latest_run(draws: &[Draw], number: u8) -> Option<Run> {
    let silence = miss_streak(draws, number)?;
    let end = draws.len() - silence;
    let len = draws[..end]
        .iter()
        .rev()
        .take_while(|d| d.contains(number))
        .count();
    Some(Run { len, silence })
}

/// `(repeats, samples)`: how often an appearance was followed by another in the next row.
pub fn repeat_counts(draws: &[Draw], number: u8) -> (usize, usize) {
    let mut repeats = 0;
    let mut samples = 0;
    for pair in draws.windows(2) {
        if pair[0].contains(number) {
            samples += 1;
            if pair[1].contains(number) {
                repeats += 1;
            }
        }
    }
    (repeats, samples)
}

/// Length of the run of `number` ending at every row (0 where absent).
pub fn run_lengths(draws: &[Draw], number: u8) -> Vec<usize> {
    let mut runs = Vec::with_capacity(draws.len());
    let mut run = 0;
    for draw in draws {
        run = if draw.contains(number) { run + 1 } else { 0 };
        runs.push(run);
    }
    runs
}

/// Positional series: slot `s` of every sorted row.
pub fn slot_series(draws: &[Draw], pool: &Pool) -> Vec<Vec<f64>> {
    let mut series = vec![Vec::with_capacity(draws.len()); pool.draw_size];
    for draw in draws {
        for (slot, value) in draw.sorted().into_iter().enumerate() {
            if let Some(s) = series.get_mut(slot) {
                s.push(value as f64);
            }
        }
    }
    series
}

/// Row-to-row transition counts: `a` in row `i`, `b` in row `i + 1`.
pub struct TransitionMatrix {
    size: usize,
    counts: Vec<u32>,
    /// Rows (excluding the latest) in which each number occurred as a source.
    sources: NumberMap<u32>,
}

impl TransitionMatrix {
    pub fn build(draws: &[Draw], pool: &Pool) -> Self {
        let size = pool.size as usize + 1;
        let mut counts = vec![0u32; size * size];
        let mut sources = NumberMap::new(pool, 0u32);
        for pair in draws.windows(2) {
            for &a in pair[0].numbers() {
                sources[a] += 1;
                for &b in pair[1].numbers() {
                    counts[a as usize * size + b as usize] += 1;
                }
            }
        }
        Self {
            size,
            counts,
            sources,
        }
    }

    pub fn count(&self, from: u8, to: u8) -> u32 {
        self.counts
            .get(from as usize * self.size + to as usize)
            .copied()
            .unwrap_or(0)
    }

    pub fn source_occurrences(&self, from: u8) -> u32 {
        self.sources.get(from).copied().unwrap_or(0)
    }
}

/// Symmetric counts of rows containing both numbers.
pub struct CoOccurrence {
    size: usize,
    counts: Vec<u32>,
}

impl CoOccurrence {
    pub fn build(draws: &[Draw], pool: &Pool) -> Self {
        let size = pool.size as usize + 1;
        let mut counts = vec![0u32; size * size];
        for draw in draws {
            for &a in draw.numbers() {
                for &b in draw.numbers() {
                    if a != b {
                        counts[a as usize * size + b as usize] += 1;
                    }
                }
            }
        }
        Self { size, counts }
    }

    pub fn count(&self, a: u8, b: u8) -> u32 {
        self.counts
            .get(a as usize * self.size + b as usize)
            .copied()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::History;

    fn history(rows: Vec<Vec<u8>>) -> History {
        History::from_rows(Pool::default(), rows).unwrap()
    }

    #[test]
    fn test_streaks_and_runs() {
        let h = history(vec![
            vec![1, 2, 3, 4, 5, 6, 7],
            vec![1, 2, 3, 4, 5, 6, 8],
            vec![1, 9, 10, 11, 12, 13, 14],
            vec![2, 9, 10, 11, 12, 13, 14],
        ]);
        let d = h.draws();
        assert_eq!(miss_streak(d, 2), Some(0));
        assert_eq!(miss_streak(d, 1), Some(1));
        assert_eq!(miss_streak(d, 40), None);
        assert_eq!(current_run(d, 9), 2);
        assert_eq!(current_run(d, 1), 0);
        assert_eq!(latest_run(d, 1), Some(Run { len: 3, silence: 1 }));
        assert_eq!(latest_run(d, 3), Some(Run { len: 2, silence: 2 }));
        assert_eq!(repeat_counts(d, 1), (2, 3));
        assert_eq!(run_lengths(d, 1), vec![1, 2, 3, 0]);
    }

    #[test]
    fn test_gap_statistics() {
        assert_eq!(mean_gap(&[0, 2, 6]), Some(3.0));
        assert_eq!(mean_gap(&[4]), None);
        let (mean, std) = mean_std(&[2.0, 4.0]).unwrap();
        assert_eq!(mean, 3.0);
        assert_eq!(std, 1.0);
    }

    #[test]
    fn test_transition_matrix() {
        let h = history(vec![
            vec![1, 2, 3, 4, 5, 6, 7],
            vec![8, 9, 10, 11, 12, 13, 14],
            vec![1, 9, 10, 11, 12, 13, 14],
        ]);
        let t = TransitionMatrix::build(h.draws(), h.pool());
        assert_eq!(t.count(1, 8), 1);
        assert_eq!(t.count(8, 1), 1);
        assert_eq!(t.count(9, 9), 1);
        assert_eq!(t.source_occurrences(1), 1);
        assert_eq!(t.source_occurrences(9), 1);
    }

    #[test]
    fn test_slot_series_sorts_rows() {
        let h = history(vec![vec![7, 6, 5, 4, 3, 2, 1], vec![8, 9, 10, 11, 12, 13, 14]]);
        let series = slot_series(h.draws(), h.pool());
        assert_eq!(series.len(), 7);
        assert_eq!(series[0], vec![1.0, 8.0]);
        assert_eq!(series[6], vec![7.0, 14.0]);
    }
}
