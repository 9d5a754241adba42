use crate::functions::{stats, traits::ForwardPredictor};
use crate::types::Prefix;

/// `(last, last - previous)` of a slot series with at least two values.
fn last_step(values: &[f64]) -> (f64, f64) {
    match values {
        [.., prev, last] => (*last, last - prev),
        [last] => (*last, 0.0),
        [] => (0.0, 0.0),
    }
}

/// C: `next = last + (last - prev)` per slot.
pub struct DifferenceContinuation;

impl ForwardPredictor for DifferenceContinuation {
    fn alias(&self) -> &'static str {
        "C"
    }

    fn ui_name(&self) -> &'static str {
        "Difference Continuation"
    }

    fn min_rows(&self) -> usize {
        2
    }

    fn calculate(&self, prefix: &Prefix<'_>) -> Vec<u8> {
        let pool = prefix.pool;
        stats::slot_series(prefix.window(2), pool)
            .iter()
            .map(|values| {
                let (last, step) = last_step(values);
                pool.clamp(last + step)
            })
            .collect()
    }
}

/// I: `next = mean(slot) + (last - prev)` per slot.
pub struct MeanDifference;

impl ForwardPredictor for MeanDifference {
    fn alias(&self) -> &'static str {
        "I"
    }

    fn ui_name(&self) -> &'static str {
        "Mean + Difference"
    }

    fn min_rows(&self) -> usize {
        2
    }

    fn calculate(&self, prefix: &Prefix<'_>) -> Vec<u8> {
        let pool = prefix.pool;
        stats::slot_series(prefix.draws, pool)
            .iter()
            .map(|values| {
                let mean = values.iter().sum::<f64>() / values.len().max(1) as f64;
                let (_, step) = last_step(values);
                pool.clamp(mean + step)
            })
            .collect()
    }
}
