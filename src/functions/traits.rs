use crate::types::{Prefix, ScoredRanking};

/// A kill heuristic: higher score means more confidently absent from the next draw.
pub trait KillStrategy: Send + Sync {
    /// Short identifier used in reports (`S1`, `K3`, ...)
    fn alias(&self) -> &'static str;

    /// Display name
    fn ui_name(&self) -> &'static str;

    /// Rows required before the strategy produces a ranking
    fn min_rows(&self) -> usize;

    /// Score every pool number; only called with at least `min_rows` draws
    fn calculate(&self, prefix: &Prefix<'_>) -> ScoredRanking;

    /// Gated entry point; `None` means abstain, never "all zero"
    fn score(&self, prefix: &Prefix<'_>) -> Option<ScoredRanking> {
        if prefix.len() < self.min_rows() {
            return None;
        }
        Some(self.calculate(prefix))
    }
}

/// A forward estimator of numbers likely to appear in the next draw.
pub trait ForwardPredictor: Send + Sync {
    fn alias(&self) -> &'static str;

    fn ui_name(&self) -> &'static str;

    fn min_rows(&self) -> usize;

    /// Predict from at least `min_rows` draws
    fn calculate(&self, prefix: &Prefix<'_>) -> Vec<u8>;

    fn predict(&self, prefix: &Prefix<'_>) -> Option<Vec<u8>> {
        if prefix.len() < self.min_rows() {
            return None;
        }
        Some(self.calculate(prefix))
    }
}
