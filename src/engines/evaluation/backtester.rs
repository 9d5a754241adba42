use crate::{
    config::EnsembleConfig,
    engines::protection::ProtectionEvaluator,
    functions::traits::KillStrategy,
    types::{BacktestReport, Draw, History, Prefix, ProtectionStats, StrategyStats},
};
use rayon::prelude::*;
use std::{ops::Range, sync::Arc};

/// Walk-forward replay of kill strategies over the most recent transitions.
///
/// Test point `i` scores `history[..=i]` and checks the candidates against
/// `history[i + 1]`. A kill candidate is correct when it is absent from that draw.
pub struct BacktestCalibrator {
    config: EnsembleConfig,
}

impl BacktestCalibrator {
    pub fn new(config: EnsembleConfig) -> Self {
        Self { config }
    }

    /// Number of test points for a history of `len` rows.
    pub fn window(&self, len: usize) -> usize {
        self.config
            .backtest_window(len)
            .min(len.saturating_sub(1))
    }

    /// Indices `i` whose prefix `..=i` is replayed against row `i + 1`.
    fn points(&self, len: usize) -> Range<usize> {
        let window = self.window(len);
        let end = len.saturating_sub(1);
        end - window..end
    }

    fn replay<'a>(&self, history: &'a History) -> impl Iterator<Item = (Prefix<'a>, &'a Draw)> + 'a {
        let draws = history.draws();
        self.points(history.len())
            .map(move |i| (history.prefix(i + 1), &draws[i + 1]))
    }

    pub fn evaluate_strategy(&self, strategy: &dyn KillStrategy, history: &History) -> StrategyStats {
        let mut correct = 0;
        let mut samples = 0;
        for (prefix, next) in self.replay(history) {
            // Abstaining contributes no observations
            let Some(ranking) = strategy.score(&prefix) else {
                continue;
            };
            for candidate in ranking.top(self.config.backtest_top_n) {
                samples += 1;
                if !next.contains(candidate.number) {
                    correct += 1;
                }
            }
        }
        let stats = StrategyStats::new(strategy.alias(), correct, samples);
        log::debug!(
            "{} backtest: {}/{} correct ({:.3})",
            stats.id,
            correct,
            samples,
            stats.accuracy
        );
        stats
    }

    /// Stats for every strategy, in the order given.
    pub fn calibrate(&self, strategies: &[Arc<dyn KillStrategy>], history: &History) -> Vec<StrategyStats> {
        if self.config.parallel {
            strategies
                .par_iter()
                .map(|s| self.evaluate_strategy(s.as_ref(), history))
                .collect()
        } else {
            strategies
                .iter()
                .map(|s| self.evaluate_strategy(s.as_ref(), history))
                .collect()
        }
    }

    /// Diagnostic only: how often a strongly protected number did reappear.
    pub fn evaluate_protection(&self, evaluator: &ProtectionEvaluator, history: &History) -> ProtectionStats {
        let threshold = self.config.protection_backtest_threshold;
        let mut correct = 0;
        let mut samples = 0;
        for (prefix, next) in self.replay(history) {
            let records = evaluator.evaluate(&prefix);
            for (number, record) in records.iter() {
                if record.score > threshold {
                    samples += 1;
                    if next.contains(number) {
                        correct += 1;
                    }
                }
            }
        }
        let accuracy = if samples == 0 {
            0.0
        } else {
            correct as f64 / samples as f64
        };
        ProtectionStats {
            accuracy,
            correct,
            samples,
        }
    }

    pub fn run(
        &self,
        strategies: &[Arc<dyn KillStrategy>],
        evaluator: &ProtectionEvaluator,
        history: &History,
    ) -> BacktestReport {
        let window = self.window(history.len());
        log::info!(
            "Backtesting {} strategies over {} test points",
            strategies.len(),
            window
        );
        BacktestReport {
            window,
            strategies: self.calibrate(strategies, history),
            protection: self.evaluate_protection(evaluator, history),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProtectionConfig;
    use crate::types::{Pool, ScoredRanking};

    /// Always kills 40..=49.
    struct HighBand;

    impl KillStrategy for HighBand {
        fn alias(&self) -> &'static str {
            "HB"
        }

        fn ui_name(&self) -> &'static str {
            "High Band"
        }

        fn min_rows(&self) -> usize {
            1
        }

        fn calculate(&self, prefix: &Prefix<'_>) -> ScoredRanking {
            let mut ranking = ScoredRanking::new(prefix.pool);
            for n in 40..=49 {
                ranking.set(n, 1.0);
            }
            ranking
        }
    }

    /// Never has enough history.
    struct Abstainer;

    impl KillStrategy for Abstainer {
        fn alias(&self) -> &'static str {
            "AB"
        }

        fn ui_name(&self) -> &'static str {
            "Abstainer"
        }

        fn min_rows(&self) -> usize {
            1000
        }

        fn calculate(&self, prefix: &Prefix<'_>) -> ScoredRanking {
            ScoredRanking::new(prefix.pool)
        }
    }

    fn rows(count: usize, row: Vec<u8>) -> History {
        History::from_rows(Pool::default(), vec![row; count]).unwrap()
    }

    #[test]
    fn test_window() {
        let calibrator = BacktestCalibrator::new(EnsembleConfig::default());
        assert_eq!(calibrator.window(10), 0);
        assert_eq!(calibrator.window(20), 5);
        assert_eq!(calibrator.window(100), 20);
        assert_eq!(calibrator.points(20), 14..19);
    }

    #[test]
    fn test_all_miss_window_scores_full_accuracy() {
        let history = rows(30, vec![1, 2, 3, 4, 5, 6, 7]);
        let calibrator = BacktestCalibrator::new(EnsembleConfig::default());
        let stats = calibrator.evaluate_strategy(&HighBand, &history);

        assert_eq!(stats.samples, 15 * 10);
        assert_eq!(stats.accuracy, 1.0);
    }

    #[test]
    fn test_all_hit_window_scores_zero() {
        let history = rows(30, vec![40, 41, 42, 43, 44, 45, 46]);
        let stats = BacktestCalibrator::new(EnsembleConfig::default()).evaluate_strategy(&HighBand, &history);
        // 47, 48 and 49 stay out of every draw
        assert_eq!(stats.correct, 15 * 3);
        assert!((stats.accuracy - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_abstaining_strategy_is_untrusted() {
        let history = rows(30, vec![1, 2, 3, 4, 5, 6, 7]);
        let stats = BacktestCalibrator::new(EnsembleConfig::default()).evaluate_strategy(&Abstainer, &history);
        assert_eq!(stats.samples, 0);
        assert_eq!(stats.accuracy, 0.0);
        assert_eq!(stats.weight(), 0.0);
    }

    #[test]
    fn test_calibration_keeps_registry_order() {
        let history = rows(30, vec![1, 2, 3, 4, 5, 6, 7]);
        let strategies: Vec<Arc<dyn KillStrategy>> = vec![Arc::new(Abstainer), Arc::new(HighBand)];
        let evaluator = ProtectionEvaluator::new(ProtectionConfig::default());
        let report = BacktestCalibrator::new(EnsembleConfig::default()).run(&strategies, &evaluator, &history);

        let ids: Vec<&str> = report.strategies.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["AB", "HB"]);
        assert_eq!(report.window, 15);
        // Repeat protection on 1..=7 is always confirmed
        assert_eq!(report.protection.samples, 15 * 7);
        assert_eq!(report.protection.accuracy, 1.0);
    }
}
