use crate::{
    config::AppConfig,
    engines::{
        ensemble::{Ballot, DiversitySelector, EnsembleVoter, SimpleCombiner},
        evaluation::BacktestCalibrator,
        protection::ProtectionEvaluator,
    },
    functions::{
        forward::{DifferenceContinuation, LinearFit, LogisticPredictor, MeanDifference, ReversePredictor},
        registry::StrategyRegistry,
        traits::{ForwardPredictor, KillStrategy},
    },
    types::{
        BacktestReport, EnsembleMode, ForwardPrediction, History, KillCandidate, KillReport,
        NumberMap, Prefix, ProtectionRecord, RankedNumber, ScoredRanking, StrategyOutcome,
    },
};
use rayon::prelude::*;
use std::sync::Arc;

/// A strategy next to its ranking of the latest prefix (`None` = abstained).
type Scored = (Arc<dyn KillStrategy>, Option<ScoredRanking>);

/// Runs the full pipeline over one history snapshot:
/// rank, backtest, protect, vote, select.
pub struct KillEngine {
    config: AppConfig,
    registry: StrategyRegistry,
    linear: LinearFit,
    difference: DifferenceContinuation,
    mean_difference: MeanDifference,
    logistic: LogisticPredictor,
    reverse: ReversePredictor,
    protection: ProtectionEvaluator,
    calibrator: BacktestCalibrator,
    voter: EnsembleVoter,
    selector: DiversitySelector,
    combiner: SimpleCombiner,
}

impl KillEngine {
    pub fn new(config: AppConfig) -> Self {
        let ensemble = &config.ensemble;
        Self {
            registry: StrategyRegistry::from_config(&config),
            linear: LinearFit,
            difference: DifferenceContinuation,
            mean_difference: MeanDifference,
            logistic: LogisticPredictor::new(config.forward.logistic.clone(), config.forward.output_size),
            reverse: ReversePredictor::new(config.forward.clone()),
            protection: ProtectionEvaluator::new(config.protection.clone()),
            calibrator: BacktestCalibrator::new(ensemble.clone()),
            voter: EnsembleVoter::new(ensemble.clone()),
            selector: DiversitySelector::new(ensemble.selection_size, ensemble.zone_cap, ensemble.tail_cap),
            combiner: SimpleCombiner::new(ensemble.simple_depth, ensemble.selection_size),
            config,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    pub fn predict_forward(&self, history: &History) -> ForwardPrediction {
        let prefix = history.view();
        ForwardPrediction {
            b: self.linear.predict(&prefix),
            c: self.difference.predict(&prefix),
            i: self.mean_difference.predict(&prefix),
            m: self.logistic.predict(&prefix),
            n: self.reverse.predict(&prefix),
        }
    }

    /// Calibrated once the backtest window is non-empty, simple from
    /// `simple_min_history` rows, nothing below that.
    pub fn mode_for(&self, len: usize) -> Option<EnsembleMode> {
        if len < self.config.ensemble.simple_min_history {
            None
        } else if self.calibrator.window(len) == 0 {
            Some(EnsembleMode::Simple)
        } else {
            Some(EnsembleMode::Calibrated)
        }
    }

    pub fn predict_kill(&self, history: &History) -> Option<KillReport> {
        let mode = self.mode_for(history.len())?;
        log::info!("Kill prediction over {} draws ({:?})", history.len(), mode);

        let prefix = history.view();
        let scored = self.score_all(&self.registry.all(), &prefix);
        let records = self.protection.evaluate(&prefix);

        let (overall, backtest) = match mode {
            EnsembleMode::Calibrated => {
                let backtest =
                    self.calibrator
                        .run(&self.registry.calibrated(), &self.protection, history);
                let overall = self.vote(history, &scored, &backtest, &records);
                (overall, Some(backtest))
            }
            EnsembleMode::Simple => (self.combine(history, &scored), None),
        };
        log::info!("Selected {} kill candidates", overall.len());

        let per_strategy = scored
            .iter()
            .map(|(strategy, ranking)| StrategyOutcome {
                id: strategy.alias().to_string(),
                name: strategy.ui_name().to_string(),
                candidates: ranking
                    .as_ref()
                    .map(|r| r.top(self.config.ensemble.backtest_top_n)),
                stats: backtest.as_ref().and_then(|b| {
                    b.strategies
                        .iter()
                        .find(|s| s.id == strategy.alias())
                        .cloned()
                }),
            })
            .collect();

        Some(KillReport {
            mode,
            history_len: history.len(),
            overall,
            per_strategy,
            protection: self.protection.entries(&records),
            backtest,
            generated_at: chrono::Utc::now().to_rfc3339(),
        })
    }

    /// Rankings in registry order, whatever order the workers finish in.
    fn score_all(&self, strategies: &[Arc<dyn KillStrategy>], prefix: &Prefix<'_>) -> Vec<Scored> {
        let score = |s: &Arc<dyn KillStrategy>| -> Scored {
            let ranking = s.score(prefix);
            if ranking.is_none() {
                log::debug!("{} abstained with {} draws", s.alias(), prefix.len());
            }
            (s.clone(), ranking)
        };
        if self.config.ensemble.parallel {
            strategies.par_iter().map(score).collect()
        } else {
            strategies.iter().map(score).collect()
        }
    }

    fn vote(
        &self,
        history: &History,
        scored: &[Scored],
        backtest: &BacktestReport,
        records: &NumberMap<ProtectionRecord>,
    ) -> Vec<KillCandidate> {
        let depth = self.config.ensemble.vote_depth;
        let ballots: Vec<(&'static str, Vec<RankedNumber>, f64)> = backtest
            .strategies
            .iter()
            .filter_map(|stats| {
                let (strategy, ranking) = scored.iter().find(|(s, _)| s.alias() == stats.id)?;
                let ranking = ranking.as_ref()?;
                Some((strategy.alias(), ranking.top(depth), stats.weight()))
            })
            .collect();
        let ballots: Vec<Ballot<'_>> = ballots
            .iter()
            .map(|(source, candidates, weight)| Ballot {
                source: *source,
                candidates: candidates.as_slice(),
                weight: *weight,
            })
            .collect();

        let mut votes = self.voter.accumulate(history.pool(), &ballots);
        let notes = self.voter.apply_protection(&mut votes, records, &self.protection);
        let ranked = self.voter.rank(&votes, &notes);
        log::debug!("{} numbers received a kill vote", ranked.len());
        self.selector.select(history.pool(), &ranked)
    }

    fn combine(&self, history: &History, scored: &[Scored]) -> Vec<KillCandidate> {
        let depth = self.config.ensemble.simple_depth;
        let simple: Vec<(&'static str, Vec<RankedNumber>)> = self
            .registry
            .simple()
            .iter()
            .filter_map(|strategy| {
                let (_, ranking) = scored.iter().find(|(s, _)| s.alias() == strategy.alias())?;
                Some((strategy.alias(), ranking.as_ref()?.top(depth)))
            })
            .collect();
        let sources: Vec<(&str, &[RankedNumber])> = simple
            .iter()
            .map(|(alias, ranked)| (*alias, ranked.as_slice()))
            .collect();
        self.combiner.combine(history.pool(), &sources)
    }
}

impl Default for KillEngine {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SyntheticHistory;
    use crate::types::Pool;

    fn synthetic(rows: usize, seed: u64) -> History {
        SyntheticHistory::new(Pool::default(), Some(seed)).generate(rows).unwrap()
    }

    #[test]
    fn test_modes_by_history_length() {
        let engine = KillEngine::default();
        assert_eq!(engine.mode_for(4), None);
        assert_eq!(engine.mode_for(5), Some(EnsembleMode::Simple));
        assert_eq!(engine.mode_for(15), Some(EnsembleMode::Simple));
        assert_eq!(engine.mode_for(16), Some(EnsembleMode::Calibrated));
    }

    #[test]
    fn test_too_short_history_has_no_report() {
        assert!(KillEngine::default().predict_kill(&synthetic(4, 1)).is_none());
    }

    #[test]
    fn test_simple_mode_report() {
        let report = KillEngine::default().predict_kill(&synthetic(8, 2)).unwrap();

        assert_eq!(report.mode, EnsembleMode::Simple);
        assert!(report.backtest.is_none());
        assert!(!report.overall.is_empty());
        assert!(report.overall.len() <= 10);
        assert_eq!(report.per_strategy.len(), 16);
    }

    #[test]
    fn test_calibrated_report() {
        let history = synthetic(40, 3);
        let report = KillEngine::default().predict_kill(&history).unwrap();

        assert_eq!(report.mode, EnsembleMode::Calibrated);
        let backtest = report.backtest.as_ref().unwrap();
        assert_eq!(backtest.window, 20);
        assert_eq!(backtest.strategies.len(), 11);
        assert!(backtest
            .strategies
            .iter()
            .all(|s| (0.0..=1.0).contains(&s.accuracy)));
        assert!(report.overall.len() <= 10);
        assert!(report.overall.iter().all(|c| c.weight > 0.0));
    }

    #[test]
    fn test_sequential_and_parallel_agree() {
        let history = synthetic(30, 4);
        let mut config = AppConfig::default();
        let parallel = KillEngine::new(config.clone()).predict_kill(&history).unwrap();
        config.ensemble.parallel = false;
        let sequential = KillEngine::new(config).predict_kill(&history).unwrap();

        assert_eq!(parallel.overall, sequential.overall);
        assert_eq!(parallel.per_strategy, sequential.per_strategy);
    }
}
