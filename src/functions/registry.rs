use crate::config::AppConfig;
use crate::functions::{
    forward::ReverseKill,
    kill::{
        CoOccurrenceInversion, ConsecutiveDecay, ConsecutiveExclusion, DifferenceInversion,
        FrequencyInverse, MarkovReverse, MissCycle, NeighborExclusion, OddEvenBalance,
        PeriodicityExclusion, SumDeviation, TailConstraint, TailExclusion, TransitionProbability,
        ZoneCold,
    },
};
use std::sync::Arc;

use super::traits::KillStrategy;

/// Which vote path a strategy feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyGroup {
    /// Backtest-weighted ensemble: S1..S10 plus the reverse predictor.
    Calibrated,
    /// Rank-vote fallback for short histories: K1..K5 plus the reverse predictor.
    Simple,
}

struct Entry {
    strategy: Arc<dyn KillStrategy>,
    calibrated: bool,
    simple: bool,
}

/// Every kill strategy, in report order.
pub struct StrategyRegistry {
    entries: Vec<Entry>,
}

impl StrategyRegistry {
    pub fn from_config(config: &AppConfig) -> Self {
        let s = &config.strategies;
        let calibrated: Vec<Arc<dyn KillStrategy>> = vec![
            Arc::new(FrequencyInverse::new(s.frequency)),
            Arc::new(MissCycle::new(s.miss_cycle)),
            Arc::new(TailExclusion::new(s.tail_exclusion)),
            Arc::new(ZoneCold::new(s.zone_cold)),
            Arc::new(NeighborExclusion::new(s.neighbor)),
            Arc::new(OddEvenBalance::new(s.parity)),
            Arc::new(SumDeviation::new(s.sum_deviation)),
            Arc::new(TransitionProbability::new(s.transition)),
            Arc::new(ConsecutiveDecay::new(s.consecutive_decay)),
            Arc::new(TailConstraint::new(s.tail_constraint)),
        ];
        let simple: Vec<Arc<dyn KillStrategy>> = vec![
            Arc::new(MarkovReverse),
            Arc::new(PeriodicityExclusion::new(s.periodicity)),
            Arc::new(ConsecutiveExclusion::new(s.consecutive_exclusion)),
            Arc::new(DifferenceInversion),
            Arc::new(CoOccurrenceInversion),
        ];

        let mut registry = Self { entries: Vec::new() };
        registry.register(calibrated, true, false);
        registry.register(simple, false, true);
        registry.register(
            vec![Arc::new(ReverseKill::new(config.forward.clone()))],
            true,
            true,
        );
        registry
    }

    fn register(&mut self, strategies: Vec<Arc<dyn KillStrategy>>, calibrated: bool, simple: bool) {
        for strategy in strategies {
            self.entries.push(Entry {
                strategy,
                calibrated,
                simple,
            });
        }
    }

    pub fn all(&self) -> Vec<Arc<dyn KillStrategy>> {
        self.entries.iter().map(|e| e.strategy.clone()).collect()
    }

    pub fn group(&self, group: StrategyGroup) -> Vec<Arc<dyn KillStrategy>> {
        self.entries
            .iter()
            .filter(|e| match group {
                StrategyGroup::Calibrated => e.calibrated,
                StrategyGroup::Simple => e.simple,
            })
            .map(|e| e.strategy.clone())
            .collect()
    }

    pub fn calibrated(&self) -> Vec<Arc<dyn KillStrategy>> {
        self.group(StrategyGroup::Calibrated)
    }

    pub fn simple(&self) -> Vec<Arc<dyn KillStrategy>> {
        self.group(StrategyGroup::Simple)
    }

    pub fn get(&self, alias: &str) -> Option<Arc<dyn KillStrategy>> {
        self.entries
            .iter()
            .find(|e| e.strategy.alias() == alias)
            .map(|e| e.strategy.clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}
