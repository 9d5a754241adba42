use crate::config::forward::LogisticParams;
use crate::functions::traits::ForwardPredictor;
use crate::ml::features::FeatureEngineer;
use crate::ml::models::LogisticRegression;
use crate::types::{Prefix, RankedNumber};

/// Train the per-number appearance classifier; `None` below `params.min_history` rows.
pub fn train_logistic(prefix: &Prefix<'_>, params: &LogisticParams) -> Option<LogisticRegression> {
    if prefix.len() < params.min_history {
        return None;
    }
    let engineer = FeatureEngineer::new(params.short_window);
    let set = engineer.training_set(prefix.draws, prefix.pool);
    let (model, metrics) =
        LogisticRegression::train(&set.features, &set.labels, params.learning_rate, params.epochs)?;
    log::debug!(
        "logistic model trained on {} examples, loss {:.4}",
        metrics.examples,
        metrics.final_loss
    );
    Some(model)
}

/// M: top numbers by predicted appearance probability.
pub struct LogisticPredictor {
    params: LogisticParams,
    output_size: usize,
}

impl LogisticPredictor {
    pub fn new(params: LogisticParams, output_size: usize) -> Self {
        Self {
            params,
            output_size,
        }
    }

    /// Probability of every number, highest first.
    pub fn probabilities(&self, prefix: &Prefix<'_>) -> Option<Vec<RankedNumber>> {
        let model = train_logistic(prefix, &self.params)?;
        let engineer = FeatureEngineer::new(self.params.short_window);
        let mut ranked: Vec<RankedNumber> = engineer
            .latest(prefix.draws, prefix.pool)
            .into_iter()
            .map(|(number, x)| RankedNumber {
                number,
                score: model.predict_proba(&x),
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.number.cmp(&b.number))
        });
        Some(ranked)
    }
}

impl ForwardPredictor for LogisticPredictor {
    fn alias(&self) -> &'static str {
        "M"
    }

    fn ui_name(&self) -> &'static str {
        "Logistic Classifier"
    }

    fn min_rows(&self) -> usize {
        self.params.min_history
    }

    fn calculate(&self, prefix: &Prefix<'_>) -> Vec<u8> {
        self.probabilities(prefix)
            .unwrap_or_default()
            .into_iter()
            .take(self.output_size)
            .map(|r| r.number)
            .collect()
    }
}
