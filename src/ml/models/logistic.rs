use crate::ml::features::{FeatureVector, FEATURE_COUNT};
use serde::{Deserialize, Serialize};

/// Binary logistic regression trained by full-batch gradient descent on log-loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub weights: [f64; FEATURE_COUNT],
    pub bias: f64,
}

#[derive(Debug, Clone)]
pub struct TrainingMetrics {
    pub examples: usize,
    pub epochs: usize,
    pub final_loss: f64,
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl LogisticRegression {
    /// `None` when there is nothing to learn from.
    pub fn train(
        features: &[FeatureVector],
        labels: &[f64],
        learning_rate: f64,
        epochs: usize,
    ) -> Option<(Self, TrainingMetrics)> {
        if features.is_empty() || features.len() != labels.len() {
            return None;
        }
        let mut model = Self {
            weights: [0.0; FEATURE_COUNT],
            bias: 0.0,
        };
        let m = features.len() as f64;

        for _ in 0..epochs {
            let mut grad_w = [0.0; FEATURE_COUNT];
            let mut grad_b = 0.0;
            for (x, &y) in features.iter().zip(labels) {
                let error = model.predict_proba(x) - y;
                for (g, xi) in grad_w.iter_mut().zip(x) {
                    *g += error * xi;
                }
                grad_b += error;
            }
            for (w, g) in model.weights.iter_mut().zip(grad_w) {
                *w -= learning_rate * g / m;
            }
            model.bias -= learning_rate * grad_b / m;
        }

        let metrics = TrainingMetrics {
            examples: features.len(),
            epochs,
            final_loss: model.log_loss(features, labels),
        };
        Some((model, metrics))
    }

    pub fn predict_proba(&self, x: &FeatureVector) -> f64 {
        let z = self
            .weights
            .iter()
            .zip(x)
            .map(|(w, xi)| w * xi)
            .sum::<f64>()
            + self.bias;
        sigmoid(z)
    }

    pub fn log_loss(&self, features: &[FeatureVector], labels: &[f64]) -> f64 {
        if features.is_empty() {
            return 0.0;
        }
        let eps = 1e-12;
        features
            .iter()
            .zip(labels)
            .map(|(x, &y)| {
                let p = self.predict_proba(x).clamp(eps, 1.0 - eps);
                -(y * p.ln() + (1.0 - y) * (1.0 - p).ln())
            })
            .sum::<f64>()
            / features.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_training_reduces_loss_and_separates_classes() {
        let features: Vec<FeatureVector> = (0..40)
            .map(|i| {
                let v = if i % 2 == 0 { 1.0 } else { 0.0 };
                [v, 0.5, 1.0 - v]
            })
            .collect();
        let labels: Vec<f64> = (0..40).map(|i| if i % 2 == 0 { 1.0 } else { 0.0 }).collect();

        let untrained = LogisticRegression {
            weights: [0.0; FEATURE_COUNT],
            bias: 0.0,
        };
        let (model, metrics) = LogisticRegression::train(&features, &labels, 0.5, 300).unwrap();

        assert!(metrics.final_loss < untrained.log_loss(&features, &labels));
        assert!(model.predict_proba(&[1.0, 0.5, 0.0]) > 0.5);
        assert!(model.predict_proba(&[0.0, 0.5, 1.0]) < 0.5);
    }

    #[test]
    fn test_empty_training_set() {
        assert!(LogisticRegression::train(&[], &[], 0.1, 10).is_none());
    }
}
