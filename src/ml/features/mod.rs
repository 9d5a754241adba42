pub mod engineer;

pub use engineer::{FeatureEngineer, FeatureVector, TrainingSet, FEATURE_COUNT};
