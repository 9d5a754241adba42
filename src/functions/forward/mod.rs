pub mod linear;
pub mod difference;
pub mod logistic;
pub mod reverse;

pub use difference::{DifferenceContinuation, MeanDifference};
pub use linear::LinearFit;
pub use logistic::{train_logistic, LogisticPredictor};
pub use reverse::{ReverseKill, ReversePredictor};
