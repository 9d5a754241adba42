pub mod voter;
pub mod selector;
pub mod combiner;

pub use combiner::SimpleCombiner;
pub use selector::DiversitySelector;
pub use voter::{Ballot, EnsembleVoter};
