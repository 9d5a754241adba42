pub mod connectors;
pub mod synthetic;

pub use connectors::{DataValidator, HistoryConnector, LoadSummary};
pub use synthetic::SyntheticHistory;
