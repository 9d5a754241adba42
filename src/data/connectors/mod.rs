mod history_file;
mod types;
mod validator;

pub use history_file::HistoryConnector;
pub use types::{LoadSummary, SkippedLine};
pub use validator::DataValidator;
