use thiserror::Error;

#[derive(Error, Debug)]
pub enum DrawkillError {
    #[error("Invalid draw: {0}")]
    InvalidDraw(String),

    #[error("Invalid history: {0}")]
    InvalidHistory(String),

    #[error("Insufficient history: {actual} draws, minimum {required} required")]
    InsufficientHistory { required: usize, actual: usize },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Data loading error: {0}")]
    DataLoading(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DrawkillError>;
