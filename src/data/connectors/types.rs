use serde::{Deserialize, Serialize};

/// A history line that was dropped while loading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedLine {
    pub line_number: usize,
    pub reason: String,
}

/// Metadata about a loaded history file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadSummary {
    pub file_path: String,
    pub accepted: usize,
    pub skipped: Vec<SkippedLine>,
}

impl LoadSummary {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}
