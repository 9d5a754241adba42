use super::{
    types::{LoadSummary, SkippedLine},
    validator::DataValidator,
};
use crate::error::{DrawkillError, Result};
use crate::types::{History, Pool};
use std::path::Path;

pub struct HistoryConnector;

impl HistoryConnector {
    /// Load a newline-delimited history file, oldest draw first
    pub fn load<P: AsRef<Path>>(path: P, pool: Pool) -> Result<History> {
        Self::load_with_summary(path, pool).map(|(history, _)| history)
    }

    /// Load and report which lines were dropped
    pub fn load_with_summary<P: AsRef<Path>>(path: P, pool: Pool) -> Result<(History, LoadSummary)> {
        let contents = std::fs::read_to_string(&path).map_err(|e| {
            DrawkillError::DataLoading(format!(
                "Failed to read {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let (history, skipped) = Self::parse(&contents, pool)?;

        if !skipped.is_empty() {
            log::warn!(
                "Skipped {} malformed history lines in {}",
                skipped.len(),
                path.as_ref().display()
            );
        }

        let summary = LoadSummary {
            file_path: path.as_ref().to_string_lossy().to_string(),
            accepted: history.len(),
            skipped,
        };
        Ok((history, summary))
    }

    /// Parse file contents; blank lines and `#` comments are ignored, bad rows are skipped
    pub fn parse(contents: &str, pool: Pool) -> Result<(History, Vec<SkippedLine>)> {
        let mut draws = Vec::new();
        let mut skipped = Vec::new();

        for (i, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match DataValidator::parse_line(line, &pool) {
                Ok(draw) => draws.push(draw),
                Err(e) => {
                    log::debug!("line {}: {}", i + 1, e);
                    skipped.push(SkippedLine {
                        line_number: i + 1,
                        reason: e.to_string(),
                    });
                }
            }
        }

        Ok((History::new(pool, draws)?, skipped))
    }
}
