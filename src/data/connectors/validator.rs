use crate::error::{DrawkillError, Result};
use crate::types::{Draw, History, Pool};

pub struct DataValidator;

impl DataValidator {
    /// Parse one `K` comma-separated integers line into a validated draw
    pub fn parse_line(line: &str, pool: &Pool) -> Result<Draw> {
        let numbers = line
            .split(',')
            .map(|field| {
                let field = field.trim();
                field.parse::<u8>().map_err(|_| {
                    DrawkillError::DataLoading(format!("'{}' is not a pool number", field))
                })
            })
            .collect::<Result<Vec<u8>>>()?;

        Self::validate_draw(numbers, pool)
    }

    /// Check size, bounds and distinctness
    pub fn validate_draw(numbers: Vec<u8>, pool: &Pool) -> Result<Draw> {
        Draw::new(numbers, pool)
    }

    /// Check for minimum required rows
    pub fn validate_minimum_rows(history: &History, min_rows: usize) -> Result<()> {
        if history.len() < min_rows {
            return Err(DrawkillError::InsufficientHistory {
                required: min_rows,
                actual: history.len(),
            });
        }
        Ok(())
    }
}
