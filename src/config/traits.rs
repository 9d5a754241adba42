use crate::error::DrawkillError;
use serde::{Deserialize, Serialize};

/// Trait for configuration sections
pub trait ConfigSection: Serialize + for<'de> Deserialize<'de> + Default + Clone {
    fn section_name() -> &'static str;
    fn validate(&self) -> Result<(), DrawkillError>;
    fn to_manifest(&self) -> ConfigManifest;
}

/// Configuration manifest used for `--describe` output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigManifest {
    pub section: String,
    pub fields: Vec<FieldManifest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldManifest {
    pub name: String,
    pub field_type: String,
    pub default: serde_json::Value,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub description: String,
}

impl FieldManifest {
    pub fn new(
        name: &str,
        field_type: &str,
        default: serde_json::Value,
        range: Option<(f64, f64)>,
        description: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            field_type: field_type.to_string(),
            default,
            min: range.map(|r| r.0),
            max: range.map(|r| r.1),
            description: description.to_string(),
        }
    }
}

pub(crate) fn check_fraction(name: &str, value: f64) -> Result<(), DrawkillError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(DrawkillError::Configuration(format!(
            "{} must be between 0 and 1, got {}",
            name, value
        )));
    }
    Ok(())
}

pub(crate) fn check_positive(name: &str, value: usize) -> Result<(), DrawkillError> {
    if value == 0 {
        return Err(DrawkillError::Configuration(format!(
            "{} must be at least 1",
            name
        )));
    }
    Ok(())
}
