use super::traits::{ConfigManifest, ConfigSection, FieldManifest};
use crate::error::DrawkillError;
use crate::types::Pool;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub size: u8,
    pub draw_size: usize,
    pub zones: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        let pool = Pool::default();
        Self {
            size: pool.size,
            draw_size: pool.draw_size,
            zones: pool.zones,
        }
    }
}

impl PoolConfig {
    pub fn to_pool(&self) -> Result<Pool, DrawkillError> {
        Pool::new(self.size, self.draw_size, self.zones)
    }
}

impl ConfigSection for PoolConfig {
    fn section_name() -> &'static str {
        "pool"
    }

    fn validate(&self) -> Result<(), DrawkillError> {
        self.to_pool().map(|_| ())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "Pool".to_string(),
            fields: vec![
                FieldManifest::new(
                    "size",
                    "integer",
                    json!(self.size),
                    Some((1.0, 255.0)),
                    "Largest number in the pool [1, size]",
                ),
                FieldManifest::new(
                    "draw_size",
                    "integer",
                    json!(self.draw_size),
                    Some((1.0, 255.0)),
                    "Distinct numbers per draw",
                ),
                FieldManifest::new(
                    "zones",
                    "integer",
                    json!(self.zones),
                    Some((1.0, 255.0)),
                    "Equal-width magnitude bands used by zone signals and selection",
                ),
            ],
        }
    }
}
