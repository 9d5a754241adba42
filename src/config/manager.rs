use super::{
    ensemble::EnsembleConfig,
    forward::ForwardConfig,
    pool::PoolConfig,
    protection::ProtectionConfig,
    strategies::StrategyConfig,
    traits::{ConfigManifest, ConfigSection},
};
use crate::error::DrawkillError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

/// Prefix of environment overrides, e.g. `DRAWKILL__ENSEMBLE__SELECTION_SIZE=12`.
pub const ENV_PREFIX: &str = "DRAWKILL";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub pool: PoolConfig,
    pub strategies: StrategyConfig,
    pub protection: ProtectionConfig,
    pub ensemble: EnsembleConfig,
    pub forward: ForwardConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), DrawkillError> {
        self.pool.validate()?;
        self.strategies.validate()?;
        self.protection.validate()?;
        self.ensemble.validate()?;
        self.forward.validate()?;
        Ok(())
    }

    pub fn manifests(&self) -> Vec<ConfigManifest> {
        vec![
            self.pool.to_manifest(),
            self.strategies.to_manifest(),
            self.protection.to_manifest(),
            self.ensemble.to_manifest(),
            self.forward.to_manifest(),
        ]
    }
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    /// Layers the TOML file under `DRAWKILL__*` environment overrides.
    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), DrawkillError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).format(config::FileFormat::Toml))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| DrawkillError::Configuration(format!("Failed to read config: {}", e)))?;

        let config: AppConfig = settings
            .try_deserialize()
            .map_err(|e| DrawkillError::Configuration(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        log::debug!("Loaded configuration from {}", path.as_ref().display());

        *self.config.write().unwrap_or_else(PoisonError::into_inner) = config;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), DrawkillError> {
        let config = self.get();
        let toml_str = toml::to_string_pretty(&config)
            .map_err(|e| DrawkillError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)
            .map_err(|e| DrawkillError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn get(&self) -> AppConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Applies `f` to a copy and only commits it if the result validates.
    pub fn update<F>(&self, f: F) -> Result<(), DrawkillError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
        let mut candidate = config.clone();
        f(&mut candidate);
        candidate.validate()?;
        *config = candidate;
        Ok(())
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(AppConfig::default().validate().is_ok());
        assert_eq!(AppConfig::default().manifests().len(), 5);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "[ensemble]\nselection_size = 8\n\n[strategies.neighbor]\nmin_samples = 6\n").unwrap();

        let manager = ConfigManager::new();
        manager.load_from_file(&path).unwrap();
        let config = manager.get();

        assert_eq!(config.ensemble.selection_size, 8);
        assert_eq!(config.ensemble.zone_cap, 3);
        assert_eq!(config.strategies.neighbor.min_samples, 6);
        assert_eq!(config.strategies.neighbor.max_follow_rate, 0.15);
        assert_eq!(config.pool.size, 49);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roundtrip.toml");
        let manager = ConfigManager::new();
        manager
            .update(|c| c.protection.discount_floor = 0.1)
            .unwrap();
        manager.save_to_file(&path).unwrap();

        let reloaded = ConfigManager::new();
        reloaded.load_from_file(&path).unwrap();

        assert_eq!(reloaded.get(), manager.get());
    }

    #[test]
    fn test_invalid_update_is_not_committed() {
        let manager = ConfigManager::new();
        let result = manager.update(|c| c.ensemble.selection_size = 0);
        assert!(result.is_err());
        assert_eq!(manager.get().ensemble.selection_size, 10);
    }
}
