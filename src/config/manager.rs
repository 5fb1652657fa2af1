use super::{
    capture::CaptureConfig,
    driver::DriverConfig,
    environment::EnvironmentConfig,
    evolution::EvolutionConfig,
    observer::ObserverConfig,
    traits::ConfigSection,
};
use crate::error::QwopEvolveError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

/// Prefix for environment overrides, e.g. `QWOPEVOLVE__OBSERVER__POLL_INTERVAL_MS=2000`.
pub const ENV_PREFIX: &str = "QWOPEVOLVE";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default `env_logger` filter; `RUST_LOG` wins when set.
    pub log_level: String,
    pub best_log_path: PathBuf,
    pub evolution: EvolutionConfig,
    pub observer: ObserverConfig,
    pub environment: EnvironmentConfig,
    pub capture: CaptureConfig,
    pub driver: DriverConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            best_log_path: PathBuf::from("best.txt"),
            evolution: EvolutionConfig::default(),
            observer: ObserverConfig::default(),
            environment: EnvironmentConfig::default(),
            capture: CaptureConfig::default(),
            driver: DriverConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), QwopEvolveError> {
        if self.best_log_path.as_os_str().is_empty() {
            return Err(QwopEvolveError::Configuration(
                "best_log_path must not be empty".to_string(),
            ));
        }
        self.evolution.validate()?;
        self.observer.validate()?;
        self.environment.validate()?;
        self.capture.validate()?;
        self.driver.validate()?;
        Ok(())
    }
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    /// Load defaults overlaid with an optional TOML file, then environment overrides.
    pub fn load(&self, path: Option<&Path>) -> Result<(), QwopEvolveError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            if !path.exists() {
                return Err(QwopEvolveError::Configuration(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(
                config::File::from(path).format(config::FileFormat::Toml),
            );
        }
        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;

        *self.config.write().unwrap_or_else(PoisonError::into_inner) = config;
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), QwopEvolveError> {
        self.load(Some(path.as_ref()))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), QwopEvolveError> {
        let config = self.get();
        let toml_str = toml::to_string_pretty(&config)?;
        std::fs::write(path, toml_str)?;
        Ok(())
    }

    pub fn get(&self) -> AppConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Apply `f` to a copy and keep it only if the result validates.
    pub fn update<F>(&self, f: F) -> Result<(), QwopEvolveError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut candidate = self.get();
        f(&mut candidate);
        candidate.validate()?;
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = candidate;
        Ok(())
    }
}
