use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{WalletError, WalletResult};
use crate::storage::{ChecksummedFile, StorePaths};

const CONFIG_VERSION: u16 = 1;

/// Environment variable naming the active deployment.
pub const ENVIRONMENT_VAR: &str = "TRADING_WALLET_ENV";

/// Grants made by `connect_auto_sign` last three days.
pub const DEFAULT_AUTO_SIGN_EXPIRATION_SECS: i64 = 60 * 60 * 24 * 3;
/// Used by `validate_auto_sign` when the stored session has no duration.
pub const DEFAULT_AUTO_SIGN_FALLBACK_SECS: i64 = 3600;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NetworkConfig {
    pub chain_id: String,
    pub is_devnet: bool,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            chain_id: "injective-1".to_string(),
            is_devnet: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AutoSignConfig {
    pub grant_expiration_secs: i64,
    pub fallback_duration_secs: i64,
}

impl Default for AutoSignConfig {
    fn default() -> Self {
        Self {
            grant_expiration_secs: DEFAULT_AUTO_SIGN_EXPIRATION_SECS,
            fallback_duration_secs: DEFAULT_AUTO_SIGN_FALLBACK_SECS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreConfig {
    pub network: NetworkConfig,
    pub auto_sign: AutoSignConfig,
    pub environment: String,
    pub last_updated: DateTime<Utc>,
    pub version: u16,
}

impl StoreConfig {
    pub fn new(environment: impl Into<String>) -> Self {
        Self {
            network: NetworkConfig::default(),
            auto_sign: AutoSignConfig::default(),
            environment: environment.into(),
            last_updated: Utc::now(),
            version: CONFIG_VERSION,
        }
    }

    pub fn touch(&mut self) {
        self.last_updated = Utc::now();
    }

    pub fn validate(&self) -> WalletResult<()> {
        if self.network.chain_id.trim().is_empty() {
            return Err(WalletError::ValidationError(
                "Chain id cannot be empty".to_string(),
            ));
        }
        if self.auto_sign.grant_expiration_secs <= 0 || self.auto_sign.fallback_duration_secs <= 0
        {
            return Err(WalletError::ValidationError(
                "Auto-sign durations must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(environment_from_env())
    }
}

/// The deployment named by [`ENVIRONMENT_VAR`], `development` when unset.
pub fn environment_from_env() -> String {
    std::env::var(ENVIRONMENT_VAR).unwrap_or_else(|_| "development".to_string())
}

/// Handles persistence of store configuration with integrity checks.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    file: ChecksummedFile<StoreConfig>,
}

impl ConfigStore {
    pub fn from_paths(paths: &StorePaths) -> Self {
        Self::new(paths.config_file())
    }

    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            file: ChecksummedFile::new(path, CONFIG_VERSION),
        }
    }

    pub fn load_or_default(&self, environment: impl Into<String>) -> WalletResult<StoreConfig> {
        match self.file.load()? {
            Some(config) => Ok(config),
            None => {
                let config = StoreConfig::new(environment);
                self.save(&config)?;
                Ok(config)
            }
        }
    }

    pub fn save(&self, config: &StoreConfig) -> WalletResult<()> {
        config.validate()?;
        let mut payload = config.clone();
        payload.touch();
        self.file.save(&payload)
    }

    pub fn update<F>(
        &self,
        environment: impl Into<String>,
        updater: F,
    ) -> WalletResult<StoreConfig>
    where
        F: FnOnce(&mut StoreConfig) -> WalletResult<()>,
    {
        let mut config = self.load_or_default(environment)?;
        updater(&mut config)?;
        config.touch();
        self.save(&config)?;
        Ok(config)
    }

    pub fn path(&self) -> PathBuf {
        self.file.path().to_path_buf()
    }
}
