//! Configuration types for mnemonic-wallet
//!
//! Controls where the encrypted wallet store lives and how its encryption
//! key is stretched.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default PBKDF2-HMAC-SHA256 iterations for the store key (OWASP 2023)
pub const DEFAULT_KDF_ITERATIONS: u32 = 600_000;

/// Default store file name
pub const DEFAULT_STORE_FILE: &str = "wallet_secure_store.json";

/// Global wallet configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Optional custom store directory
    #[serde(default)]
    pub store_dir: Option<String>,

    /// File name of the encrypted store inside the store directory
    #[serde(default = "default_store_file")]
    pub store_file: String,

    /// PBKDF2 iterations used when a new store is created
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,
}

fn default_store_file() -> String {
    DEFAULT_STORE_FILE.to_string()
}

fn default_kdf_iterations() -> u32 {
    DEFAULT_KDF_ITERATIONS
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            store_dir: None,
            store_file: default_store_file(),
            kdf_iterations: DEFAULT_KDF_ITERATIONS,
        }
    }
}

impl WalletConfig {
    /// Resolve the full path of the encrypted store file
    ///
    /// Returns: `<store_dir>/<store_file>` or `~/.mnemonic-wallet/store/<store_file>`
    pub fn store_path(&self) -> Result<PathBuf, ConfigError> {
        let dir = match &self.store_dir {
            Some(dir) => PathBuf::from(dir),
            None => default_store_dir()?,
        };
        Ok(dir.join(&self.store_file))
    }

    /// Reject values that cannot produce a usable store
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.kdf_iterations == 0 {
            return Err(ConfigError::Invalid(
                "kdf_iterations must be at least 1".to_string(),
            ));
        }
        if self.store_file.trim().is_empty() {
            return Err(ConfigError::Invalid("store_file must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Config directory not found")]
    DirectoryNotFound,
}

/// Configuration overrides from the caller or environment variables
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub store_dir: Option<String>,
    pub store_file: Option<String>,
    pub kdf_iterations: Option<u32>,
}

impl ConfigOverrides {
    /// Create empty overrides
    pub fn new() -> Self {
        Self::default()
    }

    /// Create overrides from `WALLET_STORE_DIR`, `WALLET_STORE_FILE` and
    /// `WALLET_KDF_ITERATIONS`
    ///
    /// Unparseable iteration counts are ignored.
    pub fn from_env() -> Self {
        Self {
            store_dir: std::env::var("WALLET_STORE_DIR").ok(),
            store_file: std::env::var("WALLET_STORE_FILE").ok(),
            kdf_iterations: std::env::var("WALLET_KDF_ITERATIONS")
                .ok()
                .and_then(|s| s.parse().ok()),
        }
    }

    /// Merge with another set of overrides (other takes precedence)
    pub fn merge(mut self, other: Self) -> Self {
        if other.store_dir.is_some() {
            self.store_dir = other.store_dir;
        }
        if other.store_file.is_some() {
            self.store_file = other.store_file;
        }
        if other.kdf_iterations.is_some() {
            self.kdf_iterations = other.kdf_iterations;
        }
        self
    }
}

/// Get the default configuration directory path
///
/// Returns: `~/.mnemonic-wallet/`
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(".mnemonic-wallet"))
        .ok_or(ConfigError::DirectoryNotFound)
}

/// Get the default configuration file path
///
/// Returns: `~/.mnemonic-wallet/config.json`
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    Ok(default_config_dir()?.join("config.json"))
}

/// Get the default store directory
///
/// Returns: `~/.mnemonic-wallet/store/`
pub fn default_store_dir() -> Result<PathBuf, ConfigError> {
    Ok(default_config_dir()?.join("store"))
}

/// Load configuration from file with overrides
///
/// # Priority (highest to lowest):
/// 1. Caller overrides (passed as argument)
/// 2. Environment variables
/// 3. Config file
/// 4. Defaults
///
/// # Example
///
/// ```ignore
/// use mnemonic_wallet::config::{load_config, ConfigOverrides};
///
/// let mut overrides = ConfigOverrides::new();
/// overrides.kdf_iterations = Some(100_000);
///
/// let config = load_config(None, overrides)?;
/// ```
pub fn load_config(
    config_path: Option<&Path>,
    overrides: ConfigOverrides,
) -> Result<WalletConfig, ConfigError> {
    let overrides = ConfigOverrides::from_env().merge(overrides);
    load_config_with(config_path, overrides)
}

/// Load configuration applying only the given overrides (no environment)
pub fn load_config_with(
    config_path: Option<&Path>,
    overrides: ConfigOverrides,
) -> Result<WalletConfig, ConfigError> {
    let path = match config_path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };

    let mut config = if path.exists() {
        let contents = std::fs::read_to_string(&path)?;
        serde_json::from_str(&contents)?
    } else {
        WalletConfig::default()
    };

    apply_overrides(&mut config, overrides);
    config.validate()?;

    Ok(config)
}

/// Save configuration to file
///
/// Creates parent directories if they don't exist.
pub fn save_config(config: &WalletConfig, config_path: Option<&Path>) -> Result<(), ConfigError> {
    let path = match config_path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(&path, json)?;

    Ok(())
}

fn apply_overrides(config: &mut WalletConfig, overrides: ConfigOverrides) {
    if let Some(store_dir) = overrides.store_dir {
        config.store_dir = Some(store_dir);
    }
    if let Some(store_file) = overrides.store_file {
        config.store_file = store_file;
    }
    if let Some(iterations) = overrides.kdf_iterations {
        config.kdf_iterations = iterations;
    }
}
