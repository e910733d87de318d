//! Application configuration: `tradelog.toml`.
//!
//! ```toml
//! [store]
//! path = "/home/me/.local/share/tradelog/backtests.jsonl"
//!
//! [session]
//! owner = "alice"
//!
//! [display]
//! currency = "USD"
//! page_size = 10
//!
//! [risk]
//! loss_streak = 3
//! ```
//!
//! Every section and key is optional; anything missing takes its default.

use std::fmt;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use tradelog_core::engine::DEFAULT_LOSS_STREAK;

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = "tradelog.toml";

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Errors from loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub session: SessionConfig,
    pub display: DisplayConfig,
    pub risk: RiskConfig,
}

/// Where the journal file lives. `None` means the platform data directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub owner: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub currency: Currency,
    pub page_size: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency: Currency::default(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl DisplayConfig {
    /// History page size; falls back to the default when zero.
    pub fn page_size(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.page_size)
            .or(NonZeroUsize::new(DEFAULT_PAGE_SIZE))
            .unwrap_or(NonZeroUsize::MIN)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Consecutive losses that raise the warning. 0 disables it.
    pub loss_streak: usize,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            loss_streak: DEFAULT_LOSS_STREAK,
        }
    }
}

/// Display currency for amounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Idr,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Idr => "IDR",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Idr => "Rp",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "IDR" => Ok(Currency::Idr),
            other => Err(ConfigError::Invalid(format!("unknown currency '{other}'"))),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`from_file`](Self::from_file), but a missing file yields defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match Self::from_file(path) {
            Err(ConfigError::Io { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.display.page_size == 0 {
            return Err(ConfigError::Invalid(
                "display.page_size must be at least 1".into(),
            ));
        }
        if let Some(owner) = &self.session.owner {
            if owner.trim().is_empty() {
                return Err(ConfigError::Invalid("session.owner must not be blank".into()));
            }
        }
        Ok(())
    }

    /// Serialize back to TOML, as printed by `tradelog config`.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
