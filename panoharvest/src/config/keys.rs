//! Configuration key access and validation.
//!
//! Provides a type-safe interface for getting and setting configuration
//! values by key name, used by the `config get|set|list` CLI subcommands.

use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use super::settings::ConfigFile;
use crate::imagery::ImageSize;

/// Errors that can occur when getting or setting configuration values.
#[derive(Debug, Error)]
pub enum ConfigKeyError {
    /// Unknown configuration key.
    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),

    /// Validation failed for the value.
    #[error("Invalid value for {key}: {reason}")]
    ValidationFailed { key: String, reason: String },
}

/// Supported configuration keys.
///
/// Each key maps to a specific field in [`ConfigFile`] and knows how to
/// get and set its value with proper validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    // Lookup settings
    LookupApiKeyFile,
    LookupRadiusM,

    // Acquisition settings
    AcquireQuota,
    AcquireBatchSize,
    AcquireStallCeiling,
    AcquireMinRequestIntervalMs,
    AcquireRetryBaseDelayMs,

    // Region settings
    RegionsBoundariesFile,
    RegionsNameProperty,

    // Image settings
    ImagesSize,
    ImagesOutputDir,
    ImagesMaxRetries,

    // Logging settings
    LoggingFile,
}

impl FromStr for ConfigKey {
    type Err = ConfigKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lookup.api_key_file" => Ok(ConfigKey::LookupApiKeyFile),
            "lookup.radius_m" => Ok(ConfigKey::LookupRadiusM),

            "acquire.quota" => Ok(ConfigKey::AcquireQuota),
            "acquire.batch_size" => Ok(ConfigKey::AcquireBatchSize),
            "acquire.stall_ceiling" => Ok(ConfigKey::AcquireStallCeiling),
            "acquire.min_request_interval_ms" => Ok(ConfigKey::AcquireMinRequestIntervalMs),
            "acquire.retry_base_delay_ms" => Ok(ConfigKey::AcquireRetryBaseDelayMs),

            "regions.boundaries_file" => Ok(ConfigKey::RegionsBoundariesFile),
            "regions.name_property" => Ok(ConfigKey::RegionsNameProperty),

            "images.size" => Ok(ConfigKey::ImagesSize),
            "images.output_dir" => Ok(ConfigKey::ImagesOutputDir),
            "images.max_retries" => Ok(ConfigKey::ImagesMaxRetries),

            "logging.file" => Ok(ConfigKey::LoggingFile),

            _ => Err(ConfigKeyError::UnknownKey(s.to_string())),
        }
    }
}

impl ConfigKey {
    /// All keys in display order for `config list`.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::LookupApiKeyFile,
            ConfigKey::LookupRadiusM,
            ConfigKey::AcquireQuota,
            ConfigKey::AcquireBatchSize,
            ConfigKey::AcquireStallCeiling,
            ConfigKey::AcquireMinRequestIntervalMs,
            ConfigKey::AcquireRetryBaseDelayMs,
            ConfigKey::RegionsBoundariesFile,
            ConfigKey::RegionsNameProperty,
            ConfigKey::ImagesSize,
            ConfigKey::ImagesOutputDir,
            ConfigKey::ImagesMaxRetries,
            ConfigKey::LoggingFile,
        ]
    }

    /// Get the canonical key name (e.g., "acquire.batch_size").
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::LookupApiKeyFile => "lookup.api_key_file",
            ConfigKey::LookupRadiusM => "lookup.radius_m",
            ConfigKey::AcquireQuota => "acquire.quota",
            ConfigKey::AcquireBatchSize => "acquire.batch_size",
            ConfigKey::AcquireStallCeiling => "acquire.stall_ceiling",
            ConfigKey::AcquireMinRequestIntervalMs => "acquire.min_request_interval_ms",
            ConfigKey::AcquireRetryBaseDelayMs => "acquire.retry_base_delay_ms",
            ConfigKey::RegionsBoundariesFile => "regions.boundaries_file",
            ConfigKey::RegionsNameProperty => "regions.name_property",
            ConfigKey::ImagesSize => "images.size",
            ConfigKey::ImagesOutputDir => "images.output_dir",
            ConfigKey::ImagesMaxRetries => "images.max_retries",
            ConfigKey::LoggingFile => "logging.file",
        }
    }

    /// Get the value from a config file as a string.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::LookupApiKeyFile => config
                .lookup
                .api_key_file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            ConfigKey::LookupRadiusM => config.lookup.radius_m.to_string(),
            ConfigKey::AcquireQuota => config.acquire.quota.to_string(),
            ConfigKey::AcquireBatchSize => config.acquire.batch_size.to_string(),
            ConfigKey::AcquireStallCeiling => config.acquire.stall_ceiling.to_string(),
            ConfigKey::AcquireMinRequestIntervalMs => {
                config.acquire.min_request_interval_ms.to_string()
            }
            ConfigKey::AcquireRetryBaseDelayMs => config.acquire.retry_base_delay_ms.to_string(),
            ConfigKey::RegionsBoundariesFile => config
                .regions
                .boundaries_file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            ConfigKey::RegionsNameProperty => config.regions.name_property.clone(),
            ConfigKey::ImagesSize => config.images.size.to_string(),
            ConfigKey::ImagesOutputDir => config.images.output_dir.display().to_string(),
            ConfigKey::ImagesMaxRetries => config.images.max_retries.to_string(),
            ConfigKey::LoggingFile => config.logging.file.display().to_string(),
        }
    }

    /// Set the value in a config file, validating the input string.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigKeyError> {
        let value = value.trim();
        match self {
            ConfigKey::LookupApiKeyFile => {
                config.lookup.api_key_file = Some(PathBuf::from(self.non_empty(value)?));
            }
            ConfigKey::LookupRadiusM => {
                config.lookup.radius_m = self.positive(value)?;
            }
            ConfigKey::AcquireQuota => {
                config.acquire.quota = self.positive(value)?;
            }
            ConfigKey::AcquireBatchSize => {
                config.acquire.batch_size = self.positive(value)?;
            }
            ConfigKey::AcquireStallCeiling => {
                config.acquire.stall_ceiling = self.positive(value)?;
            }
            ConfigKey::AcquireMinRequestIntervalMs => {
                config.acquire.min_request_interval_ms = self.number(value)?;
            }
            ConfigKey::AcquireRetryBaseDelayMs => {
                config.acquire.retry_base_delay_ms = self.number(value)?;
            }
            ConfigKey::RegionsBoundariesFile => {
                config.regions.boundaries_file = Some(PathBuf::from(self.non_empty(value)?));
            }
            ConfigKey::RegionsNameProperty => {
                config.regions.name_property = self.non_empty(value)?.to_string();
            }
            ConfigKey::ImagesSize => {
                config.images.size = value.parse::<ImageSize>().map_err(|e| {
                    ConfigKeyError::ValidationFailed {
                        key: self.name().to_string(),
                        reason: e.to_string(),
                    }
                })?;
            }
            ConfigKey::ImagesOutputDir => {
                config.images.output_dir = PathBuf::from(self.non_empty(value)?);
            }
            ConfigKey::ImagesMaxRetries => {
                config.images.max_retries = self.positive(value)?;
            }
            ConfigKey::LoggingFile => {
                config.logging.file = PathBuf::from(self.non_empty(value)?);
            }
        }
        Ok(())
    }

    fn non_empty<'a>(&self, value: &'a str) -> Result<&'a str, ConfigKeyError> {
        if value.is_empty() {
            return Err(ConfigKeyError::ValidationFailed {
                key: self.name().to_string(),
                reason: "value must not be empty".to_string(),
            });
        }
        Ok(value)
    }

    fn number<T: FromStr>(&self, value: &str) -> Result<T, ConfigKeyError> {
        value.parse().map_err(|_| ConfigKeyError::ValidationFailed {
            key: self.name().to_string(),
            reason: format!("'{}' is not a valid number", value),
        })
    }

    fn positive<T: FromStr + PartialOrd + Default>(
        &self,
        value: &str,
    ) -> Result<T, ConfigKeyError> {
        let parsed: T = self.number(value)?;
        if parsed <= T::default() {
            return Err(ConfigKeyError::ValidationFailed {
                key: self.name().to_string(),
                reason: format!("'{}' must be positive", value),
            });
        }
        Ok(parsed)
    }
}
