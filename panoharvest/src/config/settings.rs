//! Configuration settings structs.

use std::path::PathBuf;
use std::time::Duration;

use super::defaults::*;
use crate::acquire::AcquireConfig;
use crate::imagery::ImageSize;

/// Complete user configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub lookup: LookupSettings,
    pub acquire: AcquireSettings,
    pub regions: RegionSettings,
    pub images: ImageSettings,
    pub logging: LoggingSettings,
}

/// `[lookup]` section: panorama metadata service access.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupSettings {
    /// File holding the Maps Platform API key (first line, trimmed)
    pub api_key_file: Option<PathBuf>,
    /// Search radius per candidate in meters
    pub radius_m: u32,
}

/// `[acquire]` section: acquisition loop tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct AcquireSettings {
    /// Unique panoramas to acquire per region
    pub quota: usize,
    /// Bounding-box samples per batch
    pub batch_size: usize,
    /// Consecutive candidates without acceptance before giving up
    pub stall_ceiling: usize,
    /// Minimum milliseconds between lookup requests
    pub min_request_interval_ms: u64,
    /// Backoff base delay after transient errors, in milliseconds
    pub retry_base_delay_ms: u64,
}

/// `[regions]` section: boundary file access.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionSettings {
    /// GeoJSON FeatureCollection of region boundaries
    pub boundaries_file: Option<PathBuf>,
    /// Feature property carrying the region name
    pub name_property: String,
}

/// `[images]` section: directional image download.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSettings {
    /// Requested image dimensions
    pub size: ImageSize,
    /// Root directory for downloaded images
    pub output_dir: PathBuf,
    /// Attempts per image before skipping the panorama
    pub max_retries: u32,
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            lookup: LookupSettings {
                api_key_file: None,
                radius_m: DEFAULT_RADIUS_M,
            },
            acquire: AcquireSettings {
                quota: DEFAULT_QUOTA,
                batch_size: DEFAULT_BATCH_SIZE,
                stall_ceiling: DEFAULT_STALL_CEILING,
                min_request_interval_ms: DEFAULT_MIN_REQUEST_INTERVAL_MS,
                retry_base_delay_ms: DEFAULT_RETRY_BASE_DELAY_MS,
            },
            regions: RegionSettings {
                boundaries_file: None,
                name_property: DEFAULT_NAME_PROPERTY.to_string(),
            },
            images: ImageSettings {
                size: DEFAULT_IMAGE_SIZE,
                output_dir: PathBuf::from(DEFAULT_IMAGE_OUTPUT_DIR),
                max_retries: DEFAULT_IMAGE_MAX_RETRIES,
            },
            logging: LoggingSettings {
                file: PathBuf::from(DEFAULT_LOG_FILE),
            },
        }
    }
}

impl AcquireSettings {
    /// Builds the acquisition loop configuration from these settings.
    pub fn to_acquire_config(&self, radius_m: u32) -> AcquireConfig {
        AcquireConfig::default()
            .with_batch_size(self.batch_size)
            .with_radius_m(radius_m)
            .with_stall_ceiling(self.stall_ceiling)
            .with_min_request_interval(Duration::from_millis(self.min_request_interval_ms))
            .with_retry_base_delay(Duration::from_millis(self.retry_base_delay_ms))
    }
}
