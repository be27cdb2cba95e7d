//! Default values for all configuration settings.
//!
//! Loop and sampler defaults are defined next to their components and
//! re-exported here so the config file, the CLI, and the components can
//! never disagree.

pub use crate::acquire::{DEFAULT_RADIUS_M, DEFAULT_RETRY_BASE_DELAY_MS, DEFAULT_STALL_CEILING};
pub use crate::imagery::DEFAULT_IMAGE_SIZE;
pub use crate::region::DEFAULT_NAME_PROPERTY;
pub use crate::sampler::DEFAULT_BATCH_SIZE;

/// Default per-region quota of unique panoramas.
pub const DEFAULT_QUOTA: usize = 1000;

/// Default minimum spacing between lookup requests (0 = unpaced).
pub const DEFAULT_MIN_REQUEST_INTERVAL_MS: u64 = 0;

/// Default attempts per directional image.
pub const DEFAULT_IMAGE_MAX_RETRIES: u32 = 3;

/// Default image output directory.
pub const DEFAULT_IMAGE_OUTPUT_DIR: &str = "data/images";

/// Default log file path.
pub const DEFAULT_LOG_FILE: &str = "logs/panoharvest.log";
