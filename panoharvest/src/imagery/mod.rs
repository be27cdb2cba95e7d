//! Directional panorama imagery download
//!
//! For every accepted panorama record, four images are fetched facing the
//! cardinal headings (0, 90, 180, 270 degrees) and written under a
//! per-region directory tree:
//!
//! ```text
//! <output_dir>/<region>/<NNNN>/N.jpg
//!                             /E.jpg
//!                             /S.jpg
//!                             /W.jpg
//! ```
//!
//! Image bytes are persisted exactly as the service returns them; no
//! decoding or re-encoding happens here.

mod fetcher;
mod store;

pub use fetcher::{Heading, ImageFetcher, ImageSize, ImageryError, DEFAULT_IMAGE_SIZE};
pub use store::{download_all, ImageStore, ManifestEntry};
