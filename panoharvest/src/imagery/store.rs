//! Image directory layout and bulk download.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use super::fetcher::{Heading, ImageFetcher, ImageryError};
use crate::acquire::PanoRecord;
use crate::lookup::HttpClient;

/// Manifest row for one downloaded panorama.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManifestEntry {
    pub region: String,
    pub latitude: f64,
    pub longitude: f64,
    pub pano_id: String,
    /// Directory the four directional images were written to
    pub path: String,
}

/// Writes directional images under a per-region directory tree.
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    /// Creates a store rooted at `root`. Directories are created lazily.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory for a record: `<root>/<region>/<NNNN>`.
    pub fn panorama_dir(&self, region: &str, index: usize) -> PathBuf {
        self.root.join(region).join(format!("{:04}", index))
    }

    /// Writes one panorama's images to its directory.
    ///
    /// Returns the directory the images were written to.
    pub fn save(
        &self,
        region: &str,
        index: usize,
        images: &[(Heading, Vec<u8>)],
    ) -> Result<PathBuf, ImageryError> {
        let dir = self.panorama_dir(region, index);
        fs::create_dir_all(&dir).map_err(|e| ImageryError::Io {
            path: dir.clone(),
            source: e,
        })?;

        for (heading, data) in images {
            let file = dir.join(format!("{}.jpg", heading.letter()));
            fs::write(&file, data).map_err(|e| ImageryError::Io {
                path: file.clone(),
                source: e,
            })?;
        }

        Ok(dir)
    }
}

/// Downloads and stores imagery for every record.
///
/// Records are processed in order with a per-region index counter, so the
/// directory numbering matches each record's position within its region.
/// A panorama whose download fails after retries is skipped with a warning
/// rather than aborting the run; storage errors abort, since they indicate
/// the output location itself is unusable.
pub fn download_all<C: HttpClient>(
    fetcher: &ImageFetcher<C>,
    store: &ImageStore,
    records: &[PanoRecord],
) -> Result<Vec<ManifestEntry>, ImageryError> {
    let mut entries = Vec::with_capacity(records.len());
    let mut region_index: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let index = region_index.entry(record.region.as_str()).or_insert(0);
        let current = *index;
        *index += 1;

        let images = match fetcher.fetch_panorama(&record.pano_id) {
            Ok(images) => images,
            Err(e @ ImageryError::Fetch { .. }) => {
                warn!(
                    region = record.region.as_str(),
                    pano_id = record.pano_id.as_str(),
                    error = %e,
                    "Skipping panorama after failed downloads"
                );
                continue;
            }
            Err(e) => return Err(e),
        };

        let dir = store.save(&record.region, current, &images)?;
        entries.push(ManifestEntry {
            region: record.region.clone(),
            latitude: record.latitude,
            longitude: record.longitude,
            pano_id: record.pano_id.clone(),
            path: path_to_string(&dir),
        });
    }

    info!(
        downloaded = entries.len(),
        skipped = records.len() - entries.len(),
        "Imagery download complete"
    );

    Ok(entries)
}

fn path_to_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
