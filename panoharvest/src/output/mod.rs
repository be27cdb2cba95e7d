//! CSV persistence for panorama metadata and image manifests.
//!
//! The metadata table has one row per accepted record with columns
//! `region,latitude,longitude,pano_id`, ordered exactly as the records
//! were accepted. The image manifest repeats those columns plus the
//! directory each panorama's images were written to.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::acquire::PanoRecord;
use crate::imagery::ManifestEntry;

/// Errors from CSV reading and writing.
#[derive(Debug, Error)]
pub enum OutputError {
    /// CSV serialization or file access failed
    #[error("CSV error for '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Parent directory could not be created
    #[error("Failed to create directory for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn ensure_parent(path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| OutputError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;
        }
    }
    Ok(())
}

/// Writes the metadata table for a batch of accepted records.
pub fn write_metadata_csv(path: &Path, records: &[PanoRecord]) -> Result<(), OutputError> {
    ensure_parent(path)?;

    let csv_err = |e: csv::Error| OutputError::Csv {
        path: path.to_path_buf(),
        source: e,
    };

    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
    for record in records {
        writer.serialize(record).map_err(csv_err)?;
    }
    writer
        .flush()
        .map_err(|e| OutputError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

    info!(path = %path.display(), rows = records.len(), "Wrote metadata CSV");
    Ok(())
}

/// Reads a metadata table back into records, preserving row order.
pub fn read_metadata_csv(path: &Path) -> Result<Vec<PanoRecord>, OutputError> {
    let csv_err = |e: csv::Error| OutputError::Csv {
        path: path.to_path_buf(),
        source: e,
    };

    let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;
    let mut records = Vec::new();
    for result in reader.deserialize() {
        records.push(result.map_err(csv_err)?);
    }
    Ok(records)
}

/// Writes the image manifest for a completed download run.
pub fn write_manifest_csv(path: &Path, entries: &[ManifestEntry]) -> Result<(), OutputError> {
    ensure_parent(path)?;

    let csv_err = |e: csv::Error| OutputError::Csv {
        path: path.to_path_buf(),
        source: e,
    };

    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
    for entry in entries {
        writer.serialize(entry).map_err(csv_err)?;
    }
    writer
        .flush()
        .map_err(|e| OutputError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

    info!(path = %path.display(), rows = entries.len(), "Wrote image manifest");
    Ok(())
}
