//! CSV export of an extraction result.
//!
//! One `field,value` row per entry, no header, UTF-8, in the result's order.
//! Files are named `marked_judgment_<YYYYMMDDHHMMSS>.csv` and are never
//! overwritten: a second export in the same second gets a `_<n>` suffix.

use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use judgmark_core::ExtractionResult;
use tracing::info;

use crate::StoreError;

pub const EXPORT_PREFIX: &str = "marked_judgment_";

/// `marked_judgment_<YYYYMMDDHHMMSS>.csv`, or `..._<n>.csv` when `attempt > 0`.
pub fn export_file_name(at: &DateTime<Local>, attempt: u32) -> String {
    let stamp = at.format("%Y%m%d%H%M%S");
    if attempt == 0 {
        format!("{EXPORT_PREFIX}{stamp}.csv")
    } else {
        format!("{EXPORT_PREFIX}{stamp}_{attempt}.csv")
    }
}

/// Write `result` to a fresh CSV file in `dir` and return its path.
pub fn write_csv(result: &ExtractionResult, dir: &Path) -> Result<PathBuf, StoreError> {
    if !dir.is_dir() {
        return Err(StoreError::ExportDirNotFound(dir.to_path_buf()));
    }

    let (path, file) = create_unique(dir, &Local::now())?;
    let mut writer = csv::Writer::from_writer(file);
    for (field, value) in result.iter() {
        writer.write_record([field, value])?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = result.len(), "exported extraction result");
    Ok(path)
}

fn create_unique(dir: &Path, at: &DateTime<Local>) -> Result<(PathBuf, File), StoreError> {
    let mut attempt = 0;
    loop {
        let path = dir.join(export_file_name(at, attempt));
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => return Err(e.into()),
        }
    }
}
