use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use csv::ReaderBuilder;
use log::{debug, info, warn};
use walkdir::WalkDir;

use crate::utils::file_utils;

/// Zero-indexed CSV column holding the access point hardware address
pub const CSV_COL_MAC_ADDRESS: usize = 4;

/// Count distinct access points recorded in a serialized scan file.
///
/// The header row is skipped, rows shorter than the MAC column and rows
/// with an empty MAC field are ignored. Failure to open the file is the
/// only error.
pub fn count_unique_aps(csv_file: impl AsRef<Path>) -> Result<usize> {
    let csv_file = csv_file.as_ref();
    debug!("Counting unique access points in {}", csv_file.display());

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(csv_file)
        .with_context(|| format!("Error opening file: {}", csv_file.display()))?;

    let mut unique_macs: HashSet<String> = HashSet::new();
    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!("Skipping unreadable row in {}: {}", csv_file.display(), e);
                continue;
            }
        };

        if let Some(mac) = record.get(CSV_COL_MAC_ADDRESS) {
            if !mac.is_empty() {
                unique_macs.insert(mac.to_string());
            }
        }
    }

    Ok(unique_macs.len())
}

/// Count unique access points for every CSV file directly inside a
/// directory. Files that cannot be counted are logged and skipped;
/// results are sorted by path.
pub fn count_unique_aps_in_dir(dir: impl AsRef<Path>) -> Result<Vec<(PathBuf, usize)>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        bail!("Processed files directory not found: {}", dir.display());
    }

    let mut counts = Vec::new();
    for entry in WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        if !file_utils::has_extension(path, "csv") {
            continue;
        }

        match count_unique_aps(path) {
            Ok(count) => {
                info!(
                    "Number of unique access points in {}: {}",
                    path.file_name().unwrap_or_default().to_string_lossy(),
                    count
                );
                counts.push((path.to_path_buf(), count));
            }
            Err(e) => warn!("{:#}", e),
        }
    }

    counts.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(counts)
}
