use std::path::Path;

use anyhow::Result;
use chrono::Utc;
use log::{debug, info};

use crate::scan::types::BatchResult;
use crate::utils::hash_utils;

use super::storage::ManifestStorage;
use super::types::{ManifestEntry, ManifestStats, RunManifest};

/// Operations for updating and querying the run manifest
#[derive(Debug)]
pub struct ManifestOperations {
    /// Storage for the manifest
    storage: ManifestStorage,

    /// The loaded manifest
    manifest: RunManifest,
}

impl ManifestOperations {
    /// Load the manifest at the given path, or start a fresh one
    pub fn new(manifest_path: impl AsRef<Path>) -> Result<Self> {
        let storage = ManifestStorage::new(manifest_path);
        let manifest = storage.load()?;

        Ok(Self { storage, manifest })
    }

    /// Get a reference to the manifest
    pub fn manifest(&self) -> &RunManifest {
        &self.manifest
    }

    /// Save the manifest to disk
    pub fn save(&self) -> Result<()> {
        self.storage.save(&self.manifest)
    }

    /// Fold a batch result into the manifest.
    ///
    /// A source whose content hash is unchanged keeps its entry; changed
    /// content refreshes the entry and its updated_at timestamp.
    pub fn update_with_batch(&mut self, batch: &BatchResult) -> Result<ManifestStats> {
        info!("Updating manifest with {} processed files", batch.outputs.len());

        let mut stats = ManifestStats::default();
        let now = Utc::now();

        for output in &batch.outputs {
            let source = output.input_path.to_string_lossy().to_string();

            // An input that vanished between processing and manifest
            // update still gets an entry, with a placeholder hash
            let source_hash = hash_utils::hash_file(&output.input_path)
                .unwrap_or_else(|_| "unknown".to_string());

            match self.manifest.entries.get(&source) {
                Some(existing) if existing.source_hash == source_hash => {
                    debug!("Source unchanged: {}", source);
                    stats.unchanged_entries += 1;
                }
                Some(existing) => {
                    let added_at = existing.added_at;
                    self.manifest.entries.insert(
                        source.clone(),
                        ManifestEntry {
                            source,
                            output: output.output_path.to_string_lossy().to_string(),
                            scan_count: output.scan_count,
                            record_count: output.record_count,
                            source_hash,
                            added_at,
                            updated_at: now,
                        },
                    );
                    stats.updated_entries += 1;
                }
                None => {
                    self.manifest.entries.insert(
                        source.clone(),
                        ManifestEntry {
                            source,
                            output: output.output_path.to_string_lossy().to_string(),
                            scan_count: output.scan_count,
                            record_count: output.record_count,
                            source_hash,
                            added_at: now,
                            updated_at: now,
                        },
                    );
                    stats.added_entries += 1;
                }
            }
        }

        self.manifest.updated_at = now;
        stats.total_entries = self.manifest.entries.len();

        info!(
            "Manifest update complete: {} total, {} added, {} updated, {} unchanged",
            stats.total_entries, stats.added_entries, stats.updated_entries, stats.unchanged_entries
        );

        Ok(stats)
    }

    /// Get the entry for a source file
    pub fn get_entry(&self, source: impl AsRef<Path>) -> Option<&ManifestEntry> {
        let key = source.as_ref().to_string_lossy().to_string();
        self.manifest.entries.get(&key)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use anyhow::Result;
    use tempfile::tempdir;

    use crate::scan::types::{BatchResult, BatchStats, ProcessedFile};

    use super::*;

    fn batch_for(input: PathBuf, output: PathBuf) -> BatchResult {
        BatchResult {
            outputs: vec![ProcessedFile {
                input_path: input,
                output_path: output,
                scan_count: 2,
                record_count: 5,
            }],
            stats: BatchStats::default(),
        }
    }

    #[test]
    fn unchanged_source_keeps_its_entry() -> Result<()> {
        let temp_dir = tempdir()?;
        let input = temp_dir.path().join("dump.txt");
        let output = temp_dir.path().join("dump.csv");
        fs::write(&input, "t -> SCAN:\nt -> END:\n")?;

        let manifest_path = temp_dir.path().join("manifest.json");
        let mut ops = ManifestOperations::new(&manifest_path)?;

        let batch = batch_for(input.clone(), output);
        let first = ops.update_with_batch(&batch)?;
        assert_eq!(first.added_entries, 1);

        let second = ops.update_with_batch(&batch)?;
        assert_eq!(second.added_entries, 0);
        assert_eq!(second.unchanged_entries, 1);
        assert_eq!(second.total_entries, 1);
        Ok(())
    }

    #[test]
    fn changed_source_refreshes_the_entry() -> Result<()> {
        let temp_dir = tempdir()?;
        let input = temp_dir.path().join("dump.txt");
        let output = temp_dir.path().join("dump.csv");
        fs::write(&input, "first contents")?;

        let manifest_path = temp_dir.path().join("manifest.json");
        let mut ops = ManifestOperations::new(&manifest_path)?;
        ops.update_with_batch(&batch_for(input.clone(), output.clone()))?;

        fs::write(&input, "second contents")?;
        let stats = ops.update_with_batch(&batch_for(input.clone(), output))?;
        assert_eq!(stats.updated_entries, 1);
        assert_eq!(stats.total_entries, 1);
        Ok(())
    }

    #[test]
    fn manifest_round_trips_through_disk() -> Result<()> {
        let temp_dir = tempdir()?;
        let input = temp_dir.path().join("dump.txt");
        let output = temp_dir.path().join("dump.csv");
        fs::write(&input, "contents")?;

        let manifest_path = temp_dir.path().join("manifest.json");
        {
            let mut ops = ManifestOperations::new(&manifest_path)?;
            ops.update_with_batch(&batch_for(input.clone(), output))?;
            ops.save()?;
        }

        let reloaded = ManifestOperations::new(&manifest_path)?;
        let entry = reloaded.get_entry(&input).expect("entry should survive reload");
        assert_eq!(entry.scan_count, 2);
        assert_eq!(entry.record_count, 5);
        Ok(())
    }
}
