use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info};

use super::types::RunManifest;

/// Manifest storage operations
#[derive(Debug)]
pub struct ManifestStorage {
    /// Path to the manifest file
    manifest_path: PathBuf,
}

impl ManifestStorage {
    /// Create a new manifest storage with the given path
    pub fn new(manifest_path: impl AsRef<Path>) -> Self {
        Self {
            manifest_path: manifest_path.as_ref().to_path_buf(),
        }
    }

    /// Load the manifest from disk
    pub fn load(&self) -> Result<RunManifest> {
        let path = &self.manifest_path;
        debug!("Loading manifest from {}", path.display());

        if !path.exists() {
            info!("Manifest file does not exist, starting a fresh manifest");
            return Ok(RunManifest::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest file {}", path.display()))?;

        let manifest: RunManifest = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse manifest file {}", path.display()))?;

        info!("Loaded manifest with {} entries", manifest.entries.len());
        Ok(manifest)
    }

    /// Save the manifest to disk
    pub fn save(&self, manifest: &RunManifest) -> Result<()> {
        let path = &self.manifest_path;
        debug!("Saving manifest to {}", path.display());

        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let content = serde_json::to_string_pretty(manifest)
            .context("Failed to serialize manifest")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write manifest file {}", path.display()))?;

        info!("Saved manifest with {} entries", manifest.entries.len());
        Ok(())
    }

    /// Check if the manifest file exists
    pub fn exists(&self) -> bool {
        self.manifest_path.exists()
    }

    /// Get the path to the manifest file
    pub fn path(&self) -> &Path {
        &self.manifest_path
    }
}
