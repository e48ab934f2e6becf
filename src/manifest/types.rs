use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};

/// Entry describing one processed log file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Source log file, as handed to the processor
    pub source: String,

    /// CSV file the scans were written to
    pub output: String,

    /// Number of scan sessions extracted
    pub scan_count: usize,

    /// Number of records across all sessions
    pub record_count: usize,

    /// Hash of the source content when it was processed
    pub source_hash: String,

    /// When this file was first processed
    pub added_at: DateTime<Utc>,

    /// When this file was last processed with changed content
    pub updated_at: DateTime<Utc>,
}

/// Manifest of processing runs, keyed by source file path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    /// Map of source path to its latest processing outcome
    pub entries: HashMap<String, ManifestEntry>,

    /// When this manifest was created
    pub created_at: DateTime<Utc>,

    /// When this manifest was last updated
    pub updated_at: DateTime<Utc>,

    /// Version of the manifest schema
    pub version: String,
}

impl Default for RunManifest {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Statistics about a manifest update
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ManifestStats {
    /// Total number of entries in the manifest
    pub total_entries: usize,

    /// Number of entries added in the last update
    pub added_entries: usize,

    /// Number of entries refreshed because their source changed
    pub updated_entries: usize,

    /// Number of entries whose source content was unchanged
    pub unchanged_entries: usize,
}
