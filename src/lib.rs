pub mod scan;
pub mod output;
pub mod analysis;
pub mod manifest;
pub mod utils;

// Re-export main types and functions for easier access
pub use scan::types::{
    BatchResult, BatchStats, NumericFieldPolicy, ProcessedFile, Scan, ScanParseOptions, WifiRecord,
};
pub use scan::parser::{parse_scan_text, ScanParser};
pub use scan::processor::{ScanProcessor, INPUT_FILES};

pub use analysis::{count_unique_aps, count_unique_aps_in_dir};
pub use manifest::{ManifestOperations, RunManifest};
pub use output::{render_csv, write_scans_to_csv};

// Re-export utility functions
pub use utils::file_utils;
