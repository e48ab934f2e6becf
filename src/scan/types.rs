use std::path::PathBuf;
use serde::{Serialize, Deserialize};

/// One access-point observation extracted from a scan session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiRecord {
    /// Timestamp prefix of the source line, copied verbatim
    pub timestamp: String,

    /// Sequence number assigned by the scanning device
    pub record_number: i32,

    /// Signal strength as reported by the device
    pub signal_strength: i32,

    /// Hardware address of the observed access point, not validated
    pub mac_address: String,

    /// Network name, may be empty
    pub ssid: String,
}

/// One bounded scan session and the records observed during it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scan {
    /// Identifier assigned in parse order, starting at 1
    pub scan_id: u32,

    /// Records in order of appearance in the source
    pub records: Vec<WifiRecord>,
}

impl Scan {
    /// Create an empty scan session with the given identifier
    pub fn new(scan_id: u32) -> Self {
        Self {
            scan_id,
            records: Vec::new(),
        }
    }
}

/// Fallback behavior for numeric tokens that fail to parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumericFieldPolicy {
    /// Substitute zero, matching the device's legacy tooling
    #[default]
    ZeroOnError,

    /// Drop the whole data line instead of recording a zero
    Reject,
}

/// Configuration options for log parsing and batch processing
#[derive(Debug, Clone)]
pub struct ScanParseOptions {
    /// How to treat record-number and signal-strength tokens that fail to parse
    pub numeric_policy: NumericFieldPolicy,

    /// Maximum number of files to process in one batch
    pub max_files: Option<usize>,

    /// Number of parallel threads to use for batch processing
    pub parallel_threads: Option<usize>,
}

impl Default for ScanParseOptions {
    fn default() -> Self {
        Self {
            numeric_policy: NumericFieldPolicy::ZeroOnError,
            max_files: None,
            parallel_threads: None,
        }
    }
}

/// Statistics about a batch processing run
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct BatchStats {
    /// Total number of input files handed to the processor
    pub total_files: usize,

    /// Total number of scan sessions extracted
    pub total_scans: usize,

    /// Total number of records across all sessions
    pub total_records: usize,

    /// Number of input files that yielded no scans
    pub empty_files: usize,

    /// Number of files that could not be read or written
    pub error_files: usize,

    /// Paths to files that could not be read or written
    pub error_file_paths: Vec<PathBuf>,
}

/// Outcome of processing one input file
#[derive(Debug, Clone)]
pub struct ProcessedFile {
    /// The raw log file that was parsed
    pub input_path: PathBuf,

    /// The CSV file the scans were written to
    pub output_path: PathBuf,

    /// Number of scan sessions extracted from this file
    pub scan_count: usize,

    /// Number of records across this file's sessions
    pub record_count: usize,
}

/// Result of a batch processing run
#[derive(Debug, Clone)]
pub struct BatchResult {
    /// Per-file outcomes, successful files only
    pub outputs: Vec<ProcessedFile>,

    /// Statistics about the run
    pub stats: BatchStats,
}
