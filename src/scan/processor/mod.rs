mod progress;

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use log::{debug, info, warn};
use once_cell::sync::Lazy;

use crate::analysis;
use crate::output;
use crate::scan::parser::ScanParser;
use crate::scan::types::{BatchResult, BatchStats, ProcessedFile, ScanParseOptions};
use crate::utils::file_utils;

// Re-export from submodules
pub use progress::ProgressTracker;

/// Dump files produced by the scanning device, one per survey location
pub const INPUT_FILES: &[&str] = &[
    "EBlock_1F_ENE131.txt",
    "EBlock_3F_ENE329.txt",
    "GBlock_1F_DeanOffice.txt",
    "GBlock_1F_Washroom.txt",
    "GBlock_2F_ENC201.txt",
];

// Thread-safe storage for files that failed to read or write, kept
// across batch runs for diagnostics
static ERROR_FILES: Lazy<Mutex<HashSet<PathBuf>>> = Lazy::new(|| Mutex::new(HashSet::new()));

/// Batch processor that turns raw log dumps into CSV files
#[derive(Debug)]
pub struct ScanProcessor {
    /// Configuration options for parsing and batch limits
    options: ScanParseOptions,

    /// Directory the CSV files are written to
    output_dir: PathBuf,

    /// Parser shared by every file in the batch
    parser: ScanParser,

    /// Progress tracker for displaying progress
    progress_tracker: ProgressTracker,
}

impl ScanProcessor {
    /// Create a new processor with the given options and output directory
    pub fn new(options: ScanParseOptions, output_dir: impl AsRef<Path>) -> Self {
        Self {
            options: options.clone(),
            output_dir: output_dir.as_ref().to_path_buf(),
            parser: ScanParser::new(options),
            progress_tracker: ProgressTracker::new(),
        }
    }

    /// Create a new processor with default options
    pub fn with_defaults(output_dir: impl AsRef<Path>) -> Self {
        Self::new(ScanParseOptions::default(), output_dir)
    }

    /// Process the fixed device file list from the input directory.
    ///
    /// The list of dump names is part of the device contract and is not
    /// configurable.
    pub fn process_all_files(&self, input_dir: impl AsRef<Path>) -> Result<BatchResult> {
        let input_dir = input_dir.as_ref();
        info!("Processing device dumps from {}", input_dir.display());

        let files: Vec<PathBuf> = INPUT_FILES.iter().map(|name| input_dir.join(name)).collect();
        self.process_files(&files)
    }

    /// Parse each input file and write one CSV per file into the output
    /// directory. Unreadable inputs are logged and skipped; the batch
    /// never aborts because of a single file.
    pub fn process_files(&self, files: &[PathBuf]) -> Result<BatchResult> {
        info!("Processing {} files", files.len());

        file_utils::ensure_dir_exists(&self.output_dir)
            .context("Failed to create output directory")?;

        // Limit the number of files if configured
        let files = if let Some(max_files) = self.options.max_files {
            if files.len() > max_files {
                warn!("Limiting to {} files out of {}", max_files, files.len());
                &files[0..max_files]
            } else {
                files
            }
        } else {
            files
        };

        // Configure parallel processing based on options
        let thread_count = self.options.parallel_threads.unwrap_or_else(|| {
            let available = num_cpus::get();
            let used = std::cmp::max(1, available.saturating_sub(1));
            debug!("Using {} threads for parallel processing (available: {})", used, available);
            used
        });

        rayon::ThreadPoolBuilder::new()
            .num_threads(thread_count)
            .build_global()
            .unwrap_or_else(|e| warn!("Failed to build thread pool: {}", e));

        // Thread-safe collection of this run's failed files
        let error_files: Mutex<Vec<PathBuf>> = Mutex::new(Vec::new());

        // Each file gets its own isolated parse pass
        let outputs = self.progress_tracker.track_path_progress(files, |file| {
            self.process_single_file(file, &error_files)
        });

        let mut stats = BatchStats::default();
        stats.total_files = files.len();
        stats.error_file_paths = error_files.into_inner().unwrap_or_default();
        stats.error_file_paths.sort();
        stats.error_files = stats.error_file_paths.len();

        for output in &outputs {
            if output.scan_count == 0 {
                stats.empty_files += 1;
            }
            stats.total_scans += output.scan_count;
            stats.total_records += output.record_count;
        }

        info!(
            "Processed {} files, found {} scans with {} records",
            stats.total_files, stats.total_scans, stats.total_records
        );

        Ok(BatchResult { outputs, stats })
    }

    /// Count unique access points across every CSV in the output directory
    pub fn count_unique_aps(&self) -> Result<Vec<(PathBuf, usize)>> {
        analysis::count_unique_aps_in_dir(&self.output_dir)
    }

    /// Get the output directory this processor writes to
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn process_single_file(
        &self,
        file: &PathBuf,
        error_files: &Mutex<Vec<PathBuf>>,
    ) -> Option<ProcessedFile> {
        let scans = match self.parser.parse_file(file) {
            Ok(scans) => scans,
            Err(e) => {
                warn!("Failed to open file: {}: {:#}", file.display(), e);
                Self::record_error(file, error_files);
                return None;
            }
        };

        // The CSV is written even when no scans were found, so every
        // readable input leaves a header-only file behind
        let output_path = self.output_path_for(file);
        if let Err(e) = output::write_scans_to_csv(&scans, &output_path) {
            warn!("Failed to create output file: {}: {:#}", output_path.display(), e);
            Self::record_error(file, error_files);
            return None;
        }

        let record_count = scans.iter().map(|s| s.records.len()).sum();
        info!("Processed {} -> {}", file.display(), output_path.display());

        Some(ProcessedFile {
            input_path: file.clone(),
            output_path,
            scan_count: scans.len(),
            record_count,
        })
    }

    fn record_error(file: &Path, error_files: &Mutex<Vec<PathBuf>>) {
        if let Ok(mut errors) = error_files.lock() {
            errors.push(file.to_path_buf());
        }
        Self::add_error_file(file);
    }

    fn output_path_for(&self, input: &Path) -> PathBuf {
        let base_name = input
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "output".to_string());
        self.output_dir.join(format!("{}.csv", base_name))
    }

    /// Get the list of files that have failed across batch runs
    pub fn error_files() -> Vec<PathBuf> {
        ERROR_FILES
            .lock()
            .map(|files| {
                let mut paths: Vec<PathBuf> = files.iter().cloned().collect();
                paths.sort();
                paths
            })
            .unwrap_or_default()
    }

    /// Add a file to the error files list
    pub fn add_error_file(file: impl AsRef<Path>) {
        if let Ok(mut error_files) = ERROR_FILES.lock() {
            error_files.insert(file.as_ref().to_path_buf());
        }
    }
}
