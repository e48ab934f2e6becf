//! Command-line entry point for the scan log toolkit.
//!
//! `process` turns the device's raw dumps into CSV files and records the
//! run in a manifest; `count` reports unique access points per CSV.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::warn;

use scan_log_parser::manifest::ManifestOperations;
use scan_log_parser::scan::types::{NumericFieldPolicy, ScanParseOptions};
use scan_log_parser::scan::ScanProcessor;
use scan_log_parser::analysis;

#[derive(Parser)]
#[command(name = "scan_log_parser")]
#[command(about = "Parse WiFi scanner log dumps into CSV and count access points")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse the device dump files and write one CSV per dump
    Process {
        /// Directory holding the raw device dumps
        #[arg(short, long, default_value = "data")]
        input_dir: PathBuf,

        /// Directory the CSV files and manifest are written to
        #[arg(short, long, default_value = "processedFiles")]
        output_dir: PathBuf,

        /// Drop data rows with non-numeric fields instead of recording zero
        #[arg(long)]
        strict_numbers: bool,
    },

    /// Count unique access points in each processed CSV file
    Count {
        /// Directory holding the processed CSV files
        #[arg(short, long, default_value = "processedFiles")]
        output_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            input_dir,
            output_dir,
            strict_numbers,
        } => {
            let options = ScanParseOptions {
                numeric_policy: if strict_numbers {
                    NumericFieldPolicy::Reject
                } else {
                    NumericFieldPolicy::ZeroOnError
                },
                ..ScanParseOptions::default()
            };

            let processor = ScanProcessor::new(options, &output_dir);
            let result = processor.process_all_files(&input_dir)?;

            for output in &result.outputs {
                println!(
                    "Processed {} scans from {} -> {}",
                    output.scan_count,
                    output.input_path.display(),
                    output.output_path.display()
                );
            }
            for failed in &result.stats.error_file_paths {
                println!("Failed to process {}", failed.display());
            }
            println!(
                "Done: {} files, {} scans, {} records",
                result.stats.total_files, result.stats.total_scans, result.stats.total_records
            );

            // The manifest rides along in the output directory; losing it
            // only costs change detection on the next run
            let manifest_path = output_dir.join("manifest.json");
            match ManifestOperations::new(&manifest_path) {
                Ok(mut manifest_ops) => {
                    manifest_ops.update_with_batch(&result)?;
                    manifest_ops.save()?;
                }
                Err(e) => warn!("Skipping manifest update: {:#}", e),
            }
        }
        Commands::Count { output_dir } => {
            let counts = analysis::count_unique_aps_in_dir(&output_dir)?;
            for (path, count) in counts {
                println!(
                    "Number of unique access points in {}: {}",
                    path.file_name().unwrap_or_default().to_string_lossy(),
                    count
                );
            }
        }
    }

    Ok(())
}
