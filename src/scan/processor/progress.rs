use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use rayon::prelude::*;

/// Progress tracker for displaying progress during batch processing
#[derive(Debug, Default)]
pub struct ProgressTracker {}

impl ProgressTracker {
    /// Create a new progress tracker
    pub fn new() -> Self {
        Self {}
    }

    /// Run an operation over files in parallel, keeping a progress bar
    /// updated. Results of files the operation rejects are dropped.
    pub fn track_path_progress<F, R>(&self, paths: &[PathBuf], operation: F) -> Vec<R>
    where
        F: Fn(&PathBuf) -> Option<R> + Sync + Send,
        R: Send,
    {
        // A bar for a handful of files is more noise than signal
        let multi_progress = MultiProgress::new();
        let progress_bar = if paths.len() > 10 {
            let pb = multi_progress.add(ProgressBar::new(paths.len() as u64));
            pb.set_style(ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({eta})")
                .unwrap()
                .progress_chars("#>-"));
            Some(Arc::new(pb))
        } else {
            None
        };

        let processed_count = Arc::new(AtomicUsize::new(0));

        let results: Vec<_> = paths.par_iter()
            .filter_map(|path| {
                let current_count = processed_count.fetch_add(1, Ordering::SeqCst) + 1;
                if let Some(pb) = &progress_bar {
                    pb.set_position(current_count as u64);
                    if let Some(file_name) = path.file_name() {
                        pb.set_message(format!("Processing: {}", file_name.to_string_lossy()));
                    }
                }

                operation(path)
            })
            .collect();

        if let Some(pb) = progress_bar {
            pb.finish_with_message("Processing complete");
        }

        results
    }
}
