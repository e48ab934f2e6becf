mod line;
mod machine;

use std::path::Path;

use anyhow::Result;
use log::{debug, warn};

use crate::scan::types::{Scan, ScanParseOptions};
use crate::utils::file_utils;

// Re-export from submodules
pub use line::{
    classify_payload, split_data_tokens, split_line, PayloadKind, SplitLine, ARROW_MARKER,
    COL_MAC_ADDRESS, COL_RECORD_NUMBER, COL_SIGNAL_STRENGTH, COL_SSID, MIN_DATA_TOKENS,
    NOISE_MARKERS, SCAN_END_MARKER, SCAN_START_MARKER,
};
pub use machine::{ParseState, ScanAssembler};

/// Parser for raw scanner log dumps
#[derive(Debug, Default)]
pub struct ScanParser {
    /// Configuration options for parsing
    options: ScanParseOptions,
}

impl ScanParser {
    /// Create a new parser with the given options
    pub fn new(options: ScanParseOptions) -> Self {
        Self { options }
    }

    /// Create a new parser with default options
    pub fn with_defaults() -> Self {
        Self::new(ScanParseOptions::default())
    }

    /// Parse raw log text into scan sessions.
    ///
    /// Never fails: malformed lines are dropped and the result is the
    /// best-effort sequence of sessions found in the text.
    pub fn parse_str(&self, content: &str) -> Vec<Scan> {
        let mut assembler = ScanAssembler::new(self.options.numeric_policy);
        for line in content.lines() {
            assembler.feed_line(line);
        }
        assembler.finish()
    }

    /// Parse a log file from disk.
    ///
    /// Failure to open or read the file is the only error surface; the
    /// content itself is handled like parse_str.
    pub fn parse_file(&self, file: impl AsRef<Path>) -> Result<Vec<Scan>> {
        let file = file.as_ref();
        debug!("Parsing scan log: {}", file.display());

        let content = file_utils::read_file_to_string(file)?;

        if content.trim().is_empty() {
            warn!("Empty log file: {}", file.display());
            return Ok(Vec::new());
        }

        let scans = self.parse_str(&content);
        debug!("Found {} scans in {}", scans.len(), file.display());
        Ok(scans)
    }
}

/// Parse raw log text with default options
pub fn parse_scan_text(content: &str) -> Vec<Scan> {
    ScanParser::with_defaults().parse_str(content)
}
