use std::path::Path;

use anyhow::{anyhow, Context, Result};
use csv::{QuoteStyle, WriterBuilder};
use log::{debug, info};

use crate::scan::types::Scan;
use crate::utils::file_utils;

/// Column order of the serialized form
pub const CSV_HEADER: [&str; 6] = [
    "ScanID",
    "RecordNumber",
    "Timestamp",
    "SignalStrength",
    "MACAddress",
    "SSID",
];

/// Render scan sessions into canonical CSV rows.
///
/// Fields are written raw, never quoted or escaped. A comma inside a
/// timestamp, MAC or SSID corrupts that row; the device does not emit
/// such values and the format accepts the risk.
pub fn render_csv(scans: &[Scan]) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .from_writer(Vec::new());

    writer
        .write_record(CSV_HEADER)
        .context("Failed to write CSV header")?;

    for scan in scans {
        for record in &scan.records {
            writer
                .write_record([
                    scan.scan_id.to_string(),
                    record.record_number.to_string(),
                    record.timestamp.clone(),
                    record.signal_strength.to_string(),
                    record.mac_address.clone(),
                    record.ssid.clone(),
                ])
                .context("Failed to write CSV record")?;
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow!("Failed to flush CSV writer: {}", e))?;
    String::from_utf8(bytes).context("CSV output was not valid UTF-8")
}

/// Write scan sessions to a CSV file, creating parent directories as
/// needed. An empty scan sequence still produces a header-only file.
pub fn write_scans_to_csv(scans: &[Scan], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    debug!("Writing {} scans to {}", scans.len(), path.display());

    let content = render_csv(scans)?;
    file_utils::write_string_to_file(path, &content)?;

    info!("Saved {} scans to {}", scans.len(), path.display());
    Ok(())
}
