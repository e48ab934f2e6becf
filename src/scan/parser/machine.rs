use log::{debug, trace, warn};

use crate::scan::types::{NumericFieldPolicy, Scan, WifiRecord};

use super::line::{
    classify_payload, split_data_tokens, split_line, PayloadKind, COL_MAC_ADDRESS,
    COL_RECORD_NUMBER, COL_SIGNAL_STRENGTH, COL_SSID, MIN_DATA_TOKENS,
};

/// Position of the cursor relative to the scan markers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseState {
    /// Before any start marker, or after an end marker
    #[default]
    OutsideScan,

    /// Between a start marker and its end marker
    InsideScan,
}

/// Incremental assembler that folds source lines into scan sessions.
///
/// All state is owned by the assembler, so one instance corresponds to
/// exactly one parse run and identifiers restart at 1 for each run.
#[derive(Debug)]
pub struct ScanAssembler {
    /// Fallback policy for numeric tokens
    policy: NumericFieldPolicy,

    state: ParseState,
    scan_counter: u32,
    current: Option<Scan>,
    scans: Vec<Scan>,
}

impl ScanAssembler {
    /// Create an assembler with the given numeric fallback policy
    pub fn new(policy: NumericFieldPolicy) -> Self {
        Self {
            policy,
            state: ParseState::default(),
            scan_counter: 0,
            current: None,
            scans: Vec::new(),
        }
    }

    /// Current parse state, exposed for line-level testing
    pub fn state(&self) -> ParseState {
        self.state
    }

    /// Feed one raw source line into the assembler.
    ///
    /// Malformed or unrecognized lines are dropped without error; the
    /// dumps are mostly chatter and only marker and data lines matter.
    pub fn feed_line(&mut self, line: &str) {
        let Some(split) = split_line(line) else {
            return;
        };

        match classify_payload(split.payload) {
            PayloadKind::ScanStart => self.open_scan(),
            PayloadKind::ScanEnd => self.close_scan(),
            PayloadKind::Noise => trace!("Skipping status line: {}", split.payload),
            PayloadKind::Data => self.push_record(split.timestamp, split.payload),
            PayloadKind::Other => trace!("Discarding unrecognized payload: {}", split.payload),
        }
    }

    /// Finish the stream and hand back all committed scans.
    ///
    /// A scan left open at end of stream is committed only if it holds at
    /// least one record; an empty unterminated scan is dropped, unlike an
    /// explicitly ended one.
    pub fn finish(mut self) -> Vec<Scan> {
        if let Some(scan) = self.current.take() {
            if scan.records.is_empty() {
                debug!("Stream ended inside empty scan {}, dropping it", scan.scan_id);
            } else {
                debug!(
                    "Stream ended inside scan {}, committing {} records",
                    scan.scan_id,
                    scan.records.len()
                );
                self.scans.push(scan);
            }
        }
        self.scans
    }

    fn open_scan(&mut self) {
        self.scan_counter += 1;
        if let Some(dropped) = self.current.take() {
            // The device re-issued SCAN: without an END:. The unfinished
            // session is lost, matching the device's legacy tooling.
            warn!(
                "Scan {} restarted before END, dropping {} accumulated records",
                dropped.scan_id,
                dropped.records.len()
            );
        }
        trace!("Opening scan {}", self.scan_counter);
        self.current = Some(Scan::new(self.scan_counter));
        self.state = ParseState::InsideScan;
    }

    fn close_scan(&mut self) {
        if let Some(scan) = self.current.take() {
            debug!("Scan {} closed with {} records", scan.scan_id, scan.records.len());
            self.scans.push(scan);
        }
        self.state = ParseState::OutsideScan;
    }

    fn push_record(&mut self, timestamp: &str, payload: &str) {
        if self.state != ParseState::InsideScan {
            trace!("Ignoring data row outside any scan: {}", payload);
            return;
        }

        let tokens = split_data_tokens(payload);
        if tokens.len() < MIN_DATA_TOKENS {
            trace!(
                "Dropping short data row with {} of {} tokens",
                tokens.len(),
                MIN_DATA_TOKENS
            );
            return;
        }

        let Some(record_number) = self.parse_numeric(tokens[COL_RECORD_NUMBER]) else {
            return;
        };
        let Some(signal_strength) = self.parse_numeric(tokens[COL_SIGNAL_STRENGTH]) else {
            return;
        };

        let record = WifiRecord {
            timestamp: timestamp.to_string(),
            record_number,
            signal_strength,
            mac_address: tokens[COL_MAC_ADDRESS].to_string(),
            ssid: tokens[COL_SSID].to_string(),
        };

        if let Some(scan) = self.current.as_mut() {
            scan.records.push(record);
        }
    }

    fn parse_numeric(&self, token: &str) -> Option<i32> {
        match token.parse::<i32>() {
            Ok(value) => Some(value),
            Err(_) => match self.policy {
                NumericFieldPolicy::ZeroOnError => Some(0),
                NumericFieldPolicy::Reject => {
                    trace!("Rejecting data row with non-numeric token: {}", token);
                    None
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assemble(lines: &[&str]) -> Vec<Scan> {
        let mut assembler = ScanAssembler::new(NumericFieldPolicy::ZeroOnError);
        for line in lines {
            assembler.feed_line(line);
        }
        assembler.finish()
    }

    #[test]
    fn single_scan_with_one_record() {
        let scans = assemble(&[
            "12:00:01 -> SCAN:",
            "12:00:02 -> 1, x, -45, x, x, x, x, AA:BB:CC:DD:EE:FF, MyNet",
            "12:00:03 -> END:",
        ]);

        assert_eq!(scans.len(), 1);
        assert_eq!(scans[0].scan_id, 1);
        assert_eq!(scans[0].records.len(), 1);

        let record = &scans[0].records[0];
        assert_eq!(record.record_number, 1);
        assert_eq!(record.signal_strength, -45);
        assert_eq!(record.mac_address, "AA:BB:CC:DD:EE:FF");
        assert_eq!(record.ssid, "MyNet");
        assert_eq!(record.timestamp, "12:00:02");
    }

    #[test]
    fn state_transitions_follow_markers() {
        let mut assembler = ScanAssembler::new(NumericFieldPolicy::ZeroOnError);
        assert_eq!(assembler.state(), ParseState::OutsideScan);

        assembler.feed_line("t -> SCAN:");
        assert_eq!(assembler.state(), ParseState::InsideScan);

        assembler.feed_line("t -> END:");
        assert_eq!(assembler.state(), ParseState::OutsideScan);
    }

    #[test]
    fn explicitly_ended_scan_is_kept_even_when_empty() {
        let scans = assemble(&["t -> SCAN:", "t -> END:"]);
        assert_eq!(scans.len(), 1);
        assert_eq!(scans[0].scan_id, 1);
        assert!(scans[0].records.is_empty());
    }

    #[test]
    fn unterminated_scan_with_records_is_committed() {
        let scans = assemble(&[
            "t -> SCAN:",
            "t -> 1, x, -50, x, x, x, x, AA:AA:AA:AA:AA:AA, Net",
        ]);
        assert_eq!(scans.len(), 1);
        assert_eq!(scans[0].records.len(), 1);
    }

    #[test]
    fn unterminated_empty_scan_is_dropped() {
        let scans = assemble(&["t -> SCAN:"]);
        assert!(scans.is_empty());
    }

    #[test]
    fn restart_without_end_discards_previous_records() {
        let scans = assemble(&[
            "t -> SCAN:",
            "t -> 1, x, -50, x, x, x, x, AA:AA:AA:AA:AA:AA, Lost",
            "t -> SCAN:",
            "t -> 2, x, -60, x, x, x, x, BB:BB:BB:BB:BB:BB, Kept",
            "t -> END:",
        ]);

        // The first session never reaches the output but its identifier
        // is still consumed by the counter
        assert_eq!(scans.len(), 1);
        assert_eq!(scans[0].scan_id, 2);
        assert_eq!(scans[0].records.len(), 1);
        assert_eq!(scans[0].records[0].ssid, "Kept");
    }

    #[test]
    fn stray_end_without_open_scan_is_ignored() {
        let scans = assemble(&[
            "t -> END:",
            "t -> SCAN:",
            "t -> END:",
            "t -> END:",
        ]);
        assert_eq!(scans.len(), 1);
        assert_eq!(scans[0].scan_id, 1);
    }

    #[test]
    fn short_data_rows_are_dropped() {
        let scans = assemble(&[
            "t -> SCAN:",
            "t -> 1, x, -45, x, AA:BB:CC:DD:EE:FF",
            "t -> END:",
        ]);
        assert_eq!(scans.len(), 1);
        assert!(scans[0].records.is_empty());
    }

    #[test]
    fn unterminated_scan_with_only_short_rows_is_absent() {
        let scans = assemble(&[
            "t -> SCAN:",
            "t -> 1, x, -45, x, AA:BB:CC:DD:EE:FF",
        ]);
        assert!(scans.is_empty());
    }

    #[test]
    fn data_rows_outside_scan_are_ignored() {
        let scans = assemble(&[
            "t -> 1, x, -45, x, x, x, x, AA:BB:CC:DD:EE:FF, MyNet",
            "t -> SCAN:",
            "t -> END:",
        ]);
        assert_eq!(scans.len(), 1);
        assert!(scans[0].records.is_empty());
    }

    #[test]
    fn noise_lines_inside_scan_are_skipped() {
        let scans = assemble(&[
            "t -> SCAN:",
            "t -> {\"chan\": 6}",
            "t -> WiFly Ver 4.41",
            "t -> IP Address=10.0.0.2",
            "t -> Scan Requested",
            "t -> <4.41>",
            "t -> 1, x, -45, x, x, x, x, AA:BB:CC:DD:EE:FF, MyNet",
            "t -> END:",
        ]);
        assert_eq!(scans.len(), 1);
        assert_eq!(scans[0].records.len(), 1);
    }

    #[test]
    fn non_numeric_fields_default_to_zero() {
        let scans = assemble(&[
            "t -> SCAN:",
            "t -> abc, x, weak, x, x, x, x, AA:BB:CC:DD:EE:FF, MyNet",
            "t -> END:",
        ]);
        assert_eq!(scans[0].records.len(), 1);
        assert_eq!(scans[0].records[0].record_number, 0);
        assert_eq!(scans[0].records[0].signal_strength, 0);
    }

    #[test]
    fn reject_policy_drops_non_numeric_rows() {
        let mut assembler = ScanAssembler::new(NumericFieldPolicy::Reject);
        for line in [
            "t -> SCAN:",
            "t -> 1, x, weak, x, x, x, x, AA:BB:CC:DD:EE:FF, Bad",
            "t -> 2, x, -45, x, x, x, x, AA:BB:CC:DD:EE:FF, Good",
            "t -> END:",
        ] {
            assembler.feed_line(line);
        }
        let scans = assembler.finish();
        assert_eq!(scans[0].records.len(), 1);
        assert_eq!(scans[0].records[0].ssid, "Good");
    }

    #[test]
    fn scan_ids_increase_across_sessions() {
        let scans = assemble(&[
            "t -> SCAN:",
            "t -> END:",
            "t -> SCAN:",
            "t -> END:",
            "t -> SCAN:",
            "t -> END:",
        ]);
        let ids: Vec<u32> = scans.iter().map(|s| s.scan_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
