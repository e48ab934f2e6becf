/// Marker separating the timestamp prefix from the payload
pub const ARROW_MARKER: &str = "->";

/// Payload substring that opens a new scan session
pub const SCAN_START_MARKER: &str = "SCAN:";

/// Payload substring that closes the current scan session
pub const SCAN_END_MARKER: &str = "END:";

/// Payload substrings emitted by the device firmware between data rows.
/// Status chatter, IP announcements, request acknowledgements and the
/// firmware banner all interleave with record data in the dumps.
pub const NOISE_MARKERS: &[&str] = &[
    "WiFly",
    "IP Address",
    "Scan Requested",
    "can",
    "<4.41>",
];

/// Token position of the device-assigned record number
pub const COL_RECORD_NUMBER: usize = 0;

/// Token position of the signal strength reading
pub const COL_SIGNAL_STRENGTH: usize = 2;

/// Token position of the access point hardware address
pub const COL_MAC_ADDRESS: usize = 7;

/// Token position of the network name
pub const COL_SSID: usize = 8;

/// Minimum comma-separated tokens a payload needs to count as a data row
pub const MIN_DATA_TOKENS: usize = 9;

/// Trim leading and trailing spaces and tabs, the only padding the
/// device emits
pub fn trim_field(s: &str) -> &str {
    s.trim_matches(|c: char| c == ' ' || c == '\t')
}

/// A source line split into its timestamp prefix and payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitLine<'a> {
    /// Trimmed text before the arrow marker
    pub timestamp: &'a str,

    /// Trimmed text after the arrow marker, never empty
    pub payload: &'a str,
}

/// Split a raw line on the first arrow marker.
///
/// Lines without the marker carry no timestamp/data separation and are
/// rejected, as are lines whose payload trims to nothing.
pub fn split_line(line: &str) -> Option<SplitLine<'_>> {
    let (prefix, rest) = line.split_once(ARROW_MARKER)?;
    let payload = trim_field(rest);
    if payload.is_empty() {
        return None;
    }
    Some(SplitLine {
        timestamp: trim_field(prefix),
        payload,
    })
}

/// Classification of a payload, independent of parser state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    /// Opens a new scan session
    ScanStart,

    /// Closes the current scan session
    ScanEnd,

    /// Protocol or status chatter, never record data
    Noise,

    /// Digit-led payload, a candidate data row
    Data,

    /// Anything else, dropped by the assembler
    Other,
}

/// Classify a trimmed payload.
///
/// Order matters: the start and end markers win over the noise list, so
/// "Scan Requested" (which contains "can") is still noise while "SCAN:"
/// lines open a session.
pub fn classify_payload(payload: &str) -> PayloadKind {
    if payload.contains(SCAN_START_MARKER) {
        return PayloadKind::ScanStart;
    }
    if payload.contains(SCAN_END_MARKER) {
        return PayloadKind::ScanEnd;
    }
    if payload.starts_with('{') || NOISE_MARKERS.iter().any(|m| payload.contains(m)) {
        return PayloadKind::Noise;
    }
    if payload.starts_with(|c: char| c.is_ascii_digit()) {
        return PayloadKind::Data;
    }
    PayloadKind::Other
}

/// Split a data payload into trimmed comma-separated tokens
pub fn split_data_tokens(payload: &str) -> Vec<&str> {
    payload.split(',').map(trim_field).collect()
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test]
    fn split_line_separates_timestamp_and_payload() {
        let split = split_line("12:00:01 -> SCAN:").expect("line should split");
        assert_eq!(split.timestamp, "12:00:01");
        assert_eq!(split.payload, "SCAN:");
    }

    #[test]
    fn split_line_rejects_lines_without_marker() {
        assert_eq!(split_line("no marker here"), None);
        assert_eq!(split_line(""), None);
    }

    #[test]
    fn split_line_rejects_empty_payload() {
        assert_eq!(split_line("12:00:01 -> "), None);
        assert_eq!(split_line("12:00:01 ->\t \t"), None);
    }

    #[test]
    fn split_line_uses_first_marker_only() {
        let split = split_line("a -> b -> c").expect("line should split");
        assert_eq!(split.timestamp, "a");
        assert_eq!(split.payload, "b -> c");
    }

    #[test]
    fn trim_field_strips_spaces_and_tabs_only() {
        assert_eq!(trim_field("\t value  "), "value");
        // Other whitespace is left alone, matching the device tooling
        assert_eq!(trim_field("\u{a0}x"), "\u{a0}x");
    }

    #[test_case("SCAN:" => PayloadKind::ScanStart; "start marker")]
    #[test_case("Starting SCAN: now" => PayloadKind::ScanStart; "embedded start marker")]
    #[test_case("END:" => PayloadKind::ScanEnd; "end marker")]
    #[test_case("{\"status\": \"ok\"}" => PayloadKind::Noise; "json fragment")]
    #[test_case("WiFly Ver 4.41" => PayloadKind::Noise; "device status")]
    #[test_case("IP Address=10.0.0.2" => PayloadKind::Noise; "ip announcement")]
    #[test_case("Scan Requested" => PayloadKind::Noise; "request acknowledgement")]
    #[test_case("<4.41> ready" => PayloadKind::Noise; "firmware banner")]
    #[test_case("1, 00, -45, 6, 11, 104, 3104, AA:BB:CC:DD:EE:FF, MyNet" => PayloadKind::Data; "data row")]
    #[test_case("waiting" => PayloadKind::Other; "unrecognized text")]
    fn classify_payload_cases(payload: &str) -> PayloadKind {
        classify_payload(payload)
    }

    #[test]
    fn start_marker_wins_over_noise_list() {
        // A payload carrying both the start marker and status chatter
        // must still open a session rather than be dropped
        assert_eq!(classify_payload("WiFly SCAN: begin"), PayloadKind::ScanStart);
    }

    #[test]
    fn split_data_tokens_trims_each_token() {
        let tokens = split_data_tokens("1, x ,\t-45,y");
        assert_eq!(tokens, vec!["1", "x", "-45", "y"]);
    }
}
