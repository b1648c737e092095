//! Cisco IOS "show version" field extraction.
//!
//! Each field has its own matcher; the matchers are independent and each
//! takes the first occurrence in the text. Keys must match exactly after
//! whitespace trimming - there is no fuzzy matching. A field that does
//! not appear stays absent; defaulting is left to the caller.

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches `Version <token>,` where the token is any non-comma run on the
/// same line. Presence of this pattern anywhere in the text is what makes
/// an input count as "show version" output at all.
static VERSION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Version ([^,\n]+),").unwrap());

/// Matches `<hostname> uptime is <rest-of-line>` on a single line.
static UPTIME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\S+) uptime is (.+)$").unwrap());

/// Fields extracted from one "show version" output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
    /// Running OS version, e.g. "15.2(7)E10".
    pub os_version: String,

    /// Device hostname, taken from the uptime line.
    pub hostname: Option<String>,

    /// Uptime text verbatim, e.g. "8 weeks, 1 day, 5 hours, 56 minutes".
    pub uptime: Option<String>,

    /// Hardware model, e.g. "WS-C3560CX-12PC-S".
    pub model: Option<String>,

    /// Chassis serial number.
    pub serial_number: Option<String>,
}

/// Parse Cisco IOS "show version" output into structured fields.
///
/// Returns `None` when the text contains no `Version <token>,` pattern at
/// all - that single check gates acceptance of the whole input. Any other
/// field may be individually absent without failing the call.
///
/// The first `Version` occurrence in the document wins, even though boot
/// loader banner lines may repeat version-like substrings further down.
pub fn parse_show_version(text: &str) -> Option<VersionInfo> {
    let os_version = VERSION_RE.captures(text)?.get(1)?.as_str().trim().to_string();

    let mut hostname = None;
    let mut uptime = None;
    let mut model = None;
    let mut serial_number = None;

    for line in text.lines() {
        if hostname.is_none() {
            if let Some(caps) = UPTIME_RE.captures(line) {
                hostname = Some(caps[1].to_string());
                uptime = Some(caps[2].to_string());
                continue;
            }
        }

        // Fixed-width "key : value" rows; the key column is padded with
        // irregular whitespace, so compare the trimmed key exactly.
        if let Some((key, value)) = line.split_once(':') {
            match key.trim() {
                "Model number" if model.is_none() => {
                    model = Some(value.trim().to_string());
                }
                "System serial number" if serial_number.is_none() => {
                    serial_number = Some(value.trim().to_string());
                }
                _ => {}
            }
        }
    }

    Some(VersionInfo {
        os_version,
        hostname,
        uptime,
        model,
        serial_number,
    })
}
