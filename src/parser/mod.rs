//! Extraction of structured fields from raw device command output.
//!
//! Vendor CLI output carries no grammar or schema, so extraction is a
//! fixed set of independent line matchers with exact trigger patterns
//! and first-match-wins tie-breaking. Only Cisco IOS "show version"
//! syntax is handled.

mod cisco_ios;

pub use cisco_ios::{VersionInfo, parse_show_version};
