//! Command dialects: per-os_type prompt patterns and session setup.
//!
//! A dialect selects how the shell session is driven for a device family:
//! the prompt pattern that terminates a read, and the commands issued
//! after login (paging must be off before scraping multi-page output).
//!
//! Prompt patterns are adapted from scrapli's platform drivers. Parsing
//! stays Cisco-only; a dialect affects session handling, not extraction.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::bytes::Regex;

/// Session behavior for one device family.
#[derive(Debug)]
pub struct Dialect {
    /// Canonical dialect name, matching the inventory `os_type` value.
    pub name: &'static str,

    /// Pattern that matches the CLI prompt at the end of output.
    pub prompt: Regex,

    /// Commands issued once after login, before any scan command.
    pub setup_commands: &'static [&'static str],
}

static DIALECTS: Lazy<HashMap<&'static str, Dialect>> = Lazy::new(|| {
    let mut table = HashMap::new();

    table.insert(
        "cisco_ios",
        Dialect {
            name: "cisco_ios",
            prompt: Regex::new(r"(?m)^[\w.\-@/:]{1,63}[>#]\s*$").unwrap(),
            setup_commands: &["terminal length 0", "terminal width 512"],
        },
    );
    table.insert(
        "cisco_iosxe",
        Dialect {
            name: "cisco_iosxe",
            prompt: Regex::new(r"(?m)^[\w.\-@/:]{1,63}[>#]\s*$").unwrap(),
            setup_commands: &["terminal length 0", "terminal width 512"],
        },
    );
    table.insert(
        "arista_eos",
        Dialect {
            name: "arista_eos",
            prompt: Regex::new(r"(?m)^[\w.\-@()/:]{1,63}[>#]\s*$").unwrap(),
            setup_commands: &["terminal length 0"],
        },
    );
    table.insert(
        "juniper_junos",
        Dialect {
            name: "juniper_junos",
            prompt: Regex::new(r"(?mi)^(\{\w+(:(\w+)?\d)?\}\n)?[\w\-@()/:\.]{1,63}[>#%]\s?$")
                .unwrap(),
            setup_commands: &["set cli screen-length 0"],
        },
    );

    table
});

/// Look up the dialect for an inventory `os_type` value.
pub fn lookup(os_type: &str) -> Option<&'static Dialect> {
    DIALECTS.get(os_type)
}
