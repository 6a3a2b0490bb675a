// file: src/organizer/patterns.rs
// description: compiled regex patterns for filename analysis
// reference: https://docs.rs/regex

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Embedded version marker v1..v9 (surface match, "v10" also hits)
    pub static ref VERSION_MARKER: Regex = Regex::new(
        r"v[1-9]"
    ).expect("VERSION_MARKER regex is valid");

    // Word tokens used for name similarity (any script, no underscore)
    pub static ref WORD_TOKEN: Regex = Regex::new(
        r"[\p{L}\p{N}]+"
    ).expect("WORD_TOKEN regex is valid");

    // Separators stripped during name normalization
    pub static ref NAME_SEPARATOR: Regex = Regex::new(
        r"[\s_\-]+"
    ).expect("NAME_SEPARATOR regex is valid");

    // Whole-token copy markers: "copy", "backup2", "(1)"
    pub static ref COPY_MARKER: Regex = Regex::new(
        r"^(?:(?:copy|backup|old|new|final|draft)\d*|\(\d+\))$"
    ).expect("COPY_MARKER regex is valid");

    // Standardized filename cleanup
    pub static ref NON_NAME_CHAR: Regex = Regex::new(
        r"[^a-zA-Z0-9-]"
    ).expect("NON_NAME_CHAR regex is valid");

    pub static ref DASH_RUN: Regex = Regex::new(
        r"-+"
    ).expect("DASH_RUN regex is valid");

    pub static ref DOTTED_VERSION: Regex = Regex::new(
        r"v?(\d+)\.(\d+)"
    ).expect("DOTTED_VERSION regex is valid");
}
