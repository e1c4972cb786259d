// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! General purpose utilities.

use std::time::Duration;

pub mod color;

/// Pretty-prints a duration in whole seconds, the unit the call timeout is configured in.
pub fn format_secs(duration: Duration) -> String {
    format!("{}s", duration.as_secs())
}

/// Shortens an address or hash for single-line terminal output.
pub fn abbreviate(text: &str) -> String {
    const KEEP: usize = 6;
    if text.len() <= KEEP * 2 + 3 || !text.is_ascii() {
        return text.to_string();
    }
    format!("{}...{}", &text[..KEEP], &text[text.len() - KEEP + 2..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abbreviates_long_hex() {
        let address = "0x3f1Eae7D46d88F08fc2F8ed27FCb2AB183EB2d0E";
        assert_eq!(abbreviate(address), "0x3f1E...2d0E");
        assert_eq!(abbreviate("0x1234"), "0x1234");
    }

    #[test]
    fn formats_seconds() {
        assert_eq!(format_secs(Duration::from_millis(120_500)), "120s");
    }
}
