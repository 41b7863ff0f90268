//! Fuzz target for label map parsing.
//!
//! Run with:
//!   cargo +nightly fuzz run label_map_parse

#![no_main]

use libfuzzer_sys::fuzz_target;
use voc2vott::voc::parse_label_map_str;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    for tag in parse_label_map_str(&text) {
        assert!(!tag.is_empty());
        assert!(!tag.chars().any(char::is_whitespace));
    }
});
