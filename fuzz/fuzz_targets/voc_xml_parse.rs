//! Fuzz target for Pascal VOC XML parsing.
//!
//! Run with:
//!   cargo +nightly fuzz run voc_xml_parse

#![no_main]

use std::path::Path;

use libfuzzer_sys::fuzz_target;
use voc2vott::voc::from_voc_xml_slice;
use voc2vott::vott::{build_asset, IdGenerator};

fuzz_target!(|data: &[u8]| {
    // Annotation files are small; skip anything that would only exercise the allocator.
    if data.len() > 1024 * 1024 {
        return;
    }

    // Parsed records must also survive asset assembly.
    if let Ok(record) = from_voc_xml_slice(data) {
        let _ = build_asset(&record, Path::new("/images"), &mut IdGenerator::seeded(0));
    }
});
