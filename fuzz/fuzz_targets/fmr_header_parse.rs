//! Fuzz target for FMR header text parsing.
//!
//! Run with:
//!   cargo +nightly fuzz run fmr_header_parse

#![no_main]

use bv2nii::native::io_fmr::from_fmr_header_str;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // FMR headers are a few hundred bytes; anything past 1MB is noise.
    if data.len() > 1024 * 1024 {
        return;
    }

    if let Ok(text) = std::str::from_utf8(data) {
        let _ = from_fmr_header_str(text);
    }
});
