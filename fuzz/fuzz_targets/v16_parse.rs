//! Fuzz target for V16 parsing.
//!
//! Run with:
//!   cargo +nightly fuzz run v16_parse

#![no_main]

use bv2nii::native::io_v16::from_v16_slice;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let _ = from_v16_slice(data);
});
