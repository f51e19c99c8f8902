//! Fuzz target for VMR parsing, including version detection.
//!
//! Run with:
//!   cargo +nightly fuzz run vmr_parse

#![no_main]

use bv2nii::native::io_vmr::{from_vmr_slice, fuzz_detect_layout};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let _ = fuzz_detect_layout(data);
    let _ = from_vmr_slice(data);
});
