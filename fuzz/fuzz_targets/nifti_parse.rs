//! Fuzz target for NIfTI-1 parsing (header and voxel block, plain or gzip).
//!
//! Run with:
//!   cargo +nightly fuzz run nifti_parse

#![no_main]

use bv2nii::container::{from_nifti_slice, NiftiHeader};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Cap input size to avoid OOM on very large inputs.
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let _ = NiftiHeader::from_bytes(data);
    let _ = from_nifti_slice(data);
});
