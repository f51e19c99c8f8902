//! Readers and writers for the BrainVoyager native formats.
//!
//! Each format fixes its own element kind:
//!
//! - [`io_vmr`]: anatomical volumes, `u8`
//! - [`io_v16`]: anatomical volumes, `u16`
//! - [`io_fmr`]: functional runs (`.fmr` header plus `.stc` data), `f32`
//!
//! All readers load the whole file before decoding, and all writers
//! serialize the whole output in memory before creating the destination,
//! so a failure never leaves a truncated file behind.

pub mod io_fmr;
pub mod io_v16;
pub mod io_vmr;

use std::fs;
use std::path::Path;

use byteorder::{ByteOrder, LittleEndian};

use crate::error::Bv2NiiError;
use crate::volume::Extents;

/// Length of the `DimX, DimY, DimZ` block shared by VMR and V16.
pub(crate) const DIMS_LEN: usize = 6;

/// Reads an entire file, reporting failures as format read errors.
pub(crate) fn read_file(format: &'static str, path: &Path) -> Result<Vec<u8>, Bv2NiiError> {
    fs::read(path).map_err(|e| Bv2NiiError::read(format, path, e.to_string()))
}

/// Writes an entire file, reporting failures as format write errors.
pub(crate) fn write_file(
    format: &'static str,
    path: &Path,
    bytes: &[u8],
) -> Result<(), Bv2NiiError> {
    fs::write(path, bytes).map_err(|e| Bv2NiiError::write(format, path, e.to_string()))
}

/// Decodes three little-endian `u16` dimensions starting at `offset`.
///
/// The caller guarantees `bytes.len() >= offset + DIMS_LEN`.
pub(crate) fn decode_dims(bytes: &[u8], offset: usize) -> Extents {
    let dim = |i: usize| LittleEndian::read_u16(&bytes[offset + 2 * i..offset + 2 * i + 2]);
    Extents::spatial(dim(0) as usize, dim(1) as usize, dim(2) as usize)
}

/// Encodes spatial extents as three little-endian `u16` values.
pub(crate) fn encode_dims(
    format: &'static str,
    path: &Path,
    extents: Extents,
) -> Result<[u8; DIMS_LEN], Bv2NiiError> {
    let mut out = [0u8; DIMS_LEN];
    for (i, dim) in [extents.nx, extents.ny, extents.nz].into_iter().enumerate() {
        let dim = u16::try_from(dim).map_err(|_| {
            Bv2NiiError::write(
                format,
                path,
                format!("dimension {} exceeds the format limit of {}", dim, u16::MAX),
            )
        })?;
        LittleEndian::write_u16(&mut out[2 * i..2 * i + 2], dim);
    }
    Ok(out)
}

/// Rejects anything other than a single spatial volume.
pub(crate) fn ensure_single_volume(
    format: &'static str,
    path: &Path,
    extents: Extents,
) -> Result<(), Bv2NiiError> {
    if extents.nt != 1 {
        return Err(Bv2NiiError::write(
            format,
            path,
            format!("expected a single volume, got extents {}", extents),
        ));
    }
    Ok(())
}
