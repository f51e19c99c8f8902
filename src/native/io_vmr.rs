//! BrainVoyager VMR reader and writer.
//!
//! A VMR file stores an 8-bit anatomical volume. Version 1 files start with
//! three little-endian `u16` dimensions (DimX, DimY, DimZ) followed by
//! `DimX * DimY * DimZ` bytes, x fastest. Later versions prepend a `u16`
//! file version and append a post-data header with spatial metadata.
//!
//! The reader accepts both layouts and ignores the post-data header. The
//! writer emits version 1, which every BrainVoyager release can open.

use std::path::Path;

use byteorder::{ByteOrder, LittleEndian};

use super::{decode_dims, encode_dims, ensure_single_volume, read_file, write_file, DIMS_LEN};
use crate::error::Bv2NiiError;
use crate::volume::{ElementKind, Extents, VoxelBuffer, VoxelData};

const FORMAT: &str = "VMR";
const VERSION_LEN: usize = 2;

/// Reads a VMR file into a `u8` volume.
pub fn read_vmr(path: &Path) -> Result<VoxelBuffer, Bv2NiiError> {
    let bytes = read_file(FORMAT, path)?;
    parse_vmr(&bytes, path)
}

/// Writes a `u8` volume as a version 1 VMR file.
pub fn write_vmr(path: &Path, volume: &VoxelBuffer) -> Result<(), Bv2NiiError> {
    let bytes = encode_vmr(volume, path)?;
    write_file(FORMAT, path, &bytes)
}

/// Reads a VMR volume from raw bytes.
///
/// Useful for fuzzing and testing without file I/O.
pub fn from_vmr_slice(bytes: &[u8]) -> Result<VoxelBuffer, Bv2NiiError> {
    parse_vmr(bytes, Path::new("<bytes>"))
}

/// Serializes a volume to VMR bytes.
pub fn to_vmr_bytes(volume: &VoxelBuffer) -> Result<Vec<u8>, Bv2NiiError> {
    encode_vmr(volume, Path::new("<bytes>"))
}

/// Fuzz-only entrypoint for layout detection.
#[cfg(feature = "fuzzing")]
pub fn fuzz_detect_layout(bytes: &[u8]) -> Option<(u16, usize)> {
    detect_layout(bytes).map(|layout| (layout.version, layout.data_offset))
}

/// Where the voxel block starts and how large the volume is.
#[derive(Debug, PartialEq)]
struct Layout {
    version: u16,
    data_offset: usize,
    extents: Extents,
}

/// Distinguishes version 1 files (no version word) from later versions.
///
/// A version 1 file is exactly header plus voxels. Anything else is read as
/// version word, dims, voxels and an optional trailer.
fn detect_layout(bytes: &[u8]) -> Option<Layout> {
    if bytes.len() < DIMS_LEN {
        return None;
    }

    let v1 = decode_dims(bytes, 0);
    if bytes.len() == DIMS_LEN + v1.voxel_count() {
        return Some(Layout {
            version: 1,
            data_offset: DIMS_LEN,
            extents: v1,
        });
    }

    let data_offset = VERSION_LEN + DIMS_LEN;
    if bytes.len() < data_offset {
        return None;
    }
    let extents = decode_dims(bytes, VERSION_LEN);
    if bytes.len() < data_offset + extents.voxel_count() {
        return None;
    }
    Some(Layout {
        version: LittleEndian::read_u16(&bytes[..VERSION_LEN]),
        data_offset,
        extents,
    })
}

fn parse_vmr(bytes: &[u8], path: &Path) -> Result<VoxelBuffer, Bv2NiiError> {
    let layout = detect_layout(bytes).ok_or_else(|| {
        Bv2NiiError::read(
            FORMAT,
            path,
            format!(
                "{} byte(s) do not hold a header and a complete voxel block",
                bytes.len()
            ),
        )
    })?;

    let end = layout.data_offset + layout.extents.voxel_count();
    if end < bytes.len() {
        tracing::debug!(
            path = %path.display(),
            version = layout.version,
            trailer_bytes = bytes.len() - end,
            "ignoring VMR post-data header"
        );
    }

    let voxels = bytes[layout.data_offset..end].to_vec();
    Ok(VoxelBuffer::from_data(layout.extents, VoxelData::U8(voxels)))
}

fn encode_vmr(volume: &VoxelBuffer, path: &Path) -> Result<Vec<u8>, Bv2NiiError> {
    ensure_single_volume(FORMAT, path, volume.extents())?;
    let VoxelData::U8(voxels) = volume.data() else {
        return Err(Bv2NiiError::write(
            FORMAT,
            path,
            format!("expected {} voxels, got {}", ElementKind::U8, volume.kind()),
        ));
    };

    let mut out = Vec::with_capacity(DIMS_LEN + voxels.len());
    out.extend_from_slice(&encode_dims(FORMAT, path, volume.extents())?);
    out.extend_from_slice(voxels);
    Ok(out)
}
