//! BrainVoyager V16 reader and writer.
//!
//! V16 files hold a 16-bit anatomical volume: three little-endian `u16`
//! dimensions followed by `DimX * DimY * DimZ` little-endian `u16` voxels.

use std::path::Path;

use super::{decode_dims, encode_dims, ensure_single_volume, read_file, write_file, DIMS_LEN};
use crate::error::Bv2NiiError;
use crate::volume::{ElementKind, VoxelBuffer, VoxelData};

const FORMAT: &str = "V16";

/// Reads a V16 file into a `u16` volume.
pub fn read_v16(path: &Path) -> Result<VoxelBuffer, Bv2NiiError> {
    let bytes = read_file(FORMAT, path)?;
    parse_v16(&bytes, path)
}

/// Writes a `u16` volume as a V16 file.
pub fn write_v16(path: &Path, volume: &VoxelBuffer) -> Result<(), Bv2NiiError> {
    let bytes = encode_v16(volume, path)?;
    write_file(FORMAT, path, &bytes)
}

/// Reads a V16 volume from raw bytes.
///
/// Useful for fuzzing and testing without file I/O.
pub fn from_v16_slice(bytes: &[u8]) -> Result<VoxelBuffer, Bv2NiiError> {
    parse_v16(bytes, Path::new("<bytes>"))
}

/// Serializes a volume to V16 bytes.
pub fn to_v16_bytes(volume: &VoxelBuffer) -> Result<Vec<u8>, Bv2NiiError> {
    encode_v16(volume, Path::new("<bytes>"))
}

fn parse_v16(bytes: &[u8], path: &Path) -> Result<VoxelBuffer, Bv2NiiError> {
    if bytes.len() < DIMS_LEN {
        return Err(Bv2NiiError::read(
            FORMAT,
            path,
            format!("file is {} byte(s), too short for a header", bytes.len()),
        ));
    }

    let extents = decode_dims(bytes, 0);
    let expected = DIMS_LEN + extents.voxel_count() * ElementKind::U16.byte_size();
    if bytes.len() != expected {
        return Err(Bv2NiiError::read(
            FORMAT,
            path,
            format!(
                "expected {} byte(s) for a {} volume, found {}",
                expected,
                extents,
                bytes.len()
            ),
        ));
    }

    let data = VoxelData::from_le_bytes(ElementKind::U16, &bytes[DIMS_LEN..])
        .ok_or_else(|| Bv2NiiError::read(FORMAT, path, "voxel block has odd length"))?;
    Ok(VoxelBuffer::from_data(extents, data))
}

fn encode_v16(volume: &VoxelBuffer, path: &Path) -> Result<Vec<u8>, Bv2NiiError> {
    ensure_single_volume(FORMAT, path, volume.extents())?;
    if volume.kind() != ElementKind::U16 {
        return Err(Bv2NiiError::write(
            FORMAT,
            path,
            format!("expected {} voxels, got {}", ElementKind::U16, volume.kind()),
        ));
    }

    let mut out = Vec::with_capacity(DIMS_LEN + volume.byte_len());
    out.extend_from_slice(&encode_dims(FORMAT, path, volume.extents())?);
    out.extend_from_slice(&volume.data().to_le_bytes());
    Ok(out)
}
