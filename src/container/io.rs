//! NIfTI-1 file reading and writing.
//!
//! Both `.nii` and `.nii.gz` are supported. Compression is detected from the
//! gzip magic bytes on read and from the `.gz` extension on write.

use std::io::{Read, Write};
use std::path::Path;

use byteorder::{BigEndian, LittleEndian};
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use super::header::NiftiHeader;
use super::image::ContainerImage;
use crate::error::Bv2NiiError;
use crate::native::{read_file, write_file};
use crate::volume::VoxelData;

const FORMAT: &str = "NIfTI";
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Reads a `.nii` or `.nii.gz` file.
pub fn read_container(path: &Path) -> Result<ContainerImage, Bv2NiiError> {
    let bytes = read_file(FORMAT, path)?;
    let bytes = if is_gzip(&bytes) {
        gunzip(&bytes, path)?
    } else {
        bytes
    };
    parse_nifti(&bytes, path)
}

/// Writes an image as single-file NIfTI-1, gzip-compressed when `path`
/// ends in `.gz` (any case).
pub fn write_container(path: &Path, image: &ContainerImage) -> Result<(), Bv2NiiError> {
    let mut bytes = encode_nifti(image, path)?;
    if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("gz")) {
        bytes = gzip(&bytes, path)?;
    }
    write_file(FORMAT, path, &bytes)
}

/// Reads an image from uncompressed or gzip-compressed NIfTI bytes.
///
/// Useful for fuzzing and testing without file I/O.
pub fn from_nifti_slice(bytes: &[u8]) -> Result<ContainerImage, Bv2NiiError> {
    let path = Path::new("<bytes>");
    if is_gzip(bytes) {
        parse_nifti(&gunzip(bytes, path)?, path)
    } else {
        parse_nifti(bytes, path)
    }
}

/// Serializes an image to uncompressed NIfTI-1 bytes.
pub fn to_nifti_bytes(image: &ContainerImage) -> Result<Vec<u8>, Bv2NiiError> {
    encode_nifti(image, Path::new("<bytes>"))
}

/// Reads only the header of a `.nii` or `.nii.gz` file.
pub fn read_header(path: &Path) -> Result<NiftiHeader, Bv2NiiError> {
    let bytes = read_file(FORMAT, path)?;
    if is_gzip(&bytes) {
        NiftiHeader::parse(&gunzip(&bytes, path)?, path)
    } else {
        NiftiHeader::parse(&bytes, path)
    }
}

fn is_gzip(bytes: &[u8]) -> bool {
    bytes.starts_with(&GZIP_MAGIC)
}

fn gunzip(compressed: &[u8], path: &Path) -> Result<Vec<u8>, Bv2NiiError> {
    let mut out = Vec::with_capacity(compressed.len() * 2);
    MultiGzDecoder::new(compressed)
        .read_to_end(&mut out)
        .map_err(|e| Bv2NiiError::read(FORMAT, path, format!("gzip decode failed: {}", e)))?;
    Ok(out)
}

fn gzip(bytes: &[u8], path: &Path) -> Result<Vec<u8>, Bv2NiiError> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(bytes.len() / 2), Compression::default());
    encoder
        .write_all(bytes)
        .and_then(|_| encoder.finish())
        .map_err(|e| Bv2NiiError::write(FORMAT, path, format!("gzip encode failed: {}", e)))
}

fn parse_nifti(bytes: &[u8], path: &Path) -> Result<ContainerImage, Bv2NiiError> {
    let header = NiftiHeader::parse(bytes, path)?;
    let extents = header.extents();

    let start = header.vox_offset as usize;
    let end = header
        .data_len()
        .and_then(|len| start.checked_add(len))
        .ok_or_else(|| Bv2NiiError::read(FORMAT, path, "image dimensions overflow"))?;
    if bytes.len() < end {
        return Err(Bv2NiiError::read(
            FORMAT,
            path,
            format!(
                "voxel data truncated: {} image needs {} byte(s) from offset {}, file has {}",
                extents,
                end - start,
                start,
                bytes.len()
            ),
        ));
    }

    let raw = &bytes[start..end];
    let data = if header.is_little_endian() {
        VoxelData::from_bytes::<LittleEndian>(header.kind, raw)
    } else {
        VoxelData::from_bytes::<BigEndian>(header.kind, raw)
    }
    .ok_or_else(|| Bv2NiiError::read(FORMAT, path, "ragged voxel block"))?;

    tracing::debug!(
        path = %path.display(),
        extents = %extents,
        kind = %header.kind,
        little_endian = header.is_little_endian(),
        "parsed NIfTI image"
    );

    Ok(ContainerImage::new(extents, data).with_scaling(header.scl_slope, header.scl_inter))
}

fn encode_nifti(image: &ContainerImage, path: &Path) -> Result<Vec<u8>, Bv2NiiError> {
    let header = NiftiHeader::for_image(image.extents(), image.kind()).map_err(|e| match e {
        Bv2NiiError::FormatWrite { message, .. } => Bv2NiiError::write(FORMAT, path, message),
        other => other,
    })?;

    let data = image.data().to_le_bytes();
    let mut out = Vec::with_capacity(NiftiHeader::DEFAULT_VOX_OFFSET + data.len());
    out.extend_from_slice(&header.to_bytes());
    // empty extension block: bytes 348..352 are all zero
    out.resize(NiftiHeader::DEFAULT_VOX_OFFSET, 0);
    out.extend_from_slice(&data);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::volume::{ElementKind, Extents};

    fn sample() -> ContainerImage {
        ContainerImage::new(
            Extents::new(2, 2, 1, 3),
            VoxelData::I16((-6..6).collect()),
        )
    }

    #[test]
    fn bytes_round_trip() {
        let bytes = to_nifti_bytes(&sample()).unwrap();
        assert_eq!(bytes.len(), 352 + 12 * 2);
        assert_eq!(from_nifti_slice(&bytes).unwrap(), sample());
    }

    #[test]
    fn gzip_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("image.nii.gz");
        write_container(&path, &sample()).unwrap();

        let raw = std::fs::read(&path).unwrap();
        assert!(raw.starts_with(&GZIP_MAGIC));
        assert_eq!(read_container(&path).unwrap(), sample());
    }

    #[test]
    fn uppercase_gz_extension_is_compressed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("IMAGE.NII.GZ");
        write_container(&path, &sample()).unwrap();

        let raw = std::fs::read(&path).unwrap();
        assert!(raw.starts_with(&GZIP_MAGIC));
        assert_eq!(read_container(&path).unwrap(), sample());
    }

    #[test]
    fn read_header_reports_extents_of_compressed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("image.nii.gz");
        write_container(&path, &sample()).unwrap();

        let header = read_header(&path).unwrap();
        assert_eq!(header.extents(), Extents::new(2, 2, 1, 3));
        assert_eq!(header.kind, ElementKind::I16);
    }

    #[test]
    fn read_header_ignores_missing_voxel_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("header_only.nii");
        let bytes = to_nifti_bytes(&sample()).unwrap();
        std::fs::write(&path, &bytes[..NiftiHeader::DEFAULT_VOX_OFFSET]).unwrap();

        assert_eq!(read_header(&path).unwrap().extents(), Extents::new(2, 2, 1, 3));
        assert!(read_container(&path).unwrap_err().is_format_error());
    }

    #[test]
    fn gzip_detected_by_content_not_name() {
        let dir = tempfile::tempdir().unwrap();
        let gz = dir.path().join("image.nii.gz");
        write_container(&gz, &sample()).unwrap();
        let misnamed = dir.path().join("image.nii");
        std::fs::rename(&gz, &misnamed).unwrap();

        assert_eq!(read_container(&misnamed).unwrap(), sample());
    }

    #[test]
    fn truncated_data_is_a_format_error() {
        let mut bytes = to_nifti_bytes(&sample()).unwrap();
        bytes.truncate(bytes.len() - 1);
        let err = from_nifti_slice(&bytes).unwrap_err();
        assert!(err.to_string().contains("truncated"));
    }

    #[test]
    fn reads_big_endian_voxels() {
        let image = ContainerImage::new(Extents::spatial(2, 1, 1), VoxelData::U16(vec![1, 258]));
        let mut bytes = to_nifti_bytes(&image).unwrap();

        // Flip the header fields the parser needs and the voxel block.
        bytes[0..4].reverse();
        for offset in (40..56).step_by(2) {
            bytes[offset..offset + 2].reverse();
        }
        bytes[70..72].reverse();
        bytes[72..74].reverse();
        bytes[108..112].reverse();
        bytes[352..354].reverse();
        bytes[354..356].reverse();

        let parsed = from_nifti_slice(&bytes).unwrap();
        assert_eq!(parsed.kind(), ElementKind::U16);
        assert_eq!(parsed.data(), &VoxelData::U16(vec![1, 258]));
    }

    #[test]
    fn scaling_is_carried_not_applied() {
        let image = ContainerImage::new(Extents::spatial(1, 1, 1), VoxelData::U8(vec![10]));
        let mut bytes = to_nifti_bytes(&image).unwrap();
        bytes[112..116].copy_from_slice(&2.0f32.to_le_bytes());

        let parsed = from_nifti_slice(&bytes).unwrap();
        assert_eq!(parsed.data(), &VoxelData::U8(vec![10]));
        assert_eq!(parsed.scaling(), (2.0, 0.0));
        assert!(parsed.has_scaling());
    }
}
