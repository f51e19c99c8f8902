//! BrainVoyager FMR reader and writer.
//!
//! An FMR run is a plain-text header (`Key: value` lines) plus one or more
//! binary STC files next to it, named after the header's `Prefix`:
//!
//! - `DataStorageFormat: 2`: a single `<Prefix>.stc` holding every volume
//!   in temporal order, each volume slice after slice, x fastest.
//! - `DataStorageFormat: 1`: one `<Prefix>-<slice>.stc` per slice
//!   (1-based), each holding that slice for every volume in temporal order.
//!
//! `DataType: 1` stores little-endian `u16` samples, `DataType: 2`
//! little-endian `f32`. Samples are always returned as `f32`.
//!
//! The writer emits storage format 2 with `f32` samples and uses the stem of
//! the `.fmr` path as the prefix.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use super::{read_file, write_file};
use crate::error::Bv2NiiError;
use crate::volume::{convert, ElementKind, Extents, VolumeSeries, VoxelBuffer, VoxelData};

const FORMAT: &str = "FMR";
const STC_FORMAT: &str = "STC";
const WRITER_FILE_VERSION: u32 = 6;
const KEY_WIDTH: usize = 30;
/// Largest run dimension; NIfTI stores each one as an `i16`.
const MAX_DIM: usize = i16::MAX as usize;

/// Storage layout of the STC data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StcLayout {
    /// One STC file per slice.
    PerSlice,
    /// One STC file for the whole run.
    SingleFile,
}

impl StcLayout {
    fn code(self) -> u32 {
        match self {
            StcLayout::PerSlice => 1,
            StcLayout::SingleFile => 2,
        }
    }
}

/// The parts of an FMR header needed to locate and decode the STC data.
#[derive(Clone, Debug, PartialEq)]
pub struct FmrHeader {
    pub file_version: Option<u32>,
    pub volumes: usize,
    pub slices: usize,
    pub resolution_x: usize,
    pub resolution_y: usize,
    pub prefix: String,
    pub layout: StcLayout,
    /// Sample kind stored in the STC files (`u16` or `f32`).
    pub sample_kind: ElementKind,
}

impl FmrHeader {
    /// Spatial extents of one volume.
    pub fn spatial_extents(&self) -> Extents {
        Extents::spatial(self.resolution_x, self.resolution_y, self.slices)
    }

    /// Renders the header as FMR text.
    ///
    /// BrainVoyager starts its headers with a blank line; the writer does
    /// the same.
    pub fn to_text(&self) -> String {
        let mut out = String::from("\n");
        let mut line = |key: &str, value: String| {
            let _ = writeln!(out, "{:<width$}{}", format!("{}:", key), value, width = KEY_WIDTH);
        };

        if let Some(version) = self.file_version {
            line("FileVersion", version.to_string());
        }
        line("NrOfVolumes", self.volumes.to_string());
        line("NrOfSlices", self.slices.to_string());
        line("Prefix", format!("\"{}\"", self.prefix));
        line("DataStorageFormat", self.layout.code().to_string());
        let data_type = if self.sample_kind == ElementKind::U16 { 1 } else { 2 };
        line("DataType", data_type.to_string());
        line("ResolutionX", self.resolution_x.to_string());
        line("ResolutionY", self.resolution_y.to_string());
        out
    }
}

/// Reads an FMR run (header plus STC data) into a series.
pub fn read_fmr(path: &Path) -> Result<VolumeSeries, Bv2NiiError> {
    let bytes = read_file(FORMAT, path)?;
    let text = String::from_utf8_lossy(&bytes);
    let header = parse_fmr_header(&text, path)?;
    let dir = stc_dir(path);

    let spatial = header.spatial_extents();
    let volumes = match header.layout {
        StcLayout::SingleFile => read_single_stc(&dir, &header)?,
        StcLayout::PerSlice => read_per_slice_stc(&dir, &header)?,
    };

    tracing::debug!(
        path = %path.display(),
        extents = %spatial,
        volumes = volumes.len(),
        "read FMR run"
    );
    VolumeSeries::from_volumes(spatial, volumes)
}

/// Writes a series as an FMR header plus a single `<stem>.stc` file.
///
/// Both files are fully serialized before either is written. If the header
/// cannot be written the STC file is removed again.
pub fn write_fmr(path: &Path, series: &VolumeSeries) -> Result<(), Bv2NiiError> {
    let prefix = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Bv2NiiError::write(FORMAT, path, "path has no file stem"))?;

    let spatial = series.spatial_extents();
    let header = FmrHeader {
        file_version: Some(WRITER_FILE_VERSION),
        volumes: series.len(),
        slices: spatial.nz,
        resolution_x: spatial.nx,
        resolution_y: spatial.ny,
        prefix,
        layout: StcLayout::SingleFile,
        sample_kind: ElementKind::F32,
    };

    let mut stc = Vec::with_capacity(series.extents().voxel_count() * ElementKind::F32.byte_size());
    for volume in series.volumes() {
        stc.extend_from_slice(&volume.data().to_le_bytes());
    }
    let text = header.to_text();

    let stc_path = stc_path(path, &header.prefix);
    write_file(STC_FORMAT, &stc_path, &stc)?;
    write_file(FORMAT, path, text.as_bytes()).map_err(|e| {
        let _ = fs::remove_file(&stc_path);
        e
    })
}

/// Location of the single STC file written next to `fmr_path`.
pub fn stc_path(fmr_path: &Path, prefix: &str) -> PathBuf {
    stc_dir(fmr_path).join(format!("{}.stc", prefix))
}

fn stc_dir(fmr_path: &Path) -> PathBuf {
    fmr_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default()
}

/// Parses FMR header text.
///
/// Useful for fuzzing and testing without file I/O.
pub fn from_fmr_header_str(text: &str) -> Result<FmrHeader, Bv2NiiError> {
    parse_fmr_header(text, Path::new("<string>"))
}

fn parse_fmr_header(text: &str, path: &Path) -> Result<FmrHeader, Bv2NiiError> {
    let mut file_version = None;
    let mut volumes = None;
    let mut slices = None;
    let mut resolution_x = None;
    let mut resolution_y = None;
    let mut prefix = None;
    let mut storage_format = 2;
    let mut data_type = 2;

    for (line_idx, line) in text.lines().enumerate() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        let invalid = || {
            Bv2NiiError::read(
                FORMAT,
                path,
                format!(
                    "line {}: {} expects a non-negative integer, got '{}'",
                    line_idx + 1,
                    key.trim(),
                    value
                ),
            )
        };
        let number = || value.parse::<usize>().map_err(|_| invalid());

        match key.trim() {
            "FileVersion" => file_version = Some(value.parse::<u32>().map_err(|_| invalid())?),
            "NrOfVolumes" => volumes = Some(number()?),
            "NrOfSlices" => slices = Some(number()?),
            "ResolutionX" => resolution_x = Some(number()?),
            "ResolutionY" => resolution_y = Some(number()?),
            "Prefix" => prefix = Some(value.trim_matches('"').to_string()),
            "DataStorageFormat" => storage_format = number()?,
            "DataType" => data_type = number()?,
            _ => {}
        }
    }

    let require = |field: Option<usize>, key: &str| {
        field.ok_or_else(|| Bv2NiiError::read(FORMAT, path, format!("missing {} entry", key)))
    };

    let layout = match storage_format {
        1 => StcLayout::PerSlice,
        2 => StcLayout::SingleFile,
        other => {
            return Err(Bv2NiiError::read(
                FORMAT,
                path,
                format!("unsupported DataStorageFormat {}", other),
            ))
        }
    };
    let sample_kind = match data_type {
        1 => ElementKind::U16,
        2 => ElementKind::F32,
        other => {
            return Err(Bv2NiiError::read(
                FORMAT,
                path,
                format!("unsupported DataType {}", other),
            ))
        }
    };
    let prefix = prefix
        .filter(|p| !p.is_empty())
        .ok_or_else(|| Bv2NiiError::read(FORMAT, path, "missing Prefix entry"))?;

    let header = FmrHeader {
        file_version,
        volumes: require(volumes, "NrOfVolumes")?,
        slices: require(slices, "NrOfSlices")?,
        resolution_x: require(resolution_x, "ResolutionX")?,
        resolution_y: require(resolution_y, "ResolutionY")?,
        prefix,
        layout,
        sample_kind,
    };

    for (key, dim) in [
        ("NrOfVolumes", header.volumes),
        ("NrOfSlices", header.slices),
        ("ResolutionX", header.resolution_x),
        ("ResolutionY", header.resolution_y),
    ] {
        if dim > MAX_DIM {
            return Err(Bv2NiiError::read(
                FORMAT,
                path,
                format!("{} {} exceeds the limit of {}", key, dim, MAX_DIM),
            ));
        }
    }

    let total_bytes = [header.resolution_y, header.slices, header.volumes]
        .into_iter()
        .try_fold(header.resolution_x, usize::checked_mul)
        .and_then(|n| n.checked_mul(sample_kind.byte_size()));
    if total_bytes.is_none() {
        return Err(Bv2NiiError::read(
            FORMAT,
            path,
            "run dimensions overflow the addressable size",
        ));
    }
    Ok(header)
}

/// Reads one STC file and returns exactly `expected` float samples.
fn read_stc_samples(
    path: &Path,
    sample_kind: ElementKind,
    expected: usize,
) -> Result<Vec<f32>, Bv2NiiError> {
    let bytes = read_file(STC_FORMAT, path)?;
    let expected_bytes = expected * sample_kind.byte_size();
    if bytes.len() != expected_bytes {
        return Err(Bv2NiiError::read(
            STC_FORMAT,
            path,
            format!(
                "expected {} byte(s) of {} samples, found {}",
                expected_bytes,
                sample_kind,
                bytes.len()
            ),
        ));
    }

    let raw = VoxelData::from_le_bytes(sample_kind, &bytes)
        .ok_or_else(|| Bv2NiiError::read(STC_FORMAT, path, "ragged sample block"))?;
    let VoxelData::F32(samples) = convert::convert(&raw, ElementKind::F32)? else {
        return Err(Bv2NiiError::UnsupportedDatatype {
            from: sample_kind,
            to: ElementKind::F32,
        });
    };
    Ok(samples)
}

fn read_single_stc(dir: &Path, header: &FmrHeader) -> Result<Vec<VoxelBuffer>, Bv2NiiError> {
    let spatial = header.spatial_extents();
    let per_volume = spatial.spatial_len();
    let path = dir.join(format!("{}.stc", header.prefix));
    let samples = read_stc_samples(&path, header.sample_kind, per_volume * header.volumes)?;

    // chunks_exact panics on a zero chunk size; an empty grid still has
    // `volumes` (empty) timepoints.
    if per_volume == 0 {
        return Ok(vec![VoxelBuffer::zeroed(spatial, ElementKind::F32); header.volumes]);
    }
    Ok(samples
        .chunks_exact(per_volume)
        .map(|chunk| VoxelBuffer::from_data(spatial, VoxelData::F32(chunk.to_vec())))
        .collect())
}

fn read_per_slice_stc(dir: &Path, header: &FmrHeader) -> Result<Vec<VoxelBuffer>, Bv2NiiError> {
    let spatial = header.spatial_extents();
    let plane = header.resolution_x * header.resolution_y;

    let slices = (0..header.slices)
        .map(|slice| {
            let path = dir.join(format!("{}-{}.stc", header.prefix, slice + 1));
            read_stc_samples(&path, header.sample_kind, plane * header.volumes)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let volumes = (0..header.volumes)
        .map(|t| {
            let mut volume = Vec::with_capacity(spatial.spatial_len());
            for samples in &slices {
                volume.extend_from_slice(&samples[t * plane..(t + 1) * plane]);
            }
            VoxelBuffer::from_data(spatial, VoxelData::F32(volume))
        })
        .collect();
    Ok(volumes)
}
