//! File inspection.
//!
//! Reads any supported file and summarizes its shape and value range
//! without converting it.

mod report;

pub use report::InspectReport;

use std::path::Path;

use crate::container;
use crate::conversion::Format;
use crate::error::Bv2NiiError;
use crate::native::{io_fmr, io_v16, io_vmr};
use crate::volume::{ElementKind, Extents, VoxelData};

/// Inspect a file, inferring its format from the extension when `format`
/// is `None`.
pub fn inspect_file(path: &Path, format: Option<Format>) -> Result<InspectReport, Bv2NiiError> {
    let format = match format {
        Some(format) => format,
        None => Format::from_path(path)?,
    };

    let summary = match format {
        Format::Vmr => {
            let volume = io_vmr::read_vmr(path)?;
            Summary::of(volume.extents(), volume.data())
        }
        Format::V16 => {
            let volume = io_v16::read_v16(path)?;
            Summary::of(volume.extents(), volume.data())
        }
        Format::Fmr => {
            let series = io_fmr::read_fmr(path)?;
            let mut summary = Summary::empty(series.extents(), ElementKind::F32);
            for volume in series.volumes() {
                summary.merge(volume.data());
            }
            summary
        }
        Format::Nifti => {
            let image = container::read_container(path)?;
            let mut summary = Summary::of(image.extents(), image.data());
            summary.scaling = Some(image.scaling());
            summary
        }
    };
    tracing::debug!(path = %path.display(), format = %format, "inspected file");

    Ok(InspectReport {
        path: path.display().to_string(),
        format: format.name().to_string(),
        extents: summary.extents,
        kind: summary.kind,
        voxel_count: summary.extents.voxel_count(),
        min: summary.range.map(|(min, _)| min),
        max: summary.range.map(|(_, max)| max),
        negative_voxels: summary.negative,
        scaling: summary.scaling,
    })
}

/// Running value statistics.
struct Summary {
    extents: Extents,
    kind: ElementKind,
    range: Option<(f64, f64)>,
    negative: usize,
    scaling: Option<(f32, f32)>,
}

impl Summary {
    fn empty(extents: Extents, kind: ElementKind) -> Self {
        Self {
            extents,
            kind,
            range: None,
            negative: 0,
            scaling: None,
        }
    }

    fn of(extents: Extents, data: &VoxelData) -> Self {
        let mut summary = Self::empty(extents, data.kind());
        summary.merge(data);
        summary
    }

    fn merge(&mut self, data: &VoxelData) {
        self.negative += data.count_negative();
        self.range = match (self.range, data.min_max()) {
            (Some((lo, hi)), Some((min, max))) => Some((lo.min(min), hi.max(max))),
            (range, None) => range,
            (None, next) => next,
        };
    }
}
