//! Ordered sequences of volumes for time-series formats.

use super::buffer::VoxelBuffer;
use super::extents::Extents;
use super::kind::ElementKind;
use crate::error::Bv2NiiError;

/// Timepoints of a functional run, in temporal order.
///
/// All volumes share the same spatial grid, hold a single timepoint and
/// are float32. The number of volumes is the `nt` of the container image.
#[derive(Clone, Debug, PartialEq)]
pub struct VolumeSeries {
    spatial: Extents,
    volumes: Vec<VoxelBuffer>,
}

impl VolumeSeries {
    /// The only element kind a series holds.
    pub const KIND: ElementKind = ElementKind::F32;

    /// An empty series over the spatial grid of `extents`.
    pub fn new(extents: Extents) -> Self {
        Self {
            spatial: extents.to_spatial(),
            volumes: Vec::new(),
        }
    }

    /// Builds a series from volumes, checking every element.
    pub fn from_volumes(extents: Extents, volumes: Vec<VoxelBuffer>) -> Result<Self, Bv2NiiError> {
        let mut series = Self::new(extents);
        series.volumes.reserve(volumes.len());
        for volume in volumes {
            series.push(volume)?;
        }
        Ok(series)
    }

    /// Appends the next timepoint.
    pub fn push(&mut self, volume: VoxelBuffer) -> Result<(), Bv2NiiError> {
        let extents = volume.extents();
        if extents != self.spatial {
            return Err(Bv2NiiError::SeriesMismatch {
                message: format!(
                    "timepoint {} has extents {}, expected {}",
                    self.volumes.len(),
                    extents,
                    self.spatial
                ),
            });
        }
        if volume.kind() != Self::KIND {
            return Err(Bv2NiiError::SeriesMismatch {
                message: format!(
                    "timepoint {} holds {} voxels, expected {}",
                    self.volumes.len(),
                    volume.kind(),
                    Self::KIND
                ),
            });
        }
        self.volumes.push(volume);
        Ok(())
    }

    /// Spatial extents shared by every timepoint (`nt == 1`).
    pub fn spatial_extents(&self) -> Extents {
        self.spatial
    }

    /// Extents of the whole run, with `nt` set to the number of volumes.
    pub fn extents(&self) -> Extents {
        Extents::new(self.spatial.nx, self.spatial.ny, self.spatial.nz, self.len())
    }

    pub fn len(&self) -> usize {
        self.volumes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }

    pub fn volumes(&self) -> &[VoxelBuffer] {
        &self.volumes
    }
}
