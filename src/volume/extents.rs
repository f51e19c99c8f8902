//! Grid extents of a volume or time series.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Size of a voxel grid along x, y, z and time.
///
/// Spatial volumes have `nt == 1`. Voxels are addressed in row-major
/// order with x varying fastest, then y, then z, then t.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Extents {
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
    pub nt: usize,
}

impl Extents {
    /// Creates 4D extents.
    pub const fn new(nx: usize, ny: usize, nz: usize, nt: usize) -> Self {
        Self { nx, ny, nz, nt }
    }

    /// Creates spatial-only extents (`nt == 1`).
    pub const fn spatial(nx: usize, ny: usize, nz: usize) -> Self {
        Self::new(nx, ny, nz, 1)
    }

    /// Number of voxels in one timepoint.
    #[inline]
    pub fn spatial_len(&self) -> usize {
        self.nx * self.ny * self.nz
    }

    /// Number of voxels across all timepoints.
    #[inline]
    pub fn voxel_count(&self) -> usize {
        self.spatial_len() * self.nt
    }

    /// The same grid with the time axis collapsed to a single timepoint.
    pub fn to_spatial(&self) -> Self {
        Self::spatial(self.nx, self.ny, self.nz)
    }
}

impl fmt::Display for Extents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.nx, self.ny, self.nz)?;
        if self.nt != 1 {
            write!(f, "x{}", self.nt)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voxel_count_includes_time() {
        let extents = Extents::new(4, 4, 4, 5);
        assert_eq!(extents.spatial_len(), 64);
        assert_eq!(extents.voxel_count(), 320);
        assert_eq!(extents.to_spatial(), Extents::spatial(4, 4, 4));
    }

    #[test]
    fn zero_extent_gives_empty_grid() {
        assert_eq!(Extents::spatial(0, 3, 3).voxel_count(), 0);
    }

    #[test]
    fn display_omits_single_timepoint() {
        assert_eq!(Extents::spatial(2, 3, 4).to_string(), "2x3x4");
        assert_eq!(Extents::new(2, 3, 4, 10).to_string(), "2x3x4x10");
    }
}
