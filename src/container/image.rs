//! In-memory NIfTI image.

use crate::volume::{ElementKind, Extents, VoxelData};

/// A NIfTI image: extents, declared element kind and a flat voxel array.
///
/// The element count always equals `extents.voxel_count()`. Scaling
/// parameters read from a file are kept for reporting but never applied.
#[derive(Clone, Debug, PartialEq)]
pub struct ContainerImage {
    extents: Extents,
    data: VoxelData,
    scl_slope: f32,
    scl_inter: f32,
}

impl ContainerImage {
    /// Wraps voxel data with identity scaling.
    ///
    /// # Panics
    /// Panics if `data.len()` differs from `extents.voxel_count()`.
    pub fn new(extents: Extents, data: VoxelData) -> Self {
        assert_eq!(
            data.len(),
            extents.voxel_count(),
            "container data length does not match extents {}",
            extents
        );
        Self {
            extents,
            data,
            scl_slope: 1.0,
            scl_inter: 0.0,
        }
    }

    /// Records the file's `scl_slope` and `scl_inter`.
    pub fn with_scaling(mut self, slope: f32, inter: f32) -> Self {
        self.scl_slope = slope;
        self.scl_inter = inter;
        self
    }

    pub fn extents(&self) -> Extents {
        self.extents
    }

    /// The declared element kind.
    pub fn kind(&self) -> ElementKind {
        self.data.kind()
    }

    pub fn data(&self) -> &VoxelData {
        &self.data
    }

    pub fn scaling(&self) -> (f32, f32) {
        (self.scl_slope, self.scl_inter)
    }

    /// True if the stored scaling would alter voxel values in a reader
    /// that applies it.
    pub fn has_scaling(&self) -> bool {
        let slope_is_identity = self.scl_slope == 0.0 || self.scl_slope == 1.0;
        !(slope_is_identity && self.scl_inter == 0.0)
    }
}
