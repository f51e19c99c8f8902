//! The owning voxel buffer shared by every conversion path.

use super::data::VoxelData;
use super::extents::Extents;
use super::kind::ElementKind;

/// A complete voxel grid: extents plus exactly `extents.voxel_count()`
/// elements of a single kind.
///
/// The element count never disagrees with the extents. Constructors that
/// receive caller data assert this, since a mismatch can only come from a
/// bug in the caller.
#[derive(Clone, Debug, PartialEq)]
pub struct VoxelBuffer {
    extents: Extents,
    data: VoxelData,
}

impl VoxelBuffer {
    /// Zero-initialized buffer of the given shape and kind.
    pub fn zeroed(extents: Extents, kind: ElementKind) -> Self {
        Self {
            extents,
            data: VoxelData::zeroed(kind, extents.voxel_count()),
        }
    }

    /// Wraps existing voxel data.
    ///
    /// # Panics
    /// Panics if `data.len()` differs from `extents.voxel_count()`.
    pub fn from_data(extents: Extents, data: VoxelData) -> Self {
        assert_eq!(
            data.len(),
            extents.voxel_count(),
            "voxel data length does not match extents {}",
            extents
        );
        Self { extents, data }
    }

    /// Bulk-copies `src` into this buffer.
    ///
    /// # Panics
    /// Panics if `src` has a different kind or element count.
    pub fn copy_from(&mut self, src: &VoxelData) {
        assert_eq!(
            src.kind(),
            self.kind(),
            "cannot copy {} voxels into a {} buffer",
            src.kind(),
            self.kind()
        );
        assert_eq!(
            src.len(),
            self.element_count(),
            "source length does not match extents {}",
            self.extents
        );
        self.data.clone_from(src);
    }

    #[inline]
    pub fn extents(&self) -> Extents {
        self.extents
    }

    #[inline]
    pub fn kind(&self) -> ElementKind {
        self.data.kind()
    }

    /// `nx * ny * nz * nt`.
    #[inline]
    pub fn element_count(&self) -> usize {
        self.extents.voxel_count()
    }

    pub fn byte_len(&self) -> usize {
        self.data.byte_len()
    }

    /// The whole voxel array, for bulk I/O.
    pub fn data(&self) -> &VoxelData {
        &self.data
    }

    pub fn into_data(self) -> VoxelData {
        self.data
    }

    pub fn into_parts(self) -> (Extents, VoxelData) {
        (self.extents, self.data)
    }
}
