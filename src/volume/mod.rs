//! In-memory volume model for bv2nii.
//!
//! Every conversion passes through this module. Native readers produce a
//! [`VoxelBuffer`] (or a [`VolumeSeries`] for time series), the container
//! bridge turns those into NIfTI images and back, and the conversion
//! matrix in [`convert`] bridges the fixed native element kinds to the
//! variable element kind of the container.
//!
//! # Design Principles
//!
//! 1. **Owned, typed storage**: voxels live in a [`VoxelData`] enum with
//!    one `Vec` per element kind, so there are no raw casts between byte
//!    buffers and typed slices.
//!
//! 2. **Whole-buffer access**: buffers are always complete. The element
//!    count equals the product of the extents for the whole lifetime of a
//!    buffer; there are no partial or strided views.
//!
//! 3. **Explicit conversions**: every (source, target) element-kind pair is
//!    either implemented or rejected with an error. There is no fallback
//!    cast.
//!
//! # Example
//!
//! ```
//! use bv2nii::volume::{ElementKind, Extents, VoxelBuffer, VoxelData};
//!
//! let buffer = VoxelBuffer::from_data(
//!     Extents::spatial(2, 2, 2),
//!     VoxelData::U8((0..8).collect()),
//! );
//! let widened = buffer.convert_to(ElementKind::U16).unwrap();
//! assert_eq!(widened.data(), &VoxelData::U16((0..8).collect()));
//! ```

mod buffer;
pub mod convert;
mod data;
mod extents;
mod kind;
mod series;

// Re-export core types for convenient access
pub use buffer::VoxelBuffer;
pub use data::VoxelData;
pub use extents::Extents;
pub use kind::ElementKind;
pub use series::VolumeSeries;
