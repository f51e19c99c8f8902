//! Datatype conversion matrix.
//!
//! Maps a voxel array of one element kind to another, value by value.
//! Only widening conversions into `u8`, `u16` and `f32` are defined:
//!
//! | source \ target | u8   | u16  | f32  |
//! |-----------------|------|------|------|
//! | u8              | copy | cast | cast |
//! | i8              | cast | cast | cast |
//! | u16             | -    | copy | cast |
//! | i16             | -    | cast | cast |
//! | f32             | -    | -    | copy |
//!
//! Signed sources are sign-extended and then reinterpreted as the unsigned
//! target's bit pattern (`-1i8` becomes `255u8` or `65535u16`). This mirrors
//! what BrainVoyager tooling does with signed NIfTI input; values are never
//! clamped. Every pair outside the table, including any `i8`/`i16` target,
//! fails with [`Bv2NiiError::UnsupportedDatatype`].

use super::buffer::VoxelBuffer;
use super::data::VoxelData;
use super::kind::ElementKind;
use crate::error::Bv2NiiError;

/// Returns true if `from -> to` has an entry in the matrix.
pub fn is_supported(from: ElementKind, to: ElementKind) -> bool {
    use ElementKind::*;
    matches!(
        (from, to),
        (U8 | I8, U8) | (U8 | I8 | U16 | I16, U16) | (U8 | I8 | U16 | I16 | F32, F32)
    )
}

/// Converts `data` to `target`, producing a new array of the same length.
pub fn convert(data: &VoxelData, target: ElementKind) -> Result<VoxelData, Bv2NiiError> {
    let converted = match (data, target) {
        (VoxelData::U8(v), ElementKind::U8) => VoxelData::U8(v.clone()),
        (VoxelData::I8(v), ElementKind::U8) => VoxelData::U8(cast(v, |x| x as u8)),

        (VoxelData::U8(v), ElementKind::U16) => VoxelData::U16(cast(v, u16::from)),
        (VoxelData::I8(v), ElementKind::U16) => VoxelData::U16(cast(v, |x| x as u16)),
        (VoxelData::U16(v), ElementKind::U16) => VoxelData::U16(v.clone()),
        (VoxelData::I16(v), ElementKind::U16) => VoxelData::U16(cast(v, |x| x as u16)),

        (VoxelData::U8(v), ElementKind::F32) => VoxelData::F32(cast(v, f32::from)),
        (VoxelData::I8(v), ElementKind::F32) => VoxelData::F32(cast(v, f32::from)),
        (VoxelData::U16(v), ElementKind::F32) => VoxelData::F32(cast(v, f32::from)),
        (VoxelData::I16(v), ElementKind::F32) => VoxelData::F32(cast(v, f32::from)),
        (VoxelData::F32(v), ElementKind::F32) => VoxelData::F32(v.clone()),

        (
            VoxelData::U16(_) | VoxelData::I16(_) | VoxelData::F32(_),
            ElementKind::U8,
        )
        | (VoxelData::F32(_), ElementKind::U16)
        | (_, ElementKind::I8 | ElementKind::I16) => {
            return Err(Bv2NiiError::UnsupportedDatatype {
                from: data.kind(),
                to: target,
            });
        }
    };
    Ok(converted)
}

fn cast<S: Copy, T>(src: &[S], f: impl Fn(S) -> T) -> Vec<T> {
    src.iter().map(|&x| f(x)).collect()
}

impl VoxelBuffer {
    /// Converts this buffer to `target`, keeping its extents.
    pub fn convert_to(&self, target: ElementKind) -> Result<VoxelBuffer, Bv2NiiError> {
        let data = convert(self.data(), target)?;
        Ok(VoxelBuffer::from_data(self.extents(), data))
    }
}
