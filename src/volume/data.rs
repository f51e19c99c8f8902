//! Typed, owned voxel storage.

use std::ops::Range;

use byteorder::{ByteOrder, LittleEndian};

use super::kind::ElementKind;

/// A contiguous voxel array tagged with its element kind.
///
/// Dropping the value releases the storage, so a failed conversion never
/// leaves a half-filled allocation behind.
#[derive(Clone, Debug, PartialEq)]
pub enum VoxelData {
    U8(Vec<u8>),
    I8(Vec<i8>),
    U16(Vec<u16>),
    I16(Vec<i16>),
    F32(Vec<f32>),
}

/// Applies the same expression to the inner `Vec` of every variant.
macro_rules! each_variant {
    ($data:expr, $v:ident => $body:expr) => {
        match $data {
            VoxelData::U8($v) => $body,
            VoxelData::I8($v) => $body,
            VoxelData::U16($v) => $body,
            VoxelData::I16($v) => $body,
            VoxelData::F32($v) => $body,
        }
    };
}

impl VoxelData {
    /// Zero-filled storage of `len` elements.
    pub fn zeroed(kind: ElementKind, len: usize) -> Self {
        match kind {
            ElementKind::U8 => VoxelData::U8(vec![0; len]),
            ElementKind::I8 => VoxelData::I8(vec![0; len]),
            ElementKind::U16 => VoxelData::U16(vec![0; len]),
            ElementKind::I16 => VoxelData::I16(vec![0; len]),
            ElementKind::F32 => VoxelData::F32(vec![0.0; len]),
        }
    }

    /// Element kind of the stored voxels.
    pub fn kind(&self) -> ElementKind {
        match self {
            VoxelData::U8(_) => ElementKind::U8,
            VoxelData::I8(_) => ElementKind::I8,
            VoxelData::U16(_) => ElementKind::U16,
            VoxelData::I16(_) => ElementKind::I16,
            VoxelData::F32(_) => ElementKind::F32,
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        each_variant!(self, v => v.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Size of the raw storage in bytes.
    pub fn byte_len(&self) -> usize {
        self.len() * self.kind().byte_size()
    }

    /// Decodes little-endian raw bytes.
    ///
    /// Returns `None` when `bytes` is not a whole number of elements.
    pub fn from_le_bytes(kind: ElementKind, bytes: &[u8]) -> Option<Self> {
        Self::from_bytes::<LittleEndian>(kind, bytes)
    }

    /// Decodes raw bytes stored in byte order `E`.
    ///
    /// Returns `None` when `bytes` is not a whole number of elements.
    pub fn from_bytes<E: ByteOrder>(kind: ElementKind, bytes: &[u8]) -> Option<Self> {
        if bytes.len() % kind.byte_size() != 0 {
            return None;
        }
        let len = bytes.len() / kind.byte_size();

        let data = match kind {
            ElementKind::U8 => VoxelData::U8(bytes.to_vec()),
            ElementKind::I8 => VoxelData::I8(bytes.iter().map(|&b| b as i8).collect()),
            ElementKind::U16 => {
                let mut out = vec![0u16; len];
                E::read_u16_into(bytes, &mut out);
                VoxelData::U16(out)
            }
            ElementKind::I16 => {
                let mut out = vec![0i16; len];
                E::read_i16_into(bytes, &mut out);
                VoxelData::I16(out)
            }
            ElementKind::F32 => {
                let mut out = vec![0f32; len];
                E::read_f32_into(bytes, &mut out);
                VoxelData::F32(out)
            }
        };
        Some(data)
    }

    /// Encodes the voxels as little-endian raw bytes.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        let mut buf = vec![0u8; self.byte_len()];
        match self {
            VoxelData::U8(v) => buf.copy_from_slice(v),
            VoxelData::I8(v) => {
                for (dst, &src) in buf.iter_mut().zip(v) {
                    *dst = src as u8;
                }
            }
            VoxelData::U16(v) => LittleEndian::write_u16_into(v, &mut buf),
            VoxelData::I16(v) => LittleEndian::write_i16_into(v, &mut buf),
            VoxelData::F32(v) => LittleEndian::write_f32_into(v, &mut buf),
        }
        buf
    }

    /// Copies out the elements in `range`.
    ///
    /// # Panics
    /// Panics if `range` is out of bounds.
    pub fn slice(&self, range: Range<usize>) -> Self {
        match self {
            VoxelData::U8(v) => VoxelData::U8(v[range].to_vec()),
            VoxelData::I8(v) => VoxelData::I8(v[range].to_vec()),
            VoxelData::U16(v) => VoxelData::U16(v[range].to_vec()),
            VoxelData::I16(v) => VoxelData::I16(v[range].to_vec()),
            VoxelData::F32(v) => VoxelData::F32(v[range].to_vec()),
        }
    }

    /// Appends `other` to the end of this buffer.
    ///
    /// # Panics
    /// Panics if the element kinds differ.
    pub fn extend_from(&mut self, other: &VoxelData) {
        match (self, other) {
            (VoxelData::U8(a), VoxelData::U8(b)) => a.extend_from_slice(b),
            (VoxelData::I8(a), VoxelData::I8(b)) => a.extend_from_slice(b),
            (VoxelData::U16(a), VoxelData::U16(b)) => a.extend_from_slice(b),
            (VoxelData::I16(a), VoxelData::I16(b)) => a.extend_from_slice(b),
            (VoxelData::F32(a), VoxelData::F32(b)) => a.extend_from_slice(b),
            (a, b) => panic!(
                "cannot append {} voxels to a {} buffer",
                b.kind(),
                a.kind()
            ),
        }
    }

    /// Joins `parts` end to end into one buffer of `kind`.
    ///
    /// # Panics
    /// Panics if any part has a different kind.
    pub fn concat<'a>(kind: ElementKind, parts: impl IntoIterator<Item = &'a VoxelData>) -> Self {
        let mut out = VoxelData::zeroed(kind, 0);
        for part in parts {
            out.extend_from(part);
        }
        out
    }

    /// Smallest and largest value, or `None` for an empty buffer.
    ///
    /// NaN samples are skipped.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        each_variant!(self, v => v.iter().map(|&x| x as f64).filter(|x| !x.is_nan()).fold(
            None,
            |acc: Option<(f64, f64)>, x| match acc {
                None => Some((x, x)),
                Some((lo, hi)) => Some((lo.min(x), hi.max(x))),
            },
        ))
    }

    /// Number of elements below zero.
    pub fn count_negative(&self) -> usize {
        match self {
            VoxelData::U8(_) | VoxelData::U16(_) => 0,
            VoxelData::I8(v) => v.iter().filter(|&&x| x < 0).count(),
            VoxelData::I16(v) => v.iter().filter(|&&x| x < 0).count(),
            VoxelData::F32(v) => v.iter().filter(|&&x| x < 0.0).count(),
        }
    }
}
