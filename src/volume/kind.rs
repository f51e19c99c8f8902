//! Voxel element kinds.
//!
//! The five kinds mirror the integer and float32 entries of the NIfTI-1
//! datatype enumeration, so the codes below must never change.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Bv2NiiError;

/// The numeric representation of a single voxel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// Unsigned 8-bit integer.
    U8,
    /// Signed 8-bit integer.
    I8,
    /// Unsigned 16-bit integer.
    U16,
    /// Signed 16-bit integer.
    I16,
    /// 32-bit IEEE float.
    F32,
}

impl ElementKind {
    /// All supported kinds, narrowest first.
    pub const ALL: [ElementKind; 5] = [
        ElementKind::U8,
        ElementKind::I8,
        ElementKind::U16,
        ElementKind::I16,
        ElementKind::F32,
    ];

    /// Size of one element in bytes.
    pub const fn byte_size(self) -> usize {
        match self {
            ElementKind::U8 | ElementKind::I8 => 1,
            ElementKind::U16 | ElementKind::I16 => 2,
            ElementKind::F32 => 4,
        }
    }

    /// Short name used in reports and error messages.
    pub const fn name(self) -> &'static str {
        match self {
            ElementKind::U8 => "u8",
            ElementKind::I8 => "i8",
            ElementKind::U16 => "u16",
            ElementKind::I16 => "i16",
            ElementKind::F32 => "f32",
        }
    }

    /// The NIfTI-1 `datatype` code for this kind.
    pub const fn nifti_code(self) -> i16 {
        match self {
            ElementKind::U8 => 2,
            ElementKind::I16 => 4,
            ElementKind::F32 => 16,
            ElementKind::I8 => 256,
            ElementKind::U16 => 512,
        }
    }

    /// Maps a NIfTI-1 `datatype` code back to a kind.
    ///
    /// Returns `None` for codes this tool does not handle (float64,
    /// complex, 32/64-bit integers, RGB, ...).
    pub fn from_nifti_code(code: i16) -> Option<Self> {
        match code {
            2 => Some(ElementKind::U8),
            4 => Some(ElementKind::I16),
            16 => Some(ElementKind::F32),
            256 => Some(ElementKind::I8),
            512 => Some(ElementKind::U16),
            _ => None,
        }
    }

    /// True for `I8` and `I16`.
    pub const fn is_signed_integer(self) -> bool {
        matches!(self, ElementKind::I8 | ElementKind::I16)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ElementKind {
    type Err = Bv2NiiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ElementKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                Bv2NiiError::UnsupportedFormat(format!(
                    "'{}' is not an element kind (expected u8, i8, u16, i16 or f32)",
                    s
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nifti_codes_match_the_standard() {
        assert_eq!(ElementKind::U8.nifti_code(), 2);
        assert_eq!(ElementKind::I16.nifti_code(), 4);
        assert_eq!(ElementKind::F32.nifti_code(), 16);
        assert_eq!(ElementKind::I8.nifti_code(), 256);
        assert_eq!(ElementKind::U16.nifti_code(), 512);
    }

    #[test]
    fn nifti_codes_round_trip() {
        for kind in ElementKind::ALL {
            assert_eq!(ElementKind::from_nifti_code(kind.nifti_code()), Some(kind));
        }
    }

    #[test]
    fn float64_and_complex_codes_are_rejected() {
        assert_eq!(ElementKind::from_nifti_code(64), None);
        assert_eq!(ElementKind::from_nifti_code(32), None);
        assert_eq!(ElementKind::from_nifti_code(8), None);
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("U16".parse::<ElementKind>().unwrap(), ElementKind::U16);
        assert!("f64".parse::<ElementKind>().is_err());
    }
}
