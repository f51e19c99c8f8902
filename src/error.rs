use std::path::PathBuf;
use thiserror::Error;

use crate::volume::ElementKind;

/// The main error type for bv2nii operations.
#[derive(Debug, Error)]
pub enum Bv2NiiError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read {format} file {path}: {message}")]
    FormatRead {
        format: &'static str,
        path: PathBuf,
        message: String,
    },

    #[error("Failed to write {format} file {path}: {message}")]
    FormatWrite {
        format: &'static str,
        path: PathBuf,
        message: String,
    },

    #[error("Unsupported datatype conversion: {from} -> {to}")]
    UnsupportedDatatype { from: ElementKind, to: ElementKind },

    #[error("Unsupported datatype code {code} in {path}")]
    UnsupportedDatatypeCode { path: PathBuf, code: i16 },

    #[error("Inconsistent volume series: {message}")]
    SeriesMismatch { message: String },

    #[error("Image in {path} cannot be converted: {message}")]
    ContainerShape { path: PathBuf, message: String },

    #[error("Invalid conversion from {from} to {to}: {reason}")]
    InvalidConversion {
        from: String,
        to: String,
        reason: String,
    },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

impl Bv2NiiError {
    /// Builds a read error for `format` at `path`.
    pub(crate) fn read(
        format: &'static str,
        path: impl Into<PathBuf>,
        message: impl Into<String>,
    ) -> Self {
        Bv2NiiError::FormatRead {
            format,
            path: path.into(),
            message: message.into(),
        }
    }

    /// Builds a write error for `format` at `path`.
    pub(crate) fn write(
        format: &'static str,
        path: impl Into<PathBuf>,
        message: impl Into<String>,
    ) -> Self {
        Bv2NiiError::FormatWrite {
            format,
            path: path.into(),
            message: message.into(),
        }
    }

    /// True for errors raised by the conversion matrix or by a container
    /// declaring a datatype outside the supported set.
    pub fn is_unsupported_datatype(&self) -> bool {
        matches!(
            self,
            Bv2NiiError::UnsupportedDatatype { .. } | Bv2NiiError::UnsupportedDatatypeCode { .. }
        )
    }

    /// True for adapter and container read/write failures.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Bv2NiiError::FormatRead { .. }
                | Bv2NiiError::FormatWrite { .. }
                | Bv2NiiError::ContainerShape { .. }
        )
    }

    /// True for format-tag pairs rejected before any I/O.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Bv2NiiError::InvalidConversion { .. } | Bv2NiiError::UnsupportedFormat(_)
        )
    }
}
