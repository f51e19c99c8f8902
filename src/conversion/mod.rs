//! Conversion between BrainVoyager formats and NIfTI-1.
//!
//! A [`ConversionRequest`] names a source and a destination together with
//! their formats. Exactly one side must be NIfTI: [`plan`] turns the request
//! into a [`Direction`] before any file is opened, and [`convert`] then runs
//! a single linear pipeline of read, translate and write.
//!
//! The destination is created only after the source has been read and
//! fully translated in memory, so a failed conversion leaves no output.

pub mod report;

pub use report::{ConversionIssue, ConversionIssueCode, ConversionReport, ConversionSeverity};

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::bridge;
use crate::container::{self, ContainerImage};
use crate::error::Bv2NiiError;
use crate::native::{io_fmr, io_v16, io_vmr};
use crate::volume::ElementKind;

/// File format tag.
///
/// This mirrors the CLI's format argument but is decoupled from clap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Format {
    /// BrainVoyager anatomical volume, `u8` voxels.
    Vmr,
    /// BrainVoyager 16-bit anatomical volume, `u16` voxels.
    V16,
    /// BrainVoyager functional run: text header plus `.stc` data, `f32`.
    Fmr,
    /// NIfTI-1 single file, optionally gzip-compressed.
    Nifti,
}

impl Format {
    pub const ALL: [Format; 4] = [Format::Vmr, Format::V16, Format::Fmr, Format::Nifti];

    pub fn name(&self) -> &'static str {
        match self {
            Format::Vmr => "vmr",
            Format::V16 => "v16",
            Format::Fmr => "fmr",
            Format::Nifti => "nifti",
        }
    }

    /// The element kind a native format stores; `None` for NIfTI, which
    /// declares its own.
    pub fn native_kind(&self) -> Option<ElementKind> {
        match self {
            Format::Vmr => Some(ElementKind::U8),
            Format::V16 => Some(ElementKind::U16),
            Format::Fmr => Some(ElementKind::F32),
            Format::Nifti => None,
        }
    }

    pub fn is_native(&self) -> bool {
        self.native_kind().is_some()
    }

    /// Infers the format from a file name.
    ///
    /// Recognizes `.vmr`, `.v16`, `.fmr`, `.nii` and `.nii.gz`, ignoring
    /// case.
    pub fn from_path(path: &Path) -> Result<Format, Bv2NiiError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        if name.ends_with(".nii.gz") {
            return Ok(Format::Nifti);
        }
        let ext = Path::new(&name)
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        match ext.as_str() {
            "vmr" => Ok(Format::Vmr),
            "v16" => Ok(Format::V16),
            "fmr" => Ok(Format::Fmr),
            "nii" => Ok(Format::Nifti),
            "vtc" => Err(Bv2NiiError::UnsupportedFormat(format!(
                "{}: VTC files are not supported",
                path.display()
            ))),
            _ => Err(Bv2NiiError::UnsupportedFormat(format!(
                "cannot infer format from '{}' (expected .vmr, .v16, .fmr, .nii or .nii.gz)",
                path.display()
            ))),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = Bv2NiiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "vmr" => Ok(Format::Vmr),
            "v16" => Ok(Format::V16),
            "fmr" => Ok(Format::Fmr),
            "nifti" | "nii" | "nii.gz" => Ok(Format::Nifti),
            other => Err(Bv2NiiError::UnsupportedFormat(format!(
                "'{}' (supported: vmr, v16, fmr, nifti)",
                other
            ))),
        }
    }
}

/// A single conversion: where to read, where to write, and in which
/// formats.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversionRequest {
    pub source: PathBuf,
    pub source_format: Format,
    pub destination: PathBuf,
    pub destination_format: Format,
}

impl ConversionRequest {
    pub fn new(
        source: impl Into<PathBuf>,
        source_format: Format,
        destination: impl Into<PathBuf>,
        destination_format: Format,
    ) -> Self {
        Self {
            source: source.into(),
            source_format,
            destination: destination.into(),
            destination_format,
        }
    }

    /// Builds a request with both formats inferred from file extensions.
    pub fn from_paths(
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
    ) -> Result<Self, Bv2NiiError> {
        let source = source.into();
        let destination = destination.into();
        let source_format = Format::from_path(&source)?;
        let destination_format = Format::from_path(&destination)?;
        Ok(Self::new(
            source,
            source_format,
            destination,
            destination_format,
        ))
    }
}

/// Which way a conversion runs, carrying the native side's format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Native file in, NIfTI out.
    ToContainer(Format),
    /// NIfTI in, native file out.
    FromContainer(Format),
}

/// Validates the format pair of a request.
///
/// Exactly one side must be NIfTI; the other must be a native format.
pub fn plan(request: &ConversionRequest) -> Result<Direction, Bv2NiiError> {
    let from = request.source_format;
    let to = request.destination_format;
    let invalid = |reason: &str| Bv2NiiError::InvalidConversion {
        from: from.name().to_string(),
        to: to.name().to_string(),
        reason: reason.to_string(),
    };

    match (from.is_native(), to.is_native()) {
        (true, false) => Ok(Direction::ToContainer(from)),
        (false, true) => Ok(Direction::FromContainer(to)),
        _ if from == to => Err(invalid("source and destination formats are identical")),
        (true, true) => Err(invalid(
            "conversions between BrainVoyager formats are not supported; one side must be NIfTI",
        )),
        (false, false) => Err(invalid("NIfTI to NIfTI conversion is not supported")),
    }
}

/// Runs a conversion and reports what it did.
pub fn convert(request: &ConversionRequest) -> Result<ConversionReport, Bv2NiiError> {
    let direction = plan(request)?;
    tracing::info!(
        source = %request.source.display(),
        destination = %request.destination.display(),
        from = %request.source_format,
        to = %request.destination_format,
        "converting"
    );

    match direction {
        Direction::ToContainer(native) => to_container(request, native),
        Direction::FromContainer(native) => from_container(request, native),
    }
}

fn to_container(
    request: &ConversionRequest,
    native: Format,
) -> Result<ConversionReport, Bv2NiiError> {
    let source = &request.source;
    let image = match native {
        Format::Vmr => bridge::encode_volume(io_vmr::read_vmr(source)?),
        Format::V16 => bridge::encode_volume(io_v16::read_v16(source)?),
        Format::Fmr => bridge::encode_series(&io_fmr::read_fmr(source)?),
        Format::Nifti => return Err(nifti_is_not_native()),
    };
    tracing::debug!(
        extents = %image.extents(),
        kind = %image.kind(),
        "encoded container image"
    );

    container::write_container(&request.destination, &image)?;
    tracing::info!(path = %request.destination.display(), "wrote NIfTI image");

    Ok(ConversionReport::new(
        native.name(),
        Format::Nifti.name(),
        image.extents(),
        image.kind(),
        image.kind(),
    ))
}

fn from_container(
    request: &ConversionRequest,
    native: Format,
) -> Result<ConversionReport, Bv2NiiError> {
    let source = &request.source;
    let destination = &request.destination;
    let image = container::read_container(source)?;
    tracing::debug!(
        path = %source.display(),
        extents = %image.extents(),
        kind = %image.kind(),
        "read NIfTI image"
    );

    let (extents, output_kind) = match native {
        Format::Vmr | Format::V16 => {
            let target = if native == Format::Vmr {
                ElementKind::U8
            } else {
                ElementKind::U16
            };
            let volume = bridge::decode_volume(&image, target, source)?;
            let extents = volume.extents();
            if native == Format::Vmr {
                io_vmr::write_vmr(destination, &volume)?;
            } else {
                io_v16::write_v16(destination, &volume)?;
            }
            (extents, target)
        }
        Format::Fmr => {
            let series = bridge::decode_series(&image)?;
            io_fmr::write_fmr(destination, &series)?;
            (series.extents(), ElementKind::F32)
        }
        Format::Nifti => return Err(nifti_is_not_native()),
    };
    tracing::info!(path = %destination.display(), kind = %output_kind, "wrote native file");

    let mut report = ConversionReport::new(
        Format::Nifti.name(),
        native.name(),
        extents,
        image.kind(),
        output_kind,
    );
    add_decode_notes(&mut report, &image, native, destination);
    Ok(report)
}

fn nifti_is_not_native() -> Bv2NiiError {
    Bv2NiiError::InvalidConversion {
        from: Format::Nifti.name().to_string(),
        to: Format::Nifti.name().to_string(),
        reason: "NIfTI is not a native format".to_string(),
    }
}

fn add_decode_notes(
    report: &mut ConversionReport,
    image: &ContainerImage,
    native: Format,
    destination: &Path,
) {
    let from = report.source_kind;
    let to = report.output_kind;

    if from.is_signed_integer() && to != ElementKind::F32 {
        let negatives = image.data().count_negative();
        if negatives > 0 {
            report.add(ConversionIssue::warning(
                ConversionIssueCode::NegativeValuesReinterpreted,
                format!(
                    "{} negative {} voxel(s) reinterpreted as large {} values",
                    negatives, from, to
                ),
            ));
        }
    }

    if from != to {
        report.add(ConversionIssue::info(
            ConversionIssueCode::ElementKindWidened,
            format!("voxels widened from {} to {}", from, to),
        ));
    }

    if image.has_scaling() {
        let (slope, inter) = image.scaling();
        report.add(ConversionIssue::info(
            ConversionIssueCode::ScalingIgnored,
            format!(
                "scl_slope {} and scl_inter {} were not applied to stored values",
                slope, inter
            ),
        ));
    }

    if native == Format::Fmr {
        let stem = destination
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        report.add(ConversionIssue::info(
            ConversionIssueCode::StcCompanionWritten,
            format!(
                "series data written to {}",
                io_fmr::stc_path(destination, &stem).display()
            ),
        ));
    }
}
