//! Conversion report types.
//!
//! A report records what a conversion produced and every place where the
//! output differs from a literal copy of the input: kinds that changed,
//! values that were reinterpreted, header fields that were not carried.

use serde::Serialize;
use std::fmt;

use crate::volume::{ElementKind, Extents};

/// A report generated by [`convert`](super::convert).
#[derive(Clone, Debug, Serialize)]
pub struct ConversionReport {
    /// Source format name.
    pub from: String,
    /// Target format name.
    pub to: String,
    /// Extents of the converted data (`nt` is the volume count).
    pub extents: Extents,
    /// Element kind as read from the source.
    pub source_kind: ElementKind,
    /// Element kind written to the destination.
    pub output_kind: ElementKind,
    /// Issues discovered during conversion.
    pub issues: Vec<ConversionIssue>,
}

impl ConversionReport {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        extents: Extents,
        source_kind: ElementKind,
        output_kind: ElementKind,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            extents,
            source_kind,
            output_kind,
            issues: Vec::new(),
        }
    }

    pub fn add(&mut self, issue: ConversionIssue) {
        self.issues.push(issue);
    }

    /// Count of warning-level issues (values changed meaning).
    pub fn warning_count(&self) -> usize {
        self.count(ConversionSeverity::Warning)
    }

    /// Count of info-level issues (policy notes).
    pub fn info_count(&self) -> usize {
        self.count(ConversionSeverity::Info)
    }

    /// Returns true if any voxel value no longer means what it meant in
    /// the source.
    pub fn is_lossy(&self) -> bool {
        self.warning_count() > 0
    }

    /// Returns true if an issue with `code` was recorded.
    pub fn has(&self, code: ConversionIssueCode) -> bool {
        self.issues.iter().any(|i| i.code == code)
    }

    fn count(&self, severity: ConversionSeverity) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == severity)
            .count()
    }

    fn write_section(
        &self,
        f: &mut fmt::Formatter<'_>,
        title: &str,
        severity: ConversionSeverity,
    ) -> fmt::Result {
        let count = self.count(severity);
        if count == 0 {
            return Ok(());
        }
        writeln!(f)?;
        writeln!(f, "{} ({}):", title, count)?;
        for issue in self.issues.iter().filter(|i| i.severity == severity) {
            writeln!(f, "  - {}", issue.message)?;
        }
        Ok(())
    }
}

impl fmt::Display for ConversionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "  {} voxel(s), extents {}",
            self.extents.voxel_count(),
            self.extents
        )?;
        if self.source_kind == self.output_kind {
            writeln!(f, "  element kind: {}", self.output_kind)?;
        } else {
            writeln!(
                f,
                "  element kind: {} -> {}",
                self.source_kind, self.output_kind
            )?;
        }

        self.write_section(f, "Warnings", ConversionSeverity::Warning)?;
        self.write_section(f, "Notes", ConversionSeverity::Info)
    }
}

/// A single issue discovered during conversion.
#[derive(Clone, Debug, Serialize)]
pub struct ConversionIssue {
    pub severity: ConversionSeverity,
    pub code: ConversionIssueCode,
    pub message: String,
}

impl ConversionIssue {
    pub fn warning(code: ConversionIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: ConversionSeverity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn info(code: ConversionIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: ConversionSeverity::Info,
            code,
            message: message.into(),
        }
    }
}

/// Severity level for conversion issues.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionSeverity {
    /// Voxel values were altered in meaning.
    Warning,
    /// A policy note; values are intact.
    Info,
}

/// Stable issue codes for programmatic consumption.
///
/// These codes are part of the JSON output and should remain stable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionIssueCode {
    /// Negative signed voxels were reinterpreted as large unsigned values.
    NegativeValuesReinterpreted,
    /// The element kind was widened to fit the destination format.
    ElementKindWidened,
    /// Source `scl_slope`/`scl_inter` were present but not applied.
    ScalingIgnored,
    /// An FMR destination also produced its `.stc` data file.
    StcCompanionWritten,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> ConversionReport {
        ConversionReport::new(
            "nifti",
            "v16",
            Extents::spatial(2, 2, 2),
            ElementKind::I16,
            ElementKind::U16,
        )
    }

    #[test]
    fn empty_report_is_not_lossy() {
        let report = report();
        assert!(!report.is_lossy());
        assert_eq!(report.warning_count(), 0);
        assert_eq!(report.info_count(), 0);
    }

    #[test]
    fn warning_makes_report_lossy() {
        let mut report = report();
        report.add(ConversionIssue::warning(
            ConversionIssueCode::NegativeValuesReinterpreted,
            "3 negative voxel(s) reinterpreted",
        ));
        assert!(report.is_lossy());
        assert!(report.has(ConversionIssueCode::NegativeValuesReinterpreted));
        assert!(!report.has(ConversionIssueCode::ScalingIgnored));
    }

    #[test]
    fn info_does_not_make_report_lossy() {
        let mut report = report();
        report.add(ConversionIssue::info(
            ConversionIssueCode::ElementKindWidened,
            "i16 widened to u16",
        ));
        assert!(!report.is_lossy());
        assert_eq!(report.info_count(), 1);
    }

    #[test]
    fn display_lists_kind_change_and_sections() {
        let mut report = report();
        report.add(ConversionIssue::warning(
            ConversionIssueCode::NegativeValuesReinterpreted,
            "negatives",
        ));
        let text = report.to_string();
        assert!(text.contains("8 voxel(s), extents 2x2x2"));
        assert!(text.contains("i16 -> u16"));
        assert!(text.contains("Warnings (1):"));
        assert!(!text.contains("Notes"));
    }

    #[test]
    fn report_serializes_to_json() {
        let mut report = report();
        report.add(ConversionIssue::info(
            ConversionIssueCode::ScalingIgnored,
            "scl_slope 2 ignored",
        ));

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"from\":\"nifti\""));
        assert!(json.contains("\"source_kind\":\"i16\""));
        assert!(json.contains("\"nx\":2"));
        assert!(json.contains("\"severity\":\"info\""));
        assert!(json.contains("\"code\":\"scaling_ignored\""));
    }
}
