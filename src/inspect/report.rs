//! Inspect report types and terminal formatting.

use serde::Serialize;
use std::fmt;

use crate::volume::{ElementKind, Extents};

/// The result of inspecting a file.
#[derive(Clone, Debug, Serialize)]
pub struct InspectReport {
    /// The inspected file.
    pub path: String,
    /// Format name (`vmr`, `v16`, `fmr` or `nifti`).
    pub format: String,
    pub extents: Extents,
    /// Element kind as stored in the file.
    pub kind: ElementKind,
    /// Total voxels across all volumes.
    pub voxel_count: usize,
    /// Smallest stored value, ignoring NaN. `None` when the file holds no
    /// comparable voxels.
    pub min: Option<f64>,
    /// Largest stored value, ignoring NaN.
    pub max: Option<f64>,
    /// Number of voxels below zero. Only signed kinds can have any.
    pub negative_voxels: usize,
    /// NIfTI `scl_slope` and `scl_inter`, when the file is NIfTI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scaling: Option<(f32, f32)>,
}

impl fmt::Display for InspectReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})", self.path, self.format)?;
        writeln!(f)?;
        writeln!(f, "  Extents:      {}", self.extents)?;
        if self.extents.nt != 1 {
            writeln!(f, "  Volumes:      {}", format_number(self.extents.nt))?;
        }
        writeln!(f, "  Element kind: {}", self.kind)?;
        writeln!(f, "  Voxels:       {}", format_number(self.voxel_count))?;

        match (self.min, self.max) {
            (Some(min), Some(max)) => writeln!(f, "  Range:        {} .. {}", min, max)?,
            _ => writeln!(f, "  Range:        n/a")?,
        }
        if self.negative_voxels > 0 {
            writeln!(
                f,
                "  Negative:     {} ({})",
                format_number(self.negative_voxels),
                fmt_percent(self.negative_voxels, self.voxel_count)
            )?;
        }
        if let Some((slope, inter)) = self.scaling {
            writeln!(f, "  Scaling:      slope {}, intercept {}", slope, inter)?;
        }
        Ok(())
    }
}

/// Format a number with thousands separators.
fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Format a percentage, handling zero denominators.
fn fmt_percent(numerator: usize, denominator: usize) -> String {
    if denominator == 0 {
        "n/a".to_string()
    } else {
        format!("{:.1}%", (numerator as f64 / denominator as f64) * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> InspectReport {
        InspectReport {
            path: "bold.nii".to_string(),
            format: "nifti".to_string(),
            extents: Extents::new(64, 64, 30, 200),
            kind: ElementKind::I16,
            voxel_count: 64 * 64 * 30 * 200,
            min: Some(-12.0),
            max: Some(4000.0),
            negative_voxels: 3,
            scaling: Some((1.0, 0.0)),
        }
    }

    #[test]
    fn format_number_groups_thousands() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(24_576_000), "24,576,000");
    }

    #[test]
    fn display_shows_volumes_and_range() {
        let text = report().to_string();
        assert!(text.contains("64x64x30x200"));
        assert!(text.contains("Volumes:      200"));
        assert!(text.contains("-12 .. 4000"));
        assert!(text.contains("Negative:     3"));
        assert!(text.contains("slope 1, intercept 0"));
    }

    #[test]
    fn display_handles_empty_range() {
        let mut report = report();
        report.min = None;
        report.max = None;
        assert!(report.to_string().contains("Range:        n/a"));
    }

    #[test]
    fn json_omits_scaling_for_native_files() {
        let mut report = report();
        report.scaling = None;
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"kind\":\"i16\""));
        assert!(!json.contains("scaling"));
    }
}
