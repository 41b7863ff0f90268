//! Conversion report types.
//!
//! A report summarizes one run: what was read, what was written, and which
//! policy decisions were applied along the way.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Summary of a finished conversion.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ConversionReport {
    /// Name of the project as recorded in the project file.
    pub project_name: Option<String>,
    /// Path of the written `.vott` file.
    pub project_path: PathBuf,
    /// Where the previous project file was moved, if one existed.
    pub backup_path: Option<PathBuf>,
    /// Directory holding the project and asset files.
    pub output_dir: PathBuf,
    pub counts: ConversionCounts,
    /// Issues noted during conversion.
    pub issues: Vec<ConversionIssue>,
}

impl ConversionReport {
    /// Add an issue to the report.
    pub fn add(&mut self, issue: ConversionIssue) {
        self.issues.push(issue);
    }

    /// Count of warning-level issues.
    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == ConversionSeverity::Warning)
            .count()
    }

    /// Count of info-level issues.
    pub fn info_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == ConversionSeverity::Info)
            .count()
    }

    /// Annotation files skipped under the skip-and-warn policy.
    pub fn skipped_files(&self) -> impl Iterator<Item = &PathBuf> {
        self.issues
            .iter()
            .filter(|i| i.code == ConversionIssueCode::SkippedAnnotationFile)
            .filter_map(|i| i.path.as_ref())
    }
}

impl fmt::Display for ConversionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "  {} annotation file(s), {} asset(s), {} region(s), {} tag(s)",
            self.counts.annotation_files,
            self.counts.assets,
            self.counts.regions,
            self.counts.tags
        )?;
        writeln!(f, "  project: {}", self.project_path.display())?;

        if let Some(backup) = &self.backup_path {
            writeln!(f, "  previous project backed up to {}", backup.display())?;
        }

        let warnings = self.warning_count();
        if warnings > 0 {
            writeln!(f)?;
            writeln!(f, "Warnings ({}):", warnings)?;
            for issue in self
                .issues
                .iter()
                .filter(|i| i.severity == ConversionSeverity::Warning)
            {
                writeln!(f, "  - {}", issue.message)?;
            }
        }

        let infos = self.info_count();
        if infos > 0 {
            writeln!(f)?;
            writeln!(f, "Notes ({}):", infos)?;
            for issue in self
                .issues
                .iter()
                .filter(|i| i.severity == ConversionSeverity::Info)
            {
                writeln!(f, "  - {}", issue.message)?;
            }
        }

        Ok(())
    }
}

/// Counts of what a run read and produced.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ConversionCounts {
    /// `.xml` files found in the annotations folder.
    pub annotation_files: usize,
    /// Assets written, one per successfully parsed file.
    pub assets: usize,
    pub regions: usize,
    pub tags: usize,
}

/// A single issue noted during conversion.
#[derive(Clone, Debug, Serialize)]
pub struct ConversionIssue {
    pub severity: ConversionSeverity,
    pub code: ConversionIssueCode,
    pub message: String,
    /// File the issue concerns, if any.
    pub path: Option<PathBuf>,
}

impl ConversionIssue {
    pub fn warning(
        code: ConversionIssueCode,
        message: impl Into<String>,
        path: Option<PathBuf>,
    ) -> Self {
        Self {
            severity: ConversionSeverity::Warning,
            code,
            message: message.into(),
            path,
        }
    }

    pub fn info(code: ConversionIssueCode, message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self {
            severity: ConversionSeverity::Info,
            code,
            message: message.into(),
            path,
        }
    }
}

/// Severity level for conversion issues.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionSeverity {
    /// Input was dropped.
    Warning,
    /// A policy decision was applied.
    Info,
}

/// Stable issue codes for programmatic consumption.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionIssueCode {
    /// An annotation file failed to parse and was skipped.
    SkippedAnnotationFile,
    /// An existing project file was moved to a `.old` backup.
    ProjectBackedUp,
    /// Project settings were cloned from a template.
    TemplateSettingsUsed,
    /// The annotations folder contained no `.xml` files.
    NoAnnotationFiles,
}
