use std::path::PathBuf;
use thiserror::Error;

use crate::validation::ValidationReport;

/// The main error type for voc2vott operations.
#[derive(Debug, Error)]
pub enum Voc2VottError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input folder does not exist: {path}")]
    InputMissing { path: PathBuf },

    #[error("Invalid Pascal VOC layout at {path}: {message}")]
    LayoutInvalid { path: PathBuf, message: String },

    #[error("No tag list available from label map {path}: {message}")]
    LabelMap { path: PathBuf, message: String },

    #[error("Failed to read project template {path}: {source}")]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse project template {path}: {source}")]
    TemplateParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid project template {path}: {message}")]
    TemplateInvalid { path: PathBuf, message: String },

    #[error("A project name is required when no template is given")]
    MissingProjectName,

    #[error("Malformed VOC XML in {path}: {message}")]
    VocXmlMalformed { path: PathBuf, message: String },

    #[error("Failed to parse VOC XML {path}: {message}")]
    VocXmlParse { path: PathBuf, message: String },

    #[error("Failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to scan annotations directory {path}: {message}")]
    Scan { path: PathBuf, message: String },

    #[error("Failed to write asset file {path}: {source}")]
    AssetWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize asset {path}: {source}")]
    AssetSerialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to back up project file {path} to {backup}: {source}")]
    ProjectBackup {
        path: PathBuf,
        backup: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write project file {path}: {source}")]
    ProjectWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize project {path}: {source}")]
    ProjectSerialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize report: {0}")]
    ReportSerialize(#[source] serde_json::Error),

    #[error("Validation failed with {error_count} error(s) and {warning_count} warning(s)")]
    ValidationFailed {
        error_count: usize,
        warning_count: usize,
        report: ValidationReport,
    },
}

/// Broad classification of a [`Voc2VottError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input layout, label map, template or options. Raised before any output.
    Configuration,
    /// A single annotation document could not be parsed.
    Parse,
    /// Reading, writing, serializing or renaming an output failed.
    Io,
    /// The post-conversion validation pass failed in strict mode.
    Validation,
}

impl Voc2VottError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Voc2VottError::InputMissing { .. }
            | Voc2VottError::LayoutInvalid { .. }
            | Voc2VottError::LabelMap { .. }
            | Voc2VottError::TemplateRead { .. }
            | Voc2VottError::TemplateParse { .. }
            | Voc2VottError::TemplateInvalid { .. }
            | Voc2VottError::MissingProjectName => ErrorKind::Configuration,
            Voc2VottError::VocXmlMalformed { .. } | Voc2VottError::VocXmlParse { .. } => {
                ErrorKind::Parse
            }
            Voc2VottError::Io(_)
            | Voc2VottError::OutputDir { .. }
            | Voc2VottError::Scan { .. }
            | Voc2VottError::AssetWrite { .. }
            | Voc2VottError::AssetSerialize { .. }
            | Voc2VottError::ProjectBackup { .. }
            | Voc2VottError::ProjectWrite { .. }
            | Voc2VottError::ProjectSerialize { .. }
            | Voc2VottError::ReportSerialize(_) => ErrorKind::Io,
            Voc2VottError::ValidationFailed { .. } => ErrorKind::Validation,
        }
    }

    /// Returns true for record-level annotation failures, malformed or incomplete.
    pub fn is_parse_error(&self) -> bool {
        self.kind() == ErrorKind::Parse
    }
}
