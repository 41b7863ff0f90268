//! Pascal VOC → VoTT conversion.
//!
//! A run is strictly sequential:
//! validate input → load tags → scan annotations → (parse → write asset)
//! per file → assemble and write the project. Nothing is written before the
//! input has been validated and the annotations folder scanned. Asset files already written are left in place if
//! a later step fails.

pub mod report;

pub use report::{
    ConversionCounts, ConversionIssue, ConversionIssueCode, ConversionReport, ConversionSeverity,
};

use std::fs;
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use serde_json::{Map, Value};

use crate::error::Voc2VottError;
use crate::voc::{self, VocLayout};
use crate::vott::{self, io_json, AssetDocument, IdGenerator, ProjectBase, ProjectDescriptor};

/// What to do when an annotation file cannot be parsed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ParseErrorPolicy {
    /// Stop the run at the first unparsable file.
    #[default]
    Abort,
    /// Warn, leave the file out, and carry on.
    SkipAndWarn,
}

/// Options for a conversion run.
#[derive(Clone, Debug)]
pub struct ConvertOptions {
    /// Dataset root holding the annotations and images folders and the label map.
    pub input_root: PathBuf,
    /// Directory receiving the project and asset files. Created if missing.
    pub output_dir: PathBuf,
    /// Project name; also the project file stem. Falls back to the template's
    /// file stem when unset.
    pub project_name: Option<String>,
    /// Existing `.vott` file to clone settings from.
    pub template: Option<PathBuf>,
    pub on_parse_error: ParseErrorPolicy,
    /// Seed for ids and tag colors; entropy when unset.
    pub seed: Option<u64>,
    pub show_progress: bool,
}

impl ConvertOptions {
    pub fn new(
        input_root: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        project_name: impl Into<String>,
    ) -> Self {
        Self {
            input_root: input_root.into(),
            output_dir: output_dir.into(),
            project_name: Some(project_name.into()),
            template: None,
            on_parse_error: ParseErrorPolicy::Abort,
            seed: None,
            show_progress: false,
        }
    }
}

/// Everything a finished run produced.
#[derive(Clone, Debug)]
pub struct Conversion {
    pub report: ConversionReport,
    /// Tag vocabulary in label-map order.
    pub tags: Vec<String>,
    /// Asset documents in the order they were written.
    pub documents: Vec<AssetDocument>,
}

/// Input checked and loaded before anything is written.
struct PreparedInput {
    layout: VocLayout,
    tags: Vec<String>,
    template: Option<Map<String, Value>>,
    project_stem: String,
    xml_files: Vec<PathBuf>,
}

/// Run a full conversion.
pub fn convert(opts: &ConvertOptions) -> Result<Conversion, Voc2VottError> {
    let input = prepare_input(opts)?;

    fs::create_dir_all(&opts.output_dir).map_err(|source| Voc2VottError::OutputDir {
        path: opts.output_dir.clone(),
        source,
    })?;
    let images_dir = absolute(&input.layout.images_dir)?;
    let output_dir = absolute(&opts.output_dir)?;

    let mut ids = match opts.seed {
        Some(seed) => IdGenerator::seeded(seed),
        None => IdGenerator::from_entropy(),
    };
    let mut report = ConversionReport {
        output_dir: output_dir.clone(),
        ..Default::default()
    };

    let base = match input.template {
        Some(template) => {
            report.add(ConversionIssue::info(
                ConversionIssueCode::TemplateSettingsUsed,
                "project settings cloned from template",
                opts.template.clone(),
            ));
            ProjectBase::with_template(template, opts.project_name.as_deref())
        }
        None => ProjectBase::generate_defaults(
            &input.project_stem,
            &images_dir,
            &output_dir,
            &mut ids,
        ),
    };

    let xml_files = input.xml_files;
    if xml_files.is_empty() {
        report.add(ConversionIssue::info(
            ConversionIssueCode::NoAnnotationFiles,
            "annotations folder contains no .xml files; the project has no assets",
            Some(input.layout.annotations_dir.clone()),
        ));
    }

    let documents = convert_annotations(
        &xml_files,
        &images_dir,
        &output_dir,
        opts,
        &mut ids,
        &mut report,
    )?;

    let assets = documents.iter().map(|doc| doc.asset.clone()).collect();
    let project = ProjectDescriptor::assemble(base, &input.tags, assets, &mut ids);
    let written = io_json::write_project_json(&output_dir, &input.project_stem, &project)?;

    if let Some(backup) = &written.backup {
        report.add(ConversionIssue::info(
            ConversionIssueCode::ProjectBackedUp,
            format!(
                "{} existed and was backed up to {}",
                written.path.display(),
                backup.display()
            ),
            Some(backup.clone()),
        ));
    }

    report.project_name = project.base.name().map(ToOwned::to_owned);
    report.project_path = written.path;
    report.backup_path = written.backup;
    report.counts = ConversionCounts {
        annotation_files: xml_files.len(),
        assets: documents.len(),
        regions: documents.iter().map(|doc| doc.regions.len()).sum(),
        tags: input.tags.len(),
    };

    Ok(Conversion {
        report,
        tags: input.tags,
        documents,
    })
}

fn prepare_input(opts: &ConvertOptions) -> Result<PreparedInput, Voc2VottError> {
    let layout = voc::discover_layout(&opts.input_root)?;

    let tags = voc::read_label_map(&layout.label_map)?;
    if tags.is_empty() {
        return Err(Voc2VottError::LabelMap {
            path: layout.label_map.clone(),
            message: "label map contains no tag names".to_string(),
        });
    }

    let template = opts
        .template
        .as_deref()
        .map(io_json::read_template)
        .transpose()?;

    let project_stem = match (&opts.project_name, &opts.template) {
        (Some(name), _) => name.clone(),
        (None, Some(template)) => template_stem(template)?,
        (None, None) => return Err(Voc2VottError::MissingProjectName),
    };
    if project_stem.trim().is_empty() {
        return Err(Voc2VottError::MissingProjectName);
    }

    let xml_files = voc::collect_xml_files(&layout.annotations_dir)?;

    Ok(PreparedInput {
        layout,
        tags,
        template,
        project_stem,
        xml_files,
    })
}

fn template_stem(template: &Path) -> Result<String, Voc2VottError> {
    template
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .ok_or_else(|| Voc2VottError::TemplateInvalid {
            path: template.to_path_buf(),
            message: "cannot derive a project name from the template path".to_string(),
        })
}

fn convert_annotations(
    xml_files: &[PathBuf],
    images_dir: &Path,
    output_dir: &Path,
    opts: &ConvertOptions,
    ids: &mut IdGenerator,
    report: &mut ConversionReport,
) -> Result<Vec<AssetDocument>, Voc2VottError> {
    let progress = progress_bar(xml_files.len(), opts.show_progress);
    let mut documents = Vec::with_capacity(xml_files.len());

    for xml_path in xml_files {
        let record = match voc::parse_voc_xml(xml_path) {
            Ok(record) => record,
            Err(err) if opts.on_parse_error == ParseErrorPolicy::SkipAndWarn => {
                progress.suspend(|| {
                    eprintln!("Warning: skipping {}: {}", xml_path.display(), err);
                });
                report.add(ConversionIssue::warning(
                    ConversionIssueCode::SkippedAnnotationFile,
                    err.to_string(),
                    Some(xml_path.clone()),
                ));
                progress.inc(1);
                continue;
            }
            Err(err) => {
                progress.abandon();
                return Err(err);
            }
        };

        let document = vott::build_asset(&record, images_dir, ids);
        if let Err(err) = io_json::write_asset_json(output_dir, &document) {
            progress.abandon();
            return Err(err);
        }
        documents.push(document);
        progress.inc(1);
    }

    progress.finish_and_clear();
    Ok(documents)
}

fn progress_bar(len: usize, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len as u64);
    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("#>-");
    pb.set_style(style);
    pb
}

fn absolute(path: &Path) -> Result<PathBuf, Voc2VottError> {
    vott::absolute_normalized(path).map_err(Voc2VottError::Io)
}
