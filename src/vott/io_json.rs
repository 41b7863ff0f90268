//! JSON reading and writing for VoTT files.
//!
//! Output is pretty-printed with a four-space indent, matching what VoTT
//! itself writes.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};

use super::asset::AssetDocument;
use super::project::ProjectDescriptor;
use crate::error::Voc2VottError;

/// Extension of VoTT project files.
pub const PROJECT_EXTENSION: &str = "vott";

/// Outcome of writing the project file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectWrite {
    pub path: PathBuf,
    /// Where the previous project file was moved, if there was one.
    pub backup: Option<PathBuf>,
}

/// Serialize `value` as four-space-indented JSON.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(buf)
}

/// Write `<asset-id>-asset.json` into `output_dir`.
pub fn write_asset_json(
    output_dir: &Path,
    document: &AssetDocument,
) -> Result<PathBuf, Voc2VottError> {
    let path = output_dir.join(document.file_name());
    let bytes = to_pretty_json(document).map_err(|source| Voc2VottError::AssetSerialize {
        path: path.clone(),
        source,
    })?;
    fs::write(&path, bytes).map_err(|source| Voc2VottError::AssetWrite {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// Path of the single-generation backup for `path` (`<file>.old`).
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".old");
    path.with_file_name(name)
}

/// Write `<stem>.vott` into `output_dir`.
///
/// An existing project file is first moved to `<stem>.vott.old`, replacing any
/// earlier backup. The old and new contents are never merged.
pub fn write_project_json(
    output_dir: &Path,
    stem: &str,
    project: &ProjectDescriptor,
) -> Result<ProjectWrite, Voc2VottError> {
    let path = output_dir.join(format!("{stem}.{PROJECT_EXTENSION}"));
    let bytes = to_pretty_json(project).map_err(|source| Voc2VottError::ProjectSerialize {
        path: path.clone(),
        source,
    })?;

    let backup = if path.exists() {
        let backup = backup_path(&path);
        let backup_error = |source: std::io::Error| Voc2VottError::ProjectBackup {
            path: path.clone(),
            backup: backup.clone(),
            source,
        };
        if backup.exists() {
            fs::remove_file(&backup).map_err(backup_error)?;
        }
        fs::rename(&path, &backup).map_err(backup_error)?;
        Some(backup)
    } else {
        None
    };

    fs::write(&path, bytes).map_err(|source| Voc2VottError::ProjectWrite {
        path: path.clone(),
        source,
    })?;

    Ok(ProjectWrite { path, backup })
}

/// Read an existing `.vott` file to use as a settings template.
pub fn read_template(path: &Path) -> Result<Map<String, Value>, Voc2VottError> {
    let file = File::open(path).map_err(|source| Voc2VottError::TemplateRead {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);

    let value: Value =
        serde_json::from_reader(reader).map_err(|source| Voc2VottError::TemplateParse {
            path: path.to_path_buf(),
            source,
        })?;

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(Voc2VottError::TemplateInvalid {
            path: path.to_path_buf(),
            message: "top-level value must be a JSON object".to_string(),
        }),
    }
}
