//! Dataset layout discovery and annotation file scanning.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::label_map::LABEL_MAP_FILE_NAME;
use crate::error::Voc2VottError;

const VOC_XML_EXTENSION: &str = "xml";
const ANNOTATION_DIR_NAMES: [&str; 2] = ["annotations", "Annotations"];
const IMAGE_DIR_NAMES: [&str; 2] = ["images", "JPEGImages"];

/// Resolved paths of a Pascal VOC dataset root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VocLayout {
    pub root: PathBuf,
    pub annotations_dir: PathBuf,
    pub images_dir: PathBuf,
    pub label_map: PathBuf,
}

/// Locate the annotations folder, images folder and label map under `root`.
///
/// `images/` is preferred over the older `JPEGImages/` name. Only existence
/// is checked here; the label map contents are read separately.
pub fn discover_layout(root: &Path) -> Result<VocLayout, Voc2VottError> {
    if !root.exists() {
        return Err(Voc2VottError::InputMissing {
            path: root.to_path_buf(),
        });
    }
    if !root.is_dir() {
        return Err(Voc2VottError::LayoutInvalid {
            path: root.to_path_buf(),
            message: "input must be a directory".to_string(),
        });
    }

    let annotations_dir = first_existing_dir(root, &ANNOTATION_DIR_NAMES);
    let images_dir = first_existing_dir(root, &IMAGE_DIR_NAMES);
    let (Some(annotations_dir), Some(images_dir)) = (annotations_dir, images_dir) else {
        return Err(Voc2VottError::LayoutInvalid {
            path: root.to_path_buf(),
            message: "dataset should be separated into 'annotations' and 'images' subfolders"
                .to_string(),
        });
    };

    let label_map = root.join(LABEL_MAP_FILE_NAME);
    if !label_map.is_file() {
        return Err(Voc2VottError::LabelMap {
            path: label_map,
            message: format!("provide a label map named '{LABEL_MAP_FILE_NAME}' in the input folder"),
        });
    }

    Ok(VocLayout {
        root: root.to_path_buf(),
        annotations_dir,
        images_dir,
        label_map,
    })
}

fn first_existing_dir(root: &Path, names: &[&str]) -> Option<PathBuf> {
    names
        .iter()
        .map(|name| root.join(name))
        .find(|candidate| candidate.is_dir())
}

/// List the `.xml` files directly inside `dir`, sorted by file name.
///
/// The scan is flat. XML files in nested folders are reported with a warning
/// and left out. Failures while looking for nested files, such as symlink
/// loops, are warnings too.
pub fn collect_xml_files(dir: &Path) -> Result<Vec<PathBuf>, Voc2VottError> {
    let scan_error = |message: String| Voc2VottError::Scan {
        path: dir.to_path_buf(),
        message,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|source| scan_error(source.to_string()))? {
        let entry = entry.map_err(|source| scan_error(source.to_string()))?;
        let path = entry.path();
        if path.is_file() && has_xml_extension(&path) {
            files.push(path);
        }
    }

    files.sort_by_cached_key(|path| {
        path.file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| rel_string(dir, path))
    });

    let mut nested_xml = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true).min_depth(2) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                eprintln!(
                    "Warning: skipping part of annotations directory {}: {}",
                    dir.display(),
                    err
                );
                continue;
            }
        };

        if entry.file_type().is_file() && has_xml_extension(entry.path()) {
            nested_xml.push(entry.path().to_path_buf());
        }
    }

    if !nested_xml.is_empty() {
        nested_xml.sort_by_cached_key(|path| rel_string(dir, path));
        let sample = rel_string(dir, &nested_xml[0]);
        eprintln!(
            "Warning: annotations are scanned flat (non-recursive); skipping {} nested .xml file(s), e.g. {}",
            nested_xml.len(),
            sample
        );
    }

    Ok(files)
}

fn has_xml_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(VOC_XML_EXTENSION))
        .unwrap_or(false)
}

fn rel_string(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_root(annotations: &str, images: &str) -> tempfile::TempDir {
        let temp = tempfile::tempdir().expect("create temp dir");
        fs::create_dir_all(temp.path().join(annotations)).expect("create annotations dir");
        fs::create_dir_all(temp.path().join(images)).expect("create images dir");
        fs::write(temp.path().join(LABEL_MAP_FILE_NAME), "name: 'cat'\n").expect("write label map");
        temp
    }

    #[test]
    fn discover_layout_prefers_images_folder() {
        let temp = make_root("annotations", "images");
        fs::create_dir_all(temp.path().join("JPEGImages")).expect("create legacy images dir");

        let layout = discover_layout(temp.path()).expect("discover layout");
        assert_eq!(layout.annotations_dir, temp.path().join("annotations"));
        assert_eq!(layout.images_dir, temp.path().join("images"));
        assert_eq!(layout.label_map, temp.path().join(LABEL_MAP_FILE_NAME));
    }

    #[test]
    fn discover_layout_accepts_legacy_folder_names() {
        let temp = make_root("Annotations", "JPEGImages");
        let layout = discover_layout(temp.path()).expect("discover layout");
        assert_eq!(layout.images_dir, temp.path().join("JPEGImages"));
    }

    #[test]
    fn discover_layout_rejects_missing_images_folder() {
        let temp = tempfile::tempdir().expect("create temp dir");
        fs::create_dir_all(temp.path().join("annotations")).expect("create annotations dir");
        fs::write(temp.path().join(LABEL_MAP_FILE_NAME), "name: 'cat'\n").expect("write label map");

        let err = discover_layout(temp.path()).unwrap_err();
        assert!(matches!(err, Voc2VottError::LayoutInvalid { .. }));
    }

    #[test]
    fn discover_layout_rejects_missing_label_map() {
        let temp = tempfile::tempdir().expect("create temp dir");
        fs::create_dir_all(temp.path().join("annotations")).expect("create annotations dir");
        fs::create_dir_all(temp.path().join("images")).expect("create images dir");

        let err = discover_layout(temp.path()).unwrap_err();
        assert!(matches!(err, Voc2VottError::LabelMap { .. }));
    }

    #[test]
    fn discover_layout_reports_missing_root() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let err = discover_layout(&temp.path().join("nope")).unwrap_err();
        assert!(matches!(err, Voc2VottError::InputMissing { .. }));
    }

    #[test]
    fn collect_xml_files_sorts_and_filters() {
        let temp = tempfile::tempdir().expect("create temp dir");
        for name in ["b.xml", "a.XML", "c.txt", "0.xml"] {
            fs::write(temp.path().join(name), "<annotation/>").expect("write file");
        }
        fs::create_dir_all(temp.path().join("nested")).expect("create nested dir");
        fs::write(temp.path().join("nested/d.xml"), "<annotation/>").expect("write nested");

        let files = collect_xml_files(temp.path()).expect("collect files");
        let names: Vec<_> = files
            .iter()
            .map(|path| path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["0.xml", "a.XML", "b.xml"]);
    }

    #[cfg(unix)]
    #[test]
    fn symlink_loop_in_nested_folder_is_not_fatal() {
        let temp = tempfile::tempdir().expect("create temp dir");
        fs::write(temp.path().join("a.xml"), "<annotation/>").expect("write file");
        fs::create_dir_all(temp.path().join("loop")).expect("create nested dir");
        std::os::unix::fs::symlink(temp.path(), temp.path().join("loop/back"))
            .expect("create symlink");

        let files = collect_xml_files(temp.path()).expect("collect files");
        assert_eq!(files, vec![temp.path().join("a.xml")]);
    }
}
