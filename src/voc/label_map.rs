//! Label map (`.pbtxt`) reader.
//!
//! The reader is loose: it does not parse protobuf text format,
//! it only picks the last token off every line mentioning `name`.

use std::fs;
use std::path::Path;

use crate::error::Voc2VottError;

/// File name of the label map inside a VOC dataset root.
pub const LABEL_MAP_FILE_NAME: &str = "pascal_label_map.pbtxt";

/// Read the ordered tag vocabulary from a label map file.
///
/// A missing or unreadable file is reported as a configuration error rather
/// than a raw I/O error.
pub fn read_label_map(path: &Path) -> Result<Vec<String>, Voc2VottError> {
    let text = fs::read_to_string(path).map_err(|source| Voc2VottError::LabelMap {
        path: path.to_path_buf(),
        message: format!("cannot read label map ({source})"),
    })?;
    Ok(parse_label_map_str(&text))
}

/// Extract tag names from label map text.
///
/// Every line containing `name` contributes one tag: quotes are stripped, the
/// line is split on whitespace, bare braces are dropped and the last token
/// wins. Order and duplicates are preserved.
pub fn parse_label_map_str(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| line.contains("name"))
        .filter_map(tag_from_line)
        .collect()
}

fn tag_from_line(line: &str) -> Option<String> {
    let unquoted = line.replace(['\'', '"'], "");
    unquoted
        .split_whitespace()
        .filter(|token| !matches!(*token, "{" | "}"))
        .last()
        .map(ToOwned::to_owned)
}
