//! VoTT asset schema and the assembler that fills it from a VOC record.
//!
//! Field order in these structs is alphabetical so the written asset files
//! have sorted keys.

use std::path::{Component, Path, PathBuf};

use serde::Serialize;

use super::ids::{AssetId, IdGenerator, RegionId};
use super::VOTT_SCHEMA_VERSION;
use crate::voc::{AnnotationRecord, VocObject};

/// Contents of one `<asset-id>-asset.json` file.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AssetDocument {
    pub asset: Asset,
    pub regions: Vec<Region>,
    pub version: String,
}

impl AssetDocument {
    /// File name the document is stored under.
    pub fn file_name(&self) -> String {
        format!("{}-asset.json", self.asset.id)
    }
}

/// One image as VoTT sees it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Asset {
    pub format: String,
    pub id: AssetId,
    pub name: String,
    pub path: String,
    pub size: Size,
    pub state: AssetState,
    #[serde(rename = "type")]
    pub asset_type: AssetType,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Size {
    pub height: u32,
    pub width: u32,
}

/// VoTT's numeric asset state. Converted assets are always tagged (`2`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(into = "u8")]
pub enum AssetState {
    Tagged = 2,
}

impl From<AssetState> for u8 {
    fn from(state: AssetState) -> Self {
        state as u8
    }
}

/// VoTT's numeric asset type. Only still images (`1`) are produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(into = "u8")]
pub enum AssetType {
    Image = 1,
}

impl From<AssetType> for u8 {
    fn from(kind: AssetType) -> Self {
        kind as u8
    }
}

/// One tagged rectangle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Region {
    #[serde(rename = "boundingBox")]
    pub bounding_box: BoundingBox,
    pub id: RegionId,
    pub points: Vec<Point>,
    pub tags: Vec<String>,
    #[serde(rename = "type")]
    pub region_type: RegionType,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum RegionType {
    #[serde(rename = "RECTANGLE")]
    Rectangle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct BoundingBox {
    pub height: i64,
    pub left: i64,
    pub top: i64,
    pub width: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Region {
    /// Region for one VOC object. Inverted boxes yield negative sizes.
    ///
    /// Sizes saturate at the `i64` bounds.
    pub fn from_object(id: RegionId, object: &VocObject) -> Self {
        let VocObject {
            xmin,
            ymin,
            xmax,
            ymax,
            ..
        } = *object;

        Self {
            bounding_box: BoundingBox {
                height: ymax.saturating_sub(ymin),
                left: xmin,
                top: ymin,
                width: xmax.saturating_sub(xmin),
            },
            id,
            // Clockwise from the top-left corner.
            points: vec![
                Point { x: xmin, y: ymin },
                Point { x: xmax, y: ymin },
                Point { x: xmax, y: ymax },
                Point { x: xmin, y: ymax },
            ],
            tags: vec![object.name.clone()],
            region_type: RegionType::Rectangle,
        }
    }
}

/// Assemble an asset document from a parsed record.
///
/// `images_dir` should already be absolute; see [`absolute_normalized`].
pub fn build_asset(
    record: &AnnotationRecord,
    images_dir: &Path,
    ids: &mut IdGenerator,
) -> AssetDocument {
    let image_path = normalize_lexically(&images_dir.join(&record.filename));

    let name = image_path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| record.filename.clone());
    let format = image_path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let asset = Asset {
        format,
        id: ids.asset_id(),
        name,
        path: file_url(&image_path),
        size: Size {
            height: record.height,
            width: record.width,
        },
        state: AssetState::Tagged,
        asset_type: AssetType::Image,
    };

    let regions = record
        .objects
        .iter()
        .map(|object| Region::from_object(ids.region_id(), object))
        .collect();

    AssetDocument {
        asset,
        regions,
        version: VOTT_SCHEMA_VERSION.to_string(),
    }
}

/// `file:` followed by the path with forward slashes.
pub fn file_url(path: &Path) -> String {
    format!("file:{}", path.to_string_lossy().replace('\\', "/"))
}

/// Make `path` absolute against the current directory and normalize it.
pub fn absolute_normalized(path: &Path) -> std::io::Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    Ok(normalize_lexically(&absolute))
}

/// Resolve `.` and `..` components without touching the filesystem.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let at_anchor = matches!(
                    normalized.components().next_back(),
                    None | Some(Component::RootDir) | Some(Component::Prefix(_))
                );
                if at_anchor {
                    if !normalized.has_root() {
                        normalized.push("..");
                    }
                } else if normalized.ends_with("..") {
                    normalized.push("..");
                } else {
                    normalized.pop();
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(filename: &str, objects: Vec<VocObject>) -> AnnotationRecord {
        AnnotationRecord {
            filename: filename.to_string(),
            width: 640,
            height: 480,
            objects,
        }
    }

    fn object(name: &str, xmin: i64, ymin: i64, xmax: i64, ymax: i64) -> VocObject {
        VocObject {
            name: name.to_string(),
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    #[test]
    fn region_box_and_points_follow_corners() {
        let region = Region::from_object(RegionId("r".into()), &object("cat", 10, 20, 50, 80));
        assert_eq!(
            region.bounding_box,
            BoundingBox {
                height: 60,
                left: 10,
                top: 20,
                width: 40,
            }
        );
        let points: Vec<_> = region.points.iter().map(|p| (p.x, p.y)).collect();
        assert_eq!(points, vec![(10, 20), (50, 20), (50, 80), (10, 80)]);
        assert_eq!(region.tags, vec!["cat"]);
    }

    #[test]
    fn inverted_box_passes_through() {
        let region = Region::from_object(RegionId("r".into()), &object("cat", 50, 80, 10, 20));
        assert_eq!(region.bounding_box.width, -40);
        assert_eq!(region.bounding_box.height, -60);
    }

    #[test]
    fn extreme_coordinates_saturate() {
        let region =
            Region::from_object(RegionId("r".into()), &object("cat", i64::MIN, 0, i64::MAX, 1));
        assert_eq!(region.bounding_box.width, i64::MAX);
    }

    #[test]
    fn build_asset_derives_path_name_and_format() {
        let mut ids = IdGenerator::seeded(5);
        let doc = build_asset(
            &record("sub/../Photo.JPG", vec![object("dog", 1, 2, 3, 4)]),
            Path::new("/data/voc/./images"),
            &mut ids,
        );

        assert_eq!(doc.asset.path, "file:/data/voc/images/Photo.JPG");
        assert_eq!(doc.asset.name, "Photo.JPG");
        assert_eq!(doc.asset.format, "jpg");
        assert_eq!(doc.asset.size, Size { height: 480, width: 640 });
        assert_eq!(doc.asset.state, AssetState::Tagged);
        assert_eq!(doc.asset.asset_type, AssetType::Image);
        assert_eq!(doc.version, VOTT_SCHEMA_VERSION);
        assert_eq!(doc.regions.len(), 1);
        assert_ne!(doc.regions[0].id.as_str(), doc.asset.id.as_str());
        assert_eq!(doc.file_name(), format!("{}-asset.json", doc.asset.id));
    }

    #[test]
    fn build_asset_without_extension_has_empty_format() {
        let mut ids = IdGenerator::seeded(5);
        let doc = build_asset(&record("README", vec![]), Path::new("/x"), &mut ids);
        assert_eq!(doc.asset.format, "");
        assert!(doc.regions.is_empty());
    }

    #[test]
    fn asset_json_uses_numeric_state_and_sorted_keys() {
        let mut ids = IdGenerator::seeded(9);
        let doc = build_asset(
            &record("a.png", vec![object("cat", 0, 0, 1, 1)]),
            Path::new("/img"),
            &mut ids,
        );
        let json = serde_json::to_string(&doc).expect("serialize");
        assert!(json.contains("\"state\":2"));
        assert!(json.contains("\"type\":1"));
        assert!(json.contains("\"type\":\"RECTANGLE\""));
        assert!(json.starts_with("{\"asset\":{\"format\":\"png\",\"id\":"));
        assert!(json.contains("{\"boundingBox\":{\"height\":1,\"left\":0,\"top\":0,\"width\":1},\"id\":"));
    }

    #[test]
    fn normalize_lexically_resolves_dots() {
        assert_eq!(
            normalize_lexically(Path::new("/a/b/../c/./d")),
            PathBuf::from("/a/c/d")
        );
        assert_eq!(normalize_lexically(Path::new("/../a")), PathBuf::from("/a"));
        assert_eq!(normalize_lexically(Path::new("../a/..")), PathBuf::from(".."));
    }
}
