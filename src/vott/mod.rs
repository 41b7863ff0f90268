//! VoTT output side: asset files, the project descriptor, and the
//! identifiers and colors they need.
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use voc2vott::voc::from_voc_xml_str;
//! use voc2vott::vott::{build_asset, IdGenerator};
//!
//! let record = from_voc_xml_str(
//!     "<annotation><filename>a.jpg</filename>\
//!      <size><width>64</width><height>48</height></size>\
//!      <object><name>cat</name><bndbox>\
//!      <xmin>10</xmin><ymin>20</ymin><xmax>50</xmax><ymax>40</ymax>\
//!      </bndbox></object></annotation>",
//! )
//! .unwrap();
//!
//! let mut ids = IdGenerator::seeded(0);
//! let doc = build_asset(&record, Path::new("/data/images"), &mut ids);
//! assert_eq!(doc.asset.path, "file:/data/images/a.jpg");
//! assert_eq!(doc.regions[0].bounding_box.width, 40);
//! ```

mod asset;
mod color;
mod ids;
pub mod io_json;
mod project;

/// Schema version written into projects and asset files.
pub const VOTT_SCHEMA_VERSION: &str = "2.2.0";

pub use asset::{
    absolute_normalized, build_asset, file_url, normalize_lexically, Asset, AssetDocument,
    AssetState, AssetType, BoundingBox, Point, Region, RegionType, Size,
};
pub use color::{clamp_channel, format_hex, TAG_CHANNEL_RANGE};
pub use ids::{AssetId, ConnectionId, IdGenerator, RegionId};
pub use project::{
    ActiveLearningSettings, Connection, ExportFormat, ExportProviderOptions, ProjectBase,
    ProjectDescriptor, ProjectSettings, ProviderOptions, Tag, VideoSettings,
    LOCAL_FILE_SYSTEM_PROVIDER,
};
