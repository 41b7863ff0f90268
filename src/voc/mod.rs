//! Pascal VOC input side.
//!
//! A VOC dataset root is expected to contain an annotations folder with one
//! XML file per image, an images folder, and a `pascal_label_map.pbtxt`
//! listing the tag vocabulary.

mod annotation;
mod label_map;
mod layout;

pub use annotation::{
    from_voc_xml_slice, from_voc_xml_str, parse_voc_xml, parse_voc_xml_str, AnnotationRecord,
    VocObject,
};
pub use label_map::{parse_label_map_str, read_label_map, LABEL_MAP_FILE_NAME};
pub use layout::{collect_xml_files, discover_layout, VocLayout};
