#![allow(dead_code)]

use std::fs;
use std::path::Path;

pub const LABEL_MAP: &str = "item {\n  id: 1\n  name: 'cat'\n}\nitem {\n  id: 2\n  name: 'dog'\n}\n";

/// VOC XML for one image with the given `(name, xmin, ymin, xmax, ymax)` objects.
pub fn voc_xml(filename: &str, width: u32, height: u32, objects: &[(&str, &str, &str, &str, &str)]) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<annotation>\n");
    xml.push_str("  <folder>images</folder>\n");
    xml.push_str(&format!("  <filename>{filename}</filename>\n"));
    xml.push_str(&format!(
        "  <size>\n    <width>{width}</width>\n    <height>{height}</height>\n    <depth>3</depth>\n  </size>\n"
    ));
    for (name, xmin, ymin, xmax, ymax) in objects {
        xml.push_str(&format!(
            "  <object>\n    <name>{name}</name>\n    <bndbox>\n      <xmin>{xmin}</xmin>\n      <ymin>{ymin}</ymin>\n      <xmax>{xmax}</xmax>\n      <ymax>{ymax}</ymax>\n    </bndbox>\n  </object>\n"
        ));
    }
    xml.push_str("</annotation>\n");
    xml
}

/// Create `annotations/`, `images/` and the label map under `root`.
pub fn create_layout(root: &Path, label_map: &str) {
    fs::create_dir_all(root.join("annotations")).expect("create annotations dir");
    fs::create_dir_all(root.join("images")).expect("create images dir");
    fs::write(root.join("pascal_label_map.pbtxt"), label_map).expect("write label map");
}

/// A three-image dataset whose annotation files are named out of filename order.
pub fn create_sample_dataset(root: &Path) {
    create_layout(root, LABEL_MAP);

    let files = [
        (
            "b.xml",
            voc_xml("img_b.jpg", 120, 80, &[("dog", "10", "12", "60", "70")]),
        ),
        (
            "a.xml",
            voc_xml(
                "img_a.jpg",
                100,
                50,
                &[("cat", "10", "20", "50", "80"), ("dog", "31.7", "4.2", "80", "45")],
            ),
        ),
        ("c.xml", voc_xml("img_c.PNG", 64, 64, &[])),
    ];

    for (name, xml) in files {
        fs::write(root.join("annotations").join(name), xml).expect("write annotation");
    }
    fs::write(root.join("annotations/notes.txt"), "not an annotation").expect("write notes");
}

/// Names of the `*-asset.json` files in `dir`.
pub fn asset_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("read output dir")
        .map(|entry| entry.expect("dir entry").file_name().to_string_lossy().to_string())
        .filter(|name| name.ends_with("-asset.json"))
        .collect();
    names.sort();
    names
}

pub fn read_json(path: &Path) -> serde_json::Value {
    let bytes = fs::read(path).expect("read json file");
    serde_json::from_slice(&bytes).expect("parse json file")
}
