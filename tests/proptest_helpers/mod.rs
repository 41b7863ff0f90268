#![allow(dead_code)]

use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// One generated `<object>`: tag name and integer corner coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct ArbObject {
    pub name: String,
    pub xmin: i64,
    pub ymin: i64,
    pub xmax: i64,
    pub ymax: i64,
}

pub fn arb_tag_name() -> BoxedStrategy<String> {
    proptest::string::string_regex("[a-z][a-z0-9_]{0,11}")
        .expect("valid tag regex")
        .boxed()
}

/// Objects anywhere in `[-50, 2000]`, so inverted and out-of-range boxes show up too.
pub fn arb_object() -> BoxedStrategy<ArbObject> {
    (
        arb_tag_name(),
        -50i64..2000,
        -50i64..2000,
        -50i64..2000,
        -50i64..2000,
    )
        .prop_map(|(name, xmin, ymin, xmax, ymax)| ArbObject {
            name,
            xmin,
            ymin,
            xmax,
            ymax,
        })
        .boxed()
}

pub fn render_voc_xml(filename: &str, width: u32, height: u32, objects: &[ArbObject]) -> String {
    let mut xml = format!(
        "<annotation><filename>{filename}</filename><size><width>{width}</width><height>{height}</height><depth>3</depth></size>"
    );
    for obj in objects {
        xml.push_str(&format!(
            "<object><name>{}</name><bndbox><xmin>{}</xmin><ymin>{}</ymin><xmax>{}</xmax><ymax>{}</ymax></bndbox></object>",
            obj.name, obj.xmin, obj.ymin, obj.xmax, obj.ymax
        ));
    }
    xml.push_str("</annotation>");
    xml
}

/// A `.pbtxt` label map listing `names` in order, one item per tag.
pub fn render_label_map(names: &[String]) -> String {
    names
        .iter()
        .enumerate()
        .map(|(idx, name)| format!("item {{\n  id: {}\n  name: '{}'\n}}\n", idx + 1, name))
        .collect()
}
