//! Pascal VOC XML annotation parser.

use std::fs;
use std::path::{Path, PathBuf};

use roxmltree::Node;

use crate::error::Voc2VottError;

/// One parsed VOC annotation document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnnotationRecord {
    /// Image file name as written in `<filename>`, relative to the images folder.
    pub filename: String,
    pub width: u32,
    pub height: u32,
    pub objects: Vec<VocObject>,
}

/// One `<object>` with its box truncated to integer pixels.
///
/// Coordinates are kept exactly as found; inverted or negative boxes are not
/// rejected here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VocObject {
    pub name: String,
    pub xmin: i64,
    pub ymin: i64,
    pub xmax: i64,
    pub ymax: i64,
}

/// Read and parse a single VOC XML file.
pub fn parse_voc_xml(path: &Path) -> Result<AnnotationRecord, Voc2VottError> {
    let xml = fs::read_to_string(path).map_err(|source| Voc2VottError::VocXmlMalformed {
        path: path.to_path_buf(),
        message: format!("cannot read file: {source}"),
    })?;
    parse_voc_xml_str(&xml, path)
}

/// Parse VOC XML text, attributing failures to `path`.
pub fn parse_voc_xml_str(xml: &str, path: &Path) -> Result<AnnotationRecord, Voc2VottError> {
    // Some annotation tools emit a `<!DOCTYPE annotation>` header.
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..Default::default()
    };
    let document = roxmltree::Document::parse_with_options(xml, options).map_err(|source| {
        Voc2VottError::VocXmlMalformed {
            path: path.to_path_buf(),
            message: source.to_string(),
        }
    })?;

    let annotation = document.root_element();

    let filename = required_child_text(annotation, "filename", path, "<annotation>")?;

    let size = required_child_element(annotation, "size", path, "<annotation>")?;
    let width = parse_required_u32(size, "width", path, "<size>")?;
    let height = parse_required_u32(size, "height", path, "<size>")?;

    let mut objects = Vec::new();
    for object in annotation
        .children()
        .filter(|node| node.is_element() && node.tag_name().name() == "object")
    {
        let name = required_child_text(object, "name", path, "<object>")?;
        let bndbox = required_child_element(object, "bndbox", path, "<object>")?;

        objects.push(VocObject {
            name,
            xmin: parse_required_coord(bndbox, "xmin", path)?,
            ymin: parse_required_coord(bndbox, "ymin", path)?,
            xmax: parse_required_coord(bndbox, "xmax", path)?,
            ymax: parse_required_coord(bndbox, "ymax", path)?,
        });
    }

    Ok(AnnotationRecord {
        filename,
        width,
        height,
        objects,
    })
}

/// Parse VOC XML from a UTF-8 string.
///
/// This helper is primarily useful for testing/fuzzing parse behavior in-memory.
pub fn from_voc_xml_str(xml: &str) -> Result<AnnotationRecord, Voc2VottError> {
    parse_voc_xml_str(xml, Path::new("<memory>"))
}

/// Parse VOC XML from bytes.
///
/// The input must be valid UTF-8.
pub fn from_voc_xml_slice(bytes: &[u8]) -> Result<AnnotationRecord, Voc2VottError> {
    let xml = std::str::from_utf8(bytes).map_err(|source| Voc2VottError::VocXmlMalformed {
        path: PathBuf::from("<memory>"),
        message: format!("input is not valid UTF-8: {source}"),
    })?;
    from_voc_xml_str(xml)
}

fn required_child_element<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &str,
    path: &Path,
    context: &str,
) -> Result<Node<'a, 'input>, Voc2VottError> {
    child_element(node, tag).ok_or_else(|| Voc2VottError::VocXmlParse {
        path: path.to_path_buf(),
        message: format!("missing <{tag}> in {context}"),
    })
}

fn required_child_text(
    node: Node<'_, '_>,
    tag: &str,
    path: &Path,
    context: &str,
) -> Result<String, Voc2VottError> {
    optional_child_text(node, tag).ok_or_else(|| Voc2VottError::VocXmlParse {
        path: path.to_path_buf(),
        message: format!("missing <{tag}> in {context}"),
    })
}

fn parse_required_u32(
    node: Node<'_, '_>,
    tag: &str,
    path: &Path,
    context: &str,
) -> Result<u32, Voc2VottError> {
    let raw = required_child_text(node, tag, path, context)?;
    raw.parse::<u32>().map_err(|_| Voc2VottError::VocXmlParse {
        path: path.to_path_buf(),
        message: format!("invalid <{tag}> value '{raw}' in {context}; expected integer"),
    })
}

/// Box coordinates may be written as floats by some exporters; they are
/// parsed as `f64` and truncated toward zero.
fn parse_required_coord(node: Node<'_, '_>, tag: &str, path: &Path) -> Result<i64, Voc2VottError> {
    let raw = required_child_text(node, tag, path, "<bndbox>")?;
    let value = raw
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| Voc2VottError::VocXmlParse {
            path: path.to_path_buf(),
            message: format!("invalid <{tag}> value '{raw}' in <bndbox>; expected a number"),
        })?;
    Ok(value.trunc() as i64)
}

fn child_element<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| child.is_element() && child.tag_name().name() == tag)
}

fn optional_child_text(node: Node<'_, '_>, tag: &str) -> Option<String> {
    child_element(node, tag)
        .and_then(|child| child.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(ToOwned::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<annotation>
  <folder>images</folder>
  <filename>img1.jpg</filename>
  <size>
    <width>640</width>
    <height>480</height>
    <depth>3</depth>
  </size>
  <object>
    <name>cat</name>
    <bndbox>
      <xmin>10</xmin>
      <ymin>20</ymin>
      <xmax>50</xmax>
      <ymax>80</ymax>
    </bndbox>
  </object>
  <object>
    <name>dog</name>
    <bndbox>
      <xmin>10.9</xmin>
      <ymin>-3.7</ymin>
      <xmax>99.99</xmax>
      <ymax>120.0</ymax>
    </bndbox>
  </object>
</annotation>"#;

    #[test]
    fn parses_filename_size_and_objects() {
        let record = parse_voc_xml_str(SAMPLE, Path::new("sample.xml")).expect("parse xml");
        assert_eq!(record.filename, "img1.jpg");
        assert_eq!(record.width, 640);
        assert_eq!(record.height, 480);
        assert_eq!(record.objects.len(), 2);
        assert_eq!(
            record.objects[0],
            VocObject {
                name: "cat".to_string(),
                xmin: 10,
                ymin: 20,
                xmax: 50,
                ymax: 80,
            }
        );
    }

    #[test]
    fn float_coordinates_truncate_toward_zero() {
        let record = parse_voc_xml_str(SAMPLE, Path::new("sample.xml")).expect("parse xml");
        let dog = &record.objects[1];
        assert_eq!((dog.xmin, dog.ymin, dog.xmax, dog.ymax), (10, -3, 99, 120));
    }

    #[test]
    fn doctype_header_is_accepted() {
        let xml = "<?xml version=\"1.0\"?>\n<!DOCTYPE annotation>\n<annotation><filename>a.png</filename>\
            <size><width>4</width><height>3</height></size>\
            <object><name>cat</name><bndbox><xmin>0</xmin><ymin>0</ymin><xmax>2</xmax><ymax>2</ymax></bndbox></object>\
            </annotation>";
        let record = from_voc_xml_str(xml).expect("parse doctype document");
        assert_eq!(record.filename, "a.png");
        assert_eq!((record.width, record.height), (4, 3));
        assert_eq!(record.objects.len(), 1);
    }

    #[test]
    fn document_without_objects_is_valid() {
        let xml = "<annotation><filename>a.png</filename><size><width>1</width><height>2</height></size></annotation>";
        let record = from_voc_xml_str(xml).expect("parse xml");
        assert!(record.objects.is_empty());
    }

    #[test]
    fn missing_size_is_a_structural_error() {
        let xml = "<annotation><filename>a.png</filename></annotation>";
        let err = parse_voc_xml_str(xml, Path::new("broken.xml")).unwrap_err();
        match &err {
            Voc2VottError::VocXmlParse { path, message } => {
                assert_eq!(path, Path::new("broken.xml"));
                assert!(message.contains("<size>"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.is_parse_error());
    }

    #[test]
    fn non_numeric_width_is_rejected() {
        let xml = "<annotation><filename>a.png</filename><size><width>wide</width><height>2</height></size></annotation>";
        let err = from_voc_xml_str(xml).unwrap_err();
        assert!(matches!(err, Voc2VottError::VocXmlParse { .. }));
    }

    #[test]
    fn missing_bndbox_field_is_rejected() {
        let xml = "<annotation><filename>a.png</filename><size><width>1</width><height>2</height></size>\
                   <object><name>cat</name><bndbox><xmin>1</xmin><ymin>1</ymin><xmax>2</xmax></bndbox></object></annotation>";
        let err = from_voc_xml_str(xml).unwrap_err();
        assert!(err.to_string().contains("missing <ymax> in <bndbox>"));
    }

    #[test]
    fn malformed_markup_is_distinct_from_missing_fields() {
        let err = from_voc_xml_str("<annotation><filename>").unwrap_err();
        assert!(matches!(err, Voc2VottError::VocXmlMalformed { .. }));
        assert!(err.is_parse_error());
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let err = from_voc_xml_slice(&[0xff, 0xfe, 0x00]).unwrap_err();
        assert!(matches!(err, Voc2VottError::VocXmlMalformed { .. }));
    }
}
