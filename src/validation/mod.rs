//! Post-conversion validation.
//!
//! Conversion never rejects a region for its tag or its geometry. This pass
//! runs afterwards, on request, and reports:
//! - Tag vocabulary problems (duplicates, regions using unknown tags)
//! - Asset problems (zero-sized images)
//! - Geometry problems (inverted, empty or out-of-bounds boxes)

mod report;

pub use report::{IssueCode, IssueContext, Severity, ValidationIssue, ValidationReport};

use std::collections::HashSet;

use crate::vott::{AssetDocument, Region};

/// Options for validation behavior.
#[derive(Clone, Debug, Default)]
pub struct ValidateOptions {
    /// If true, treat warnings as errors.
    pub strict: bool,
}

/// Validate produced assets against the tag vocabulary.
pub fn validate_conversion(tags: &[String], documents: &[AssetDocument]) -> ValidationReport {
    let mut report = ValidationReport::new();

    validate_tags(tags, &mut report);

    let vocabulary: HashSet<&str> = tags.iter().map(String::as_str).collect();
    for document in documents {
        validate_asset(document, &vocabulary, &mut report);
    }

    report
}

fn validate_tags(tags: &[String], report: &mut ValidationReport) {
    let mut seen: HashSet<&str> = HashSet::new();
    for tag in tags {
        if !seen.insert(tag.as_str()) {
            report.add(ValidationIssue::warning(
                IssueCode::DuplicateTagName,
                "Tag is listed more than once in the label map",
                IssueContext::Tag { name: tag.clone() },
            ));
        }
    }
}

fn validate_asset(
    document: &AssetDocument,
    vocabulary: &HashSet<&str>,
    report: &mut ValidationReport,
) {
    let asset = &document.asset;

    if asset.size.width == 0 || asset.size.height == 0 {
        report.add(ValidationIssue::error(
            IssueCode::InvalidImageDimensions,
            format!(
                "Invalid dimensions {}x{} (must be positive)",
                asset.size.width, asset.size.height
            ),
            IssueContext::Asset {
                id: asset.id.to_string(),
                name: asset.name.clone(),
            },
        ));
    }

    for region in &document.regions {
        let context = || IssueContext::Region {
            asset: asset.id.to_string(),
            id: region.id.to_string(),
        };

        for tag in &region.tags {
            if !vocabulary.contains(tag.as_str()) {
                report.add(ValidationIssue::warning(
                    IssueCode::UnknownTagRef,
                    format!("Tag '{}' is not in the label map", tag),
                    context(),
                ));
            }
        }

        validate_geometry(region, asset.size.width, asset.size.height, report, context());
    }
}

fn validate_geometry(
    region: &Region,
    image_width: u32,
    image_height: u32,
    report: &mut ValidationReport,
    context: IssueContext,
) {
    let bbox = &region.bounding_box;

    if bbox.width < 0 || bbox.height < 0 {
        report.add(ValidationIssue::error(
            IssueCode::InvalidBBoxOrdering,
            format!(
                "Inverted box: width {} and height {} (max < min)",
                bbox.width, bbox.height
            ),
            context,
        ));
        return;
    }

    if bbox.width == 0 || bbox.height == 0 {
        report.add(ValidationIssue::warning(
            IssueCode::InvalidBBoxArea,
            format!("Box has zero area ({}x{})", bbox.width, bbox.height),
            context.clone(),
        ));
    }

    let right = bbox.left.saturating_add(bbox.width);
    let bottom = bbox.top.saturating_add(bbox.height);
    if bbox.left < 0
        || bbox.top < 0
        || right > i64::from(image_width)
        || bottom > i64::from(image_height)
    {
        report.add(ValidationIssue::warning(
            IssueCode::BBoxOutOfBounds,
            format!(
                "Box [{}, {}, {}, {}] extends outside image {}x{}",
                bbox.left, bbox.top, right, bottom, image_width, image_height
            ),
            context,
        ));
    }
}
