//! Interior PDF inspection: page count and page size

use crate::constants::{MAX_PAGE_TREE_DEPTH, SIZE_TOLERANCE_PT};
use crate::types::*;
use lopdf::{Document, Object, ObjectId};
use std::path::Path;

/// What the order needs to know about the manuscript
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interior {
    pub dimensions: PageDimensions,
    pub page_count: usize,
}

/// Load and inspect an interior PDF
pub async fn load_interior(path: impl AsRef<Path>) -> Result<Interior> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::fs::read(&path).await?;
    let interior = tokio::task::spawn_blocking(move || {
        let doc = Document::load_mem(&bytes)?;
        inspect_interior(&doc)
    })
    .await??;
    log::debug!(
        "{}: {} pages at {}",
        path.display(),
        interior.page_count,
        interior.dimensions
    );
    Ok(interior)
}

/// Page count and common page size of a loaded document.
///
/// Every page must have the size of the first page (within tolerance).
pub fn inspect_interior(doc: &Document) -> Result<Interior> {
    let pages = doc.get_pages();
    let mut page_ids = pages.values().copied();

    let first_id = page_ids.next().ok_or(FormatError::NoPages)?;
    let dimensions = page_dimensions(doc, first_id).map_err(|e| with_page(e, 1))?;

    for (idx, page_id) in page_ids.enumerate() {
        let page = idx + 2;
        let found = page_dimensions(doc, page_id).map_err(|e| with_page(e, page))?;
        if !found.approx_eq(dimensions, SIZE_TOLERANCE_PT) {
            return Err(FormatError::MixedPageSizes {
                page,
                expected: dimensions,
                found,
            });
        }
    }

    Ok(Interior {
        dimensions,
        page_count: pages.len(),
    })
}

/// Effective size of one page: its MediaBox (inherited if needed) with
/// `/Rotate` applied.
pub fn page_dimensions(doc: &Document, page_id: ObjectId) -> Result<PageDimensions> {
    let media_box = inherited_attribute(doc, page_id, b"MediaBox")?
        .ok_or(FormatError::InvalidPageBox { page: 0 })?;

    let values = match media_box {
        Object::Array(arr) if arr.len() == 4 => arr
            .iter()
            .map(|obj| resolve(doc, obj).ok().and_then(extract_number))
            .collect::<Option<Vec<f32>>>()
            .ok_or(FormatError::InvalidPageBox { page: 0 })?,
        _ => return Err(FormatError::InvalidPageBox { page: 0 }),
    };

    let dimensions = PageDimensions::new(
        (values[2] - values[0]).abs(),
        (values[3] - values[1]).abs(),
    );
    if dimensions.width_pt <= 0.0 || dimensions.height_pt <= 0.0 {
        return Err(FormatError::InvalidPageBox { page: 0 });
    }

    let rotation = match inherited_attribute(doc, page_id, b"Rotate")? {
        Some(obj) => extract_number(obj).unwrap_or(0.0) as i64,
        None => 0,
    };

    if rotation.rem_euclid(180) == 90 {
        Ok(dimensions.rotated())
    } else {
        Ok(dimensions)
    }
}

/// Look up a page attribute, walking `/Parent` links for inheritable keys.
fn inherited_attribute<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<&'a Object>> {
    let mut node = doc.get_dictionary(page_id)?;

    for _ in 0..MAX_PAGE_TREE_DEPTH {
        if let Ok(value) = node.get(key) {
            return Ok(Some(resolve(doc, value)?));
        }
        match node.get(b"Parent").and_then(|parent| parent.as_reference()) {
            Ok(parent_id) => node = doc.get_dictionary(parent_id)?,
            Err(_) => return Ok(None),
        }
    }

    log::warn!("Page tree deeper than {} levels, giving up", MAX_PAGE_TREE_DEPTH);
    Ok(None)
}

/// Follow an indirect reference, if any
fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Result<&'a Object> {
    match obj {
        Object::Reference(id) => Ok(doc.get_object(*id)?),
        other => Ok(other),
    }
}

/// Extract numeric value from a PDF object
fn extract_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Attach the 1-based page number to page box errors
fn with_page(err: FormatError, page: usize) -> FormatError {
    match err {
        FormatError::InvalidPageBox { .. } => FormatError::InvalidPageBox { page },
        other => other,
    }
}
