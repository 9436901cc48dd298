//! Blank-page detection.
//!
//! The active strategy reduces the page's PNG preview to 1-bit and looks at
//! the darkest histogram bin. The predicate is literal and deliberately
//! preserved as-is: `bin[0] == 0` means blank, `bin[0] != 0` means the page
//! has content. Validate against real captures before changing its polarity.
//!
//! The reduction is a plain threshold at 128 with no dithering. A page made
//! entirely of uniform light gray (every luma >= 128) therefore counts as
//! blank here, whereas a dithering reducer would seed dark pixels into it
//! and call it content. Renderer previews are black-on-white, so the two
//! only disagree on such degenerate pages.
//!
//! The alternate strategy inspects the page PDF itself instead of the
//! preview: nonempty extracted text or an Image XObject counts as content.

use std::path::Path;

use image::DynamicImage;
use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::config::BlankCheck;
use crate::error::{Error, Result};

/// Threshold for the 1-bit reduction; luma below this maps to the dark bin.
const DARK_THRESHOLD: u8 = 128;

/// Decide whether a rendered page has content, using the given strategy.
///
/// `pdf_path` is the page's PDF file, `png_path` its PNG preview.
pub fn page_has_content(
    strategy: BlankCheck,
    pdf_path: &Path,
    png_path: &Path,
) -> Result<bool> {
    match strategy {
        BlankCheck::Histogram => {
            if !png_path.exists() {
                return Err(Error::MissingPreview(png_path.to_path_buf()));
            }
            histogram_has_content(png_path)
        }
        BlankCheck::PdfContent => pdf_page_has_content(pdf_path),
    }
}

/// Histogram check on a PNG preview: content exactly when the darkest bin
/// of the 1-bit image is populated.
pub fn histogram_has_content(png_path: &Path) -> Result<bool> {
    let img = image::open(png_path).map_err(|e| Error::PreviewDecode {
        path: png_path.to_path_buf(),
        source: e,
    })?;
    Ok(image_has_dark_pixels(&img))
}

/// Count of the darkest bin after 1-bit reduction is nonzero.
fn image_has_dark_pixels(img: &DynamicImage) -> bool {
    img.to_luma8().pixels().any(|p| p.0[0] < DARK_THRESHOLD)
}

/// PDF content check: the page is non-blank if it has extracted text (after
/// trimming) or any XObject resource with `/Subtype /Image`.
pub fn pdf_page_has_content(pdf_path: &Path) -> Result<bool> {
    let doc = Document::load(pdf_path).map_err(|e| {
        Error::Lopdf(format!("Failed to load {}: {}", pdf_path.display(), e))
    })?;

    for (page_num, page_id) in doc.get_pages() {
        let has_text = doc
            .extract_text(&[page_num])
            .map(|text| !text.trim().is_empty())
            .unwrap_or(false);
        if has_text || page_has_image_xobject(&doc, page_id) {
            return Ok(true);
        }
    }
    Ok(false)
}

fn page_has_image_xobject(doc: &Document, page_id: ObjectId) -> bool {
    let Ok(page) = doc.get_dictionary(page_id) else {
        return false;
    };
    let Some(resources) = deref_dictionary(doc, page.get(b"Resources").ok()) else {
        return false;
    };
    let Some(xobjects) = deref_dictionary(doc, resources.get(b"XObject").ok()) else {
        return false;
    };

    xobjects.iter().any(|(_, obj)| {
        let dict = match obj {
            Object::Reference(id) => doc
                .get_object(*id)
                .ok()
                .and_then(|o| o.as_stream().ok())
                .map(|s| &s.dict),
            Object::Stream(s) => Some(&s.dict),
            _ => None,
        };
        dict.and_then(|d| d.get(b"Subtype").ok())
            .and_then(|s| s.as_name().ok())
            .is_some_and(|name| name == b"Image")
    })
}

fn deref_dictionary<'a>(doc: &'a Document, obj: Option<&'a Object>) -> Option<&'a Dictionary> {
    match obj? {
        Object::Reference(id) => doc.get_dictionary(*id).ok(),
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}
