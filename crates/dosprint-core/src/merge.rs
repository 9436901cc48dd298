//! Blank-page filtering and PDF concatenation.
//!
//! Page ordering in the merged output equals the lexicographic sort order of
//! the per-page file names under `<workspace>/pdf/`, which the renderers
//! keep aligned with increasing page number.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use lopdf::{Document, Object, ObjectId};
use tracing::info;

use crate::blank;
use crate::config::BlankCheck;
use crate::error::{Error, Result};
use crate::util;
use crate::workspace::ScratchWorkspace;

/// Outcome of merging one input file's rendered pages.
#[derive(Debug)]
pub struct MergeReport {
    /// Final document next to the input file.
    pub output: PathBuf,
    /// Pages kept in the merged document.
    pub kept: usize,
    /// Blank pages dropped.
    pub skipped: usize,
}

/// Where the merged document lands: `<input_dir>/<input-stem>.pdf`,
/// regardless of render path.
pub fn final_output_path(input: &Path) -> PathBuf {
    input.with_file_name(format!("{}.pdf", util::file_stem(input)))
}

/// Merge the non-blank pages rendered for `input` into one PDF, write it
/// into the workspace, then copy it next to the input file.
pub fn merge(
    input: &Path,
    workspace: &ScratchWorkspace,
    blank_check: BlankCheck,
) -> Result<MergeReport> {
    let stem = util::file_stem(input);
    let target = workspace.merge_target(stem);
    let final_file = final_output_path(input);
    let png_dir = workspace.png_dir();

    let page_files = list_page_pdfs(&workspace.pdf_dir())?;
    info!(
        "Merging {} pdf pages into {}",
        page_files.len(),
        target.display()
    );

    let mut kept_pages = Vec::with_capacity(page_files.len());
    let mut skipped = 0;
    for pdf_file in &page_files {
        let png_file = png_dir.join(format!("{}.png", util::file_stem(pdf_file)));
        if blank::page_has_content(blank_check, pdf_file, &png_file)? {
            kept_pages.push(std::fs::read(pdf_file)?);
        } else {
            skipped += 1;
            info!("Empty page found at {}", pdf_file.display());
        }
    }

    let merged = concat_pages(&kept_pages)?;
    std::fs::write(&target, &merged)?;
    std::fs::copy(&target, &final_file)?;
    info!("Copy {} -> {}", target.display(), final_file.display());

    Ok(MergeReport {
        output: final_file,
        kept: kept_pages.len(),
        skipped,
    })
}

/// All `*.pdf` files in the page directory, sorted by name.
fn list_page_pdfs(pdf_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(pdf_dir)?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("pdf")
        })
        .collect();
    files.sort_by_key(|path| path.file_name().map(std::ffi::OsStr::to_os_string));
    Ok(files)
}

/// Concatenate single-page PDF byte streams into one document, preserving
/// order. Zero survivors still yield a valid (empty) document; the original
/// pipeline behaves the same way when a renderer produced no pages.
pub fn concat_pages(pages: &[Vec<u8>]) -> Result<Vec<u8>> {
    if pages.len() == 1 {
        return Ok(pages[0].clone());
    }

    let mut max_id: u32 = 1;
    let mut page_objects: BTreeMap<ObjectId, Object> = BTreeMap::new();
    let mut other_objects: BTreeMap<ObjectId, Object> = BTreeMap::new();
    let mut document = Document::with_version("1.5");

    for (i, page_bytes) in pages.iter().enumerate() {
        let mut doc = Document::load_mem(page_bytes)
            .map_err(|e| Error::Lopdf(format!("Failed to load page {}: {}", i + 1, e)))?;

        doc.renumber_objects_with(max_id);
        max_id = doc.max_id + 1;

        for &page_id in doc.get_pages().values() {
            if let Ok(page_obj) = doc.get_object(page_id) {
                page_objects.insert(page_id, page_obj.clone());
            }
        }

        for (object_id, object) in doc.objects {
            match object.type_name().unwrap_or(b"") {
                b"Catalog" | b"Pages" | b"Page" | b"Outlines" | b"Outline" => {}
                _ => {
                    other_objects.insert(object_id, object);
                }
            }
        }
    }

    for (object_id, object) in other_objects {
        document.objects.insert(object_id, object);
    }

    let pages_id = document.new_object_id();

    for (obj_id, object) in &page_objects {
        if let Object::Dictionary(dict) = object {
            let mut new_dict = dict.clone();
            new_dict.set("Parent", Object::Reference(pages_id));
            document
                .objects
                .insert(*obj_id, Object::Dictionary(new_dict));
        }
    }

    let kids: Vec<Object> = page_objects.keys().map(|&id| Object::Reference(id)).collect();

    #[allow(clippy::cast_possible_truncation)]
    let total_pages = page_objects.len() as u32;

    let pages_dict = lopdf::Dictionary::from_iter([
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(i64::from(total_pages))),
    ]);
    document
        .objects
        .insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = document.new_object_id();
    let catalog_dict = lopdf::Dictionary::from_iter([
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]);
    document
        .objects
        .insert(catalog_id, Object::Dictionary(catalog_dict));

    document.trailer.set("Root", Object::Reference(catalog_id));

    #[allow(clippy::cast_possible_truncation)]
    let new_max_id = document.objects.len() as u32;
    document.max_id = new_max_id;

    document.renumber_objects();
    document.compress();

    let mut output = Vec::new();
    document
        .save_to(&mut output)
        .map_err(|e| Error::PdfSave(format!("Failed to save merged PDF: {e}")))?;

    Ok(output)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::Stream;

    /// Minimal one-page PDF with some text and a caller-chosen page width,
    /// so tests can verify merged page order.
    fn create_test_pdf(page_text: &str, width: i64) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let page_tree_id = doc.new_object_id();

        let font_id = doc.add_object(lopdf::Dictionary::from_iter([
            ("Type", Object::Name(b"Font".to_vec())),
            ("Subtype", Object::Name(b"Type1".to_vec())),
            ("BaseFont", Object::Name(b"Helvetica".to_vec())),
        ]));

        let resources_id = doc.add_object(lopdf::Dictionary::from_iter([(
            "Font",
            Object::Dictionary(lopdf::Dictionary::from_iter([(
                "F1",
                Object::Reference(font_id),
            )])),
        )]));

        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![100.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(page_text)]),
                Operation::new("ET", vec![]),
            ],
        };

        let content_bytes = content.encode().unwrap_or_default();
        let content_id = doc.add_object(Stream::new(lopdf::Dictionary::new(), content_bytes));

        let page_id = doc.add_object(lopdf::Dictionary::from_iter([
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(page_tree_id)),
            ("Contents", Object::Reference(content_id)),
            ("Resources", Object::Reference(resources_id)),
            (
                "MediaBox",
                Object::Array(vec![0.into(), 0.into(), width.into(), 792.into()]),
            ),
        ]));

        let page_tree = lopdf::Dictionary::from_iter([
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(vec![Object::Reference(page_id)])),
            ("Count", Object::Integer(1)),
        ]);
        doc.objects
            .insert(page_tree_id, Object::Dictionary(page_tree));

        let catalog_id = doc.add_object(lopdf::Dictionary::from_iter([
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(page_tree_id)),
        ]));
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut output = Vec::new();
        doc.save_to(&mut output).unwrap_or_default();
        output
    }

    fn page_widths(pdf_bytes: &[u8]) -> Vec<i64> {
        let doc = Document::load_mem(pdf_bytes).unwrap();
        doc.get_pages()
            .values()
            .map(|&page_id| {
                let page = doc.get_dictionary(page_id).unwrap();
                let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
                media_box[2].as_i64().unwrap()
            })
            .collect()
    }

    #[test]
    fn test_concat_empty_yields_valid_empty_document() {
        let merged = concat_pages(&[]).unwrap();
        let doc = Document::load_mem(&merged).unwrap();
        assert_eq!(doc.get_pages().len(), 0);
    }

    #[test]
    fn test_concat_single_page_passthrough() {
        let pdf = create_test_pdf("Page 1", 612);
        let merged = concat_pages(std::slice::from_ref(&pdf)).unwrap();
        assert_eq!(merged, pdf);
    }

    #[test]
    fn test_concat_preserves_order() {
        let pdf1 = create_test_pdf("Page 1", 500);
        let pdf2 = create_test_pdf("Page 2", 550);
        let pdf3 = create_test_pdf("Page 3", 600);

        let merged = concat_pages(&[pdf1, pdf2, pdf3]).unwrap();
        assert_eq!(page_widths(&merged), vec![500, 550, 600]);
    }

    #[test]
    fn test_final_output_path_is_sibling_of_input() {
        let input = Path::new("/data/captures/pmmain_000.prt");
        assert_eq!(
            final_output_path(input),
            PathBuf::from("/data/captures/pmmain_000.pdf")
        );
    }

    #[test]
    fn test_merge_drops_blank_pages_in_order() {
        let ws = ScratchWorkspace::create(false).unwrap();
        ws.create_page_dirs().unwrap();

        std::fs::write(ws.pdf_dir().join("page1.pdf"), create_test_pdf("One", 500)).unwrap();
        std::fs::write(ws.pdf_dir().join("page2.pdf"), create_test_pdf("Two", 550)).unwrap();
        std::fs::write(ws.pdf_dir().join("page3.pdf"), create_test_pdf("Three", 600)).unwrap();

        // Previews: pages 1 and 3 have ink, page 2 is solid background
        let mut inked = image::GrayImage::from_pixel(16, 16, image::Luma([255]));
        inked.put_pixel(0, 0, image::Luma([0]));
        let white = image::GrayImage::from_pixel(16, 16, image::Luma([255]));
        inked.save(ws.png_dir().join("page1.png")).unwrap();
        white.save(ws.png_dir().join("page2.png")).unwrap();
        inked.save(ws.png_dir().join("page3.png")).unwrap();

        let input_dir = tempfile::tempdir().unwrap();
        let input = input_dir.path().join("report_001.prt");
        std::fs::write(&input, b"capture").unwrap();

        let report = merge(&input, &ws, BlankCheck::Histogram).unwrap();
        assert_eq!(report.kept, 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.output, input_dir.path().join("report_001.pdf"));

        let merged = std::fs::read(&report.output).unwrap();
        assert_eq!(page_widths(&merged), vec![500, 600]);
    }

    #[test]
    fn test_merge_missing_preview_fails() {
        let ws = ScratchWorkspace::create(false).unwrap();
        ws.create_page_dirs().unwrap();
        std::fs::write(ws.pdf_dir().join("page1.pdf"), create_test_pdf("One", 612)).unwrap();

        let input_dir = tempfile::tempdir().unwrap();
        let input = input_dir.path().join("orphan_000.prt");
        std::fs::write(&input, b"capture").unwrap();

        let result = merge(&input, &ws, BlankCheck::Histogram);
        assert!(matches!(result, Err(Error::MissingPreview(_))));
    }
}
