//! PDF sanitizer.
//!
//! Copies the pages of an existing PDF into a fresh document and writes
//! it out. Outlines, document info, XMP metadata and any other catalog
//! level structure are left behind.

use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};
use std::path::Path;

use crate::error::{CompileError, Result};
use crate::io::{PdfReader, PdfWriter};
use crate::utils::copy_references;

/// Page attributes a page may inherit from its ancestors.
pub(crate) const INHERITABLE: [&[u8]; 4] = [b"MediaBox", b"Resources", b"CropBox", b"Rotate"];

/// Rewrite `input` into `output`, page by page.
///
/// Returns `Ok(false)` when the source is malformed, encrypted, has no
/// reachable pages, or its page tree cannot be rebuilt; nothing is
/// written in that case.
///
/// # Errors
///
/// Returns an error if the source cannot be read or the output cannot be
/// written.
pub fn sanitize(input: &Path, output: &Path) -> Result<bool> {
    let loaded = match PdfReader::new().load(input) {
        Ok(loaded) => loaded,
        Err(CompileError::MalformedPdf { details, .. }) => {
            log::info!("Corrupt PDF {}: {}", input.display(), details);
            return Ok(false);
        }
        Err(e) => return Err(e),
    };

    let mut clean = match rebuild(&loaded.document) {
        Ok(clean) => clean,
        Err(CompileError::Pdf(e)) => {
            log::info!("Damaged page tree in {}: {e}", input.display());
            return Ok(false);
        }
        Err(e) => return Err(e),
    };
    PdfWriter::new().save(&mut clean, output)?;

    log::debug!(
        "Sanitized {} ({} page(s)) into {}",
        input.display(),
        loaded.page_count,
        output.display()
    );
    Ok(true)
}

/// Build a fresh document holding only the pages of `source`.
pub fn rebuild(source: &Document) -> Result<Document> {
    let mut target = Document::with_version(source.version.clone());
    target.max_id = source.max_id;
    let pages_id = target.new_object_id();

    let mut kids = Vec::new();
    for page_id in source.get_pages().into_values() {
        let mut page = source.get_dictionary(page_id)?.clone();

        for key in INHERITABLE {
            if !page.has(key)
                && let Some(value) = inherited(source, &page, key)
            {
                page.set(key.to_vec(), value);
            }
        }
        if !page.has(b"MediaBox") {
            page.set("MediaBox", vec![0.into(), 0.into(), 612.into(), 792.into()]);
        }

        page.set("Parent", pages_id);
        page.remove(b"Metadata");

        let page = Object::Dictionary(page);
        target.objects.insert(page_id, page.clone());
        copy_references(&mut target, source, &page);
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    target.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = target.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    target.trailer.set("Root", catalog_id);

    Ok(target)
}

/// Walk the `Parent` chain looking for `key`.
pub(crate) fn inherited(source: &Document, page: &Dictionary, key: &[u8]) -> Option<Object> {
    let mut visited: Vec<ObjectId> = Vec::new();
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();

    while let Some(id) = parent {
        if visited.contains(&id) {
            return None;
        }
        visited.push(id);

        let node = source.get_dictionary(id).ok()?;
        if let Ok(value) = node.get(key) {
            return Some(value.clone());
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }

    None
}
