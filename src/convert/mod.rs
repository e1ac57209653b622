//! Format converters.
//!
//! Each converter turns one input file into a standalone PDF written to
//! the given output path. They share no state; the compiler picks one
//! through [`converter_for`].

pub mod docx;
pub mod layout;
pub mod raster;
pub mod text;

use flate2::Compression;
use flate2::write::ZlibEncoder;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::input::InputKind;
use crate::io::PdfWriter;

pub use layout::TextLayout;

/// Signature shared by every converter: `(input, output)`.
pub type ConvertFn = fn(&Path, &Path) -> Result<()>;

/// Converter for an input kind.
///
/// PDFs are not converted (they go through the sanitizer) and unsupported
/// kinds have no converter, so both return `None`.
pub fn converter_for(kind: &InputKind) -> Option<ConvertFn> {
    match kind {
        InputKind::Text => Some(text::convert),
        InputKind::Image => Some(raster::convert),
        InputKind::Docx => Some(docx::convert),
        InputKind::Pdf | InputKind::Unsupported(_) => None,
    }
}

/// Flate-compress `data` into a stream carrying `dict` plus the filter.
pub(crate) fn flate_stream(mut dict: Dictionary, data: &[u8]) -> Result<Stream> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    let compressed = encoder.finish()?;

    dict.set("Filter", "FlateDecode");
    Ok(Stream::new(dict, compressed).with_compression(false))
}

/// Incrementally assembled single-tree document.
pub(crate) struct PageSink {
    document: Document,
    pages_id: ObjectId,
    page_ids: Vec<ObjectId>,
}

impl PageSink {
    pub(crate) fn new() -> Self {
        let mut document = Document::with_version("1.4");
        let pages_id = document.new_object_id();
        Self {
            document,
            pages_id,
            page_ids: Vec::new(),
        }
    }

    pub(crate) fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Add a page; `Type` and `Parent` are filled in here.
    pub(crate) fn push_page(&mut self, mut page: Dictionary) -> ObjectId {
        page.set("Type", "Page");
        page.set("Parent", self.pages_id);
        let id = self.document.add_object(page);
        self.page_ids.push(id);
        id
    }

    /// Close the page tree and write the document to `output`.
    pub(crate) fn save(mut self, output: &Path) -> Result<usize> {
        let kids: Vec<Object> = self.page_ids.iter().map(|id| Object::from(*id)).collect();
        let count = kids.len();

        self.document.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count as i64,
            }),
        );
        let catalog_id = self.document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.document.trailer.set("Root", catalog_id);

        PdfWriter::new().save(&mut self.document, output)?;
        Ok(count)
    }
}
