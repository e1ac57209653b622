//! Fixture builders for the integration tests.
//!
//! Every fixture is generated into a temporary directory at test time.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use pdfcompile::Config;
use pdfcompile::config::TierPolicy;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;

/// Write a PDF with one page per entry of `widths`, each page `width` x 200 points.
///
/// Distinct widths let a test tell pages apart after merging.
pub fn write_pdf(path: &Path, widths: &[i64]) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for width in widths {
        let content = Content {
            operations: vec![
                Operation::new("re", vec![10.into(), 10.into(), 20.into(), 20.into()]),
                Operation::new("f", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), (*width).into(), 200.into()],
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => kids.len() as i64,
            "Kids" => kids,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

/// Write a minimal `.docx` holding the given paragraphs.
pub fn write_docx(path: &Path, paragraphs: &[&str]) {
    let body: String = paragraphs
        .iter()
        .map(|text| format!("<w:p><w:r><w:t>{text}</w:t></w:r></w:p>"))
        .collect();
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
    );

    let mut zip = zip::ZipWriter::new(File::create(path).unwrap());
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    zip.start_file("word/document.xml", options).unwrap();
    zip.write_all(xml.as_bytes()).unwrap();
    zip.finish().unwrap();
}

/// Write a solid RGB PNG.
pub fn write_png(path: &Path, width: u32, height: u32) {
    image::RgbImage::from_pixel(width, height, image::Rgb([30, 120, 200]))
        .save(path)
        .unwrap();
}

/// Page widths of a PDF in page order.
pub fn page_widths(path: &Path) -> Vec<f32> {
    let doc = Document::load(path).unwrap();
    doc.get_pages()
        .values()
        .map(|id| {
            let page = doc.get_dictionary(*id).unwrap();
            let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
            media_box[2].as_float().unwrap()
        })
        .collect()
}

/// Configuration writing into `destination`, with a compressor that
/// never runs for test-sized inputs.
pub fn test_config(destination: PathBuf) -> Config {
    Config {
        destination,
        ghostscript: PathBuf::from("no-such-ghostscript"),
        tiers: TierPolicy {
            ebook_threshold: u64::MAX - 1,
            screen_threshold: u64::MAX,
        },
        open_result: false,
        help_document: PathBuf::from("/nonexistent/ayuda.pdf"),
        quiet: true,
        verbose: false,
        json: false,
        workspace_root: None,
    }
}
