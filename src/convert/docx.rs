//! Word documents to PDF.
//!
//! Only paragraph text is kept. Styles, tables, images and headers are
//! dropped; the text is set in the same page layout as plain text files.

use quick_xml::Reader;
use quick_xml::events::Event;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;
use zip::ZipArchive;

use super::TextLayout;
use crate::error::{CompileError, Result};

const DOCUMENT_PART: &str = "word/document.xml";

/// Render the body paragraphs of a `.docx` file.
///
/// # Errors
///
/// Returns [`CompileError::InvalidDocx`] if the file is not a zip package,
/// lacks `word/document.xml`, or the part is not well-formed XML.
pub fn convert(input: &Path, output: &Path) -> Result<()> {
    let file = File::open(input)?;
    let mut archive = ZipArchive::new(file)
        .map_err(|e| CompileError::invalid_docx(input.to_path_buf(), e.to_string()))?;

    let paragraphs = read_paragraphs(&mut archive)
        .map_err(|reason| CompileError::invalid_docx(input.to_path_buf(), reason))?;

    let pages = TextLayout::default().render(&paragraphs, output)?;
    log::debug!(
        "Extracted {} paragraph(s) from {} into {} page(s)",
        paragraphs.len(),
        input.display(),
        pages
    );

    Ok(())
}

fn read_paragraphs<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
) -> std::result::Result<Vec<String>, String> {
    let mut part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| format!("{DOCUMENT_PART}: {e}"))?;

    let mut xml = String::new();
    part.read_to_string(&mut xml)
        .map_err(|e| format!("{DOCUMENT_PART}: {e}"))?;

    parse_paragraphs(&xml)
}

/// Text of every top-level `w:p` in a WordprocessingML body.
///
/// Paragraphs inside tables and text boxes are skipped.
pub fn parse_paragraphs(xml: &str) -> std::result::Result<Vec<String>, String> {
    let mut reader = Reader::from_str(xml);

    let mut paragraphs = Vec::new();
    let mut current: Option<String> = None;
    let mut nested = 0usize;
    let mut in_run = false;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"tbl" | b"txbxContent" => nested += 1,
                b"p" if nested == 0 => current = Some(String::new()),
                b"r" => in_run = true,
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"tbl" | b"txbxContent" => nested = nested.saturating_sub(1),
                b"p" if nested == 0 => {
                    if let Some(text) = current.take() {
                        paragraphs.push(text);
                    }
                }
                b"r" => in_run = false,
                b"t" => in_text = false,
                _ => {}
            },
            // Tab stops in `w:pPr` are also `w:tab`; only run content counts.
            Ok(Event::Empty(e)) if nested == 0 => match (e.local_name().as_ref(), current.as_mut()) {
                (b"p", None) => paragraphs.push(String::new()),
                (b"tab", Some(text)) if in_run => text.push('\t'),
                (b"br" | b"cr", Some(text)) if in_run => text.push('\n'),
                _ => {}
            },
            Ok(Event::Text(e)) if in_text && nested == 0 => {
                if let Some(text) = current.as_mut() {
                    let unescaped = e.unescape().map_err(|e| e.to_string())?;
                    text.push_str(&unescaped);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(format!(
                    "XML parse error at position {}: {e}",
                    reader.error_position()
                ));
            }
            _ => {}
        }
    }

    Ok(paragraphs)
}
