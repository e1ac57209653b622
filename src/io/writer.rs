//! PDF writing and saving operations.
//!
//! Writes are atomic: the document goes to a sibling `.tmp`
//! file first and is renamed into place once flushed.

use lopdf::Document;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{CompileError, Result};
use crate::utils::format_file_size;

/// Buffer size for writing, in bytes.
const BUFFER_SIZE: usize = 8192;

/// Statistics about a write operation.
#[derive(Debug, Clone)]
pub struct WriteStatistics {
    /// Size of the written file in bytes.
    pub file_size: u64,

    /// Path where the file was written.
    pub output_path: PathBuf,
}

impl WriteStatistics {
    /// Format file size as human-readable string.
    pub fn format_file_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// Writes documents with compressed streams and compact object numbering.
#[derive(Debug, Clone, Default)]
pub struct PdfWriter;

impl PdfWriter {
    /// Create a new PDF writer.
    pub fn new() -> Self {
        Self
    }

    /// Save a PDF document to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or the
    /// file cannot be written.
    pub fn save(&self, doc: &mut Document, path: &Path) -> Result<()> {
        self.save_with_stats(doc, path).map(|_| ())
    }

    /// Save a PDF and return statistics about the operation.
    pub fn save_with_stats(&self, doc: &mut Document, path: &Path) -> Result<WriteStatistics> {
        doc.compress();
        doc.renumber_objects();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let write_path = path.with_extension("tmp");
        let file = std::fs::File::create(&write_path)?;
        let mut writer = std::io::BufWriter::with_capacity(BUFFER_SIZE, file);

        doc.save_to(&mut writer)?;
        writer.flush()?;
        drop(writer);

        std::fs::rename(&write_path, path).map_err(|e| CompileError::Placement {
            path: path.to_path_buf(),
            source: e,
        })?;

        let file_size = std::fs::metadata(path)?.len();

        Ok(WriteStatistics {
            file_size,
            output_path: path.to_path_buf(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;
    use tempfile::TempDir;

    fn create_test_document() -> Document {
        let mut doc = Document::with_version("1.4");

        let catalog_id = doc.new_object_id();
        let pages_id = doc.new_object_id();
        let page_id = doc.new_object_id();

        doc.objects.insert(
            catalog_id,
            dictionary! { "Type" => "Catalog", "Pages" => pages_id }.into(),
        );
        doc.objects.insert(
            pages_id,
            dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }
            .into(),
        );
        doc.objects.insert(
            page_id,
            dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }
            .into(),
        );
        doc.trailer.set("Root", catalog_id);

        doc
    }

    #[test]
    fn test_save_pdf() {
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().join("output.pdf");

        let mut doc = create_test_document();
        PdfWriter::new().save(&mut doc, &output_path).unwrap();

        assert!(output_path.exists());
        assert!(!output_path.with_extension("tmp").exists());
    }

    #[test]
    fn test_save_with_stats() {
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().join("nested").join("output.pdf");

        let mut doc = create_test_document();
        let stats = PdfWriter::new()
            .save_with_stats(&mut doc, &output_path)
            .unwrap();

        assert!(stats.file_size > 0);
        assert_eq!(stats.output_path, output_path);
        assert!(stats.format_file_size().ends_with("bytes") || stats.file_size >= 1024);
    }

    #[test]
    fn test_save_replaces_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().join("output.pdf");
        std::fs::write(&output_path, b"stale").unwrap();

        let mut doc = create_test_document();
        PdfWriter::new().save(&mut doc, &output_path).unwrap();

        let reloaded = Document::load(&output_path).unwrap();
        assert_eq!(reloaded.get_pages().len(), 1);
    }
}
