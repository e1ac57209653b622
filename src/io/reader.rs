//! PDF reading and loading operations.
//!
//! Reading is split in two steps so callers can react differently to
//! each kind of failure: the bytes are read first (I/O errors propagate
//! as [`CompileError::Io`]), then parsed (parse failures become
//! [`CompileError::MalformedPdf`]).

use lopdf::Document;
use std::path::{Path, PathBuf};

use crate::error::{CompileError, Result};

/// A loaded PDF document with metadata.
#[derive(Debug)]
pub struct LoadedPdf {
    /// The PDF document.
    pub document: Document,

    /// Path to the source file.
    pub path: PathBuf,

    /// Number of pages in the document.
    pub page_count: usize,

    /// File size in bytes.
    pub file_size: u64,
}

/// PDF reader that rejects documents it cannot take pages from.
#[derive(Debug, Clone)]
pub struct PdfReader;

impl PdfReader {
    /// Create a new PDF reader.
    pub fn new() -> Self {
        Self
    }

    /// Load a single PDF document.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file does not exist ([`CompileError::FileNotFound`])
    /// - The file cannot be read ([`CompileError::Io`])
    /// - The file is not a parseable PDF, is encrypted, or has no pages
    ///   ([`CompileError::MalformedPdf`])
    pub fn load(&self, path: &Path) -> Result<LoadedPdf> {
        Self::check_path_exists(path)?;

        let bytes = std::fs::read(path)?;
        let file_size = bytes.len() as u64;

        let document = Document::load_mem(&bytes)
            .map_err(|e| CompileError::malformed_pdf(path.to_path_buf(), e.to_string()))?;

        if document.trailer.has(b"Encrypt") {
            return Err(CompileError::malformed_pdf(
                path.to_path_buf(),
                "PDF is encrypted",
            ));
        }

        let page_count = document.get_pages().len();
        if page_count == 0 {
            return Err(CompileError::malformed_pdf(
                path.to_path_buf(),
                "PDF has no pages",
            ));
        }

        Ok(LoadedPdf {
            document,
            path: path.to_path_buf(),
            page_count,
            file_size,
        })
    }

    /// Check that `path` exists and is a regular file.
    pub fn check_path_exists(path: &Path) -> Result<()> {
        if !path.try_exists()? {
            return Err(CompileError::file_not_found(path.to_path_buf()));
        }

        if path.is_dir() {
            return Err(CompileError::NotAFile {
                path: path.to_path_buf(),
            });
        }

        Ok(())
    }
}

impl Default for PdfReader {
    fn default() -> Self {
        Self::new()
    }
}
