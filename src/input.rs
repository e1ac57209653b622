//! Input classification and enumeration.
//!
//! Inputs are typed by their extension (case-insensitive). Directory mode
//! lists entries non-recursively in lexicographic order by file name;
//! file-list mode keeps the caller's order.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{CompileError, Result};

/// Closed set of input formats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "extension")]
pub enum InputKind {
    /// Existing PDF, sanitized before merging.
    Pdf,
    /// UTF-8 plain text.
    Text,
    /// PNG or JPEG image.
    Image,
    /// Word document (Office Open XML).
    Docx,
    /// Anything else; carries the lowercase extension (may be empty).
    Unsupported(String),
}

impl InputKind {
    /// Classify a path by its extension.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "pdf" => Self::Pdf,
            "txt" => Self::Text,
            "png" | "jpg" | "jpeg" => Self::Image,
            "docx" => Self::Docx,
            _ => Self::Unsupported(ext),
        }
    }

    /// Whether a converter or the sanitizer handles this kind.
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported(_))
    }

    /// Suffix of the intermediate file produced for this kind.
    pub fn intermediate_suffix(&self) -> &'static str {
        match self {
            Self::Pdf => "clean",
            _ => "temp",
        }
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pdf => write!(f, "PDF"),
            Self::Text => write!(f, "text"),
            Self::Image => write!(f, "image"),
            Self::Docx => write!(f, "Word document"),
            Self::Unsupported(ext) if ext.is_empty() => write!(f, "unsupported (no extension)"),
            Self::Unsupported(ext) => write!(f, "unsupported (.{ext})"),
        }
    }
}

/// A path plus its inferred format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputItem {
    /// Source path.
    pub path: PathBuf,
    /// Format inferred from the extension.
    pub kind: InputKind,
}

impl InputItem {
    /// Classify a path.
    pub fn new(path: PathBuf) -> Self {
        let kind = if path.is_dir() {
            InputKind::Unsupported(String::new())
        } else {
            InputKind::from_path(&path)
        };
        Self { path, kind }
    }

    /// File stem used to name intermediate files.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "input".to_string())
    }
}

/// List the entries of `dir` sorted by name.
///
/// # Errors
///
/// Returns an error if `dir` is missing, is not a directory, or cannot be read.
pub fn enumerate_directory(dir: &Path) -> Result<Vec<InputItem>> {
    if !dir.exists() {
        return Err(CompileError::file_not_found(dir.to_path_buf()));
    }
    if !dir.is_dir() {
        return Err(CompileError::NotADirectory {
            path: dir.to_path_buf(),
        });
    }

    let mut items = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|err| match err.into_io_error() {
            Some(io) => CompileError::Io(io),
            None => CompileError::other(format!("Cannot read directory {}", dir.display())),
        })?;
        items.push(InputItem::new(entry.into_path()));
    }

    Ok(items)
}

/// Classify an explicit list, preserving order.
pub fn enumerate_files<I>(paths: I) -> Vec<InputItem>
where
    I: IntoIterator,
    I::Item: AsRef<Path>,
{
    paths
        .into_iter()
        .map(|p| InputItem::new(p.as_ref().to_path_buf()))
        .collect()
}
