//! Error types for pdfcompile.
//!
//! Errors fall into three groups:
//!
//! - **Per-item errors**: a single input could not be converted or
//!   sanitized. The compiler logs them and skips the item.
//! - **Run-level errors**: no input produced any page, the final artifact
//!   went missing, or the destination could not be written.
//! - **Setup errors**: invalid configuration or a concurrent run.

use std::io;
use std::path::PathBuf;

/// Result type alias for pdfcompile operations.
pub type Result<T> = std::result::Result<T, CompileError>;

/// Main error type for pdfcompile operations.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// Input file was not found.
    #[error("File not found: {}", path.display())]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// Path exists but is not a regular file.
    #[error("Not a file: {}", path.display())]
    NotAFile {
        /// Offending path.
        path: PathBuf,
    },

    /// Path exists but is not a directory.
    #[error("Not a directory: {}", path.display())]
    NotADirectory {
        /// Offending path.
        path: PathBuf,
    },

    /// Text input is unreadable or not valid UTF-8.
    #[error("Cannot read text file: {}\n  Reason: {source}", path.display())]
    InvalidText {
        /// Path to the text file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Image data is unsupported or corrupt.
    #[error("Cannot decode image: {}\n  Reason: {source}", path.display())]
    ImageDecode {
        /// Path to the image.
        path: PathBuf,
        /// Decoder error.
        #[source]
        source: image::ImageError,
    },

    /// Word document container is not a valid package.
    #[error("Invalid Word document: {}\n  Reason: {reason}", path.display())]
    InvalidDocx {
        /// Path to the document.
        path: PathBuf,
        /// Details about what is wrong with the package.
        reason: String,
    },

    /// PDF could not be parsed.
    #[error("Corrupted or invalid PDF: {}\n  Details: {details}", path.display())]
    MalformedPdf {
        /// Path to the PDF.
        path: PathBuf,
        /// Parser details.
        details: String,
    },

    /// Error raised by the PDF object model.
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// Every input was skipped.
    #[error("No valid files were found to compile")]
    NoValidInputs,

    /// The final artifact disappeared before it could be placed.
    #[error("Final PDF not found: {}", path.display())]
    ArtifactMissing {
        /// Expected artifact location.
        path: PathBuf,
    },

    /// Moving the artifact to its destination failed.
    #[error("Failed to place output at: {}\n  Reason: {source}", path.display())]
    Placement {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A compilation is already in progress.
    #[error("A compilation is already running")]
    AlreadyRunning,

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl From<anyhow::Error> for CompileError {
    fn from(err: anyhow::Error) -> Self {
        Self::other(err.to_string())
    }
}

impl CompileError {
    /// Create a FileNotFound error.
    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    /// Create a MalformedPdf error.
    pub fn malformed_pdf(path: PathBuf, details: impl Into<String>) -> Self {
        Self::MalformedPdf {
            path,
            details: details.into(),
        }
    }

    /// Create an InvalidDocx error.
    pub fn invalid_docx(path: PathBuf, reason: impl Into<String>) -> Self {
        Self::InvalidDocx {
            path,
            reason: reason.into(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Check if this error only affects a single input item.
    ///
    /// The compiler skips the item and keeps going for these.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::FileNotFound { .. }
                | Self::NotAFile { .. }
                | Self::InvalidText { .. }
                | Self::ImageDecode { .. }
                | Self::InvalidDocx { .. }
                | Self::MalformedPdf { .. }
                | Self::Pdf(_)
        )
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. } => 2,
            Self::NotAFile { .. } => 2,
            Self::NotADirectory { .. } => 2,
            Self::InvalidText { .. } => 3,
            Self::ImageDecode { .. } => 3,
            Self::InvalidDocx { .. } => 3,
            Self::MalformedPdf { .. } => 3,
            Self::Pdf(_) => 3,
            Self::NoValidInputs => 4,
            Self::ArtifactMissing { .. } => 5,
            Self::Placement { .. } => 5,
            Self::AlreadyRunning => 6,
            Self::InvalidConfig { .. } => 1,
            Self::Io(_) => 5,
            Self::Other { .. } => 1,
        }
    }
}
