//! PDF input/output operations.
//!
//! - [`PdfReader`] loads a PDF and tells malformed files apart from I/O failures.
//! - [`PdfWriter`] serializes a document, atomically by default.

pub mod reader;
pub mod writer;

pub use reader::{LoadedPdf, PdfReader};
pub use writer::{PdfWriter, WriteStatistics};
