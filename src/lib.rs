//! pdfcompile - Compile mixed documents into a single compressed PDF.
//!
//! Inputs are taken either from a directory (every entry, sorted by name)
//! or from an explicit ordered list. Each supported input becomes PDF
//! pages:
//!
//! - PDFs are sanitized (pages copied into a fresh document)
//! - Plain text and Word documents are typeset on A4 pages
//! - PNG and JPEG images become one page each
//!
//! Inputs that fail are skipped. The pages are merged in input order,
//! compressed with Ghostscript when the result is large, and moved to a
//! destination directory.
//!
//! # Examples
//!
//! ```no_run
//! use pdfcompile::{App, CompileRequest, Config};
//! use std::path::PathBuf;
//!
//! # async fn example() -> pdfcompile::Result<()> {
//! let app = App::new(Config::default())?;
//! let request = CompileRequest::Directory(PathBuf::from("invoices"));
//!
//! let placed = app.run(&request).await?;
//! println!(
//!     "{} pages written to {}",
//!     placed.report.total_pages,
//!     placed.destination.display()
//! );
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod app;
pub mod compiler;
pub mod compress;
pub mod config;
pub mod convert;
pub mod error;
pub mod input;
pub mod io;
pub mod merge;
pub mod opener;
pub mod output;
pub mod placement;
pub mod sanitize;
pub mod utils;
pub mod workspace;

// Re-export commonly used types
pub use app::App;
pub use compiler::{CompileReport, Compiled, Compiler};
pub use config::{CompileRequest, Config};
pub use error::{CompileError, Result};
pub use placement::Placed;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
