//! Page concatenation.

mod merger;

pub use merger::PdfMerger;
