//! Plain text to PDF.

use std::path::Path;

use super::TextLayout;
use crate::error::{CompileError, Result};

/// Render a UTF-8 text file, one paragraph per line.
///
/// # Errors
///
/// Returns [`CompileError::InvalidText`] if the file cannot be read or is
/// not valid UTF-8.
pub fn convert(input: &Path, output: &Path) -> Result<()> {
    let content = std::fs::read_to_string(input).map_err(|source| CompileError::InvalidText {
        path: input.to_path_buf(),
        source,
    })?;

    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
    let paragraphs: Vec<&str> = content.lines().collect();

    let pages = TextLayout::default().render(&paragraphs, output)?;
    log::debug!(
        "Rendered {} line(s) of {} into {} page(s)",
        paragraphs.len(),
        input.display(),
        pages
    );

    Ok(())
}
