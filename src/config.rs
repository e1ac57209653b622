//! Configuration module for pdfcompile.
//!
//! Holds the validated settings that drive a compilation run and the
//! request object the interface layer hands to the pipeline.

use anyhow::{Result, bail};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// One mebibyte.
pub const MIB: u64 = 1024 * 1024;

/// Default name of the bundled help document.
pub const HELP_DOCUMENT_NAME: &str = "ayuda.pdf";

/// Compression preset passed to the external compressor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionTier {
    /// Leave the merged PDF untouched.
    None,
    /// Medium quality, suitable for on-screen reading.
    Ebook,
    /// Lowest quality, smallest output.
    Screen,
}

impl CompressionTier {
    /// Value for the compressor's `-dPDFSETTINGS` flag.
    pub fn pdf_setting(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Ebook => Some("/ebook"),
            Self::Screen => Some("/screen"),
        }
    }
}

/// Size thresholds selecting a [`CompressionTier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierPolicy {
    /// Files at or above this size use the ebook preset.
    pub ebook_threshold: u64,
    /// Files at or above this size use the screen preset.
    pub screen_threshold: u64,
}

impl Default for TierPolicy {
    fn default() -> Self {
        Self {
            ebook_threshold: 3 * MIB,
            screen_threshold: 8 * MIB,
        }
    }
}

impl TierPolicy {
    /// Pick the tier for a merged PDF of `size_bytes`.
    pub fn tier_for(&self, size_bytes: u64) -> CompressionTier {
        if size_bytes < self.ebook_threshold {
            CompressionTier::None
        } else if size_bytes < self.screen_threshold {
            CompressionTier::Ebook
        } else {
            CompressionTier::Screen
        }
    }
}

/// What the user asked to compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileRequest {
    /// Every entry of a directory, sorted by name.
    Directory(PathBuf),
    /// An explicit list of files, in the given order.
    Files(Vec<PathBuf>),
}

impl CompileRequest {
    /// Short label used in log lines.
    pub fn describe(&self) -> String {
        match self {
            Self::Directory(dir) => format!("directory {}", dir.display()),
            Self::Files(files) => format!("{} selected file(s)", files.len()),
        }
    }
}

/// Complete configuration for a compilation run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory the final PDF is placed in.
    pub destination: PathBuf,

    /// External compressor executable.
    pub ghostscript: PathBuf,

    /// Size thresholds for compression.
    pub tiers: TierPolicy,

    /// Open the placed PDF with the default viewer.
    pub open_result: bool,

    /// Help document opened by the `manual` command.
    pub help_document: PathBuf,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,

    /// Verbose output mode.
    pub verbose: bool,

    /// Print the compile report as JSON.
    pub json: bool,

    /// Parent of the per-run workspace; the system temp directory when unset.
    pub workspace_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            destination: default_destination(),
            ghostscript: default_ghostscript(),
            tiers: TierPolicy::default(),
            open_result: false,
            help_document: default_help_document(),
            quiet: false,
            verbose: false,
            json: false,
            workspace_root: None,
        }
    }
}

impl Config {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Verbose and quiet modes are both enabled
    /// - The ebook threshold is not below the screen threshold
    /// - The destination exists but is not a directory
    /// - The workspace root exists but is not a directory
    pub fn validate(&self) -> Result<()> {
        if self.verbose && self.quiet {
            bail!("Cannot use both --verbose and --quiet");
        }

        if self.tiers.ebook_threshold >= self.tiers.screen_threshold {
            bail!(
                "Ebook threshold ({}) must be below screen threshold ({})",
                self.tiers.ebook_threshold,
                self.tiers.screen_threshold
            );
        }

        if self.destination.exists() && !self.destination.is_dir() {
            bail!(
                "Destination is not a directory: {}",
                self.destination.display()
            );
        }

        if let Some(root) = &self.workspace_root
            && root.exists()
            && !root.is_dir()
        {
            bail!("Work directory is not a directory: {}", root.display());
        }

        Ok(())
    }

    /// Check if output should be displayed.
    pub fn should_print(&self) -> bool {
        !self.quiet && !self.json
    }
}

/// The user's downloads directory, with fallbacks.
pub fn default_destination() -> PathBuf {
    dirs::download_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Locate the compressor: a bundled copy next to the executable wins,
/// otherwise the platform's Ghostscript binary on `PATH`.
pub fn default_ghostscript() -> PathBuf {
    let name = if cfg!(windows) { "gswin64c.exe" } else { "gs" };

    if let Some(dir) = executable_dir() {
        let bundled = dir.join("gs").join("bin").join(name);
        if bundled.is_file() {
            return bundled;
        }
    }

    PathBuf::from(if cfg!(windows) { "gswin64c" } else { "gs" })
}

/// The help document shipped next to the executable.
pub fn default_help_document() -> PathBuf {
    executable_dir()
        .map(|dir| dir.join(HELP_DOCUMENT_NAME))
        .unwrap_or_else(|| PathBuf::from(HELP_DOCUMENT_NAME))
}

fn executable_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
}
