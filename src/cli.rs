//! CLI argument parsing for pdfcompile.
//!
//! The command line plays the part of the file and folder pickers: it
//! builds a [`CompileRequest`] and a [`Config`] and hands both to the
//! library.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use pdfcompile::config::{Config, TierPolicy, default_destination, default_ghostscript, default_help_document};
use pdfcompile::utils::collect_paths_for_patterns;
use pdfcompile::{CompileError, CompileRequest, Result};

/// Compile PDFs, text files, Word documents and images into one PDF.
///
/// Unsupported or damaged inputs are skipped. Large results are
/// compressed with Ghostscript before being placed in the destination
/// directory.
#[derive(Parser, Debug)]
#[command(name = "pdfcompile")]
#[command(version)]
#[command(about = "Compile mixed documents into a single compressed PDF", long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// What to compile
    #[command(subcommand)]
    pub command: Command,

    /// Directory the compiled PDF is placed in
    ///
    /// Defaults to the user's downloads directory.
    #[arg(short, long, global = true, value_name = "DIR", env = "PDFCOMPILE_DEST")]
    pub dest: Option<PathBuf>,

    /// Ghostscript executable used for compression
    ///
    /// Defaults to a copy bundled next to this program, then the
    /// platform's Ghostscript on PATH.
    #[arg(long = "gs", global = true, value_name = "PATH", env = "PDFCOMPILE_GS")]
    pub ghostscript: Option<PathBuf>,

    /// Open the compiled PDF with the default viewer
    #[arg(long, global = true)]
    pub open: bool,

    /// Help document opened by the `manual` command
    #[arg(long = "help-doc", global = true, value_name = "FILE")]
    pub help_doc: Option<PathBuf>,

    /// Increase log detail (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print the compile report as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Directory for intermediate files (defaults to the system temp directory)
    #[arg(long = "work-dir", global = true, value_name = "DIR", env = "PDFCOMPILE_WORKDIR")]
    pub work_dir: Option<PathBuf>,
}

/// Subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Compile every file in a directory, in name order
    ///
    /// The result is named `<directory>_UNIDO.pdf` and replaces any
    /// previous result of the same name.
    Dir {
        /// Directory to compile
        #[arg(value_name = "DIR")]
        directory: PathBuf,
    },

    /// Compile files in the order given (glob patterns allowed)
    ///
    /// The result is named `Documentos_UNIDOS_<n>.pdf` with the first
    /// free number.
    Files {
        /// Input files or patterns
        #[arg(required = true, value_name = "FILE")]
        inputs: Vec<String>,
    },

    /// Open the help document
    Manual,
}

impl Cli {
    /// Convert CLI arguments into a validated Config.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::InvalidConfig`] if validation fails.
    pub fn to_config(&self) -> Result<Config> {
        let config = Config {
            destination: self.dest.clone().unwrap_or_else(default_destination),
            ghostscript: self.ghostscript.clone().unwrap_or_else(default_ghostscript),
            tiers: TierPolicy::default(),
            open_result: self.open,
            help_document: self.help_doc.clone().unwrap_or_else(default_help_document),
            quiet: self.quiet,
            verbose: self.verbose > 0,
            json: self.json,
            workspace_root: self.work_dir.clone(),
        };

        config.validate().map_err(|e| {
            CompileError::invalid_config(format!("Configuration validation failed: {e}"))
        })?;

        Ok(config)
    }

    /// The compile request, or `None` for `manual`.
    ///
    /// # Errors
    ///
    /// Returns an error if a glob pattern is invalid.
    pub fn to_request(&self) -> Result<Option<CompileRequest>> {
        match &self.command {
            Command::Dir { directory } => Ok(Some(CompileRequest::Directory(directory.clone()))),
            Command::Files { inputs } => {
                let paths = collect_paths_for_patterns(inputs)?;
                Ok(Some(CompileRequest::Files(paths)))
            }
            Command::Manual => Ok(None),
        }
    }

    /// Log level implied by `-q` / `-v`.
    pub fn log_level(&self) -> log::LevelFilter {
        if self.quiet {
            return log::LevelFilter::Error;
        }
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        }
    }
}
