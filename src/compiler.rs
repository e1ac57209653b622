//! The compilation pipeline.
//!
//! Inputs are processed one at a time, in enumeration order. Each item is
//! converted (or sanitized) into the workspace, loaded back and appended
//! to the merged document. A failing item is logged and skipped; only a
//! run where nothing succeeds is an error.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::compress::Compressor;
use crate::config::{CompileRequest, CompressionTier, Config};
use crate::convert::converter_for;
use crate::error::{CompileError, Result};
use crate::input::{InputItem, InputKind, enumerate_directory, enumerate_files};
use crate::io::{PdfReader, PdfWriter};
use crate::merge::PdfMerger;
use crate::sanitize::sanitize;
use crate::workspace::Workspace;

/// What happened to one input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ItemOutcome {
    /// Pages were appended to the merged PDF.
    Included {
        /// Number of pages contributed.
        pages: usize,
    },
    /// The item contributed nothing.
    Skipped {
        /// Human-readable reason.
        reason: String,
    },
}

/// Per-input entry of a [`CompileReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemReport {
    /// Source path.
    pub path: PathBuf,
    /// Detected format.
    pub kind: InputKind,
    /// Result of processing.
    #[serde(flatten)]
    pub outcome: ItemOutcome,
}

/// Summary of one compilation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompileReport {
    /// Every input, in processing order.
    pub items: Vec<ItemReport>,
    /// Pages in the merged PDF.
    pub total_pages: usize,
    /// Size of the merged PDF in bytes.
    pub merged_size: u64,
    /// Size of the final artifact in bytes.
    pub final_size: u64,
    /// Compression preset chosen from the merged size.
    pub tier: CompressionTier,
    /// Whether the compressed output was kept.
    pub compressed: bool,
    /// Where the artifact was placed, once placed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<PathBuf>,
}

impl CompileReport {
    /// Number of inputs that contributed pages.
    pub fn included_count(&self) -> usize {
        self.items
            .iter()
            .filter(|i| matches!(i.outcome, ItemOutcome::Included { .. }))
            .count()
    }

    /// Number of skipped inputs.
    pub fn skipped_count(&self) -> usize {
        self.items.len() - self.included_count()
    }
}

/// A compiled artifact still living in its workspace.
#[derive(Debug)]
pub struct Compiled {
    /// Final PDF (merged or compressed) inside `workspace`.
    pub artifact: PathBuf,
    /// Workspace owning the artifact; removed once the artifact is placed.
    pub workspace: Workspace,
    /// Run summary.
    pub report: CompileReport,
}

/// Runs the pipeline for a [`CompileRequest`].
#[derive(Debug, Clone)]
pub struct Compiler {
    reader: PdfReader,
    writer: PdfWriter,
    compressor: Compressor,
    workspace_root: Option<PathBuf>,
}

impl Compiler {
    /// Create a compiler from configuration.
    pub fn new(config: &Config) -> Self {
        let compiler =
            Self::with_compressor(Compressor::new(config.ghostscript.clone(), config.tiers));
        match &config.workspace_root {
            Some(root) => compiler.with_workspace_root(root.clone()),
            None => compiler,
        }
    }

    /// Create a compiler using a specific compressor.
    pub fn with_compressor(compressor: Compressor) -> Self {
        Self {
            reader: PdfReader::new(),
            writer: PdfWriter::new(),
            compressor,
            workspace_root: None,
        }
    }

    /// Create run workspaces under `root` instead of the system temp directory.
    pub fn with_workspace_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.workspace_root = Some(root.into());
        self
    }

    /// Compile whatever `request` names.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::NoValidInputs`] if no input produced a page,
    /// or an error if the directory cannot be listed or the workspace
    /// cannot be written.
    pub async fn compile(&self, request: &CompileRequest) -> Result<Compiled> {
        match request {
            CompileRequest::Directory(dir) => self.compile_directory(dir).await,
            CompileRequest::Files(paths) => self.compile_files(paths).await,
        }
    }

    /// Compile every entry of `dir`, sorted by name.
    pub async fn compile_directory(&self, dir: &Path) -> Result<Compiled> {
        let items = enumerate_directory(dir)?;
        log::info!("Found {} entries in {}", items.len(), dir.display());
        self.compile_items(items).await
    }

    /// Compile `paths` in the given order.
    pub async fn compile_files<P: AsRef<Path>>(&self, paths: &[P]) -> Result<Compiled> {
        self.compile_items(enumerate_files(paths)).await
    }

    async fn compile_items(&self, items: Vec<InputItem>) -> Result<Compiled> {
        let workspace = match &self.workspace_root {
            Some(root) => Workspace::create_in(root)?,
            None => Workspace::create()?,
        };
        let mut merger = PdfMerger::new();
        let mut reports = Vec::with_capacity(items.len());
        let total = items.len();

        for (index, item) in items.into_iter().enumerate() {
            let outcome = match self.process_item(index, &item, &workspace, &mut merger) {
                Ok(pages) => {
                    log::info!(
                        "[{}/{}] Added {} ({} page(s))",
                        index + 1,
                        total,
                        item.path.display(),
                        pages
                    );
                    ItemOutcome::Included { pages }
                }
                Err(e) => {
                    // The user-facing skip notice comes from the report.
                    let cause = if e.is_recoverable() { "" } else { " after unexpected error" };
                    log::info!(
                        "[{}/{}] Skipping {}{cause}: {e}",
                        index + 1,
                        total,
                        item.path.display()
                    );
                    ItemOutcome::Skipped {
                        reason: e.to_string(),
                    }
                }
            };

            reports.push(ItemReport {
                path: item.path,
                kind: item.kind,
                outcome,
            });
        }

        let total_pages = merger.page_count();
        let documents = merger.document_count();
        let Some(mut merged) = merger.finish().filter(|_| total_pages > 0) else {
            log::info!("No valid files were found among {total} input(s)");
            workspace.close();
            return Err(CompileError::NoValidInputs);
        };

        let merged_path = workspace.merged_path();
        let stats = self.writer.save_with_stats(&mut merged, &merged_path)?;
        log::info!(
            "Merged {} page(s) from {} document(s) into {} ({})",
            total_pages,
            documents,
            merged_path.display(),
            stats.format_file_size()
        );

        let outcome = self
            .compressor
            .compress_with_outcome(&merged_path, &workspace.candidate_path(), stats.file_size)
            .await;
        let final_size = tokio::fs::metadata(&outcome.output).await?.len();

        Ok(Compiled {
            artifact: outcome.output,
            workspace,
            report: CompileReport {
                items: reports,
                total_pages,
                merged_size: stats.file_size,
                final_size,
                tier: outcome.tier,
                compressed: outcome.adopted,
                destination: None,
            },
        })
    }

    /// Produce the item's intermediate PDF and append it.
    fn process_item(
        &self,
        index: usize,
        item: &InputItem,
        workspace: &Workspace,
        merger: &mut PdfMerger,
    ) -> Result<usize> {
        if item.path.is_dir() {
            return Err(CompileError::NotAFile {
                path: item.path.clone(),
            });
        }
        if !item.kind.is_supported() {
            return Err(CompileError::other(format!(
                "Unsupported file type: {}",
                item.kind
            )));
        }
        PdfReader::check_path_exists(&item.path)?;

        let intermediate = workspace.intermediate_path(index, item);
        log::debug!(
            "Processing {} as {} -> {}",
            item.path.display(),
            item.kind,
            intermediate.display()
        );

        match converter_for(&item.kind) {
            Some(convert) => convert(&item.path, &intermediate)?,
            None => {
                if !sanitize(&item.path, &intermediate)? {
                    return Err(CompileError::malformed_pdf(
                        item.path.clone(),
                        "unreadable or structurally damaged",
                    ));
                }
            }
        }

        let loaded = self.reader.load(&intermediate)?;
        merger.append(loaded.document)
    }
}
