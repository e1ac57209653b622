//! Moving the final artifact out of the workspace.
//!
//! Directory runs are named after the source directory and replace any
//! earlier result. File-list runs take the first free numbered name and
//! never replace anything. The workspace is removed only after the
//! artifact has left it.

use std::path::{Path, PathBuf};

use crate::compiler::{CompileReport, Compiled};
use crate::config::CompileRequest;
use crate::error::{CompileError, Result};

/// Base name for file-list results.
pub const NUMBERED_BASE: &str = "Documentos_UNIDOS";

/// Suffix for directory results.
pub const DIRECTORY_SUFFIX: &str = "_UNIDO";

/// An artifact at its final destination.
#[derive(Debug)]
pub struct Placed {
    /// Final location.
    pub destination: PathBuf,
    /// Run summary with `destination` filled in.
    pub report: CompileReport,
}

/// Relocates compiled artifacts into a destination directory.
#[derive(Debug, Clone)]
pub struct Placement {
    destination_dir: PathBuf,
}

impl Placement {
    /// Place artifacts into `destination_dir`.
    pub fn new(destination_dir: impl Into<PathBuf>) -> Self {
        Self {
            destination_dir: destination_dir.into(),
        }
    }

    /// Where the artifact for `request` goes.
    pub fn destination_for(&self, request: &CompileRequest) -> PathBuf {
        match request {
            CompileRequest::Directory(dir) => {
                self.destination_dir.join(directory_output_name(dir))
            }
            CompileRequest::Files(_) => next_numbered_path(&self.destination_dir),
        }
    }

    /// Move the artifact to its destination, then remove the workspace.
    ///
    /// If the move fails the workspace is kept on disk so the artifact is
    /// not lost; its location is logged.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::ArtifactMissing`] if the artifact is gone,
    /// or [`CompileError::Placement`] if it cannot be moved.
    pub async fn place(&self, compiled: Compiled, request: &CompileRequest) -> Result<Placed> {
        let Compiled {
            artifact,
            workspace,
            mut report,
        } = compiled;

        if !tokio::fs::try_exists(&artifact).await.unwrap_or(false) {
            log::error!(
                "Final PDF not found at {}; nothing to move",
                artifact.display()
            );
            workspace.close();
            return Err(CompileError::ArtifactMissing { path: artifact });
        }

        let placement_error = |path: &Path, source| CompileError::Placement {
            path: path.to_path_buf(),
            source,
        };

        tokio::fs::create_dir_all(&self.destination_dir)
            .await
            .map_err(|e| placement_error(&self.destination_dir, e))?;

        let destination = self.destination_for(request);

        if matches!(request, CompileRequest::Directory(_))
            && tokio::fs::try_exists(&destination).await.unwrap_or(false)
        {
            log::info!("Replacing existing {}", destination.display());
            if let Err(e) = tokio::fs::remove_file(&destination).await {
                log::warn!("Failed to remove {}: {e}", destination.display());
            }
        }

        if let Err(e) = relocate(&artifact, &destination).await {
            let kept = workspace.keep();
            log::error!(
                "Failed to move {} to {}; intermediate files kept in {}",
                artifact.display(),
                destination.display(),
                kept.display()
            );
            return Err(placement_error(&destination, e));
        }

        log::info!("Placed result at {}", destination.display());
        workspace.close();

        report.destination = Some(destination.clone());
        Ok(Placed {
            destination,
            report,
        })
    }
}

/// `<dirname>_UNIDO.pdf`.
pub fn directory_output_name(dir: &Path) -> String {
    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .or_else(|| {
            dir.canonicalize()
                .ok()
                .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        })
        .unwrap_or_else(|| "documentos".to_string());

    format!("{name}{DIRECTORY_SUFFIX}.pdf")
}

/// First `Documentos_UNIDOS_<n>.pdf` in `dir` that does not exist, from 1.
pub fn next_numbered_path(dir: &Path) -> PathBuf {
    (1..)
        .map(|i| dir.join(format!("{NUMBERED_BASE}_{i}.pdf")))
        .find(|candidate| !candidate.exists())
        .unwrap_or_else(|| dir.join(format!("{NUMBERED_BASE}.pdf")))
}

/// Rename, falling back to copy and delete across filesystems.
async fn relocate(from: &Path, to: &Path) -> std::io::Result<()> {
    if tokio::fs::rename(from, to).await.is_ok() {
        return Ok(());
    }

    tokio::fs::copy(from, to).await?;
    if let Err(e) = tokio::fs::remove_file(from).await {
        log::warn!("Copied but could not remove {}: {e}", from.display());
    }
    Ok(())
}
