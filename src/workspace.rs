//! Per-run temporary workspace.

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::error::Result;
use crate::input::InputItem;

const PREFIX: &str = "pdfcompile_";

/// Uniquely named directory holding one run's intermediate files.
///
/// Dropping the workspace deletes it. [`Workspace::close`] does the same
/// but logs a failure instead of ignoring it.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create a new workspace under the system temporary directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn create() -> Result<Self> {
        Self::from_dir(tempfile::Builder::new().prefix(PREFIX).tempdir()?)
    }

    /// Create a new workspace under `root`, creating `root` if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if either directory cannot be created.
    pub fn create_in(root: &Path) -> Result<Self> {
        std::fs::create_dir_all(root)?;
        Self::from_dir(tempfile::Builder::new().prefix(PREFIX).tempdir_in(root)?)
    }

    fn from_dir(dir: TempDir) -> Result<Self> {
        log::debug!("Created workspace {}", dir.path().display());
        Ok(Self { dir })
    }

    /// Workspace root.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Intermediate PDF for the `index`-th input: `NNN_<stem>_<suffix>.pdf`.
    pub fn intermediate_path(&self, index: usize, item: &InputItem) -> PathBuf {
        self.path().join(format!(
            "{:03}_{}_{}.pdf",
            index,
            item.stem(),
            item.kind.intermediate_suffix()
        ))
    }

    /// Location of the merged PDF.
    pub fn merged_path(&self) -> PathBuf {
        self.path().join("merged.pdf")
    }

    /// Location of the compression candidate.
    pub fn candidate_path(&self) -> PathBuf {
        self.path().join("compressed.pdf")
    }

    /// Delete the workspace, logging (not returning) any failure.
    pub fn close(self) {
        let path = self.path().to_path_buf();
        match self.dir.close() {
            Ok(()) => log::debug!("Removed workspace {}", path.display()),
            Err(e) => log::warn!("Failed to remove workspace {}: {e}", path.display()),
        }
    }

    /// Leave the workspace on disk and return its path.
    pub fn keep(self) -> PathBuf {
        self.dir.keep()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputItem;

    #[test]
    fn test_workspace_lifecycle() {
        let workspace = Workspace::create().unwrap();
        let path = workspace.path().to_path_buf();

        assert!(path.is_dir());
        assert!(
            path.file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with(PREFIX)
        );

        workspace.close();
        assert!(!path.exists());
    }

    #[test]
    fn test_intermediate_names() {
        let workspace = Workspace::create().unwrap();

        let pdf = InputItem::new(PathBuf::from("scan.PDF"));
        let txt = InputItem::new(PathBuf::from("notes.txt"));

        assert_eq!(
            workspace.intermediate_path(0, &pdf),
            workspace.path().join("000_scan_clean.pdf")
        );
        assert_eq!(
            workspace.intermediate_path(12, &txt),
            workspace.path().join("012_notes_temp.pdf")
        );
        assert_eq!(workspace.merged_path(), workspace.path().join("merged.pdf"));
        assert_eq!(
            workspace.candidate_path(),
            workspace.path().join("compressed.pdf")
        );
    }

    #[test]
    fn test_create_in_root() {
        let root = tempfile::TempDir::new().unwrap();
        let nested = root.path().join("scratch");

        let workspace = Workspace::create_in(&nested).unwrap();
        assert_eq!(workspace.path().parent(), Some(nested.as_path()));

        workspace.close();
        assert_eq!(std::fs::read_dir(&nested).unwrap().count(), 0);
    }

    #[test]
    fn test_keep_leaves_directory() {
        let workspace = Workspace::create().unwrap();
        let path = workspace.keep();

        assert!(path.is_dir());
        std::fs::remove_dir_all(&path).unwrap();
    }

    #[test]
    fn test_drop_removes_directory() {
        let path = {
            let workspace = Workspace::create().unwrap();
            workspace.path().to_path_buf()
        };
        assert!(!path.exists());
    }
}
