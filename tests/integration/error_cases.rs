//! Runs that produce nothing.

use pdfcompile::{App, CompileError, CompileRequest};
use std::path::PathBuf;
use tempfile::TempDir;

use crate::common::test_config;

#[tokio::test]
async fn test_all_inputs_invalid() {
    let source = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();

    let corrupt = source.path().join("broken.pdf");
    let unsupported = source.path().join("sheet.xlsx");
    let bad_image = source.path().join("photo.jpg");
    std::fs::write(&corrupt, b"not a pdf").unwrap();
    std::fs::write(&unsupported, b"PK").unwrap();
    std::fs::write(&bad_image, b"not a jpeg").unwrap();

    let app = App::new(test_config(dest.path().to_path_buf())).unwrap();
    let result = app
        .run(&CompileRequest::Files(vec![corrupt, unsupported, bad_image]))
        .await;

    let err = result.unwrap_err();
    assert!(matches!(err, CompileError::NoValidInputs));
    assert_eq!(err.exit_code(), 4);
    assert_eq!(std::fs::read_dir(dest.path()).unwrap().count(), 0);
    assert!(!app.gate().is_running());
}

#[tokio::test]
async fn test_empty_directory() {
    let source = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();

    let app = App::new(test_config(dest.path().to_path_buf())).unwrap();
    let result = app
        .run(&CompileRequest::Directory(source.path().to_path_buf()))
        .await;

    assert!(matches!(result, Err(CompileError::NoValidInputs)));
}

#[tokio::test]
async fn test_missing_directory() {
    let dest = TempDir::new().unwrap();

    let app = App::new(test_config(dest.path().to_path_buf())).unwrap();
    let result = app
        .run(&CompileRequest::Directory(PathBuf::from("/nonexistent/folder")))
        .await;

    assert!(matches!(result, Err(CompileError::FileNotFound { .. })));
}

#[tokio::test]
async fn test_missing_files_are_skipped() {
    let dest = TempDir::new().unwrap();

    let app = App::new(test_config(dest.path().to_path_buf())).unwrap();
    let result = app
        .run(&CompileRequest::Files(vec![PathBuf::from("/nonexistent/a.pdf")]))
        .await;

    assert!(matches!(result, Err(CompileError::NoValidInputs)));
}

#[tokio::test]
async fn test_failed_runs_leave_no_workspace() {
    let source = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();

    let corrupt = source.path().join("broken.pdf");
    std::fs::write(&corrupt, b"not a pdf").unwrap();

    let mut config = test_config(dest.path().to_path_buf());
    config.workspace_root = Some(scratch.path().to_path_buf());
    let app = App::new(config).unwrap();

    for request in [
        CompileRequest::Directory(source.path().to_path_buf()),
        CompileRequest::Files(vec![corrupt.clone()]),
    ] {
        let result = app.run(&request).await;
        assert!(matches!(result, Err(CompileError::NoValidInputs)));
        assert_eq!(std::fs::read_dir(scratch.path()).unwrap().count(), 0);
    }
}

#[tokio::test]
async fn test_successful_runs_leave_no_workspace() {
    let source = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();

    let notes = source.path().join("notes.txt");
    std::fs::write(&notes, "contenido").unwrap();

    let mut config = test_config(dest.path().to_path_buf());
    config.workspace_root = Some(scratch.path().to_path_buf());
    let app = App::new(config).unwrap();

    for request in [
        CompileRequest::Directory(source.path().to_path_buf()),
        CompileRequest::Files(vec![notes.clone()]),
    ] {
        let placed = app.run(&request).await.unwrap();
        assert!(placed.destination.is_file());
        assert_eq!(std::fs::read_dir(scratch.path()).unwrap().count(), 0);
    }
}
