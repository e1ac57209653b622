//! Compiling an explicit list of files.

use pdfcompile::{App, CompileRequest};
use rstest::rstest;
use tempfile::TempDir;

use crate::common::{page_widths, test_config, write_pdf, write_png};

#[tokio::test]
async fn test_three_pdfs_in_given_order() {
    let source = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();

    let a = source.path().join("a.pdf");
    let b = source.path().join("b.pdf");
    let c = source.path().join("c.pdf");
    write_pdf(&a, &[100]);
    write_pdf(&b, &[200, 210]);
    write_pdf(&c, &[300, 310, 320]);

    let app = App::new(test_config(dest.path().to_path_buf())).unwrap();
    let placed = app
        .run(&CompileRequest::Files(vec![c, a, b]))
        .await
        .unwrap();

    assert_eq!(placed.destination, dest.path().join("Documentos_UNIDOS_1.pdf"));
    assert_eq!(placed.report.total_pages, 6);
    assert_eq!(
        page_widths(&placed.destination),
        vec![300.0, 310.0, 320.0, 100.0, 200.0, 210.0]
    );
}

#[tokio::test]
async fn test_numbered_outputs_never_overwrite() {
    let source = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    let input = source.path().join("scan.png");
    write_png(&input, 100, 100);

    let app = App::new(test_config(dest.path().to_path_buf())).unwrap();
    let request = CompileRequest::Files(vec![input]);

    let first = app.run(&request).await.unwrap();
    let second = app.run(&request).await.unwrap();

    assert_eq!(first.destination, dest.path().join("Documentos_UNIDOS_1.pdf"));
    assert_eq!(second.destination, dest.path().join("Documentos_UNIDOS_2.pdf"));
    assert!(first.destination.is_file());
    assert!(second.destination.is_file());
}

#[rstest]
#[case::text("notes.txt")]
#[case::image("photo.png")]
#[case::pdf("report.pdf")]
#[tokio::test]
async fn test_single_input_becomes_one_page(#[case] name: &str) {
    let source = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    let input = source.path().join(name);

    match name.rsplit('.').next() {
        Some("txt") => std::fs::write(&input, "una sola linea").unwrap(),
        Some("png") => write_png(&input, 40, 40),
        _ => write_pdf(&input, &[150]),
    }

    let app = App::new(test_config(dest.path().to_path_buf())).unwrap();
    let placed = app.run(&CompileRequest::Files(vec![input])).await.unwrap();

    assert_eq!(placed.report.total_pages, 1);
    assert_eq!(page_widths(&placed.destination).len(), 1);
}
