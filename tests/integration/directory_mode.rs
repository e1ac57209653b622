//! Compiling a whole directory.

use pdfcompile::compiler::ItemOutcome;
use pdfcompile::convert::layout::A4_WIDTH;
use pdfcompile::{App, CompileRequest};
use tempfile::TempDir;

use crate::common::{page_widths, test_config, write_docx, write_pdf, write_png};

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 0.01
}

#[tokio::test]
async fn test_mixed_directory_skips_corrupt_input() {
    let source = TempDir::new().unwrap();
    let folder = source.path().join("Informes");
    std::fs::create_dir(&folder).unwrap();
    let dest = TempDir::new().unwrap();

    std::fs::write(folder.join("a_notas.txt"), "primera linea\nsegunda linea").unwrap();
    write_docx(&folder.join("b_carta.docx"), &["Estimado cliente", "Saludos"]);
    write_png(&folder.join("c_foto.png"), 250, 100);
    std::fs::write(folder.join("d_roto.pdf"), b"%PDF-1.4 garbage").unwrap();

    let app = App::new(test_config(dest.path().to_path_buf())).unwrap();
    let placed = app
        .run(&CompileRequest::Directory(folder.clone()))
        .await
        .unwrap();

    assert_eq!(placed.destination, dest.path().join("Informes_UNIDO.pdf"));
    assert!(placed.destination.is_file());
    assert_eq!(placed.report.total_pages, 3);
    assert_eq!(placed.report.included_count(), 3);
    assert_eq!(placed.report.skipped_count(), 1);
    assert!(matches!(
        placed.report.items[3].outcome,
        ItemOutcome::Skipped { .. }
    ));
    assert_eq!(placed.report.destination.as_ref(), Some(&placed.destination));

    let widths = page_widths(&placed.destination);
    assert_eq!(widths.len(), 3);
    assert!(close(widths[0], A4_WIDTH));
    assert!(close(widths[1], A4_WIDTH));
    assert!(close(widths[2], 180.0));

    // Inputs are left untouched.
    assert!(folder.join("d_roto.pdf").exists());
    assert_eq!(std::fs::read_dir(&folder).unwrap().count(), 4);
}

#[tokio::test]
async fn test_directory_order_follows_names() {
    let source = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();

    write_pdf(&source.path().join("2.pdf"), &[200]);
    write_pdf(&source.path().join("1.pdf"), &[100, 110]);
    write_pdf(&source.path().join("3.pdf"), &[300]);

    let app = App::new(test_config(dest.path().to_path_buf())).unwrap();
    let placed = app
        .run(&CompileRequest::Directory(source.path().to_path_buf()))
        .await
        .unwrap();

    assert_eq!(page_widths(&placed.destination), vec![100.0, 110.0, 200.0, 300.0]);
}

#[tokio::test]
async fn test_rerun_replaces_previous_result() {
    let source = TempDir::new().unwrap();
    let folder = source.path().join("lote");
    std::fs::create_dir(&folder).unwrap();
    let dest = TempDir::new().unwrap();

    write_pdf(&folder.join("a.pdf"), &[100]);
    let app = App::new(test_config(dest.path().to_path_buf())).unwrap();
    let request = CompileRequest::Directory(folder.clone());

    let first = app.run(&request).await.unwrap();
    assert_eq!(first.report.total_pages, 1);

    write_pdf(&folder.join("b.pdf"), &[200, 210]);
    let second = app.run(&request).await.unwrap();

    assert_eq!(first.destination, second.destination);
    assert_eq!(page_widths(&second.destination), vec![100.0, 200.0, 210.0]);
    assert_eq!(std::fs::read_dir(dest.path()).unwrap().count(), 1);
}
