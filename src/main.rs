//! pdfcompile - Compile mixed documents into a single compressed PDF.

mod cli;

use clap::Parser;
use std::process;

use crate::cli::Cli;
use pdfcompile::output::{OutputFormatter, display_report, report_json};
use pdfcompile::{App, CompileError};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .format_timestamp(None)
        .init();

    if let Err(err) = run(cli).await {
        OutputFormatter::default().error(&format!("Error: {err}"));
        process::exit(err.exit_code());
    }
}

/// Main application logic.
async fn run(cli: Cli) -> Result<(), CompileError> {
    let config = cli.to_config()?;
    let formatter = OutputFormatter::from_config(&config);
    let app = App::new(config)?;

    let Some(request) = cli.to_request()? else {
        let help = &app.config().help_document;
        formatter.info(&format!("Opening {}", help.display()));
        if !app.open_help().await? {
            formatter.warning("Could not open the help document");
        }
        return Ok(());
    };

    formatter.section(&format!("{} v{}", pdfcompile::NAME, pdfcompile::VERSION));
    formatter.info(&format!("Compiling {}", request.describe()));

    let placed = app.run(&request).await?;

    if app.config().json {
        let json = report_json(&placed.report).map_err(|e| CompileError::other(e.to_string()))?;
        println!("{json}");
    } else {
        display_report(&formatter, &placed.report);
    }

    Ok(())
}
