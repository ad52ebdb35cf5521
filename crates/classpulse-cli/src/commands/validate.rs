//! The `classpulse validate` command.

use std::path::PathBuf;

use anyhow::Result;

use classpulse_core::catalog;
use classpulse_core::engine::FeedbackEngine;
use classpulse_core::ingest;

pub fn execute(roster_path: PathBuf, catalog_path: Option<PathBuf>) -> Result<()> {
    // Roster rows are pushed through a throwaway engine so validation and
    // ingestion agree on what counts as a bad row.
    let engine = FeedbackEngine::new();
    let (rows, read_errors) = ingest::read_roster_csv(&roster_path)?;
    let mut report = engine.ingest_roster(rows);
    report.absorb(read_errors);

    println!(
        "Roster: {} row(s) accepted, {} rejected",
        report.accepted, report.rejected
    );
    for error in &report.errors {
        println!("  WARNING: {error}");
    }

    let mut total_warnings = report.errors.len();

    if let Some(path) = catalog_path {
        let catalog = catalog::parse_catalog(&path)?;
        println!("Catalog: {} course(s)", catalog.courses.len());

        let warnings = catalog::validate_catalog(&catalog);
        for w in &warnings {
            let prefix = w
                .course_code
                .as_ref()
                .map(|code| format!("  [{code}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All inputs valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
