//! The `classpulse run` command.
//!
//! Drives one full collection session: ingest the roster, open the event,
//! replay submissions from CSV, close the event, then print and write the
//! dashboard.

use std::path::PathBuf;

use anyhow::{Context, Result};

use classpulse_core::catalog::{self, CourseCatalog};
use classpulse_core::engine::{FeedbackEngine, SubmitRequest};
use classpulse_core::ingest;
use classpulse_report::html::write_dashboard;
use classpulse_report::text::write_export;

pub fn execute(
    roster_path: PathBuf,
    submissions_path: PathBuf,
    catalog_path: Option<PathBuf>,
    output: PathBuf,
    format: String,
) -> Result<()> {
    let catalog: Option<CourseCatalog> = catalog_path
        .as_deref()
        .map(catalog::parse_catalog)
        .transpose()?;

    let engine = FeedbackEngine::new();

    // Roster ingestion: per-row failures are reported, never fatal.
    let (rows, read_errors) = ingest::read_roster_csv(&roster_path)?;
    let mut report = engine.ingest_roster(rows);
    report.absorb(read_errors);
    for error in &report.errors {
        tracing::warn!(%error, "roster row rejected");
    }
    eprintln!(
        "Roster: {} accepted, {} rejected",
        report.accepted, report.rejected
    );

    // Replay the submissions inside a live event window.
    engine.set_live(true);
    let (submissions, submission_errors) = ingest::read_submissions_csv(&submissions_path)?;
    for error in &submission_errors {
        tracing::warn!(%error, "submission row unreadable");
    }

    let mut accepted = 0usize;
    let mut rejected = submission_errors.len();
    for row in submissions {
        let result = engine.submit(SubmitRequest {
            roll: row.roll.clone(),
            course_code: row.course_code,
            ratings: row.ratings,
            staff: row.staff,
        });
        match result {
            Ok(()) => accepted += 1,
            Err(e) => {
                rejected += 1;
                tracing::warn!(roll = %row.roll, line = row.line, error = %e, "submission rejected");
            }
        }
    }
    engine.set_live(false);
    eprintln!("Submissions: {accepted} accepted, {rejected} rejected");

    let snapshot = engine.snapshot();
    print_dashboard(&snapshot, catalog.as_ref());

    if format != "table" {
        std::fs::create_dir_all(&output)
            .with_context(|| format!("failed to create output directory {}", output.display()))?;
        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");

        let formats: Vec<&str> = if format == "all" {
            vec!["json", "html", "text"]
        } else {
            format.split(',').map(str::trim).collect()
        };

        for fmt in &formats {
            match *fmt {
                "table" => {}
                "json" => {
                    let path = output.join(format!("snapshot-{timestamp}.json"));
                    snapshot.save_json(&path)?;
                    eprintln!("Snapshot saved to: {}", path.display());
                }
                "html" => {
                    let path = output.join(format!("dashboard-{timestamp}.html"));
                    write_dashboard(&snapshot, catalog.as_ref(), &path)?;
                    eprintln!("HTML dashboard: {}", path.display());
                }
                "text" => {
                    let path = output.join(format!("feedback-{timestamp}.txt"));
                    write_export(&engine.export_rows(), &path)?;
                    eprintln!("Text export: {}", path.display());
                }
                _ => {
                    eprintln!("Unknown format: {fmt}");
                }
            }
        }
    }

    Ok(())
}

fn print_dashboard(
    snapshot: &classpulse_core::aggregate::DashboardSnapshot,
    catalog: Option<&CourseCatalog>,
) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["Course", "Staff", "Responses", "Avg (Q1-Q15)"]);

    let mut course_codes: Vec<&String> = snapshot.summary.keys().collect();
    course_codes.sort();

    for course_code in course_codes {
        let per_course = &snapshot.summary[course_code];
        let mut staff_names: Vec<&String> = per_course.keys().collect();
        staff_names.sort();

        let label = catalog
            .map(|c| c.title_for(course_code))
            .unwrap_or(course_code);

        for staff in staff_names {
            let cell = &per_course[staff];
            let averages: Vec<String> =
                cell.avg_ratings.iter().map(|a| format!("{a:.2}")).collect();
            table.add_row(vec![
                Cell::new(label),
                Cell::new(staff),
                Cell::new(cell.count),
                Cell::new(averages.join(" ")),
            ]);
        }
    }

    eprintln!("\n{table}");
    println!(
        "Attendance: {:.2}% ({} yet to submit)",
        snapshot.attendance_percentage,
        snapshot.not_attempted.len()
    );
}
