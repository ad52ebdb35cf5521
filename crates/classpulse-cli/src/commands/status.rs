//! The `classpulse status` command.

use std::path::PathBuf;

use anyhow::Result;

use classpulse_core::engine::{FeedbackEngine, SubmitRequest};
use classpulse_core::ingest;

pub fn execute(
    roster_path: PathBuf,
    submissions_path: Option<PathBuf>,
    roll: String,
) -> Result<()> {
    let engine = FeedbackEngine::new();
    let (rows, _) = ingest::read_roster_csv(&roster_path)?;
    engine.ingest_roster(rows);

    if let Some(path) = submissions_path {
        engine.set_live(true);
        let (submissions, _) = ingest::read_submissions_csv(&path)?;
        for row in submissions {
            // Rejections are expected here; only the end state matters.
            let _ = engine.submit(SubmitRequest {
                roll: row.roll,
                course_code: row.course_code,
                ratings: row.ratings,
                staff: row.staff,
            });
        }
        engine.set_live(false);
    }

    let status = engine.student_status(&roll)?;

    println!("Roll: {roll}");
    println!("Registered: {}", if status.registered { "yes" } else { "no" });
    println!("Attempted:  {}", if status.attempted { "yes" } else { "no" });

    Ok(())
}
