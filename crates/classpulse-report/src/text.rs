//! Flat text export of raw feedback records.
//!
//! One block per record with the roll, the course, and the 15 raw
//! ratings. The downloadable summary deliberately lists raw records
//! rather than the aggregate.

use std::path::Path;

use anyhow::Result;

use classpulse_core::engine::ExportRow;

/// Render the flat listing.
pub fn generate_export(rows: &[ExportRow]) -> String {
    let mut out = String::from("Feedback Summary\n");

    for row in rows {
        out.push_str(&format!(
            "Roll: {}  Course: {}\n",
            row.roll, row.course_code
        ));
        let ratings: Vec<String> = row
            .ratings
            .as_slice()
            .iter()
            .map(|r| r.to_string())
            .collect();
        out.push_str(&format!("Ratings: {}\n", ratings.join(", ")));
    }

    if rows.is_empty() {
        out.push_str("No feedback records.\n");
    }
    out
}

/// Write the flat listing to a file.
pub fn write_export(rows: &[ExportRow], path: &Path) -> Result<()> {
    let content = generate_export(rows);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}
