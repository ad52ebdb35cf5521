//! HTML dashboard generator.
//!
//! Produces a self-contained HTML page with all CSS inlined: attendance
//! header, one averages table per course with a row per staff member, and
//! the list of students who have not submitted.

use std::path::Path;

use anyhow::Result;

use classpulse_core::aggregate::DashboardSnapshot;
use classpulse_core::catalog::CourseCatalog;
use classpulse_core::model::QUESTION_COUNT;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate the dashboard HTML from a snapshot. The catalog, when given,
/// supplies course titles; otherwise codes are shown bare.
pub fn generate_dashboard(snapshot: &DashboardSnapshot, catalog: Option<&CourseCatalog>) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str("<title>classpulse dashboard</title>\n");
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>Feedback dashboard</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Attendance: <strong>{:.2}%</strong> | {} course(s) | generated {}</p>\n",
        snapshot.attendance_percentage,
        snapshot.summary.len(),
        snapshot.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Per-course averages. Sorted so the page is stable across runs.
    html.push_str("<section class=\"summary\">\n");
    html.push_str("<h2>Course averages</h2>\n");

    let mut course_codes: Vec<&String> = snapshot.summary.keys().collect();
    course_codes.sort();

    for course_code in course_codes {
        let title = catalog
            .map(|c| c.title_for(course_code))
            .unwrap_or(course_code);
        html.push_str(&format!(
            "<h3>{} <span class=\"code\">({})</span></h3>\n",
            html_escape(title),
            html_escape(course_code)
        ));

        html.push_str("<table>\n<thead><tr><th>Staff</th><th>Responses</th>");
        for q in 1..=QUESTION_COUNT {
            html.push_str(&format!("<th>Q{q}</th>"));
        }
        html.push_str("</tr></thead>\n<tbody>\n");

        let per_course = &snapshot.summary[course_code];
        let mut staff_names: Vec<&String> = per_course.keys().collect();
        staff_names.sort();

        for staff in staff_names {
            let cell = &per_course[staff];
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td>",
                html_escape(staff),
                cell.count
            ));
            for avg in &cell.avg_ratings {
                html.push_str(&format!("<td>{avg:.2}</td>"));
            }
            html.push_str("</tr>\n");
        }
        html.push_str("</tbody></table>\n");
    }

    if snapshot.summary.is_empty() {
        html.push_str("<p class=\"meta\">No feedback has been submitted yet.</p>\n");
    }
    html.push_str("</section>\n");

    // Students yet to submit
    html.push_str("<section class=\"pending\">\n");
    html.push_str("<h2>Not yet submitted</h2>\n");
    if snapshot.not_attempted.is_empty() {
        html.push_str("<p class=\"meta\">Every registered student has submitted.</p>\n");
    } else {
        let mut pending = snapshot.not_attempted.clone();
        pending.sort();
        html.push_str("<ul>\n");
        for roll in &pending {
            html.push_str(&format!("<li>{}</li>\n", html_escape(roll.as_str())));
        }
        html.push_str("</ul>\n");
    }
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(
        &serde_json::to_string_pretty(snapshot)
            .unwrap_or_default()
            .replace('<', "&lt;")
            .replace('>', "&gt;"),
    );
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write the dashboard HTML to a file.
pub fn write_dashboard(
    snapshot: &DashboardSnapshot,
    catalog: Option<&CourseCatalog>,
    path: &Path,
) -> Result<()> {
    let html = generate_dashboard(snapshot, catalog);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
.code { color: #6b7280; font-weight: normal; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.4rem 0.6rem; text-align: left; }
th { background: rgba(107, 114, 128, 0.1); }
pre { overflow-x: auto; background: rgba(107, 114, 128, 0.1); padding: 1rem; border-radius: 6px; }
"#;
