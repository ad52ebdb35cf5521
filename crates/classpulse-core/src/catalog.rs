//! TOML course catalog parser.
//!
//! The catalog lists the courses offered during an event and the staff
//! teaching each of them. It drives course selection and report labels;
//! the submission engine itself does not consult it, so whatever staff
//! value was posted is stored as-is.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// One course offered during the event.
#[derive(Debug, Clone, Deserialize)]
pub struct Course {
    /// Course code, e.g. "CSE101". Keys the aggregation summary.
    pub code: String,
    /// Human-readable title.
    #[serde(default)]
    pub title: String,
    /// Staff teaching this course, selectable on the feedback form.
    #[serde(default)]
    pub staff: Vec<String>,
}

/// The full catalog for one event.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseCatalog {
    #[serde(default)]
    pub courses: Vec<Course>,
}

impl CourseCatalog {
    pub fn course(&self, code: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.code == code)
    }

    /// Title for a course code, falling back to the code itself.
    pub fn title_for<'a>(&'a self, code: &'a str) -> &'a str {
        self.course(code)
            .filter(|c| !c.title.is_empty())
            .map(|c| c.title.as_str())
            .unwrap_or(code)
    }
}

/// Parse a catalog TOML file.
pub fn parse_catalog(path: &Path) -> Result<CourseCatalog> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog file: {}", path.display()))?;
    parse_catalog_str(&content, path)
}

/// Parse a catalog TOML string (useful for testing).
pub fn parse_catalog_str(content: &str, source_path: &Path) -> Result<CourseCatalog> {
    let catalog: CourseCatalog = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;
    Ok(catalog)
}

/// A warning from catalog validation.
#[derive(Debug, Clone)]
pub struct CatalogWarning {
    /// Course code the warning applies to, if any.
    pub course_code: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a catalog for common issues.
pub fn validate_catalog(catalog: &CourseCatalog) -> Vec<CatalogWarning> {
    let mut warnings = Vec::new();

    if catalog.courses.is_empty() {
        warnings.push(CatalogWarning {
            course_code: None,
            message: "catalog defines no courses".into(),
        });
    }

    let mut seen_codes = std::collections::HashSet::new();
    for course in &catalog.courses {
        if !seen_codes.insert(&course.code) {
            warnings.push(CatalogWarning {
                course_code: Some(course.code.clone()),
                message: format!("duplicate course code: {}", course.code),
            });
        }
    }

    for course in &catalog.courses {
        if course.code.trim().is_empty() {
            warnings.push(CatalogWarning {
                course_code: None,
                message: "course with empty code".into(),
            });
        }
        if course.staff.is_empty() {
            warnings.push(CatalogWarning {
                course_code: Some(course.code.clone()),
                message: "no staff listed; feedback cannot name anyone".into(),
            });
        }
    }

    warnings
}
