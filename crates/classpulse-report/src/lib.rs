//! classpulse-report — Dashboard HTML and flat text export generation.

pub mod html;
pub mod text;
