//! classpulse-core — Feedback collection engine, stores, and aggregation.
//!
//! This crate defines the data model, the roster and feedback stores, the
//! event lifecycle flag, the submission engine with its exactly-once
//! invariant, and the on-demand aggregation that turns raw submissions
//! into dashboard summaries.

pub mod aggregate;
pub mod catalog;
pub mod engine;
pub mod error;
pub mod event;
pub mod feedback;
pub mod ingest;
pub mod model;
pub mod roster;
