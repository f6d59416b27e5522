//! Note routing logic for togglenote.
//!
//! This crate ties the Notion client into the background workflow run for
//! each accepted note: find the toggle section ([`locator`]), then append the
//! note's fragments to it one by one ([`appender`]). The [`classifier`] picks
//! a target list per fragment in "Use AI" mode.

pub mod appender;
pub mod classifier;
pub mod locator;
pub mod pipeline;

#[cfg(test)]
mod fake;

pub use appender::{AppendFailure, AppendReport, append_all};
pub use classifier::{ChatClassifier, NoteClassifier};
pub use locator::locate;
pub use pipeline::{JobSummary, NoteJob, NoteTarget, USE_AI, process_notes, run_job};
