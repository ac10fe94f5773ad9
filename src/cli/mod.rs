//! CLI collaborators.
//!
//! - [`aggregate`]: runs a fetch or offline re-render and records it in a
//!   session
//! - [`export_comments`]: writes an export to a file or stdout
//! - [`output`]: summary, overview table and hierarchical text view

pub mod aggregate;
pub mod export_comments;
pub mod output;
