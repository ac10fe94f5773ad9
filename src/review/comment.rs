//! The normalized review comment record.

use serde::{Deserialize, Serialize};

use super::location::CodeLocation;

/// One review comment, detached from the API objects it was built from.
///
/// Every field needed by grouping and export is carried by value, so a saved
/// collection can be rendered again without network access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewComment {
    /// Title of the owning merge request.
    pub mr_title: String,
    /// Merge request number within the project.
    pub mr_id: u64,
    /// Display name of the author.
    pub author: String,
    /// Creation timestamp as reported by GitLab.
    pub created_at: String,
    /// Source lines around the commented line; empty when unavailable.
    pub code_snippet: String,
    /// Trimmed comment body.
    pub review_text: String,
    /// Grouping key for the comment.
    pub location: CodeLocation,
    /// File path from the diff position; empty for general comments.
    pub file_path: String,
    /// Line number from the diff position.
    pub line_number: Option<u32>,
    /// Identifier of the discussion thread.
    pub discussion_id: String,
    /// Identifier of the note.
    pub note_id: u64,
}

impl ReviewComment {
    /// Returns true when the comment has a non-empty code snippet.
    #[must_use]
    pub const fn has_snippet(&self) -> bool {
        !self.code_snippet.is_empty()
    }
}
