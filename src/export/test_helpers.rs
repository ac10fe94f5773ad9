//! Shared test utilities for comment tests.

use crate::review::{CodeLocation, ReviewComment};

/// Test data constants shared by export tests.
pub mod test_data {
    /// Sample author name.
    pub const SAMPLE_AUTHOR: &str = "alice";
    /// Sample file path.
    pub const SAMPLE_FILE_PATH: &str = "src/main/java/App.java";
    /// Sample review text.
    pub const SAMPLE_TEXT: &str = "Consider extracting a constant here.";
    /// Sample code snippet.
    pub const SAMPLE_SNIPPET: &str = "int retries = 3;\nconnect(retries);";
    /// Sample timestamp with fractional seconds.
    pub const SAMPLE_TIMESTAMP: &str = "2024-03-01T10:15:30.123Z";
}

/// Builder for [`ReviewComment`] values with a fluent API.
///
/// Comments start as general comments by [`test_data::SAMPLE_AUTHOR`] with
/// [`test_data::SAMPLE_TEXT`].
#[must_use]
pub struct CommentBuilder {
    comment: ReviewComment,
}

impl CommentBuilder {
    /// Creates a builder for a comment on the given merge request.
    pub fn new(mr_title: &str, mr_id: u64) -> Self {
        Self {
            comment: ReviewComment {
                mr_title: mr_title.to_owned(),
                mr_id,
                author: test_data::SAMPLE_AUTHOR.to_owned(),
                created_at: test_data::SAMPLE_TIMESTAMP.to_owned(),
                code_snippet: String::new(),
                review_text: test_data::SAMPLE_TEXT.to_owned(),
                location: CodeLocation::General,
                file_path: String::new(),
                line_number: None,
                discussion_id: "discussion".to_owned(),
                note_id: 1,
            },
        }
    }

    /// Places the comment on a line of a file.
    pub fn at(mut self, path: &str, line: u32) -> Self {
        self.comment.location = CodeLocation::Located {
            path: path.to_owned(),
            line,
        };
        self.comment.file_path = path.to_owned();
        self.comment.line_number = Some(line);
        self
    }

    /// Makes the comment a general comment.
    pub fn general(mut self) -> Self {
        self.comment.location = CodeLocation::General;
        self.comment.file_path.clear();
        self.comment.line_number = None;
        self
    }

    /// Sets the code snippet.
    pub fn snippet(mut self, snippet: &str) -> Self {
        self.comment.code_snippet = snippet.to_owned();
        self
    }

    /// Sets the author.
    pub fn author(mut self, author: &str) -> Self {
        self.comment.author = author.to_owned();
        self
    }

    /// Sets the review text.
    pub fn text(mut self, text: &str) -> Self {
        self.comment.review_text = text.to_owned();
        self
    }

    /// Sets the creation timestamp.
    pub fn created_at(mut self, created_at: &str) -> Self {
        self.comment.created_at = created_at.to_owned();
        self
    }

    /// Sets the note id.
    pub const fn note_id(mut self, note_id: u64) -> Self {
        self.comment.note_id = note_id;
        self
    }

    /// Builds the [`ReviewComment`].
    #[must_use]
    pub fn build(self) -> ReviewComment {
        self.comment
    }
}

/// Asserts that `haystack` contains `needle`, returning an error if not.
///
/// # Errors
///
/// Returns a description of the mismatch when `needle` is absent.
pub fn assert_contains(haystack: &str, needle: &str) -> Result<(), String> {
    if haystack.contains(needle) {
        Ok(())
    } else {
        Err(format!(
            "expected output to contain '{needle}', got:\n{haystack}"
        ))
    }
}

/// Asserts that `haystack` does NOT contain `needle`, returning an error if it does.
///
/// # Errors
///
/// Returns a description of the mismatch when `needle` is present.
pub fn assert_not_contains(haystack: &str, needle: &str) -> Result<(), String> {
    if haystack.contains(needle) {
        Err(format!(
            "expected output to NOT contain '{needle}', got:\n{haystack}"
        ))
    } else {
        Ok(())
    }
}
