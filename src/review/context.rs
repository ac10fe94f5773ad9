//! Code context for inline comments.
//!
//! An inline comment is shown with a few surrounding source lines taken from
//! the file at the revision the comment was made against. Failing to obtain
//! them is never fatal: [`CodeContextResolver::snippet`] returns `None` and
//! the caller renders the comment without code.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::gitlab::{MergeRequest, MergeRequestSource, Position};

/// Returns the window of lines around 1-based `anchor`.
///
/// Lines are split on `\n`. The window starts one line before the anchor and
/// ends one line after it, clamped to the file. Returns `None` when the
/// anchor is outside `1..=line_count`.
///
/// # Examples
///
/// ```
/// use mrscribe::review::snippet_window;
///
/// let content = "one\ntwo\nthree\nfour";
/// assert_eq!(snippet_window(content, 2).as_deref(), Some("one\ntwo\nthree"));
/// assert_eq!(snippet_window(content, 1).as_deref(), Some("one\ntwo"));
/// assert_eq!(snippet_window(content, 9), None);
/// ```
#[must_use]
pub fn snippet_window(content: &str, anchor: u32) -> Option<String> {
    let lines: Vec<&str> = content.split('\n').collect();
    let anchor_index = usize::try_from(anchor).ok()?;
    if anchor_index == 0 || anchor_index > lines.len() {
        return None;
    }
    let start = anchor_index.saturating_sub(2);
    let end = lines.len().min(anchor_index + 1);
    let window = lines.get(start..end)?;
    Some(
        window
            .iter()
            .copied()
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .collect::<Vec<_>>()
            .join("\n"),
    )
}

/// Resolves snippets for inline comments, reusing file content per
/// `(path, revision)` for the lifetime of the resolver.
///
/// Failed lookups are remembered too, so a deleted file is requested once.
pub struct CodeContextResolver<'source, Source: ?Sized> {
    source: &'source Source,
    files: HashMap<(String, String), Option<String>>,
    fetches: usize,
}

impl<'source, Source> CodeContextResolver<'source, Source>
where
    Source: MergeRequestSource + ?Sized,
{
    /// Creates a resolver reading files through `source`.
    #[must_use]
    pub fn new(source: &'source Source) -> Self {
        Self {
            source,
            files: HashMap::new(),
            fetches: 0,
        }
    }

    /// Number of file requests issued so far.
    #[must_use]
    pub const fn fetches(&self) -> usize {
        self.fetches
    }

    /// Returns the code around the commented line.
    ///
    /// The file is read at the position's head revision, falling back to the
    /// merge request's head. Returns `None` for general comments, positions
    /// without a new-side path, unknown revisions, failed lookups and anchors
    /// outside the file.
    pub async fn snippet(
        &mut self,
        position: Option<&Position>,
        merge_request: &MergeRequest,
    ) -> Option<String> {
        let pos = position?;
        let path = pos.new_path.as_deref()?;
        let Some(revision) = pos.head_sha.as_deref().or(merge_request.sha.as_deref()) else {
            debug!(iid = merge_request.iid, path, "no revision to read file at");
            return None;
        };
        let anchor = pos.line()?;
        let content = self.file_content(path, revision).await?;
        snippet_window(content, anchor)
    }

    async fn file_content(&mut self, path: &str, revision: &str) -> Option<&str> {
        let key = (path.to_owned(), revision.to_owned());
        if !self.files.contains_key(&key) {
            self.fetches += 1;
            let fetched = match self.source.raw_file(path, revision).await {
                Ok(content) => Some(content),
                Err(error) => {
                    warn!(path, revision, %error, "file content unavailable, snippet skipped");
                    None
                }
            };
            self.files.insert(key.clone(), fetched);
        }
        self.files.get(&key)?.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;
    use rstest::rstest;

    use super::*;
    use crate::gitlab::{IntakeError, MockMergeRequestSource};

    fn ten_lines() -> String {
        (1..=10)
            .map(|n| format!("line {n}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn merge_request(sha: Option<&str>) -> MergeRequest {
        MergeRequest {
            iid: 7,
            title: "Add login".to_owned(),
            sha: sha.map(ToOwned::to_owned),
        }
    }

    fn inline(path: &str, line: u32, head_sha: Option<&str>) -> Position {
        Position {
            new_path: Some(path.to_owned()),
            old_path: Some(path.to_owned()),
            new_line: Some(line),
            old_line: None,
            head_sha: head_sha.map(ToOwned::to_owned),
        }
    }

    #[rstest]
    #[case::middle(5, "line 4\nline 5\nline 6")]
    #[case::first_line(1, "line 1\nline 2")]
    #[case::last_line(10, "line 9\nline 10")]
    fn window_is_clamped_to_the_file(#[case] anchor: u32, #[case] expected: &str) {
        assert_eq!(snippet_window(&ten_lines(), anchor).as_deref(), Some(expected));
    }

    #[rstest]
    #[case(0)]
    #[case(11)]
    fn anchor_outside_file_yields_nothing(#[case] anchor: u32) {
        assert_eq!(snippet_window(&ten_lines(), anchor), None);
    }

    #[rstest]
    fn carriage_returns_are_dropped() {
        assert_eq!(
            snippet_window("a\r\nb\r\nc\r\n", 2).as_deref(),
            Some("a\nb\nc")
        );
    }

    #[tokio::test]
    async fn general_comment_never_fetches() {
        let source = MockMergeRequestSource::new();
        let mut resolver = CodeContextResolver::new(&source);

        let snippet = resolver.snippet(None, &merge_request(Some("abc"))).await;

        assert_eq!(snippet, None);
        assert_eq!(resolver.fetches(), 0);
    }

    #[tokio::test]
    async fn old_side_only_position_never_fetches() {
        let source = MockMergeRequestSource::new();
        let mut resolver = CodeContextResolver::new(&source);
        let removed = Position {
            old_path: Some("src/Gone.java".to_owned()),
            old_line: Some(3),
            ..Position::default()
        };

        let snippet = resolver
            .snippet(Some(&removed), &merge_request(Some("abc")))
            .await;

        assert_eq!(snippet, None);
    }

    #[tokio::test]
    async fn falls_back_to_merge_request_revision() {
        let mut source = MockMergeRequestSource::new();
        source
            .expect_raw_file()
            .with(eq("src/App.java"), eq("mr-head"))
            .times(1)
            .returning(|_, _| Ok(ten_lines()));
        let mut resolver = CodeContextResolver::new(&source);

        let snippet = resolver
            .snippet(
                Some(&inline("src/App.java", 5, None)),
                &merge_request(Some("mr-head")),
            )
            .await;

        assert_eq!(snippet.as_deref(), Some("line 4\nline 5\nline 6"));
    }

    #[tokio::test]
    async fn reuses_content_and_failures_per_path_and_revision() {
        let mut source = MockMergeRequestSource::new();
        source
            .expect_raw_file()
            .with(eq("src/App.java"), eq("c1"))
            .times(1)
            .returning(|_, _| Ok(ten_lines()));
        source
            .expect_raw_file()
            .with(eq("src/Gone.java"), eq("c1"))
            .times(1)
            .returning(|_, _| {
                Err(IntakeError::NotFound {
                    message: "404 File Not Found".to_owned(),
                })
            });
        let mut resolver = CodeContextResolver::new(&source);
        let mr = merge_request(None);

        let first = resolver
            .snippet(Some(&inline("src/App.java", 2, Some("c1"))), &mr)
            .await;
        let second = resolver
            .snippet(Some(&inline("src/App.java", 9, Some("c1"))), &mr)
            .await;
        let missing = resolver
            .snippet(Some(&inline("src/Gone.java", 2, Some("c1"))), &mr)
            .await;
        let missing_again = resolver
            .snippet(Some(&inline("src/Gone.java", 4, Some("c1"))), &mr)
            .await;

        assert_eq!(first.as_deref(), Some("line 1\nline 2\nline 3"));
        assert_eq!(second.as_deref(), Some("line 8\nline 9\nline 10"));
        assert_eq!(missing, None);
        assert_eq!(missing_again, None);
        assert_eq!(resolver.fetches(), 2);
    }

    #[tokio::test]
    async fn unknown_revision_skips_lookup() {
        let source = MockMergeRequestSource::new();
        let mut resolver = CodeContextResolver::new(&source);

        let snippet = resolver
            .snippet(Some(&inline("src/App.java", 1, None)), &merge_request(None))
            .await;

        assert_eq!(snippet, None);
        assert_eq!(resolver.fetches(), 0);
    }
}
