//! Turns raw discussion notes into [`ReviewComment`] records.

use crate::gitlab::{Discussion, MergeRequest, MergeRequestSource, Note, Position};

use super::comment::ReviewComment;
use super::context::CodeContextResolver;
use super::location::CodeLocation;

/// Normalizes notes of one run, sharing a [`CodeContextResolver`].
pub struct CommentNormalizer<'source, Source: ?Sized> {
    resolver: CodeContextResolver<'source, Source>,
}

impl<'source, Source> CommentNormalizer<'source, Source>
where
    Source: MergeRequestSource + ?Sized,
{
    /// Creates a normalizer reading code context through `source`.
    #[must_use]
    pub fn new(source: &'source Source) -> Self {
        Self {
            resolver: CodeContextResolver::new(source),
        }
    }

    /// Normalizes a single note.
    ///
    /// System notes yield `None`. Every other note yields a comment, with an
    /// empty snippet when no code context could be resolved.
    pub async fn normalize(
        &mut self,
        merge_request: &MergeRequest,
        discussion_id: &str,
        note: &Note,
    ) -> Option<ReviewComment> {
        if note.system {
            return None;
        }
        let position = note.position.as_ref();
        let code_snippet = self
            .resolver
            .snippet(position, merge_request)
            .await
            .unwrap_or_default();

        Some(ReviewComment {
            mr_title: merge_request.title.clone(),
            mr_id: merge_request.iid,
            author: note.author.clone(),
            created_at: note.created_at.clone(),
            code_snippet: code_snippet.trim().to_owned(),
            review_text: note.body.trim().to_owned(),
            location: CodeLocation::from_position(position),
            file_path: position
                .and_then(|pos| pos.file_path())
                .unwrap_or_default()
                .to_owned(),
            line_number: position.and_then(Position::line),
            discussion_id: discussion_id.to_owned(),
            note_id: note.id,
        })
    }

    /// Normalizes every note of a discussion in thread order.
    pub async fn normalize_discussion(
        &mut self,
        merge_request: &MergeRequest,
        discussion: &Discussion,
    ) -> Vec<ReviewComment> {
        let mut comments = Vec::with_capacity(discussion.notes.len());
        for note in &discussion.notes {
            if let Some(comment) = self.normalize(merge_request, &discussion.id, note).await {
                comments.push(comment);
            }
        }
        comments
    }

    /// Number of file requests issued for code context.
    #[must_use]
    pub const fn file_fetches(&self) -> usize {
        self.resolver.fetches()
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;
    use crate::gitlab::MockMergeRequestSource;

    #[fixture]
    fn merge_request() -> MergeRequest {
        MergeRequest {
            iid: 12,
            title: "Harden session handling".to_owned(),
            sha: Some("head".to_owned()),
        }
    }

    fn note(id: u64, body: &str, position: Option<Position>) -> Note {
        Note {
            id,
            author: "Alice".to_owned(),
            body: body.to_owned(),
            created_at: "2024-03-01T10:15:30Z".to_owned(),
            system: false,
            position,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn system_notes_are_dropped(merge_request: MergeRequest) {
        let source = MockMergeRequestSource::new();
        let mut normalizer = CommentNormalizer::new(&source);
        let system = Note {
            system: true,
            ..note(1, "added 1 commit", None)
        };

        assert_eq!(normalizer.normalize(&merge_request, "d1", &system).await, None);
        assert_eq!(normalizer.file_fetches(), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn general_note_has_no_location_or_snippet(merge_request: MergeRequest) {
        let source = MockMergeRequestSource::new();
        let mut normalizer = CommentNormalizer::new(&source);

        let comment = normalizer
            .normalize(&merge_request, "d1", &note(4, "  Looks good overall \n", None))
            .await
            .expect("non-system note should produce a comment");

        assert_eq!(comment.location, CodeLocation::General);
        assert_eq!(comment.code_snippet, "");
        assert_eq!(comment.file_path, "");
        assert_eq!(comment.line_number, None);
        assert_eq!(comment.review_text, "Looks good overall");
        assert_eq!(comment.mr_title, "Harden session handling");
        assert_eq!(comment.mr_id, 12);
        assert_eq!(comment.note_id, 4);
    }

    #[rstest]
    #[tokio::test]
    async fn inline_note_keeps_comment_when_file_lookup_fails(merge_request: MergeRequest) {
        let mut source = MockMergeRequestSource::new();
        source.expect_raw_file().times(1).returning(|_, _| {
            Err(crate::gitlab::IntakeError::Network {
                message: "connection reset".to_owned(),
            })
        });
        let mut normalizer = CommentNormalizer::new(&source);
        let position = Position {
            new_path: Some("src/Session.java".to_owned()),
            new_line: Some(40),
            ..Position::default()
        };

        let comment = normalizer
            .normalize(&merge_request, "d2", &note(5, "Null check?", Some(position)))
            .await
            .expect("non-system note should produce a comment");

        assert_eq!(comment.code_snippet, "");
        assert_eq!(comment.location.key(), "src/Session.java:40");
        assert_eq!(comment.file_path, "src/Session.java");
        assert_eq!(comment.line_number, Some(40));
    }

    #[rstest]
    #[tokio::test]
    async fn discussion_keeps_thread_order_and_skips_system_notes(merge_request: MergeRequest) {
        let source = MockMergeRequestSource::new();
        let mut normalizer = CommentNormalizer::new(&source);
        let discussion = Discussion {
            id: "abc".to_owned(),
            notes: vec![
                note(1, "first", None),
                Note {
                    system: true,
                    ..note(2, "resolved all threads", None)
                },
                note(3, "reply", None),
            ],
        };

        let comments = normalizer
            .normalize_discussion(&merge_request, &discussion)
            .await;

        let ids: Vec<u64> = comments.iter().map(|comment| comment.note_id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(comments.iter().all(|comment| comment.discussion_id == "abc"));
    }
}
