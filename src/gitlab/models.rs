//! Data models for merge requests, discussions and notes.
//!
//! The `Api*` structs mirror the GitLab v4 JSON payloads and stay private to
//! the GitLab layer; the public structs are the shapes the rest of the crate
//! works with.

use serde::{Deserialize, Deserializer};

/// Merge request metadata needed by the aggregation pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRequest {
    /// Merge request number within the project.
    pub iid: u64,
    /// Title of the merge request.
    pub title: String,
    /// Head revision of the source branch, when GitLab reports one.
    pub sha: Option<String>,
}

/// A thread of notes attached to one inline or general comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discussion {
    /// Discussion identifier (GitLab uses a hex string).
    pub id: String,
    /// Notes in thread order.
    pub notes: Vec<Note>,
}

/// A single note inside a discussion.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Note {
    /// Note identifier.
    pub id: u64,
    /// Display name of the author.
    pub author: String,
    /// Markdown body.
    pub body: String,
    /// Creation timestamp as reported by GitLab (RFC 3339).
    pub created_at: String,
    /// True for notes GitLab generates itself ("changed the description").
    pub system: bool,
    /// Diff position for inline comments; absent for general comments.
    pub position: Option<Position>,
}

/// Location of an inline comment in the merge request diff.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Position {
    /// Path on the new side of the diff.
    pub new_path: Option<String>,
    /// Path on the old side of the diff.
    pub old_path: Option<String>,
    /// Line on the new side of the diff.
    pub new_line: Option<u32>,
    /// Line on the old side of the diff.
    pub old_line: Option<u32>,
    /// Head revision the comment was made against.
    pub head_sha: Option<String>,
}

impl Position {
    /// Path used to place the comment: the new path, else the old path.
    #[must_use]
    pub fn file_path(&self) -> Option<&str> {
        self.new_path.as_deref().or(self.old_path.as_deref())
    }

    /// Line used to place the comment: the new line, else the old line.
    #[must_use]
    pub fn line(&self) -> Option<u32> {
        self.new_line.or(self.old_line)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiMergeRequest {
    pub(crate) iid: u64,
    #[serde(default)]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) sha: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiDiscussion {
    #[serde(deserialize_with = "string_or_number")]
    pub(crate) id: String,
    #[serde(default)]
    pub(crate) notes: Vec<ApiNote>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiNote {
    pub(crate) id: u64,
    #[serde(default)]
    pub(crate) body: Option<String>,
    #[serde(default)]
    pub(crate) author: Option<ApiAuthor>,
    #[serde(default)]
    pub(crate) created_at: Option<String>,
    #[serde(default)]
    pub(crate) system: bool,
    #[serde(default)]
    pub(crate) position: Option<ApiPosition>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiAuthor {
    #[serde(default)]
    pub(crate) name: Option<String>,
    #[serde(default)]
    pub(crate) username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiPosition {
    #[serde(default)]
    pub(crate) new_path: Option<String>,
    #[serde(default)]
    pub(crate) old_path: Option<String>,
    #[serde(default)]
    pub(crate) new_line: Option<u32>,
    #[serde(default)]
    pub(crate) old_line: Option<u32>,
    #[serde(default)]
    pub(crate) head_sha: Option<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}

/// Treats empty strings the same as missing values.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.is_empty())
}

impl From<ApiMergeRequest> for MergeRequest {
    fn from(value: ApiMergeRequest) -> Self {
        Self {
            iid: value.iid,
            title: value.title.unwrap_or_default(),
            sha: non_empty(value.sha),
        }
    }
}

impl From<ApiDiscussion> for Discussion {
    fn from(value: ApiDiscussion) -> Self {
        Self {
            id: value.id,
            notes: value.notes.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<ApiNote> for Note {
    fn from(value: ApiNote) -> Self {
        let author = value
            .author
            .and_then(|author| non_empty(author.name).or_else(|| non_empty(author.username)))
            .unwrap_or_else(|| "unknown".to_owned());
        Self {
            id: value.id,
            author,
            body: value.body.unwrap_or_default(),
            created_at: value.created_at.unwrap_or_default(),
            system: value.system,
            position: value.position.map(Into::into),
        }
    }
}

impl From<ApiPosition> for Position {
    fn from(value: ApiPosition) -> Self {
        Self {
            new_path: non_empty(value.new_path),
            old_path: non_empty(value.old_path),
            new_line: value.new_line.filter(|line| *line > 0),
            old_line: value.old_line.filter(|line| *line > 0),
            head_sha: non_empty(value.head_sha),
        }
    }
}
