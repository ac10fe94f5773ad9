//! Code location of a review comment.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::gitlab::Position;

/// Key used when a comment has no usable file position.
pub const GENERAL_KEY: &str = "general";

/// Where in the code a comment points.
///
/// A comment is [`CodeLocation::Located`] only when both a path and a line
/// can be derived from its diff position; anything else is
/// [`CodeLocation::General`]. Two comments with the same path and line always
/// compare equal, which is what grouping relies on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CodeLocation {
    /// A specific line of a file.
    Located {
        /// File path (new side preferred).
        path: String,
        /// 1-based line number (new side preferred).
        line: u32,
    },
    /// Not attached to a line of code.
    General,
}

impl CodeLocation {
    /// Derives the location from an optional diff position.
    ///
    /// The path is `new_path`, else `old_path`; the line is `new_line`, else
    /// `old_line`.
    #[must_use]
    pub fn from_position(position: Option<&Position>) -> Self {
        let Some(pos) = position else {
            return Self::General;
        };
        match (pos.file_path(), pos.line()) {
            (Some(path), Some(line)) => Self::Located {
                path: path.to_owned(),
                line,
            },
            _ => Self::General,
        }
    }

    /// Returns true for [`CodeLocation::General`].
    #[must_use]
    pub const fn is_general(&self) -> bool {
        matches!(self, Self::General)
    }

    /// String form: `path:line`, or `general`.
    #[must_use]
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CodeLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Located { path, line } => write!(f, "{path}:{line}"),
            Self::General => f.write_str(GENERAL_KEY),
        }
    }
}
