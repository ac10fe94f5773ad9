//! Two-level grouping of comments: merge request, then code location.
//!
//! Both levels keep first-seen order. Every input comment lands in exactly one
//! bucket, so the bucket sizes always add up to the input length.

use std::collections::HashMap;

use super::comment::ReviewComment;
use super::location::CodeLocation;

/// Comments grouped by merge request title, then by code location.
#[derive(Debug, Clone, Default)]
pub struct GroupedComments<'a> {
    groups: Vec<MergeRequestGroup<'a>>,
    index: HashMap<&'a str, usize>,
}

/// Comments of one merge request, bucketed by location.
#[derive(Debug, Clone)]
pub struct MergeRequestGroup<'a> {
    title: &'a str,
    mr_id: u64,
    locations: Vec<LocationGroup<'a>>,
    index: HashMap<&'a CodeLocation, usize>,
}

/// Comments sharing one code location.
#[derive(Debug, Clone)]
pub struct LocationGroup<'a> {
    location: &'a CodeLocation,
    comments: Vec<&'a ReviewComment>,
}

impl<'a> GroupedComments<'a> {
    /// Groups `comments` in a single pass.
    #[must_use]
    pub fn from_comments(comments: &'a [ReviewComment]) -> Self {
        let mut grouped = Self::default();
        for comment in comments {
            grouped.insert(comment);
        }
        grouped
    }

    fn insert(&mut self, comment: &'a ReviewComment) {
        let title = comment.mr_title.as_str();
        if let Some(group) = self
            .index
            .get(title)
            .and_then(|slot| self.groups.get_mut(*slot))
        {
            group.insert(comment);
            return;
        }
        let mut group = MergeRequestGroup::new(title, comment.mr_id);
        group.insert(comment);
        self.index.insert(title, self.groups.len());
        self.groups.push(group);
    }

    /// Merge request groups in first-seen order.
    #[must_use]
    pub fn merge_requests(&self) -> &[MergeRequestGroup<'a>] {
        &self.groups
    }

    /// Looks up the group for a merge request title.
    #[must_use]
    pub fn get(&self, title: &str) -> Option<&MergeRequestGroup<'a>> {
        self.index.get(title).and_then(|slot| self.groups.get(*slot))
    }

    /// Number of distinct merge requests.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns true when there are no comments at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of comments across every bucket.
    #[must_use]
    pub fn total_comments(&self) -> usize {
        self.groups.iter().map(MergeRequestGroup::total_comments).sum()
    }
}

impl<'a> MergeRequestGroup<'a> {
    fn new(title: &'a str, mr_id: u64) -> Self {
        Self {
            title,
            mr_id,
            locations: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn insert(&mut self, comment: &'a ReviewComment) {
        let location = &comment.location;
        if let Some(bucket) = self
            .index
            .get(location)
            .and_then(|slot| self.locations.get_mut(*slot))
        {
            bucket.comments.push(comment);
            return;
        }
        self.index.insert(location, self.locations.len());
        self.locations.push(LocationGroup {
            location,
            comments: vec![comment],
        });
    }

    /// Merge request title.
    #[must_use]
    pub const fn title(&self) -> &'a str {
        self.title
    }

    /// Merge request id taken from the first comment of the group.
    #[must_use]
    pub const fn mr_id(&self) -> u64 {
        self.mr_id
    }

    /// Location buckets in first-seen order.
    #[must_use]
    pub fn locations(&self) -> &[LocationGroup<'a>] {
        &self.locations
    }

    /// Comments across every location of this merge request.
    #[must_use]
    pub fn total_comments(&self) -> usize {
        self.locations.iter().map(|bucket| bucket.comments.len()).sum()
    }

    /// Number of distinct code locations, not counting general comments.
    #[must_use]
    pub fn code_location_count(&self) -> usize {
        self.locations
            .iter()
            .filter(|bucket| !bucket.location.is_general())
            .count()
    }

    /// Number of general comments.
    #[must_use]
    pub fn general_comment_count(&self) -> usize {
        self.index
            .get(&CodeLocation::General)
            .and_then(|slot| self.locations.get(*slot))
            .map_or(0, |bucket| bucket.comments.len())
    }
}

impl<'a> LocationGroup<'a> {
    /// Shared location of the bucket.
    #[must_use]
    pub const fn location(&self) -> &'a CodeLocation {
        self.location
    }

    /// Comments in discovery order.
    #[must_use]
    pub fn comments(&self) -> &[&'a ReviewComment] {
        &self.comments
    }

    /// Snippet shown for the bucket: the first comment's, when non-empty.
    ///
    /// General buckets never have one.
    #[must_use]
    pub fn snippet(&self) -> Option<&'a str> {
        if self.location.is_general() {
            return None;
        }
        self.comments
            .first()
            .copied()
            .filter(|comment| comment.has_snippet())
            .map(|comment| comment.code_snippet.as_str())
    }
}
