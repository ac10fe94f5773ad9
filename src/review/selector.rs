//! Chooses which merge requests a run processes.

use tracing::{info, warn};

use crate::gitlab::{IntakeError, MergeRequest, MergeRequestIid, MergeRequestSource};

/// How merge requests are selected for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeRequestSelection {
    /// Every merge request carrying the label, in any state.
    Labelled(String),
    /// The given merge requests, in the given order.
    Explicit(Vec<MergeRequestIid>),
}

impl MergeRequestSelection {
    /// Explicit mode when `ids` is non-empty, label mode otherwise.
    #[must_use]
    pub fn from_ids_or_label(ids: Vec<MergeRequestIid>, label: &str) -> Self {
        if ids.is_empty() {
            Self::Labelled(label.to_owned())
        } else {
            Self::Explicit(ids)
        }
    }
}

/// An explicitly requested merge request that could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedMergeRequest {
    /// The requested merge request.
    pub iid: MergeRequestIid,
    /// Why it could not be fetched.
    pub error: IntakeError,
}

/// Outcome of selecting merge requests.
///
/// An empty `merge_requests` list means there is nothing to process; it is
/// not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectedMergeRequests {
    /// Merge requests to process, in selection order.
    pub merge_requests: Vec<MergeRequest>,
    /// Explicit ids that failed to load.
    pub skipped: Vec<SkippedMergeRequest>,
    /// Failure that cut the labelled listing short.
    pub listing_interruption: Option<IntakeError>,
}

/// Resolves `selection` into merge requests.
///
/// In label mode a failed listing page keeps the merge requests already
/// listed. In explicit mode each id is fetched on its own and failures are
/// skipped, so the result is the successfully fetched subsequence of the
/// requested ids.
pub async fn select_merge_requests<Source>(
    source: &Source,
    selection: &MergeRequestSelection,
) -> SelectedMergeRequests
where
    Source: MergeRequestSource + ?Sized,
{
    match selection {
        MergeRequestSelection::Labelled(label) => {
            let listed = source.labelled_merge_requests(label).await;
            if let Some(error) = &listed.interruption {
                warn!(
                    label = label.as_str(),
                    kept = listed.items.len(),
                    %error,
                    "merge request listing interrupted, continuing with partial list"
                );
            }
            info!(
                label = label.as_str(),
                count = listed.items.len(),
                "selected labelled merge requests"
            );
            SelectedMergeRequests {
                merge_requests: listed.items,
                skipped: Vec::new(),
                listing_interruption: listed.interruption,
            }
        }
        MergeRequestSelection::Explicit(ids) => {
            let mut selected = SelectedMergeRequests::default();
            for iid in ids {
                match source.merge_request(*iid).await {
                    Ok(merge_request) => selected.merge_requests.push(merge_request),
                    Err(error) => {
                        warn!(iid = iid.get(), %error, "merge request skipped");
                        selected.skipped.push(SkippedMergeRequest { iid: *iid, error });
                    }
                }
            }
            info!(
                requested = ids.len(),
                fetched = selected.merge_requests.len(),
                "selected explicit merge requests"
            );
            selected
        }
    }
}
