//! Explicit per-stage results and the per-candidate lifecycle.

use std::fmt;
use std::future::Future;
use std::time::Duration;

/// Result of one enrichment stage for one candidate.
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutcome<T> {
    /// The stage produced data.
    Found(T),
    /// The stage ran, or was skipped, and there was nothing to report.
    Empty,
    /// The stage failed; the reason is kept for logging only.
    Failed(String),
}

impl<T> StageOutcome<T> {
    /// The data, if any. `Empty` and `Failed` both leave the field absent.
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::Empty | Self::Failed(_) => None,
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Found(_) => "found",
            Self::Empty => "empty",
            Self::Failed(_) => "failed",
        }
    }

    /// `Ok` is `Found`, `Err` is `Failed`.
    pub fn from_result<E: fmt::Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Found(value),
            Err(e) => Self::Failed(e.to_string()),
        }
    }

    /// Like [`StageOutcome::from_result`], with `Ok(None)` as `Empty`.
    pub fn from_lookup<E: fmt::Display>(result: Result<Option<T>, E>) -> Self {
        match result {
            Ok(Some(value)) => Self::Found(value),
            Ok(None) => Self::Empty,
            Err(e) => Self::Failed(e.to_string()),
        }
    }

    /// Run `stage` under `limit`, converting its result with `convert`; an
    /// elapsed timer becomes `Failed`.
    pub async fn within<F, R>(limit: Duration, stage: F, convert: impl FnOnce(R) -> Self) -> Self
    where
        F: Future<Output = R>,
    {
        match tokio::time::timeout(limit, stage).await {
            Ok(result) => convert(result),
            Err(_) => Self::Failed(format!("timed out after {limit:?}")),
        }
    }
}

/// Where a candidate is in its pass through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateState {
    Discovered,
    WebsiteEnriching,
    SocialEnriching,
    Merged,
    Graded,
    Analyzed,
    Final,
}

impl fmt::Display for CandidateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Discovered => "discovered",
            Self::WebsiteEnriching => "website_enriching",
            Self::SocialEnriching => "social_enriching",
            Self::Merged => "merged",
            Self::Graded => "website_graded",
            Self::Analyzed => "analyzed",
            Self::Final => "final",
        };
        f.write_str(name)
    }
}
