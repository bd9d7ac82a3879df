use bizscout_core::UnknownNicheError;
use bizscout_scraper::DiscoveryUnavailableError;
use thiserror::Error;

/// The only ways a run can fail. Every per-business problem degrades that
/// record instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    UnknownNiche(#[from] UnknownNicheError),

    #[error(transparent)]
    DiscoveryUnavailable(#[from] DiscoveryUnavailableError),
}
