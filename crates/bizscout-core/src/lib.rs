//! Shared domain types, niche registry, and configuration for bizscout.

mod app_config;
mod config;
pub mod niches;
pub mod records;

use thiserror::Error;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use niches::{load_niches, NicheDefinition, NicheRegistry, UnknownNicheError};
pub use records::{
    AnalysisResult, BusinessRecord, ExtractedWebsiteData, ListingStub, PageImage, PageLink,
    SocialProfileData, WebsiteGrade,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read niches file {path}: {source}")]
    NichesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse niches file: {0}")]
    NichesFileParse(#[from] serde_yaml::Error),

    #[error("niche validation failed: {0}")]
    Validation(String),
}
