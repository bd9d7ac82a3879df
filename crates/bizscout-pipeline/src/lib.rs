//! Pipeline controller: runs discovery, drives per-business enrichment with
//! failure isolation, and merges the results into a [`RunReport`].

pub mod analyzer;
pub mod error;
pub mod merge;
pub mod pipeline;
pub mod report;
pub mod stage;

pub use analyzer::{
    build_grade_prompt, build_prompt, parse_analysis, parse_grade, AnalysisError, Analyzer,
    ChatAnalyzer, WebsiteGrader,
};
pub use error::PipelineError;
pub use merge::merge_record;
pub use pipeline::{Pipeline, PipelineSettings, Sources};
pub use report::{RunMetadata, RunReport};
pub use stage::{CandidateState, StageOutcome};
