//! The pipeline controller: discovery once, then bounded-parallel
//! enrichment of every candidate, merged in discovery order.

use std::sync::Arc;
use std::time::{Duration, Instant};

use bizscout_core::{AppConfig, BusinessRecord, ListingStub, NicheDefinition, NicheRegistry};
use bizscout_scraper::{
    discover_listings, enrich_profile, scrape_website, HttpPageFetcher, InstagramSource, JsonClient,
    ListingQuery, ListingSource, Pacer, PageFetcher, PlacesSource, ProfileSource, ScraperError,
};
use chrono::Utc;
use futures::stream::{self, StreamExt};
use uuid::Uuid;

use crate::analyzer::{Analyzer, ChatAnalyzer, WebsiteGrader};
use crate::error::PipelineError;
use crate::merge::merge_record;
use crate::report::{RunMetadata, RunReport};
use crate::stage::{CandidateState, StageOutcome};

/// Tunables for one pipeline instance.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub max_workers: usize,
    pub stage_timeout: Duration,
    pub run_budget: Duration,
    pub post_sample: usize,
}

impl PipelineSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            max_workers: config.max_workers.max(1),
            stage_timeout: Duration::from_secs(config.stage_timeout_secs),
            run_budget: Duration::from_secs(config.run_budget_secs),
            post_sample: config.social_post_sample,
        }
    }
}

/// The external sources a pipeline talks to, with the pacers that space
/// out requests to each rate-limited source.
#[derive(Clone)]
pub struct Sources {
    pub listings: Arc<dyn ListingSource>,
    pub pages: Arc<dyn PageFetcher>,
    pub profiles: Arc<dyn ProfileSource>,
    pub analyzer: Option<Arc<dyn Analyzer>>,
    pub grader: Option<Arc<dyn WebsiteGrader>>,
    pub discovery_pacer: Arc<Pacer>,
    pub profile_pacer: Arc<Pacer>,
}

impl Sources {
    /// Build the HTTP-backed sources described by `config`.
    ///
    /// The analyzer and website grader share one chat client and are
    /// attached only when `with_analysis` is set and an API key is
    /// configured.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError`] if an HTTP client cannot be constructed.
    pub fn from_config(config: &AppConfig, with_analysis: bool) -> Result<Self, ScraperError> {
        let json_client = JsonClient::new(
            config.request_timeout_secs,
            &config.user_agent,
            config.max_retries,
            config.retry_backoff_base_secs,
        )?;

        let listings = PlacesSource::new(
            json_client.clone(),
            &config.maps_base_url,
            config.maps_api_key.clone(),
        );
        let profiles = InstagramSource::new(
            json_client,
            &config.social_base_url,
            config.social_app_id.as_deref(),
        )?;
        let pages = HttpPageFetcher::new(config.website_timeout_secs, &config.user_agent)?;

        let chat = match (&config.analyzer_api_key, with_analysis) {
            (Some(key), true) => Some(Arc::new(ChatAnalyzer::new(
                &config.analyzer_url,
                &config.analyzer_model,
                key,
                config.request_timeout_secs.max(30),
            )?)),
            (None, true) => {
                tracing::warn!("GROQ_API_KEY is not set; analysis and grading will be skipped");
                None
            }
            (_, false) => None,
        };
        let analyzer = chat.clone().map(|c| c as Arc<dyn Analyzer>);
        let grader = chat.map(|c| c as Arc<dyn WebsiteGrader>);

        Ok(Self {
            listings: Arc::new(listings),
            pages: Arc::new(pages),
            profiles: Arc::new(profiles),
            analyzer,
            grader,
            discovery_pacer: Arc::new(Pacer::new(config.min_delay_ms, config.max_delay_ms)),
            profile_pacer: Arc::new(Pacer::new(config.min_delay_ms, config.max_delay_ms)),
        })
    }
}

/// Drives discovery and enrichment for one niche and location at a time.
pub struct Pipeline {
    registry: Arc<NicheRegistry>,
    sources: Sources,
    settings: PipelineSettings,
}

impl Pipeline {
    #[must_use]
    pub fn new(registry: Arc<NicheRegistry>, sources: Sources, settings: PipelineSettings) -> Self {
        Self {
            registry,
            sources,
            settings,
        }
    }

    /// Discover up to `max_results` businesses for `niche_key` in
    /// `location` and enrich each one.
    ///
    /// Records come back in discovery order. Candidates not started before
    /// the run budget elapses are dropped and counted.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::UnknownNiche`]: `niche_key` is not registered;
    ///   no request has been made.
    /// - [`PipelineError::DiscoveryUnavailable`]: the listing source could
    ///   not be used at all.
    pub async fn run(
        &self,
        niche_key: &str,
        location: &str,
        max_results: usize,
    ) -> Result<RunReport, PipelineError> {
        let niche = self.registry.get(niche_key)?;

        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let started = Instant::now();
        let deadline = started + self.settings.run_budget;

        tracing::info!(%run_id, niche = niche_key, location, max_results, "run started");

        let query = ListingQuery::new(niche.search_terms(), location);
        let stubs = discover_listings(
            self.sources.listings.as_ref(),
            &self.sources.discovery_pacer,
            &query,
            max_results,
        )
        .await?;
        let discovered_count = stubs.len();

        let outcomes: Vec<Option<BusinessRecord>> = stream::iter(stubs)
            .map(|stub| async move {
                if Instant::now() >= deadline {
                    tracing::warn!(business = %stub.name, "run budget exhausted; dropping candidate");
                    return None;
                }
                Some(self.process_candidate(stub, niche, location).await)
            })
            .buffered(self.settings.max_workers.max(1))
            .collect()
            .await;

        let dropped_count = outcomes.iter().filter(|o| o.is_none()).count();
        let records: Vec<BusinessRecord> = outcomes.into_iter().flatten().collect();
        let elapsed_secs = (started.elapsed().as_secs_f64() * 100.0).round() / 100.0;

        tracing::info!(
            %run_id,
            niche = niche_key,
            discovered = discovered_count,
            results = records.len(),
            dropped = dropped_count,
            elapsed_secs,
            "run complete"
        );

        Ok(RunReport {
            niche: niche_key.to_owned(),
            location: location.to_owned(),
            metadata: RunMetadata {
                run_id,
                started_at,
                elapsed_secs,
                result_count: records.len(),
                discovered_count,
                dropped_count,
            },
            records,
        })
    }

    /// Website stage, then social stage, then merge, optional website
    /// grading and optional analysis.
    /// Never fails: every stage problem leaves its field absent.
    async fn process_candidate(
        &self,
        stub: ListingStub,
        niche: &NicheDefinition,
        location: &str,
    ) -> BusinessRecord {
        let business = stub.name.clone();
        let limit = self.settings.stage_timeout;
        log_state(&business, CandidateState::Discovered);

        log_state(&business, CandidateState::WebsiteEnriching);
        let website = match stub.website.as_deref() {
            Some(url) => {
                StageOutcome::within(
                    limit,
                    scrape_website(self.sources.pages.as_ref(), url, niche),
                    StageOutcome::from_result,
                )
                .await
            }
            None => StageOutcome::Empty,
        };
        log_outcome(&business, "website", &website);

        log_state(&business, CandidateState::SocialEnriching);
        let linked_profile = match &website {
            StageOutcome::Found(data) => data.instagram_url.clone(),
            _ => None,
        };
        let social = StageOutcome::within(
            limit,
            enrich_profile(
                self.sources.profiles.as_ref(),
                &self.sources.profile_pacer,
                &business,
                linked_profile.as_deref(),
                self.settings.post_sample,
            ),
            StageOutcome::from_lookup,
        )
        .await;
        log_outcome(&business, "social", &social);

        let mut record = merge_record(stub, &niche.key, location, website, social);
        log_state(&business, CandidateState::Merged);

        if let (Some(grader), Some(site)) = (&self.sources.grader, &record.website_data) {
            let grade =
                StageOutcome::within(limit, grader.grade(site), StageOutcome::from_result).await;
            log_outcome(&business, "grading", &grade);
            record.website_grade = grade.into_option();
            log_state(&business, CandidateState::Graded);
        }

        if let Some(analyzer) = &self.sources.analyzer {
            let analysis = StageOutcome::within(
                limit,
                analyzer.analyze(&record, niche),
                StageOutcome::from_result,
            )
            .await;
            log_outcome(&business, "analysis", &analysis);
            record.analysis = analysis.into_option();
            log_state(&business, CandidateState::Analyzed);
        }

        log_state(&business, CandidateState::Final);
        record
    }
}

fn log_state(business: &str, state: CandidateState) {
    tracing::debug!(business, %state, "candidate state");
}

fn log_outcome<T>(business: &str, stage: &'static str, outcome: &StageOutcome<T>) {
    match outcome {
        StageOutcome::Failed(reason) => {
            tracing::warn!(business, stage, error = %reason, "stage failed; field left empty");
        }
        other => tracing::debug!(business, stage, outcome = other.label(), "stage finished"),
    }
}
