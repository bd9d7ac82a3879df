use std::path::PathBuf;

#[derive(Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub niches_path: PathBuf,
    /// Base URL of the Places-style text search surface used for discovery.
    pub maps_base_url: String,
    /// Without a key the discovery source cannot start.
    pub maps_api_key: Option<String>,
    pub social_base_url: String,
    pub social_app_id: Option<String>,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub website_timeout_secs: u64,
    /// Lower bound of the jittered delay between requests to one source.
    pub min_delay_ms: u64,
    /// Upper bound of the jittered delay between requests to one source.
    pub max_delay_ms: u64,
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
    pub max_workers: usize,
    pub stage_timeout_secs: u64,
    pub run_budget_secs: u64,
    /// Number of recent posts averaged into the engagement rate.
    pub social_post_sample: usize,
    pub analyzer_api_key: Option<String>,
    pub analyzer_url: String,
    pub analyzer_model: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("log_level", &self.log_level)
            .field("niches_path", &self.niches_path)
            .field("maps_base_url", &self.maps_base_url)
            .field(
                "maps_api_key",
                &self.maps_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("social_base_url", &self.social_base_url)
            .field("social_app_id", &self.social_app_id)
            .field("user_agent", &self.user_agent)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("website_timeout_secs", &self.website_timeout_secs)
            .field("min_delay_ms", &self.min_delay_ms)
            .field("max_delay_ms", &self.max_delay_ms)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_secs", &self.retry_backoff_base_secs)
            .field("max_workers", &self.max_workers)
            .field("stage_timeout_secs", &self.stage_timeout_secs)
            .field("run_budget_secs", &self.run_budget_secs)
            .field("social_post_sample", &self.social_post_sample)
            .field(
                "analyzer_api_key",
                &self.analyzer_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("analyzer_url", &self.analyzer_url)
            .field("analyzer_model", &self.analyzer_model)
            .finish()
    }
}
