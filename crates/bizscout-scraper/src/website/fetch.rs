//! Static HTML fetching for business websites.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::{PageFetcher, WebsiteUnreachableError};
use crate::client::BROWSER_FALLBACK_UA;

/// Fetches pages with a configured user agent, retrying once with a browser
/// user agent when the site refuses or serves a bot challenge.
#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    client: Client,
    user_agent: String,
}

impl HttpPageFetcher {
    /// # Errors
    ///
    /// Returns [`reqwest::Error`] if the HTTP client cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;
        Ok(Self {
            client,
            user_agent: user_agent.to_owned(),
        })
    }

    async fn fetch_with_agent(&self, url: &str, user_agent: &str) -> Result<String, String> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, user_agent)
            .header(reqwest::header::ACCEPT, "text/html,application/xhtml+xml")
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| describe_transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP {}", status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| format!("failed to read body: {e}"))?;
        if body.trim().is_empty() {
            return Err("empty body".to_owned());
        }
        if looks_like_bot_challenge(&body) {
            return Err("bot challenge page".to_owned());
        }
        Ok(body)
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch_html(&self, url: &str) -> Result<String, WebsiteUnreachableError> {
        let mut user_agents = vec![self.user_agent.as_str()];
        if self.user_agent != BROWSER_FALLBACK_UA {
            user_agents.push(BROWSER_FALLBACK_UA);
        }

        let mut last_reason = String::new();
        for user_agent in user_agents {
            match self.fetch_with_agent(url, user_agent).await {
                Ok(body) => return Ok(body),
                Err(reason) => {
                    tracing::debug!(url, user_agent, reason = %reason, "website fetch attempt failed");
                    let retry_with_browser_ua =
                        reason.starts_with("HTTP 403") || reason == "bot challenge page";
                    last_reason = reason;
                    if !retry_with_browser_ua {
                        break;
                    }
                }
            }
        }

        Err(WebsiteUnreachableError {
            url: url.to_owned(),
            reason: last_reason,
        })
    }
}

fn describe_transport_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "timed out".to_owned()
    } else if err.is_connect() {
        format!("connection failed: {err}")
    } else if err.is_redirect() {
        "too many redirects".to_owned()
    } else {
        err.to_string()
    }
}

fn looks_like_bot_challenge(body: &str) -> bool {
    let lowered = body.to_ascii_lowercase();
    let has_cloudflare_banner = lowered.contains("attention required! | cloudflare");
    let has_challenge_platform = lowered.contains("/cdn-cgi/challenge-platform/");
    let has_just_a_moment = lowered.contains("just a moment...");
    let has_cookie_gate = lowered.contains("please enable cookies");
    let has_cf_chl = lowered.contains("cf-chl-");

    has_cloudflare_banner
        || has_challenge_platform
        || (has_just_a_moment && has_cookie_gate)
        || (has_just_a_moment && has_cf_chl)
}
