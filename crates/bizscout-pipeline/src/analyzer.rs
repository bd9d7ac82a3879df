//! Qualitative business analysis and website grading through an
//! OpenAI-compatible chat completion endpoint.

use std::fmt::Write as _;
use std::time::Duration;

use async_trait::async_trait;
use bizscout_core::{
    AnalysisResult, BusinessRecord, ExtractedWebsiteData, NicheDefinition, WebsiteGrade,
};
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

const SYSTEM_PROMPT: &str = "You are an expert business analyst specialising in revenue modelling. \
     Always reply with a valid JSON object and nothing else.";

const GRADER_SYSTEM_PROMPT: &str = "You are an expert web designer and SEO consultant. \
     Grade websites objectively based on design quality and SEO best practices. \
     Always reply with valid JSON only.";

/// Team names are trimmed to this many characters in the prompt.
const TEAM_PROMPT_CHARS: usize = 200;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("analyzer HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("analyzer returned HTTP {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("analyzer response has no message content")]
    EmptyResponse,

    #[error("analyzer reply is not valid JSON for the requested shape: {0}")]
    Parse(#[source] serde_json::Error),
}

/// Turns a merged record into structured insight. One call per business,
/// no internal retry.
#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(
        &self,
        record: &BusinessRecord,
        niche: &NicheDefinition,
    ) -> Result<AnalysisResult, AnalysisError>;
}

/// Scores a business website for design and SEO. One call per website, no
/// internal retry.
#[async_trait]
pub trait WebsiteGrader: Send + Sync {
    async fn grade(&self, website: &ExtractedWebsiteData) -> Result<WebsiteGrade, AnalysisError>;
}

/// Chat-completion analyzer and website grader (Groq by default).
#[derive(Debug, Clone)]
pub struct ChatAnalyzer {
    client: reqwest::Client,
    url: String,
    model: String,
    api_key: String,
}

impl ChatAnalyzer {
    /// # Errors
    ///
    /// Returns [`reqwest::Error`] if the HTTP client cannot be constructed.
    pub fn new(
        url: &str,
        model: &str,
        api_key: &str,
        timeout_secs: u64,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            url: url.to_owned(),
            model: model.to_owned(),
            api_key: api_key.to_owned(),
        })
    }

    /// Send one system + user exchange and return the first choice's
    /// message content.
    async fn complete(
        &self,
        system: &str,
        prompt: String,
        temperature: f64,
        max_tokens: u32,
    ) -> Result<String, AnalysisError> {
        let req_body = json!({
            "model": self.model,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": prompt }
            ],
            "temperature": temperature,
            "max_tokens": max_tokens
        });

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&req_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body: String = response
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(500)
                .collect();
            return Err(AnalysisError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response.json().await?;
        body.get("choices")
            .and_then(Value::as_array)
            .and_then(|choices| choices.first())
            .and_then(|choice| choice.get("message"))
            .and_then(|msg| msg.get("content"))
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or(AnalysisError::EmptyResponse)
    }
}

#[async_trait]
impl Analyzer for ChatAnalyzer {
    async fn analyze(
        &self,
        record: &BusinessRecord,
        niche: &NicheDefinition,
    ) -> Result<AnalysisResult, AnalysisError> {
        let content = self
            .complete(SYSTEM_PROMPT, build_prompt(record, niche), 0.3, 1024)
            .await?;
        parse_analysis(&content)
    }
}

#[async_trait]
impl WebsiteGrader for ChatAnalyzer {
    async fn grade(&self, website: &ExtractedWebsiteData) -> Result<WebsiteGrade, AnalysisError> {
        let content = self
            .complete(GRADER_SYSTEM_PROMPT, build_grade_prompt(website), 0.2, 800)
            .await?;
        let grade = parse_grade(&content)?;
        tracing::debug!(url = %website.url, total = grade.total_score, "website graded");
        Ok(grade)
    }
}

/// Render the business facts the analyzer sees.
#[must_use]
pub fn build_prompt(record: &BusinessRecord, niche: &NicheDefinition) -> String {
    let listing = &record.listing;
    let website = record.website_data.as_ref();
    let join_or_unknown = |items: Option<&Vec<String>>| {
        items
            .filter(|v| !v.is_empty())
            .map_or_else(|| "unknown".to_string(), |v| v.join(", "))
    };

    let services = join_or_unknown(website.map(|w| &w.services));
    let prices = join_or_unknown(website.map(|w| &w.prices));
    let team: String = join_or_unknown(website.map(|w| &w.team_members))
        .chars()
        .take(TEAM_PROMPT_CHARS)
        .collect();
    let rating = listing
        .rating
        .map_or_else(|| "N/A".to_string(), |r| format!("{r:.1}"));
    let social = match &record.social {
        Some(profile) => {
            let mut line = format!("@{} | {} followers", profile.username, profile.followers);
            if let Some(rate) = profile.engagement_rate {
                let _ = write!(line, " | {rate:.2}% engagement");
            }
            line
        }
        None => "No social profile found".to_string(),
    };

    format!(
        "Analyse this {label} business and return ONLY a JSON object with these exact keys:\n\n\
         Business: {name}\n\
         Location: {location}\n\
         Rating: {rating} ({reviews} reviews)\n\
         Website: {site}\n\
         Services: {services}\n\
         Prices: {prices}\n\
         Team: {team}\n\
         Social: {social}\n\n\
         Required JSON structure:\n\
         {{\n  \"revenue_streams\": [\"stream1\", \"stream2\"],\n  \
         \"estimated_revenue_tier\": \"Low|Medium|High\",\n  \
         \"pricing_strategy\": \"Budget|Mid-tier|Premium|Luxury\",\n  \
         \"service_quality_score\": 7.5,\n  \
         \"competitive_assessment\": \"Brief 1-2 sentence assessment\",\n  \
         \"niche_specific_insights\": \"Brief 1-2 sentence niche insight\"\n}}",
        label = niche.label,
        name = listing.name,
        location = record.location,
        reviews = listing.reviews_count.unwrap_or(0),
        site = listing.website.as_deref().unwrap_or("None"),
    )
}

/// Parse a model reply, tolerating a surrounding markdown code fence.
///
/// # Errors
///
/// Returns [`AnalysisError::Parse`] when the reply is not an analysis object.
pub fn parse_analysis(content: &str) -> Result<AnalysisResult, AnalysisError> {
    serde_json::from_str(&strip_code_fence(content)).map_err(AnalysisError::Parse)
}

/// Render the page signals the grader scores.
#[must_use]
pub fn build_grade_prompt(website: &ExtractedWebsiteData) -> String {
    let has_ssl = website.url.to_lowercase().starts_with("https://");
    let yes_no = |flag: bool| if flag { "Yes" } else { "No" };
    let first_three = |items: &[String]| {
        items.iter().take(3).cloned().collect::<Vec<_>>().join(", ")
    };
    let images = website.images.len();
    let images_with_alt = website.images.iter().filter(|img| img.has_alt).count();
    let alt_pct = images_with_alt * 100 / images.max(1);
    let services = if website.services.is_empty() {
        "None found".to_string()
    } else {
        first_three(&website.services)
    };

    format!(
        "Grade this website out of 100 points based on Design (50 points) and SEO (50 points).\n\n\
         Website: {url}\n\n\
         TECHNICAL DATA:\n\
         - SSL Certificate: {ssl}\n\
         - Meta Title: {title}\n\
         - Meta Description: {description}\n\
         - H1 Tags: {h1_count} found - {h1s}\n\
         - Images: {images} total, {images_with_alt} with alt text ({alt_pct}%)\n\
         - Internal Links: {links}\n\
         - Mobile Viewport Tag: {viewport}\n\
         - Call-to-Action Buttons: {cta_count} found - {ctas}\n\n\
         CONTENT PREVIEW:\n\
         Services: {services}\n\
         Text Length: {text_length} characters\n\n\
         GRADING RUBRIC:\n\n\
         DESIGN & UX (50 points):\n\
         - Visual appeal & professionalism (15 pts)\n\
         - Mobile responsiveness (10 pts) - check viewport tag, CTA visibility\n\
         - Page load optimization (10 pts) - image count, size indicators\n\
         - Clear navigation & structure (10 pts) - links, sections\n\
         - Call-to-action visibility (5 pts) - contact buttons, booking\n\n\
         SEO & DISCOVERABILITY (50 points):\n\
         - Meta tags quality (10 pts) - title and description present and descriptive\n\
         - Header structure (10 pts) - proper H1 usage\n\
         - Image optimization (10 pts) - alt text percentage\n\
         - SSL certificate (5 pts) - HTTPS\n\
         - Content quality (10 pts) - text length, keyword usage, service descriptions\n\
         - Internal linking (5 pts) - navigation structure\n\n\
         Return ONLY this JSON structure:\n\
         {{\n  \"total_score\": 75,\n  \"design_score\": 38,\n  \"seo_score\": 37,\n  \
         \"strengths\": [\"strength1\", \"strength2\", \"strength3\"],\n  \
         \"weaknesses\": [\"weakness1\", \"weakness2\", \"weakness3\"],\n  \
         \"recommendations\": [\"recommendation1\", \"recommendation2\", \"recommendation3\"]\n}}\n\n\
         Be objective and realistic. Most websites score 60-80. Only exceptional sites score 90+.",
        url = website.url,
        ssl = yes_no(has_ssl),
        title = website.meta_title.as_deref().unwrap_or("Missing"),
        description = website.meta_description.as_deref().unwrap_or("Missing"),
        h1_count = website.h1_tags.len(),
        h1s = first_three(&website.h1_tags),
        links = website.internal_links.len(),
        viewport = yes_no(website.has_mobile_viewport),
        cta_count = website.cta_buttons.len(),
        ctas = first_three(&website.cta_buttons),
        text_length = website.text_length,
    )
}

/// Grade as the model writes it; scores may come back as floats.
#[derive(Debug, Deserialize)]
struct RawGrade {
    total_score: Option<f64>,
    design_score: Option<f64>,
    seo_score: Option<f64>,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    weaknesses: Vec<String>,
    #[serde(default)]
    recommendations: Vec<String>,
}

/// Parse a grader reply. Scores are rounded and clamped to their ranges;
/// a missing total is the sum of the two halves.
///
/// # Errors
///
/// Returns [`AnalysisError::Parse`] when the reply is not a grade object.
pub fn parse_grade(content: &str) -> Result<WebsiteGrade, AnalysisError> {
    let raw: RawGrade =
        serde_json::from_str(&strip_code_fence(content)).map_err(AnalysisError::Parse)?;
    let design_score = clamp_score(raw.design_score, 50);
    let seo_score = clamp_score(raw.seo_score, 50);
    let total_score = match raw.total_score {
        Some(total) => clamp_score(Some(total), 100),
        None => design_score + seo_score,
    };
    Ok(WebsiteGrade {
        total_score,
        design_score,
        seo_score,
        strengths: raw.strengths,
        weaknesses: raw.weaknesses,
        recommendations: raw.recommendations,
    })
}

// Clamped to `0..=max` before the cast, so it cannot truncate or wrap.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_score(score: Option<f64>, max: u32) -> u32 {
    let score = score.filter(|s| s.is_finite()).unwrap_or(0.0);
    score.round().clamp(0.0, f64::from(max)) as u32
}

fn strip_code_fence(content: &str) -> String {
    let trimmed = content.trim();
    if trimmed.starts_with("```") {
        trimmed
            .lines()
            .filter(|line| !line.trim_start().starts_with("```"))
            .collect::<Vec<_>>()
            .join("\n")
    } else {
        trimmed.to_owned()
    }
}
