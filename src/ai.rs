//! # AI Summary Fetcher
//!
//! Optional enrichment of a search with a single Gemini-generated "research
//! summary". The fetcher is best-effort: any failure (missing API key, HTTP
//! error, timeout, malformed answer) is logged and yields no AI result, and the
//! search continues with mock results only.
//!
//! ## Key Components
//!
//! - [`AiSummaryFetcher`]: entry point used by the search handlers
//! - [`GeminiClient`]: thin `generateContent` client with an explicit timeout
//! - [`parse_summary_response`]: strict parser for the five labeled fields

use anyhow::{Context, Result};
use chrono::{Datelike, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::AiConfig;
use crate::record::{ResultRecord, AI_AUTHOR, AI_SOURCE_SUFFIX};
use crate::slug::slugify;

/// Field labels the model is asked for, in prompt order.
pub const REQUIRED_FIELDS: [&str; 5] = ["title", "author", "year", "source", "summary"];

/// Case-insensitive substrings that mark a query as a file or image analysis
/// request. Those are answered with a canned record and never sent upstream.
const ANALYSIS_PATTERNS: &[&str] = &[
    "analyze this image",
    "analyze the image",
    "analyse this image",
    "analyze this file",
    "analyze the file",
    "analyse this file",
    "describe this image",
    "image analysis",
    "file analysis",
    "upload an image",
    "upload a file",
    "upload image",
    "upload file",
];

const USER_AGENT: &str = concat!("mindwork/", env!("CARGO_PKG_VERSION"));

/// Errors from the Gemini client.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    /// Non-success HTTP status.
    #[error("HTTP error: {status}")]
    Http { status: u16 },

    /// Request exceeded the configured timeout.
    #[error("request timeout")]
    Timeout,

    /// Connection or transport failure.
    #[error("network error: {0}")]
    Network(reqwest::Error),

    /// Body was not a `generateContent` response.
    #[error("invalid response body: {0}")]
    InvalidBody(String),

    /// Response carried no candidate text.
    #[error("response contained no text")]
    EmptyResponse,

    /// Candidate text did not contain the expected fields.
    #[error("unparseable summary: {0}")]
    Parse(#[from] SummaryParseError),
}

impl From<reqwest::Error> for AiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AiError::Timeout
        } else {
            AiError::Network(err)
        }
    }
}

/// Reasons a model answer could not be turned into a record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SummaryParseError {
    /// One or more labeled fields were absent or empty.
    #[error("missing fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    /// The year field contained no number.
    #[error("invalid year: {0:?}")]
    InvalidYear(String),
}

/// The five fields extracted from a model answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryFields {
    pub title: String,
    /// Author as written by the model; replaced by [`AI_AUTHOR`] in the record
    pub author: String,
    pub year: i32,
    pub source: String,
    pub summary: String,
}

impl SummaryFields {
    /// Converts parsed fields into a cacheable record.
    ///
    /// The author is always [`AI_AUTHOR`] and the source is marked with
    /// [`AI_SOURCE_SUFFIX`], whatever the model wrote.
    pub fn into_record(self) -> ResultRecord {
        let slug = slugify(&self.title, &mut rand::thread_rng());
        ResultRecord {
            title: self.title,
            author: AI_AUTHOR.to_string(),
            year: self.year,
            source: format!("{}{}", self.source, AI_SOURCE_SUFFIX),
            summary: self.summary,
            slug,
        }
    }
}

/// Parses a model answer of the form `Label: value`, one field per line.
///
/// Each line is split on its first colon. Labels are matched case-insensitively
/// after stripping Markdown emphasis and bullets; the first non-empty value for
/// a label wins and lines with unknown labels are ignored. The year is the first
/// run of digits in its value.
///
/// # Errors
/// - [`SummaryParseError::MissingFields`] if any of [`REQUIRED_FIELDS`] is absent
/// - [`SummaryParseError::InvalidYear`] if the year value has no digits
pub fn parse_summary_response(text: &str) -> Result<SummaryFields, SummaryParseError> {
    let mut values: [Option<String>; 5] = Default::default();

    for line in text.lines() {
        let Some((raw_key, raw_value)) = line.split_once(':') else {
            continue;
        };

        let key = normalize_label(raw_key);
        let Some(index) = REQUIRED_FIELDS.iter().position(|field| *field == key) else {
            continue;
        };

        let value = clean_value(raw_value);
        if !value.is_empty() && values[index].is_none() {
            values[index] = Some(value);
        }
    }

    let missing: Vec<String> = REQUIRED_FIELDS
        .iter()
        .zip(values.iter())
        .filter(|(_, value)| value.is_none())
        .map(|(field, _)| field.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(SummaryParseError::MissingFields(missing));
    }

    let [Some(title), Some(author), Some(year_raw), Some(source), Some(summary)] = values else {
        return Err(SummaryParseError::MissingFields(Vec::new()));
    };

    let year = year_raw
        .split(|c: char| !c.is_ascii_digit())
        .find(|run| !run.is_empty())
        .and_then(|run| run.parse::<i32>().ok())
        .ok_or_else(|| SummaryParseError::InvalidYear(year_raw.clone()))?;

    Ok(SummaryFields {
        title,
        author,
        year,
        source,
        summary,
    })
}

fn normalize_label(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c: char| c == '*' || c == '_' || c == '#' || c == '-' || c.is_whitespace())
        .to_ascii_lowercase()
}

fn clean_value(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c: char| c == '*' || c == '_')
        .trim()
        .to_string()
}

/// Instruction prompt sent to the model for `query`.
pub fn build_prompt(query: &str) -> String {
    format!(
        "You are an academic research assistant. Write a concise research summary for the \
         topic \"{}\".\n\
         Respond with exactly five lines in this format and nothing else:\n\
         Title: <a descriptive title>\n\
         Author: <author or organization>\n\
         Year: <four-digit year>\n\
         Source: <journal, publisher or website>\n\
         Summary: <two to three sentences>",
        query.trim()
    )
}

/// Returns `true` if the query asks for file or image analysis.
pub fn is_analysis_request(query: &str) -> bool {
    let query = query.to_lowercase();
    ANALYSIS_PATTERNS
        .iter()
        .any(|pattern| query.contains(pattern))
}

fn analysis_record(query: &str) -> ResultRecord {
    let title = "File and Image Analysis".to_string();
    let slug = slugify(&title, &mut rand::thread_rng());
    ResultRecord {
        title,
        author: AI_AUTHOR.to_string(),
        year: Utc::now().year(),
        source: format!("Gemini Vision{}", AI_SOURCE_SUFFIX),
        summary: format!(
            "Your request (\"{}\") asks for analysis of an uploaded file or image. Attachments \
             cannot be submitted through the search bar; open the MindWork workspace and attach \
             the document or image there for Gemini to summarize.",
            query.trim()
        ),
        slug,
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

/// Minimal client for Gemini's `generateContent` endpoint.
pub struct GeminiClient {
    client: Client,
    endpoint: Url,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// Creates a client for `config.model` at `config.base_url`.
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid or the HTTP client cannot be
    /// built.
    pub fn new(config: &AiConfig, api_key: String) -> Result<Self> {
        let mut base = config.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }

        let endpoint = Url::parse(&base)
            .and_then(|base| {
                base.join(&format!("v1beta/models/{}:generateContent", config.model))
            })
            .with_context(|| format!("Invalid Gemini base URL: {}", config.base_url))?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout())
            .build()
            .context("Failed to create HTTP client for Gemini")?;

        Ok(Self {
            client,
            endpoint,
            api_key,
            model: config.model.clone(),
        })
    }

    /// Sends `prompt` and returns the concatenated candidate text.
    pub async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        };

        debug!("📡 GEMINI API: Sending request to {} ({})", self.endpoint, self.model);
        let start_time = Instant::now();

        let response = self
            .client
            .post(self.endpoint.clone())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AiError::Http {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let parsed: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|e| AiError::InvalidBody(e.to_string()))?;

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        debug!(
            "✅ GEMINI RESPONSE: {} chars in {}ms",
            text.len(),
            start_time.elapsed().as_millis()
        );

        if text.trim().is_empty() {
            return Err(AiError::EmptyResponse);
        }
        Ok(text)
    }
}

/// Best-effort AI enrichment for a search query.
///
/// Readiness is decided once at construction: with no API key the fetcher is
/// permanently inactive and [`AiSummaryFetcher::fetch`] always returns `None`.
pub struct AiSummaryFetcher {
    client: Option<GeminiClient>,
}

impl AiSummaryFetcher {
    /// Builds the fetcher from configuration.
    ///
    /// A missing API key is not an error; it produces an inactive fetcher.
    pub fn from_config(config: &AiConfig) -> Result<Self> {
        match &config.api_key {
            Some(api_key) => {
                let client = GeminiClient::new(config, api_key.clone())?;
                info!(
                    "🤖 AI enrichment enabled (model: {}, timeout: {}s)",
                    config.model, config.timeout_secs
                );
                Ok(Self {
                    client: Some(client),
                })
            }
            None => {
                info!("AI enrichment disabled: GEMINI_API_KEY is not set, serving mock results only");
                Ok(Self::inactive())
            }
        }
    }

    /// A fetcher that never calls out.
    pub fn inactive() -> Self {
        Self { client: None }
    }

    pub fn is_active(&self) -> bool {
        self.client.is_some()
    }

    /// Returns one AI-labelled record for `query`, or `None`.
    ///
    /// File/image analysis requests get a canned record without a network
    /// call. Every failure is logged and mapped to `None`; there are no
    /// retries.
    pub async fn fetch(&self, query: &str) -> Option<ResultRecord> {
        let client = self.client.as_ref()?;

        if is_analysis_request(query) {
            info!("🖼️ AI: '{}' is a file/image analysis request, using canned answer", query);
            return Some(analysis_record(query));
        }

        match self.try_fetch(client, query).await {
            Ok(fields) => {
                debug!(
                    "AI summary parsed: '{}' (model-reported author: '{}')",
                    fields.title, fields.author
                );
                Some(fields.into_record())
            }
            Err(e) => {
                warn!("⚠️ AI enrichment unavailable for '{}': {}", query, e);
                None
            }
        }
    }

    async fn try_fetch(&self, client: &GeminiClient, query: &str) -> Result<SummaryFields, AiError> {
        let text = client.generate(&build_prompt(query)).await?;
        Ok(parse_summary_response(&text)?)
    }
}
