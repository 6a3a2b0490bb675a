// file: src/ai/claude.rs
// description: repository analysis through the Anthropic messages API
// reference: https://docs.anthropic.com/en/api/messages

use crate::config::AiConfig;
use crate::error::{KovaError, Result};
use crate::models::sync_result::RepoSnapshot;
use chrono::{DateTime, Utc};
use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    #[serde(default)]
    usage: Option<Usage>,
    model: String,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Usage {
    #[serde(default)]
    input_tokens: u32,
    #[serde(default)]
    output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(rename = "type")]
    error_type: String,
    message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoAnalysis {
    pub repository: String,
    pub model: String,
    pub text: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub analyzed_at: DateTime<Utc>,
}

pub struct RepoAnalyzer {
    client: Client,
    config: AiConfig,
}

impl RepoAnalyzer {
    /// Fails with `AiNotConfigured` when no API key is available.
    pub fn new(config: &AiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                KovaError::AiNotConfigured(
                    "set ai.api_key or ANTHROPIC_API_KEY to enable analysis".to_string(),
                )
            })?;

        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(api_key)
            .map_err(|e| KovaError::Config(format!("Invalid Anthropic API key: {}", e)))?;
        headers.insert("x-api-key", key);
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(ANTHROPIC_VERSION),
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    pub async fn analyze(&self, repository: &str, snapshot: &RepoSnapshot) -> Result<RepoAnalysis> {
        let url = format!("{}/messages", self.config.api_url.trim_end_matches('/'));
        let request = MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            system: &self.config.system_prompt,
            messages: vec![Message {
                role: "user",
                content: build_prompt(repository, snapshot),
            }],
        };

        debug!("POST {} for {}", url, repository);
        let response = self.client.post(&url).json(&request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(KovaError::AiProvider(describe_error(status.as_u16(), &body)));
        }

        let analysis = parse_response(repository, &body)?;
        info!(
            "Analyzed {} ({} input / {} output tokens)",
            repository, analysis.input_tokens, analysis.output_tokens
        );
        Ok(analysis)
    }
}

pub fn build_prompt(repository: &str, snapshot: &RepoSnapshot) -> String {
    let branches = if snapshot.branches.is_empty() {
        "none reported".to_string()
    } else {
        snapshot.branches.join(", ")
    };

    format!(
        "Repository: {}\n\
         Description: {}\n\
         Default branch: {}\n\
         Last updated: {}\n\
         Branches: {}\n\
         Recent commits fetched: {}\n\
         Stars: {}, forks: {}\n\n\
         Summarize the current state of this repository, its role in the Kova AI \
         system, and the most useful next steps.",
        repository,
        snapshot.description.as_deref().unwrap_or("(none)"),
        snapshot.default_branch.as_deref().unwrap_or("unknown"),
        snapshot.updated_at.as_deref().unwrap_or("unknown"),
        branches,
        snapshot.recent_commits,
        snapshot.stars,
        snapshot.forks,
    )
}

fn parse_response(repository: &str, body: &str) -> Result<RepoAnalysis> {
    let response: MessagesResponse = serde_json::from_str(body)?;

    let text = response
        .content
        .into_iter()
        .filter(|block| block.block_type == "text")
        .filter_map(|block| block.text)
        .collect::<Vec<_>>()
        .join("\n");
    let usage = response.usage.unwrap_or_default();

    Ok(RepoAnalysis {
        repository: repository.to_string(),
        model: response.model,
        text,
        input_tokens: usage.input_tokens,
        output_tokens: usage.output_tokens,
        analyzed_at: Utc::now(),
    })
}

fn describe_error(status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => format!(
            "{} ({}): {}",
            status, envelope.error.error_type, envelope.error.message
        ),
        Err(_) => format!("{}: {}", status, body),
    }
}
