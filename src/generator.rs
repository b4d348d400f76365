//! # Text Generation Collaborator
//!
//! The pipeline treats text generation as a black box: one prompt in, one
//! string out. [`TextGenerator`] is that seam. [`HttpTextGenerator`] talks to an
//! OpenAI-compatible chat completions endpoint; tests plug in canned responses.
//! No retries happen at this layer.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use lazy_static::lazy_static;
use log::{debug, info};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::extraction_config::GeneratorConfig;

lazy_static! {
    static ref URL_REGEX: Regex =
        Regex::new(r"(?i)^https?://[^\s/$.?#][^\s]*$").expect("URL pattern should be valid");
}

/// Where the recipe to extract comes from
#[derive(Debug, Clone, PartialEq)]
pub enum SourceLocator {
    Url(String),
    Text(String),
}

impl SourceLocator {
    /// Treat the input as a URL when the whole trimmed input is one
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if URL_REGEX.is_match(trimmed) {
            SourceLocator::Url(trimmed.to_string())
        } else {
            SourceLocator::Text(trimmed.to_string())
        }
    }
}

const RECIPE_SCHEMA: &str = r#"{
  "name": "string",
  "instructions": "string",
  "servingQuantity": "positive integer",
  "dishType": "string",
  "ingredients": [{"name": "string", "amount": "number"}]
}"#;

/// Render the extraction request sent to the text generator
pub fn build_extraction_prompt(source: &SourceLocator) -> String {
    let locator = match source {
        SourceLocator::Url(url) => format!("Extract the recipe published at this URL: {url}"),
        SourceLocator::Text(text) => format!("Extract the recipe from this text:\n\n{text}"),
    };

    format!(
        "{locator}\n\n\
         Return ONLY one JSON object matching this schema, with no other text:\n\
         {RECIPE_SCHEMA}\n\n\
         Use the plainest common name for each ingredient (for example \"flour\", not \
         \"2 cups sifted flour\") and give each amount as a number."
    )
}

/// Anything that turns a prompt into free-form text
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// Text generator backed by an OpenAI-compatible HTTP endpoint
pub struct HttpTextGenerator {
    client: reqwest::Client,
    config: GeneratorConfig,
}

impl HttpTextGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, config })
    }

    fn request_body<'a>(&'a self, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: 0.0,
        }
    }
}

#[async_trait]
impl TextGenerator for HttpTextGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        info!(
            "Requesting extraction from {} (model {})",
            self.config.endpoint, self.config.model
        );

        let mut request = self
            .client
            .post(&self.config.endpoint)
            .json(&self.request_body(prompt));
        if let Some(api_key) = &self.config.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request
            .send()
            .await
            .context("Text generation request failed")?
            .error_for_status()
            .context("Text generation endpoint returned an error")?;
        let body: ChatResponse = response
            .json()
            .await
            .context("Failed to decode text generation response")?;

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| anyhow!("Text generation response contained no message"))?;

        debug!("Received {} characters from text generator", content.len());
        Ok(content)
    }
}
