use std::fmt;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use ar_core::{Error, Result, RewriteModel, RewriteRequest};
use tracing::{debug, info};
use crate::Config;

const SYSTEM_PROMPT: &str =
    "You are an expert content writer specializing in SEO-optimized articles.";

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    #[serde(default)]
    content: Option<String>,
}

pub(crate) fn build_prompt(request: &RewriteRequest<'_>) -> String {
    let references = request
        .references
        .iter()
        .enumerate()
        .map(|(i, reference)| format!("Reference {}:\n{}", i + 1, reference))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "You are an expert content writer and SEO specialist.

Your task is to rewrite the following article to improve its SEO performance, readability, and engagement while maintaining accuracy.

ORIGINAL ARTICLE:
Title: {title}
Content: {content}

REFERENCE ARTICLES (for style and structure inspiration):
{references}

REQUIREMENTS:
1. Improve SEO by incorporating relevant keywords naturally
2. Enhance readability with clear structure (use headings, short paragraphs)
3. Make the content more engaging and informative
4. Match the professional tone of the reference articles
5. Keep the core message and facts accurate
6. Aim for 400-600 words
7. Use markdown formatting for structure

Please provide the rewritten article:",
        title = request.title,
        content = request.content,
    )
}

/// Chat-completions client for any OpenAI-compatible endpoint.
pub struct OpenAiModel {
    client: Client,
    api_key: String,
    base_url: String,
    model_name: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiModel {
    pub fn new(config: &Config) -> Result<Self> {
        let api_key = config
            .api_key()
            .ok_or_else(|| Error::Service("OpenAI API key is required".to_string()))?
            .to_string();
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model_name: config.model_name.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    fn chat_request(&self, request: &RewriteRequest<'_>) -> ChatRequest {
        ChatRequest {
            model: self.model_name.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: build_prompt(request),
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

impl fmt::Debug for OpenAiModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiModel")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model_name", &self.model_name)
            .finish()
    }
}

#[async_trait]
impl RewriteModel for OpenAiModel {
    fn name(&self) -> &str {
        "OpenAI"
    }

    async fn rewrite(&self, request: &RewriteRequest<'_>) -> Result<String> {
        info!(title = %request.title, model = %self.model_name, "🤖 Requesting rewrite");
        let body = self.chat_request(request);

        let response = self.client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Service(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::Service(format!("API returned {}: {}", status, detail)));
        }

        let response = response
            .json::<ChatResponse>()
            .await
            .map_err(|e| Error::Service(format!("Malformed response: {}", e)))?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| Error::Service("Response contained no completion".to_string()))?;

        debug!(chars = content.len(), "Rewrite received");
        Ok(content)
    }
}
