// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

const TEMPERATURE: f32 = 0.3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    System,
    User,
}

impl Role {
    const fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

/// Blocking client for an OpenAI-compatible `chat/completions` endpoint.
#[derive(Clone)]
pub struct Client {
    base_url: String,
    model: String,
    api_key: Option<String>,
    timeout: Duration,
    http: HttpClient,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Client {
    pub fn new(
        base_url: &str,
        model: &str,
        api_key: Option<&str>,
        timeout: Duration,
    ) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            bail!("llm.base_url must not be empty");
        }
        let parsed = Url::parse(&base_url)
            .with_context(|| format!("llm.base_url {base_url:?} is not a valid URL"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            bail!(
                "llm.base_url must use http or https, got {:?}",
                parsed.scheme()
            );
        }
        if model.trim().is_empty() {
            bail!("llm.model must not be empty");
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            model: model.trim().to_owned(),
            api_key: api_key
                .map(str::trim)
                .filter(|key| !key.is_empty())
                .map(str::to_owned),
            timeout,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn list_models(&self) -> Result<Vec<String>> {
        let response = self
            .authorized(self.http.get(format!("{}/models", self.base_url)))
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }

        let parsed: ModelsResponse = response.json().context("decode model list")?;
        Ok(parsed.data.into_iter().map(|model| model.id).collect())
    }

    /// Confirms the endpoint answers and offers the configured model.
    pub fn ping(&self) -> Result<()> {
        let models = self.list_models()?;
        if !models.iter().any(|name| name == &self.model) {
            bail!(
                "model {:?} is not offered by {} -- set [llm].model to one of: {}",
                self.model,
                self.base_url,
                preview_models(&models)
            );
        }
        Ok(())
    }

    pub fn chat_complete(&self, messages: &[Message]) -> Result<String> {
        let request = ChatRequest::new(&self.model, messages);
        let started = Instant::now();
        let response = self
            .authorized(self.http.post(format!("{}/chat/completions", self.base_url)))
            .json(&request)
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        tracing::debug!(
            model = %self.model,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "chat completion returned"
        );
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }

        let parsed: ChatCompletionResponse = response.json().context("decode chat response")?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.unwrap_or_default())
            .ok_or_else(|| anyhow!("no choices in chat response"))?;
        Ok(content)
    }

    /// One assistant turn: the context hint rides in the system message.
    pub fn generate(
        &self,
        user_message: &str,
        context_hint: &str,
        extra_context: Option<&str>,
    ) -> Result<String> {
        if !self.has_credentials() {
            bail!("no API key configured for {}", self.base_url);
        }
        let messages = build_assistant_messages(user_message, context_hint, extra_context);
        self.chat_complete(&messages)
    }

    fn authorized(
        &self,
        builder: reqwest::blocking::RequestBuilder,
    ) -> reqwest::blocking::RequestBuilder {
        match &self.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }
}

pub fn build_assistant_prompt(context_hint: &str, extra_context: Option<&str>) -> String {
    let mut out = String::new();
    out.push_str(
        "You are the assistant inside a hospital management system used by clinic staff. \
         Answer briefly and only from what you are told about the clinic.\n",
    );
    out.push_str("\n## Current view\n\n");
    let hint = context_hint.trim();
    if hint.is_empty() {
        out.push_str("(no view information)");
    } else {
        out.push_str(hint);
    }
    out.push('\n');
    if let Some(context) = extra_context
        && !context.trim().is_empty()
    {
        out.push_str("\n## Additional context\n\n");
        out.push_str(context.trim());
        out.push('\n');
    }
    out.push_str(
        "\nIf the answer is not in the information above, say so instead of guessing. \
         Never invent patient details.\n",
    );
    out
}

pub fn build_assistant_messages(
    user_message: &str,
    context_hint: &str,
    extra_context: Option<&str>,
) -> Vec<Message> {
    vec![
        Message {
            role: Role::System,
            content: build_assistant_prompt(context_hint, extra_context),
        },
        Message {
            role: Role::User,
            content: user_message.to_owned(),
        },
    ]
}

fn preview_models(models: &[String]) -> String {
    const SHOWN: usize = 5;
    if models.is_empty() {
        return "(none listed)".to_owned();
    }
    let mut out = models
        .iter()
        .take(SHOWN)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if models.len() > SHOWN {
        out.push_str(&format!(" (+{} more)", models.len() - SHOWN));
    }
    out
}

fn connection_error(base_url: &str, error: reqwest::Error) -> anyhow::Error {
    if error.is_timeout() {
        return anyhow!(
            "{} did not answer in time -- raise [llm].timeout or retry ({})",
            base_url,
            error
        );
    }
    anyhow!(
        "cannot reach {} -- check [llm].base_url and your network ({})",
        base_url,
        error
    )
}

fn clean_error_response(status: StatusCode, body: &str) -> anyhow::Error {
    if let Ok(parsed) = serde_json::from_str::<OpenAIErrorEnvelope>(body)
        && let Some(error) = parsed.error
        && !error.message.is_empty()
    {
        return anyhow!("server error ({}): {}", status.as_u16(), error.message);
    }

    if let Ok(parsed) = serde_json::from_str::<PlainErrorEnvelope>(body)
        && let Some(error) = parsed.error
        && !error.is_empty()
    {
        return anyhow!("server error ({}): {}", status.as_u16(), error);
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() && trimmed.len() < 100 && !trimmed.contains('{') {
        return anyhow!("server error ({}): {}", status.as_u16(), trimmed);
    }

    anyhow!("server returned {}", status.as_u16())
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    temperature: f32,
}

impl<'a> ChatRequest<'a> {
    fn new(model: &'a str, messages: &'a [Message]) -> Self {
        Self {
            model,
            messages: messages
                .iter()
                .map(|message| ChatMessage {
                    role: message.role.as_str(),
                    content: &message.content,
                })
                .collect(),
            stream: false,
            temperature: TEMPERATURE,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ModelsResponse {
    data: Vec<ModelRow>,
}

#[derive(Debug, Deserialize)]
struct ModelRow {
    id: String,
}

#[derive(Debug, Deserialize)]
struct OpenAIErrorEnvelope {
    error: Option<OpenAIErrorBody>,
}

#[derive(Debug, Deserialize)]
struct OpenAIErrorBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct PlainErrorEnvelope {
    error: Option<String>,
}
