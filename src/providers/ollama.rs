use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::app_config::OllamaConfig;
use crate::errors::{I18nError, ProviderError};
use crate::language_utils;
use crate::providers::TranslationProvider;
use crate::translation::language_pair::LanguagePair;

/// Ollama client for interacting with Ollama API
#[derive(Debug)]
pub struct Ollama {
    /// Base URL of the Ollama API, without trailing slash
    base_url: String,
    /// HTTP client for making requests
    client: Client,
}

/// Generate request for the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Model name to use for generation
    model: String,
    /// Prompt to generate from
    prompt: String,
    /// System message to guide the model
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    /// Additional model parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerationOptions>,
    /// Whether to stream the response
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
    /// How long to keep the model loaded in memory
    #[serde(skip_serializing_if = "Option::is_none")]
    keep_alive: Option<String>,
}

/// Generation options for the Ollama API
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Temperature for generation (default: 0.8)
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Generation response from the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Model name
    pub model: String,
    /// Generated text
    pub response: String,
    /// Whether the generation is complete
    #[serde(default)]
    pub done: bool,
    /// Number of prompt tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_eval_count: Option<u64>,
    /// Number of generated tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eval_count: Option<u64>,
}

impl GenerationRequest {
    /// Create a new non-streaming generation request
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            system: None,
            options: None,
            stream: Some(false),
            keep_alive: None,
        }
    }

    /// Set the system prompt
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.options.get_or_insert_with(GenerationOptions::default).temperature = Some(temperature);
        self
    }

    /// Set the keep-alive duration
    pub fn keep_alive(mut self, keep_alive: impl Into<String>) -> Self {
        self.keep_alive = Some(keep_alive.into());
        self
    }
}

impl Ollama {
    /// Create a client for the server at `endpoint`
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, ProviderError> {
        let url = Url::parse(endpoint)
            .map_err(|e| ProviderError::RequestFailed(format!("Invalid Ollama endpoint '{}': {}", endpoint, e)))?;

        let client = Client::builder()
            .timeout(timeout)
            // Ollama uses HTTP/1.1
            .http1_only()
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| ProviderError::RequestFailed(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: url.as_str().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Base URL requests are sent to
    pub fn endpoint(&self) -> &str {
        &self.base_url
    }

    /// Get the Ollama API version
    pub async fn version(&self) -> Result<String, ProviderError> {
        let url = format!("{}/api/version", self.base_url);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        let body: serde_json::Value = response.json().await?;
        body["version"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ProviderError::ParseError("Invalid version format in response".to_string()))
    }

    /// Generate text from the Ollama API. One attempt, no retry.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, ProviderError> {
        let url = format!("{}/api/generate", self.base_url);
        let response = self.client.post(&url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Ollama API error ({}): {}", status, message);
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        parse_generation_body(&body)
    }
}

/// Parse a generate response body.
///
/// Servers normally answer a non-streaming request with one JSON object, but
/// some proxies force streaming; in that case the body is JSON lines and the
/// `response` fragments are concatenated.
pub fn parse_generation_body(body: &str) -> Result<GenerationResponse, ProviderError> {
    let single_error = match serde_json::from_str::<GenerationResponse>(body) {
        Ok(parsed) => return Ok(parsed),
        Err(e) => e,
    };

    let chunks: Vec<GenerationResponse> = body
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect();

    let Some(last) = chunks.last() else {
        let preview: String = body.chars().take(500).collect();
        error!("Failed to parse Ollama API response: {}. Raw response (first 500 chars): {}", single_error, preview);
        return Err(ProviderError::ParseError(single_error.to_string()));
    };

    Ok(GenerationResponse {
        model: last.model.clone(),
        response: chunks.iter().map(|chunk| chunk.response.as_str()).collect(),
        done: last.done,
        prompt_eval_count: last.prompt_eval_count,
        eval_count: last.eval_count,
    })
}

/// Session opened by `OllamaProvider`: the pair and its system prompt
#[derive(Debug, Clone)]
pub struct OllamaSession {
    pair: LanguagePair,
    system_prompt: String,
}

impl OllamaSession {
    pub fn pair(&self) -> &LanguagePair {
        &self.pair
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }
}

/// Remote translation provider backed by an Ollama model
#[derive(Debug)]
pub struct OllamaProvider {
    client: Ollama,
    model: String,
    temperature: f32,
    keep_alive: Option<String>,
}

impl OllamaProvider {
    pub fn new(client: Ollama, model: impl Into<String>, temperature: f32) -> Self {
        Self {
            client,
            model: model.into(),
            temperature,
            keep_alive: None,
        }
    }

    /// Build a provider from the `ollama` configuration section
    pub fn from_config(config: &OllamaConfig) -> Result<Self, ProviderError> {
        let client = Ollama::new(&config.endpoint, Duration::from_secs(config.timeout_secs))?;
        let provider = Self::new(client, config.model.clone(), config.temperature);
        Ok(match &config.keep_alive {
            Some(keep_alive) => provider.with_keep_alive(keep_alive.as_str()),
            None => provider,
        })
    }

    /// Ask the server to keep the model loaded for `keep_alive` after each request
    pub fn with_keep_alive(mut self, keep_alive: impl Into<String>) -> Self {
        self.keep_alive = Some(keep_alive.into());
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn generation_request(&self, session: &OllamaSession, text: &str) -> GenerationRequest {
        let request = GenerationRequest::new(self.model.as_str(), text)
            .system(session.system_prompt.as_str())
            .temperature(self.temperature);

        match &self.keep_alive {
            Some(keep_alive) => request.keep_alive(keep_alive.as_str()),
            None => request,
        }
    }
}

/// System prompt instructing the model to translate between the pair's languages
pub fn system_prompt(pair: &LanguagePair) -> String {
    format!(
        "You are a professional translator. Translate the user's text from {} to {}. \
         Reply with the translation only, preserving formatting, numbers and placeholders.",
        language_utils::display_name(pair.source_language()),
        language_utils::display_name(pair.target_language()),
    )
}

#[async_trait]
impl TranslationProvider for OllamaProvider {
    type Session = OllamaSession;

    fn name(&self) -> &str {
        "ollama"
    }

    async fn create_session(&self, pair: &LanguagePair) -> Result<Self::Session, I18nError> {
        match self.client.version().await {
            Ok(version) => debug!("Ollama {} reachable at {}", version, self.client.endpoint()),
            Err(ProviderError::ConnectionError(reason)) => {
                error!("Ollama unreachable at {}: {}", self.client.endpoint(), reason);
                return Err(I18nError::CapabilityUnavailable {
                    capability: self.client.endpoint().to_string(),
                });
            }
            Err(other) => return Err(I18nError::session_creation_failed(pair, other)),
        }

        Ok(OllamaSession {
            pair: pair.clone(),
            system_prompt: system_prompt(pair),
        })
    }

    async fn translate(&self, session: &Self::Session, text: &str) -> Result<String, I18nError> {
        let request = self.generation_request(session, text);

        let response = self
            .client
            .generate(&request)
            .await
            .map_err(|e| I18nError::translation_failed(&session.pair, text, e))?;

        Ok(response.response.trim().to_string())
    }
}
