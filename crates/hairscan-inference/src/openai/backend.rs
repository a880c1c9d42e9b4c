//! OpenAI-compatible completion client.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use hairscan_core::defaults::{
    ADVICE_MAX_TOKENS, ADVICE_TEMPERATURE, API_TIMEOUT_SECS, API_URL, CHAT_COMPLETIONS_PATH,
    PLACEHOLDER_API_KEY, TEXT_MODEL, VISION_MAX_TOKENS, VISION_MODEL, VISION_TEMPERATURE,
    WIRE_IMAGE_MIME,
};
use hairscan_core::{
    AdviceResult, AnalysisBackend, AnalysisResult, ApiStatus, Error, Result,
};

use super::error::to_transport_error;
use super::types::*;
use crate::extraction::extract_json_with_strategy;
use crate::prompts::{advice_prompt, FEATURE_EXTRACTION_PROMPT};
use crate::schema::{parse_advice, parse_analysis};

/// Configuration for the OpenAI-compatible client.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAIConfig {
    /// Base URL for the API endpoint.
    pub base_url: String,
    /// API key sent as a bearer token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Vision-capable model for feature extraction.
    pub vision_model: String,
    /// Text model for advice generation.
    pub text_model: String,
    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
    /// Skip TLS verification (for self-signed certs in local environments).
    pub skip_tls_verify: bool,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            base_url: API_URL.to_string(),
            api_key: None,
            vision_model: VISION_MODEL.to_string(),
            text_model: TEXT_MODEL.to_string(),
            timeout_seconds: API_TIMEOUT_SECS,
            skip_tls_verify: false,
        }
    }
}

impl OpenAIConfig {
    /// A key is usable when present, non-blank, not the placeholder, and not
    /// a `${VAR}` reference left unresolved by config substitution.
    pub fn is_configured(&self) -> bool {
        let Some(key) = self.api_key.as_deref().map(str::trim) else {
            return false;
        };
        !key.is_empty() && key != PLACEHOLDER_API_KEY && !is_unresolved_env_ref(key)
    }
}

fn is_unresolved_env_ref(key: &str) -> bool {
    key.starts_with("${") && key.ends_with('}')
}

impl std::fmt::Debug for OpenAIConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAIConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("vision_model", &self.vision_model)
            .field("text_model", &self.text_model)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("skip_tls_verify", &self.skip_tls_verify)
            .finish()
    }
}

/// OpenAI-compatible client for feature extraction and advice generation.
pub struct OpenAIBackend {
    client: Client,
    config: OpenAIConfig,
}

impl OpenAIBackend {
    /// Create a new client with the given configuration.
    pub fn new(config: OpenAIConfig) -> Result<Self> {
        let mut client_builder =
            Client::builder().timeout(Duration::from_secs(config.timeout_seconds));

        if config.skip_tls_verify {
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            subsystem = "inference",
            component = "openai",
            url = %config.base_url,
            vision_model = %config.vision_model,
            text_model = %config.text_model,
            configured = config.is_configured(),
            "Initializing completion client"
        );

        Ok(Self { client, config })
    }

    /// Create with default configuration (no API key).
    pub fn with_defaults() -> Result<Self> {
        Self::new(OpenAIConfig::default())
    }

    /// Get the current configuration.
    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }

    pub fn status(&self) -> ApiStatus {
        ApiStatus::from_configured(self.config.is_configured())
    }

    fn ensure_configured(&self) -> Result<()> {
        if self.config.is_configured() {
            Ok(())
        } else {
            Err(Error::Config(
                "API key is not configured; set HAIRSCAN_API_KEY".to_string(),
            ))
        }
    }

    /// Build a request with authentication.
    fn build_request(&self, endpoint: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint);
        let mut req = self.client.post(&url);

        if let Some(ref api_key) = self.config.api_key {
            req = req.header("Authorization", format!("Bearer {}", api_key.trim()));
        }

        req.header("Content-Type", "application/json")
    }

    /// Send one chat completion and return the reply text.
    async fn complete(&self, request: &ChatCompletionRequest) -> Result<String> {
        let started = Instant::now();

        let response = self
            .build_request(CHAT_COMPLETIONS_PATH)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let (code, err) = to_transport_error(status, &body);
            warn!(
                subsystem = "inference",
                component = "openai",
                model = %request.model,
                status = status.as_u16(),
                retryable = code.is_retryable(),
                "Completion API returned an error"
            );
            return Err(err);
        }

        let result: ChatCompletionResponse = serde_json::from_str(&body).map_err(|e| {
            Error::transport(
                Some(status.as_u16()),
                format!("Failed to parse response: {}", e),
            )
        })?;

        let content = result
            .first_content()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or(Error::EmptyResponse)?
            .to_string();

        debug!(
            subsystem = "inference",
            component = "openai",
            model = %request.model,
            response_len = content.len(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Completion received"
        );
        Ok(content)
    }
}

/// Base64-encode raw image bytes.
pub fn encode_image(image: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(image)
}

/// Wrap a base64 payload in the data URL the vision model expects.
///
/// An existing `data:...;base64,` prefix is replaced, so callers may pass
/// either a bare payload or a browser-style data URL.
pub fn image_data_url(payload: &str) -> String {
    let bare = match payload.strip_prefix("data:") {
        Some(rest) => rest.split_once(',').map(|(_, data)| data).unwrap_or(rest),
        None => payload,
    };
    format!("data:{};base64,{}", WIRE_IMAGE_MIME, bare)
}

#[async_trait]
impl AnalysisBackend for OpenAIBackend {
    fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    async fn extract_features(&self, image: &[u8]) -> Result<AnalysisResult> {
        self.ensure_configured()?;

        debug!(
            subsystem = "inference",
            component = "openai",
            op = "extract_features",
            model = %self.config.vision_model,
            image_bytes = image.len(),
            "Requesting feature extraction"
        );

        let request = ChatCompletionRequest {
            model: self.config.vision_model.clone(),
            messages: vec![ChatMessage::user(vec![
                ContentPart::text(FEATURE_EXTRACTION_PROMPT),
                ContentPart::image_url(image_data_url(&encode_image(image))),
            ])],
            max_tokens: Some(VISION_MAX_TOKENS),
            temperature: Some(VISION_TEMPERATURE),
        };

        let content = self.complete(&request).await?;
        let (object, strategy) = extract_json_with_strategy(&content)?;
        let analysis = parse_analysis(&object)?;

        debug!(
            op = "extract_features",
            strategy = %strategy,
            stage = analysis.raw_stage,
            "Feature extraction parsed"
        );
        Ok(analysis)
    }

    async fn generate_advice(&self, analysis: &AnalysisResult) -> Result<AdviceResult> {
        self.ensure_configured()?;

        let prompt = advice_prompt(analysis)?;
        debug!(
            subsystem = "inference",
            component = "openai",
            op = "generate_advice",
            model = %self.config.text_model,
            prompt_len = prompt.len(),
            "Requesting advice"
        );

        let request = ChatCompletionRequest {
            model: self.config.text_model.clone(),
            messages: vec![ChatMessage::user(prompt)],
            max_tokens: Some(ADVICE_MAX_TOKENS),
            temperature: Some(ADVICE_TEMPERATURE),
        };

        let content = self.complete(&request).await?;
        let (object, strategy) = extract_json_with_strategy(&content)?;
        let advice = parse_advice(&object)?;

        debug!(op = "generate_advice", strategy = %strategy, "Advice parsed");
        Ok(advice)
    }

    fn vision_model(&self) -> &str {
        &self.config.vision_model
    }

    fn text_model(&self) -> &str {
        &self.config.text_model
    }
}
