//! Chat-completion backend
//!
//! One `POST {base_url}/chat/completions` per document; the first choice's
//! message content is the raw suggestion batch.

use crate::error::{SuggestError, SuggestResult};
use crate::prompt::Prompt;
use crate::{LabelSuggester, SuggestionRequest};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Chat-completion settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    /// Model name
    pub model: String,
    /// Completion token limit; keeps answers to a short keyword list
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// API root, without trailing slash
    pub base_url: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Request timeout; `None` waits indefinitely
    pub timeout_secs: Option<u64>,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            max_tokens: 15,
            temperature: 0.0,
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_KEY".to_string(),
            timeout_secs: None,
        }
    }
}

impl OpenAiConfig {
    /// With model
    #[inline]
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// With API root
    #[inline]
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    n: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl ChatResponse {
    fn into_content(self) -> SuggestResult<String> {
        self.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.unwrap_or_default())
            .ok_or(SuggestError::NoChoices)
    }
}

/// Label suggester backed by an OpenAI-compatible chat-completion API
#[derive(Debug, Clone)]
pub struct OpenAiSuggester {
    client: reqwest::Client,
    config: OpenAiConfig,
    api_key: String,
}

impl OpenAiSuggester {
    /// Create suggester with an explicit API key
    ///
    /// # Errors
    /// `SuggestError::Http` if the HTTP client cannot be built.
    pub fn new(config: OpenAiConfig, api_key: impl Into<String>) -> SuggestResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            client: builder.build()?,
            config,
            api_key: api_key.into(),
        })
    }

    /// Create suggester reading the API key from `config.api_key_env`
    ///
    /// # Errors
    /// - `SuggestError::MissingApiKey` if the variable is unset or empty
    /// - `SuggestError::Http` if the HTTP client cannot be built
    pub fn from_env(config: OpenAiConfig) -> SuggestResult<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| SuggestError::missing_api_key(&config.api_key_env))?;
        Self::new(config, api_key)
    }

    /// Settings in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    fn headers(&self) -> SuggestResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
            .map_err(|e| SuggestError::Backend(format!("invalid API key header: {e}")))?;
        headers.insert(AUTHORIZATION, bearer);
        Ok(headers)
    }
}

#[async_trait]
impl LabelSuggester for OpenAiSuggester {
    async fn suggest(&self, request: &SuggestionRequest) -> SuggestResult<String> {
        let prompt = Prompt::for_request(request);
        let body = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            max_tokens: self.config.max_tokens,
            n: 1,
            temperature: self.config.temperature,
        };

        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        tracing::debug!(title = %request.title, model = %self.config.model, "requesting label suggestions");

        let response = self
            .client
            .post(url)
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorResponse>()
                .await
                .map_or_else(|_| "unknown error".to_string(), |body| body.error.message);
            return Err(SuggestError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let reply: ChatResponse = response.json().await?;
        reply.into_content()
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_config_matches_service_constants() {
        let config = OpenAiConfig::default();
        assert_eq!(config.model, "gpt-3.5-turbo");
        assert_eq!(config.max_tokens, 15);
        assert_eq!(config.temperature, 0.0);
        assert_eq!(config.api_key_env, "OPENAI_KEY");
        assert_eq!(config.timeout_secs, None);
    }

    #[test]
    fn request_body_shape() {
        let body = ChatRequest {
            model: "gpt-3.5-turbo",
            messages: [
                ChatMessage {
                    role: "system",
                    content: "sys",
                },
                ChatMessage {
                    role: "user",
                    content: "usr",
                },
            ],
            max_tokens: 15,
            n: 1,
            temperature: 0.0,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "model": "gpt-3.5-turbo",
                "messages": [
                    { "role": "system", "content": "sys" },
                    { "role": "user", "content": "usr" }
                ],
                "max_tokens": 15,
                "n": 1,
                "temperature": 0.0
            })
        );
    }

    #[test]
    fn response_first_choice_content() {
        let reply: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"Belief, Wonder"}},
                           {"message":{"role":"assistant","content":"ignored"}}]}"#,
        )
        .unwrap();
        assert_eq!(reply.into_content().unwrap(), "Belief, Wonder");
    }

    #[test]
    fn response_without_choices() {
        let reply: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(reply.into_content(), Err(SuggestError::NoChoices)));
    }

    #[test]
    fn null_content_is_empty_batch() {
        let reply: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert_eq!(reply.into_content().unwrap(), "");
    }

    #[test]
    fn config_from_partial_toml_like_json() {
        let config: OpenAiConfig = serde_json::from_str(r#"{"model":"gpt-4o-mini"}"#).unwrap();
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.max_tokens, 15);
    }

    #[test]
    fn from_env_requires_key() {
        let config = OpenAiConfig {
            api_key_env: "TAGFLARE_TEST_UNSET_KEY".to_string(),
            ..OpenAiConfig::default()
        };
        let err = OpenAiSuggester::from_env(config).unwrap_err();
        assert!(matches!(err, SuggestError::MissingApiKey { .. }));
    }
}
