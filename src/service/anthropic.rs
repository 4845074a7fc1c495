//! Era classification over the Anthropic Messages API (blocking).

use crate::config::ClassifierConfig;
use crate::era::{ClassifyError, EraClassifier};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::debug;

const API_VERSION: &str = "2023-06-01";

#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [ApiMessage<'a>; 1],
}

#[derive(Serialize)]
struct ApiMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Classifier backed by the Messages API.
#[derive(Clone)]
pub struct AnthropicClassifier {
    agent: ureq::Agent,
    api_key: String,
    endpoint: String,
    model: String,
    max_tokens: u32,
}

impl AnthropicClassifier {
    /// Build a client from config, reading the key from the configured
    /// environment variable.
    pub fn from_config(config: &ClassifierConfig) -> Result<Self, ClassifyError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ClassifyError::MissingApiKey(config.api_key_env.clone()))?;

        Ok(Self::new(api_key, config))
    }

    /// Build a client with an explicit key.
    pub fn new(api_key: impl Into<String>, config: &ClassifierConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build();
        Self {
            agent,
            api_key: api_key.into(),
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        }
    }
}

impl fmt::Debug for AnthropicClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnthropicClassifier")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .finish_non_exhaustive()
    }
}

impl EraClassifier for AnthropicClassifier {
    fn classify(&self, prompt: &str) -> Result<String, ClassifyError> {
        let request = ApiRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: [ApiMessage {
                role: "user",
                content: prompt,
            }],
        };

        debug!(model = %self.model, prompt_len = prompt.len(), "Sending classification request");

        let response = self
            .agent
            .post(&self.endpoint)
            .set("x-api-key", &self.api_key)
            .set("anthropic-version", API_VERSION)
            .set("content-type", "application/json")
            .send_json(&request);

        match response {
            Ok(resp) => {
                let body: ApiResponse = resp
                    .into_json()
                    .map_err(|e| ClassifyError::Decode(e.to_string()))?;
                Ok(reply_text(body))
            }
            Err(ureq::Error::Status(status, resp)) => {
                let message = resp
                    .into_json::<ApiError>()
                    .map(|err| err.error.message)
                    .unwrap_or_else(|_| format!("HTTP {status}"));
                Err(ClassifyError::Status { status, message })
            }
            Err(e) => Err(ClassifyError::Transport(e.to_string())),
        }
    }
}

/// Concatenated text blocks of a reply.
fn reply_text(body: ApiResponse) -> String {
    body.content
        .into_iter()
        .filter(|block| block.content_type == "text")
        .filter_map(|block| block.text)
        .collect::<Vec<_>>()
        .join("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn reply_text_joins_text_blocks_only() {
        let body: ApiResponse = serde_json::from_str(
            r#"{"content": [
                {"type": "text", "text": "{\"books\": "},
                {"type": "tool_use", "id": "x", "name": "y", "input": {}},
                {"type": "text", "text": "[]}"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(reply_text(body), "{\"books\": []}");
    }

    #[test]
    fn request_serializes_single_user_message() {
        let request = ApiRequest {
            model: "m",
            max_tokens: 1000,
            messages: [ApiMessage {
                role: "user",
                content: "prompt",
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "m");
        assert_eq!(json["max_tokens"], 1000);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "prompt");
    }

    #[test]
    #[serial(env)]
    fn missing_key_is_reported_with_variable_name() {
        let config = ClassifierConfig {
            api_key_env: "CHRONICLE_TEST_UNSET_API_KEY".to_string(),
            ..ClassifierConfig::default()
        };
        std::env::remove_var(&config.api_key_env);

        let err = AnthropicClassifier::from_config(&config).unwrap_err();
        assert!(matches!(err, ClassifyError::MissingApiKey(ref name) if name == "CHRONICLE_TEST_UNSET_API_KEY"));
    }

    #[test]
    #[serial(env)]
    fn key_is_read_from_configured_variable() {
        let config = ClassifierConfig {
            api_key_env: "CHRONICLE_TEST_API_KEY".to_string(),
            ..ClassifierConfig::default()
        };
        std::env::set_var(&config.api_key_env, "sk-test");

        let client = AnthropicClassifier::from_config(&config).unwrap();
        assert_eq!(client.api_key, "sk-test");

        std::env::remove_var(&config.api_key_env);
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let client = AnthropicClassifier::new("sk-ant-secret", &ClassifierConfig::default());
        let debug = format!("{client:?}");
        assert!(!debug.contains("sk-ant-secret"), "{debug}");
        assert!(debug.contains("<redacted>"));
        assert!(debug.contains(&ClassifierConfig::default().model));
    }
}
