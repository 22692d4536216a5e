use crate::error::{InsightError, Result};
use std::fmt;
use std::time::Duration;

#[cfg(feature = "gemini")]
use crate::llm::{comparison::ContentGenerator, types::*};
#[cfg(feature = "gemini")]
use async_trait::async_trait;
#[cfg(feature = "gemini")]
use log::debug;
#[cfg(feature = "gemini")]
use reqwest::Client;

pub const ENV_API_URL: &str = "GEMINI_API_URL";
pub const ENV_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_TIMEOUT_SECS: &str = "GEMINI_TIMEOUT_SECS";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Endpoint and credentials for the language model service.
#[derive(Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    /// Full `generateContent` URL, e.g.
    /// `https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent`.
    pub endpoint: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| InsightError::Configuration(format!("{} is not set", key)))
        };

        let endpoint = required(ENV_API_URL)?;
        let api_key = required(ENV_API_KEY)?;

        let timeout = match lookup(ENV_TIMEOUT_SECS) {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    InsightError::Configuration(format!(
                        "{} must be a whole number of seconds, got '{}'",
                        ENV_TIMEOUT_SECS, raw
                    ))
                })?;
                Duration::from_secs(secs)
            }
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            endpoint,
            api_key,
            timeout,
        })
    }

    pub fn request_url(&self) -> String {
        format!("{}?key={}", self.endpoint, self.api_key)
    }
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(feature = "gemini")]
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
}

#[cfg(feature = "gemini")]
impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                InsightError::Configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(GeminiConfig::from_env()?)
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }
}

#[cfg(feature = "gemini")]
fn transport_error(e: reqwest::Error) -> InsightError {
    if e.is_timeout() {
        InsightError::UpstreamUnavailable(format!("Gemini request timed out: {}", e))
    } else {
        InsightError::UpstreamUnavailable(format!("Gemini request failed: {}", e))
    }
}

#[cfg(feature = "gemini")]
#[async_trait]
impl ContentGenerator for GeminiClient {
    async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        debug!("Sending generateContent request to {}", self.config.endpoint);

        let res = self
            .client
            .post(self.config.request_url())
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = res.status();
        let body = res.text().await.map_err(transport_error)?;

        if !status.is_success() {
            return Err(InsightError::UpstreamUnavailable(format!(
                "Gemini API Error (status {}): {}",
                status, body
            )));
        }

        serde_json::from_str(&body).map_err(|e| {
            InsightError::UpstreamProtocolError(format!("Undecodable Gemini reply: {}", e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_config_from_lookup() {
        let config = GeminiConfig::from_lookup(lookup_from(&[
            (ENV_API_URL, "https://example.test/models/m:generateContent"),
            (ENV_API_KEY, "secret"),
        ]))
        .unwrap();

        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(
            config.request_url(),
            "https://example.test/models/m:generateContent?key=secret"
        );
    }

    #[test]
    fn test_config_missing_key() {
        let err = GeminiConfig::from_lookup(lookup_from(&[(ENV_API_URL, "https://example.test")]))
            .unwrap_err();
        assert!(matches!(err, InsightError::Configuration(msg) if msg.contains(ENV_API_KEY)));
    }

    #[test]
    fn test_config_timeout_override() {
        let config = GeminiConfig::from_lookup(lookup_from(&[
            (ENV_API_URL, "https://example.test"),
            (ENV_API_KEY, "k"),
            (ENV_TIMEOUT_SECS, "30"),
        ]))
        .unwrap();
        assert_eq!(config.timeout, Duration::from_secs(30));

        let err = GeminiConfig::from_lookup(lookup_from(&[
            (ENV_API_URL, "https://example.test"),
            (ENV_API_KEY, "k"),
            (ENV_TIMEOUT_SECS, "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, InsightError::Configuration(_)));
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = GeminiConfig::new("https://example.test", "top-secret");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("top-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[cfg(feature = "gemini")]
    mod http {
        use super::*;
        use crate::llm::comparison::ContentGenerator;
        use crate::llm::extractor::extract_json;
        use crate::llm::types::GenerateContentRequest;
        use serde_json::json;
        use wiremock::matchers::{method, path, query_param};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        const MODEL_PATH: &str = "/v1beta/models/test:generateContent";

        fn client_for(server: &MockServer, timeout: Duration) -> GeminiClient {
            let config = GeminiConfig::new(format!("{}{}", server.uri(), MODEL_PATH), "secret")
                .with_timeout(timeout);
            GeminiClient::new(config).unwrap()
        }

        fn request() -> GenerateContentRequest {
            GenerateContentRequest::user_prompt("compare these plans")
        }

        #[tokio::test]
        async fn test_reply_is_decoded_and_key_is_sent() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path(MODEL_PATH))
                .and(query_param("key", "secret"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "candidates": [{
                        "content": {"role": "model", "parts": [{"text": "{\"insurance_plans\": []}"}]},
                        "finishReason": "STOP"
                    }]
                })))
                .expect(1)
                .mount(&server)
                .await;

            let client = client_for(&server, DEFAULT_TIMEOUT);
            assert_eq!(client.config().timeout, DEFAULT_TIMEOUT);

            let reply = client.generate_content(&request()).await.unwrap();
            assert_eq!(extract_json(&reply).unwrap(), "{\"insurance_plans\": []}");
        }

        #[tokio::test]
        async fn test_server_error_is_unavailable() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
                .mount(&server)
                .await;

            let err = client_for(&server, DEFAULT_TIMEOUT)
                .generate_content(&request())
                .await
                .unwrap_err();
            assert!(err.is_retryable());
            assert!(matches!(err, InsightError::UpstreamUnavailable(msg) if msg.contains("500")));
        }

        #[tokio::test]
        async fn test_non_json_body_is_protocol_error() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
                .mount(&server)
                .await;

            let err = client_for(&server, DEFAULT_TIMEOUT)
                .generate_content(&request())
                .await
                .unwrap_err();
            assert!(matches!(err, InsightError::UpstreamProtocolError(_)));
        }

        #[tokio::test]
        async fn test_timeout_is_unavailable() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_json(json!({"candidates": []}))
                        .set_delay(Duration::from_secs(2)),
                )
                .mount(&server)
                .await;

            let err = client_for(&server, Duration::from_millis(100))
                .generate_content(&request())
                .await
                .unwrap_err();
            assert!(matches!(err, InsightError::UpstreamUnavailable(msg) if msg.contains("timed out")));
        }
    }
}
