//! Core `TextCorrector` trait and the `GeminiClient` implementation.
//!
//! `GeminiClient` talks to the Generative Language API
//! `POST /v1beta/models/{model}:generateContent?key={api_key}`.
//! The key travels as a URL query parameter, never as a header.
//! Host and model come from [`ApiConfig`].

use async_trait::async_trait;
use thiserror::Error;

use crate::config::ApiConfig;
use crate::llm::prompt::{self, CORRECTION_CONFIG, PROBE_CONFIG, PROBE_PROMPT};
use crate::llm::wire::{ErrorEnvelope, GenerateRequest, GenerateResponse};

/// Message used when a non-2xx body carries no `error.message`.
pub const UNKNOWN_ERROR: &str = "Unknown error";

// ---------------------------------------------------------------------------
// CorrectionError
// ---------------------------------------------------------------------------

/// Errors that can occur during a correction call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CorrectionError {
    /// No credential was supplied.
    #[error("API key not set")]
    MissingCredential,

    /// The input failed a precondition (blank, or equal to the credential).
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    /// The endpoint answered with a non-2xx status.
    #[error("API Error: {0}")]
    RemoteService(String),

    /// A 2xx answer whose body did not have the expected shape.
    #[error("Unexpected API response format: {0}")]
    MalformedResponse(String),

    /// The HTTP exchange itself failed (DNS, connect, TLS, timeout).
    #[error("request failed: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for CorrectionError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            CorrectionError::Transport("request timed out".into())
        } else {
            CorrectionError::Transport(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// TextCorrector trait
// ---------------------------------------------------------------------------

/// Remote grammar correction.
///
/// Implementors must be `Send + Sync` so they can be shared across tasks
/// behind an `Arc<dyn TextCorrector>`.
#[async_trait]
pub trait TextCorrector: Send + Sync {
    /// Probe the endpoint with `candidate` as the key.
    ///
    /// Returns `true` only for a 2xx reply whose text contains the sentinel.
    /// Every failure is reported as `false`; this never errors.
    async fn validate_credential(&self, candidate: &str) -> bool;

    /// Correct `text` using `credential`.
    ///
    /// Returns `text` unchanged when the model replies with nothing or with
    /// the same text.
    async fn correct(&self, text: &str, credential: &str) -> Result<String, CorrectionError>;
}

// ---------------------------------------------------------------------------
// GeminiClient
// ---------------------------------------------------------------------------

/// `generateContent` client.
pub struct GeminiClient {
    client: reqwest::Client,
    endpoint: String,
}

impl GeminiClient {
    /// Build a client for `base_url` / `model`.
    ///
    /// `timeout_secs = None` keeps reqwest's default (no overall timeout).
    pub fn new(base_url: &str, model: &str, timeout_secs: Option<u64>) -> Self {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(secs));
        }
        let client = builder.build().unwrap_or_else(|_| reqwest::Client::new());

        let endpoint = format!(
            "{}/v1beta/models/{}:generateContent",
            base_url.trim_end_matches('/'),
            model
        );

        Self { client, endpoint }
    }

    /// Build a `GeminiClient` from application config.
    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(&config.base_url, &config.model, config.timeout_secs)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn send(
        &self,
        body: &GenerateRequest,
        key: &str,
    ) -> Result<reqwest::Response, reqwest::Error> {
        self.client
            .post(&self.endpoint)
            .query(&[("key", key)])
            .json(body)
            .send()
            .await
    }
}

#[async_trait]
impl TextCorrector for GeminiClient {
    async fn validate_credential(&self, candidate: &str) -> bool {
        let body = GenerateRequest::single(PROBE_PROMPT.to_string(), PROBE_CONFIG);

        let response = match self.send(&body, candidate).await {
            Ok(r) => r,
            Err(e) => {
                log::warn!("llm: credential probe failed to send: {e}");
                return false;
            }
        };

        if !response.status().is_success() {
            log::info!("llm: credential probe rejected ({})", response.status());
            return false;
        }

        match response.json::<GenerateResponse>().await {
            Ok(parsed) => parsed.first_text().is_some_and(prompt::is_probe_reply),
            Err(e) => {
                log::warn!("llm: credential probe returned unreadable body: {e}");
                false
            }
        }
    }

    async fn correct(&self, text: &str, credential: &str) -> Result<String, CorrectionError> {
        if credential.is_empty() {
            return Err(CorrectionError::MissingCredential);
        }
        if text.trim().is_empty() {
            return Err(CorrectionError::InvalidInput("no text selected"));
        }
        if text == credential {
            return Err(CorrectionError::InvalidInput("cannot process API key as input text"));
        }

        log::debug!("llm: correcting text (len={})", text.len());

        let body = GenerateRequest::single(prompt::correction_prompt(text), CORRECTION_CONFIG);
        let response = self.send(&body, credential).await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorEnvelope>()
                .await
                .ok()
                .and_then(|env| env.message().map(str::to_string))
                .unwrap_or_else(|| UNKNOWN_ERROR.to_string());
            log::warn!("llm: endpoint returned {status}: {message}");
            return Err(CorrectionError::RemoteService(message));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| CorrectionError::MalformedResponse(e.to_string()))?;

        let corrected = parsed
            .first_text()
            .ok_or_else(|| {
                CorrectionError::MalformedResponse("no candidates[0].content.parts[0].text".into())
            })?
            .trim();

        if corrected.is_empty() || corrected == text {
            log::debug!("llm: no change returned, keeping input text");
            return Ok(text.to_string());
        }

        Ok(corrected.to_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const KEY: &str = "AIza-test-key";
    const ROUTE: &str = "/v1beta/models/gemini-1.5-flash:generateContent";

    fn reply(text: &str) -> Value {
        json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] })
    }

    fn client_for(server: &MockServer) -> GeminiClient {
        GeminiClient::new(&server.uri(), "gemini-1.5-flash", Some(5))
    }

    async fn mount(server: &MockServer, response: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path(ROUTE))
            .and(query_param("key", KEY))
            .respond_with(response)
            .mount(server)
            .await;
    }

    async fn only_request_body(server: &MockServer) -> Value {
        let requests = server.received_requests().await.expect("recording enabled");
        assert_eq!(requests.len(), 1);
        serde_json::from_slice(&requests[0].body).expect("json body")
    }

    #[test]
    fn endpoint_is_built_from_config() {
        let mut cfg = ApiConfig::default();
        cfg.base_url = "https://example.test/".into();
        let client = GeminiClient::from_config(&cfg);
        assert_eq!(
            client.endpoint(),
            "https://example.test/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn client_is_object_safe() {
        let _: Box<dyn TextCorrector> = Box::new(GeminiClient::from_config(&ApiConfig::default()));
    }

    // ---- validate_credential ---------------------------------------------

    #[tokio::test]
    async fn probe_accepts_sentinel_in_any_case() {
        let server = MockServer::start().await;
        mount(&server, ResponseTemplate::new(200).set_body_json(reply("Valid"))).await;

        assert!(client_for(&server).validate_credential(KEY).await);

        let body = only_request_body(&server).await;
        assert_eq!(body["contents"][0]["parts"][0]["text"], PROBE_PROMPT);
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 10);
    }

    #[tokio::test]
    async fn probe_rejects_reply_without_sentinel() {
        let server = MockServer::start().await;
        mount(&server, ResponseTemplate::new(200).set_body_json(reply("Hello!"))).await;

        assert!(!client_for(&server).validate_credential(KEY).await);
    }

    #[tokio::test]
    async fn probe_rejects_non_success_status() {
        let server = MockServer::start().await;
        mount(
            &server,
            ResponseTemplate::new(400)
                .set_body_json(json!({ "error": { "message": "API key not valid" } })),
        )
        .await;

        assert!(!client_for(&server).validate_credential(KEY).await);
    }

    /// Address with nothing listening on it.
    fn closed_endpoint() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn credential_check_rejects_refused_connection() {
        let client = GeminiClient::new(&closed_endpoint(), "gemini-1.5-flash", Some(5));
        assert!(!client.validate_credential(KEY).await);
    }

    #[tokio::test]
    async fn correct_reports_refused_connection_as_transport_error() {
        let client = GeminiClient::new(&closed_endpoint(), "gemini-1.5-flash", Some(5));
        let err = client.correct("i has a error", KEY).await.unwrap_err();
        assert!(matches!(err, CorrectionError::Transport(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn probe_rejects_malformed_body() {
        let server = MockServer::start().await;
        mount(&server, ResponseTemplate::new(200).set_body_string("<html>valid</html>")).await;

        assert!(!client_for(&server).validate_credential(KEY).await);
    }

    #[tokio::test]
    async fn probe_rejects_missing_candidates() {
        let server = MockServer::start().await;
        mount(&server, ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] }))).await;

        assert!(!client_for(&server).validate_credential(KEY).await);
    }

    // ---- correct ---------------------------------------------------------

    #[tokio::test]
    async fn correct_returns_the_corrected_text() {
        let server = MockServer::start().await;
        mount(
            &server,
            ResponseTemplate::new(200).set_body_json(reply("I have an error.\n")),
        )
        .await;

        let out = client_for(&server).correct("i has a error", KEY).await;
        assert_eq!(out, Ok("I have an error.".to_string()));

        let body = only_request_body(&server).await;
        let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(prompt.ends_with("\n\ni has a error"));
        assert_eq!(body["generationConfig"]["topK"], 40);
        assert!(body["generationConfig"].get("maxOutputTokens").is_none());
    }

    #[tokio::test]
    async fn correct_sends_key_as_query_parameter_only() {
        let server = MockServer::start().await;
        mount(&server, ResponseTemplate::new(200).set_body_json(reply("Fine."))).await;

        client_for(&server).correct("fine", KEY).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let req = &requests[0];
        assert!(req.url.query().is_some_and(|q| q.contains("key=AIza-test-key")));
        assert!(req.headers.get("authorization").is_none());
        assert!(req.headers.get("x-goog-api-key").is_none());
    }

    #[tokio::test]
    async fn correct_keeps_input_when_model_echoes_it() {
        let server = MockServer::start().await;
        let text = "already correct text";
        mount(&server, ResponseTemplate::new(200).set_body_json(reply(text))).await;

        assert_eq!(client_for(&server).correct(text, KEY).await, Ok(text.to_string()));
    }

    #[tokio::test]
    async fn correct_keeps_input_when_model_returns_blank() {
        let server = MockServer::start().await;
        mount(&server, ResponseTemplate::new(200).set_body_json(reply("  \n"))).await;

        assert_eq!(
            client_for(&server).correct("some text", KEY).await,
            Ok("some text".to_string())
        );
    }

    #[tokio::test]
    async fn correct_surfaces_upstream_error_message() {
        let server = MockServer::start().await;
        mount(
            &server,
            ResponseTemplate::new(429)
                .set_body_json(json!({ "error": { "message": "rate limited" } })),
        )
        .await;

        let err = client_for(&server).correct("i has a error", KEY).await.unwrap_err();
        assert_eq!(err, CorrectionError::RemoteService("rate limited".into()));
    }

    #[tokio::test]
    async fn correct_uses_generic_marker_without_upstream_message() {
        let server = MockServer::start().await;
        mount(&server, ResponseTemplate::new(500).set_body_string("oops")).await;

        let err = client_for(&server).correct("text", KEY).await.unwrap_err();
        assert_eq!(err, CorrectionError::RemoteService(UNKNOWN_ERROR.into()));
    }

    #[tokio::test]
    async fn correct_reports_unexpected_shape() {
        let server = MockServer::start().await;
        mount(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({ "promptFeedback": {} })),
        )
        .await;

        let err = client_for(&server).correct("text", KEY).await.unwrap_err();
        assert!(matches!(err, CorrectionError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn correct_reports_non_json_success_body() {
        let server = MockServer::start().await;
        mount(&server, ResponseTemplate::new(200).set_body_string("not json")).await;

        let err = client_for(&server).correct("text", KEY).await.unwrap_err();
        assert!(matches!(err, CorrectionError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn correct_rejects_bad_input_without_calling_the_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply("x")))
            .expect(0)
            .mount(&server)
            .await;
        let client = client_for(&server);

        assert!(matches!(
            client.correct("   \n", KEY).await,
            Err(CorrectionError::InvalidInput(_))
        ));
        assert!(matches!(
            client.correct(KEY, KEY).await,
            Err(CorrectionError::InvalidInput(_))
        ));
        assert_eq!(
            client.correct("text", "").await,
            Err(CorrectionError::MissingCredential)
        );
    }

    #[test]
    fn remote_error_display_carries_message() {
        let err = CorrectionError::RemoteService("rate limited".into());
        assert_eq!(err.to_string(), "API Error: rate limited");
    }
}
