use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::api::{summarize_error_body, GenerateContentRequest, GenerateContentResponse, ReplyError};
use crate::core::config::Settings;
use crate::core::errors::RemoteFailure;
use crate::core::prompt::PromptPayload;
use crate::utils::url::generate_content_url;

/// Request/response access to the remote model.
///
/// Implementations issue exactly one upstream call per invocation and never
/// retry on their own; every failure is returned to the caller.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    async fn generate(
        &self,
        payload: &PromptPayload,
        timeout: Duration,
    ) -> Result<String, RemoteFailure>;
}

/// Result of one inference call as seen by the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InferenceOutcome {
    Reply(String),
    Failure(RemoteFailure),
}

impl From<Result<String, RemoteFailure>> for InferenceOutcome {
    fn from(result: Result<String, RemoteFailure>) -> Self {
        match result {
            Ok(reply) => InferenceOutcome::Reply(reply),
            Err(failure) => InferenceOutcome::Failure(failure),
        }
    }
}

/// Runs one call and bounds it by `timeout` regardless of whether the client
/// honours the deadline itself.
pub async fn run_inference(
    client: &dyn InferenceClient,
    payload: &PromptPayload,
    timeout: Duration,
) -> InferenceOutcome {
    match tokio::time::timeout(timeout, client.generate(payload, timeout)).await {
        Ok(result) => result.into(),
        Err(_) => InferenceOutcome::Failure(RemoteFailure::timeout()),
    }
}

#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            model: model.into(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.base_url.clone(),
            settings.model.clone(),
            settings.api_key.clone(),
        )
    }

    pub fn into_shared(self) -> Arc<dyn InferenceClient> {
        Arc::new(self)
    }

    async fn post(
        &self,
        api_key: &str,
        payload: &PromptPayload,
        timeout: Duration,
    ) -> Result<String, RemoteFailure> {
        let url = generate_content_url(&self.base_url, &self.model);
        let request = GenerateContentRequest::from_prompt(payload.to_prompt_text());

        debug!(
            model = %self.model,
            context_entries = payload.context.len(),
            "Sending generateContent request"
        );

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", api_key)
            .timeout(timeout)
            .json(&request)
            .send()
            .await
            .map_err(describe_transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(describe_transport_error)?;

        if !status.is_success() {
            return Err(RemoteFailure::new(format!(
                "HTTP {} {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Error"),
                summarize_error_body(&body)
            )));
        }

        let decoded: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|err| RemoteFailure::new(format!("malformed response: {err}")))?;

        decoded.reply_text().map_err(|err| match err {
            ReplyError::Blocked(reason) => RemoteFailure::new(format!("response blocked: {reason}")),
            ReplyError::Empty => RemoteFailure::new("empty response from model"),
        })
    }
}

#[async_trait]
impl InferenceClient for GeminiClient {
    async fn generate(
        &self,
        payload: &PromptPayload,
        timeout: Duration,
    ) -> Result<String, RemoteFailure> {
        // Classified as a credential failure; no request is sent.
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(RemoteFailure::new(
                "missing API key: set FINCHAT_API_KEY or api_key in the config file",
            ));
        };
        self.post(api_key, payload, timeout).await
    }
}

fn describe_transport_error(err: reqwest::Error) -> RemoteFailure {
    if err.is_timeout() {
        RemoteFailure::timeout()
    } else if err.is_connect() {
        RemoteFailure::new(format!("connection failed: {err}"))
    } else if err.is_decode() || err.is_body() {
        RemoteFailure::new(format!("network error while reading response: {err}"))
    } else {
        RemoteFailure::new(format!("network error: {err}"))
    }
}
