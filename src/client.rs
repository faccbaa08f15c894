use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ClientOptions;
use crate::domain::completion::ChatCompletion;
use crate::domain::error::{ApiError, Error};
use crate::domain::request::{CompletionParams, CompletionRequest};
use crate::domain::routing::{Dials, FallbackConfig, ProviderConfig, RouterModelConfig, ToolsConfig};
use crate::infrastructure::http_client::{HttpClient, HttpClientTrait};
use crate::infrastructure::jsonl::{ChunkStream, JsonlStream};

/// Hosted endpoint used when no base URL is configured
const DIALTONE_BASE_URL: &str = "https://dialtone-app.fly.dev";

const API_VERSION: &str = "v0";

/// Client for the Dialtone chat completions API.
///
/// Holds only the configuration captured at construction; nothing is
/// mutated afterwards, so one client may serve any number of concurrent
/// calls. Retry and timeout policy is left to the caller or transport.
#[derive(Debug)]
pub struct Dialtone<C: HttpClientTrait> {
    client: C,
    auth_header: String,
    base_url: String,
    dials: Dials,
    provider_config: ProviderConfig,
    router_model_config: RouterModelConfig,
    fallback_config: Option<FallbackConfig>,
    tools_config: Option<ToolsConfig>,
}

impl Dialtone<HttpClient> {
    pub fn new(options: ClientOptions) -> Self {
        Self::with_client(HttpClient::new(), options)
    }
}

impl<C: HttpClientTrait> Dialtone<C> {
    /// Build a client over a custom transport
    pub fn with_client(client: C, options: ClientOptions) -> Self {
        let base_url = options
            .base_url
            .unwrap_or_else(|| DIALTONE_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Self {
            client,
            auth_header: format!("Bearer {}", options.api_key),
            base_url,
            dials: options.dials.unwrap_or_default(),
            provider_config: options.provider_config,
            router_model_config: options.router_model_config.unwrap_or_default(),
            fallback_config: options.fallback_config,
            tools_config: options.tools_config,
        }
    }

    /// Send a chat completion request and wait for the full response
    pub async fn chat(&self, request: CompletionRequest) -> Result<ChatCompletion, Error> {
        let url = self.completions_url();
        let body = self.build_body(request, false)?;

        debug!(url = %url, "sending chat completion request");
        let response = self.client.post_json(&url, self.headers(), &body).await?;

        if !is_success(response.status) {
            return Err(self.classify_failure(response.status, &response.body));
        }

        serde_json::from_slice(&response.body).map_err(|e| {
            warn!(error = %e, "failed to parse completion response");
            Error::Api(ApiError::unexpected())
        })
    }

    /// Send a streaming chat completion request.
    ///
    /// Decoding is lazy: chunks are read and parsed only as the returned
    /// stream is consumed, and dropping the stream releases the underlying
    /// connection.
    pub async fn chat_stream(&self, request: CompletionRequest) -> Result<ChunkStream, Error> {
        let url = self.completions_url();
        let body = self.build_body(request, true)?;

        debug!(url = %url, "sending streaming chat completion request");
        let response = self
            .client
            .post_json_stream(&url, self.headers(), &body)
            .await?;

        if !is_success(response.status) {
            let status = response.status;
            let body = response.collect_body().await?;
            return Err(self.classify_failure(status, &body));
        }

        Ok(Box::pin(JsonlStream::new(response.body)))
    }

    fn completions_url(&self) -> String {
        format!("{}/{}/chat/completions", self.base_url, API_VERSION)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ]
    }

    /// Assemble the request body from held configuration and per-call
    /// arguments; fields with no value stay out of the body entirely
    fn build_body(&self, request: CompletionRequest, stream: bool) -> Result<Value, Error> {
        let params = CompletionParams {
            messages: request.messages,
            dials: self.dials.clone(),
            provider_config: self.provider_config.clone(),
            router_model_config: Some(self.router_model_config.clone()),
            fallback_config: self.fallback_config.clone(),
            tools_config: self.tools_config.clone(),
            stream: stream.then_some(true),
            tools: request.tools,
        };

        serde_json::to_value(&params).map_err(|e| {
            warn!(error = %e, "failed to serialize request body");
            Error::Api(ApiError::unexpected())
        })
    }

    fn classify_failure(&self, status: u16, body: &[u8]) -> Error {
        match serde_json::from_slice::<Value>(body) {
            Ok(payload) => {
                ApiError::classify(Some(status), Some(payload), canonical_reason(status)).into()
            }
            Err(e) => {
                warn!(status, error = %e, "error response body is not valid JSON");
                Error::Api(ApiError::unexpected())
            }
        }
    }
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

fn canonical_reason(status: u16) -> &'static str {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("")
}
