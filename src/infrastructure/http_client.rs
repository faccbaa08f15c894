use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use std::pin::Pin;
use tracing::warn;

use crate::domain::error::{ApiError, Error};

/// Stream type for raw response bodies
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, Error>> + Send>>;

/// A fully buffered HTTP response.
///
/// Non-success statuses are returned as responses, not errors; the caller
/// owns classification.
#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Bytes,
}

/// An HTTP response whose body is exposed incrementally
pub struct StreamingResponse {
    pub status: u16,
    pub body: ByteStream,
}

impl StreamingResponse {
    /// Buffer the remaining body, e.g. to read an error payload off a
    /// response that was requested as a stream
    pub async fn collect_body(mut self) -> Result<Bytes, Error> {
        let mut buffer = Vec::new();
        while let Some(chunk) = self.body.next().await {
            buffer.extend_from_slice(&chunk?);
        }
        Ok(buffer.into())
    }
}

/// Trait for HTTP client operations (for mocking)
#[async_trait]
pub trait HttpClientTrait: Send + Sync + std::fmt::Debug {
    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<HttpResponse, Error>;

    async fn post_json_stream(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<StreamingResponse, Error>;
}

/// Real HTTP client using reqwest
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub fn with_timeout(timeout: std::time::Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
        }
    }

    async fn send(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<reqwest::Response, Error> {
        let mut request = self.client.post(url);

        for (key, value) in headers {
            request = request.header(key, value);
        }

        request.json(body).send().await.map_err(|e| {
            warn!(url = %url, error = %e, "request failed before a response was received");
            Error::Api(ApiError::unexpected())
        })
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClientTrait for HttpClient {
    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<HttpResponse, Error> {
        let response = self.send(url, headers, body).await?;
        let status = response.status().as_u16();

        let body = response.bytes().await.map_err(|e| {
            warn!(url = %url, error = %e, "failed to read response body");
            Error::Api(ApiError::unexpected())
        })?;

        Ok(HttpResponse { status, body })
    }

    async fn post_json_stream(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<StreamingResponse, Error> {
        let response = self.send(url, headers, body).await?;
        let status = response.status().as_u16();

        let stream = response.bytes_stream().map(|result| {
            result.map_err(|e| {
                warn!(error = %e, "response stream failed mid-body");
                Error::Api(ApiError::unexpected())
            })
        });

        Ok(StreamingResponse {
            status,
            body: Box::pin(stream),
        })
    }
}
