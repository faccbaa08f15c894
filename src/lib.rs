//! Dialtone API client
//!
//! Client for the Dialtone LLM routing API with support for:
//! - Routing preferences (dials, per-model provider routes, fallback policy)
//! - Single-shot and streamed (JSON Lines) chat completions
//! - Tool use, including streamed tool-call deltas
//! - Typed, status- and payload-classified API errors
//!
//! ```no_run
//! use dialtone::{ClientOptions, CompletionRequest, Dialtone, ProviderConfig};
//!
//! # async fn run() -> Result<(), dialtone::Error> {
//! let client = Dialtone::new(ClientOptions::new(
//!     "dk-...",
//!     ProviderConfig::new().with_openai("sk-..."),
//! ));
//!
//! let request = CompletionRequest::builder().user("Hey, what's up?").build();
//! let completion = client.chat(request).await?;
//! println!("{}", completion.content().unwrap_or_default());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use client::Dialtone;
pub use config::{ClientOptions, read_env};
pub use domain::{
    ApiError, ApiErrorKind, ChatCompletion, ChatCompletionChunk, ChatMessage, Choice, ChoiceDelta,
    ChoiceDeltaToolCall, ChoiceDeltaToolCallFunction, ChunkChoice, CompletionParams,
    CompletionRequest, CompletionRequestBuilder, Dials, Error, FallbackConfig, FinishReason, Llm,
    Provider, ProviderConfig, ProviderCredentials, ProviderRoute, Role, RouterDetails,
    RouterModelConfig, Tool, ToolCall, ToolCallFunction, ToolSplitRoute, ToolsConfig, Usage,
};
pub use infrastructure::{
    ByteStream, ChunkStream, HttpClient, HttpClientTrait, HttpResponse, JsonlStream,
    StreamingResponse,
};
