//! Domain layer - Wire types and error classification for the routing API

pub mod completion;
pub mod error;
pub mod message;
pub mod request;
pub mod routing;

pub use completion::{
    ChatCompletion, ChatCompletionChunk, Choice, ChoiceDelta, ChoiceDeltaToolCall,
    ChoiceDeltaToolCallFunction, ChunkChoice, FinishReason, Usage,
};
pub use error::{ApiError, ApiErrorKind, Error, RouterDetails};
pub use message::{ChatMessage, Role, Tool, ToolCall, ToolCallFunction};
pub use request::{CompletionParams, CompletionRequest, CompletionRequestBuilder};
pub use routing::{
    Dials, FallbackConfig, Llm, Provider, ProviderConfig, ProviderCredentials, ProviderRoute,
    RouterModelConfig, ToolSplitRoute, ToolsConfig,
};
