//! Infrastructure layer - HTTP transport and stream decoding

pub mod http_client;
pub mod jsonl;

pub use http_client::{ByteStream, HttpClient, HttpClientTrait, HttpResponse, StreamingResponse};
pub use jsonl::{ChunkStream, JsonlStream};
