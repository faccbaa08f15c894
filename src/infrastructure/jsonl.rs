use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use tracing::error;

use super::http_client::ByteStream;
use crate::domain::completion::ChatCompletionChunk;
use crate::domain::error::Error;

/// Stream type for decoded completion chunks
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<ChatCompletionChunk, Error>> + Send>>;

/// Incremental decoder for a JSON Lines response body.
///
/// The transport delivers bytes in arbitrarily sized pieces that need not
/// align with record boundaries. Each piece is appended to a text buffer;
/// every complete line is decoded and yielded in arrival order, and the
/// trailing partial line is retained until more bytes arrive. At end of
/// input a non-whitespace residual buffer is decoded as the final record.
///
/// Whitespace-only lines are skipped. A line that fails to decode is fatal:
/// the error is yielded once (after any records decoded before it) and the
/// stream terminates, dropping the underlying reader. Dropping this stream
/// at any point releases the reader as well.
pub struct JsonlStream {
    inner: Option<ByteStream>,
    buffer: String,
    ready: VecDeque<ChatCompletionChunk>,
    pending_error: Option<Error>,
}

impl JsonlStream {
    pub fn new(inner: ByteStream) -> Self {
        Self {
            inner: Some(inner),
            buffer: String::new(),
            ready: VecDeque::new(),
            pending_error: None,
        }
    }

    /// Decode every complete line now sitting in the buffer, leaving the
    /// trailing partial line in place
    fn drain_complete_lines(&mut self) {
        while let Some(newline) = self.buffer.find('\n') {
            let line: String = self.buffer.drain(..=newline).collect();
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match serde_json::from_str(line) {
                Ok(chunk) => self.ready.push_back(chunk),
                Err(e) => {
                    error!(line = %line, error = %e, "failed to parse stream chunk");
                    self.fail(Error::stream_decode(e.to_string()));
                    return;
                }
            }
        }
    }

    /// Decode whatever remains in the buffer once the input is exhausted
    fn drain_residual(&mut self) {
        let residual = std::mem::take(&mut self.buffer);
        let residual = residual.trim();
        if residual.is_empty() {
            return;
        }

        match serde_json::from_str(residual) {
            Ok(chunk) => self.ready.push_back(chunk),
            Err(e) => {
                error!(buffer = %residual, error = %e, "failed to parse remaining stream data");
                self.fail(Error::stream_decode(e.to_string()));
            }
        }
    }

    fn fail(&mut self, error: Error) {
        self.inner = None;
        self.buffer.clear();
        self.pending_error = Some(error);
    }
}

impl Stream for JsonlStream {
    type Item = Result<ChatCompletionChunk, Error>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        loop {
            // Records decoded so far are yielded before any stashed error.
            if let Some(chunk) = this.ready.pop_front() {
                return Poll::Ready(Some(Ok(chunk)));
            }

            if let Some(error) = this.pending_error.take() {
                return Poll::Ready(Some(Err(error)));
            }

            let Some(inner) = this.inner.as_mut() else {
                return Poll::Ready(None);
            };

            match inner.as_mut().poll_next(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Some(Ok(bytes))) => {
                    this.buffer.push_str(&String::from_utf8_lossy(&bytes));
                    this.drain_complete_lines();
                }
                Poll::Ready(Some(Err(e))) => {
                    this.fail(e);
                }
                Poll::Ready(None) => {
                    this.inner = None;
                    this.drain_residual();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use futures::StreamExt;

    fn byte_stream(chunks: Vec<&[u8]>) -> ByteStream {
        let owned: Vec<Result<Bytes, Error>> = chunks
            .into_iter()
            .map(|c| Ok(Bytes::copy_from_slice(c)))
            .collect();
        Box::pin(tokio_stream::iter(owned))
    }

    fn chunk_record(content: &str) -> String {
        format!(
            "{{\"choices\":[{{\"delta\":{{\"content\":\"{}\"}}}}],\"model\":\"command-r\",\"provider\":\"cohere\"}}",
            content
        )
    }

    async fn collect(stream: JsonlStream) -> Vec<Result<ChatCompletionChunk, Error>> {
        stream.collect().await
    }

    #[test]
    fn test_single_chunk_with_multiple_records() {
        let body = format!("{}\n{}\n{}\n", chunk_record("a"), chunk_record("b"), chunk_record("c"));
        let decoder = JsonlStream::new(byte_stream(vec![body.as_bytes()]));

        let records = tokio_test::block_on(collect(decoder));
        let contents: Vec<_> = records
            .into_iter()
            .map(|r| r.unwrap().delta_content().unwrap().to_string())
            .collect();

        assert_eq!(contents, ["a", "b", "c"]);
    }

    #[test]
    fn test_record_split_across_chunks() {
        let body = format!("{}\n{}\n", chunk_record("first"), chunk_record("second"));
        let (head, tail) = body.split_at(body.len() - 25);
        let decoder = JsonlStream::new(byte_stream(vec![head.as_bytes(), tail.as_bytes()]));

        let records = tokio_test::block_on(collect(decoder));
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].as_ref().unwrap().delta_content(), Some("first"));
        assert_eq!(records[1].as_ref().unwrap().delta_content(), Some("second"));
    }

    #[test]
    fn test_framing_is_chunking_independent() {
        let body = format!("{}\n{}\n{}", chunk_record("x"), chunk_record("y"), chunk_record("z"));

        // Same bytes under three different chunkings, including byte-by-byte.
        let chunkings: Vec<Vec<&[u8]>> = vec![
            vec![body.as_bytes()],
            body.as_bytes().chunks(7).collect(),
            body.as_bytes().chunks(1).collect(),
        ];

        for chunks in chunkings {
            let decoder = JsonlStream::new(byte_stream(chunks));
            let records = tokio_test::block_on(collect(decoder));
            let contents: Vec<_> = records
                .into_iter()
                .map(|r| r.unwrap().delta_content().unwrap().to_string())
                .collect();
            assert_eq!(contents, ["x", "y", "z"]);
        }
    }

    #[test]
    fn test_trailing_record_without_newline_is_yielded() {
        let body = format!("{}\n{}", chunk_record("a"), chunk_record("tail"));
        let decoder = JsonlStream::new(byte_stream(vec![body.as_bytes()]));

        let records = tokio_test::block_on(collect(decoder));
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].as_ref().unwrap().delta_content(), Some("tail"));
    }

    #[test]
    fn test_whitespace_tail_yields_nothing() {
        let body = format!("{}\n  \n\t\n", chunk_record("only"));
        let decoder = JsonlStream::new(byte_stream(vec![body.as_bytes()]));

        let records = tokio_test::block_on(collect(decoder));
        assert_eq!(records.len(), 1);
        assert!(records[0].is_ok());
    }

    #[test]
    fn test_blank_lines_between_records_are_ignored() {
        let body = format!("{}\n\n\n{}\n", chunk_record("a"), chunk_record("b"));
        let decoder = JsonlStream::new(byte_stream(vec![body.as_bytes()]));

        let records = tokio_test::block_on(collect(decoder));
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_malformed_line_is_fatal() {
        let body = format!("{}\nnot json\n{}\n", chunk_record("a"), chunk_record("b"));
        let decoder = JsonlStream::new(byte_stream(vec![body.as_bytes()]));

        let records = tokio_test::block_on(collect(decoder));
        // The record before the bad line is yielded, then the error, then
        // the stream ends; the record after the bad line is never produced.
        assert_eq!(records.len(), 2);
        assert!(records[0].is_ok());
        assert!(matches!(records[1], Err(Error::StreamDecode { .. })));
    }

    #[test]
    fn test_malformed_residual_is_fatal() {
        let body = format!("{}\n{{\"choices\":", chunk_record("a"));
        let decoder = JsonlStream::new(byte_stream(vec![body.as_bytes()]));

        let records = tokio_test::block_on(collect(decoder));
        assert_eq!(records.len(), 2);
        assert!(records[0].is_ok());
        assert!(matches!(records[1], Err(Error::StreamDecode { .. })));
    }

    #[test]
    fn test_transport_error_surfaces_after_decoded_records() {
        let first = format!("{}\n", chunk_record("a"));
        let items: Vec<Result<Bytes, Error>> = vec![
            Ok(Bytes::from(first)),
            Err(Error::stream_decode("connection reset")),
        ];
        let decoder = JsonlStream::new(Box::pin(tokio_stream::iter(items)));

        let records = tokio_test::block_on(collect(decoder));
        assert_eq!(records.len(), 2);
        assert!(records[0].is_ok());
        assert!(records[1].is_err());
    }

    #[tokio::test]
    async fn test_usage_on_terminal_record() {
        let body = "{\"choices\":[],\"model\":\"llama3.1-8b\",\"provider\":\"groq\"}\n\
                    {\"choices\":[],\"model\":\"llama3.1-8b\",\"provider\":\"groq\",\
                    \"usage\":{\"prompt_tokens\":1,\"completion_tokens\":1,\"total_tokens\":2}}\n";
        let mut decoder = JsonlStream::new(byte_stream(vec![body.as_bytes()]));

        let first = decoder.next().await.unwrap().unwrap();
        assert!(first.usage.is_none());

        let second = decoder.next().await.unwrap().unwrap();
        assert_eq!(second.usage.unwrap().total_tokens, 2);

        assert!(decoder.next().await.is_none());
    }
}
