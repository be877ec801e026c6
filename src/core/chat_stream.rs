use std::fmt;
use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::api::{error_message_for_status, ChatMessage, ChatRequest};
use crate::core::sse::{classify_line, parse_delta, DecodeBuffer, DeltaParse, Frame};
use crate::utils::auth::add_auth_headers;

pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Vec<u8>, String>> + Send>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatStreamError {
    /// The request was rejected, the connection dropped, or the endpoint
    /// answered with a non-success status.
    Transport(String),
    /// The endpoint accepted the request but the reply could not be read.
    Protocol(String),
    /// The exchange was cancelled before the stream finished.
    Cancelled,
}

impl ChatStreamError {
    pub fn message(&self) -> &str {
        match self {
            ChatStreamError::Transport(message) | ChatStreamError::Protocol(message) => message,
            ChatStreamError::Cancelled => "Request cancelled",
        }
    }
}

impl fmt::Display for ChatStreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for ChatStreamError {}

/// What to do with a `data:` frame that never becomes valid JSON.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrailingFramePolicy {
    /// Drop the frame with a warning and keep reading.
    #[default]
    Discard,
    /// Fail the exchange with [`ChatStreamError::Protocol`].
    Error,
}

impl TrailingFramePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            TrailingFramePolicy::Discard => "discard",
            TrailingFramePolicy::Error => "error",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "discard" => Some(TrailingFramePolicy::Discard),
            "error" => Some(TrailingFramePolicy::Error),
            _ => None,
        }
    }
}

/// Receives progress for one exchange.
pub trait StreamObserver {
    /// Called once per applied delta with the full text accumulated so far.
    fn on_delta(&mut self, cumulative: &str);

    fn on_complete(&mut self, _final_text: &str) {}

    fn on_error(&mut self, _error: &ChatStreamError) {}
}

impl<F: FnMut(&str)> StreamObserver for F {
    fn on_delta(&mut self, cumulative: &str) {
        self(cumulative)
    }
}

pub struct TransportResponse {
    pub status: u16,
    /// `None` when the endpoint replied without a readable body.
    pub body: Option<ByteStream>,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn open(&self, request: &ChatRequest) -> Result<TransportResponse, ChatStreamError>;
}

/// reqwest-backed transport for the hosted chat endpoint.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
    auth_token: Option<String>,
}

impl HttpTransport {
    pub fn new(
        endpoint: impl Into<String>,
        auth_token: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, ChatStreamError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| ChatStreamError::Transport(err.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            auth_token,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn open(&self, request: &ChatRequest) -> Result<TransportResponse, ChatStreamError> {
        let http_request = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json");
        let http_request = add_auth_headers(http_request, self.auth_token.as_deref());

        let response = http_request
            .json(request)
            .send()
            .await
            .map_err(|err| ChatStreamError::Transport(err.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NO_CONTENT {
            return Ok(TransportResponse {
                status: status.as_u16(),
                body: None,
            });
        }

        let body = response.bytes_stream().map(|chunk| {
            chunk
                .map(|bytes| bytes.to_vec())
                .map_err(|err| err.to_string())
        });

        Ok(TransportResponse {
            status: status.as_u16(),
            body: Some(Box::pin(body)),
        })
    }
}

/// Folds decoded frames into the text of one assistant reply.
pub struct StreamAccumulator {
    buffer: DecodeBuffer,
    text: String,
    finished: bool,
    deltas: usize,
    policy: TrailingFramePolicy,
}

enum LineAction {
    Skip,
    Done,
    Delta(DeltaParse),
}

fn line_action(line: &str) -> LineAction {
    match classify_line(line) {
        Frame::Ignored => LineAction::Skip,
        Frame::Done => LineAction::Done,
        Frame::Data(payload) => LineAction::Delta(parse_delta(payload)),
    }
}

impl StreamAccumulator {
    pub fn new(policy: TrailingFramePolicy) -> Self {
        Self {
            buffer: DecodeBuffer::new(),
            text: String::new(),
            finished: false,
            deltas: 0,
            policy,
        }
    }

    pub fn delta_count(&self) -> usize {
        self.deltas
    }

    /// True once the `[DONE]` sentinel has been seen.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Decode one network chunk and apply every complete frame in it.
    ///
    /// Frames after the sentinel are read but ignored. A frame whose JSON
    /// is cut short stays buffered and stops processing of this chunk.
    pub fn push_chunk(
        &mut self,
        chunk: &[u8],
        observer: &mut dyn StreamObserver,
    ) -> Result<(), ChatStreamError> {
        if self.finished {
            return Ok(());
        }

        self.buffer.push(chunk);

        while let Some(line) = self.buffer.peek_line() {
            match line_action(line) {
                LineAction::Skip => {}
                LineAction::Done => {
                    self.mark_done();
                    return Ok(());
                }
                LineAction::Delta(DeltaParse::Parsed(content)) => {
                    if let Some(content) = content {
                        self.apply(&content, observer);
                    }
                }
                LineAction::Delta(DeltaParse::Incomplete) => return Ok(()),
                LineAction::Delta(DeltaParse::Malformed(reason)) => {
                    self.reject_frame(&reason)?;
                }
            }
            self.buffer.consume_line();
        }

        Ok(())
    }

    /// Resolve whatever is still buffered at end of stream and return the
    /// final reply text.
    pub fn finish(mut self, observer: &mut dyn StreamObserver) -> Result<String, ChatStreamError> {
        if self.finished {
            return Ok(self.text);
        }

        self.buffer.finish();
        let remainder = self.buffer.take_remainder();

        for raw in remainder.split('\n') {
            let line = raw.strip_suffix('\r').unwrap_or(raw);
            match line_action(line) {
                LineAction::Skip => {}
                LineAction::Done => {
                    self.mark_done();
                    break;
                }
                LineAction::Delta(DeltaParse::Parsed(content)) => {
                    if let Some(content) = content {
                        self.apply(&content, observer);
                    }
                }
                LineAction::Delta(DeltaParse::Incomplete) => {
                    self.reject_frame("stream ended inside a frame")?;
                }
                LineAction::Delta(DeltaParse::Malformed(reason)) => {
                    self.reject_frame(&reason)?;
                }
            }
        }

        Ok(self.text)
    }

    fn apply(&mut self, content: &str, observer: &mut dyn StreamObserver) {
        self.text.push_str(content);
        self.deltas += 1;
        observer.on_delta(&self.text);
    }

    fn mark_done(&mut self) {
        self.finished = true;
        self.buffer.clear();
    }

    fn reject_frame(&self, reason: &str) -> Result<(), ChatStreamError> {
        match self.policy {
            TrailingFramePolicy::Discard => {
                warn!(reason, "Discarding unparseable stream frame");
                Ok(())
            }
            TrailingFramePolicy::Error => Err(ChatStreamError::Protocol(format!(
                "Malformed stream frame: {reason}"
            ))),
        }
    }
}

/// Drives one chat exchange at a time against a [`Transport`].
///
/// Dropping the consumer cancels any exchange still in flight.
pub struct StreamingChatConsumer<T> {
    transport: T,
    policy: TrailingFramePolicy,
    shutdown: CancellationToken,
    last_stream_id: u64,
}

impl<T: Transport> StreamingChatConsumer<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            policy: TrailingFramePolicy::default(),
            shutdown: CancellationToken::new(),
            last_stream_id: 0,
        }
    }

    pub fn with_trailing_frames(mut self, policy: TrailingFramePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Token that tears the consumer down. Once cancelled, the running
    /// exchange and every later one end with [`ChatStreamError::Cancelled`].
    pub fn cancel_handle(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Send the full `history` and stream back the assistant reply.
    ///
    /// Returns the accumulated reply, which is empty when the stream carried
    /// no text. Deltas delivered before a failure are not retracted.
    pub async fn send(
        &mut self,
        history: &[ChatMessage],
        observer: &mut dyn StreamObserver,
    ) -> Result<String, ChatStreamError> {
        self.last_stream_id += 1;
        let stream_id = self.last_stream_id;
        let cancel = self.shutdown.child_token();

        let result = tokio::select! {
            result = self.exchange(history, &mut *observer, stream_id) => result,
            _ = cancel.cancelled() => Err(ChatStreamError::Cancelled),
        };

        match &result {
            Ok(text) => {
                debug!(stream_id, chars = text.chars().count(), "Chat stream completed");
                observer.on_complete(text);
            }
            Err(err) => {
                debug!(stream_id, error = %err, "Chat stream failed");
                observer.on_error(err);
            }
        }

        result
    }

    async fn exchange(
        &self,
        history: &[ChatMessage],
        observer: &mut dyn StreamObserver,
        stream_id: u64,
    ) -> Result<String, ChatStreamError> {
        let request = ChatRequest {
            messages: history.to_vec(),
        };
        debug!(stream_id, messages = history.len(), "Opening chat stream");

        let response = self.transport.open(&request).await?;
        if !response.is_success() {
            let status = response.status;
            let body = match response.body {
                Some(body) => collect_body_text(body).await,
                None => String::new(),
            };
            return Err(ChatStreamError::Transport(error_message_for_status(
                status, &body,
            )));
        }

        let Some(mut body) = response.body else {
            return Err(ChatStreamError::Protocol("No response body".to_string()));
        };

        let mut accumulator = StreamAccumulator::new(self.policy);
        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(ChatStreamError::Transport)?;
            let was_finished = accumulator.is_finished();
            accumulator.push_chunk(&chunk, observer)?;
            if !was_finished && accumulator.is_finished() {
                debug!(stream_id, "Received end-of-stream sentinel");
            }
        }

        accumulator.finish(observer)
    }
}

impl<T> Drop for StreamingChatConsumer<T> {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn collect_body_text(mut body: ByteStream) -> String {
    let mut bytes = Vec::new();
    while let Some(chunk) = body.next().await {
        match chunk {
            Ok(chunk) => bytes.extend_from_slice(&chunk),
            Err(_) => break,
        }
    }
    String::from_utf8_lossy(&bytes).into_owned()
}
