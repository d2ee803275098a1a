//! Streaming request client for the generation backend
//!
//! One client covers the three framing conventions the backend uses:
//! - plain streamed text (`post_stream`): a lazy, finite, non-restartable
//!   sequence of decoded text fragments,
//! - a single structured JSON value (`post_structured`),
//! - the hybrid used by the narrative/diagram/outline endpoints
//!   (`post_hybrid`): a streamed body whose concatenation is terminally
//!   JSON-shaped, with a literal-text fallback when the parse fails.
//!
//! The client performs network I/O only; it never mutates session state.
//! HTTP-level failures with a body are decoded through the error surface and
//! returned as values, never panics.

mod decoder;
pub mod detail;
mod wire;

pub use decoder::Utf8StreamDecoder;
pub use detail::Detail;
pub use wire::{GenerationRequest, NarrativeReply, PetState, StateUpdate};

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::reconcile::StreamAccumulator;
use futures::{future, Stream, StreamExt};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::pin::Pin;
use tracing::{debug, warn};

/// Lazy sequence of decoded text fragments from a streaming response
pub type TextStream = Pin<Box<dyn Stream<Item = EngineResult<String>> + Send>>;

/// Result of a hybrid-framed request
#[derive(Debug, Clone, PartialEq)]
pub enum HybridBody<T> {
    /// The buffered body parsed as the expected structure
    Parsed(T),
    /// Parse failed; the raw text is the literal result
    Literal(String),
}

/// HTTP client for the generation backend
pub struct GenerationClient {
    http: Client,
    base_url: String,
    auth_token: Option<String>,
}

impl GenerationClient {
    /// Create a client from the engine config
    pub fn new(config: &EngineConfig) -> EngineResult<Self> {
        let http = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| EngineError::transport(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.get_base_url().to_string(),
            auth_token: config.auth_token.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST `body` and return the successful response; non-2xx responses are
    /// decoded into a normalized `EngineError::Http`
    async fn dispatch(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> EngineResult<reqwest::Response> {
        let url = self.endpoint(path);
        let mut request = self.http.post(&url).json(body);
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| EngineError::transport(format!("Request to {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let message = detail::surface_error(status.as_u16(), &raw);
            warn!(%url, status = status.as_u16(), %message, "backend returned an error");
            return Err(EngineError::http(status.as_u16(), message));
        }

        debug!(%url, status = status.as_u16(), "request dispatched");
        Ok(response)
    }

    /// POST and parse the whole body as one structured value
    pub async fn post_structured<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> EngineResult<T> {
        let response = self.dispatch(path, body).await?;
        let text = response
            .text()
            .await
            .map_err(|e| EngineError::transport(format!("Failed to read response body: {e}")))?;
        serde_json::from_str(&text).map_err(|_| EngineError::parse(text))
    }

    /// POST and expose the body as a lazy stream of decoded text fragments.
    ///
    /// Fragments follow network chunk boundaries; UTF-8 sequences split across
    /// chunks are held back until complete.
    pub async fn post_stream(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> EngineResult<TextStream> {
        let response = self.dispatch(path, body).await?;

        let mut decoder = Utf8StreamDecoder::new();
        let stream = response
            .bytes_stream()
            .map(move |item| match item {
                Ok(chunk) => Ok(decoder.feed(&chunk)),
                Err(e) => Err(EngineError::transport(format!("Stream read failed: {e}"))),
            })
            .filter(|item| {
                // Drop empty fragments produced by held-back partial sequences
                future::ready(!matches!(item, Ok(text) if text.is_empty()))
            });

        Ok(Box::pin(stream))
    }

    /// POST to a hybrid endpoint: buffer the complete streamed body, attempt
    /// the structured parse, and fall back to the literal text on failure.
    ///
    /// A stream that dies after producing text yields the partial text with a
    /// bracketed error annotation as the literal body; the partial output is
    /// never discarded.
    pub async fn post_hybrid<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> EngineResult<HybridBody<T>> {
        let mut stream = self.post_stream(path, body).await?;

        let mut accumulator = StreamAccumulator::new();
        while let Some(delta) = stream.next().await {
            match delta {
                Ok(text) => {
                    accumulator.push(&text);
                }
                Err(e) if !accumulator.is_empty() => {
                    warn!(error = %e, "stream died mid-body, keeping partial text");
                    return Ok(HybridBody::Literal(accumulator.fail(&e.to_string())));
                }
                Err(e) => return Err(e),
            }
        }

        let text = accumulator.into_text();
        match serde_json::from_str(&text) {
            Ok(value) => Ok(HybridBody::Parsed(value)),
            Err(e) => {
                debug!(error = %e, "hybrid body is not structured, using literal text");
                Ok(HybridBody::Literal(text))
            }
        }
    }
}
