//! Backend seam for turn generation
//!
//! The engine talks to the generation backend through `NarrativeBackend`,
//! so tests can script replies without a network.

use crate::client::{GenerationClient, GenerationRequest, HybridBody, NarrativeReply};
use crate::error::EngineResult;
use async_trait::async_trait;

/// Path of the adventure endpoint on the generation backend
pub const ADVENTURE_PATH: &str = "/api/game/adventure";

/// One turn-generation call against the backend
#[async_trait]
pub trait NarrativeBackend: Send + Sync {
    /// Submit a turn and return the structured reply
    async fn narrate(&self, request: &GenerationRequest) -> EngineResult<NarrativeReply>;
}

/// HTTP implementation over the adventure endpoint.
///
/// The endpoint uses the hybrid framing: a streamed body that terminates in
/// one JSON object. A body that fails the structured parse becomes a literal
/// plot with no state update and no choices.
pub struct HttpNarrativeBackend {
    client: GenerationClient,
}

impl HttpNarrativeBackend {
    /// Wrap a generation client
    pub fn new(client: GenerationClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NarrativeBackend for HttpNarrativeBackend {
    async fn narrate(&self, request: &GenerationRequest) -> EngineResult<NarrativeReply> {
        match self.client.post_hybrid(ADVENTURE_PATH, request).await? {
            HybridBody::Parsed(reply) => Ok(reply),
            HybridBody::Literal(text) => Ok(NarrativeReply::literal(text)),
        }
    }
}
