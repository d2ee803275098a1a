//! Plotweave Core Library
//!
//! This crate provides the interactive session engine behind the plotweave
//! adventure front-end: a streaming-aware generation client, reconciliation of
//! incremental and structured backend output, single-slot session persistence,
//! and the turn-based narrative state machine.

pub mod client;
pub mod config;
pub mod engine;
pub mod error;
pub mod reconcile;
pub mod session;

// Re-export commonly used types
pub use client::{Detail, GenerationClient, GenerationRequest, HybridBody, NarrativeReply, StateUpdate, TextStream};
pub use config::{EngineConfig, LlmSettings};
pub use engine::{
    HttpNarrativeBackend, NarrativeBackend, NarrativeEngine, Phase, ResetConfirm, Scenario,
    TurnStatus, SCENARIOS,
};
pub use error::{EngineError, EngineResult};
pub use reconcile::StreamAccumulator;
pub use session::{ChatEntry, FileSessionStore, MemorySessionStore, Role, Session, SessionStore, HISTORY_LIMIT};
