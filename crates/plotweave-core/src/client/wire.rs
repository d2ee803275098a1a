//! Wire types for the generation backend
//!
//! The request mirrors what the adventure endpoint expects: a stats snapshot,
//! the capped canonical history, the action text, and the opaque
//! provider/model/credential passthrough.

use crate::config::LlmSettings;
use crate::session::{ChatEntry, Session};
use serde::{Deserialize, Serialize};

/// Stats snapshot sent with every turn
#[derive(Debug, Clone, Serialize)]
pub struct PetState {
    pub world_setting: String,
    pub hp: i32,
    pub max_hp: i32,
    pub inventory: Vec<String>,
    pub location: String,
    pub status: String,
}

/// One turn-submission request; ephemeral, rebuilt each turn
#[derive(Debug, Clone, Serialize)]
pub struct GenerationRequest {
    pub pet_state: PetState,
    /// Canonical history, at most `HISTORY_LIMIT` entries
    pub user_input: Vec<ChatEntry>,
    pub action: String,
    pub provider: String,
    pub model: String,
    pub api_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl GenerationRequest {
    /// Snapshot the current session state into a request for `action`
    pub fn from_session(session: &Session, action: &str, settings: &LlmSettings) -> Self {
        Self {
            pet_state: PetState {
                world_setting: session.world_setting.clone(),
                hp: session.hp,
                max_hp: session.max_hp,
                inventory: session.inventory.clone(),
                location: session.location.clone(),
                status: session.status.clone(),
            },
            user_input: session.recent_history().to_vec(),
            action: action.to_string(),
            provider: settings.provider.clone(),
            model: settings.model.clone(),
            api_key: settings.api_key.clone(),
            base_url: settings.base_url.clone(),
        }
    }
}

/// Partial player-state merge; absent fields leave the session unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateUpdate {
    /// Raw server value; clamped to `[0, max_hp]` when merged
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Structured terminal result of one narrative turn
#[derive(Debug, Clone, Deserialize)]
pub struct NarrativeReply {
    pub plot: String,
    #[serde(default)]
    pub state_update: StateUpdate,
    #[serde(default)]
    pub choices: Vec<String>,
}

impl NarrativeReply {
    /// Wrap raw text as a reply: the literal-fallback path for bodies that
    /// were supposed to be JSON but are not
    pub fn literal(text: impl Into<String>) -> Self {
        Self {
            plot: text.into(),
            state_update: StateUpdate::default(),
            choices: Vec::new(),
        }
    }
}
