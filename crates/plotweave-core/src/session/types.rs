//! Session data structures
//!
//! A `Session` is the single persisted slot of narrative state: player stats,
//! the canonical turn history sent back to the backend (capped), and the
//! unbounded display log the UI renders from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of canonical history entries kept (and sent per request)
pub const HISTORY_LIMIT: usize = 20;

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Player action
    User,
    /// Narrated plot (or an error annotation)
    Assistant,
    /// System prompt material
    System,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
            Role::System => write!(f, "system"),
        }
    }
}

/// One `{role, content}` entry of the history or display log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatEntry {
    pub role: Role,
    pub content: String,
}

impl ChatEntry {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// The single persisted slot of narrative state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Scenario this session was started from
    pub scenario_id: String,

    /// World setting prose forwarded to the backend every turn
    pub world_setting: String,

    /// Player stats; `hp` is kept within `[0, max_hp]` on every merge
    pub hp: i32,
    pub max_hp: i32,
    pub inventory: Vec<String>,
    pub location: String,
    pub status: String,

    /// Canonical history sent to the backend; capped at `HISTORY_LIMIT`,
    /// oldest entries dropped first
    #[serde(default)]
    pub turn_history: Vec<ChatEntry>,

    /// UI-facing log; unbounded and append-only
    #[serde(default)]
    pub display_log: Vec<ChatEntry>,

    /// Suggested next actions; replaced wholesale each turn
    #[serde(default)]
    pub pending_choices: Vec<String>,

    /// Creation timestamp
    pub created: DateTime<Utc>,

    /// Last commit timestamp
    pub updated: DateTime<Utc>,
}

impl Session {
    /// Create a fresh session with the starting stats
    pub fn new(scenario_id: impl Into<String>, world_setting: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            scenario_id: scenario_id.into(),
            world_setting: world_setting.into(),
            hp: 100,
            max_hp: 100,
            inventory: vec!["新手礼包".to_string()],
            location: "起始之地".to_string(),
            status: "健康".to_string(),
            turn_history: Vec::new(),
            display_log: Vec::new(),
            pending_choices: Vec::new(),
            created: now,
            updated: now,
        }
    }

    /// Append one committed turn to the canonical history and trim to the cap
    pub fn push_turn(&mut self, action: &str, plot: &str) {
        self.turn_history.push(ChatEntry::user(action));
        self.turn_history.push(ChatEntry::assistant(plot));
        if self.turn_history.len() > HISTORY_LIMIT {
            let excess = self.turn_history.len() - HISTORY_LIMIT;
            self.turn_history.drain(..excess);
        }
    }

    /// The most recent `HISTORY_LIMIT` canonical entries
    pub fn recent_history(&self) -> &[ChatEntry] {
        let start = self.turn_history.len().saturating_sub(HISTORY_LIMIT);
        &self.turn_history[start..]
    }

    /// Update the last-commit timestamp
    pub fn touch(&mut self) {
        self.updated = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_turn_drops_oldest_first() {
        let mut session = Session::new("xiuxian", "setting");
        for i in 0..15 {
            session.push_turn(&format!("action {i}"), &format!("plot {i}"));
        }
        assert_eq!(session.turn_history.len(), HISTORY_LIMIT);
        // The oldest surviving entry belongs to turn 5
        assert_eq!(session.turn_history[0].content, "action 5");
        assert_eq!(
            session.turn_history.last().unwrap().content,
            "plot 14"
        );
    }

    #[test]
    fn recent_history_is_bounded() {
        let mut session = Session::new("xiuxian", "setting");
        session.push_turn("a", "b");
        assert_eq!(session.recent_history().len(), 2);
        for i in 0..30 {
            session.push_turn(&format!("a{i}"), &format!("b{i}"));
        }
        assert_eq!(session.recent_history().len(), HISTORY_LIMIT);
    }

    #[test]
    fn serde_round_trip_is_deep_equal() {
        let mut session = Session::new("zombie", "末日生存 - 丧尸围城");
        session.push_turn("找水", "你找到了半瓶水");
        session.display_log.push(ChatEntry::user("找水"));
        session.pending_choices = vec!["继续".to_string(), "休息".to_string()];

        let json = serde_json::to_string(&session).unwrap();
        let restored: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, session);
    }

    #[test]
    fn new_session_has_default_stats() {
        let session = Session::new("office", "职场升职记");
        assert_eq!(session.hp, 100);
        assert_eq!(session.max_hp, 100);
        assert_eq!(session.inventory, vec!["新手礼包".to_string()]);
        assert_eq!(session.location, "起始之地");
        assert_eq!(session.status, "健康");
        assert!(session.turn_history.is_empty());
        assert!(session.display_log.is_empty());
    }
}
