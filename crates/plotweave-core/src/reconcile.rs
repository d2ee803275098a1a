//! Reconciliation of backend output into in-flight state
//!
//! Two cases: incremental text deltas folded into one growing entry (one
//! observable update per delta, no coalescing), and one-shot partial merges
//! of a structured state update into the session. Partial stream output is
//! never discarded; a mid-stream failure annotates whatever accumulated.

use crate::client::StateUpdate;
use crate::session::Session;

/// Folds an ordered sequence of text deltas into one accumulated entry
#[derive(Debug, Default)]
pub struct StreamAccumulator {
    text: String,
}

impl StreamAccumulator {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one delta; returns the new running total for display
    pub fn push(&mut self, delta: &str) -> &str {
        self.text.push_str(delta);
        &self.text
    }

    /// Current accumulated text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether anything has accumulated yet
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Finalize after a failure: the accumulated text with a bracketed error
    /// annotation appended
    pub fn fail(self, message: &str) -> String {
        if self.text.is_empty() {
            format!("[Error: {message}]")
        } else {
            format!("{}\n\n[Error: {message}]", self.text)
        }
    }

    /// Consume into the accumulated text
    pub fn into_text(self) -> String {
        self.text
    }
}

/// Merge a partial state update into the session.
///
/// Fields absent from the update are left unchanged. The server is not
/// trusted with `hp`: merged values are clamped to `[0, max_hp]`.
pub fn apply_state_update(session: &mut Session, update: &StateUpdate) {
    if let Some(hp) = update.hp {
        session.hp = clamp_hp(hp, session.max_hp);
    }
    if let Some(inventory) = &update.inventory {
        session.inventory = inventory.clone();
    }
    if let Some(location) = &update.location {
        session.location = location.clone();
    }
    if let Some(status) = &update.status {
        session.status = status.clone();
    }
}

fn clamp_hp(hp: i64, max_hp: i32) -> i32 {
    let ceiling = i64::from(max_hp.max(0));
    hp.clamp(0, ceiling) as i32
}
