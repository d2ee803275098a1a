//! The narrative state machine and its backend seam

mod backend;
mod machine;
mod scenario;

pub use backend::{HttpNarrativeBackend, NarrativeBackend};
pub use machine::{NarrativeEngine, Phase, ResetConfirm, TurnStatus};
pub use scenario::{Scenario, SCENARIOS};
