//! Session data model and single-slot persistence

mod store;
mod types;

pub use store::{FileSessionStore, MemorySessionStore, SessionStore};
pub use types::{ChatEntry, Role, Session, HISTORY_LIMIT};
