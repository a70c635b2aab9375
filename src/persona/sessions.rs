use std::time::Duration;

use moka::sync::Cache;
use uuid::Uuid;

use super::{find, DEFAULT_PERSONA};
use crate::config::{DEFAULT_SESSION_CAPACITY, DEFAULT_SESSION_IDLE};

/// Persona selection per client session.
///
/// Selections never leak between sessions; a request without a session id
/// sees the default persona. The store holds at most `capacity` sessions and
/// forgets a session after `idle` without a lookup or selection.
pub struct PersonaSessions {
    selected: Cache<Uuid, &'static str>,
}

impl PersonaSessions {
    pub fn new(capacity: u64, idle: Duration) -> Self {
        Self {
            selected: Cache::builder()
                .max_capacity(capacity)
                .time_to_idle(idle)
                .build(),
        }
    }

    /// Persona in effect for a request: an explicit id wins, then the
    /// session's selection, then the default.
    pub fn resolve(&self, explicit: Option<&str>, session: Option<Uuid>) -> String {
        if let Some(id) = explicit {
            return id.to_string();
        }
        session
            .and_then(|id| self.get(id))
            .unwrap_or(DEFAULT_PERSONA)
            .to_string()
    }

    pub fn get(&self, session: Uuid) -> Option<&'static str> {
        self.selected.get(&session)
    }

    /// Record a selection. Unknown persona ids are refused.
    pub fn select(&self, session: Uuid, persona: &str) -> bool {
        let Some(found) = find(persona) else {
            return false;
        };
        self.selected.insert(session, found.id);
        true
    }

    /// Approximate number of tracked sessions; evictions are applied lazily.
    pub fn session_count(&self) -> u64 {
        self.selected.entry_count()
    }
}

impl Default for PersonaSessions {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_CAPACITY, DEFAULT_SESSION_IDLE)
    }
}
