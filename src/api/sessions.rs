//! Comparison sessions - one `ComparisonSet` per client
//!
//! Sessions idle for longer than the timeout are dropped, and the store
//! never holds more than `max_sessions` entries: creating one past the cap
//! evicts the least recently used.

use crate::catalog::ComparisonSet;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use uuid::Uuid;

pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

#[derive(Debug)]
struct Session {
    set: ComparisonSet,
    last_seen: Instant,
}

#[derive(Debug)]
pub struct SessionStore {
    sessions: HashMap<Uuid, Session>,
    idle_timeout: Duration,
    max_sessions: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_TIMEOUT, DEFAULT_MAX_SESSIONS)
    }
}

impl SessionStore {
    /// A cap of zero is treated as one
    pub fn new(idle_timeout: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: HashMap::new(),
            idle_timeout,
            max_sessions: max_sessions.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn create(&mut self) -> Uuid {
        self.create_at(Instant::now())
    }

    /// Live session's set, marking it as used
    pub fn get_mut(&mut self, id: &Uuid) -> Option<&mut ComparisonSet> {
        self.get_mut_at(id, Instant::now())
    }

    pub fn remove(&mut self, id: &Uuid) -> bool {
        self.sessions.remove(id).is_some()
    }

    fn create_at(&mut self, now: Instant) -> Uuid {
        self.prune_at(now);

        while self.sessions.len() >= self.max_sessions {
            let oldest = self
                .sessions
                .iter()
                .min_by_key(|(_, session)| session.last_seen)
                .map(|(id, _)| *id);

            match oldest {
                Some(id) => {
                    self.sessions.remove(&id);
                    debug!("Evicted comparison session {} (store full)", id);
                }
                None => break,
            }
        }

        let id = Uuid::new_v4();
        self.sessions.insert(
            id,
            Session {
                set: ComparisonSet::new(),
                last_seen: now,
            },
        );
        id
    }

    fn get_mut_at(&mut self, id: &Uuid, now: Instant) -> Option<&mut ComparisonSet> {
        let timeout = self.idle_timeout;
        let expired = self
            .sessions
            .get(id)
            .is_some_and(|session| now.saturating_duration_since(session.last_seen) >= timeout);

        if expired {
            self.sessions.remove(id);
            debug!("Comparison session {} expired", id);
            return None;
        }

        let session = self.sessions.get_mut(id)?;
        session.last_seen = now;
        Some(&mut session.set)
    }

    fn prune_at(&mut self, now: Instant) -> usize {
        let before = self.sessions.len();
        let timeout = self.idle_timeout;
        self.sessions
            .retain(|_, session| now.saturating_duration_since(session.last_seen) < timeout);

        let pruned = before - self.sessions.len();
        if pruned > 0 {
            info!("Expired {} idle comparison sessions", pruned);
        }
        pruned
    }
}
