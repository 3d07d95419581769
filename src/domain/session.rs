// src/domain/session.rs
use crate::domain::search::SearchOutcome;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tracing::debug;

pub const SESSION_COOKIE: &str = "sid";
pub const SESSION_ID_BYTES: usize = 24;

/// A fresh URL-safe session id from the OS RNG.
pub fn generate_session_id() -> String {
    let mut raw = [0u8; SESSION_ID_BYTES];
    OsRng.fill_bytes(&mut raw);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(raw)
}

/// Sessions idle longer than this are dropped on the next `begin`.
pub const SESSION_IDLE_TTL: Duration = Duration::from_secs(2 * 60 * 60);
/// Upper bound on live sessions; the least recently used one is evicted.
pub const MAX_SESSIONS: usize = 10_000;

/// Per-session working set: the last completed search.
#[derive(Debug)]
pub struct SearchSession {
    generation: u64,
    outcome: Option<SearchOutcome>,
    last_used: Instant,
    last_tick: u64,
}

/// Handed out when a search starts; only the newest ticket may store results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTicket {
    generation: u64,
}

#[derive(Debug, Default)]
struct Sessions {
    by_id: HashMap<String, SearchSession>,
    tick: u64,
}

impl Sessions {
    fn touch(&mut self, sid: &str) -> Option<&mut SearchSession> {
        self.tick += 1;
        let tick = self.tick;
        let session = self.by_id.get_mut(sid)?;
        session.last_used = Instant::now();
        session.last_tick = tick;
        Some(session)
    }
}

#[derive(Debug)]
pub struct SessionStore {
    sessions: Mutex<Sessions>,
    idle_ttl: Duration,
    max_sessions: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_limits(SESSION_IDLE_TTL, MAX_SESSIONS)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(idle_ttl: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: Mutex::new(Sessions::default()),
            idle_ttl,
            max_sessions: max_sessions.max(1),
        }
    }

    // A poisoned lock only means another request panicked mid-update; the
    // map itself is still usable.
    fn lock(&self) -> MutexGuard<'_, Sessions> {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn is_live(&self, session: &SearchSession) -> bool {
        session.last_used.elapsed() <= self.idle_ttl
    }

    /// Whether `sid` names a session this store issued and still holds.
    pub fn contains(&self, sid: &str) -> bool {
        let sessions = self.lock();
        sessions.by_id.get(sid).is_some_and(|s| self.is_live(s))
    }

    pub fn len(&self) -> usize {
        self.lock().by_id.len()
    }

    /// Start a search, superseding any search still running for `sid`.
    /// Expired sessions are pruned first; at capacity the least recently
    /// used session makes room.
    pub fn begin(&self, sid: &str) -> SearchTicket {
        let mut sessions = self.lock();

        let before = sessions.by_id.len();
        sessions.by_id.retain(|_, s| s.last_used.elapsed() <= self.idle_ttl);
        let expired = before - sessions.by_id.len();
        if expired > 0 {
            debug!(expired, "Pruned idle sessions");
        }

        if !sessions.by_id.contains_key(sid) && sessions.by_id.len() >= self.max_sessions {
            let oldest = sessions
                .by_id
                .iter()
                .min_by_key(|(_, s)| s.last_tick)
                .map(|(id, _)| id.clone());
            if let Some(oldest) = oldest {
                sessions.by_id.remove(&oldest);
                debug!("Evicted least recently used session");
            }
        }

        sessions.tick += 1;
        let tick = sessions.tick;
        let session = sessions
            .by_id
            .entry(sid.to_string())
            .or_insert_with(|| SearchSession {
                generation: 0,
                outcome: None,
                last_used: Instant::now(),
                last_tick: tick,
            });
        session.last_used = Instant::now();
        session.last_tick = tick;
        session.generation = tick;

        SearchTicket {
            generation: session.generation,
        }
    }

    /// Store a finished search. Returns false (and drops the outcome) when a
    /// newer search has started for this session since `ticket` was issued,
    /// or the session has since been evicted.
    pub fn complete(&self, sid: &str, ticket: SearchTicket, outcome: SearchOutcome) -> bool {
        let mut sessions = self.lock();
        let Some(session) = sessions.touch(sid) else {
            debug!("Discarding search for evicted session");
            return false;
        };

        if session.generation != ticket.generation {
            debug!(
                stale = ticket.generation,
                current = session.generation,
                "Discarding superseded search"
            );
            return false;
        }

        session.outcome = Some(outcome);
        true
    }

    /// Run `f` against the session's current results, if any.
    pub fn with_outcome<T>(&self, sid: &str, f: impl FnOnce(&SearchOutcome) -> T) -> Option<T> {
        let mut sessions = self.lock();
        let live = sessions.by_id.get(sid).is_some_and(|s| self.is_live(s));
        if !live {
            return None;
        }
        sessions.touch(sid)?.outcome.as_ref().map(f)
    }
}
