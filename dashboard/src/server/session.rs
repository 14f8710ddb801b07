use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use trackcore::auth::AuthSession;
use trackcore::filter::FilterState;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "loctrack_session";

/// Per-browser-session state, handed explicitly to every handler.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    pub filter: FilterState,
    pub auth: AuthSession,
    /// One-shot messages shown on the next render.
    pub notices: Vec<String>,
}

impl SessionContext {
    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }
}

struct Entry {
    context: SessionContext,
    last_seen: DateTime<Utc>,
}

/// Session contexts keyed by the opaque id carried in the session cookie.
/// Sessions never share state with each other.
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Entry>>,
    idle_limit: Duration,
}

impl SessionStore {
    pub fn new(idle_limit: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            idle_limit,
        }
    }

    /// Returns the id for `cookie` if it names a live session, or creates a
    /// fresh session. The flag is true when a new cookie must be issued.
    pub fn resolve(&self, cookie: Option<&str>, now: DateTime<Utc>) -> (String, bool) {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(id) = cookie {
            if let Some(entry) = sessions.get_mut(id) {
                entry.last_seen = now;
                return (id.to_string(), false);
            }
        }

        let idle_limit = self.idle_limit;
        sessions.retain(|_, entry| now - entry.last_seen < idle_limit);

        let id = new_session_id();
        sessions.insert(
            id.clone(),
            Entry {
                context: SessionContext::default(),
                last_seen: now,
            },
        );
        (id, true)
    }

    /// Runs `f` against the context for `id`, creating it if it vanished.
    pub fn with_context<T>(&self, id: &str, f: impl FnOnce(&mut SessionContext) -> T) -> T {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        let entry = sessions.entry(id.to_string()).or_insert_with(|| Entry {
            context: SessionContext::default(),
            last_seen: Utc::now(),
        });
        f(&mut entry.context)
    }

    /// Moves the context of `id` under a freshly issued id and returns it.
    /// The old id stops resolving.
    pub fn rotate(&self, id: &str, now: DateTime<Utc>) -> String {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        let context = sessions
            .remove(id)
            .map(|entry| entry.context)
            .unwrap_or_default();
        let fresh = new_session_id();
        sessions.insert(
            fresh.clone(),
            Entry {
                context,
                last_seen: now,
            },
        );
        fresh
    }

    pub fn len(&self) -> usize {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

fn new_session_id() -> String {
    Uuid::new_v4().simple().to_string()
}

pub fn session_cookie(id: &str) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        SESSION_COOKIE, id
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sessions_are_isolated() {
        let store = SessionStore::new(Duration::hours(3));
        let now = Utc::now();
        let (first, issued_first) = store.resolve(None, now);
        let (second, issued_second) = store.resolve(None, now);
        assert!(issued_first && issued_second);
        assert_ne!(first, second);
        assert_eq!(first.len(), 32);

        store.with_context(&first, |ctx| ctx.filter.toggle_hour(5).unwrap());
        let second_hours = store.with_context(&second, |ctx| ctx.filter.selected_hours().len());
        assert_eq!(second_hours, 0);
    }

    #[test]
    fn known_cookie_reuses_session_and_unknown_gets_fresh_one() {
        let store = SessionStore::new(Duration::hours(3));
        let now = Utc::now();
        let (id, _) = store.resolve(None, now);
        assert_eq!(store.resolve(Some(&id), now), (id.clone(), false));

        let (fresh, issued) = store.resolve(Some("forged"), now);
        assert!(issued);
        assert_ne!(fresh, "forged");
    }

    #[test]
    fn idle_sessions_are_pruned_when_new_ones_arrive() {
        let store = SessionStore::new(Duration::hours(3));
        let start = Utc::now();
        store.resolve(None, start);
        store.resolve(None, start + Duration::hours(4));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn rotate_keeps_context_under_new_id() {
        let store = SessionStore::new(Duration::hours(3));
        let now = Utc::now();
        let (old, _) = store.resolve(None, now);
        store.with_context(&old, |ctx| ctx.filter.toggle_hour(7).unwrap());

        let fresh = store.rotate(&old, now);
        assert_ne!(fresh, old);
        assert_eq!(store.len(), 1);
        assert!(store.with_context(&fresh, |ctx| ctx.filter.is_hour_selected(7)));
        assert!(store.resolve(Some(&old), now).1);
    }

    #[test]
    fn notices_are_taken_once() {
        let mut ctx = SessionContext::default();
        ctx.notices.push("oops".into());
        assert_eq!(ctx.take_notices(), vec!["oops".to_string()]);
        assert!(ctx.take_notices().is_empty());
    }
}
