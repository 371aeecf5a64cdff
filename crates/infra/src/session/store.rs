//! Holder for the single active panel session cookie.

use std::fmt;

use parking_lot::RwLock;

/// Session cookie issued by the panel at login.
///
/// The panel is the authority on expiry; nothing is tracked client-side.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientSession {
    pub cookie_name: String,
    pub value: String,
}

impl ClientSession {
    pub fn new(cookie_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { cookie_name: cookie_name.into(), value: value.into() }
    }

    /// `name=value`, ready for a `Cookie` header.
    pub fn header_value(&self) -> String {
        format!("{}={}", self.cookie_name, self.value)
    }
}

impl fmt::Debug for ClientSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSession")
            .field("cookie_name", &self.cookie_name)
            .field("value", &"<redacted>")
            .finish()
    }
}

/// Zero or one active session.
///
/// Read on every request, written only by login and logout. Readers never
/// block each other; a login racing with in-flight requests may leave some of
/// them on the previous (or no) session.
#[derive(Debug, Default)]
pub struct SessionStore {
    inner: RwLock<Option<ClientSession>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any existing session.
    pub fn set(&self, cookie_name: impl Into<String>, value: impl Into<String>) {
        *self.inner.write() = Some(ClientSession::new(cookie_name, value));
    }

    pub fn get(&self) -> Option<ClientSession> {
        self.inner.read().clone()
    }

    /// Drop the session. Safe to call repeatedly.
    pub fn clear(&self) {
        *self.inner.write() = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.read().is_some()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_set_replaces_without_merging() {
        let store = SessionStore::new();
        store.set("session", "old");
        store.set("3x-ui", "new");

        let session = store.get().unwrap();
        assert_eq!(session, ClientSession::new("3x-ui", "new"));
        assert_eq!(session.header_value(), "3x-ui=new");
    }

    #[test]
    fn test_clear_is_idempotent() {
        let store = SessionStore::new();
        store.set("3x-ui", "abc123");

        store.clear();
        assert!(store.get().is_none());
        assert!(!store.is_authenticated());

        store.clear();
        assert!(store.get().is_none());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_empty_store_reports_absent() {
        let store = SessionStore::new();
        assert!(store.get().is_none());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_debug_hides_cookie_value() {
        let session = ClientSession::new("3x-ui", "super-secret");
        assert!(!format!("{session:?}").contains("super-secret"));
    }

    #[test]
    fn test_concurrent_readers_see_session() {
        let store = Arc::new(SessionStore::new());
        store.set("3x-ui", "abc123");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.get().map(|s| s.value))
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap().as_deref(), Some("abc123"));
        }
    }
}
