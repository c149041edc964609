use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// Signed-in reviewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub username: String,
    pub display_name: String,
}

/// Explicit handle on the caller's authentication state.
///
/// Services receive this instead of reading ambient storage, so tests and different
/// transports can supply their own.
pub trait SessionContext: Send + Sync {
    fn token(&self) -> Option<String>;
    fn user(&self) -> Option<SessionUser>;
    fn clear(&self);
}

#[derive(Debug, Clone)]
struct SessionState {
    token: String,
    user: SessionUser,
}

/// Process-local session holder.
#[derive(Debug, Default)]
pub struct InMemorySession {
    state: Mutex<Option<SessionState>>,
}

impl InMemorySession {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(token: impl Into<String>, user: SessionUser) -> Self {
        let session = Self::default();
        session.open(token, user);
        session
    }

    pub fn open(&self, token: impl Into<String>, user: SessionUser) {
        let mut guard = self.state.lock().expect("session mutex poisoned");
        *guard = Some(SessionState {
            token: token.into(),
            user,
        });
    }
}

impl SessionContext for InMemorySession {
    fn token(&self) -> Option<String> {
        let guard = self.state.lock().expect("session mutex poisoned");
        guard.as_ref().map(|state| state.token.clone())
    }

    fn user(&self) -> Option<SessionUser> {
        let guard = self.state.lock().expect("session mutex poisoned");
        guard.as_ref().map(|state| state.user.clone())
    }

    fn clear(&self) {
        let mut guard = self.state.lock().expect("session mutex poisoned");
        guard.take();
    }
}
