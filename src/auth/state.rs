//! Session state and the store that owns it. The store is the only place the
//! authentication state is mutated; everything else either calls one of its
//! transitions or subscribes to changes. Only non-sensitive identity metadata
//! is held here; the credential itself stays in the cookie jar.

use crate::auth::types::Merchant;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::watch;

/// Snapshot of the authentication state.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SessionState {
    pub user: Option<Merchant>,
    pub authenticated: bool,
    pub loading: bool,
    pub last_error: Option<String>,
}

impl Default for SessionState {
    /// The state at process start: not authenticated, bootstrap pending.
    fn default() -> Self {
        Self {
            user: None,
            authenticated: false,
            loading: true,
            last_error: None,
        }
    }
}

/// Shared handle to the process-wide session state. Clones observe and mutate
/// the same state. Transitions are synchronous replacements; a transition that
/// leaves the state unchanged does not wake subscribers.
#[derive(Clone)]
pub struct SessionStore {
    state: Arc<watch::Sender<SessionState>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            state: Arc::new(state),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Receiver that is notified after every effective transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Marks a transition as in flight and clears the last error.
    pub fn start(&self) {
        self.transition(|state| {
            state.loading = true;
            state.last_error = None;
        });
    }

    /// Records an authenticated user. The caller writes the cached identity.
    pub fn succeed(&self, user: Merchant) {
        self.transition(|state| {
            state.user = Some(user);
            state.authenticated = true;
            state.loading = false;
            state.last_error = None;
        });
    }

    /// Records a failed or absent session. `None` means "not signed in" and
    /// must not be shown as an alert.
    pub fn fail(&self, reason: Option<String>) {
        self.transition(|state| {
            state.user = None;
            state.authenticated = false;
            state.loading = false;
            state.last_error = reason;
        });
    }

    /// Clears the session. Idempotent; returns `true` only when something
    /// changed. The caller removes the cached identity.
    pub fn logout(&self) -> bool {
        self.transition(|state| {
            state.user = None;
            state.authenticated = false;
            state.loading = false;
            state.last_error = None;
        })
    }

    /// Merges `partial` into the current user and returns the merged record.
    /// No-op returning `None` while unauthenticated. Subscribers are only
    /// notified when a field actually changed.
    pub fn update_user(&self, partial: Map<String, Value>) -> Option<Merchant> {
        let mut merged = None;
        self.state.send_if_modified(|state| {
            if !state.authenticated {
                return false;
            }
            let Some(user) = state.user.as_mut() else {
                return false;
            };
            let before = user.clone();
            user.merge(partial);
            let changed = *user != before;
            merged = Some(user.clone());
            changed
        });
        merged
    }

    pub fn clear_error(&self) {
        self.transition(|state| state.last_error = None);
    }

    fn transition(&self, apply: impl FnOnce(&mut SessionState)) -> bool {
        self.state.send_if_modified(|state| {
            let before = state.clone();
            apply(state);
            *state != before
        })
    }
}
