//! Response-side half of the HTTP client guard. The request side is the cookie
//! jar bound to `ApiClient` at construction; this hook watches every response
//! and forces a local logout on 401. It never swallows the error: the caller
//! still receives `AppError::Http` and decides its own message.

use crate::auth::{cache::IdentityCache, state::SessionStore};
use reqwest::StatusCode;
use std::sync::Arc;
use tracing::{error, warn};

/// Observes the status of every API response.
pub trait ResponseHook: Send + Sync {
    fn on_response(&self, status: StatusCode);
}

/// Forces the session into the logged-out state on any 401.
pub struct SessionGuard {
    store: SessionStore,
    cache: Arc<dyn IdentityCache>,
}

impl SessionGuard {
    #[must_use]
    pub fn new(store: SessionStore, cache: Arc<dyn IdentityCache>) -> Self {
        Self { store, cache }
    }
}

impl ResponseHook for SessionGuard {
    fn on_response(&self, status: StatusCode) {
        if status != StatusCode::UNAUTHORIZED {
            return;
        }

        if self.store.logout() {
            warn!("session rejected by the server, logging out");
        }
        if let Err(err) = self.cache.clear() {
            error!("failed to clear cached identity: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{cache::MemoryIdentityCache, types::Merchant};
    use serde_json::json;

    fn merchant() -> Merchant {
        Merchant::from_value(json!({"name": "A", "email": "a@b.com"})).unwrap_or_default()
    }

    fn guarded() -> (SessionGuard, SessionStore, Arc<MemoryIdentityCache>) {
        let store = SessionStore::new();
        let cache = Arc::new(MemoryIdentityCache::default());
        let guard = SessionGuard::new(store.clone(), cache.clone());
        (guard, store, cache)
    }

    #[test]
    fn unauthorized_forces_logout_and_clears_cache() -> Result<(), crate::errors::AppError> {
        let (guard, store, cache) = guarded();
        cache.store(&merchant())?;
        store.succeed(merchant());

        guard.on_response(StatusCode::UNAUTHORIZED);

        let state = store.snapshot();
        assert!(!state.authenticated);
        assert_eq!(state.user, None);
        assert_eq!(state.last_error, None);
        assert!(!state.loading);
        assert_eq!(cache.load()?, None);
        Ok(())
    }

    #[test]
    fn other_statuses_leave_the_session_alone() -> Result<(), crate::errors::AppError> {
        let (guard, store, cache) = guarded();
        cache.store(&merchant())?;
        store.succeed(merchant());

        for status in [
            StatusCode::OK,
            StatusCode::FORBIDDEN,
            StatusCode::NOT_FOUND,
            StatusCode::INTERNAL_SERVER_ERROR,
        ] {
            guard.on_response(status);
        }

        assert!(store.snapshot().authenticated);
        assert_eq!(cache.load()?, Some(merchant()));
        Ok(())
    }

    #[test]
    fn repeated_unauthorized_is_idempotent() {
        let (guard, store, _cache) = guarded();
        store.succeed(merchant());

        guard.on_response(StatusCode::UNAUTHORIZED);
        let once = store.snapshot();
        guard.on_response(StatusCode::UNAUTHORIZED);

        assert_eq!(store.snapshot(), once);
    }
}
