//! Bootstrap reconciliation between the cached identity and the server.
//!
//! The probe runs once per process start. The cache is fast but may be stale;
//! the verify call is authoritative but can fail for two very different
//! reasons. Only a definitive rejection (401/403) clears the session. Every
//! other failure (timeout, network error, 5xx, malformed body) keeps the cached
//! identity, and the session guard still catches a real 401 on the next call.

use crate::{
    auth::{
        cache::IdentityCache,
        client,
        state::{SessionState, SessionStore},
        types::Merchant,
    },
    errors::AppError,
    http::ApiClient,
};
use std::time::Duration;
use tracing::{debug, error, info, warn};

pub const AUTH_EXPIRED_MESSAGE: &str = "Authentication expired";

/// How the verify call answered.
#[derive(Debug, PartialEq)]
pub enum VerifyOutcome {
    /// Cookie accepted, optionally with an authoritative identity.
    Valid(Option<Merchant>),
    /// Cookie definitively rejected (401/403).
    Rejected,
    /// Transient failure; says nothing about the session.
    Unreachable(AppError),
}

impl VerifyOutcome {
    #[must_use]
    pub fn classify(result: Result<Option<Merchant>, AppError>) -> Self {
        match result {
            Ok(identity) => VerifyOutcome::Valid(identity),
            Err(err) if err.is_auth_rejection() => VerifyOutcome::Rejected,
            Err(err) => VerifyOutcome::Unreachable(err),
        }
    }
}

/// Decides the initial session state and returns it.
pub async fn run(
    store: &SessionStore,
    cache: &dyn IdentityCache,
    api: &ApiClient,
    verify_timeout: Duration,
) -> SessionState {
    store.start();

    let cached = match cache.load() {
        Ok(cached) => cached,
        Err(err) => {
            warn!("discarding unreadable cached identity: {err}");
            clear_cache(cache);
            None
        }
    };

    let Some(cached) = cached else {
        debug!("no cached identity, skipping session check");
        store.fail(None);
        return store.snapshot();
    };

    match VerifyOutcome::classify(client::verify_session(api, verify_timeout).await) {
        VerifyOutcome::Valid(Some(identity)) => {
            debug!("session check returned an identity, replacing cached copy");
            if let Err(err) = cache.store(&identity) {
                error!("failed to write cached identity: {err}");
            }
            store.succeed(identity);
        }
        VerifyOutcome::Valid(None) => {
            debug!("session check passed, using cached identity");
            store.succeed(cached);
        }
        VerifyOutcome::Rejected => {
            info!("session rejected during bootstrap");
            clear_cache(cache);
            store.fail(Some(AUTH_EXPIRED_MESSAGE.to_string()));
        }
        VerifyOutcome::Unreachable(err) => {
            warn!("session check failed, keeping cached identity: {err}");
            store.succeed(cached);
        }
    }

    store.snapshot()
}

fn clear_cache(cache: &dyn IdentityCache) {
    if let Err(err) = cache.clear() {
        error!("failed to clear cached identity: {err}");
    }
}
