//! Session facade wiring the store, the identity cache and the guarded API
//! client. The guard is registered once here, when the client is built, so
//! every request issued through `Session::api` shares the same 401 handling.
//! The session check and the login request own their terminal transition, so
//! they use the same client and jar without the guard.

use crate::{
    auth::{
        cache::IdentityCache,
        client, probe,
        state::{SessionState, SessionStore},
        types::{LoginOutcome, LoginRequest},
    },
    config::AppConfig,
    errors::AppError,
    http::{ApiClient, SessionGuard},
};
use reqwest_cookie_store::CookieStoreMutex;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value};
use std::{sync::Arc, time::Duration};
use tokio::sync::watch;
use tracing::{debug, error, info};

pub const MISSING_CREDENTIALS_MESSAGE: &str = "Email and password are required.";
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed. Please try again.";

pub struct Session {
    store: SessionStore,
    cache: Arc<dyn IdentityCache>,
    api: ApiClient,
    auth_api: ApiClient,
    verify_timeout: Duration,
}

impl Session {
    /// Builds the session with a guarded client that sends cookies from `jar`.
    ///
    /// # Errors
    /// Returns `AppError::Config` if the API client cannot be built.
    pub fn new(
        config: &AppConfig,
        cache: Arc<dyn IdentityCache>,
        jar: Arc<CookieStoreMutex>,
    ) -> Result<Self, AppError> {
        let store = SessionStore::new();
        let guard = SessionGuard::new(store.clone(), cache.clone());
        let api = ApiClient::builder(config, jar)
            .response_hook(Arc::new(guard))
            .build()?;
        let auth_api = api.without_hooks();

        Ok(Self {
            store,
            cache,
            api,
            auth_api,
            verify_timeout: config.verify_timeout,
        })
    }

    /// Guarded client for every other dashboard endpoint.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.store.snapshot()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.store.subscribe()
    }

    /// Runs the bootstrap probe. Call once per process start.
    pub async fn bootstrap(&self) -> SessionState {
        probe::run(
            &self.store,
            self.cache.as_ref(),
            &self.auth_api,
            self.verify_timeout,
        )
        .await
    }

    /// Signs in with email and password. Failures are returned as
    /// `LoginOutcome::Failure` carrying the message to render.
    pub async fn login(&self, email: &str, password: &SecretString) -> LoginOutcome {
        let email = email.trim();
        if email.is_empty() || password.expose_secret().is_empty() {
            return LoginOutcome::Failure {
                error: MISSING_CREDENTIALS_MESSAGE.to_string(),
            };
        }

        self.store.start();

        let request = LoginRequest {
            email,
            password: password.expose_secret(),
        };
        match client::login(&self.auth_api, &request).await {
            Ok(merchant) => {
                if let Err(err) = self.cache.store(&merchant) {
                    error!("failed to write cached identity: {err}");
                }
                info!("merchant signed in");
                self.store.succeed(merchant);
                LoginOutcome::Success
            }
            Err(err) => {
                debug!("login rejected: {err}");
                if err.is_unauthorized() {
                    self.clear_cache();
                }
                let message = login_failure_message(&err);
                self.store.fail(Some(message.clone()));
                LoginOutcome::Failure { error: message }
            }
        }
    }

    /// Signs out. The backend call is best-effort; local state is always
    /// cleared, even when the backend is unreachable.
    pub async fn logout(&self) {
        if let Err(err) = client::logout(&self.api).await {
            debug!("logout request failed, clearing local session anyway: {err}");
        }
        self.clear_local();
        info!("merchant signed out");
    }

    /// Merges profile fields into the signed-in identity and refreshes the
    /// cache. Returns `false` (and changes nothing) while logged out.
    pub fn update_user(&self, partial: Map<String, Value>) -> bool {
        let Some(merged) = self.store.update_user(partial) else {
            debug!("ignoring profile update while signed out");
            return false;
        };
        if let Err(err) = self.cache.store(&merged) {
            error!("failed to write cached identity: {err}");
        }
        true
    }

    pub fn clear_error(&self) {
        self.store.clear_error();
    }

    fn clear_local(&self) {
        self.clear_cache();
        self.store.logout();
    }

    fn clear_cache(&self) {
        if let Err(err) = self.cache.clear() {
            error!("failed to clear cached identity: {err}");
        }
    }
}

/// The backend message for HTTP rejections, a generic message otherwise.
fn login_failure_message(err: &AppError) -> String {
    match err {
        AppError::Http { message, .. } => message.clone(),
        _ => LOGIN_FAILED_MESSAGE.to_string(),
    }
}
