//! Session cookie jar persisted between process runs. The server sets an
//! `HttpOnly` cookie on login; this module moves the full cookie records
//! (domain, path, expiry) between the shared jar and a private file so the
//! next run sends the same cookie to the same endpoints. Cookie values are
//! never logged or interpreted.

use crate::errors::AppError;
use cookie_store::CookieStore;
use reqwest_cookie_store::CookieStoreMutex;
use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::{debug, warn};

pub const COOKIE_FILE_NAME: &str = "cookies";

/// Cookie jar backed by `<state_dir>/cookies`.
pub struct SessionCookies {
    jar: Arc<CookieStoreMutex>,
    path: PathBuf,
}

impl SessionCookies {
    /// Loads persisted cookies from `<state_dir>/cookies`, starting with an
    /// empty jar when the file does not exist or cannot be decoded.
    ///
    /// # Errors
    /// Returns `AppError::Storage` if the file exists but cannot be read.
    pub fn open(state_dir: &Path) -> Result<Self, AppError> {
        let path = state_dir.join(COOKIE_FILE_NAME);

        let store = match fs::read_to_string(&path) {
            Ok(contents) => match cookie_store::serde::json::load(contents.as_bytes()) {
                Ok(store) => {
                    debug!("loaded session cookies from {}", path.display());
                    store
                }
                Err(err) => {
                    warn!("discarding unreadable cookie file {}: {err}", path.display());
                    CookieStore::default()
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => CookieStore::default(),
            Err(err) => {
                return Err(AppError::Storage(format!(
                    "Failed to read {}: {err}",
                    path.display()
                )));
            }
        };

        Ok(Self {
            jar: Arc::new(CookieStoreMutex::new(store)),
            path,
        })
    }

    #[must_use]
    pub fn jar(&self) -> Arc<CookieStoreMutex> {
        self.jar.clone()
    }

    /// Writes every live cookie, or removes the file when the server has
    /// cleared them all.
    ///
    /// # Errors
    /// Returns `AppError::Storage` if the file cannot be written or removed.
    pub fn persist(&self) -> Result<(), AppError> {
        let contents = {
            let store = self
                .jar
                .lock()
                .map_err(|_| AppError::Storage("Cookie jar lock poisoned".to_string()))?;
            if store.iter_unexpired().next().is_none() {
                None
            } else {
                let mut contents = Vec::new();
                cookie_store::serde::json::save_incl_expired_and_nonpersistent(
                    &store,
                    &mut contents,
                )
                .map_err(|err| {
                    AppError::Serialization(format!("Failed to encode cookies: {err}"))
                })?;
                Some(contents)
            }
        };

        match contents {
            Some(contents) => crate::storage::write_private(&self.path, &contents),
            None => match fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
                Err(err) => Err(AppError::Storage(format!(
                    "Failed to remove {}: {err}",
                    self.path.display()
                ))),
            },
        }
    }
}
