//! Cached merchant identity. This is a display hint, never a credential: it says
//! who was signed in last, while only the server (via the cookie) says whether
//! the session is still valid. Written on login and profile update, removed on
//! logout and on a definitive authentication failure.

use crate::{auth::types::Merchant, errors::AppError, storage};
use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::RwLock,
};

/// Fixed key the identity is stored under.
pub const CACHE_KEY: &str = "merchant";

/// Durable storage for the last known merchant identity.
pub trait IdentityCache: Send + Sync {
    /// # Errors
    /// Returns `AppError` if the entry exists but cannot be read or decoded.
    fn load(&self) -> Result<Option<Merchant>, AppError>;

    /// # Errors
    /// Returns `AppError` if the entry cannot be written.
    fn store(&self, merchant: &Merchant) -> Result<(), AppError>;

    /// Removing an absent entry succeeds.
    ///
    /// # Errors
    /// Returns `AppError` if an existing entry cannot be removed.
    fn clear(&self) -> Result<(), AppError>;
}

/// Identity cache stored as JSON in `<state_dir>/merchant.json`.
pub struct FileIdentityCache {
    path: PathBuf,
}

impl FileIdentityCache {
    #[must_use]
    pub fn new(state_dir: &Path) -> Self {
        Self {
            path: state_dir.join(format!("{CACHE_KEY}.json")),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl IdentityCache for FileIdentityCache {
    fn load(&self) -> Result<Option<Merchant>, AppError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(AppError::Storage(format!(
                    "Failed to read {}: {err}",
                    self.path.display()
                )))
            }
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|err| AppError::Parse(format!("Cached identity is corrupt: {err}")))
    }

    fn store(&self, merchant: &Merchant) -> Result<(), AppError> {
        let raw = serde_json::to_vec(merchant)
            .map_err(|err| AppError::Serialization(format!("Failed to encode identity: {err}")))?;
        storage::write_private(&self.path, &raw)
    }

    fn clear(&self) -> Result<(), AppError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AppError::Storage(format!(
                "Failed to remove {}: {err}",
                self.path.display()
            ))),
        }
    }
}

/// In-process identity cache for embedding and tests.
#[derive(Default)]
pub struct MemoryIdentityCache {
    entry: RwLock<Option<Merchant>>,
}

impl MemoryIdentityCache {
    #[must_use]
    pub fn with_identity(merchant: Merchant) -> Self {
        Self {
            entry: RwLock::new(Some(merchant)),
        }
    }
}

impl IdentityCache for MemoryIdentityCache {
    fn load(&self) -> Result<Option<Merchant>, AppError> {
        self.entry
            .read()
            .map(|entry| entry.clone())
            .map_err(|_| AppError::Storage("Identity cache lock poisoned".to_string()))
    }

    fn store(&self, merchant: &Merchant) -> Result<(), AppError> {
        let mut entry = self
            .entry
            .write()
            .map_err(|_| AppError::Storage("Identity cache lock poisoned".to_string()))?;
        *entry = Some(merchant.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), AppError> {
        let mut entry = self
            .entry
            .write()
            .map_err(|_| AppError::Storage("Identity cache lock poisoned".to_string()))?;
        *entry = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_state_dir() -> PathBuf {
        std::env::temp_dir().join(format!("loyalty-cache-{}", uuid::Uuid::new_v4()))
    }

    fn merchant() -> Option<Merchant> {
        Merchant::from_value(json!({"name": "A", "email": "a@b.com", "points": 120}))
    }

    #[test]
    fn file_cache_round_trips_identity() -> Result<(), AppError> {
        let dir = temp_state_dir();
        let cache = FileIdentityCache::new(&dir);
        let merchant = merchant().ok_or_else(|| AppError::Parse("fixture".to_string()))?;

        assert_eq!(cache.load()?, None);
        cache.store(&merchant)?;
        assert_eq!(cache.load()?, Some(merchant));
        assert!(cache.path().ends_with("merchant.json"));

        cache.clear()?;
        assert_eq!(cache.load()?, None);

        let _ = fs::remove_dir_all(&dir);
        Ok(())
    }

    #[test]
    fn file_cache_clear_is_idempotent() -> Result<(), AppError> {
        let cache = FileIdentityCache::new(&temp_state_dir());
        cache.clear()?;
        cache.clear()?;
        Ok(())
    }

    #[test]
    fn file_cache_reports_corrupt_entry() -> Result<(), AppError> {
        let dir = temp_state_dir();
        let cache = FileIdentityCache::new(&dir);
        storage::write_private(cache.path(), b"not json")?;

        assert!(matches!(cache.load(), Err(AppError::Parse(_))));

        let _ = fs::remove_dir_all(&dir);
        Ok(())
    }

    #[test]
    fn memory_cache_stores_and_clears() -> Result<(), AppError> {
        let cache = MemoryIdentityCache::default();
        assert_eq!(cache.load()?, None);

        let merchant = merchant().ok_or_else(|| AppError::Parse("fixture".to_string()))?;
        cache.store(&merchant)?;
        assert_eq!(cache.load()?, Some(merchant.clone()));

        cache.clear()?;
        assert_eq!(cache.load()?, None);

        let seeded = MemoryIdentityCache::with_identity(merchant.clone());
        assert_eq!(seeded.load()?, Some(merchant));
        Ok(())
    }
}
