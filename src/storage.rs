//! Private file writes for the state directory.

use crate::errors::AppError;
use std::{fs, path::Path};

/// Writes `contents` to `path`, creating the parent directory. On Unix the
/// file is readable by the owner only.
///
/// # Errors
/// Returns `AppError::Storage` if the directory or file cannot be written.
pub fn write_private(path: &Path, contents: &[u8]) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| {
            AppError::Storage(format!("Failed to create {}: {err}", parent.display()))
        })?;
    }

    fs::write(path, contents)
        .map_err(|err| AppError::Storage(format!("Failed to write {}: {err}", path.display())))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600)).map_err(|err| {
            AppError::Storage(format!(
                "Failed to set permissions on {}: {err}",
                path.display()
            ))
        })?;
    }

    Ok(())
}
