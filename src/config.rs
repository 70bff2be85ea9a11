//! Client configuration with environment overrides. Defaults point at a local
//! backend so a bare checkout talks to `http://localhost:3000`; deployments set
//! `LOYALTY_API_BASE_URL` instead of rebuilding. Configuration values are
//! public; do not store secrets here.

use std::{env, path::PathBuf, time::Duration};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";
/// Default timeout (milliseconds) applied to every API call.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
/// Default timeout (milliseconds) for the bootstrap session check.
pub const DEFAULT_VERIFY_TIMEOUT_MS: u64 = 5_000;
const STATE_DIR_NAME: &str = ".loyalty-session";

/// Client configuration derived from defaults and environment variables.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub verify_timeout: Duration,
    pub state_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            verify_timeout: Duration::from_millis(DEFAULT_VERIFY_TIMEOUT_MS),
            state_dir: default_state_dir(),
        }
    }
}

impl AppConfig {
    /// Loads the defaults and applies any non-empty environment overrides.
    #[must_use]
    pub fn load() -> Self {
        let mut config = Self::default();
        apply_runtime_overrides(&mut config, runtime_config());
        config
    }
}

#[derive(Default)]
struct RuntimeConfig {
    api_base_url: Option<String>,
    request_timeout_ms: Option<u64>,
    verify_timeout_ms: Option<u64>,
    state_dir: Option<String>,
}

fn runtime_config() -> RuntimeConfig {
    RuntimeConfig {
        api_base_url: read_env("LOYALTY_API_BASE_URL"),
        request_timeout_ms: read_env("LOYALTY_REQUEST_TIMEOUT_MS").and_then(|v| parse_millis(&v)),
        verify_timeout_ms: read_env("LOYALTY_VERIFY_TIMEOUT_MS").and_then(|v| parse_millis(&v)),
        state_dir: read_env("LOYALTY_STATE_DIR"),
    }
}

fn apply_runtime_overrides(config: &mut AppConfig, runtime: RuntimeConfig) {
    if let Some(value) = runtime.api_base_url {
        config.api_base_url = value;
    }
    if let Some(value) = runtime.request_timeout_ms {
        config.request_timeout = Duration::from_millis(value);
    }
    if let Some(value) = runtime.verify_timeout_ms {
        config.verify_timeout = Duration::from_millis(value);
    }
    if let Some(value) = runtime.state_dir {
        config.state_dir = PathBuf::from(value);
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .and_then(|value| normalize_runtime_value(&value))
}

fn normalize_runtime_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// Zero is rejected: a zero timeout would fail every request.
fn parse_millis(value: &str) -> Option<u64> {
    value.parse::<u64>().ok().filter(|millis| *millis > 0)
}

fn default_state_dir() -> PathBuf {
    env::var_os("HOME").map_or_else(
        || PathBuf::from(STATE_DIR_NAME),
        |home| PathBuf::from(home).join(STATE_DIR_NAME),
    )
}
