use crate::config::AppConfig;
use std::path::PathBuf;

/// Settings shared by every subcommand. Flags win over the environment-derived
/// `AppConfig`.
#[derive(Debug, Clone, Default)]
pub struct GlobalArgs {
    pub api_url: Option<String>,
    pub state_dir: Option<PathBuf>,
}

impl GlobalArgs {
    #[must_use]
    pub fn config(&self) -> AppConfig {
        let mut config = AppConfig::load();
        if let Some(url) = &self.api_url {
            config.api_base_url.clone_from(url);
        }
        if let Some(dir) = &self.state_dir {
            config.state_dir.clone_from(dir);
        }
        config
    }
}
