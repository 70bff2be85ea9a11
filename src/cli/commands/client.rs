use clap::{Arg, ArgMatches, Command};
use std::path::PathBuf;

pub const ARG_API_URL: &str = "api-url";
pub const ARG_STATE_DIR: &str = "state-dir";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_API_URL)
                .long("api-url")
                .help("Backend base URL, example: https://api.loyalty.dev")
                .env("LOYALTY_API_BASE_URL")
                .global(true),
        )
        .arg(
            Arg::new(ARG_STATE_DIR)
                .long("state-dir")
                .help("Directory holding the cached identity and session cookie")
                .env("LOYALTY_STATE_DIR")
                .global(true)
                .value_parser(clap::value_parser!(PathBuf)),
        )
}

#[derive(Debug, Default)]
pub struct Options {
    pub api_url: Option<String>,
    pub state_dir: Option<PathBuf>,
}

impl Options {
    #[must_use]
    pub fn parse(matches: &ArgMatches) -> Self {
        Self {
            api_url: matches
                .get_one::<String>(ARG_API_URL)
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty()),
            state_dir: matches.get_one::<PathBuf>(ARG_STATE_DIR).cloned(),
        }
    }
}
