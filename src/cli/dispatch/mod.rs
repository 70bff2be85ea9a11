//! Maps parsed CLI arguments to the action to run.

use crate::cli::{
    actions::{Action, login},
    commands::{self, client},
    globals::GlobalArgs,
};
use anyhow::{Context, Result, anyhow};
use secrecy::SecretString;

/// # Errors
/// Returns an error if the subcommand is unknown or required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let options = client::Options::parse(matches);
    let globals = GlobalArgs {
        api_url: options.api_url,
        state_dir: options.state_dir,
    };

    match matches.subcommand() {
        Some((commands::CMD_LOGIN, sub_m)) => {
            let email = sub_m
                .get_one::<String>(commands::ARG_EMAIL)
                .cloned()
                .context("missing required argument: --email")?;
            let password = sub_m
                .get_one::<String>(commands::ARG_PASSWORD)
                .cloned()
                .map(SecretString::from)
                .context("missing required argument: --password")?;

            Ok(Action::Login(login::Args {
                globals,
                email,
                password,
            }))
        }
        Some((commands::CMD_LOGOUT, _)) => Ok(Action::Logout(globals)),
        Some((commands::CMD_STATUS, _)) => Ok(Action::Status(globals)),
        Some((name, _)) => Err(anyhow!("unknown command: {name}")),
        None => Err(anyhow!("missing command")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn dispatch(args: &[&str]) -> Result<Action> {
        let mut argv = vec!["loyalty-session"];
        argv.extend_from_slice(args);
        let matches = commands::new().try_get_matches_from(argv)?;
        handler(&matches)
    }

    #[test]
    fn test_dispatch_login() -> Result<()> {
        temp_env::with_vars(
            [
                ("LOYALTY_API_BASE_URL", None::<&str>),
                ("LOYALTY_STATE_DIR", None),
            ],
            || {
                let action = dispatch(&[
                    "--state-dir",
                    "/tmp/loyalty",
                    "login",
                    "--email",
                    "a@b.com",
                    "--password",
                    "secret",
                ])?;
                let Action::Login(args) = action else {
                    return Err(anyhow!("expected login action"));
                };
                assert_eq!(args.email, "a@b.com");
                assert_eq!(args.password.expose_secret(), "secret");
                assert_eq!(
                    args.globals.state_dir,
                    Some(std::path::PathBuf::from("/tmp/loyalty"))
                );
                assert_eq!(args.globals.api_url, None);
                Ok(())
            },
        )
    }

    #[test]
    fn test_dispatch_logout_and_status() -> Result<()> {
        temp_env::with_vars([("LOYALTY_API_BASE_URL", None::<&str>)], || {
            assert!(matches!(dispatch(&["logout"])?, Action::Logout(_)));
            let Action::Status(globals) =
                dispatch(&["--api-url", "http://localhost:4000", "status"])?
            else {
                return Err(anyhow!("expected status action"));
            };
            assert_eq!(globals.api_url.as_deref(), Some("http://localhost:4000"));
            Ok(())
        })
    }
}
