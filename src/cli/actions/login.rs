use crate::cli::{
    actions::{Context, print_state},
    globals::GlobalArgs,
};
use anyhow::{Result, bail};
use secrecy::SecretString;

pub struct Args {
    pub globals: GlobalArgs,
    pub email: String,
    pub password: SecretString,
}

impl std::fmt::Debug for Args {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Args")
            .field("globals", &self.globals)
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Sign in, persist the cookie the backend set, and print the session.
/// # Errors
/// Returns an error carrying the backend message when the login is rejected.
pub async fn execute(args: Args) -> Result<()> {
    let context = Context::open(&args.globals)?;

    let outcome = context.session.login(&args.email, &args.password).await;
    context.persist()?;

    if let Some(error) = outcome.error() {
        bail!("{error}");
    }

    print_state(&context.session.state())
}
