pub mod login;
pub mod logout;
pub mod status;

// Internal "interpreter" for `Action`.
mod run;

use crate::{
    auth::{FileIdentityCache, Session, SessionState},
    cli::globals::GlobalArgs,
    http::SessionCookies,
};
use anyhow::Result;
use std::sync::Arc;

#[derive(Debug)]
pub enum Action {
    Login(login::Args),
    Logout(GlobalArgs),
    Status(GlobalArgs),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}

/// Session wired to the state directory: file-backed identity cache and the
/// persisted cookie jar. Call `persist` once the action is done.
pub(crate) struct Context {
    pub session: Session,
    cookies: SessionCookies,
}

impl Context {
    pub(crate) fn open(globals: &GlobalArgs) -> Result<Self> {
        let config = globals.config();
        let cookies = SessionCookies::open(&config.state_dir)?;
        let cache = Arc::new(FileIdentityCache::new(&config.state_dir));
        let session = Session::new(&config, cache, cookies.jar())?;

        Ok(Self { session, cookies })
    }

    pub(crate) fn persist(&self) -> Result<()> {
        self.cookies.persist()?;
        Ok(())
    }
}

pub(crate) fn print_state(state: &SessionState) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(state)?);
    Ok(())
}
