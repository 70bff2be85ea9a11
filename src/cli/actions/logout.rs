use crate::cli::{actions::Context, globals::GlobalArgs};
use anyhow::Result;

/// Sign out locally and, best-effort, on the backend.
/// # Errors
/// Returns an error if the state directory cannot be opened or written.
pub async fn execute(globals: GlobalArgs) -> Result<()> {
    let context = Context::open(&globals)?;

    context.session.logout().await;
    context.persist()?;

    println!("Signed out.");
    Ok(())
}
