use crate::cli::{
    actions::{Context, print_state},
    globals::GlobalArgs,
};
use anyhow::Result;

/// Run the bootstrap probe and print the resulting session.
/// # Errors
/// Returns an error if the state directory cannot be opened or written.
pub async fn execute(globals: GlobalArgs) -> Result<()> {
    let context = Context::open(&globals)?;

    let state = context.session.bootstrap().await;
    context.persist()?;

    print_state(&state)
}
