//! # loyalty-session
//!
//! Session manager for the merchant loyalty dashboard. The backend keeps the
//! real credential in an `HttpOnly` cookie; this crate decides, on every start,
//! whether the merchant is still signed in, and keeps that answer current as
//! requests succeed or fail.
//!
//! ## Trust model
//!
//! Two signals are combined and never conflated:
//!
//! 1. **Cached identity:** the last known merchant profile in the state
//!    directory. Fast and local, but only a hint. It says *who*.
//! 2. **Session cookie:** opaque to the client, checked by the backend. It says
//!    *whether*.
//!
//! ## Failure policy
//!
//! - A 401/403 on the bootstrap check, or a 401 on any later call, signs the
//!   merchant out.
//! - Timeouts, network errors and 5xx responses during the bootstrap check keep
//!   the cached session; the next real 401 still signs out.
//! - Logout is local-first: the backend call is best-effort.

pub mod auth;
#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}
pub mod cli;
pub mod config;
pub mod errors;
pub mod http;
pub mod storage;

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub use auth::{LoginOutcome, Merchant, Session, SessionState, SessionStore};
pub use config::AppConfig;
pub use errors::AppError;
