//! Merchant authentication: session state, cached identity, bootstrap probe and
//! the explicit login/logout actions. The credential is an `HttpOnly` cookie the
//! client never reads; the cached identity only says who was signed in last.
//! This module touches security boundaries and must avoid logging passwords or
//! cookie values.
//!
//! Flow Overview: at start the probe reads the cached identity and, if present,
//! asks the backend whether the cookie is still valid. Login posts credentials,
//! caches the returned identity and lets the backend set the cookie. Logout
//! always clears local state, whatever the backend answers. Any 401 seen by the
//! API client forces the same end state as logout.

pub mod cache;
pub mod client;
pub mod probe;
pub mod session;
pub mod state;
pub mod types;

pub use cache::{CACHE_KEY, FileIdentityCache, IdentityCache, MemoryIdentityCache};
pub use session::Session;
pub use state::{SessionState, SessionStore};
pub use types::{LoginOutcome, Merchant};
