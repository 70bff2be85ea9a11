//! HTTP plumbing shared by every API call: the cookie-carrying client, the
//! response guard that turns a 401 anywhere into a local logout, and the
//! persisted cookie jar.

pub mod api;
pub mod cookies;
pub mod guard;

pub use api::{ApiClient, ApiClientBuilder};
pub use cookies::SessionCookies;
pub use guard::{ResponseHook, SessionGuard};
