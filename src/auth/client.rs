//! Client wrappers for the merchant session endpoints. Every call goes through
//! an `ApiClient` bound to the session cookie jar; whether a 401 also reaches
//! the session guard depends on the client the caller passes in.

use crate::{
    auth::types::{LoginRequest, LoginResponse, Merchant},
    errors::AppError,
    http::ApiClient,
};
use serde_json::Value;
use std::time::Duration;

/// Session check (GET) and credential submission (POST) share this path.
pub const LOGIN_PATH: &str = "/merchant/login";
pub const LOGOUT_PATH: &str = "/merchant/logout";

/// Checks whether the session cookie is still valid.
/// Returns the identity when the backend includes `{ "merchant": { .. } }`.
///
/// # Errors
/// Returns `AppError::Http` for non-2xx statuses and `Timeout`/`Network` for
/// transport failures.
pub async fn verify_session(
    api: &ApiClient,
    timeout: Duration,
) -> Result<Option<Merchant>, AppError> {
    let body = api.get_optional_json(LOGIN_PATH, timeout).await?;
    Ok(body
        .and_then(|mut value| value.get_mut("merchant").map(Value::take))
        .and_then(Merchant::from_value))
}

/// Submits credentials; the backend sets the `HttpOnly` session cookie on
/// success. The request body contains the password and must never be logged.
///
/// # Errors
/// Returns `AppError::Http` with the backend message on rejection.
pub async fn login(api: &ApiClient, request: &LoginRequest<'_>) -> Result<Merchant, AppError> {
    let response: LoginResponse = api.post_json(LOGIN_PATH, request).await?;
    Ok(response.merchant)
}

/// Asks the backend to clear the session cookie.
///
/// # Errors
/// Returns `AppError` if the request fails; callers treat this as best-effort.
pub async fn logout(api: &ApiClient) -> Result<(), AppError> {
    api.post_empty(LOGOUT_PATH).await
}
