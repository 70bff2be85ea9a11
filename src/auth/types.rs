//! Request and response types for the merchant session endpoints. The login
//! request carries the plaintext password, so it has no `Debug` impl and must
//! never be logged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Merchant identity record. Opaque to the session layer: whatever profile
/// fields the backend returns are kept and round-tripped as-is.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Merchant(Map<String, Value>);

impl Merchant {
    /// Wraps a JSON object; any other JSON value is not an identity.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self(fields)),
            _ => None,
        }
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.0.get("email").and_then(Value::as_str)
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Overwrites or adds each field of `partial`; other fields are kept.
    pub fn merge(&mut self, partial: Map<String, Value>) {
        for (field, value) in partial {
            self.0.insert(field, value);
        }
    }
}

impl From<Map<String, Value>> for Merchant {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Clone, Debug, Deserialize)]
pub struct LoginResponse {
    pub merchant: Merchant,
}

/// Result of an explicit login attempt. Login never returns an error past its
/// boundary; the UI branches on this value and renders failures inline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum LoginOutcome {
    Success,
    Failure { error: String },
}

impl LoginOutcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, LoginOutcome::Success)
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            LoginOutcome::Success => None,
            LoginOutcome::Failure { error } => Some(error),
        }
    }
}
