//! Panel request/response types and error definitions.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::fallback::DispatchError;

/// Message used when the panel rejects a login without saying why.
pub const DEFAULT_REJECTION_MESSAGE: &str = "invalid username or password";

/// Login input.
///
/// The panel only reads username and password; device id and app version
/// are kept for callers that track them.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub device_id: Option<String>,
    pub app_version: Option<String>,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            ..Self::default()
        }
    }
}

/// Wire body of the login call.
#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Session handle returned by a successful login.
///
/// The panel has no real tokens, so the handle is `username:password` and
/// every status query logs in again with it.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(username: &str, password: &str) -> Self {
        Self(format!("{username}:{password}"))
    }

    /// Wrap a token previously obtained from [`SessionToken::as_str`].
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split into username and password at the first `:`.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        self.0.split_once(':')
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.credentials() {
            Some((username, _)) => write!(f, "SessionToken({username}:***)"),
            None => write!(f, "SessionToken(***)"),
        }
    }
}

/// Account status derived from the login payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub username: String,
    pub used_traffic: i64,
    pub data_limit: i64,
    pub expire: i64,
    pub status: String,
    pub links: Vec<String>,
    pub need_to_update: bool,
    pub is_ignoreable: bool,
}

impl StatusResponse {
    /// Build a status from the `data` object of a successful login reply.
    pub fn from_panel_data(data: &Value) -> Self {
        let traffic = data.get("traffic");
        let traffic_field = |name: &str| traffic.and_then(|t| t.get(name)).map_or(0, lenient_i64);

        let subscription_url = data
            .get("subscription_url")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let links = if subscription_url.is_empty() {
            Vec::new()
        } else {
            vec![subscription_url.to_string()]
        };

        Self {
            username: data
                .get("username")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            used_traffic: traffic_field("used"),
            data_limit: traffic_field("total"),
            expire: traffic_field("expire_ts"),
            status: "active".to_string(),
            links,
            need_to_update: false,
            is_ignoreable: true,
        }
    }
}

/// Integer from a JSON number or numeric string; anything else is 0.
pub(crate) fn lenient_i64(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// Boolean from a JSON bool or a `"true"`/`"false"` string.
pub(crate) fn lenient_bool(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// Errors returned by panel operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No candidate could be reached.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// The panel answered with a non-2xx status.
    #[error("HTTP error: {0}")]
    Http(u16),

    /// Login was refused; carries the panel's message.
    #[error("login rejected: {0}")]
    Rejected(String),

    /// Re-authentication for a status query was refused.
    #[error("authentication failed")]
    AuthFailed,

    /// The response body was not the expected JSON.
    #[error("invalid response body: {body}")]
    InvalidBody { body: String },

    /// The session token does not contain `username:password`.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The request body could not be encoded.
    #[error("failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Result type for panel operations.
pub type ApiResult<T> = Result<T, ApiError>;
