//! Contract with the remote authentication backend. The form controller only
//! sees these request/response types and the [`AuthService`] trait; transport
//! details live in [`http`]. Request payloads carry plaintext passwords, so
//! their `Debug` output is redacted and they must never be logged.

pub mod http;
pub use self::http::{DEFAULT_LOGIN_PATH, DEFAULT_REGISTER_PATH, Endpoints, HttpAuthService};

use serde::{Deserialize, Serialize};
use std::{fmt, future::Future};
use thiserror::Error;

/// Status code the login endpoint returns for accepted credentials.
pub const LOGIN_OK: u16 = 200;
/// Status code the register endpoint returns for a created account.
pub const REGISTER_CREATED: u16 = 201;

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Response envelope returned by the auth backend.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub status_code: u16,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl AuthResponse {
    #[must_use]
    pub fn new(status_code: u16) -> Self {
        Self {
            status_code,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    #[must_use]
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteAuthError {
    /// The backend answered with an error; `message` is shown verbatim.
    #[error("{message}")]
    Rejected { status: u16, message: String },
    #[error("{0}")]
    Transport(String),
    #[error("Invalid response from auth service: {0}")]
    Decode(String),
    #[error("Invalid auth service URL: {0}")]
    Endpoint(String),
}

impl RemoteAuthError {
    #[must_use]
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }
}

/// Remote login/registration backend.
pub trait AuthService {
    /// Submit credentials. Success is a response with [`LOGIN_OK`].
    fn login(
        &self,
        request: &LoginRequest,
    ) -> impl Future<Output = Result<AuthResponse, RemoteAuthError>> + Send;

    /// Create an account. Success is a response with [`REGISTER_CREATED`].
    fn register(
        &self,
        request: &RegisterRequest,
    ) -> impl Future<Output = Result<AuthResponse, RemoteAuthError>> + Send;
}

/// Side effect run once a sign-in has been accepted.
pub trait Navigator {
    fn navigate_to_home(&self);
}

impl<F> Navigator for F
where
    F: Fn(),
{
    fn navigate_to_home(&self) {
        self();
    }
}
