//! # authform (Sign-in / Sign-up Form Controller)
//!
//! `authform` drives a two-view authentication form against a remote auth
//! service: it validates the sign-in and sign-up fields locally, submits
//! credentials, and auto-logs-in after a successful registration.
//!
//! ## Validation
//!
//! Validation is synchronous and pure. Each form field gets at most one
//! [`form::FieldError`], and any error blocks the submission before the remote
//! service is contacted.
//!
//! ## Submission
//!
//! The [`form::AuthFormController`] owns the form state and publishes every
//! change through a `tokio::sync::watch` channel. A form that is `Submitting`
//! rejects further submits, and the `loading` flag is released on every exit
//! path, including a dropped future.
//!
//! ## Remote Service
//!
//! The remote backend is abstracted behind [`remote::AuthService`]; the
//! [`remote::HttpAuthService`] implementation posts JSON to `login` and
//! `register` endpoints and understands the `{ statusCode, data, message }`
//! response envelope.

pub mod cli;
pub mod form;
pub mod remote;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
