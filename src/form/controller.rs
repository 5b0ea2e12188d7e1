//! Submission coordinator for the sign-in/sign-up form.
//!
//! Flow Overview:
//! 1) Reject the submit if the form already has a request in flight.
//! 2) Clear the form's submission error and run its validator.
//! 3) On a clean form, enter `Submitting` through [`SubmissionGuard`] and call
//!    the remote service.
//! 4) On success navigate home; sign-up chains into sign-in with the same
//!    credentials, once no other sign-in is running. On failure store the
//!    message in the submission slot.
//! 5) The guard returns the form to `Idle` on every exit path.
//!
//! State lives in a `watch` channel. It is only borrowed synchronously and
//! never held across an `.await`.

use super::{
    state::{AuthFormState, FormKind, FormPhase, SignInFields, SignUpFields},
    validate::{Field, FieldErrors, validate_sign_in, validate_sign_up},
};
use crate::remote::{
    AuthResponse, AuthService, LOGIN_OK, LoginRequest, Navigator, REGISTER_CREATED,
    RegisterRequest, RemoteAuthError,
};
use std::{fmt, str::FromStr};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

/// Where a failed auto-login after registration is reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChainedErrorSlot {
    /// Report in the sign-up slot as well as the sign-in slot.
    #[default]
    SignUp,
    /// Report only in the sign-in slot; the sign-up slot stays empty.
    SignIn,
}

impl fmt::Display for ChainedErrorSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SignUp => f.write_str("sign-up"),
            Self::SignIn => f.write_str("sign-in"),
        }
    }
}

impl FromStr for ChainedErrorSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sign-up" | "signup" => Ok(Self::SignUp),
            "sign-in" | "signin" => Ok(Self::SignIn),
            _ => Err(format!("invalid chained error slot: {s}")),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SubmitError {
    #[error("{0}")]
    Validation(FieldErrors),
    #[error("A submission is already in progress.")]
    InFlight,
    #[error(transparent)]
    Remote(#[from] RemoteAuthError),
    #[error("{message}")]
    UnexpectedStatus { status: u16, message: String },
}

impl SubmitError {
    fn unexpected(response: AuthResponse) -> Self {
        let status = response.status_code;
        let message = response
            .message
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| format!("Unexpected response status: {status}"));
        Self::UnexpectedStatus { status, message }
    }
}

/// Outcome of an accepted sign-in.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedIn {
    pub email: String,
    pub response: AuthResponse,
}

#[derive(Clone, PartialEq, Eq)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for SignInRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignInRequest")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct SignUpRequest {
    pub fullname: String,
    pub email: String,
    pub password: String,
}

impl fmt::Debug for SignUpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignUpRequest")
            .field("fullname", &self.fullname)
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Holds a form in `Submitting` and returns it to `Idle` when dropped.
struct SubmissionGuard<'a> {
    state: &'a watch::Sender<AuthFormState>,
    form: FormKind,
}

impl<'a> SubmissionGuard<'a> {
    fn acquire(state: &'a watch::Sender<AuthFormState>, form: FormKind) -> Option<Self> {
        let mut acquired = false;
        state.send_if_modified(|current| {
            acquired = current.begin_submission(form);
            acquired
        });
        acquired.then_some(Self { state, form })
    }
}

impl Drop for SubmissionGuard<'_> {
    fn drop(&mut self) {
        let form = self.form;
        self.state.send_modify(|current| {
            *current.phase_mut(form) = FormPhase::Idle;
        });
    }
}

pub struct AuthFormController<S, N> {
    service: S,
    navigator: N,
    state: watch::Sender<AuthFormState>,
    chained_errors: ChainedErrorSlot,
}

impl<S, N> fmt::Debug for AuthFormController<S, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthFormController")
            .field("state", &*self.state.borrow())
            .field("chained_errors", &self.chained_errors)
            .finish_non_exhaustive()
    }
}

impl<S, N> AuthFormController<S, N>
where
    S: AuthService,
    N: Navigator,
{
    #[must_use]
    pub fn new(service: S, navigator: N) -> Self {
        let (state, _) = watch::channel(AuthFormState::default());
        Self {
            service,
            navigator,
            state,
            chained_errors: ChainedErrorSlot::default(),
        }
    }

    #[must_use]
    pub fn with_chained_errors(mut self, slot: ChainedErrorSlot) -> Self {
        self.chained_errors = slot;
        self
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    #[must_use]
    pub fn snapshot(&self) -> AuthFormState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthFormState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn loading(&self) -> bool {
        self.state.borrow().loading()
    }

    pub fn show_sign_in(&self) {
        self.state.send_if_modified(|current| {
            std::mem::replace(&mut current.view.is_sign_up, false)
        });
    }

    pub fn show_sign_up(&self) {
        self.state.send_if_modified(|current| {
            !std::mem::replace(&mut current.view.is_sign_up, true)
        });
    }

    pub fn toggle_form(&self) {
        self.state
            .send_modify(|current| current.view.is_sign_up = !current.view.is_sign_up);
    }

    pub fn toggle_password_visibility(&self) {
        self.state
            .send_modify(|current| current.view.show_password = !current.view.show_password);
    }

    /// Store a keystroke. Returns `false` if `form` has no such field.
    pub fn set_field(&self, form: FormKind, field: Field, value: impl Into<String>) -> bool {
        let value = value.into();
        let mut stored = false;
        self.state.send_if_modified(|current| {
            stored = current.set_field(form, field, value);
            stored
        });
        if !stored {
            debug!("{form} form has no {field} field");
        }
        stored
    }

    /// Load `request` into the sign-in fields and submit them.
    ///
    /// # Errors
    /// See [`Self::submit_sign_in`].
    pub async fn sign_in(&self, request: SignInRequest) -> Result<SignedIn, SubmitError> {
        let fields = SignInFields {
            email: request.email,
            password: request.password,
        };
        self.load(FormKind::SignIn, |current| current.sign_in.fields = fields)?;
        self.submit_sign_in().await
    }

    /// Load `request` into the sign-up fields and submit them.
    ///
    /// # Errors
    /// See [`Self::submit_sign_up`].
    pub async fn sign_up(&self, request: SignUpRequest) -> Result<SignedIn, SubmitError> {
        let fields = SignUpFields {
            fullname: request.fullname,
            email: request.email,
            password: request.password,
        };
        self.load(FormKind::SignUp, |current| current.sign_up.fields = fields)?;
        self.submit_sign_up().await
    }

    /// Submit the current sign-in fields.
    ///
    /// # Errors
    /// Returns `SubmitError::InFlight` if a sign-in is already running,
    /// `SubmitError::Validation` if a field is invalid, and
    /// `SubmitError::Remote`/`UnexpectedStatus` if the service refuses.
    pub async fn submit_sign_in(&self) -> Result<SignedIn, SubmitError> {
        let fields = self.state.borrow().sign_in.fields.clone();
        self.run_sign_in(fields).await
    }

    /// Submit the current sign-up fields, then sign in with the same
    /// credentials once the account is created.
    ///
    /// # Errors
    /// Same as [`Self::submit_sign_in`], for either step.
    pub async fn submit_sign_up(&self) -> Result<SignedIn, SubmitError> {
        let fields = self.state.borrow().sign_up.fields.clone();
        self.run_sign_up(fields).await
    }

    /// Replace the fields of `form` unless it is submitting; the fields of a
    /// request in flight are left as they were.
    fn load(
        &self,
        form: FormKind,
        update: impl FnOnce(&mut AuthFormState),
    ) -> Result<(), SubmitError> {
        let mut loaded = false;
        self.state.send_if_modified(|current| {
            if current.phase(form) == FormPhase::Submitting {
                return false;
            }
            update(current);
            loaded = true;
            true
        });

        if loaded {
            Ok(())
        } else {
            debug!("{form} request ignored: already in flight");
            Err(SubmitError::InFlight)
        }
    }

    /// Steps shared by both forms up to the remote call: the in-flight
    /// check, clearing the previous submission error, and validation.
    fn prepare(
        &self,
        form: FormKind,
        errors: FieldErrors,
    ) -> Result<SubmissionGuard<'_>, SubmitError> {
        if self.state.borrow().phase(form) == FormPhase::Submitting {
            debug!("{form} submission ignored: already in flight");
            return Err(SubmitError::InFlight);
        }

        self.state.send_modify(|current| {
            current.set_submission_error(form, None);
            current.set_errors(form, errors);
        });

        if !errors.is_empty() {
            debug!("{form} form rejected by validation: {errors}");
            return Err(SubmitError::Validation(errors));
        }

        SubmissionGuard::acquire(&self.state, form).ok_or(SubmitError::InFlight)
    }

    fn fail(&self, form: FormKind, err: &SubmitError) {
        warn!("{form} submission failed: {err}");
        let message = err.to_string();
        self.state
            .send_modify(|current| current.set_submission_error(form, Some(message)));
    }

    #[instrument(skip_all, fields(email = %fields.email))]
    async fn run_sign_in(&self, fields: SignInFields) -> Result<SignedIn, SubmitError> {
        let errors = validate_sign_in(&fields.email, &fields.password);
        let _guard = self.prepare(FormKind::SignIn, errors)?;

        let request = LoginRequest {
            email: fields.email,
            password: fields.password,
        };

        let outcome = match self.service.login(&request).await {
            Ok(response) if response.status_code == LOGIN_OK => Ok(SignedIn {
                email: request.email,
                response,
            }),
            Ok(response) => Err(SubmitError::unexpected(response)),
            Err(err) => Err(SubmitError::Remote(err)),
        };

        match outcome {
            Ok(signed_in) => {
                info!("sign-in accepted");
                self.navigator.navigate_to_home();
                Ok(signed_in)
            }
            Err(err) => {
                self.fail(FormKind::SignIn, &err);
                Err(err)
            }
        }
    }

    #[instrument(skip_all, fields(email = %fields.email))]
    async fn run_sign_up(&self, fields: SignUpFields) -> Result<SignedIn, SubmitError> {
        let errors = validate_sign_up(&fields.fullname, &fields.email, &fields.password);
        let _guard = self.prepare(FormKind::SignUp, errors)?;

        let request = RegisterRequest {
            full_name: fields.fullname,
            email: fields.email,
            password: fields.password,
        };

        let registered = match self.service.register(&request).await {
            Ok(response) if response.status_code == REGISTER_CREATED => Ok(()),
            Ok(response) => Err(SubmitError::unexpected(response)),
            Err(err) => Err(SubmitError::Remote(err)),
        };

        if let Err(err) = registered {
            self.fail(FormKind::SignUp, &err);
            return Err(err);
        }

        info!("registration accepted, signing in");

        // a sign-in already running holds the form until it finishes
        let mut rx = self.state.subscribe();
        if rx
            .wait_for(|current| current.phase(FormKind::SignIn) == FormPhase::Idle)
            .await
            .is_err()
        {
            debug!("state channel closed before sign-in became idle");
        }

        let chained = self
            .run_sign_in(SignInFields {
                email: request.email,
                password: request.password,
            })
            .await;

        match &chained {
            Err(SubmitError::InFlight) => {
                debug!("chained sign-in raced another submission");
            }
            Err(err) if self.chained_errors == ChainedErrorSlot::SignUp => {
                self.fail(FormKind::SignUp, err);
            }
            _ => {}
        }

        chained
    }
}
