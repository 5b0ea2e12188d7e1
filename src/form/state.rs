//! Form state: field values, validation and submission errors, and view flags.
//! The sign-in and sign-up forms each own their fields, so typing into one
//! form never changes the other. Passwords are redacted from `Debug` output.

use super::validate::{Field, FieldErrors};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormKind {
    SignIn,
    SignUp,
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SignIn => f.write_str("sign-in"),
            Self::SignUp => f.write_str("sign-up"),
        }
    }
}

/// Submission phase of one form. `Submitting` is the only phase in which the
/// form counts as loading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormPhase {
    #[default]
    Idle,
    Submitting,
}

#[derive(Clone, Default, PartialEq, Eq)]
pub struct SignInFields {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for SignInFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignInFields")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Clone, Default, PartialEq, Eq)]
pub struct SignUpFields {
    pub fullname: String,
    pub email: String,
    pub password: String,
}

impl fmt::Debug for SignUpFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignUpFields")
            .field("fullname", &self.fullname)
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Everything one form shows: its inputs, inline field errors, and the
/// message from the last failed submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSlot<F> {
    pub fields: F,
    pub errors: FieldErrors,
    pub submission_error: Option<String>,
    pub phase: FormPhase,
    /// Submissions that passed validation and were sent to the service.
    pub attempts: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewState {
    pub is_sign_up: bool,
    pub show_password: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthFormState {
    pub view: ViewState,
    pub sign_in: FormSlot<SignInFields>,
    pub sign_up: FormSlot<SignUpFields>,
}

impl AuthFormState {
    /// True while either form has a submission in flight.
    #[must_use]
    pub fn loading(&self) -> bool {
        self.sign_in.phase == FormPhase::Submitting || self.sign_up.phase == FormPhase::Submitting
    }

    #[must_use]
    pub fn active_form(&self) -> FormKind {
        if self.view.is_sign_up {
            FormKind::SignUp
        } else {
            FormKind::SignIn
        }
    }

    #[must_use]
    pub fn phase(&self, form: FormKind) -> FormPhase {
        match form {
            FormKind::SignIn => self.sign_in.phase,
            FormKind::SignUp => self.sign_up.phase,
        }
    }

    pub(crate) fn phase_mut(&mut self, form: FormKind) -> &mut FormPhase {
        match form {
            FormKind::SignIn => &mut self.sign_in.phase,
            FormKind::SignUp => &mut self.sign_up.phase,
        }
    }

    #[must_use]
    pub fn attempts(&self, form: FormKind) -> u64 {
        match form {
            FormKind::SignIn => self.sign_in.attempts,
            FormKind::SignUp => self.sign_up.attempts,
        }
    }

    /// Move `form` from `Idle` to `Submitting` and count the attempt.
    /// Returns `false` and changes nothing if it is already submitting.
    pub(crate) fn begin_submission(&mut self, form: FormKind) -> bool {
        if self.phase(form) == FormPhase::Submitting {
            return false;
        }
        *self.phase_mut(form) = FormPhase::Submitting;
        match form {
            FormKind::SignIn => self.sign_in.attempts += 1,
            FormKind::SignUp => self.sign_up.attempts += 1,
        }
        true
    }

    #[must_use]
    pub fn errors(&self, form: FormKind) -> &FieldErrors {
        match form {
            FormKind::SignIn => &self.sign_in.errors,
            FormKind::SignUp => &self.sign_up.errors,
        }
    }

    pub(crate) fn set_errors(&mut self, form: FormKind, errors: FieldErrors) {
        match form {
            FormKind::SignIn => self.sign_in.errors = errors,
            FormKind::SignUp => self.sign_up.errors = errors,
        }
    }

    #[must_use]
    pub fn submission_error(&self, form: FormKind) -> Option<&str> {
        match form {
            FormKind::SignIn => self.sign_in.submission_error.as_deref(),
            FormKind::SignUp => self.sign_up.submission_error.as_deref(),
        }
    }

    pub(crate) fn set_submission_error(&mut self, form: FormKind, message: Option<String>) {
        match form {
            FormKind::SignIn => self.sign_in.submission_error = message,
            FormKind::SignUp => self.sign_up.submission_error = message,
        }
    }

    /// Store a keystroke. Returns `false` when the form has no such field.
    pub(crate) fn set_field(&mut self, form: FormKind, field: Field, value: String) -> bool {
        match (form, field) {
            (FormKind::SignIn, Field::Email) => self.sign_in.fields.email = value,
            (FormKind::SignIn, Field::Password) => self.sign_in.fields.password = value,
            (FormKind::SignIn, Field::Fullname) => return false,
            (FormKind::SignUp, Field::Fullname) => self.sign_up.fields.fullname = value,
            (FormKind::SignUp, Field::Email) => self.sign_up.fields.email = value,
            (FormKind::SignUp, Field::Password) => self.sign_up.fields.password = value,
        }
        true
    }
}
