pub mod sign_in;
pub mod sign_up;

// Internal "interpreter" for `Action`.
mod run;

use crate::form::{AuthFormState, FormKind, SubmitError};

#[derive(Debug)]
pub enum Action {
    SignIn(sign_in::Args),
    SignUp(sign_up::Args),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}

/// Lines to show the user for a failed submission: inline field messages for
/// validation errors, otherwise the form's submission error.
#[must_use]
pub fn failure_report(state: &AuthFormState, form: FormKind, err: &SubmitError) -> Vec<String> {
    match err {
        SubmitError::Validation(errors) => errors
            .iter()
            .map(|(field, error)| format!("{field}: {}", error.message(field)))
            .collect(),
        _ => vec![
            state
                .submission_error(form)
                .map_or_else(|| err.to_string(), ToString::to_string),
        ],
    }
}
