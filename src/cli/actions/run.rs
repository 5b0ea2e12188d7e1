use crate::cli::{
    actions::{Action, sign_in, sign_up},
    telemetry,
};
use anyhow::Result;

/// Execute the provided action.
// This is the single dispatch point for all CLI actions.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    let result = match action {
        Action::SignIn(args) => sign_in::execute(args).await,
        Action::SignUp(args) => sign_up::execute(args).await,
    };

    telemetry::shutdown_tracer();

    result
}
