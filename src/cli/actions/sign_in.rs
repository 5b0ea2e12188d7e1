use super::failure_report;
use crate::form::{AuthFormController, FormKind, SignInRequest};
use crate::remote::{Endpoints, HttpAuthService};
use anyhow::{Result, bail};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info};

#[derive(Debug)]
pub struct Args {
    pub endpoints: Endpoints,
    pub email: String,
    pub password: SecretString,
}

/// Execute the sign-in action.
/// # Errors
/// Returns an error if validation fails or the auth service rejects the credentials.
pub async fn execute(args: Args) -> Result<()> {
    let service = HttpAuthService::new(&args.endpoints)?;
    debug!("login endpoint: {}", service.login_url());

    let controller = AuthFormController::new(service, || info!("navigating to home"));

    let request = SignInRequest {
        email: args.email,
        password: args.password.expose_secret().to_string(),
    };

    match controller.sign_in(request).await {
        Ok(signed_in) => {
            println!("Signed in as {}", signed_in.email);
            Ok(())
        }
        Err(err) => {
            for line in failure_report(&controller.snapshot(), FormKind::SignIn, &err) {
                eprintln!("{line}");
            }
            bail!("sign-in failed: {err}")
        }
    }
}
