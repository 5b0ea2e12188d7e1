use super::failure_report;
use crate::form::{AuthFormController, ChainedErrorSlot, FormKind, SignUpRequest};
use crate::remote::{Endpoints, HttpAuthService};
use anyhow::{Result, bail};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info};

#[derive(Debug)]
pub struct Args {
    pub endpoints: Endpoints,
    pub fullname: String,
    pub email: String,
    pub password: SecretString,
    pub chained_errors: ChainedErrorSlot,
}

/// Execute the sign-up action: register, then sign in with the same credentials.
/// # Errors
/// Returns an error if validation fails or either remote step is rejected.
pub async fn execute(args: Args) -> Result<()> {
    let service = HttpAuthService::new(&args.endpoints)?;
    debug!(
        "register endpoint: {}, login endpoint: {}",
        service.register_url(),
        service.login_url()
    );

    let controller = AuthFormController::new(service, || info!("navigating to home"))
        .with_chained_errors(args.chained_errors);
    controller.show_sign_up();

    let request = SignUpRequest {
        fullname: args.fullname,
        email: args.email,
        password: args.password.expose_secret().to_string(),
    };

    match controller.sign_up(request).await {
        Ok(signed_in) => {
            println!("Registered and signed in as {}", signed_in.email);
            Ok(())
        }
        Err(err) => {
            for line in failure_report(&controller.snapshot(), FormKind::SignUp, &err) {
                eprintln!("{line}");
            }
            bail!("sign-up failed: {err}")
        }
    }
}
