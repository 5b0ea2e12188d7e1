//! Command-line argument dispatch.
//!
//! Maps validated CLI matches to the action to run: a sign-in or a sign-up
//! against the configured auth service endpoints.

use crate::cli::actions::{Action, sign_in, sign_up};
use crate::cli::commands::{
    ARG_API_URL, ARG_LOGIN_PATH, ARG_REGISTER_PATH,
    credentials::{
        ARG_CHAINED_ERRORS, ARG_EMAIL, ARG_FULLNAME, ARG_PASSWORD, CMD_SIGN_IN, CMD_SIGN_UP,
    },
};
use crate::form::ChainedErrorSlot;
use crate::remote::{DEFAULT_LOGIN_PATH, DEFAULT_REGISTER_PATH, Endpoints};
use anyhow::{Context, Result, anyhow};
use secrecy::SecretString;

fn required(matches: &clap::ArgMatches, name: &str) -> Result<String> {
    matches
        .get_one::<String>(name)
        .cloned()
        .with_context(|| format!("missing required argument: --{name}"))
}

fn endpoints(matches: &clap::ArgMatches) -> Result<Endpoints> {
    let api_url = required(matches, ARG_API_URL)?;
    let login_path = matches
        .get_one::<String>(ARG_LOGIN_PATH)
        .map_or(DEFAULT_LOGIN_PATH, String::as_str);
    let register_path = matches
        .get_one::<String>(ARG_REGISTER_PATH)
        .map_or(DEFAULT_REGISTER_PATH, String::as_str);

    let endpoints = Endpoints::new(api_url)
        .with_login_path(login_path)
        .with_register_path(register_path);

    // fail before any network activity if the URL cannot be used
    endpoints
        .endpoint_url(&endpoints.login_path)
        .context("invalid AUTHFORM_API_URL")?;

    Ok(endpoints)
}

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if required arguments are missing or the API URL is invalid.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let endpoints = endpoints(matches)?;

    match matches.subcommand() {
        Some((CMD_SIGN_IN, sub)) => Ok(Action::SignIn(sign_in::Args {
            endpoints,
            email: required(sub, ARG_EMAIL)?,
            password: SecretString::from(required(sub, ARG_PASSWORD)?),
        })),
        Some((CMD_SIGN_UP, sub)) => {
            let chained_errors = sub
                .get_one::<String>(ARG_CHAINED_ERRORS)
                .map_or(Ok(ChainedErrorSlot::default()), |value| value.parse())
                .map_err(|e| anyhow!(e))?;

            Ok(Action::SignUp(sign_up::Args {
                endpoints,
                fullname: required(sub, ARG_FULLNAME)?,
                email: required(sub, ARG_EMAIL)?,
                password: SecretString::from(required(sub, ARG_PASSWORD)?),
                chained_errors,
            }))
        }
        Some((name, _)) => Err(anyhow!("unknown command: {name}")),
        None => Err(anyhow!("missing command: {CMD_SIGN_IN} or {CMD_SIGN_UP}")),
    }
}
