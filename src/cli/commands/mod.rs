pub mod credentials;
pub mod logging;

use crate::remote::{DEFAULT_LOGIN_PATH, DEFAULT_REGISTER_PATH};
use clap::{
    Arg, ColorChoice, Command,
    builder::styling::{AnsiColor, Effects, Styles},
};

pub const ARG_API_URL: &str = "api-url";
pub const ARG_LOGIN_PATH: &str = "login-path";
pub const ARG_REGISTER_PATH: &str = "register-path";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("authform")
        .about("Sign in and sign up against a remote auth service")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new(ARG_API_URL)
                .short('u')
                .long("api-url")
                .help("Base URL of the auth service, example: https://api.example.com/api/v1")
                .env("AUTHFORM_API_URL")
                .required(true),
        )
        .arg(
            Arg::new(ARG_LOGIN_PATH)
                .long("login-path")
                .help("Login endpoint path, relative to the API URL")
                .default_value(DEFAULT_LOGIN_PATH)
                .env("AUTHFORM_LOGIN_PATH"),
        )
        .arg(
            Arg::new(ARG_REGISTER_PATH)
                .long("register-path")
                .help("Registration endpoint path, relative to the API URL")
                .default_value(DEFAULT_REGISTER_PATH)
                .env("AUTHFORM_REGISTER_PATH"),
        );

    let command = credentials::with_args(command);
    logging::with_args(command)
}
