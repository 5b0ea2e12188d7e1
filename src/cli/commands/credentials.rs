//! `signin` and `signup` subcommands. The password can come from the
//! environment so it does not have to appear in shell history.

use clap::{Arg, Command, builder::PossibleValuesParser};

pub const CMD_SIGN_IN: &str = "signin";
pub const CMD_SIGN_UP: &str = "signup";

pub const ARG_EMAIL: &str = "email";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_FULLNAME: &str = "fullname";
pub const ARG_CHAINED_ERRORS: &str = "chained-errors";

fn email_arg() -> Arg {
    Arg::new(ARG_EMAIL)
        .short('e')
        .long("email")
        .help("Account email address")
        .env("AUTHFORM_EMAIL")
        .required(true)
}

fn password_arg() -> Arg {
    Arg::new(ARG_PASSWORD)
        .short('p')
        .long("password")
        .help("Account password")
        .env("AUTHFORM_PASSWORD")
        .hide_env_values(true)
        .required(true)
}

#[must_use]
pub fn sign_in() -> Command {
    Command::new(CMD_SIGN_IN)
        .about("Sign in with an email and password")
        .arg(email_arg())
        .arg(password_arg())
}

#[must_use]
pub fn sign_up() -> Command {
    Command::new(CMD_SIGN_UP)
        .about("Create an account, then sign in with it")
        .arg(
            Arg::new(ARG_FULLNAME)
                .short('n')
                .long("fullname")
                .help("Full name for the new account")
                .env("AUTHFORM_FULLNAME")
                .required(true),
        )
        .arg(email_arg())
        .arg(password_arg())
        .arg(
            Arg::new(ARG_CHAINED_ERRORS)
                .long("chained-errors")
                .help("Form that reports a failed sign-in after registration")
                .env("AUTHFORM_CHAINED_ERRORS")
                .default_value("sign-up")
                .value_parser(PossibleValuesParser::new(["sign-up", "sign-in"])),
        )
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.subcommand(sign_in()).subcommand(sign_up())
}
