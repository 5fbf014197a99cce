//! Parsing of `login vrc`, `2fa`, `我的vrc` and `vrc help` messages.

use super::{
    binding_render_helpers::{binding_command_usage, LOGIN_USAGE, TWO_FACTOR_USAGE},
    BindingCommand,
};

pub(super) const PROFILE_COMMAND: &str = "我的vrc";

/// Returns `None` when the text is not addressed to this extension.
pub(super) fn parse_binding_command(text: &str) -> Option<BindingCommand> {
    let trimmed = text.trim();
    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let command = parts.next()?;
    let remainder = parts.next().unwrap_or_default().trim();

    match command {
        "login" => parse_login(remainder),
        "2fa" => {
            let mut codes = remainder.split_whitespace();
            match (codes.next(), codes.next()) {
                (Some(code), None) => Some(BindingCommand::TwoFactor {
                    code: code.to_string(),
                }),
                _ => Some(BindingCommand::Invalid {
                    message: TWO_FACTOR_USAGE.to_string(),
                }),
            }
        }
        PROFILE_COMMAND if remainder.is_empty() => Some(BindingCommand::Profile),
        "vrc" if remainder == "help" => Some(BindingCommand::Help),
        _ => None,
    }
}

fn parse_login(args: &str) -> Option<BindingCommand> {
    let mut parts = args.splitn(2, char::is_whitespace);
    if parts.next()? != "vrc" {
        return None;
    }
    let credentials = parts.next().unwrap_or_default().trim();
    let mut credential_parts = credentials.splitn(2, char::is_whitespace);
    let username = credential_parts.next().unwrap_or_default().trim();
    // Everything after the username is the password, so passwords may contain spaces.
    let password = credential_parts.next().unwrap_or_default().trim();
    if username.is_empty() || password.is_empty() {
        return Some(BindingCommand::Invalid {
            message: LOGIN_USAGE.to_string(),
        });
    }
    Some(BindingCommand::Login {
        username: username.to_string(),
        password: password.to_string(),
    })
}

pub(super) fn render_help() -> String {
    binding_command_usage()
}
