use std::path::PathBuf;

use clap::Parser;
use vrc_bind_api::{VrcApiConfig, DEFAULT_VRC_API_BASE, DEFAULT_VRC_USER_AGENT};

fn parse_positive_u64(value: &str) -> Result<u64, String> {
    let parsed = value
        .parse::<u64>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if parsed == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(parsed)
}

#[derive(Debug, Parser)]
#[command(
    name = "vrc-bind",
    about = "Bind chat users to VRChat accounts from a console transport",
    version
)]
/// Public struct `Cli` holding runtime configuration.
pub struct Cli {
    #[arg(
        long,
        env = "VRC_BIND_API_BASE",
        default_value = DEFAULT_VRC_API_BASE,
        help = "Base URL of the VRChat API."
    )]
    pub api_base: String,

    #[arg(
        long,
        env = "VRC_BIND_STORE_PATH",
        default_value = ".vrc-bind/usr_data.json",
        help = "JSON file holding platform user id to VRChat session bindings."
    )]
    pub store_path: PathBuf,

    #[arg(
        long,
        env = "VRC_BIND_REQUEST_TIMEOUT_MS",
        default_value_t = 15_000,
        value_parser = parse_positive_u64,
        help = "Timeout for each VRChat HTTP request in milliseconds."
    )]
    pub request_timeout_ms: u64,

    #[arg(
        long,
        env = "VRC_BIND_USER_AGENT",
        default_value = DEFAULT_VRC_USER_AGENT,
        help = "User-Agent sent to VRChat; the API rejects requests without one."
    )]
    pub user_agent: String,
}

impl Cli {
    pub fn api_config(&self) -> VrcApiConfig {
        VrcApiConfig {
            api_base: self.api_base.clone(),
            user_agent: self.user_agent.clone(),
            request_timeout_ms: self.request_timeout_ms,
        }
    }
}
