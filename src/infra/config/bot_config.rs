//! Process configuration, read from environment variables (a `.env` file is
//! loaded first when present).
//!
//! - `DISCORD_TOKEN` - bot token (required)
//! - `STATSY_DEV_MODE` - `true`/`1` switches to the `./` prefix and local error reports
//! - `STATSY_DEFAULT_PREFIX` - prefix for guilds without their own (default `!`)
//! - `STATSY_OPERATORS` - comma-separated user ids allowed to run operator commands
//! - `STATSY_ERROR_CHANNEL_ID` - channel receiving crash reports
//! - `STATSY_PASTE_URL` - hastebin-compatible paste server
//! - `STATSY_HANDLER_TIMEOUT_SECS` - per-command time limit (default 30)
//! - `STATSY_DATA_DIR` - where JSON documents and `tags.db` live (default `data`)

use crate::core::dispatch::DEFAULT_PREFIX;
use crate::infra::paste::hastebin_client::DEFAULT_PASTE_URL;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const ENV_PREFIX: &str = "STATSY";
const DEFAULT_HANDLER_TIMEOUT_SECS: u64 = 30;
const DEFAULT_DATA_DIR: &str = "data";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Missing {0} environment variable! Create a .env file with your bot token.")]
    Missing(String),

    #[error("Invalid value for {var}: {value:?}")]
    Invalid { var: String, value: String },
}

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub token: String,
    pub dev_mode: bool,
    pub default_prefix: String,
    pub operators: Vec<u64>,
    pub error_channel_id: Option<u64>,
    pub paste_url: String,
    pub handler_timeout: Duration,
    pub data_dir: PathBuf,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the config from any variable source. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |suffix: &str| -> (String, Option<String>) {
            let name = format!("{}_{}", ENV_PREFIX, suffix);
            let value = lookup(&name).filter(|v| !v.trim().is_empty());
            (name, value)
        };

        let token = lookup("DISCORD_TOKEN")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::Missing("DISCORD_TOKEN".to_string()))?;

        let dev_mode = match get("DEV_MODE") {
            (_, None) => false,
            (name, Some(value)) => parse_bool(&name, &value)?,
        };

        let default_prefix = get("DEFAULT_PREFIX")
            .1
            .unwrap_or_else(|| DEFAULT_PREFIX.to_string());

        let operators = match get("OPERATORS") {
            (_, None) => Vec::new(),
            (name, Some(value)) => value
                .split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(|id| parse_u64(&name, id))
                .collect::<Result<_, _>>()?,
        };

        let error_channel_id = match get("ERROR_CHANNEL_ID") {
            (_, None) => None,
            (name, Some(value)) => Some(parse_u64(&name, &value)?),
        };

        let paste_url = get("PASTE_URL")
            .1
            .unwrap_or_else(|| DEFAULT_PASTE_URL.to_string());

        let handler_timeout = match get("HANDLER_TIMEOUT_SECS") {
            (_, None) => Duration::from_secs(DEFAULT_HANDLER_TIMEOUT_SECS),
            (name, Some(value)) => match parse_u64(&name, &value)? {
                0 => {
                    return Err(ConfigError::Invalid { var: name, value });
                }
                secs => Duration::from_secs(secs),
            },
        };

        let data_dir = get("DATA_DIR")
            .1
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        Ok(Self {
            token,
            dev_mode,
            default_prefix,
            operators,
            error_channel_id,
            paste_url,
            handler_timeout,
            data_dir,
        })
    }

    pub fn guilds_path(&self) -> PathBuf {
        self.data_dir.join("guilds.json")
    }

    pub fn blacklist_path(&self) -> PathBuf {
        self.data_dir.join("blacklist.json")
    }

    pub fn tags_db_path(&self) -> PathBuf {
        self.data_dir.join("tags.db")
    }
}

fn parse_bool(var: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var: var.to_string(),
            value: value.to_string(),
        }),
    }
}

fn parse_u64(var: &str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        var: var.to_string(),
        value: value.to_string(),
    })
}
