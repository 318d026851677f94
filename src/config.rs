use crate::{
    discord::{types::DEFAULT_API_BASE, DiscordConfig},
    errors::ConfigError,
    hub::{
        types::{DEFAULT_HUB_TIMEOUT, DEFAULT_HUB_URL},
        HubConfig,
    },
};
use std::time::Duration;
use url::Url;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);
/// Leases on the public YouTube hub run for roughly five days.
pub const DEFAULT_RESUBSCRIBE_INTERVAL: Duration = Duration::from_secs(4 * 24 * 60 * 60);

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub discord: DiscordConfig,
    pub guild_id: String,
    pub callback_url: String,
    pub port: u16,
    pub hub: HubConfig,
    pub poll_interval: Duration,
    pub resubscribe_interval: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup; `from_env` passes the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let bot_token = required("FR_DISCORD_TOKEN")?;
        let guild_id = required("FR_GUILD_ID")?;
        let callback_url = parse_callback_url(&required("FR_CALLBACK_URL")?)?;

        let port = match lookup("FR_PORT") {
            Some(port) => {
                log::info!("Using port from FR_PORT: {}", port);
                port.trim()
                    .parse::<u16>()
                    .map_err(|e| ConfigError::invalid("FR_PORT", e.to_string()))?
            }
            None => {
                log::info!("Using default port: {}", DEFAULT_PORT);
                DEFAULT_PORT
            }
        };

        let hub_url = match lookup("FR_HUB_URL") {
            Some(url) => {
                Url::parse(&url).map_err(|e| ConfigError::invalid("FR_HUB_URL", e.to_string()))?;
                log::info!("Using hub from FR_HUB_URL: {}", url);
                url
            }
            None => DEFAULT_HUB_URL.to_string(),
        };
        let hub_timeout =
            seconds(&lookup, "FR_HUB_TIMEOUT_SECS")?.unwrap_or(DEFAULT_HUB_TIMEOUT);

        let api_base_url = lookup("FR_DISCORD_API_BASE")
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        Ok(Self {
            discord: DiscordConfig {
                bot_token,
                api_base_url,
            },
            guild_id,
            callback_url,
            port,
            hub: HubConfig {
                hub_url,
                timeout: hub_timeout,
            },
            poll_interval: seconds(&lookup, "FR_POLL_INTERVAL_SECS")?
                .unwrap_or(DEFAULT_POLL_INTERVAL),
            resubscribe_interval: seconds(&lookup, "FR_RESUBSCRIBE_INTERVAL_SECS")?
                .unwrap_or(DEFAULT_RESUBSCRIBE_INTERVAL),
        })
    }
}

fn parse_callback_url(raw: &str) -> Result<String, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::invalid("FR_CALLBACK_URL", e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(raw.to_string()),
        scheme => Err(ConfigError::invalid(
            "FR_CALLBACK_URL",
            format!("unsupported scheme {scheme}"),
        )),
    }
}

fn seconds<F>(lookup: &F, key: &'static str) -> Result<Option<Duration>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::invalid(key, "must be greater than zero")),
        Ok(secs) => Ok(Some(Duration::from_secs(secs))),
        Err(e) => Err(ConfigError::invalid(key, e.to_string())),
    }
}
