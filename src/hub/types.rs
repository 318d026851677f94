use serde::Serialize;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_HUB_URL: &str = "https://pubsubhubbub.appspot.com/subscribe";
pub const DEFAULT_HUB_TIMEOUT: Duration = Duration::from_secs(10);

/// The hub only reports acceptance; verification of intent happens later.
pub const VERIFY_ASYNC: &str = "async";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HubMode {
    Subscribe,
    Unsubscribe,
}

impl HubMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            HubMode::Subscribe => "subscribe",
            HubMode::Unsubscribe => "unsubscribe",
        }
    }
}

impl fmt::Display for HubMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Form body of a subscription request.
#[derive(Debug, Serialize)]
pub struct HubForm<'a> {
    #[serde(rename = "hub.callback")]
    pub callback: &'a str,
    #[serde(rename = "hub.topic")]
    pub topic: &'a str,
    #[serde(rename = "hub.verify")]
    pub verify: &'static str,
    #[serde(rename = "hub.mode")]
    pub mode: HubMode,
}

#[derive(Debug, Clone)]
pub struct HubConfig {
    pub hub_url: String,
    pub timeout: Duration,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            hub_url: DEFAULT_HUB_URL.to_string(),
            timeout: DEFAULT_HUB_TIMEOUT,
        }
    }
}
