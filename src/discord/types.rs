use crate::chat::ChannelInfo;
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";

/// Channel types whose topic can carry a directive.
const GUILD_TEXT: u8 = 0;
const GUILD_ANNOUNCEMENT: u8 = 5;

#[derive(Debug, Serialize)]
pub struct CreateMessage<'a> {
    pub content: &'a str,
    pub allowed_mentions: AllowedMentions,
}

#[derive(Debug, Serialize)]
pub struct AllowedMentions {
    pub parse: Vec<&'static str>,
}

#[derive(Debug, Deserialize)]
pub struct DiscordChannel {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
}

impl DiscordChannel {
    pub fn is_text(&self) -> bool {
        self.kind == GUILD_TEXT || self.kind == GUILD_ANNOUNCEMENT
    }
}

impl From<DiscordChannel> for ChannelInfo {
    fn from(channel: DiscordChannel) -> Self {
        ChannelInfo {
            id: channel.id,
            topic: channel.topic,
        }
    }
}

/// Error body returned by the Discord API.
#[derive(Debug, Deserialize)]
pub struct DiscordApiError {
    #[serde(default)]
    pub code: u64,
    pub message: String,
}

#[derive(Clone)]
pub struct DiscordConfig {
    pub bot_token: String,
    pub api_base_url: String,
}

impl std::fmt::Debug for DiscordConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordConfig")
            .field("bot_token", &"<redacted>")
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

impl DiscordConfig {
    pub fn new(bot_token: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            api_base_url: DEFAULT_API_BASE.to_string(),
        }
    }

    pub fn send_message_url(&self, channel_id: &str) -> String {
        format!("{}/channels/{}/messages", self.api_base_url, channel_id)
    }

    pub fn guild_channels_url(&self, guild_id: &str) -> String {
        format!("{}/guilds/{}/channels", self.api_base_url, guild_id)
    }

    pub fn authorization(&self) -> String {
        format!("Bot {}", self.bot_token)
    }
}
