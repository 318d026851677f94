use super::types::{AllowedMentions, CreateMessage, DiscordApiError, DiscordChannel, DiscordConfig};
use crate::chat::{ChannelDirectory, ChannelInfo, ChatSink, ANNOUNCE_ALL_MENTION};
use crate::errors::ChatError;
use futures_util::future::BoxFuture;
use reqwest::{Client, Response, StatusCode};
use std::sync::Arc;
use std::time::Duration;

const USER_AGENT: &str = concat!(
    "DiscordBot (https://github.com/feedrelay/feedrelay, ",
    env!("CARGO_PKG_VERSION"),
    ")"
);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub struct DiscordClient {
    client: Client,
    config: DiscordConfig,
}

impl DiscordClient {
    pub fn new(config: DiscordConfig) -> Result<Self, ChatError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self { client, config })
    }

    fn build_send_request(
        &self,
        channel_id: &str,
        content: &str,
    ) -> Result<reqwest::Request, reqwest::Error> {
        let parse = if content.starts_with(ANNOUNCE_ALL_MENTION) {
            vec!["everyone"]
        } else {
            Vec::new()
        };
        let message = CreateMessage {
            content,
            allowed_mentions: AllowedMentions { parse },
        };

        self.client
            .post(self.config.send_message_url(channel_id))
            .header(reqwest::header::AUTHORIZATION, self.config.authorization())
            .json(&message)
            .build()
    }

    pub async fn send(&self, channel_id: &str, content: &str) -> Result<(), ChatError> {
        let request = self.build_send_request(channel_id, content)?;
        let response = self.client.execute(request).await?;
        check_response(response).await?;
        Ok(())
    }

    /// Text channels of a guild together with their current topics.
    pub async fn list_channels(&self, guild_id: &str) -> Result<Vec<ChannelInfo>, ChatError> {
        let response = self
            .client
            .get(self.config.guild_channels_url(guild_id))
            .header(reqwest::header::AUTHORIZATION, self.config.authorization())
            .send()
            .await?;

        let channels: Vec<DiscordChannel> = check_response(response).await?.json().await?;
        Ok(channels
            .into_iter()
            .filter(DiscordChannel::is_text)
            .map(ChannelInfo::from)
            .collect())
    }
}

async fn check_response(response: Response) -> Result<Response, ChatError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED {
        return Err(ChatError::Unauthorized);
    }

    let body = response.text().await?;
    match serde_json::from_str::<DiscordApiError>(&body) {
        Ok(api_error) => Err(ChatError::Api(format!(
            "{} (code {})",
            api_error.message, api_error.code
        ))),
        Err(_) => Err(ChatError::Status {
            status: status.as_u16(),
            body,
        }),
    }
}

impl ChatSink for DiscordClient {
    fn send_message<'a>(
        &'a self,
        channel_id: &'a str,
        body: &'a str,
    ) -> BoxFuture<'a, Result<(), ChatError>> {
        Box::pin(self.send(channel_id, body))
    }
}

/// The text channels of one guild, the scope the relay watches.
pub struct GuildDirectory {
    client: Arc<DiscordClient>,
    guild_id: String,
}

impl GuildDirectory {
    pub fn new(client: Arc<DiscordClient>, guild_id: impl Into<String>) -> Self {
        Self {
            client,
            guild_id: guild_id.into(),
        }
    }
}

impl ChannelDirectory for GuildDirectory {
    fn list_channels(&self) -> BoxFuture<'_, Result<Vec<ChannelInfo>, ChatError>> {
        Box::pin(self.client.list_channels(&self.guild_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> DiscordClient {
        DiscordClient::new(DiscordConfig::new("token-123")).unwrap()
    }

    fn body_json(request: &reqwest::Request) -> serde_json::Value {
        serde_json::from_slice(request.body().unwrap().as_bytes().unwrap()).unwrap()
    }

    #[test]
    fn test_send_request_targets_channel() {
        let request = client()
            .build_send_request("42", "https://www.youtube.com/watch?v=v1")
            .unwrap();

        assert_eq!(
            request.url().as_str(),
            "https://discord.com/api/v10/channels/42/messages"
        );
        assert_eq!(request.headers()["authorization"], "Bot token-123");
        assert_eq!(
            body_json(&request),
            serde_json::json!({
                "content": "https://www.youtube.com/watch?v=v1",
                "allowed_mentions": { "parse": [] }
            })
        );
    }

    #[test]
    fn test_everyone_mention_is_allowed_when_announcing() {
        let request = client()
            .build_send_request("42", "@everyone https://www.youtube.com/watch?v=v1")
            .unwrap();
        assert_eq!(
            body_json(&request)["allowed_mentions"]["parse"],
            serde_json::json!(["everyone"])
        );
    }
}
