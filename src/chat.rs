use crate::errors::ChatError;
use futures_util::future::BoxFuture;

/// Mention token that notifies every member of a channel.
pub const ANNOUNCE_ALL_MENTION: &str = "@everyone";

/// A chat channel as seen by the relay: its id and current topic text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelInfo {
    pub id: String,
    pub topic: Option<String>,
}

impl ChannelInfo {
    pub fn new(id: impl Into<String>, topic: Option<&str>) -> Self {
        Self {
            id: id.into(),
            topic: topic.map(str::to_string),
        }
    }
}

/// Channel metadata changes coming from the chat platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    /// Every channel visible at startup.
    Ready(Vec<ChannelInfo>),
    Created(ChannelInfo),
    Updated(ChannelInfo),
    Deleted { channel_id: String },
}

/// Outbound side of the chat platform.
pub trait ChatSink: Send + Sync {
    fn send_message<'a>(&'a self, channel_id: &'a str, body: &'a str)
        -> BoxFuture<'a, Result<(), ChatError>>;
}

/// Lists the channels the relay watches, with their current topics.
pub trait ChannelDirectory: Send + Sync {
    fn list_channels(&self) -> BoxFuture<'_, Result<Vec<ChannelInfo>, ChatError>>;
}

/// Message body announcing a new item.
pub fn format_announcement(link: &str, announce_all: bool) -> String {
    if announce_all {
        format!("{ANNOUNCE_ALL_MENTION} {link}")
    } else {
        link.to_string()
    }
}
