use serde::Serialize;
use std::collections::BTreeMap;

/// One channel's active hub subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Topic {
    pub feed_url: String,
    pub channel_id: String,
    pub announce_all: bool,
}

/// In-memory table of active subscriptions, at most one per channel.
///
/// Holds no lock of its own; the relay serializes access to it.
#[derive(Debug, Default)]
pub struct TopicRegistry {
    topics: BTreeMap<String, Topic>,
}

impl TopicRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the topic for `channel_id`, replacing any existing entry in
    /// place. Returns the entry that was replaced.
    pub fn upsert(&mut self, channel_id: &str, feed_url: &str, announce_all: bool) -> Option<Topic> {
        let topic = Topic {
            feed_url: feed_url.to_string(),
            channel_id: channel_id.to_string(),
            announce_all,
        };
        self.topics.insert(channel_id.to_string(), topic)
    }

    pub fn remove_by_channel_id(&mut self, channel_id: &str) -> Option<Topic> {
        self.topics.remove(channel_id)
    }

    /// Exact-string match against the stored feed URL.
    pub fn find_by_feed_url(&self, feed_url: &str) -> Option<&Topic> {
        self.topics.values().find(|t| t.feed_url == feed_url)
    }

    pub fn get(&self, channel_id: &str) -> Option<&Topic> {
        self.topics.get(channel_id)
    }

    pub fn is_feed_referenced(&self, feed_url: &str) -> bool {
        self.find_by_feed_url(feed_url).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Topic> {
        self.topics.values()
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}
