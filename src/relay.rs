use crate::{
    chat::{format_announcement, ChannelEvent, ChannelInfo, ChatSink},
    directive::TopicDirective,
    errors::{RelayError, RelayResult, SubscriptionError},
    hub::{Hub, HubMode},
    models::{feed_item::FeedItem, ledger::DeliveryLedger, topic::Topic, topic::TopicRegistry},
};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

/// What happened to one inbound feed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// No channel is subscribed to the item's feed.
    Unmatched,
    /// The item's guid was relayed before.
    Duplicate,
    Delivered,
    /// The chat platform refused the message; the guid is not recorded.
    SendFailed,
}

#[derive(Debug, Default)]
struct RelayState {
    topics: TopicRegistry,
    ledger: DeliveryLedger,
}

/// Owns the subscription table and the delivery ledger and reacts to both
/// channel events and hub callbacks.
///
/// All reads and writes of the two tables go through one async mutex. Item
/// dispatch keeps the lock while the chat message is in flight so overlapping
/// callbacks carrying the same guid cannot both send.
pub struct Relay {
    hub: Arc<dyn Hub>,
    chat: Arc<dyn ChatSink>,
    callback_url: String,
    state: Mutex<RelayState>,
}

impl Relay {
    pub fn new(hub: Arc<dyn Hub>, chat: Arc<dyn ChatSink>, callback_url: impl Into<String>) -> Self {
        Self {
            hub,
            chat,
            callback_url: callback_url.into(),
            state: Mutex::new(RelayState::default()),
        }
    }

    pub fn callback_url(&self) -> &str {
        &self.callback_url
    }

    /// Consumes channel events one at a time until the chat transport goes
    /// away, which is reported as [`RelayError::TransportDisconnect`].
    pub async fn run(&self, mut events: mpsc::Receiver<ChannelEvent>) -> RelayResult<()> {
        while let Some(event) = events.recv().await {
            self.handle_event(event).await;
        }
        tracing::error!("Channel event stream closed");
        Err(RelayError::TransportDisconnect)
    }

    pub async fn handle_event(&self, event: ChannelEvent) {
        match event {
            ChannelEvent::Ready(channels) => {
                tracing::info!(channels = channels.len(), "Chat platform ready");
                for channel in &channels {
                    self.log_failure(&channel.id, self.apply_topic(channel).await);
                }
            }
            ChannelEvent::Created(channel) | ChannelEvent::Updated(channel) => {
                self.log_failure(&channel.id, self.apply_topic(&channel).await);
            }
            ChannelEvent::Deleted { channel_id } => {
                self.log_failure(&channel_id, self.release_channel(&channel_id).await);
            }
        }
    }

    fn log_failure(&self, channel_id: &str, result: Result<(), SubscriptionError>) {
        if let Err(e) = result {
            tracing::warn!(channel_id, error = %e, "Subscription change failed");
        }
    }

    /// Brings the channel's subscription in line with its topic text.
    async fn apply_topic(&self, channel: &ChannelInfo) -> Result<(), SubscriptionError> {
        match channel.topic.as_deref().and_then(TopicDirective::parse) {
            Some(directive) => self.subscribe_channel(&channel.id, directive).await,
            None => self.release_channel(&channel.id).await,
        }
    }

    async fn subscribe_channel(
        &self,
        channel_id: &str,
        directive: TopicDirective,
    ) -> Result<(), SubscriptionError> {
        self.hub
            .request(&directive.feed_url, &self.callback_url, HubMode::Subscribe)
            .await?;

        let stale_feed = {
            let mut state = self.state.lock().await;
            let previous =
                state
                    .topics
                    .upsert(channel_id, &directive.feed_url, directive.announce_all);
            match previous {
                Some(p) if p.feed_url != directive.feed_url
                    && !state.topics.is_feed_referenced(&p.feed_url) =>
                {
                    Some(p.feed_url)
                }
                _ => None,
            }
        };
        tracing::info!(
            channel_id,
            feed_url = %directive.feed_url,
            announce_all = directive.announce_all,
            "Subscribed channel"
        );

        if let Some(stale_feed) = stale_feed {
            self.hub
                .request(&stale_feed, &self.callback_url, HubMode::Unsubscribe)
                .await?;
            tracing::info!(channel_id, feed_url = %stale_feed, "Unsubscribed replaced feed");
        }
        Ok(())
    }

    /// Drops the channel's topic with one unsubscribe call for its feed. The
    /// entry is removed once the hub call has finished, whatever its result.
    /// If another channel still uses the feed, the feed is subscribed again
    /// for it.
    async fn release_channel(&self, channel_id: &str) -> Result<(), SubscriptionError> {
        let Some(topic) = self.state.lock().await.topics.get(channel_id).cloned() else {
            return Ok(());
        };

        let result = self
            .hub
            .request(&topic.feed_url, &self.callback_url, HubMode::Unsubscribe)
            .await;

        let still_used = {
            let mut state = self.state.lock().await;
            state.topics.remove_by_channel_id(channel_id);
            state.topics.is_feed_referenced(&topic.feed_url)
        };
        tracing::info!(channel_id, feed_url = %topic.feed_url, "Removed channel topic");
        result?;

        if still_used {
            self.hub
                .request(&topic.feed_url, &self.callback_url, HubMode::Subscribe)
                .await?;
            tracing::info!(feed_url = %topic.feed_url, "Resubscribed feed still used by another channel");
        }
        Ok(())
    }

    /// Routes one pushed item to its channel, at most once per guid.
    pub async fn handle(&self, item: &FeedItem) -> DispatchOutcome {
        let mut state = self.state.lock().await;

        let Some(topic) = state.topics.find_by_feed_url(&item.source_feed_url).cloned() else {
            tracing::debug!(feed_url = %item.source_feed_url, guid = %item.guid, "No subscriber for item");
            return DispatchOutcome::Unmatched;
        };
        if state.ledger.contains(&item.guid) {
            tracing::debug!(guid = %item.guid, "Item already delivered");
            return DispatchOutcome::Duplicate;
        }

        let body = format_announcement(&item.link, topic.announce_all);
        match self.chat.send_message(&topic.channel_id, &body).await {
            Ok(()) => {
                state.ledger.record(&item.guid);
                tracing::info!(channel_id = %topic.channel_id, guid = %item.guid, "Delivered item");
                DispatchOutcome::Delivered
            }
            Err(e) => {
                tracing::error!(channel_id = %topic.channel_id, guid = %item.guid, error = %e, "Failed to deliver item");
                DispatchOutcome::SendFailed
            }
        }
    }

    /// Re-subscribes every distinct feed once to refresh hub leases. Returns
    /// how many feeds the hub accepted.
    pub async fn renew_subscriptions(&self) -> usize {
        let mut feeds: Vec<String> = self
            .topics()
            .await
            .into_iter()
            .map(|t| t.feed_url)
            .collect();
        feeds.sort();
        feeds.dedup();

        let mut renewed = 0;
        for feed_url in &feeds {
            match self
                .hub
                .request(feed_url, &self.callback_url, HubMode::Subscribe)
                .await
            {
                Ok(()) => renewed += 1,
                Err(e) => tracing::warn!(feed_url = %feed_url, error = %e, "Lease renewal failed"),
            }
        }
        renewed
    }

    pub async fn topics(&self) -> Vec<Topic> {
        self.state.lock().await.topics.iter().cloned().collect()
    }

    pub async fn topic_count(&self) -> usize {
        self.state.lock().await.topics.len()
    }

    pub async fn delivered_count(&self) -> usize {
        self.state.lock().await.ledger.len()
    }
}
