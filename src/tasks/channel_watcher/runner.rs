use crate::{
    chat::{ChannelDirectory, ChannelEvent, ChannelInfo},
    errors::ChatError,
    tasks::types::MAX_CONSECUTIVE_FAILURES,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Channel id to topic text, as of the last successful listing.
type Snapshot = HashMap<String, Option<String>>;

/// Polls the channel directory and turns changes into [`ChannelEvent`]s.
///
/// The first listing is sent as `Ready`. Returning drops `events`, which the
/// relay sees as the chat transport disconnecting.
pub async fn start(
    directory: Arc<dyn ChannelDirectory>,
    poll_interval: Duration,
    events: mpsc::Sender<ChannelEvent>,
) {
    let mut interval = tokio::time::interval(poll_interval);
    let mut snapshot: Option<Snapshot> = None;
    let mut failures = 0;

    loop {
        interval.tick().await;

        let channels = match directory.list_channels().await {
            Ok(channels) => {
                failures = 0;
                channels
            }
            Err(ChatError::Unauthorized) => {
                log::error!("Chat platform rejected the bot token, stopping channel watcher");
                return;
            }
            Err(e) => {
                failures += 1;
                log::warn!("Error listing channels ({failures}/{MAX_CONSECUTIVE_FAILURES}): {e}");
                if failures >= MAX_CONSECUTIVE_FAILURES {
                    log::error!("Giving up on chat platform after {failures} failed polls");
                    return;
                }
                continue;
            }
        };

        let batch = match &snapshot {
            None => vec![ChannelEvent::Ready(channels.clone())],
            Some(previous) => diff_channels(previous, &channels),
        };
        snapshot = Some(
            channels
                .into_iter()
                .map(|c| (c.id, c.topic))
                .collect(),
        );

        if !batch.is_empty() {
            log::debug!("Channel watcher emitting {} events", batch.len());
        }
        for event in batch {
            if events.send(event).await.is_err() {
                log::info!("Relay stopped listening, stopping channel watcher");
                return;
            }
        }
    }
}

/// Events that turn `previous` into `current`. Channels whose topic text is
/// unchanged produce nothing.
fn diff_channels(previous: &Snapshot, current: &[ChannelInfo]) -> Vec<ChannelEvent> {
    let mut events = Vec::new();

    for channel in current {
        match previous.get(&channel.id) {
            None => events.push(ChannelEvent::Created(channel.clone())),
            Some(topic) if *topic != channel.topic => {
                events.push(ChannelEvent::Updated(channel.clone()))
            }
            Some(_) => {}
        }
    }

    let mut deleted: Vec<&String> = previous
        .keys()
        .filter(|id| !current.iter().any(|c| &c.id == *id))
        .collect();
    deleted.sort();
    events.extend(deleted.into_iter().map(|id| ChannelEvent::Deleted {
        channel_id: id.clone(),
    }));

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::future::BoxFuture;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays scripted listings, then reports an invalid token.
    struct ScriptedDirectory {
        listings: Mutex<VecDeque<Result<Vec<ChannelInfo>, ChatError>>>,
    }

    impl ScriptedDirectory {
        fn new(listings: Vec<Result<Vec<ChannelInfo>, ChatError>>) -> Arc<Self> {
            Arc::new(Self {
                listings: Mutex::new(listings.into()),
            })
        }
    }

    impl ChannelDirectory for ScriptedDirectory {
        fn list_channels(&self) -> BoxFuture<'_, Result<Vec<ChannelInfo>, ChatError>> {
            let next = self
                .listings
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(ChatError::Unauthorized));
            Box::pin(async move { next })
        }
    }

    async fn collect(directory: Arc<ScriptedDirectory>) -> Vec<ChannelEvent> {
        let (tx, mut rx) = mpsc::channel(16);
        start(directory, Duration::from_millis(5), tx).await;
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        events
    }

    fn channel(id: &str, topic: Option<&str>) -> ChannelInfo {
        ChannelInfo::new(id, topic)
    }

    #[test]
    fn test_diff_reports_changes_only() {
        let previous: Snapshot = [
            ("1".to_string(), Some("same".to_string())),
            ("2".to_string(), Some("old".to_string())),
            ("3".to_string(), None),
        ]
        .into_iter()
        .collect();
        let current = vec![
            channel("1", Some("same")),
            channel("2", Some("new")),
            channel("4", None),
        ];

        assert_eq!(
            diff_channels(&previous, &current),
            vec![
                ChannelEvent::Updated(channel("2", Some("new"))),
                ChannelEvent::Created(channel("4", None)),
                ChannelEvent::Deleted {
                    channel_id: "3".to_string()
                },
            ]
        );
    }

    #[actix_web::test]
    async fn test_watcher_emits_ready_then_changes() {
        let directory = ScriptedDirectory::new(vec![
            Ok(vec![channel("1", Some("a"))]),
            Ok(vec![channel("1", Some("a"))]),
            Ok(vec![channel("1", Some("b")), channel("2", None)]),
            Ok(vec![channel("2", None)]),
        ]);

        assert_eq!(
            collect(directory).await,
            vec![
                ChannelEvent::Ready(vec![channel("1", Some("a"))]),
                ChannelEvent::Updated(channel("1", Some("b"))),
                ChannelEvent::Created(channel("2", None)),
                ChannelEvent::Deleted {
                    channel_id: "1".to_string()
                },
            ]
        );
    }

    #[actix_web::test]
    async fn test_watcher_survives_transient_failures() {
        let directory = ScriptedDirectory::new(vec![
            Err(ChatError::Api("gateway unavailable".to_string())),
            Ok(vec![channel("1", None)]),
        ]);
        let events = collect(directory).await;
        assert_eq!(events, vec![ChannelEvent::Ready(vec![channel("1", None)])]);
    }

    #[actix_web::test]
    async fn test_watcher_gives_up_after_repeated_failures() {
        let failures = (0..MAX_CONSECUTIVE_FAILURES)
            .map(|_| Err(ChatError::Api("gateway unavailable".to_string())))
            .chain(std::iter::once(Ok(vec![channel("1", None)])))
            .collect();
        let events = collect(ScriptedDirectory::new(failures)).await;
        assert!(events.is_empty());
    }
}
