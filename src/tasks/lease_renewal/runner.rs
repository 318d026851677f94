use crate::relay::Relay;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval_at, Instant};

/// Re-subscribes every active topic once per `every` so hub leases don't
/// lapse. The first renewal happens one full period after startup, since the
/// initial subscriptions are fresh.
pub async fn start(relay: Arc<Relay>, every: Duration) {
    let mut interval = interval_at(Instant::now() + every, every);
    loop {
        interval.tick().await;

        let topics = relay.topic_count().await;
        if topics == 0 {
            log::debug!("No topics to renew");
            continue;
        }
        let renewed = relay.renew_subscriptions().await;
        log::info!("Renewed {renewed} hub subscriptions for {topics} topics");
    }
}
