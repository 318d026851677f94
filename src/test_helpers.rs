use crate::chat::ChatSink;
use crate::errors::{ChatError, SubscriptionError};
use crate::hub::{Hub, HubMode};
use futures_util::future::BoxFuture;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Hub that records every request and accepts or rejects all of them.
#[derive(Default)]
pub struct FakeHub {
    requests: Mutex<Vec<(String, String, HubMode)>>,
    failing: AtomicBool,
}

impl FakeHub {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// (feed url, mode) of each request, oldest first.
    pub fn calls(&self) -> Vec<(String, HubMode)> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(feed, _, mode)| (feed.clone(), *mode))
            .collect()
    }

    pub fn callbacks(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(_, callback, _)| callback.clone())
            .collect()
    }
}

impl Hub for FakeHub {
    fn request<'a>(
        &'a self,
        feed_url: &'a str,
        callback_url: &'a str,
        mode: HubMode,
    ) -> BoxFuture<'a, Result<(), SubscriptionError>> {
        self.requests.lock().unwrap().push((
            feed_url.to_string(),
            callback_url.to_string(),
            mode,
        ));
        let failing = self.failing.load(Ordering::SeqCst);
        Box::pin(async move {
            if failing {
                Err(SubscriptionError::Status {
                    status: 500,
                    body: "hub unavailable".to_string(),
                })
            } else {
                Ok(())
            }
        })
    }
}

/// Chat sink that records sent messages.
#[derive(Default)]
pub struct FakeChat {
    sent: Mutex<Vec<(String, String)>>,
    failing: AtomicBool,
}

impl FakeChat {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

impl ChatSink for FakeChat {
    fn send_message<'a>(
        &'a self,
        channel_id: &'a str,
        body: &'a str,
    ) -> BoxFuture<'a, Result<(), ChatError>> {
        let failing = self.failing.load(Ordering::SeqCst);
        Box::pin(async move {
            // Give overlapping dispatches a chance to interleave.
            tokio::task::yield_now().await;
            if failing {
                return Err(ChatError::Api("Missing Access (code 50001)".to_string()));
            }
            self.sent
                .lock()
                .unwrap()
                .push((channel_id.to_string(), body.to_string()));
            Ok(())
        })
    }
}
