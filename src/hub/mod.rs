pub mod client;
pub mod types;

use crate::errors::SubscriptionError;
use futures_util::future::BoxFuture;

pub use client::HubClient;
pub use types::{HubConfig, HubMode};

/// Something that accepts subscribe/unsubscribe requests for feed topics.
///
/// A successful result only means the hub accepted the request; the hub
/// verifies the callback out of band.
pub trait Hub: Send + Sync {
    fn request<'a>(
        &'a self,
        feed_url: &'a str,
        callback_url: &'a str,
        mode: HubMode,
    ) -> BoxFuture<'a, Result<(), SubscriptionError>>;
}
