use super::types::{HubConfig, HubForm, HubMode, VERIFY_ASYNC};
use super::Hub;
use crate::errors::SubscriptionError;
use futures_util::future::BoxFuture;
use reqwest::Client;

const USER_AGENT: &str = concat!("feedrelay/", env!("CARGO_PKG_VERSION"));

/// PubSubHubbub subscriber. One attempt per call, bounded by the configured
/// timeout.
pub struct HubClient {
    client: Client,
    config: HubConfig,
}

impl HubClient {
    pub fn new(config: HubConfig) -> Result<Self, SubscriptionError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()?;

        Ok(Self { client, config })
    }

    pub fn hub_url(&self) -> &str {
        &self.config.hub_url
    }

    fn build_request(
        &self,
        feed_url: &str,
        callback_url: &str,
        mode: HubMode,
    ) -> Result<reqwest::Request, reqwest::Error> {
        let form = HubForm {
            callback: callback_url,
            topic: feed_url,
            verify: VERIFY_ASYNC,
            mode,
        };
        self.client.post(&self.config.hub_url).form(&form).build()
    }

    pub async fn send(
        &self,
        feed_url: &str,
        callback_url: &str,
        mode: HubMode,
    ) -> Result<(), SubscriptionError> {
        let request = self.build_request(feed_url, callback_url, mode)?;
        let response = self.client.execute(request).await.map_err(|e| {
            if e.is_timeout() {
                SubscriptionError::Timeout(self.config.timeout.as_secs())
            } else {
                SubscriptionError::from(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SubscriptionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(feed_url, %mode, status = status.as_u16(), "Hub accepted request");
        Ok(())
    }
}

impl Hub for HubClient {
    fn request<'a>(
        &'a self,
        feed_url: &'a str,
        callback_url: &'a str,
        mode: HubMode,
    ) -> BoxFuture<'a, Result<(), SubscriptionError>> {
        Box::pin(self.send(feed_url, callback_url, mode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const FEED: &str = "https://www.youtube.com/xml/feeds/videos.xml?channel_id=ABC";
    const CALLBACK: &str = "https://relay.example.com/";

    fn client_for(hub_url: &str) -> HubClient {
        HubClient::new(HubConfig {
            hub_url: hub_url.to_string(),
            timeout: Duration::from_secs(2),
        })
        .unwrap()
    }

    #[test]
    fn test_request_is_form_encoded() {
        let client = client_for("https://pubsubhubbub.appspot.com/subscribe");
        let request = client
            .build_request(FEED, CALLBACK, HubMode::Subscribe)
            .unwrap();

        assert_eq!(request.method(), reqwest::Method::POST);
        assert_eq!(request.url().as_str(), "https://pubsubhubbub.appspot.com/subscribe");
        assert_eq!(
            request.headers()["content-type"],
            "application/x-www-form-urlencoded"
        );

        let body = std::str::from_utf8(request.body().unwrap().as_bytes().unwrap()).unwrap();
        let fields: Vec<(String, String)> = url::form_urlencoded::parse(body.as_bytes())
            .into_owned()
            .collect();
        assert_eq!(
            fields,
            vec![
                ("hub.callback".to_string(), CALLBACK.to_string()),
                ("hub.topic".to_string(), FEED.to_string()),
                ("hub.verify".to_string(), "async".to_string()),
                ("hub.mode".to_string(), "subscribe".to_string()),
            ]
        );
    }

    #[test]
    fn test_unsubscribe_mode_is_sent() {
        let client = client_for("https://hub.example.com/");
        let request = client
            .build_request(FEED, CALLBACK, HubMode::Unsubscribe)
            .unwrap();
        let body = std::str::from_utf8(request.body().unwrap().as_bytes().unwrap()).unwrap();
        assert!(body.ends_with("hub.mode=unsubscribe"));
    }

    #[actix_web::test]
    async fn test_unreachable_hub_is_subscription_error() {
        // Nothing listens on port 1.
        let client = client_for("http://127.0.0.1:1/subscribe");
        let result = client.send(FEED, CALLBACK, HubMode::Subscribe).await;
        assert!(matches!(
            result,
            Err(SubscriptionError::Request(_)) | Err(SubscriptionError::Timeout(_))
        ));
    }

    #[actix_web::test]
    async fn test_silent_hub_times_out() {
        // Connections queue in the backlog but never get an answer.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let client = HubClient::new(HubConfig {
            hub_url: format!("http://{addr}/subscribe"),
            timeout: Duration::from_millis(100),
        })
        .unwrap();

        let result = client.send(FEED, CALLBACK, HubMode::Subscribe).await;
        assert!(matches!(result, Err(SubscriptionError::Timeout(_))), "{result:?}");
        drop(listener);
    }
}
