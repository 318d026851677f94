use thiserror::Error;

/// Failure of a single subscribe/unsubscribe request to the hub.
#[derive(Debug, Error)]
pub enum SubscriptionError {
    #[error("hub request failed: {0}")]
    Request(String),
    #[error("hub rejected request with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("hub request timed out after {0}s")]
    Timeout(u64),
}

impl From<reqwest::Error> for SubscriptionError {
    fn from(err: reqwest::Error) -> Self {
        SubscriptionError::Request(err.to_string())
    }
}

/// Inbound callback body could not be decoded into feed items.
#[derive(Debug, Error)]
#[error("unable to parse feed: {0}")]
pub struct FeedParseError(#[from] pub feed_rs::parser::ParseFeedError);

/// Failure talking to the chat platform.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("chat request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("chat platform returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("chat platform error: {0}")]
    Api(String),
    #[error("chat platform rejected the bot token")]
    Unauthorized,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

impl ConfigError {
    pub fn invalid(key: &'static str, message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            key,
            message: message.into(),
        }
    }
}

/// Application-wide error type
#[derive(Debug, Error)]
pub enum RelayError {
    #[error(transparent)]
    Subscription(#[from] SubscriptionError),
    #[error(transparent)]
    FeedParse(#[from] FeedParseError),
    #[error(transparent)]
    Chat(#[from] ChatError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("lost connection to the chat platform")]
    TransportDisconnect,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for application errors
pub type RelayResult<T> = Result<T, RelayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_names_the_key() {
        let err = ConfigError::invalid("FR_PORT", "not a number");
        assert_eq!(err.to_string(), "invalid value for FR_PORT: not a number");
    }

    #[test]
    fn test_subscription_error_wraps_transparently() {
        let err: RelayError = SubscriptionError::Timeout(10).into();
        assert_eq!(err.to_string(), "hub request timed out after 10s");
    }
}
