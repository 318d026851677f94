use once_cell::sync::Lazy;
use regex::Regex;

/// Separates the feed URL from the announce flag in a channel topic.
pub const DIRECTIVE_DELIMITER: char = '#';

/// Flag value that turns on all-members announcements.
const ANNOUNCE_ALL_FLAG: &str = "true";

static FEED_URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https://www\.youtube\.com/xml/feeds/videos\.xml\?channel_id=[^\s#]+$")
        .expect("feed URL pattern is valid")
});

/// Subscription settings parsed from a channel's topic text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicDirective {
    pub feed_url: String,
    pub announce_all: bool,
}

impl TopicDirective {
    /// Reads `<feed url>[#<flag>]` out of a channel topic.
    ///
    /// Topics that don't start with a YouTube channel feed URL are simply not
    /// directives, so this returns `None` rather than an error.
    pub fn parse(topic_text: &str) -> Option<TopicDirective> {
        let mut parts = topic_text.trim().splitn(2, DIRECTIVE_DELIMITER);
        let url = parts.next()?.trim();
        if !FEED_URL_PATTERN.is_match(url) {
            return None;
        }

        let announce_all = parts.next().map(str::trim) == Some(ANNOUNCE_ALL_FLAG);
        Some(TopicDirective {
            feed_url: url.to_string(),
            announce_all,
        })
    }
}
