use crate::errors::FeedParseError;
use feed_rs::model::{Entry, Link};
use serde::Serialize;

/// One entry from a hub callback payload. Lives only for a single dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedItem {
    pub guid: String,
    pub link: String,
    pub source_feed_url: String,
}

impl FeedItem {
    /// Decodes a pushed feed document into items.
    ///
    /// Every item carries the feed's `rel="self"` link as its source URL, which
    /// is what hubs put in the topic of a notification. A document without a
    /// self link cannot be attributed to a subscription and yields no items.
    pub fn parse_all(body: &[u8]) -> Result<Vec<FeedItem>, FeedParseError> {
        let parsed = feed_rs::parser::parse(body)?;

        let source_feed_url = match find_rel(&parsed.links, "self") {
            Some(link) => link.href.clone(),
            None => {
                log::debug!("Feed {:?} has no self link, ignoring its entries", parsed.id);
                return Ok(Vec::new());
            }
        };

        let items = parsed
            .entries
            .iter()
            .filter_map(|entry| FeedItem::from_entry(entry, &source_feed_url))
            .collect();
        Ok(items)
    }

    fn from_entry(entry: &Entry, source_feed_url: &str) -> Option<FeedItem> {
        if entry.id.is_empty() {
            return None;
        }
        let link = find_rel(&entry.links, "alternate").or_else(|| entry.links.first())?;

        Some(FeedItem {
            guid: entry.id.clone(),
            link: link.href.clone(),
            source_feed_url: source_feed_url.to_string(),
        })
    }
}

fn find_rel<'a>(links: &'a [Link], rel: &str) -> Option<&'a Link> {
    links.iter().find(|l| l.rel.as_deref() == Some(rel))
}
