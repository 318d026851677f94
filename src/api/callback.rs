use super::RqRelay;
use crate::models::feed_item::FeedItem;
use crate::relay::DispatchOutcome;
use actix_web::{get, post, web, HttpResponse, Responder};
use serde::Deserialize;

/// Body returned to the hub for every notification.
pub const ACK_BODY: &str = "Ok.";

/// Content notification pushed by the hub.
///
/// The hub only cares that the notification arrived, so the answer is always
/// the same acknowledgement; decode failures are logged and dropped.
#[post("/")]
pub async fn receive(relay: RqRelay, body: web::Bytes) -> impl Responder {
    match FeedItem::parse_all(&body) {
        Ok(items) => {
            let mut delivered = 0;
            for item in &items {
                if relay.handle(item).await == DispatchOutcome::Delivered {
                    delivered += 1;
                }
            }
            tracing::info!(items = items.len(), delivered, "Processed hub notification");
        }
        Err(e) => {
            tracing::warn!(error = %e, bytes = body.len(), "Discarding undecodable hub notification");
        }
    }

    HttpResponse::Ok().content_type("text/plain").body(ACK_BODY)
}

#[derive(Debug, Deserialize)]
pub struct VerificationQuery {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.topic")]
    pub topic: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
    #[serde(rename = "hub.reason")]
    pub reason: Option<String>,
}

/// Verification of intent: the hub confirms a (un)subscribe request by
/// expecting its challenge echoed back.
#[get("/")]
pub async fn verify(query: web::Query<VerificationQuery>) -> impl Responder {
    let query = query.into_inner();
    let topic = query.topic.as_deref().unwrap_or_default();

    if query.mode.as_deref() == Some("denied") {
        tracing::warn!(topic, reason = ?query.reason, "Hub denied subscription");
        return HttpResponse::Ok().content_type("text/plain").body(ACK_BODY);
    }

    match query.challenge {
        Some(challenge) => {
            tracing::info!(topic, mode = ?query.mode, "Answering hub verification");
            HttpResponse::Ok().content_type("text/plain").body(challenge)
        }
        None => HttpResponse::BadRequest().content_type("text/plain").body("missing hub.challenge"),
    }
}
