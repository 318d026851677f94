use super::RqRelay;
use actix_web::{get, web, HttpResponse, Responder};
use serde_json::json;

/// Liveness check - simple check to see if the app is alive
#[get("/live")]
pub async fn liveness_check() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness check, reporting how many channels are subscribed
#[get("/ready")]
pub async fn readiness_check(relay: RqRelay) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ready",
        "topics": relay.topic_count().await,
        "delivered": relay.delivered_count().await
    }))
}

pub fn routes() -> actix_web::Scope {
    web::scope("/health")
        .service(liveness_check)
        .service(readiness_check)
}
