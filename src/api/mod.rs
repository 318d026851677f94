pub mod callback;
pub mod health;

use crate::relay::Relay;
use actix_web::web;

pub type RqRelay = web::Data<Relay>;

/// Registers every route the service exposes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health::routes())
        .service(callback::receive)
        .service(callback::verify);
}
