pub mod api;
pub mod chat;
pub mod config;
pub mod directive;
pub mod discord;
pub mod errors;
pub mod hub;
pub mod models;
pub mod observability;
pub mod relay;
pub mod tasks;
#[cfg(test)]
pub mod test_helpers;

pub use relay::Relay;
