pub mod channel_watcher;
pub mod lease_renewal;
pub mod types;
