/// Consecutive failed channel listings after which the chat platform is
/// considered gone.
pub const MAX_CONSECUTIVE_FAILURES: u32 = 5;

/// Capacity of the channel event queue between the watcher and the relay.
pub const EVENT_QUEUE_SIZE: usize = 64;
