//! Named publish/subscribe channels.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::broadcast;

pub const DEFAULT_CAPACITY: usize = 256;

/// Registry of broadcast channels keyed by name.
///
/// A channel exists while it has subscribers. Messages are opaque text;
/// slow subscribers lose the oldest messages once `capacity` is exceeded.
#[derive(Clone, Debug)]
pub struct ChannelHub {
    channels: Arc<DashMap<String, broadcast::Sender<String>>>,
    capacity: usize,
}

impl ChannelHub {
    pub fn new(capacity: usize) -> Self {
        Self {
            channels: Arc::new(DashMap::new()),
            capacity: capacity.max(1),
        }
    }

    pub fn subscribe(&self, channel: &str) -> broadcast::Receiver<String> {
        self.channels
            .entry(channel.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// Send `message` to every current subscriber of `channel`.
    ///
    /// Returns the number of subscribers reached.
    pub fn publish(&self, channel: &str, message: impl Into<String>) -> usize {
        match self.channels.get(channel) {
            Some(sender) => sender.send(message.into()).unwrap_or(0),
            None => 0,
        }
    }

    pub fn subscriber_count(&self, channel: &str) -> usize {
        self.channels
            .get(channel)
            .map(|sender| sender.receiver_count())
            .unwrap_or(0)
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Drop `channel` if nobody listens on it anymore.
    pub fn prune(&self, channel: &str) {
        self.channels
            .remove_if(channel, |_, sender| sender.receiver_count() == 0);
    }
}

impl Default for ChannelHub {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
