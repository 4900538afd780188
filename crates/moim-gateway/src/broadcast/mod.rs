//! Redis channel subscription bookkeeping
//!
//! One Redis subscription per gathering channel, shared by every local
//! socket in that room. Reference counts decide when to subscribe and
//! unsubscribe on the single pub/sub connection.

use dashmap::DashMap;
use moim_cache::{PubSubChannel, Subscriber, SubscriberError};
use std::sync::Arc;
use tracing::debug;

/// Reference-counted channel subscriptions over a shared [`Subscriber`]
pub struct ChannelSubscriptions {
    subscriber: Arc<Subscriber>,
    refcounts: DashMap<String, usize>,
}

impl ChannelSubscriptions {
    /// Create a new subscription table
    pub fn new(subscriber: Arc<Subscriber>) -> Self {
        Self {
            subscriber,
            refcounts: DashMap::new(),
        }
    }

    /// Get the underlying subscriber
    pub fn subscriber(&self) -> &Subscriber {
        &self.subscriber
    }

    /// Register interest in a channel, subscribing on first use
    pub async fn join(&self, channel: &PubSubChannel) -> Result<(), SubscriberError> {
        let name = channel.name();
        let first = {
            let mut entry = self.refcounts.entry(name.clone()).or_insert(0);
            *entry += 1;
            *entry == 1
        };

        if first {
            debug!(channel = %name, "Subscribing to Redis channel");
            self.subscriber.subscribe(&[channel.clone()]).await?;
        }

        Ok(())
    }

    /// Drop interest in a channel, unsubscribing when the last socket leaves
    pub async fn leave(&self, channel: &PubSubChannel) -> Result<(), SubscriberError> {
        let name = channel.name();
        let last = match self.refcounts.get_mut(&name) {
            Some(mut entry) => {
                *entry = entry.saturating_sub(1);
                *entry == 0
            }
            None => false,
        };

        if last {
            self.refcounts.remove(&name);
            debug!(channel = %name, "Unsubscribing from Redis channel");
            self.subscriber.unsubscribe(&[channel.clone()]).await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use moim_core::Snowflake;

    use super::*;

    #[test]
    fn test_channel_names_are_stable_keys() {
        let a = PubSubChannel::chat(Snowflake::new(7));
        let b = PubSubChannel::chat(Snowflake::new(7));
        assert_eq!(a.name(), b.name());
    }
}
