//! Redis Pub/Sub module.
//!
//! Fans chat messages out across gateway instances.

mod channels;
mod publisher;
mod subscriber;

pub use channels::{PubSubChannel, CHAT_CHANNEL_PREFIX};
pub use publisher::{ChatEvent, Publisher};
pub use subscriber::{
    ReceivedMessage, Subscriber, SubscriberBuilder, SubscriberConfig, SubscriberError,
    SubscriberResult,
};
