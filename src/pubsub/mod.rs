//! Topic-based publish/subscribe.
//!
//! Handlers subscribe to a topic name and receive `(topic, data)` for every
//! publish on it. Delivery is synchronous, in subscription order, from a
//! snapshot of the topic's subscribers taken when `publish` starts.
//!
//! # Example
//!
//! ```ignore
//! let bus = JsonPubSub::new();
//!
//! let token = bus.subscribe("inbox/new", |topic: &Topic, mail: &Value| {
//!     println!("{}: {}", topic, mail["subject"]);
//!     Ok(())
//! });
//!
//! bus.publish("inbox/new", &json!({ "subject": "hello" }))?;
//! bus.unsubscribe(&token);
//! ```

mod manager;
mod types;

pub use manager::{JsonPubSub, PubSub};
pub use types::{ChannelSubscription, Delivery, Handler};
