//! # Observer Registry
//!
//! In-process notification primitives: observer lists, subjects and a
//! topic-based publish/subscribe registry.
//!
//! ## Core Concepts
//!
//! - **ObserverList**: Ordered observers, duplicates allowed, identity by pointer
//! - **Subject**: Owns an observer list and notifies it synchronously
//! - **PubSub**: Topic names mapped to independent subscriber lists
//! - **Snapshot dispatch**: A notify/publish pass only sees the membership
//!   captured when it started
//!
//! ## Example
//!
//! ```ignore
//! use observer_registry::{observer_fn, Subject};
//!
//! let subject = Subject::new();
//! subject.add_observer(observer_fn(|n: &i32| {
//!     println!("got {}", n);
//!     Ok(())
//! }));
//!
//! subject.notify(&5)?;
//! ```

pub mod config;
mod dispatch;
pub mod error;
pub mod observers;
pub mod pubsub;
pub mod types;

// Re-exports
pub use config::{DispatchPolicy, RegistryConfig};
pub use error::{DeliveryError, HandlerError, HandlerFailure, HandlerResult, RegistryError, Result};
pub use observers::{observer_fn, Observable, Observer, ObserverList, Subject};
pub use pubsub::{ChannelSubscription, Delivery, Handler, JsonPubSub, PubSub};
pub use types::{DispatchReport, SubscriptionId, SubscriptionToken, Topic};
