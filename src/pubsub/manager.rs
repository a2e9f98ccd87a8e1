//! Topic registry: subscribe, publish, unsubscribe.

use crate::config::RegistryConfig;
use crate::dispatch::dispatch;
use crate::error::{DeliveryError, HandlerError, HandlerResult, Result};
use crate::observers::ObserverList;
use crate::types::{DispatchReport, SubscriptionId, SubscriptionToken, Topic};
use crossbeam_channel::bounded;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

use super::types::{ChannelForwarder, ChannelSubscription, Handler, Subscriber};

/// Registry for untyped JSON payloads.
pub type JsonPubSub = PubSub<serde_json::Value>;

/// Maps topics to independent subscriber lists.
///
/// Publishers and subscribers only share a topic name. Each registry is an
/// ordinary value: construct one and hand out references to it.
pub struct PubSub<T: ?Sized> {
    /// Subscribers by topic, in subscription order.
    topics: RwLock<HashMap<Topic, ObserverList<Subscriber<T>>>>,
    /// Counter for generating subscription IDs.
    next_id: AtomicU64,
    config: RegistryConfig,
}

impl<T: ?Sized> PubSub<T> {
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            topics: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            config,
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Subscribe `handler` to `topic`, creating the topic if needed.
    ///
    /// Subscribing the same handler twice yields two independent tokens.
    pub fn subscribe<F>(&self, topic: impl Into<Topic>, handler: F) -> SubscriptionToken
    where
        F: Fn(&Topic, &T) -> HandlerResult + Send + Sync + 'static,
    {
        self.subscribe_handler(topic, handler)
    }

    /// Like [`subscribe`](Self::subscribe), for any [`Handler`] implementation.
    pub fn subscribe_handler<H>(&self, topic: impl Into<Topic>, handler: H) -> SubscriptionToken
    where
        H: Handler<T> + 'static,
    {
        let topic = topic.into();
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let subscriber = Arc::new(Subscriber {
            id,
            handler: Box::new(handler),
        });

        let count = self
            .topics
            .write()
            .entry(topic.clone())
            .or_default()
            .add(subscriber);
        debug!(%topic, %id, count, "subscribed");

        SubscriptionToken { topic, id }
    }

    /// Remove exactly the subscription named by `token`.
    ///
    /// Returns false if it was already removed or never existed.
    pub fn unsubscribe(&self, token: &SubscriptionToken) -> bool {
        let mut topics = self.topics.write();
        let removed = self.remove_locked(&mut topics, &token.topic, token.id);
        if !removed {
            trace!(topic = %token.topic, id = %token.id, "unsubscribe: not subscribed");
        }
        removed
    }

    /// Deliver `(topic, data)` to every current subscriber of `topic`.
    ///
    /// A topic nobody subscribed to is not an error; the report is empty.
    /// Channel subscribers whose receiving end was dropped are skipped and
    /// removed once the pass is over; they are not reported as failures.
    pub fn publish(&self, topic: impl AsRef<str>, data: &T) -> Result<DispatchReport> {
        let name = topic.as_ref();
        let (topic, snapshot) = match self.topics.read().get_key_value(name) {
            Some((topic, subscribers)) if !subscribers.is_empty() => {
                (topic.clone(), subscribers.snapshot())
            }
            _ => {
                trace!(topic = name, "publish: no subscribers");
                return Ok(DispatchReport::default());
            }
        };

        trace!(%topic, subscribers = snapshot.len(), "publish");
        let mut closed = Vec::new();
        let result = dispatch(snapshot, self.config.dispatch, |subscriber| {
            match subscriber.handler.handle(&topic, data) {
                Err(err) if is_disconnected(&err) => {
                    closed.push(subscriber.id);
                    Ok(())
                }
                other => other,
            }
        });

        // Remove dropped subscribers
        if !closed.is_empty() {
            let mut topics = self.topics.write();
            for &id in &closed {
                if self.remove_locked(&mut topics, &topic, id) {
                    debug!(%topic, %id, "removed disconnected subscriber");
                }
            }
        }

        result.map(|mut report| {
            report.delivered -= closed.len();
            report
        })
    }

    /// Remove one subscription while holding the write guard.
    fn remove_locked(
        &self,
        topics: &mut HashMap<Topic, ObserverList<Subscriber<T>>>,
        topic: &Topic,
        id: SubscriptionId,
    ) -> bool {
        let Some(subscribers) = topics.get_mut(topic.as_str()) else {
            return false;
        };
        let Some(index) = subscribers.position(0, |s| s.id == id) else {
            return false;
        };

        let removed = subscribers.remove_at(index).is_ok();
        let remaining = subscribers.count();
        if remaining == 0 && self.config.prune_empty_topics {
            topics.remove(topic.as_str());
        }
        debug!(%topic, %id, remaining, "unsubscribed");
        removed
    }

    pub fn subscriber_count(&self, topic: impl AsRef<str>) -> usize {
        self.topics
            .read()
            .get(topic.as_ref())
            .map_or(0, |subscribers| subscribers.count())
    }

    pub fn has_subscribers(&self, topic: impl AsRef<str>) -> bool {
        self.subscriber_count(topic) > 0
    }

    /// Total subscriptions across all topics.
    pub fn subscription_count(&self) -> usize {
        self.topics.read().values().map(|s| s.count()).sum()
    }

    /// Known topics, sorted by name.
    pub fn topics(&self) -> Vec<Topic> {
        let mut topics: Vec<Topic> = self.topics.read().keys().cloned().collect();
        topics.sort();
        topics
    }

    /// Drop every subscription on every topic.
    pub fn clear(&self) {
        self.topics.write().clear();
    }
}

impl<T: Clone + Send + 'static> PubSub<T> {
    /// Subscribe a bounded channel to `topic`.
    ///
    /// Each publish is cloned into the channel. A full or disconnected
    /// channel counts as a handler failure for that publish.
    pub fn subscribe_channel(
        &self,
        topic: impl Into<Topic>,
        buffer_size: usize,
    ) -> ChannelSubscription<T> {
        let (sender, receiver) = bounded(buffer_size);
        let token = self.subscribe_handler(topic, ChannelForwarder::new(sender));
        ChannelSubscription::new(token, receiver)
    }
}

fn is_disconnected(err: &HandlerError) -> bool {
    err.downcast_ref::<DeliveryError>() == Some(&DeliveryError::Disconnected)
}

impl<T: ?Sized> Default for PubSub<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for PubSub<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PubSub")
            .field("topics", &self.topics.read().len())
            .field("config", &self.config)
            .finish()
    }
}
