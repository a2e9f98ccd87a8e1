//! Subscriber types for the topic registry.

use crate::error::{DeliveryError, HandlerResult};
use crate::types::{SubscriptionId, SubscriptionToken, Topic};
use crossbeam_channel::{Receiver, RecvError, RecvTimeoutError, Sender, TryRecvError, TrySendError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Receives `(topic, data)` for every publish on a subscribed topic.
pub trait Handler<T: ?Sized>: Send + Sync {
    fn handle(&self, topic: &Topic, data: &T) -> HandlerResult;
}

impl<T: ?Sized, F> Handler<T> for F
where
    F: Fn(&Topic, &T) -> HandlerResult + Send + Sync,
{
    fn handle(&self, topic: &Topic, data: &T) -> HandlerResult {
        self(topic, data)
    }
}

/// Registered handler plus the id its token refers to.
pub(crate) struct Subscriber<T: ?Sized> {
    pub(crate) id: SubscriptionId,
    pub(crate) handler: Box<dyn Handler<T>>,
}

/// A publish as seen by a channel-backed subscriber.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Delivery<T> {
    pub topic: Topic,
    pub data: T,
}

/// Handler that forwards every publish into a bounded channel.
pub(crate) struct ChannelForwarder<T> {
    sender: Sender<Delivery<T>>,
}

impl<T> ChannelForwarder<T> {
    pub(crate) fn new(sender: Sender<Delivery<T>>) -> Self {
        Self { sender }
    }
}

impl<T: Clone + Send> Handler<T> for ChannelForwarder<T> {
    fn handle(&self, topic: &Topic, data: &T) -> HandlerResult {
        let delivery = Delivery {
            topic: topic.clone(),
            data: data.clone(),
        };
        match self.sender.try_send(delivery) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(DeliveryError::Full.into()),
            Err(TrySendError::Disconnected(_)) => Err(DeliveryError::Disconnected.into()),
        }
    }
}

/// Handle to a channel-backed subscription.
///
/// Dropping the handle disconnects the channel; the next publish to the
/// topic removes the subscription. Pass `token()` to `PubSub::unsubscribe`
/// to remove it right away.
pub struct ChannelSubscription<T> {
    token: SubscriptionToken,
    receiver: Receiver<Delivery<T>>,
}

impl<T> ChannelSubscription<T> {
    pub(crate) fn new(token: SubscriptionToken, receiver: Receiver<Delivery<T>>) -> Self {
        Self { token, receiver }
    }

    pub fn token(&self) -> &SubscriptionToken {
        &self.token
    }

    /// Channel to receive deliveries.
    pub fn receiver(&self) -> &Receiver<Delivery<T>> {
        &self.receiver
    }

    /// Receive the next delivery (blocking).
    pub fn recv(&self) -> Result<Delivery<T>, RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a delivery (non-blocking).
    pub fn try_recv(&self) -> Result<Delivery<T>, TryRecvError> {
        self.receiver.try_recv()
    }

    /// Receive with timeout.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Delivery<T>, RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}
