//! Subjects and the observer capability trait.

use super::list::ObserverList;
use crate::config::RegistryConfig;
use crate::dispatch::dispatch;
use crate::error::{HandlerResult, Result};
use crate::types::DispatchReport;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Something that can be notified by a [`Subject`].
///
/// Closures of the form `Fn(&C) -> HandlerResult` are observers already.
pub trait Observer<C: ?Sized>: Send + Sync {
    fn update(&self, context: &C) -> HandlerResult;
}

impl<C: ?Sized, F> Observer<C> for F
where
    F: Fn(&C) -> HandlerResult + Send + Sync,
{
    fn update(&self, context: &C) -> HandlerResult {
        self(context)
    }
}

/// Wrap a closure as a shareable observer.
pub fn observer_fn<C, F>(f: F) -> Arc<dyn Observer<C>>
where
    C: ?Sized,
    F: Fn(&C) -> HandlerResult + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Owns an observer list and notifies it.
///
/// All methods take `&self`; the list sits behind a lock that is never held
/// while observers run, so an observer may add, remove or notify on the
/// same subject from inside `update`.
pub struct Subject<C: ?Sized> {
    observers: RwLock<ObserverList<dyn Observer<C>>>,
    config: RegistryConfig,
}

impl<C: ?Sized> Subject<C> {
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            observers: RwLock::new(ObserverList::new()),
            config,
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Register an observer. Returns the new observer count.
    pub fn add_observer(&self, observer: Arc<dyn Observer<C>>) -> usize {
        let count = self.observers.write().add(observer);
        debug!(count, "observer added");
        count
    }

    /// Remove the first registration of `observer`.
    ///
    /// Returns false, and changes nothing, if it was not registered.
    pub fn remove_observer(&self, observer: &Arc<dyn Observer<C>>) -> bool {
        let mut observers = self.observers.write();
        match observers.index_of(observer, 0) {
            Some(index) => {
                // index came from the same guard, so this cannot be out of range
                let removed = observers.remove_at(index).is_ok();
                debug!(index, count = observers.count(), "observer removed");
                removed
            }
            None => {
                trace!("remove_observer: not registered");
                false
            }
        }
    }

    /// Remove the observer at `index`.
    pub fn remove_observer_at(&self, index: usize) -> Result<Arc<dyn Observer<C>>> {
        let mut observers = self.observers.write();
        let removed = observers.remove_at(index)?;
        debug!(index, count = observers.count(), "observer removed");
        Ok(removed)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.read().count()
    }

    pub fn observer_at(&self, index: usize) -> Option<Arc<dyn Observer<C>>> {
        self.observers.read().get(index)
    }

    /// First index at or after `start` holding `observer`.
    pub fn index_of(&self, observer: &Arc<dyn Observer<C>>, start: usize) -> Option<usize> {
        self.observers.read().index_of(observer, start)
    }

    pub fn clear_observers(&self) {
        self.observers.write().clear();
    }

    /// Notify every observer registered at the time of the call, in
    /// registration order.
    ///
    /// Observers added or removed by a handler during this pass take effect
    /// on the next call.
    pub fn notify(&self, context: &C) -> Result<DispatchReport> {
        let snapshot = self.observers.read().snapshot();
        trace!(observers = snapshot.len(), "notify");
        dispatch(snapshot, self.config.dispatch, |observer| {
            observer.update(context)
        })
    }
}

impl<C: ?Sized> Default for Subject<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ?Sized> fmt::Debug for Subject<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subject")
            .field("observers", &self.observers.read().count())
            .field("config", &self.config)
            .finish()
    }
}

/// Observer behavior for a type that owns a [`Subject`].
///
/// Implement `subject()` and the registration methods come for free:
///
/// ```ignore
/// struct Model {
///     value: RwLock<i32>,
///     changes: Subject<i32>,
/// }
///
/// impl Observable<i32> for Model {
///     fn subject(&self) -> &Subject<i32> {
///         &self.changes
///     }
/// }
/// ```
pub trait Observable<C: ?Sized> {
    fn subject(&self) -> &Subject<C>;

    fn add_observer(&self, observer: Arc<dyn Observer<C>>) -> usize {
        self.subject().add_observer(observer)
    }

    fn remove_observer(&self, observer: &Arc<dyn Observer<C>>) -> bool {
        self.subject().remove_observer(observer)
    }

    fn notify(&self, context: &C) -> Result<DispatchReport> {
        self.subject().notify(context)
    }
}
