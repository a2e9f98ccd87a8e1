//! Ordered observer list.

use crate::error::{RegistryError, Result};
use std::fmt;
use std::sync::Arc;

/// Ordered sequence of observers.
///
/// Entries are compared by pointer identity (`Arc::ptr_eq`), never by value.
/// The same `Arc` may appear more than once and is then notified once per
/// occurrence.
pub struct ObserverList<O: ?Sized> {
    observers: Vec<Arc<O>>,
}

impl<O: ?Sized> ObserverList<O> {
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            observers: Vec::with_capacity(capacity),
        }
    }

    /// Append an observer. Returns the new length.
    pub fn add(&mut self, observer: Arc<O>) -> usize {
        self.observers.push(observer);
        self.observers.len()
    }

    /// Number of entries, duplicates included.
    pub fn count(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Observer at `index`, or `None` if out of range.
    pub fn get(&self, index: usize) -> Option<Arc<O>> {
        self.observers.get(index).cloned()
    }

    /// First index at or after `start` holding `observer`.
    pub fn index_of(&self, observer: &Arc<O>, start: usize) -> Option<usize> {
        self.position(start, |candidate| Arc::ptr_eq(candidate, observer))
    }

    /// First index at or after `start` whose entry satisfies `predicate`.
    pub fn position<P>(&self, start: usize, mut predicate: P) -> Option<usize>
    where
        P: FnMut(&Arc<O>) -> bool,
    {
        self.observers
            .iter()
            .enumerate()
            .skip(start)
            .find(|(_, candidate)| predicate(candidate))
            .map(|(index, _)| index)
    }

    /// Remove the entry at `index`, shifting later entries down by one.
    pub fn remove_at(&mut self, index: usize) -> Result<Arc<O>> {
        if index >= self.observers.len() {
            return Err(RegistryError::IndexOutOfRange {
                index,
                len: self.observers.len(),
            });
        }
        Ok(self.observers.remove(index))
    }

    /// Remove the first occurrence of `observer`. Returns false if absent.
    pub fn remove(&mut self, observer: &Arc<O>) -> bool {
        match self.index_of(observer, 0) {
            Some(index) => {
                self.observers.remove(index);
                true
            }
            None => false,
        }
    }

    /// Copy of the current membership, in order.
    pub fn snapshot(&self) -> Vec<Arc<O>> {
        self.observers.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<O>> {
        self.observers.iter()
    }

    pub fn clear(&mut self) {
        self.observers.clear();
    }
}

impl<O: ?Sized> Default for ObserverList<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: ?Sized> Clone for ObserverList<O> {
    fn clone(&self) -> Self {
        Self {
            observers: self.observers.clone(),
        }
    }
}

impl<O: ?Sized> fmt::Debug for ObserverList<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverList")
            .field("count", &self.observers.len())
            .finish()
    }
}
