//! Observer lists and subjects.
//!
//! A [`Subject`] owns an [`ObserverList`] and notifies it synchronously, in
//! registration order, from a snapshot taken when `notify` starts.

mod list;
mod subject;

pub use list::ObserverList;
pub use subject::{observer_fn, Observable, Observer, Subject};
