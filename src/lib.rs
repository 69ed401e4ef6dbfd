//! # rxsubject: single-threaded subjects in the Reactive Extensions style
//!
//! A subject is both an [`Observer`] and an [`Observable`]: values pushed
//! into it are forwarded to every consumer that subscribed to it.
//!
//! ```rust
//! use std::{cell::RefCell, rc::Rc};
//!
//! use rxsubject::prelude::*;
//!
//! let subject = AsyncSubject::<&str, ()>::new();
//! let seen = Rc::new(RefCell::new(vec![]));
//! let c_seen = seen.clone();
//! subject.clone().subscribe(move |v| c_seen.borrow_mut().push(v));
//!
//! subject.clone().next("first");
//! subject.clone().next("last");
//! subject.clone().complete();
//! assert_eq!(*seen.borrow(), vec!["last"]);
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Subject`] | Multicasts every notification to current subscribers |
//! | [`ReplaySubject`] | Also replays a bounded history to late subscribers |
//! | [`AsyncSubject`] | Emits only the last value, and only on completion |
//! | [`Observable`] | Anything that can be subscribed to |
//! | [`Observer`] | Consumes `next`, `error`, and `complete` events |
//! | [`Subscription`] | Handle to cancel an active subscription |
//!
//! [`Subject`]: subject::Subject
//! [`ReplaySubject`]: subject::ReplaySubject
//! [`AsyncSubject`]: subject::AsyncSubject
//! [`Observable`]: observable::Observable
//! [`Observer`]: observer::Observer
//! [`Subscription`]: subscription::Subscription

pub mod error;
pub mod observable;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod rc;
pub mod signal;
pub mod subject;
pub mod subscription;

#[cfg(test)]
mod test_util;

// Re-export the prelude module
pub use prelude::*;
