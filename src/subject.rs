//! Subjects: observables that are also observers.
//!
//! - [`Subject`] multicasts every notification to the observers subscribed at
//!   the time, and replays only the terminal notification to late ones.
//! - [`ReplaySubject`] additionally retains a bounded history of values for
//!   late subscribers.
//! - [`AsyncSubject`] keeps only the last value and releases it, followed by
//!   completion, once the source completes.

mod async_subject;
mod replay_subject;
mod subject_core;
mod subject_subscription;
mod subscribers;

pub use async_subject::AsyncSubject;
pub use replay_subject::ReplaySubject;
pub use subject_core::Subject;
pub use subject_subscription::SubjectSubscription;
