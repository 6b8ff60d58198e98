//! Watch-list model for interactive front ends.
//!
//! A [`Watcher`] holds an expression (a word, path or group), whether it
//! recalculates, whether it is frozen, an optional tag label, and the
//! outcome of its last evaluation: a value or an error, never both. A
//! [`WatchList`] orders watchers and interprets the `watch` dialect. Display
//! is left to the front end, which reads [`Watcher::watch_string`] and
//! [`Watcher::value_string`].

mod error;
mod list;
mod watcher;

pub use error::{WatchError, WatchResult};
pub use list::WatchList;
pub use watcher::{Outcome, Watcher};
