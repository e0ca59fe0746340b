//! # `vow`: Thread-safe promises
//!
//! This project implements minimalistic, thread-safe promises, written in as
//! few lines as possible. A [Promise] is a single-assignment container for a
//! value or an [Error] that a producer delivers at some later point, from any
//! thread. Consumers chain continuations onto it with `then`, `catch` and
//! `finally`, and several promises can be combined into one with the
//! [combinators].
//!
//! `vow` is **not** an executor: it never runs work of its own, it only
//! composes work that is already running elsewhere. There is likewise no
//! cancellation primitive; a timeout is just a timer that calls `reject`.
//!
//! For the promise itself, refer to the [promise] module. To see which
//! combinators are provided, see the [combinators] module.
//!
//! ## Example
//!
//! This is a simple example of fanning in the results of two threads:
//!
//! ```
//! use vow::{join_all, Promise};
//! use std::{thread, time::Duration};
//!
//! let hello = Promise::new(|resolve, _| {
//!     thread::spawn(move || {
//!         thread::sleep(Duration::from_millis(200));
//!         resolve("Hello, ");
//!     });
//! });
//! let world = Promise::new(|resolve, _| {
//!     thread::spawn(move || {
//!         thread::sleep(Duration::from_millis(100));
//!         resolve("World!");
//!     });
//! });
//!
//! let greeting = join_all([hello, world]).then(|parts| Ok(parts.concat()));
//!
//! assert_eq!(greeting.wait().unwrap(), "Hello, World!");
//! ```
pub mod combinators;
pub mod error;
pub mod mutex;
pub mod promise;
mod wait;

#[cfg(test)]
mod testing;

pub use combinators::{any_first, join_all, race_first, settle_all, PromiseTuple, SettledResult};
pub use error::{Error, PromiseError, Result};
pub use promise::{Promise, Reject, Resolve};
pub use wait::Settlement;
