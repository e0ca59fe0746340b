//! Wait for every promise to fulfill.
//!
//! # Example
//!
//! ```
//! use vow::{join_all, Promise};
//! use std::thread;
//!
//! let inputs: Vec<_> = (1..=3)
//!     .map(|i| Promise::new(move |resolve, _| {
//!         thread::spawn(move || resolve(i));
//!     }))
//!     .collect();
//!
//! assert_eq!(join_all(inputs).wait().unwrap(), vec![1, 2, 3]);
//! ```
use std::mem;

use super::{join_slot, FanIn};
use crate::promise::Promise;

/// Combine `promises` into one promise for all of their values.
///
/// The result lists the values in input order, regardless of the order in
/// which the inputs fulfilled. If any input rejects, the result rejects with
/// that error immediately; the remaining inputs are still allowed to finish
/// but can no longer affect the outcome. An empty input fulfills right away
/// with an empty `Vec`.
pub fn join_all<T, I>(promises: I) -> Promise<Vec<T>>
where
    T: Clone + Send + 'static,
    I: IntoIterator<Item = Promise<T>>,
{
    let promises: Vec<_> = promises.into_iter().collect();

    if promises.is_empty() {
        return Promise::resolved(Vec::new());
    }

    let aggregate = Promise::pending();
    let state = FanIn::new(vec![None; promises.len()], promises.len());

    for (i, promise) in promises.iter().enumerate() {
        join_slot(
            promise,
            &state,
            &aggregate,
            move |slots: &mut Vec<Option<T>>, value| slots[i] = Some(value),
            |slots| Some(mem::take(slots).into_iter().flatten().collect()),
        );
    }

    aggregate
}
