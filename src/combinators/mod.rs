//! Multi-promise combinators.
//!
//! The `combinators` module builds one *aggregate* promise out of several
//! input promises. Each combinator subscribes a completion handler to every
//! input and settles the aggregate as soon as its termination rule is met.
//! Because a promise settles at most once, completions arriving after that
//! point are harmless no-ops.
//!
//! The following sub-modules are exposed by the `combinators` module:
//!
//! - `all`: [join_all] waits for every input to fulfill, failing fast on the
//!   first rejection.
//! - `race`: [race_first] settles like whichever input settles first.
//! - `any`: [any_first] fulfills with the first fulfillment, and rejects only
//!   once every input has rejected.
//! - `all_settled`: [settle_all] waits for every input to settle and reports
//!   each outcome as a [SettledResult].
//! - `tuple`: [PromiseTuple] provides `join_all` and `settle_all` over
//!   tuples of differently typed promises.
//!
//! Combinators that need to gather results share a small amount of state
//! between their input subscriptions: a buffer of result slots and a count of
//! inputs still outstanding, both guarded by one [Mutex]. A handler updates
//! that state under the lock, decides whether the aggregate should settle,
//! releases the lock and only then settles the aggregate. Settling can run
//! arbitrary downstream handlers, so it must never happen under the lock.
use std::sync::Arc;

use log::debug;

use crate::{mutex::Mutex, promise::Promise};

pub mod all;
pub mod all_settled;
pub mod any;
pub mod race;
pub mod tuple;

pub use all::join_all;
pub use all_settled::{settle_all, SettledResult};
pub use any::any_first;
pub use race::race_first;
pub use tuple::PromiseTuple;

/// Per-invocation working state of a gathering combinator.
pub(crate) struct FanIn<S> {
    pub(crate) slots: S,
    remaining: usize,
}

impl<S> FanIn<S> {
    pub(crate) fn new(slots: S, remaining: usize) -> Arc<Mutex<Self>> {
        Arc::new(Mutex::new(Self { slots, remaining }))
    }

    /// Record that one more input has reported. Returns `true` for the last.
    pub(crate) fn complete_one(&mut self) -> bool {
        self.remaining -= 1;
        self.remaining == 0
    }
}

/// Subscribe `input` to a fail-fast gather.
///
/// A fulfillment is written into the shared slots with `store`; once the last
/// input has been stored, `finish` assembles the aggregate's value. A
/// rejection rejects the aggregate straight away.
pub(crate) fn join_slot<V, S, O, St, Fin>(
    input: &Promise<V>,
    state: &Arc<Mutex<FanIn<S>>>,
    aggregate: &Promise<O>,
    store: St,
    finish: Fin,
) where
    V: Clone + Send + 'static,
    S: Send + 'static,
    O: Clone + Send + 'static,
    St: FnOnce(&mut S, V) + Send + 'static,
    Fin: FnOnce(&mut S) -> Option<O> + Send + 'static,
{
    let (state, on_ok, on_err) = (state.clone(), aggregate.clone(), aggregate.clone());

    input.subscribe(
        move |value| {
            let output = {
                let mut fan = state.lock();
                store(&mut fan.slots, value);

                if fan.complete_one() {
                    finish(&mut fan.slots)
                } else {
                    None
                }
            };

            if let Some(output) = output {
                debug!("Every input fulfilled, resolving aggregate");
                on_ok.fulfill(output);
            }
        },
        move |error| on_err.reject(error),
    );
}

/// Subscribe `input` to a gather that waits for every input to settle.
///
/// Both outcomes are written into the shared slots with `store`; once the last
/// input has been stored, `finish` assembles the aggregate's value.
pub(crate) fn settle_slot<V, S, O, St, Fin>(
    input: &Promise<V>,
    state: &Arc<Mutex<FanIn<S>>>,
    aggregate: &Promise<O>,
    store: St,
    finish: Fin,
) where
    V: Clone + Send + 'static,
    S: Send + 'static,
    O: Clone + Send + 'static,
    St: FnOnce(&mut S, SettledResult<V>) + Clone + Send + 'static,
    Fin: FnOnce(&mut S) -> Option<O> + Clone + Send + 'static,
{
    let state = state.clone();
    let aggregate = aggregate.clone();

    let record = move |result: SettledResult<V>| {
        let output = {
            let mut fan = state.lock();
            store(&mut fan.slots, result);

            if fan.complete_one() {
                finish(&mut fan.slots)
            } else {
                None
            }
        };

        if let Some(output) = output {
            debug!("Every input settled, resolving aggregate");
            aggregate.fulfill(output);
        }
    };
    let record2 = record.clone();

    input.subscribe(
        move |value| record(SettledResult::Fulfilled(value)),
        move |error| record2(SettledResult::Rejected(error)),
    );
}
