//! Promises and continuation chaining
//!
//! A [Promise] is a single-assignment container for a value that will become
//! available at some point, or for the [Error] explaining why it never will.
//! It starts out *pending* and is *settled* exactly once, either fulfilled
//! with a value or rejected with an error. Every later attempt to settle it is
//! silently ignored, no matter which thread it comes from.
//!
//! Promises do not run any work themselves. A producer is handed a [Resolve]
//! and a [Reject] handle when the promise is created and calls one of them
//! whenever the result is known, from whatever thread happens to be doing the
//! work:
//!
//! ```
//! use vow::Promise;
//! use std::thread;
//!
//! let p = Promise::new(|resolve, _reject| {
//!     thread::spawn(move || resolve(6 * 7));
//! });
//!
//! assert_eq!(p.wait().unwrap(), 42);
//! ```
//!
//! # Chaining
//!
//! Consumers attach continuations with [then](Promise::then),
//! [catch](Promise::catch) and friends. Each returns a new, derived promise so
//! continuations can be chained. A handler "throws" by returning `Err(_)`,
//! which rejects the derived promise:
//!
//! ```
//! use vow::{Error, Promise};
//!
//! let p = Promise::resolved(10)
//!     .then(|v| Ok(v * 2))
//!     .then(|v| if v > 10 { Err(Error::msg("too big")) } else { Ok(v) })
//!     .catch(|e| {
//!         assert_eq!(e.to_string(), "too big");
//!         Ok(0)
//!     });
//!
//! assert_eq!(p.wait().unwrap(), 0);
//! ```
//!
//! # Handler Ordering
//!
//! Handlers attached while the promise is pending are queued and run, in
//! registration order, on the thread that settles the promise. Handlers
//! attached after settlement run immediately on the attaching thread. Either
//! way each handler runs exactly once, and never while the promise's lock is
//! held.
use std::{fmt, mem, sync::Arc};

use log::{trace, warn};

use crate::{
    error::{Error, Result},
    mutex::Mutex,
};

/// Handle used by a producer to fulfill a promise.
///
/// Only the first call to either this or the matching [Reject] has any effect.
pub type Resolve<T> = Arc<dyn Fn(T) + Send + Sync>;

/// Handle used by a producer to reject a promise.
pub type Reject = Arc<dyn Fn(Error) + Send + Sync>;

type FulfillHandler<T> = Box<dyn FnOnce(T) + Send>;
type RejectHandler = Box<dyn FnOnce(Error) + Send>;

enum State<T> {
    Pending,
    Fulfilled(T),
    Rejected(Error),
}

struct Core<T> {
    state: State<T>,
    fulfill_handlers: Vec<FulfillHandler<T>>,
    reject_handlers: Vec<RejectHandler>,
    observed: bool,
}

impl<T> Core<T> {
    fn new(state: State<T>) -> Self {
        Self {
            state,
            fulfill_handlers: Vec::new(),
            reject_handlers: Vec::new(),
            observed: false,
        }
    }
}

impl<T> Drop for Core<T> {
    fn drop(&mut self) {
        if let State::Rejected(e) = &self.state {
            if !self.observed {
                warn!("Promise rejected without a handler: {e}");
            }
        }
    }
}

/// A thread-safe, single-assignment value or error.
///
/// A `Promise` is a cheap handle; cloning it yields another handle to the same
/// underlying state. See the [module-level documentation](self) for more
/// information.
pub struct Promise<T> {
    core: Arc<Mutex<Core<T>>>,
}

impl<T> Clone for Promise<T> {
    fn clone(&self) -> Self {
        Self {
            core: self.core.clone(),
        }
    }
}

impl<T> fmt::Debug for Promise<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.core.lock().state {
            State::Pending => "pending",
            State::Fulfilled(_) => "fulfilled",
            State::Rejected(_) => "rejected",
        };

        f.debug_struct("Promise").field("state", &state).finish()
    }
}

impl<T> Promise<T> {
    /// Returns `true` if the promise has not been settled yet.
    pub fn is_pending(&self) -> bool {
        matches!(self.core.lock().state, State::Pending)
    }

    /// Returns `true` if the promise was fulfilled.
    pub fn is_fulfilled(&self) -> bool {
        matches!(self.core.lock().state, State::Fulfilled(_))
    }

    /// Returns `true` if the promise was rejected.
    pub fn is_rejected(&self) -> bool {
        matches!(self.core.lock().state, State::Rejected(_))
    }
}

impl<T: Clone + Send + 'static> Promise<T> {
    /// Create a new promise, handing the producer its [Resolve] and [Reject]
    /// handles.
    ///
    /// `executor` is called exactly once, synchronously, before this function
    /// returns. It is free to settle the promise right away, to move the
    /// handles to another thread and settle later, or to never settle it at
    /// all.
    pub fn new<F>(executor: F) -> Self
    where
        F: FnOnce(Resolve<T>, Reject),
    {
        let promise = Self::pending();

        let resolve: Resolve<T> = {
            let promise = promise.clone();
            Arc::new(move |value| promise.fulfill(value))
        };

        let reject: Reject = {
            let promise = promise.clone();
            Arc::new(move |error| promise.reject(error))
        };

        executor(resolve, reject);

        promise
    }

    /// Create a promise that is already fulfilled with `value`.
    pub fn resolved(value: T) -> Self {
        Self::with_state(State::Fulfilled(value))
    }

    /// Create a promise that is already rejected with `error`.
    pub fn rejected(error: impl Into<Error>) -> Self {
        Self::with_state(State::Rejected(error.into()))
    }

    pub(crate) fn pending() -> Self {
        Self::with_state(State::Pending)
    }

    fn with_state(state: State<T>) -> Self {
        Self {
            core: Arc::new(Mutex::new(Core::new(state))),
        }
    }

    pub(crate) fn fulfill(&self, value: T) {
        let (handlers, unused) = {
            let mut core = self.core.lock();

            if !matches!(core.state, State::Pending) {
                trace!("Ignoring resolve of an already settled promise");
                return;
            }

            core.state = State::Fulfilled(value.clone());

            (
                mem::take(&mut core.fulfill_handlers),
                mem::take(&mut core.reject_handlers),
            )
        };

        trace!("Promise fulfilled, running {} handler(s)", handlers.len());
        drop(unused);

        for handler in handlers {
            handler(value.clone());
        }
    }

    pub(crate) fn reject(&self, error: Error) {
        let (handlers, unused) = {
            let mut core = self.core.lock();

            if !matches!(core.state, State::Pending) {
                trace!("Ignoring reject of an already settled promise");
                return;
            }

            core.state = State::Rejected(error.clone());

            (
                mem::take(&mut core.reject_handlers),
                mem::take(&mut core.fulfill_handlers),
            )
        };

        trace!("Promise rejected, running {} handler(s)", handlers.len());
        drop(unused);

        for handler in handlers {
            handler(error.clone());
        }
    }

    pub(crate) fn settle(&self, result: Result<T>) {
        match result {
            Ok(value) => self.fulfill(value),
            Err(error) => self.reject(error),
        }
    }

    /// Register one handler per outcome. Exactly one of the two will run: now,
    /// if the promise has already settled, or on the settling thread later.
    pub(crate) fn subscribe<F, R>(&self, on_fulfilled: F, on_rejected: R)
    where
        F: FnOnce(T) + Send + 'static,
        R: FnOnce(Error) + Send + 'static,
    {
        let mut core = self.core.lock();
        core.observed = true;

        let settled = match &core.state {
            State::Pending => None,
            State::Fulfilled(v) => Some(Ok(v.clone())),
            State::Rejected(e) => Some(Err(e.clone())),
        };

        match settled {
            None => {
                core.fulfill_handlers.push(Box::new(on_fulfilled));
                core.reject_handlers.push(Box::new(on_rejected));
            }
            Some(Ok(value)) => {
                drop(core);
                on_fulfilled(value);
            }
            Some(Err(error)) => {
                drop(core);
                on_rejected(error);
            }
        }
    }

    /// Settle `target` with whatever this promise settles with.
    pub(crate) fn forward(&self, target: Promise<T>) {
        let on_err = target.clone();
        self.subscribe(
            move |value| target.fulfill(value),
            move |error| on_err.reject(error),
        );
    }

    /// Transform the fulfilled value.
    ///
    /// `on_fulfilled` runs once this promise is fulfilled and its result
    /// settles the returned promise. Returning `Err(_)` rejects it. If this
    /// promise is rejected, `on_fulfilled` never runs and the error passes
    /// straight through.
    pub fn then<U, F>(&self, on_fulfilled: F) -> Promise<U>
    where
        U: Clone + Send + 'static,
        F: FnOnce(T) -> Result<U> + Send + 'static,
    {
        let derived = Promise::pending();
        let (on_ok, on_err) = (derived.clone(), derived.clone());

        self.subscribe(
            move |value| on_ok.settle(on_fulfilled(value)),
            move |error| on_err.reject(error),
        );

        derived
    }

    /// Like [then](Self::then), but `on_fulfilled` returns another promise
    /// which is flattened into the returned one.
    pub fn and_then<U, F>(&self, on_fulfilled: F) -> Promise<U>
    where
        U: Clone + Send + 'static,
        F: FnOnce(T) -> Promise<U> + Send + 'static,
    {
        let derived = Promise::pending();
        let (on_ok, on_err) = (derived.clone(), derived.clone());

        self.subscribe(
            move |value| on_fulfilled(value).forward(on_ok),
            move |error| on_err.reject(error),
        );

        derived
    }

    /// Recover from a rejection.
    ///
    /// The mirror of [then](Self::then): `on_rejected` only runs if this
    /// promise is rejected, and its result settles the returned promise. A
    /// fulfilled value passes through untouched.
    pub fn catch<F>(&self, on_rejected: F) -> Promise<T>
    where
        F: FnOnce(Error) -> Result<T> + Send + 'static,
    {
        let derived = Promise::pending();
        let (on_ok, on_err) = (derived.clone(), derived.clone());

        self.subscribe(
            move |value| on_ok.fulfill(value),
            move |error| on_err.settle(on_rejected(error)),
        );

        derived
    }

    /// Like [catch](Self::catch), but `on_rejected` returns another promise
    /// which is flattened into the returned one.
    pub fn or_else<F>(&self, on_rejected: F) -> Promise<T>
    where
        F: FnOnce(Error) -> Promise<T> + Send + 'static,
    {
        let derived = Promise::pending();
        let (on_ok, on_err) = (derived.clone(), derived.clone());

        self.subscribe(
            move |value| on_ok.fulfill(value),
            move |error| on_rejected(error).forward(on_err),
        );

        derived
    }

    /// Handle a rejection without producing a replacement value.
    ///
    /// The returned promise is always fulfilled: with `Some(value)` if this
    /// promise was fulfilled, or with `None` after `on_rejected` has run.
    pub fn on_error<F>(&self, on_rejected: F) -> Promise<Option<T>>
    where
        F: FnOnce(Error) + Send + 'static,
    {
        let derived = Promise::pending();
        let (on_ok, on_err) = (derived.clone(), derived.clone());

        self.subscribe(
            move |value| on_ok.fulfill(Some(value)),
            move |error| {
                on_rejected(error);
                on_err.fulfill(None);
            },
        );

        derived
    }

    /// Run `handler` once this promise settles, whichever way it goes.
    ///
    /// The handler sees neither the value nor the error.
    pub fn finally<F>(&self, handler: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let handler = Arc::new(Mutex::new(Some(handler)));
        let handler2 = handler.clone();

        self.subscribe(
            move |_| run_once(&handler),
            move |_| run_once(&handler2),
        );
    }

    /// Like [finally](Self::finally), but returns a promise that settles with
    /// this promise's outcome once `handler` has run.
    pub fn ensure<F>(&self, handler: F) -> Promise<T>
    where
        F: FnOnce() + Send + 'static,
    {
        let derived = Promise::pending();
        let (on_ok, on_err) = (derived.clone(), derived.clone());
        let handler = Arc::new(Mutex::new(Some(handler)));
        let handler2 = handler.clone();

        self.subscribe(
            move |value| {
                run_once(&handler);
                on_ok.fulfill(value);
            },
            move |error| {
                run_once(&handler2);
                on_err.reject(error);
            },
        );

        derived
    }
}

fn run_once<F: FnOnce()>(slot: &Mutex<Option<F>>) {
    let handler = slot.lock().take();

    if let Some(handler) = handler {
        handler();
    }
}
