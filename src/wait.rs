//! Waiting for promises to settle.
//!
//! Promises are callback driven, but sometimes the consumer simply wants the
//! result. Two ways of getting it are provided:
//!
//! 1. [Promise::wait] blocks the calling thread until the promise settles. It
//!    should only be called from synchronous contexts.
//! 2. `Promise` implements [IntoFuture], so it can be `.await`ed from any
//!    async executor.
//!
//! Both yield a [Result] and both detect *abandoned* promises: if a pending
//! promise's [Resolve](crate::Resolve) and [Reject](crate::Reject) handles are
//! dropped, and the handle being waited on is the last one left, waiting
//! returns [PromiseError::Abandoned] rather than hanging forever.
//!
//! ```
//! use vow::{Promise, PromiseError};
//!
//! let p = Promise::<u32>::new(|_resolve, _reject| {});
//! let err = p.wait().unwrap_err();
//!
//! assert_eq!(err.downcast_ref::<PromiseError>(), Some(&PromiseError::Abandoned));
//! ```
use std::{
    future::{Future, IntoFuture},
    pin::Pin,
    sync::{mpsc::sync_channel, Arc},
    task::{Context, Poll, Waker},
};

use crate::{
    error::{PromiseError, Result},
    mutex::Mutex,
    promise::Promise,
};

impl<T: Clone + Send + 'static> Promise<T> {
    /// Block execution until the promise settles and return its outcome.
    ///
    /// *Note* This function should only be called from synchronous contexts.
    /// From an asynchronous context, use `.await` instead.
    pub fn wait(self) -> Result<T> {
        let (tx, rx) = sync_channel(1);
        let tx2 = tx.clone();

        self.subscribe(
            move |value| {
                let _ = tx.send(Ok(value));
            },
            move |error| {
                let _ = tx2.send(Err(error));
            },
        );

        drop(self);

        rx.recv().unwrap_or_else(|_| Err(PromiseError::Abandoned.into()))
    }
}

struct Slot<T> {
    result: Option<Result<T>>,
    waker: Option<Waker>,
    notifiers: usize,
}

/// Held by each subscribed handler. Whether the handler runs or is dropped
/// unrun, the waiting task gets woken.
struct Notifier<T> {
    slot: Arc<Mutex<Slot<T>>>,
}

impl<T> Notifier<T> {
    fn new(slot: &Arc<Mutex<Slot<T>>>) -> Self {
        slot.lock().notifiers += 1;
        Self { slot: slot.clone() }
    }

    fn complete(self, result: Result<T>) {
        self.slot.lock().result = Some(result);
    }
}

impl<T> Drop for Notifier<T> {
    fn drop(&mut self) {
        let waker = {
            let mut slot = self.slot.lock();
            slot.notifiers -= 1;
            slot.waker.take()
        };

        if let Some(waker) = waker {
            waker.wake();
        }
    }
}

/// The future returned by awaiting a [Promise].
///
/// Resolves to the promise's outcome, or to [PromiseError::Abandoned] if the
/// promise can no longer settle.
pub struct Settlement<T> {
    slot: Arc<Mutex<Slot<T>>>,
}

impl<T> Future for Settlement<T> {
    type Output = Result<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut slot = self.slot.lock();

        if let Some(result) = slot.result.take() {
            return Poll::Ready(result);
        }

        if slot.notifiers == 0 {
            return Poll::Ready(Err(PromiseError::Abandoned.into()));
        }

        slot.waker = Some(cx.waker().clone());

        Poll::Pending
    }
}

impl<T: Clone + Send + 'static> IntoFuture for Promise<T> {
    type Output = Result<T>;
    type IntoFuture = Settlement<T>;

    fn into_future(self) -> Self::IntoFuture {
        let slot = Arc::new(Mutex::new(Slot {
            result: None,
            waker: None,
            notifiers: 0,
        }));

        let on_ok = Notifier::new(&slot);
        let on_err = Notifier::new(&slot);

        self.subscribe(
            move |value| on_ok.complete(Ok(value)),
            move |error| on_err.complete(Err(error)),
        );

        Settlement { slot }
    }
}
