//! ### Lightweight Mutexes
//!
//! This module provides the lock that guards every promise's state and every
//! combinator's fan-in buffer. Critical sections in this crate are tiny (flip
//! a state, push a closure, decrement a counter) and user callbacks never run
//! while a lock is held. The lock is a thin wrapper over `parking_lot`'s
//! mutex: it spins briefly under contention and then parks the waiting
//! thread.
//!
//! The API is designed to be as close to `std::sync::Mutex` as possible, minus
//! poisoning: since no foreign code ever runs under the lock, a panic can't
//! leave the protected data half-updated.
//!
//! #### Example
//!
//! ```rust
//! use vow::mutex::Mutex;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let cell = Arc::new(Mutex::new(0));
//!
//! let handles: Vec<_> = (0..4)
//!     .map(|_| {
//!         let cell = cell.clone();
//!         thread::spawn(move || *cell.lock() += 1)
//!     })
//!     .collect();
//!
//! for h in handles {
//!     h.join().unwrap();
//! }
//!
//! assert_eq!(*cell.lock(), 4);
//! ```
use std::ops::{Deref, DerefMut};

/// A lightweight mutual-exclusion lock.
///
/// See the [module-level documentation](self) for more information.
#[derive(Default)]
pub struct Mutex<T> {
    inner: parking_lot::Mutex<T>,
}

/// A held lock.
///
/// The `LockGuard` type represents a **locked** state of a `Mutex`. It is
/// returned by [Mutex::lock] and [Mutex::try_lock], and it releases the lock
/// when it is dropped. It implements `DerefMut`, so the data inside the mutex
/// can be mutated directly through the guard.
pub struct LockGuard<'a, T> {
    guard: parking_lot::MutexGuard<'a, T>,
}

impl<T> Mutex<T> {
    /// Create a new, unlocked mutex wrapping `obj`.
    pub fn new(obj: T) -> Self {
        Self {
            inner: parking_lot::Mutex::new(obj),
        }
    }

    /// Acquire the lock, blocking the current thread until it is available.
    pub fn lock(&self) -> LockGuard<'_, T> {
        LockGuard {
            guard: self.inner.lock(),
        }
    }

    /// Attempt to acquire the lock without waiting. Returns `None` if another
    /// thread currently holds it.
    pub fn try_lock(&self) -> Option<LockGuard<'_, T>> {
        self.inner.try_lock().map(|guard| LockGuard { guard })
    }

    /// Consume the mutex, returning the wrapped object.
    pub fn into_inner(self) -> T {
        self.inner.into_inner()
    }
}

impl<T> Deref for LockGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

impl<T> DerefMut for LockGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.guard
    }
}

#[cfg(test)]
mod tests {
    use super::Mutex;
    use std::{sync::Arc, thread, time::Duration};

    #[test]
    fn simple() {
        let v = Arc::new(Mutex::new(vec![0u8]));
        let v2 = v.clone();

        let mut lock = v.lock();

        let t2 = {
            let v = v.clone();
            thread::spawn(move || v.lock().push(2))
        };

        thread::sleep(Duration::from_millis(250));
        lock.push(1);

        drop(lock);

        t2.join().unwrap();
        drop(v);

        assert_eq!(Arc::into_inner(v2).unwrap().into_inner(), vec![0, 1, 2]);
    }

    #[test]
    fn try_lock_contended() {
        let m = Mutex::new(5);
        let guard = m.lock();

        assert!(m.try_lock().is_none());

        drop(guard);

        assert_eq!(*m.try_lock().unwrap(), 5);
    }

    #[test]
    fn shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}

        assert_send_sync::<Mutex<Vec<u8>>>();
        assert_send_sync::<Arc<Mutex<Option<Box<dyn FnOnce() + Send>>>>>();
    }

    #[test]
    fn waiter_parks_until_release() {
        let m = Arc::new(Mutex::new(Vec::new()));
        let guard = m.lock();

        let waiter = {
            let m = m.clone();
            thread::spawn(move || m.lock().push("waiter"))
        };

        thread::sleep(Duration::from_millis(100));
        assert!(!waiter.is_finished());

        drop(guard);
        waiter.join().unwrap();

        assert_eq!(*m.lock(), vec!["waiter"]);
    }

    #[test]
    fn many_threads() {
        let counter = Arc::new(Mutex::new(0usize));

        let threads: Vec<_> = (0..8)
            .map(|_| {
                let counter = counter.clone();
                thread::spawn(move || {
                    for _ in 0..1000 {
                        *counter.lock() += 1;
                    }
                })
            })
            .collect();

        for t in threads {
            t.join().unwrap();
        }

        assert_eq!(*counter.lock(), 8000);
    }
}
