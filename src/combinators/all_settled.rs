//! Wait for every promise to settle, whatever the outcome.
//!
//! # Example
//!
//! ```
//! use vow::{settle_all, Error, Promise};
//!
//! let results = settle_all([
//!     Promise::resolved(1),
//!     Promise::rejected(Error::msg("nope")),
//! ])
//! .wait()
//! .unwrap();
//!
//! assert_eq!(results[0].value(), Some(&1));
//! assert_eq!(results[1].error().unwrap().to_string(), "nope");
//! ```
use std::mem;

use super::{settle_slot, FanIn};
use crate::{
    error::{Error, Result},
    promise::Promise,
};

/// The outcome of a single promise, as reported by [settle_all].
#[derive(Debug, Clone)]
pub enum SettledResult<T> {
    Fulfilled(T),
    Rejected(Error),
}

impl<T> SettledResult<T> {
    pub fn is_fulfilled(&self) -> bool {
        matches!(self, SettledResult::Fulfilled(_))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, SettledResult::Rejected(_))
    }

    /// The fulfilled value, if there is one.
    pub fn value(&self) -> Option<&T> {
        match self {
            SettledResult::Fulfilled(v) => Some(v),
            SettledResult::Rejected(_) => None,
        }
    }

    /// The rejection reason, if there is one.
    pub fn error(&self) -> Option<&Error> {
        match self {
            SettledResult::Fulfilled(_) => None,
            SettledResult::Rejected(e) => Some(e),
        }
    }

    pub fn into_result(self) -> Result<T> {
        match self {
            SettledResult::Fulfilled(v) => Ok(v),
            SettledResult::Rejected(e) => Err(e),
        }
    }
}

impl<T> From<Result<T>> for SettledResult<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(v) => SettledResult::Fulfilled(v),
            Err(e) => SettledResult::Rejected(e),
        }
    }
}

/// Combine `promises` into one promise for all of their outcomes.
///
/// The result only fulfills once every input has settled, and never rejects.
/// Outcomes are listed in input order. An empty input fulfills right away
/// with an empty `Vec`.
pub fn settle_all<T, I>(promises: I) -> Promise<Vec<SettledResult<T>>>
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
        settle_slot(
            promise,
            &state,
            &aggregate,
            move |slots: &mut Vec<Option<SettledResult<T>>>, result| slots[i] = Some(result),
            |slots| Some(mem::take(slots).into_iter().flatten().collect()),
        );
    }

    aggregate
}

#[cfg(test)]
mod tests {
    use super::{settle_all, SettledResult};
    use crate::{
        testing::{delay, TestError},
        Promise, Result,
    };

    #[test]
    fn mixed_outcomes_in_order() -> Result<()> {
        let results = settle_all([
            Promise::new(|resolve, _| delay(60, move || resolve(1))),
            Promise::new(|_, reject| delay(10, move || reject(TestError::Failed.into()))),
            Promise::new(|resolve, _| delay(30, move || resolve(3))),
        ])
        .wait()?;

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].value(), Some(&1));
        assert!(results[1].error().unwrap().is::<TestError>());
        assert_eq!(results[2].value(), Some(&3));

        Ok(())
    }

    #[test]
    fn all_rejected_still_fulfills() -> Result<()> {
        let p = settle_all([
            Promise::<u8>::rejected(TestError::Failed),
            Promise::rejected(TestError::Failed1),
        ]);

        assert!(p.is_fulfilled());

        let results = p.wait()?;
        assert!(results.iter().all(SettledResult::is_rejected));
        assert_eq!(
            results[1].clone().into_result().unwrap_err().downcast_ref::<TestError>(),
            Some(&TestError::Failed1)
        );

        Ok(())
    }

    #[test]
    fn waits_for_slowest() {
        let slow = Promise::new(|resolve, _| delay(100, move || resolve(())));
        let p = settle_all([Promise::resolved(()), slow.clone()]);

        assert!(p.is_pending());
        assert_eq!(p.wait().unwrap().len(), 2);
        assert!(slow.is_fulfilled());
    }

    #[test]
    fn empty_input() -> Result<()> {
        let p = settle_all(Vec::<Promise<i32>>::new());

        assert!(p.wait()?.is_empty());

        Ok(())
    }

    #[test]
    fn from_result() {
        let ok: SettledResult<i32> = Ok(4).into();

        assert!(ok.is_fulfilled());
        assert_eq!(ok.into_result().unwrap(), 4);
    }
}
