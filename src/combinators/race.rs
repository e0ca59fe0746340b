//! Settle with whichever promise settles first.
use crate::{error::PromiseError, promise::Promise};

/// Mirror the first of `promises` to settle, whether it fulfilled or rejected.
///
/// Later settlements are ignored. An empty input rejects right away with
/// [PromiseError::EmptyPromises], since nothing could ever settle the result.
pub fn race_first<T, I>(promises: I) -> Promise<T>
where
    T: Clone + Send + 'static,
    I: IntoIterator<Item = Promise<T>>,
{
    let promises: Vec<_> = promises.into_iter().collect();

    if promises.is_empty() {
        return Promise::rejected(PromiseError::EmptyPromises);
    }

    let aggregate = Promise::pending();

    for promise in &promises {
        promise.forward(aggregate.clone());
    }

    aggregate
}
