//! Settle with the first fulfillment.
use log::debug;

use super::FanIn;
use crate::{
    error::{Error, PromiseError},
    promise::Promise,
};

/// Fulfill with the first of `promises` to fulfill.
///
/// Rejections are tolerated until every input has rejected, at which point
/// the result rejects with the *first* rejection observed. An empty input
/// rejects right away with [PromiseError::EmptyPromises].
pub fn any_first<T, I>(promises: I) -> Promise<T>
where
    T: Clone + Send + 'static,
    I: IntoIterator<Item = Promise<T>>,
{
    let promises: Vec<_> = promises.into_iter().collect();

    if promises.is_empty() {
        return Promise::rejected(PromiseError::EmptyPromises);
    }

    let aggregate = Promise::pending();
    let state = FanIn::new(None::<Error>, promises.len());

    for promise in &promises {
        let (state, on_ok, on_err) = (state.clone(), aggregate.clone(), aggregate.clone());

        promise.subscribe(
            move |value| on_ok.fulfill(value),
            move |error| {
                let exhausted = {
                    let mut fan = state.lock();

                    if fan.slots.is_none() {
                        fan.slots = Some(error);
                    }

                    if fan.complete_one() {
                        fan.slots.take()
                    } else {
                        None
                    }
                };

                if let Some(error) = exhausted {
                    debug!("Every input rejected, rejecting aggregate");
                    on_err.reject(error);
                }
            },
        );
    }

    aggregate
}
