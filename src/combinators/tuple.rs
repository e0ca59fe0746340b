//! Combinators over tuples of differently typed promises.
//!
//! ```
//! use vow::{Promise, PromiseTuple};
//!
//! let (n, s) = (Promise::resolved(1), Promise::resolved("one"))
//!     .join_all()
//!     .wait()
//!     .unwrap();
//!
//! assert_eq!((n, s), (1, "one"));
//! ```
use super::{join_slot, settle_slot, FanIn, SettledResult};
use crate::promise::Promise;

/// A tuple of promises that can be gathered into a promise of a tuple.
///
/// Implemented for tuples of two to six promises, each with its own value
/// type. The semantics match [join_all](super::join_all) and
/// [settle_all](super::settle_all), with each position keeping its type.
pub trait PromiseTuple {
    /// The tuple of values produced by [PromiseTuple::join_all].
    type Output;
    /// The tuple of outcomes produced by [PromiseTuple::settle_all].
    type Settled;

    /// Fulfill once every promise has fulfilled; reject on the first
    /// rejection.
    fn join_all(self) -> Promise<Self::Output>;

    /// Fulfill once every promise has settled, never rejecting.
    fn settle_all(self) -> Promise<Self::Settled>;
}

macro_rules! promise_tuple {
    ($count:expr; $($name:ident $idx:tt),+) => {
        impl<$($name),+> PromiseTuple for ($(Promise<$name>,)+)
        where
            $($name: Clone + Send + 'static),+
        {
            type Output = ($($name,)+);
            type Settled = ($(SettledResult<$name>,)+);

            #[allow(non_snake_case)]
            fn join_all(self) -> Promise<Self::Output> {
                let aggregate = Promise::pending();
                let state = FanIn::new(($(None::<$name>,)+), $count);

                let finish = |slots: &mut ($(Option<$name>,)+)| {
                    let ($($name,)+) = slots;
                    match ($($name.take(),)+) {
                        ($(Some($name),)+) => Some(($($name,)+)),
                        _ => None,
                    }
                };

                $(
                    join_slot(
                        &self.$idx,
                        &state,
                        &aggregate,
                        |slots, value| slots.$idx = Some(value),
                        finish,
                    );
                )+

                aggregate
            }

            #[allow(non_snake_case)]
            fn settle_all(self) -> Promise<Self::Settled> {
                let aggregate = Promise::pending();
                let state = FanIn::new(($(None::<SettledResult<$name>>,)+), $count);

                let finish = |slots: &mut ($(Option<SettledResult<$name>>,)+)| {
                    let ($($name,)+) = slots;
                    match ($($name.take(),)+) {
                        ($(Some($name),)+) => Some(($($name,)+)),
                        _ => None,
                    }
                };

                $(
                    settle_slot(
                        &self.$idx,
                        &state,
                        &aggregate,
                        |slots, result| slots.$idx = Some(result),
                        finish,
                    );
                )+

                aggregate
            }
        }
    };
}

promise_tuple!(2; A 0, B 1);
promise_tuple!(3; A 0, B 1, C 2);
promise_tuple!(4; A 0, B 1, C 2, D 3);
promise_tuple!(5; A 0, B 1, C 2, D 3, E 4);
promise_tuple!(6; A 0, B 1, C 2, D 3, E 4, F 5);
