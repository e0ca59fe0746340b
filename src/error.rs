//! Error types.
//!
//! Promises carry an opaque [Error] on their rejection path. Any type
//! implementing [std::error::Error] converts into it, which means handlers
//! passed to [then](crate::Promise::then) and [catch](crate::Promise::catch)
//! can use `?` freely: returning `Err(_)` from a handler is how a handler
//! "throws".
//!
//! Errors that this crate synthesises itself are described by
//! [PromiseError].
use std::{fmt, sync::Arc};

/// Shorthand for results whose error is a promise rejection.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// An opaque rejection reason.
///
/// Rejections are delivered to every handler attached to a promise, so this
/// type is a cheaply cloneable, shared handle around an [anyhow::Error].
#[derive(Clone)]
pub struct Error {
    inner: Arc<anyhow::Error>,
}

impl Error {
    /// Wrap a concrete error type.
    pub fn new<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(anyhow::Error::new(err)),
        }
    }

    /// Create an error from a printable message.
    pub fn msg<M>(msg: M) -> Self
    where
        M: fmt::Display + fmt::Debug + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(anyhow::Error::msg(msg)),
        }
    }

    /// Returns a reference to the underlying error if it is of type `E`.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: fmt::Display + fmt::Debug + Send + Sync + 'static,
    {
        self.inner.downcast_ref::<E>()
    }

    /// Returns `true` if the underlying error is of type `E`.
    pub fn is<E>(&self) -> bool
    where
        E: fmt::Display + fmt::Debug + Send + Sync + 'static,
    {
        self.inner.is::<E>()
    }

    /// Returns `true` if both handles refer to the same rejection.
    pub fn ptr_eq(&self, other: &Error) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<E> From<E> for Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn from(err: E) -> Self {
        Self::new(err)
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.inner, f)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.inner, f)
    }
}

/// Errors produced by the library itself, as opposed to those passed to
/// `reject` by a producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromiseError {
    /// [race_first](crate::combinators::race_first) or
    /// [any_first](crate::combinators::any_first) was handed no promises, so
    /// there is nothing that could ever settle the result.
    EmptyPromises,
    /// Every handle capable of settling the promise was dropped while it was
    /// still pending.
    Abandoned,
}

impl PromiseError {
    /// A stable numeric code for the error.
    pub fn code(&self) -> u32 {
        match self {
            PromiseError::EmptyPromises => 1001,
            PromiseError::Abandoned => 1002,
        }
    }
}

impl fmt::Display for PromiseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromiseError::EmptyPromises => write!(f, "the array of promises is empty"),
            PromiseError::Abandoned => write!(f, "promise dropped before it was settled"),
        }
    }
}

impl std::error::Error for PromiseError {}

#[cfg(test)]
mod tests {
    use super::{Error, PromiseError};
    use std::io;

    #[test]
    fn conversion_keeps_type() {
        let e: Error = io::Error::new(io::ErrorKind::Other, "boom").into();

        assert!(e.is::<io::Error>());
        assert!(!e.is::<PromiseError>());
        assert_eq!(e.to_string(), "boom");
    }

    #[test]
    fn clones_share_identity() {
        let e = Error::from(PromiseError::EmptyPromises);
        let e2 = e.clone();

        assert!(e.ptr_eq(&e2));
        assert!(!e.ptr_eq(&Error::from(PromiseError::EmptyPromises)));
        assert_eq!(e2.downcast_ref::<PromiseError>(), Some(&PromiseError::EmptyPromises));
    }

    #[test]
    fn codes() {
        assert_eq!(PromiseError::EmptyPromises.code(), 1001);
        assert_eq!(
            PromiseError::EmptyPromises.to_string(),
            "the array of promises is empty"
        );
        assert_eq!(PromiseError::Abandoned.code(), 1002);
    }

    #[test]
    fn message() {
        let e = Error::msg("plain text");

        assert_eq!(e.to_string(), "plain text");
        assert!(e.downcast_ref::<PromiseError>().is_none());
    }
}
