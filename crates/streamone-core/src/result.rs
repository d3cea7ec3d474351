//! A value or the error that prevented producing it.

use crate::error::Error;

/// Either a successful result or an error.
///
/// Calling code uses this to carry the outcome of an API call around without
/// committing to handling the failure on the spot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultOrError<T, E = Error> {
    /// A successful result
    Result(T),
    /// An error
    Error(E),
}

impl<T, E> ResultOrError<T, E> {
    /// Map the result with `f`, passing an error through unchanged.
    pub fn map<S, F>(self, f: F) -> ResultOrError<S, E>
    where
        F: FnOnce(T) -> S,
    {
        match self {
            ResultOrError::Result(result) => ResultOrError::Result(f(result)),
            ResultOrError::Error(err) => ResultOrError::Error(err),
        }
    }

    /// The result, or `None` if this is an error
    pub fn value(&self) -> Option<&T> {
        match self {
            ResultOrError::Result(result) => Some(result),
            ResultOrError::Error(_) => None,
        }
    }

    /// The error, or `None` if this is a result
    pub fn error(&self) -> Option<&E> {
        match self {
            ResultOrError::Result(_) => None,
            ResultOrError::Error(err) => Some(err),
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            ResultOrError::Result(result) => Some(result),
            ResultOrError::Error(_) => None,
        }
    }

    pub fn into_error(self) -> Option<E> {
        match self {
            ResultOrError::Result(_) => None,
            ResultOrError::Error(err) => Some(err),
        }
    }

    pub fn is_result(&self) -> bool {
        matches!(self, ResultOrError::Result(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ResultOrError::Error(_))
    }

    /// Convert into a standard `Result` so `?` can be used on it.
    pub fn into_result(self) -> Result<T, E> {
        self.into()
    }
}

impl<T, E> From<Result<T, E>> for ResultOrError<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => ResultOrError::Result(value),
            Err(err) => ResultOrError::Error(err),
        }
    }
}

impl<T, E> From<ResultOrError<T, E>> for Result<T, E> {
    fn from(result: ResultOrError<T, E>) -> Self {
        match result {
            ResultOrError::Result(value) => Ok(value),
            ResultOrError::Error(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionError;

    type Outcome<T> = ResultOrError<T, SessionError>;

    #[test]
    fn test_map_transforms_result() {
        let mapped = Outcome::Result(20).map(|x| x + 1).map(|x| x * 2);
        assert_eq!(mapped, Outcome::Result(42));
    }

    #[test]
    fn test_map_composes() {
        let f = |x: i32| x + 3;
        let g = |x: i32| x.to_string();
        for x in [-5, 0, 7] {
            assert_eq!(Outcome::Result(x).map(f).map(g), Outcome::Result(g(f(x))));
        }
    }

    #[test]
    fn test_map_identity() {
        assert_eq!(Outcome::Result("a").map(|x| x), Outcome::Result("a"));
        assert_eq!(
            Outcome::<&str>::Error(SessionError::NoSession).map(|x| x),
            Outcome::Error(SessionError::NoSession)
        );
    }

    #[test]
    fn test_map_propagates_error() {
        let err = Outcome::<i32>::Error(SessionError::NoSuchKey("k".into()));
        let mapped = err.map(|x| x * 2);
        assert_eq!(mapped, Outcome::Error(SessionError::NoSuchKey("k".into())));
    }

    #[test]
    fn test_accessors() {
        let ok = Outcome::Result(5);
        assert_eq!(ok.value(), Some(&5));
        assert_eq!(ok.error(), None);
        assert!(ok.is_result());

        let err = Outcome::<i32>::Error(SessionError::NoSession);
        assert_eq!(err.value(), None);
        assert_eq!(err.error(), Some(&SessionError::NoSession));
        assert!(err.is_error());
        assert_eq!(err.into_error(), Some(SessionError::NoSession));
    }

    #[test]
    fn test_std_result_conversions() {
        let from_ok: Outcome<u8> = Ok(1).into();
        assert_eq!(from_ok.into_result(), Ok(1));

        let from_err: Outcome<u8> = Err(SessionError::NoSession).into();
        assert_eq!(from_err.into_value(), None);
    }
}
