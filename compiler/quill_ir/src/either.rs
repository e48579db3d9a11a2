//! Two-variant result carrier.
//!
//! `Either` holds exactly one of a `Left` (failure or alternate) value or a
//! `Right` (success) value. [`Either::fold`] is the only primitive; every
//! other operation is written in terms of it.

use thiserror::Error;

/// Raised when the `Right` value is requested from a `Left`.
#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
pub enum EitherError {
    #[error("called `Either::get_right` on a `Left` value")]
    WrongVariant,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Either<L, R> {
    Left(L),
    Right(R),
}

impl<L, R> Either<L, R> {
    /// Collapse into a single value by applying the matching handler.
    #[inline]
    pub fn fold<T>(self, on_left: impl FnOnce(L) -> T, on_right: impl FnOnce(R) -> T) -> T {
        match self {
            Either::Left(l) => on_left(l),
            Either::Right(r) => on_right(r),
        }
    }

    #[inline]
    pub fn is_left(&self) -> bool {
        self.as_ref().fold(|_| true, |_| false)
    }

    #[inline]
    pub fn is_right(&self) -> bool {
        self.as_ref().fold(|_| false, |_| true)
    }

    /// Borrow the held value without consuming `self`.
    #[inline]
    pub fn as_ref(&self) -> Either<&L, &R> {
        match self {
            Either::Left(l) => Either::Left(l),
            Either::Right(r) => Either::Right(r),
        }
    }

    #[must_use]
    pub fn map_left<T>(self, f: impl FnOnce(L) -> T) -> Either<T, R> {
        self.fold(|l| Either::Left(f(l)), Either::Right)
    }

    #[must_use]
    pub fn map_right<T>(self, f: impl FnOnce(R) -> T) -> Either<L, T> {
        self.fold(Either::Left, |r| Either::Right(f(r)))
    }

    /// The `Right` value, or [`EitherError::WrongVariant`].
    pub fn get_right(self) -> Result<R, EitherError> {
        self.fold(|_| Err(EitherError::WrongVariant), Ok)
    }

    /// The `Right` value, or `None` for a `Left`.
    pub fn right(self) -> Option<R> {
        self.fold(|_| None, Some)
    }

    pub fn left(self) -> Option<L> {
        self.fold(Some, |_| None)
    }

    pub fn get_or_default(self) -> R
    where
        R: Default,
    {
        self.fold(|_| R::default(), |r| r)
    }

    /// The `Right` value, or `default` computed from the `Left` value.
    pub fn get_or_else(self, default: impl FnOnce(L) -> R) -> R {
        self.fold(default, |r| r)
    }

    /// Convert into a `Result`, `Left` becoming `Err`.
    pub fn into_result(self) -> Result<R, L> {
        self.fold(Err, Ok)
    }

    /// The `Right` value.
    ///
    /// # Panics
    /// Panics with [`EitherError::WrongVariant`]'s message on a `Left`.
    #[track_caller]
    pub fn unwrap(self) -> R {
        self.fold(|_| panic!("{}", EitherError::WrongVariant), |r| r)
    }
}

impl<L, R> From<Result<R, L>> for Either<L, R> {
    fn from(result: Result<R, L>) -> Self {
        match result {
            Ok(r) => Either::Right(r),
            Err(l) => Either::Left(l),
        }
    }
}
