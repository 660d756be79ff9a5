//! A container holding zero or one value.

use std::fmt;

use numseq_common::{Result, error::Error};

/// Result of a reduction that is undefined on an empty sequence
/// (`average`, `min`, `max`, `reduce_optional`, `find_first`).
///
/// The value must be checked for presence before it is requested: [`OptionalValue::get`]
/// on an empty optional fails with an `EmptyValue` error rather than falling back to
/// a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OptionalValue<T>(Option<T>);

impl<T> OptionalValue<T> {
    pub fn empty() -> Self {
        OptionalValue(None)
    }

    pub fn of(value: T) -> Self {
        OptionalValue(Some(value))
    }

    #[inline]
    pub fn is_present(&self) -> bool {
        self.0.is_some()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// Returns the contained value.
    ///
    /// # Errors
    ///
    /// `EmptyValue` if no value is present.
    pub fn get(self) -> Result<T> {
        self.0
            .ok_or_else(|| Error::empty_value("OptionalValue::get on an empty optional"))
    }

    pub fn or_else(self, other: T) -> T {
        self.0.unwrap_or(other)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> OptionalValue<U> {
        OptionalValue(self.0.map(f))
    }

    pub fn as_option(&self) -> Option<&T> {
        self.0.as_ref()
    }

    pub fn into_option(self) -> Option<T> {
        self.0
    }
}

impl<T> Default for OptionalValue<T> {
    fn default() -> Self {
        OptionalValue::empty()
    }
}

impl<T> From<Option<T>> for OptionalValue<T> {
    fn from(value: Option<T>) -> Self {
        OptionalValue(value)
    }
}

impl<T> From<OptionalValue<T>> for Option<T> {
    fn from(value: OptionalValue<T>) -> Self {
        value.0
    }
}

impl<T: fmt::Debug> fmt::Display for OptionalValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(value) => write!(f, "Optional[{value:?}]"),
            None => f.write_str("Optional.empty"),
        }
    }
}
