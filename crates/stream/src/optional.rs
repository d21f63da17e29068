//! Present-or-absent value container
//!
//! `Optional` is a thin value wrapper over `Option` with the host runtime's
//! method names. `map`, `flat_map` and `filter` never invoke their function
//! on an absent value.

use std::fmt;
use valuekit_core::{Error, Identity, Result};

fn no_value() -> Error {
    Error::no_such_element("No value present")
}

/// A value that may be absent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Optional<T>(Option<T>);

impl<T> Default for Optional<T> {
    fn default() -> Self {
        Optional(None)
    }
}

impl<T> Optional<T> {
    /// The absent value
    pub fn empty() -> Self {
        Optional(None)
    }

    /// A present value
    pub fn of(value: T) -> Self {
        Optional(Some(value))
    }

    /// Present when `value` is `Some`
    pub fn of_nullable(value: Option<T>) -> Self {
        Optional(value)
    }

    /// True if a value is present
    pub fn is_present(&self) -> bool {
        self.0.is_some()
    }

    /// True if no value is present
    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// The value, or `NoSuchElement` ("No value present")
    pub fn get(&self) -> Result<&T> {
        self.0.as_ref().ok_or_else(no_value)
    }

    /// Take the value, or `NoSuchElement` ("No value present")
    pub fn into_value(self) -> Result<T> {
        self.0.ok_or_else(no_value)
    }

    /// Run `f` on the value when present
    pub fn if_present(&self, f: impl FnOnce(&T)) {
        if let Some(v) = &self.0 {
            f(v);
        }
    }

    /// Run `present` on the value, or `absent` when there is none
    pub fn if_present_or_else(&self, present: impl FnOnce(&T), absent: impl FnOnce()) {
        match &self.0 {
            Some(v) => present(v),
            None => absent(),
        }
    }

    /// Keep the value only if `pred` holds
    pub fn filter(self, pred: impl FnOnce(&T) -> bool) -> Self {
        Optional(self.0.filter(pred))
    }

    /// Transform the value when present
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Optional<U> {
        Optional(self.0.map(f))
    }

    /// Transform the value into another `Optional` when present
    pub fn flat_map<U>(self, f: impl FnOnce(T) -> Optional<U>) -> Optional<U> {
        match self.0 {
            Some(v) => f(v),
            None => Optional(None),
        }
    }

    /// The value, or `other`
    pub fn or_else(self, other: T) -> T {
        self.0.unwrap_or(other)
    }

    /// The value, or the result of `supplier`
    pub fn or_else_get(self, supplier: impl FnOnce() -> T) -> T {
        self.0.unwrap_or_else(supplier)
    }

    /// The value, or the error produced by `factory`
    pub fn or_else_throw<E>(self, factory: impl FnOnce() -> E) -> std::result::Result<T, E> {
        self.0.ok_or_else(factory)
    }

    /// Borrowed view as a std `Option`
    pub fn as_option(&self) -> Option<&T> {
        self.0.as_ref()
    }

    /// Convert into a std `Option`
    pub fn into_option(self) -> Option<T> {
        self.0
    }
}

impl<T> From<Option<T>> for Optional<T> {
    fn from(value: Option<T>) -> Self {
        Optional(value)
    }
}

impl<T> From<Optional<T>> for Option<T> {
    fn from(value: Optional<T>) -> Self {
        value.0
    }
}

/// Absent hashes to 0; present hashes as its value
impl<T: Identity> Identity for Optional<T> {
    fn equals(&self, other: &Self) -> bool {
        self.0.equals(&other.0)
    }

    fn hash_code(&self) -> i32 {
        self.0.hash_code()
    }
}

impl<T: fmt::Display> fmt::Display for Optional<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(v) => write!(f, "Optional[{}]", v),
            None => f.write_str("Optional.empty"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_absent_map_or_else() {
        let called = Cell::new(false);
        let result = Optional::<i32>::of_nullable(None)
            .map(|v| {
                called.set(true);
                v * 2
            })
            .or_else(-1);
        assert_eq!(result, -1);
        assert!(!called.get());
    }

    #[test]
    fn test_get_on_absent() {
        let err = Optional::<i32>::empty().get().unwrap_err();
        assert!(err.is_no_such_element());
        assert_eq!(err.to_string(), "No value present");
        assert!(Optional::<i32>::empty().into_value().is_err());
    }

    #[test]
    fn test_filter_and_flat_map() {
        assert!(Optional::of(3).filter(|v| *v > 5).is_empty());
        assert_eq!(Optional::of(7).filter(|v| *v > 5).get().unwrap(), &7);
        let halved = Optional::of(8).flat_map(|v| {
            if v % 2 == 0 {
                Optional::of(v / 2)
            } else {
                Optional::empty()
            }
        });
        assert_eq!(halved, Optional::of(4));
        assert!(Optional::of(3).flat_map(|_| Optional::<i32>::empty()).is_empty());
    }

    #[test]
    fn test_or_else_throw_uses_factory_error() {
        let err = Optional::<i32>::empty()
            .or_else_throw(|| Error::illegal_argument("missing"))
            .unwrap_err();
        assert_eq!(err, Error::illegal_argument("missing"));
        assert_eq!(Optional::of(1).or_else_throw(|| "unused"), Ok(1));
        assert_eq!(Optional::<i32>::empty().or_else_get(|| 9), 9);
    }

    #[test]
    fn test_if_present() {
        let seen = Cell::new(0);
        Optional::of(5).if_present(|v| seen.set(*v));
        Optional::<i32>::empty().if_present(|_| seen.set(-1));
        assert_eq!(seen.get(), 5);
        Optional::<i32>::empty().if_present_or_else(|_| {}, || seen.set(0));
        assert_eq!(seen.get(), 0);
    }

    #[test]
    fn test_identity_and_display() {
        assert!(Optional::of(1).equals(&Optional::of(1)));
        assert!(!Optional::of(1).equals(&Optional::empty()));
        assert_eq!(Optional::<i32>::empty().hash_code(), 0);
        assert_eq!(Optional::of("x".to_string()).hash_code(), 120);
        assert_eq!(Optional::of(2).to_string(), "Optional[2]");
        assert_eq!(Optional::<i32>::empty().to_string(), "Optional.empty");
    }
}
