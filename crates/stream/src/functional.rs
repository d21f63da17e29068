//! Shareable function values
//!
//! Plain closures cover most call sites. These wrappers exist for the
//! places where a function is composed (`and`, `compose`, ...) or stored
//! and cloned, so they hold their closure behind an `Rc`.

use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;
use valuekit_collections::Comparator;
use valuekit_core::Identity;

// ============================================================================
// Predicate
// ============================================================================

/// Composable boolean test
pub struct Predicate<T: ?Sized> {
    test: Rc<dyn Fn(&T) -> bool>,
}

impl<T: ?Sized> Clone for Predicate<T> {
    fn clone(&self) -> Self {
        Predicate {
            test: Rc::clone(&self.test),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate")
    }
}

impl<T: ?Sized + 'static> Predicate<T> {
    /// Wrap a closure
    pub fn new(test: impl Fn(&T) -> bool + 'static) -> Self {
        Predicate {
            test: Rc::new(test),
        }
    }

    /// Evaluate on `value`
    pub fn test(&self, value: &T) -> bool {
        (self.test)(value)
    }

    /// Both hold; `other` is not evaluated when `self` is false
    pub fn and(self, other: Predicate<T>) -> Self {
        Predicate::new(move |v: &T| self.test(v) && other.test(v))
    }

    /// Either holds; `other` is not evaluated when `self` is true
    pub fn or(self, other: Predicate<T>) -> Self {
        Predicate::new(move |v: &T| self.test(v) || other.test(v))
    }

    /// Logical negation
    pub fn negate(self) -> Self {
        Predicate::new(move |v: &T| !self.test(v))
    }

    /// Borrow as a closure for stream stages
    pub fn as_fn(&self) -> impl Fn(&T) -> bool + 'static {
        let test = Rc::clone(&self.test);
        move |v: &T| test(v)
    }
}

impl<T: Identity + 'static> Predicate<T> {
    /// True for values equal to `target`
    pub fn is_equal(target: T) -> Self {
        Predicate::new(move |v: &T| target.equals(v))
    }
}

// ============================================================================
// Function
// ============================================================================

/// Composable one-argument function
pub struct Function<T, R> {
    apply: Rc<dyn Fn(T) -> R>,
}

impl<T, R> Clone for Function<T, R> {
    fn clone(&self) -> Self {
        Function {
            apply: Rc::clone(&self.apply),
        }
    }
}

impl<T, R> fmt::Debug for Function<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Function")
    }
}

impl<T: 'static, R: 'static> Function<T, R> {
    /// Wrap a closure
    pub fn new(apply: impl Fn(T) -> R + 'static) -> Self {
        Function {
            apply: Rc::new(apply),
        }
    }

    /// Apply to `value`
    pub fn apply(&self, value: T) -> R {
        (self.apply)(value)
    }

    /// `after(self(x))`
    pub fn and_then<V: 'static>(self, after: Function<R, V>) -> Function<T, V> {
        Function::new(move |v: T| after.apply(self.apply(v)))
    }

    /// `self(before(x))`
    pub fn compose<V: 'static>(self, before: Function<V, T>) -> Function<V, R> {
        Function::new(move |v: V| self.apply(before.apply(v)))
    }
}

impl<T: 'static> Function<T, T> {
    /// Returns its argument unchanged
    pub fn identity() -> Self {
        Function::new(|v: T| v)
    }
}

// ============================================================================
// Binary operators
// ============================================================================

/// Smaller of two values under `comparator`; the first argument wins ties
pub fn min_by<T: 'static>(comparator: Comparator<T>) -> impl Fn(T, T) -> T {
    move |a, b| match comparator.compare(&a, &b) {
        Ordering::Greater => b,
        _ => a,
    }
}

/// Larger of two values under `comparator`; the first argument wins ties
pub fn max_by<T: 'static>(comparator: Comparator<T>) -> impl Fn(T, T) -> T {
    move |a, b| match comparator.compare(&a, &b) {
        Ordering::Less => b,
        _ => a,
    }
}
