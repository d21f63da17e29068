//! Mutable reduction protocol
//!
//! A [`Collector`] bundles the four functions of a mutable reduction:
//!
//! - `supplier`: creates an empty accumulation container `A`
//! - `accumulator`: folds one element `T` into the container
//! - `combiner`: merges two partial containers (must be associative)
//! - `finisher`: turns the container into the result `R`
//!
//! `Stream::collect` uses one container per pipeline run, so the combiner
//! only runs when a caller merges partial results explicitly.
//!
//! Accumulation and combining are fallible so collectors such as
//! `to_map_uniquely` can reject their input.

use bitflags::bitflags;
use std::fmt;
use std::rc::Rc;
use valuekit_core::Result;

bitflags! {
    /// Optimization hints. None of them change what a collector computes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Characteristics: u8 {
        /// The accumulator may be called concurrently on one container
        const CONCURRENT = 0b001;
        /// Encounter order does not affect the result
        const UNORDERED = 0b010;
        /// The finisher is the identity function
        const IDENTITY_FINISH = 0b100;
    }
}

impl fmt::Display for Characteristics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter_names().map(|(name, _)| name).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

type Supplier<A> = Rc<dyn Fn() -> A>;
type Accumulator<A, T> = Rc<dyn Fn(&mut A, T) -> Result<()>>;
type Combiner<A> = Rc<dyn Fn(A, A) -> Result<A>>;
type Finisher<A, R> = Rc<dyn Fn(A) -> R>;

/// Reduction of `T` elements through container `A` into `R`
pub struct Collector<T, A, R> {
    supplier: Supplier<A>,
    accumulator: Accumulator<A, T>,
    combiner: Combiner<A>,
    finisher: Finisher<A, R>,
    characteristics: Characteristics,
}

impl<T, A, R> Clone for Collector<T, A, R> {
    fn clone(&self) -> Self {
        Collector {
            supplier: Rc::clone(&self.supplier),
            accumulator: Rc::clone(&self.accumulator),
            combiner: Rc::clone(&self.combiner),
            finisher: Rc::clone(&self.finisher),
            characteristics: self.characteristics,
        }
    }
}

impl<T, A, R> fmt::Debug for Collector<T, A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collector")
            .field("characteristics", &self.characteristics)
            .finish()
    }
}

impl<T: 'static, A: 'static> Collector<T, A, A> {
    /// Collector whose container is its result
    pub fn of(
        supplier: impl Fn() -> A + 'static,
        accumulator: impl Fn(&mut A, T) + 'static,
        combiner: impl Fn(A, A) -> A + 'static,
        characteristics: Characteristics,
    ) -> Self {
        Collector {
            supplier: Rc::new(supplier),
            accumulator: Rc::new(move |a: &mut A, t: T| -> Result<()> {
                accumulator(a, t);
                Ok(())
            }),
            combiner: Rc::new(move |a: A, b: A| -> Result<A> { Ok(combiner(a, b)) }),
            finisher: Rc::new(|a: A| a),
            characteristics: characteristics | Characteristics::IDENTITY_FINISH,
        }
    }
}

impl<T: 'static, A: 'static, R: 'static> Collector<T, A, R> {
    /// Collector with an explicit finisher
    pub fn of_with_finisher(
        supplier: impl Fn() -> A + 'static,
        accumulator: impl Fn(&mut A, T) + 'static,
        combiner: impl Fn(A, A) -> A + 'static,
        finisher: impl Fn(A) -> R + 'static,
        characteristics: Characteristics,
    ) -> Self {
        Collector {
            supplier: Rc::new(supplier),
            accumulator: Rc::new(move |a: &mut A, t: T| -> Result<()> {
                accumulator(a, t);
                Ok(())
            }),
            combiner: Rc::new(move |a: A, b: A| -> Result<A> { Ok(combiner(a, b)) }),
            finisher: Rc::new(finisher),
            characteristics,
        }
    }

    /// Collector whose accumulator and combiner may fail
    pub fn try_of(
        supplier: impl Fn() -> A + 'static,
        accumulator: impl Fn(&mut A, T) -> Result<()> + 'static,
        combiner: impl Fn(A, A) -> Result<A> + 'static,
        finisher: impl Fn(A) -> R + 'static,
        characteristics: Characteristics,
    ) -> Self {
        Collector {
            supplier: Rc::new(supplier),
            accumulator: Rc::new(accumulator),
            combiner: Rc::new(combiner),
            finisher: Rc::new(finisher),
            characteristics,
        }
    }

    /// Fresh empty container
    pub fn supply(&self) -> A {
        (self.supplier)()
    }

    /// Fold `element` into `container`
    pub fn accumulate(&self, container: &mut A, element: T) -> Result<()> {
        (self.accumulator)(container, element)
    }

    /// Merge two partial containers
    pub fn combine(&self, left: A, right: A) -> Result<A> {
        (self.combiner)(left, right)
    }

    /// Turn a container into the result
    pub fn finish(&self, container: A) -> R {
        (self.finisher)(container)
    }

    /// Optimization hints
    pub fn characteristics(&self) -> Characteristics {
        self.characteristics
    }

    /// Run the whole reduction over `elements`
    pub fn collect_from<I: IntoIterator<Item = T>>(&self, elements: I) -> Result<R> {
        let mut container = self.supply();
        for element in elements {
            self.accumulate(&mut container, element)?;
        }
        Ok(self.finish(container))
    }

    /// Same reduction with `after` applied to the result
    pub fn and_then<RR: 'static>(self, after: impl Fn(R) -> RR + 'static) -> Collector<T, A, RR> {
        let finisher = self.finisher;
        Collector {
            supplier: self.supplier,
            accumulator: self.accumulator,
            combiner: self.combiner,
            finisher: Rc::new(move |a: A| after(finisher(a))),
            characteristics: self.characteristics - Characteristics::IDENTITY_FINISH,
        }
    }

    /// Same reduction over `U`, with each element mapped by `f` first
    pub fn contramap<U: 'static>(self, f: impl Fn(U) -> T + 'static) -> Collector<U, A, R> {
        let accumulator = self.accumulator;
        Collector {
            supplier: self.supplier,
            accumulator: Rc::new(move |a: &mut A, u: U| accumulator(a, f(u))),
            combiner: self.combiner,
            finisher: self.finisher,
            characteristics: self.characteristics,
        }
    }
}
