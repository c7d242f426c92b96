//! Producers that push input into a [`Step`].
//!
//! An [`Enumerator`] is a value describing a source. Applying it to a step
//! feeds the step until either the source is exhausted or the step is done,
//! and returns the resulting step inside the effect. Nothing is read before
//! [`apply`](Enumerator::apply) is sequenced, so sources that own OS resources
//! acquire them at drive time.
//!
//! ```rust
//! use stepwise::prelude::*;
//!
//! let step: Step<Strict, i32, Vec<i32>> = iteratee::consume();
//! let out = enum_vec(vec![1, 2, 3])
//!     .append(4)
//!     .map(|n: i32| n * 10)
//!     .drive(step)
//!     .unwrap();
//! assert_eq!(out, vec![10, 20, 30, 40]);
//! ```

mod build;
mod compose;
pub mod io;

pub use build::{
    empty, enum_chunks, enum_iter, enum_one, enum_vec, fail, iterate, lift_m, lift_m_eval, perform,
    repeat, Empty, EnumChunks, EnumIter, EnumOne, EnumVec, Fail, Iterate, LiftM, LiftMEval,
    Perform, Repeat,
};
pub use compose::{chain, ensure, ensure_eval, through, Chain, Ensure, Finalizer, Through};

use crate::effect::Effect;
use crate::enumeratee::{self, Enumeratee};
use crate::iteratee;
use crate::step::Step;

/// A source of `E`s that can drive any [`Step`] over `E`.
pub trait Enumerator<F: Effect, E: 'static>: Sized + 'static {
    /// Feed `step` until this source is exhausted or the step is done.
    fn apply<A: 'static>(self, step: Step<F, E, A>) -> F::Of<Step<F, E, A>>;

    /// Feed `step`, then run it to its result.
    fn drive<A: 'static>(self, step: Step<F, E, A>) -> F::Of<A> {
        crate::handler::handle(self, step)
    }

    /// Collect everything this source produces.
    fn to_vec(self) -> F::Of<Vec<E>> {
        self.drive(iteratee::consume())
    }

    /// Produce everything from `self`, then everything from `next` unless the
    /// step is already done.
    fn chain<R>(self, next: R) -> Chain<F, Self, R>
    where
        R: Enumerator<F, E>,
    {
        Chain::new(self, next)
    }

    /// Produce `element` before everything from `self`.
    ///
    /// ```rust
    /// use stepwise::prelude::*;
    ///
    /// let step: Step<Strict, i32, Vec<i32>> = iteratee::consume();
    /// assert_eq!(enum_vec(vec![2, 3]).prepend(1).drive(step).unwrap(), vec![1, 2, 3]);
    /// ```
    fn prepend(self, element: E) -> Chain<F, EnumOne<E>, Self> {
        Chain::new(enum_one(element), self)
    }

    /// Produce `element` after everything from `self`, unless the step is
    /// already done.
    fn append(self, element: E) -> Chain<F, Self, EnumOne<E>> {
        Chain::new(self, enum_one(element))
    }

    /// Pass every element through a transducer.
    fn through<I, T>(self, enumeratee: T) -> Through<F, Self, T, E>
    where
        I: 'static,
        T: Enumeratee<F, E, I>,
    {
        Through::new(self, enumeratee)
    }

    /// Convert every element with `f`. Shorthand for `through(enumeratee::map(f))`.
    fn map<I, G>(self, f: G) -> Through<F, Self, enumeratee::Map<G>, E>
    where
        I: 'static,
        G: FnMut(E) -> I + 'static,
    {
        Through::new(self, enumeratee::map(f))
    }

    /// Produce only the elements `predicate` accepts.
    ///
    /// ```rust
    /// use stepwise::prelude::*;
    ///
    /// let step: Step<Strict, u32, u64> = iteratee::length();
    /// let odd = enum_iter(0..10_u32).filter(|n: &u32| n % 2 == 1).drive(step);
    /// assert_eq!(odd.unwrap(), 5);
    /// ```
    fn filter<P>(self, predicate: P) -> Through<F, Self, enumeratee::Filter<P>, E>
    where
        P: FnMut(&E) -> bool + 'static,
    {
        Through::new(self, enumeratee::filter(predicate))
    }

    /// Run `finalizer` exactly once after this source has driven a step,
    /// whether driving succeeded or failed.
    ///
    /// A failing finalizer fails the whole computation. If driving failed too,
    /// both errors are reported through [`Error::Finalizer`](crate::Error::Finalizer).
    fn ensure_eval<G>(self, finalizer: G) -> Ensure<F, Self, G>
    where
        G: FnOnce() -> F::Of<()> + 'static,
    {
        Ensure::new(self, finalizer)
    }
}
