//! Transducers between two steps.
//!
//! An [`Enumeratee<F, O, I>`] turns a step over inner elements `I` into a step
//! over outer elements `O` whose result is the inner step. It is a consumer to
//! whatever feeds it and a producer to the step it wraps. Enumeratees compose
//! with [`and_then`](Enumeratee::and_then), and [`identity`] is the unit of
//! that composition.
//!
//! Only transducers that pass elements through unchanged ([`identity`],
//! [`take`], [`take_while`], [`drop`], [`drop_while`]) report unconsumed
//! elements as outer leftovers. Every other transducer drops the inner step's
//! leftovers, the same way [`Step::contramap`] does.
//!
//! ```rust
//! use stepwise::prelude::*;
//!
//! let evens = enumeratee::filter(|n: &i32| n % 2 == 0).and_then(enumeratee::take(2));
//! let step: Step<Strict, i32, Vec<i32>> = iteratee::consume();
//! let step = step.through(evens).unwrap();
//! let out = enum_iter(1..).drive(step).unwrap();
//! assert_eq!(out, vec![2, 4]);
//! ```

mod slice;
mod transform;

pub use slice::{drop, drop_while, take, take_while, Skip, SkipWhile, Take, TakeWhile};
pub use transform::{
    filter, filter_map, flat_map, grouped, intersperse, map, scan, zip_with_index, Filter,
    FilterMap, FlatMap, Grouped, Intersperse, Map, Scan, ZipWithIndex,
};

use std::marker::PhantomData;

use crate::effect::Effect;
use crate::input::{Input, Signal};
use crate::step::Step;

/// A transducer from outer elements `O` to inner elements `I`.
pub trait Enumeratee<F: Effect, O: 'static, I: 'static>: Sized + 'static {
    /// Wrap `step` in a step that accepts `O`s and finishes with `step`'s
    /// latest state.
    fn apply<A: 'static>(self, step: Step<F, I, A>) -> F::Of<Step<F, O, Step<F, I, A>>>;

    /// Pass this transducer's output through `next`.
    fn and_then<J, T>(self, next: T) -> AndThen<F, Self, T, I>
    where
        J: 'static,
        T: Enumeratee<F, I, J>,
    {
        and_then(self, next)
    }

    /// Transform every element this transducer emits.
    fn map<J, G>(self, f: G) -> AndThen<F, Self, Map<G>, I>
    where
        J: 'static,
        G: FnMut(I) -> J + 'static,
    {
        and_then(self, map(f))
    }

    /// Accept `O2`s by converting them to `O` first.
    fn contramap<O2, G>(self, f: G) -> AndThen<F, Map<G>, Self, O>
    where
        O2: 'static,
        G: FnMut(O2) -> O + 'static,
    {
        and_then(map(f), self)
    }
}

/// Two transducers run one after the other; `M` is the element type between them.
///
/// Created via [`and_then()`] or [`Enumeratee::and_then`].
pub struct AndThen<F, L, R, M> {
    first: L,
    second: R,
    _marker: PhantomData<fn() -> (F, M)>,
}

/// Run `first`, then feed what it emits into `second`.
pub fn and_then<F, L, R, M>(first: L, second: R) -> AndThen<F, L, R, M> {
    AndThen {
        first,
        second,
        _marker: PhantomData,
    }
}

impl<F, O, M, I, L, R> Enumeratee<F, O, I> for AndThen<F, L, R, M>
where
    F: Effect,
    O: 'static,
    M: 'static,
    I: 'static,
    L: Enumeratee<F, O, M>,
    R: Enumeratee<F, M, I>,
{
    fn apply<A: 'static>(self, step: Step<F, I, A>) -> F::Of<Step<F, O, Step<F, I, A>>> {
        let AndThen { first, second, .. } = self;
        F::bind(second.apply(step), move |middle: Step<F, M, Step<F, I, A>>| {
            F::bind(first.apply(middle), Step::<F, O, Step<F, M, Step<F, I, A>>>::join)
        })
    }
}

/// Forwards every signal unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

/// The unit of [`and_then`]: every signal passes through, and leftovers of
/// the inner step come back out unchanged.
pub fn identity() -> Identity {
    Identity
}

impl<F: Effect, E: 'static> Enumeratee<F, E, E> for Identity {
    fn apply<A: 'static>(self, step: Step<F, E, A>) -> F::Of<Step<F, E, Step<F, E, A>>> {
        F::pure(identity_loop(step))
    }
}

pub(crate) fn identity_loop<F, E, A>(step: Step<F, E, A>) -> Step<F, E, Step<F, E, A>>
where
    F: Effect,
    E: 'static,
    A: 'static,
{
    if step.is_done() {
        return settle(step, Vec::new());
    }
    Step::cont(move |signal: Signal<E>| match signal {
        Signal::Data(input) => F::map(step.feed_input(input), identity_loop::<F, E, A>),
        Signal::End => F::pure(Step::done(step)),
    })
}

/// Finish a pass-through transducer. The inner step's leftovers move out,
/// followed by `rest`, so nothing handed to the transducer is lost.
pub(crate) fn settle<F, E, A>(step: Step<F, E, A>, rest: Vec<E>) -> Step<F, E, Step<F, E, A>>
where
    F: Effect,
    E: 'static,
    A: 'static,
{
    match step {
        Step::Done(value, mut leftovers) => {
            leftovers.extend(rest);
            Step::Done(Step::done(value), leftovers)
        }
        waiting => Step::Done(waiting, rest),
    }
}

/// Wrap `step` in an outer step that hands each signal to `on_signal`.
///
/// The outer step finishes as soon as the inner one does, or right after
/// `on_signal` has seen the end of input.
pub(crate) fn transduce_signal<F, O, I, A, H>(step: Step<F, I, A>, mut on_signal: H) -> Step<F, O, Step<F, I, A>>
where
    F: Effect,
    O: 'static,
    I: 'static,
    A: 'static,
    H: FnMut(Signal<O>, Step<F, I, A>) -> F::Of<Step<F, I, A>> + 'static,
{
    if step.is_done() {
        return Step::done(step);
    }
    Step::cont(move |signal: Signal<O>| {
        let ended = signal.is_end();
        F::map(on_signal(signal, step), move |next| {
            if ended {
                Step::done(next)
            } else {
                transduce_signal(next, on_signal)
            }
        })
    })
}

/// [`transduce_signal`] for transducers with nothing to flush at end of input.
pub(crate) fn transduce<F, O, I, A, H>(step: Step<F, I, A>, mut on_input: H) -> Step<F, O, Step<F, I, A>>
where
    F: Effect,
    O: 'static,
    I: 'static,
    A: 'static,
    H: FnMut(Input<O>, Step<F, I, A>) -> F::Of<Step<F, I, A>> + 'static,
{
    transduce_signal(step, move |signal: Signal<O>, step: Step<F, I, A>| match signal {
        Signal::Data(input) => on_input(input, step),
        Signal::End => F::pure(step),
    })
}
