//! Transducers that pass a prefix or a suffix of the input through unchanged.
//!
//! Elements these transducers do not forward are still of the outer type, so
//! they finish with them as outer leftovers instead of dropping them.

use super::{identity_loop, settle, Enumeratee};
use crate::effect::Effect;
use crate::input::Signal;
use crate::step::Step;

/// Forwards the first `n` elements.
#[derive(Debug, Clone, Copy)]
pub struct Take(usize);

/// Forward at most `n` elements, then finish. Whatever arrived past the
/// `n`th element is left over.
///
/// ```rust
/// use stepwise::prelude::*;
///
/// let step: Step<Strict, i32, Vec<i32>> = iteratee::consume();
/// let step = step.through(enumeratee::take(2)).unwrap();
/// let step = enum_vec(vec![1, 2, 3, 4]).apply(step).unwrap();
/// assert_eq!(step.into_done(), Some((vec![1, 2], vec![3, 4])));
/// ```
pub fn take(n: usize) -> Take {
    Take(n)
}

impl<F: Effect, E: 'static> Enumeratee<F, E, E> for Take {
    fn apply<A: 'static>(self, step: Step<F, E, A>) -> F::Of<Step<F, E, Step<F, E, A>>> {
        F::pure(take_loop(self.0, step))
    }
}

fn take_loop<F, E, A>(remaining: usize, step: Step<F, E, A>) -> Step<F, E, Step<F, E, A>>
where
    F: Effect,
    E: 'static,
    A: 'static,
{
    if step.is_done() {
        return settle(step, Vec::new());
    }
    if remaining == 0 {
        return Step::done(step);
    }
    Step::cont(move |signal: Signal<E>| match signal {
        Signal::Data(input) if input.len() <= remaining => {
            let remaining = remaining - input.len();
            F::map(step.feed_input(input), move |next| take_loop(remaining, next))
        }
        Signal::Data(input) => {
            let mut elements = input.into_vec();
            let rest = elements.split_off(remaining);
            F::map(step.feed_all(elements), move |next| settle(next, rest))
        }
        Signal::End => F::pure(Step::done(step)),
    })
}

/// Forwards elements while a predicate holds.
#[derive(Debug, Clone)]
pub struct TakeWhile<P>(P);

/// Forward elements until `predicate` first rejects one. The rejected element
/// and everything after it in the same input are left over.
pub fn take_while<P>(predicate: P) -> TakeWhile<P> {
    TakeWhile(predicate)
}

impl<F, E, P> Enumeratee<F, E, E> for TakeWhile<P>
where
    F: Effect,
    E: 'static,
    P: FnMut(&E) -> bool + 'static,
{
    fn apply<A: 'static>(self, step: Step<F, E, A>) -> F::Of<Step<F, E, Step<F, E, A>>> {
        F::pure(take_while_loop(self.0, step))
    }
}

fn take_while_loop<F, E, A, P>(mut predicate: P, step: Step<F, E, A>) -> Step<F, E, Step<F, E, A>>
where
    F: Effect,
    E: 'static,
    A: 'static,
    P: FnMut(&E) -> bool + 'static,
{
    if step.is_done() {
        return settle(step, Vec::new());
    }
    Step::cont(move |signal: Signal<E>| match signal {
        Signal::Data(input) => {
            let stop = input.iter().position(|e| !predicate(e));
            match stop {
                None => F::map(step.feed_input(input), move |next| take_while_loop(predicate, next)),
                Some(stop) => {
                    let mut elements = input.into_vec();
                    let rest = elements.split_off(stop);
                    F::map(step.feed_all(elements), move |next| settle(next, rest))
                }
            }
        }
        Signal::End => F::pure(Step::done(step)),
    })
}

/// Skips the first `n` elements.
#[derive(Debug, Clone, Copy)]
pub struct Skip(usize);

/// Discard the first `n` elements, then forward everything.
pub fn drop(n: usize) -> Skip {
    Skip(n)
}

impl<F: Effect, E: 'static> Enumeratee<F, E, E> for Skip {
    fn apply<A: 'static>(self, step: Step<F, E, A>) -> F::Of<Step<F, E, Step<F, E, A>>> {
        F::pure(skip_loop(self.0, step))
    }
}

fn skip_loop<F, E, A>(remaining: usize, step: Step<F, E, A>) -> Step<F, E, Step<F, E, A>>
where
    F: Effect,
    E: 'static,
    A: 'static,
{
    if remaining == 0 || step.is_done() {
        return identity_loop(step);
    }
    Step::cont(move |signal: Signal<E>| match signal {
        Signal::Data(input) if input.len() <= remaining => {
            F::pure(skip_loop(remaining - input.len(), step))
        }
        Signal::Data(input) => {
            let rest = input.into_vec().split_off(remaining);
            F::map(step.feed_all(rest), identity_loop::<F, E, A>)
        }
        Signal::End => F::pure(Step::done(step)),
    })
}

/// Skips elements while a predicate holds.
#[derive(Debug, Clone)]
pub struct SkipWhile<P>(P);

/// Discard elements until `predicate` first rejects one, then forward
/// everything from that element on.
pub fn drop_while<P>(predicate: P) -> SkipWhile<P> {
    SkipWhile(predicate)
}

impl<F, E, P> Enumeratee<F, E, E> for SkipWhile<P>
where
    F: Effect,
    E: 'static,
    P: FnMut(&E) -> bool + 'static,
{
    fn apply<A: 'static>(self, step: Step<F, E, A>) -> F::Of<Step<F, E, Step<F, E, A>>> {
        F::pure(skip_while_loop(self.0, step))
    }
}

fn skip_while_loop<F, E, A, P>(mut predicate: P, step: Step<F, E, A>) -> Step<F, E, Step<F, E, A>>
where
    F: Effect,
    E: 'static,
    A: 'static,
    P: FnMut(&E) -> bool + 'static,
{
    if step.is_done() {
        return identity_loop(step);
    }
    Step::cont(move |signal: Signal<E>| match signal {
        Signal::Data(input) => {
            let start = input.iter().position(|e| !predicate(e));
            match start {
                None => F::pure(skip_while_loop(predicate, step)),
                Some(start) => {
                    let rest = input.into_vec().split_off(start);
                    F::map(step.feed_all(rest), identity_loop::<F, E, A>)
                }
            }
        }
        Signal::End => F::pure(Step::done(step)),
    })
}
