//! Building enumerators from values, iterators and effects.

use std::num::NonZeroUsize;

use either::Either;

use super::Enumerator;
use crate::effect::Effect;
use crate::error::Error;
use crate::step::Step;

/// Produces nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Empty;

/// An enumerator that leaves the step exactly as it was.
pub fn empty() -> Empty {
    Empty
}

impl<F: Effect, E: 'static> Enumerator<F, E> for Empty {
    fn apply<A: 'static>(self, step: Step<F, E, A>) -> F::Of<Step<F, E, A>> {
        F::pure(step)
    }
}

/// Produces a single element.
#[derive(Debug, Clone)]
pub struct EnumOne<E>(E);

/// Feed a single element, unless the step is already done.
///
/// ```rust
/// use stepwise::prelude::*;
///
/// let step: Step<Strict, char, Option<char>> = iteratee::head();
/// assert_eq!(enum_one('q').drive(step).unwrap(), Some('q'));
/// ```
pub fn enum_one<E>(element: E) -> EnumOne<E> {
    EnumOne(element)
}

impl<F: Effect, E: 'static> Enumerator<F, E> for EnumOne<E> {
    fn apply<A: 'static>(self, step: Step<F, E, A>) -> F::Of<Step<F, E, A>> {
        step.feed_el(self.0)
    }
}

/// Produces the elements of a vector, delivered together as one chunk.
#[derive(Debug, Clone)]
pub struct EnumVec<E>(Vec<E>);

/// Create an enumerator over an in-memory sequence.
///
/// ```rust
/// use stepwise::prelude::*;
///
/// let step: Step<Strict, &str, Option<&str>> = iteratee::head();
/// let step = enum_vec(vec!["a", "b", "c"]).apply(step).unwrap();
/// assert_eq!(step.into_done(), Some((Some("a"), vec!["b", "c"])));
/// ```
pub fn enum_vec<E>(elements: Vec<E>) -> EnumVec<E> {
    EnumVec(elements)
}

impl<F: Effect, E: 'static> Enumerator<F, E> for EnumVec<E> {
    fn apply<A: 'static>(self, step: Step<F, E, A>) -> F::Of<Step<F, E, A>> {
        step.feed_all(self.0)
    }
}

/// Produces the items of an iterator one at a time.
#[derive(Debug, Clone)]
pub struct EnumIter<I>(I);

/// Create an enumerator that pulls from an iterator only as fast as the step consumes.
///
/// Feeding is a [`tail_rec`](Effect::tail_rec) loop, so arbitrarily long
/// iterators do not grow the stack.
pub fn enum_iter<I: IntoIterator>(iter: I) -> EnumIter<I::IntoIter> {
    EnumIter(iter.into_iter())
}

impl<F, I> Enumerator<F, I::Item> for EnumIter<I>
where
    F: Effect,
    I: Iterator + 'static,
    I::Item: 'static,
{
    fn apply<A: 'static>(self, step: Step<F, I::Item, A>) -> F::Of<Step<F, I::Item, A>> {
        F::tail_rec((self.0, step), |(mut iter, step): (I, Step<F, I::Item, A>)| {
            if step.is_done() {
                return F::pure(Either::Right(step));
            }
            match iter.next() {
                Some(element) => F::map(step.feed_el(element), move |next| Either::Left((iter, next))),
                None => F::pure(Either::Right(step)),
            }
        })
    }
}

/// Produces the items of an iterator in chunks of up to `size`.
#[derive(Debug, Clone)]
pub struct EnumChunks<I> {
    iter: I,
    size: NonZeroUsize,
}

/// Feed an iterator in chunks of up to `size` elements, pulling each chunk
/// only while the step is still waiting.
pub fn enum_chunks<I: IntoIterator>(iter: I, size: NonZeroUsize) -> EnumChunks<I::IntoIter> {
    EnumChunks {
        iter: iter.into_iter(),
        size,
    }
}

impl<F, I> Enumerator<F, I::Item> for EnumChunks<I>
where
    F: Effect,
    I: Iterator + 'static,
    I::Item: 'static,
{
    fn apply<A: 'static>(self, step: Step<F, I::Item, A>) -> F::Of<Step<F, I::Item, A>> {
        let size = self.size.get();
        F::tail_rec((self.iter, step), move |(mut iter, step): (I, Step<F, I::Item, A>)| {
            if step.is_done() {
                return F::pure(Either::Right(step));
            }
            let chunk: Vec<_> = iter.by_ref().take(size).collect();
            if chunk.is_empty() {
                return F::pure(Either::Right(step));
            }
            F::map(step.feed_all(chunk), move |next| Either::Left((iter, next)))
        })
    }
}

/// Produces `init`, `f(&init)`, `f(&f(&init))`, ... until the step is done.
///
/// `f` is only called once the previous element has been fed and the step is
/// still waiting for more.
pub struct Iterate<E, G> {
    init: E,
    f: G,
}

/// An unbounded source built by repeatedly applying `f`.
pub fn iterate<E, G>(init: E, f: G) -> Iterate<E, G>
where
    E: Clone,
    G: FnMut(&E) -> E,
{
    Iterate { init, f }
}

impl<F, E, G> Enumerator<F, E> for Iterate<E, G>
where
    F: Effect,
    E: Clone + 'static,
    G: FnMut(&E) -> E + 'static,
{
    fn apply<A: 'static>(self, step: Step<F, E, A>) -> F::Of<Step<F, E, A>> {
        let Iterate { init, mut f } = self;
        // `fed` marks that `current` has already been produced.
        F::tail_rec((init, false, step), move |(current, fed, step): (E, bool, Step<F, E, A>)| {
            if step.is_done() {
                return F::pure(Either::Right(step));
            }
            let current = if fed { f(&current) } else { current };
            let element = current.clone();
            F::map(step.feed_el(element), move |next| Either::Left((current, true, next)))
        })
    }
}

/// Produces the same element until the step is done.
#[derive(Debug, Clone)]
pub struct Repeat<E>(E);

/// Feed clones of `element` until the step is done.
pub fn repeat<E: Clone>(element: E) -> Repeat<E> {
    Repeat(element)
}

impl<F: Effect, E: Clone + 'static> Enumerator<F, E> for Repeat<E> {
    fn apply<A: 'static>(self, step: Step<F, E, A>) -> F::Of<Step<F, E, A>> {
        iterate(self.0, E::clone).apply(step)
    }
}

/// Produces the single value of an effect.
pub struct LiftM<F: Effect, E: 'static>(F::Of<E>);

/// Feed the value `fa` computes. `fa` is only sequenced if the step is still waiting.
pub fn lift_m<F: Effect, E: 'static>(fa: F::Of<E>) -> LiftM<F, E> {
    LiftM(fa)
}

impl<F: Effect, E: 'static> Enumerator<F, E> for LiftM<F, E> {
    fn apply<A: 'static>(self, step: Step<F, E, A>) -> F::Of<Step<F, E, A>> {
        if step.is_done() {
            return F::pure(step);
        }
        F::bind(self.0, move |element| step.feed_el(element))
    }
}

/// Produces the value of an effect built at drive time.
pub struct LiftMEval<G>(G);

/// Feed the value of the effect `thunk` builds.
///
/// `thunk` is called at most once, when the enumerator is driven, never when it
/// is created or composed. This is the hook for acquiring resources lazily.
pub fn lift_m_eval<G>(thunk: G) -> LiftMEval<G> {
    LiftMEval(thunk)
}

impl<F, E, G> Enumerator<F, E> for LiftMEval<G>
where
    F: Effect,
    E: 'static,
    G: FnOnce() -> F::Of<E> + 'static,
{
    fn apply<A: 'static>(self, step: Step<F, E, A>) -> F::Of<Step<F, E, A>> {
        if step.is_done() {
            return F::pure(step);
        }
        F::bind(F::suspend(self.0), move |element| step.feed_el(element))
    }
}

/// Runs an effect without producing anything.
pub struct Perform<G>(G);

/// Run the effect `thunk` builds when driven, feeding nothing.
///
/// The step is passed on unchanged once the effect succeeds; a failure fails
/// the drive.
pub fn perform<G>(thunk: G) -> Perform<G> {
    Perform(thunk)
}

impl<F, E, G> Enumerator<F, E> for Perform<G>
where
    F: Effect,
    E: 'static,
    G: FnOnce() -> F::Of<()> + 'static,
{
    fn apply<A: 'static>(self, step: Step<F, E, A>) -> F::Of<Step<F, E, A>> {
        F::bind(F::suspend(self.0), move |()| F::pure(step))
    }
}

/// Fails when driven.
#[derive(Debug)]
pub struct Fail(Error);

/// An enumerator that raises `error` in the effect when driven.
pub fn fail(error: Error) -> Fail {
    Fail(error)
}

impl<F: Effect, E: 'static> Enumerator<F, E> for Fail {
    fn apply<A: 'static>(self, _step: Step<F, E, A>) -> F::Of<Step<F, E, A>> {
        F::raise(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::{Async, Deferred, Strict};
    use crate::input::Signal;
    use crate::iteratee;
    use crate::test_support::block_on;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_empty_returns_step_unchanged() {
        let step: Step<Strict, i32, Vec<i32>> = iteratee::consume();
        let step = empty().apply(step).unwrap();
        assert!(step.is_cont());
        assert_eq!(step.run().unwrap(), Vec::<i32>::new());
    }

    #[test]
    fn test_enum_vec_collects_everything() {
        let step: Step<Strict, &str, Vec<&str>> = iteratee::consume();
        let step = enum_vec(vec!["a", "b", "c"]).apply(step).and_then(Step::end).unwrap();
        assert_eq!(step.into_done(), Some((vec!["a", "b", "c"], vec![])));
    }

    #[test]
    fn test_enum_vec_into_take_one_leaves_the_rest() {
        let step: Step<Strict, &str, Vec<&str>> = iteratee::take(1);
        let step = enum_vec(vec!["a", "b", "c"]).apply(step).unwrap();
        assert_eq!(step.into_done(), Some((vec!["a"], vec!["b", "c"])));
    }

    #[test]
    fn test_enum_one_on_done_step() {
        let step: Step<Strict, i32, i32> = Step::done(3);
        let step = enum_one(9).apply(step).unwrap();
        assert_eq!(step.into_done(), Some((3, vec![])));
    }

    #[test]
    fn test_enum_iter_counts_a_million_elements() {
        let step: Step<Strict, u32, u64> = iteratee::length();
        let count = enum_iter(0..1_000_000_u32).drive(step).unwrap();
        assert_eq!(count, 1_000_000);
    }

    #[test]
    fn test_enum_iter_counts_a_million_elements_deferred() {
        let step: Step<Deferred, u32, u64> = iteratee::length();
        let count = enum_iter(0..1_000_000_u32).drive(step).run().unwrap();
        assert_eq!(count, 1_000_000);
    }

    #[test]
    fn test_enum_iter_counts_a_million_elements_async() {
        let step: Step<Async, u32, u64> = iteratee::length();
        let count = block_on(enum_iter(0..1_000_000_u32).drive(step)).unwrap();
        assert_eq!(count, 1_000_000);
    }

    #[test]
    fn test_enum_iter_stops_pulling_once_done() {
        let pulled = Rc::new(Cell::new(0));
        let source = {
            let pulled = Rc::clone(&pulled);
            (0..100).inspect(move |_| pulled.set(pulled.get() + 1))
        };
        let step: Step<Strict, i32, Vec<i32>> = iteratee::take(3);
        let taken = enum_iter(source).drive(step).unwrap();
        assert_eq!(taken, vec![0, 1, 2]);
        assert_eq!(pulled.get(), 3);
    }

    #[test]
    fn test_enum_chunks_delivers_chunks() {
        fn sizes(seen: Vec<usize>) -> Step<Strict, i32, Vec<usize>> {
            Step::cont(move |signal| match signal {
                Signal::Data(input) => {
                    let mut seen = seen;
                    seen.push(input.len());
                    Ok(sizes(seen))
                }
                Signal::End => Ok(Step::done(seen)),
            })
        }

        let size = NonZeroUsize::new(4).unwrap();
        let seen = enum_chunks(0..10, size).drive(sizes(Vec::new())).unwrap();
        assert_eq!(seen, vec![4, 4, 2]);

        let all = Enumerator::<Strict, i32>::to_vec(enum_chunks(0..10, size)).unwrap();
        assert_eq!(all, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_iterate_and_repeat_are_bounded_by_the_step() {
        let step: Step<Strict, u64, Vec<u64>> = iteratee::take(5);
        assert_eq!(iterate(1_u64, |n| n * 2).drive(step).unwrap(), vec![1, 2, 4, 8, 16]);

        let step: Step<Strict, char, Vec<char>> = iteratee::take(3);
        assert_eq!(repeat('x').drive(step).unwrap(), vec!['x', 'x', 'x']);
    }

    #[test]
    fn test_iterate_calls_f_only_while_the_step_waits() {
        let step: Step<Strict, u8, Vec<u8>> = iteratee::take(8);
        let powers = iterate(1_u8, |n| n * 2).drive(step).unwrap();
        assert_eq!(powers, vec![1, 2, 4, 8, 16, 32, 64, 128]);

        let calls = Rc::new(Cell::new(0));
        let source = iterate(1_u8, {
            let calls = Rc::clone(&calls);
            move |n: &u8| {
                calls.set(calls.get() + 1);
                n.wrapping_mul(2)
            }
        });
        let step: Step<Strict, u8, Vec<u8>> = iteratee::take(8);
        assert_eq!(source.drive(step).unwrap().len(), 8);
        assert_eq!(calls.get(), 7);
    }

    #[test]
    fn test_iterate_into_a_done_step_calls_nothing() {
        let calls = Rc::new(Cell::new(0));
        let source = iterate(0_i32, {
            let calls = Rc::clone(&calls);
            move |n: &i32| {
                calls.set(calls.get() + 1);
                n + 1
            }
        });
        let step: Step<Strict, i32, i32> = Step::done(5);
        assert_eq!(source.drive(step).unwrap(), 5);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_lift_m_eval_runs_at_drive_time_only() {
        let calls = Rc::new(Cell::new(0));
        let source = lift_m_eval({
            let calls = Rc::clone(&calls);
            move || {
                calls.set(calls.get() + 1);
                Deferred::pure(42)
            }
        });
        let step: Step<Deferred, i32, Option<i32>> = iteratee::head();
        let thunk = source.drive(step);
        assert_eq!(calls.get(), 0);
        assert_eq!(thunk.run().unwrap(), Some(42));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_lift_m_skips_done_steps() {
        let step: Step<Strict, i32, i32> = Step::done(1);
        let step = lift_m::<Strict, i32>(Err(Error::msg("never sequenced"))).apply(step).unwrap();
        assert_eq!(step.into_done(), Some((1, vec![])));
    }

    #[test]
    fn test_perform_feeds_nothing() {
        let ran = Rc::new(Cell::new(false));
        let source = perform({
            let ran = Rc::clone(&ran);
            move || -> crate::error::Result<()> {
                ran.set(true);
                Ok(())
            }
        });
        let step: Step<Strict, i32, Vec<i32>> = iteratee::consume();
        assert_eq!(source.drive(step).unwrap(), Vec::<i32>::new());
        assert!(ran.get());
    }

    #[test]
    fn test_fail_raises() {
        let step: Step<Strict, i32, Vec<i32>> = iteratee::consume();
        let err = fail(Error::msg("no source")).drive(step).unwrap_err();
        assert_eq!(err.to_string(), "no source");
    }
}
