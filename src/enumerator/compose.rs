//! Sequencing enumerators, transforming their elements and scoping their resources.

use std::marker::PhantomData;

use super::Enumerator;
use crate::effect::Effect;
use crate::enumeratee::Enumeratee;
use crate::error::Error;
use crate::step::Step;

/// Runs one enumerator after another.
///
/// Created via [`chain()`] or [`Enumerator::chain`].
pub struct Chain<F, L, R> {
    first: L,
    second: R,
    _effect: PhantomData<fn() -> F>,
}

impl<F, L, R> Chain<F, L, R> {
    pub(super) fn new(first: L, second: R) -> Self {
        Chain {
            first,
            second,
            _effect: PhantomData,
        }
    }
}

/// Drive `first`, then `second` unless the step finished during `first`.
///
/// ```rust
/// use stepwise::prelude::*;
///
/// let step: Step<Strict, i32, Vec<i32>> = iteratee::take(3);
/// let source = chain(enum_vec(vec![1, 2]), enum_vec(vec![3, 4]));
/// assert_eq!(source.drive(step).unwrap(), vec![1, 2, 3]);
/// ```
pub fn chain<F, L, R>(first: L, second: R) -> Chain<F, L, R> {
    Chain::new(first, second)
}

impl<F, E, L, R> Enumerator<F, E> for Chain<F, L, R>
where
    F: Effect,
    E: 'static,
    L: Enumerator<F, E>,
    R: Enumerator<F, E>,
{
    fn apply<A: 'static>(self, step: Step<F, E, A>) -> F::Of<Step<F, E, A>> {
        let Chain { first, second, .. } = self;
        F::bind(first.apply(step), move |step| {
            if step.is_done() {
                F::pure(step)
            } else {
                second.apply(step)
            }
        })
    }
}

/// An enumerator whose elements pass through a transducer.
///
/// Created via [`through()`] or [`Enumerator::through`].
pub struct Through<F, S, T, E> {
    source: S,
    enumeratee: T,
    _marker: PhantomData<fn() -> (F, E)>,
}

impl<F, S, T, E> Through<F, S, T, E> {
    pub(super) fn new(source: S, enumeratee: T) -> Self {
        Through {
            source,
            enumeratee,
            _marker: PhantomData,
        }
    }
}

/// Pass everything `source` produces through `enumeratee`.
pub fn through<F, S, T, E>(source: S, enumeratee: T) -> Through<F, S, T, E> {
    Through::new(source, enumeratee)
}

impl<F, E, I, S, T> Enumerator<F, I> for Through<F, S, T, E>
where
    F: Effect,
    E: 'static,
    I: 'static,
    S: Enumerator<F, E>,
    T: Enumeratee<F, E, I>,
{
    /// The transducer is sent end of input once the source is exhausted, so
    /// buffered elements reach `step`. `step` itself is not ended.
    fn apply<A: 'static>(self, step: Step<F, I, A>) -> F::Of<Step<F, I, A>> {
        let Through {
            source, enumeratee, ..
        } = self;
        F::bind(enumeratee.apply(step), move |outer| {
            F::bind(source.apply(outer), Step::<F, E, Step<F, I, A>>::run)
        })
    }
}

/// An enumerator followed by a finalizer that always runs.
///
/// Created via [`ensure_eval()`], [`ensure()`] or [`Enumerator::ensure_eval`].
pub struct Ensure<F, S, G> {
    source: S,
    finalizer: G,
    _effect: PhantomData<fn() -> F>,
}

impl<F, S, G> Ensure<F, S, G> {
    pub(super) fn new(source: S, finalizer: G) -> Self {
        Ensure {
            source,
            finalizer,
            _effect: PhantomData,
        }
    }
}

/// Run the effect `finalizer` builds once `source` has finished driving a step.
///
/// `finalizer` is only called when the enumerator is driven.
pub fn ensure_eval<F, S, G>(source: S, finalizer: G) -> Ensure<F, S, G> {
    Ensure::new(source, finalizer)
}

/// A boxed finalizer, as built by [`ensure()`].
pub type Finalizer<F> = Box<dyn FnOnce() -> <F as Effect>::Of<()>>;

/// Sequence `finalizer` once `source` has finished driving a step.
pub fn ensure<F: Effect, S>(source: S, finalizer: F::Of<()>) -> Ensure<F, S, Finalizer<F>> {
    Ensure::new(source, Box::new(move || finalizer))
}

impl<F, E, S, G> Enumerator<F, E> for Ensure<F, S, G>
where
    F: Effect,
    E: 'static,
    S: Enumerator<F, E>,
    G: FnOnce() -> F::Of<()> + 'static,
{
    fn apply<A: 'static>(self, step: Step<F, E, A>) -> F::Of<Step<F, E, A>> {
        let Ensure {
            source, finalizer, ..
        } = self;
        let driven = F::attempt(F::suspend(move || source.apply(step)));
        F::bind(driven, move |outcome| {
            F::bind(F::attempt(F::suspend(finalizer)), move |finished| match (outcome, finished) {
                (Ok(step), Ok(())) => F::pure(step),
                (Ok(_), Err(error)) => {
                    tracing::warn!(%error, "finalizer failed after a successful drive");
                    F::raise(error)
                }
                (Err(error), Ok(())) => F::raise(error),
                (Err(primary), Err(finalizer)) => {
                    tracing::warn!(%primary, %finalizer, "finalizer failed after a failed drive");
                    F::raise(Error::Finalizer {
                        primary: Box::new(primary),
                        finalizer: Box::new(finalizer),
                    })
                }
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::{Async, Deferred, Strict};
    use crate::enumeratee;
    use crate::enumerator::{enum_iter, enum_one, enum_vec, fail};
    use crate::error::Result;
    use crate::iteratee;
    use crate::test_support::block_on;
    use std::cell::Cell;
    use std::rc::Rc;

    fn counter() -> (Rc<Cell<u32>>, impl FnOnce() -> Result<()> + 'static) {
        let count = Rc::new(Cell::new(0));
        let finalizer = {
            let count = Rc::clone(&count);
            move || -> Result<()> {
                count.set(count.get() + 1);
                Ok(())
            }
        };
        (count, finalizer)
    }

    #[test]
    fn test_chain_runs_both_in_order() {
        let step: Step<Strict, &str, Vec<&str>> = iteratee::consume();
        let source = chain(enum_vec(vec!["a", "b"]), enum_one("c"));
        assert_eq!(source.drive(step).unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_chain_skips_second_once_done() {
        let second_ran = Rc::new(Cell::new(false));
        let second = crate::enumerator::perform({
            let second_ran = Rc::clone(&second_ran);
            move || -> Result<()> {
                second_ran.set(true);
                Ok(())
            }
        });
        let step: Step<Strict, i32, Option<i32>> = iteratee::head();
        let source = chain(enum_vec(vec![1, 2]), second);
        assert_eq!(source.drive(step).unwrap(), Some(1));
        assert!(!second_ran.get());
    }

    #[test]
    fn test_prepend_and_append() {
        let step: Step<Strict, i32, Vec<i32>> = iteratee::consume();
        let source = enum_vec(vec![2, 3]).prepend(1).append(4);
        assert_eq!(source.drive(step).unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_map_and_filter() {
        let step: Step<Strict, String, Vec<String>> = iteratee::consume();
        let source = enum_iter(1..=6)
            .filter(|n: &i32| n % 2 == 0)
            .map(|n: i32| format!("#{}", n));
        assert_eq!(source.drive(step).unwrap(), vec!["#2", "#4", "#6"]);
    }

    #[test]
    fn test_through_flushes_the_transducer_but_not_the_step() {
        let size = std::num::NonZeroUsize::new(2).unwrap();
        let step: Step<Strict, Vec<i32>, Vec<Vec<i32>>> = iteratee::consume();
        let step = through(enum_vec(vec![1, 2, 3]), enumeratee::grouped(size))
            .apply(step)
            .unwrap();
        assert!(step.is_cont());
        assert_eq!(step.run().unwrap(), vec![vec![1, 2], vec![3]]);
    }

    #[test]
    fn test_to_vec() {
        let source = enum_vec(vec![1, 2]).append(3);
        let all = Enumerator::<Strict, i32>::to_vec(source).unwrap();
        assert_eq!(all, vec![1, 2, 3]);
    }

    #[test]
    fn test_ensure_runs_once_on_success() {
        let (count, finalizer) = counter();
        let step: Step<Strict, i32, Vec<i32>> = iteratee::consume();
        let out = enum_vec(vec![1, 2]).ensure_eval(finalizer).drive(step).unwrap();
        assert_eq!(out, vec![1, 2]);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_ensure_runs_once_on_failure() {
        let (count, finalizer) = counter();
        let step: Step<Strict, i32, Vec<i32>> = iteratee::consume();
        let source = chain(enum_one(1), fail(Error::msg("broken pipe")));
        let err = ensure_eval(source, finalizer).drive(step).unwrap_err();
        assert_eq!(err.to_string(), "broken pipe");
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_ensure_reports_both_failures() {
        let step: Step<Strict, i32, Vec<i32>> = iteratee::consume();
        let source = ensure::<Strict, _>(fail(Error::msg("read")), Err(Error::msg("close")));
        let err = source.drive(step).unwrap_err();
        match err {
            Error::Finalizer { primary, finalizer } => {
                assert_eq!(primary.to_string(), "read");
                assert_eq!(finalizer.to_string(), "close");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_failing_finalizer_fails_a_successful_drive() {
        let step: Step<Strict, i32, Vec<i32>> = iteratee::consume();
        let source = ensure::<Strict, _>(enum_vec(vec![1]), Err(Error::msg("close")));
        assert_eq!(source.drive(step).unwrap_err().to_string(), "close");
    }

    #[test]
    fn test_ensure_is_lazy_in_deferred() {
        let count = Rc::new(Cell::new(0));
        let source = enum_vec(vec![1, 2, 3]).ensure_eval({
            let count = Rc::clone(&count);
            move || {
                count.set(count.get() + 1);
                Deferred::pure(())
            }
        });
        let step: Step<Deferred, i32, u64> = iteratee::length();
        let thunk = source.drive(step);
        assert_eq!(count.get(), 0);
        assert_eq!(thunk.run().unwrap(), 3);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_ensure_in_async() {
        let count = Rc::new(Cell::new(0));
        let source = enum_iter(0..100_u32).ensure_eval({
            let count = Rc::clone(&count);
            move || {
                count.set(count.get() + 1);
                Async::pure(())
            }
        });
        let step: Step<Async, u32, Option<u32>> = iteratee::head();
        assert_eq!(block_on(source.drive(step)).unwrap(), Some(0));
        assert_eq!(count.get(), 1);
    }
}
