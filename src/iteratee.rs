//! Ready-made consumers.
//!
//! Every function here builds a [`Step`] using nothing but the step contract:
//! it waits for a [`Signal`], then either keeps waiting or finishes with a
//! value and whatever part of the last input it did not use.

use either::Either;

use crate::effect::Effect;
use crate::input::{Input, Signal};
use crate::step::Step;

/// Collect every element into a `Vec`.
pub fn consume<F: Effect, E: 'static>() -> Step<F, E, Vec<E>> {
    collect(Vec::new())
}

fn collect<F: Effect, E: 'static>(mut acc: Vec<E>) -> Step<F, E, Vec<E>> {
    Step::cont(move |signal: Signal<E>| match signal {
        Signal::Data(input) => {
            acc.extend(input);
            F::pure(collect(acc))
        }
        Signal::End => F::pure(Step::done(acc)),
    })
}

/// Combine every element into an accumulator.
pub fn fold<F, E, B, G>(init: B, f: G) -> Step<F, E, B>
where
    F: Effect,
    E: 'static,
    B: 'static,
    G: FnMut(B, E) -> B + 'static,
{
    fold_loop(init, f)
}

fn fold_loop<F, E, B, G>(acc: B, mut f: G) -> Step<F, E, B>
where
    F: Effect,
    E: 'static,
    B: 'static,
    G: FnMut(B, E) -> B + 'static,
{
    Step::cont(move |signal: Signal<E>| match signal {
        Signal::Data(input) => {
            let acc = input.into_iter().fold(acc, &mut f);
            F::pure(fold_loop(acc, f))
        }
        Signal::End => F::pure(Step::done(acc)),
    })
}

/// Combine every element into an accumulator with an effectful function.
///
/// ```rust
/// use stepwise::prelude::*;
///
/// let step: Step<Strict, u32, u32> = iteratee::fold_m(0, |acc: u32, n: u32| {
///     acc.checked_add(n).ok_or_else(|| Error::msg("overflow"))
/// });
/// assert_eq!(enum_vec(vec![1, 2, 3]).drive(step).unwrap(), 6);
/// ```
pub fn fold_m<F, E, B, G>(init: B, f: G) -> Step<F, E, B>
where
    F: Effect,
    E: 'static,
    B: 'static,
    G: FnMut(B, E) -> F::Of<B> + 'static,
{
    fold_m_loop(init, f)
}

fn fold_m_loop<F, E, B, G>(acc: B, f: G) -> Step<F, E, B>
where
    F: Effect,
    E: 'static,
    B: 'static,
    G: FnMut(B, E) -> F::Of<B> + 'static,
{
    Step::cont(move |signal: Signal<E>| match signal {
        Signal::Data(input) => {
            let folded = F::tail_rec(
                (f, input.into_iter(), acc),
                |(mut f, mut elements, acc): (G, std::vec::IntoIter<E>, B)| match elements.next() {
                    Some(element) => F::map(f(acc, element), move |acc| Either::Left((f, elements, acc))),
                    None => F::pure(Either::Right((f, acc))),
                },
            );
            F::map(folded, |(f, acc)| fold_m_loop::<F, E, B, G>(acc, f))
        }
        Signal::End => F::pure(Step::done(acc)),
    })
}

/// The first element, or `None` if the input ends first.
pub fn head<F: Effect, E: 'static>() -> Step<F, E, Option<E>> {
    Step::cont(|signal: Signal<E>| {
        F::pure(match signal {
            Signal::Data(Input::El(element)) => Step::done(Some(element)),
            Signal::Data(Input::Chunk(first, second, mut rest)) => {
                rest.insert(0, second);
                Step::done_with_leftovers(Some(first), rest)
            }
            Signal::End => Step::done(None),
        })
    })
}

/// A copy of the first element, leaving the whole input unconsumed.
pub fn peek<F: Effect, E: Clone + 'static>() -> Step<F, E, Option<E>> {
    Step::cont(|signal: Signal<E>| {
        F::pure(match signal {
            Signal::Data(input) => Step::done_with_leftovers(Some(input.first().clone()), input.into_vec()),
            Signal::End => Step::done(None),
        })
    })
}

/// The first element `predicate` accepts. Elements after it in the same input are left over.
pub fn find<F, E, P>(predicate: P) -> Step<F, E, Option<E>>
where
    F: Effect,
    E: 'static,
    P: FnMut(&E) -> bool + 'static,
{
    find_loop(predicate)
}

fn find_loop<F, E, P>(mut predicate: P) -> Step<F, E, Option<E>>
where
    F: Effect,
    E: 'static,
    P: FnMut(&E) -> bool + 'static,
{
    Step::cont(move |signal: Signal<E>| match signal {
        Signal::Data(input) => {
            let mut elements = input.into_iter();
            let found = elements.by_ref().find(|e| predicate(e));
            match found {
                Some(found) => F::pure(Step::done_with_leftovers(Some(found), elements.collect())),
                None => F::pure(find_loop(predicate)),
            }
        }
        Signal::End => F::pure(Step::done(None)),
    })
}

/// Up to `n` elements. Elements past the `n`th are left over.
pub fn take<F: Effect, E: 'static>(n: usize) -> Step<F, E, Vec<E>> {
    take_into(Vec::with_capacity(n.min(1024)), n)
}

fn take_into<F: Effect, E: 'static>(mut acc: Vec<E>, remaining: usize) -> Step<F, E, Vec<E>> {
    if remaining == 0 {
        return Step::done(acc);
    }
    Step::cont(move |signal: Signal<E>| match signal {
        Signal::Data(input) if input.len() <= remaining => {
            let remaining = remaining - input.len();
            acc.extend(input);
            F::pure(take_into(acc, remaining))
        }
        Signal::Data(input) => {
            let mut elements = input.into_vec();
            let rest = elements.split_off(remaining);
            acc.extend(elements);
            F::pure(Step::done_with_leftovers(acc, rest))
        }
        Signal::End => F::pure(Step::done(acc)),
    })
}

/// The longest prefix `predicate` accepts. The first rejected element is left over.
pub fn take_while<F, E, P>(predicate: P) -> Step<F, E, Vec<E>>
where
    F: Effect,
    E: 'static,
    P: FnMut(&E) -> bool + 'static,
{
    take_while_into(Vec::new(), predicate)
}

fn take_while_into<F, E, P>(mut acc: Vec<E>, mut predicate: P) -> Step<F, E, Vec<E>>
where
    F: Effect,
    E: 'static,
    P: FnMut(&E) -> bool + 'static,
{
    Step::cont(move |signal: Signal<E>| match signal {
        Signal::Data(input) => {
            let mut elements = input.into_vec();
            let stop = elements.iter().position(|e| !predicate(e));
            match stop {
                None => {
                    acc.extend(elements);
                    F::pure(take_while_into(acc, predicate))
                }
                Some(stop) => {
                    let rest = elements.split_off(stop);
                    acc.extend(elements);
                    F::pure(Step::done_with_leftovers(acc, rest))
                }
            }
        }
        Signal::End => F::pure(Step::done(acc)),
    })
}

/// Skip `n` elements. Elements past the `n`th are left over.
pub fn drop<F: Effect, E: 'static>(n: usize) -> Step<F, E, ()> {
    if n == 0 {
        return Step::done(());
    }
    Step::cont(move |signal: Signal<E>| match signal {
        Signal::Data(input) if input.len() <= n => F::pure(drop(n - input.len())),
        Signal::Data(input) => F::pure(Step::done_with_leftovers((), input.into_vec().split_off(n))),
        Signal::End => F::pure(Step::done(())),
    })
}

/// Skip elements while `predicate` accepts them. The first rejected element is left over.
pub fn drop_while<F, E, P>(mut predicate: P) -> Step<F, E, ()>
where
    F: Effect,
    E: 'static,
    P: FnMut(&E) -> bool + 'static,
{
    Step::cont(move |signal: Signal<E>| match signal {
        Signal::Data(input) => {
            let mut elements = input.into_vec();
            let start = elements.iter().position(|e| !predicate(e));
            match start {
                None => F::pure(drop_while(predicate)),
                Some(start) => F::pure(Step::done_with_leftovers((), elements.split_off(start))),
            }
        }
        Signal::End => F::pure(Step::done(())),
    })
}

/// Count the elements.
pub fn length<F: Effect, E: 'static>() -> Step<F, E, u64> {
    count(0)
}

fn count<F: Effect, E: 'static>(seen: u64) -> Step<F, E, u64> {
    Step::cont(move |signal: Signal<E>| match signal {
        Signal::Data(input) => F::pure(count(seen + input.len() as u64)),
        Signal::End => F::pure(Step::done(seen)),
    })
}

/// Add the elements up, starting from `E::default()`.
pub fn sum<F, E>() -> Step<F, E, E>
where
    F: Effect,
    E: std::ops::Add<Output = E> + Default + 'static,
{
    fold(E::default(), |acc, e| acc + e)
}

/// `true` if the input has ended. Consumes nothing.
pub fn is_end<F: Effect, E: 'static>() -> Step<F, E, bool> {
    Step::cont(|signal: Signal<E>| {
        F::pure(match signal {
            Signal::Data(input) => Step::done_with_leftovers(false, input.into_vec()),
            Signal::End => Step::done(true),
        })
    })
}

/// Call `f` on every element.
pub fn for_each<F, E, G>(mut f: G) -> Step<F, E, ()>
where
    F: Effect,
    E: 'static,
    G: FnMut(E) + 'static,
{
    fold((), move |(), e| f(e))
}

/// Finished immediately with `()`, consuming nothing.
pub fn identity<F: Effect, E: 'static>() -> Step<F, E, ()> {
    Step::done(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::{Async, Deferred, Strict};
    use crate::enumeratee;
    use crate::enumerator::{enum_iter, enum_one, enum_vec, Enumerator};
    use crate::error::Error;
    use crate::test_support::block_on;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_abc_consume_gets_everything() {
        let step: Step<Strict, &str, Vec<&str>> = consume();
        let step = enum_vec(vec!["a", "b", "c"]).apply(step).and_then(Step::end).unwrap();
        assert_eq!(step.into_done(), Some((vec!["a", "b", "c"], vec![])));
    }

    #[test]
    fn test_abc_head_and_take_one_leave_the_rest() {
        let step: Step<Strict, &str, Option<&str>> = head();
        let step = enum_vec(vec!["a", "b", "c"]).apply(step).unwrap();
        assert_eq!(step.into_done(), Some((Some("a"), vec!["b", "c"])));

        let step: Step<Strict, &str, Vec<&str>> = take(1);
        let step = enum_vec(vec!["a", "b", "c"]).apply(step).unwrap();
        assert_eq!(step.into_done(), Some((vec!["a"], vec!["b", "c"])));
    }

    #[test]
    fn test_done_step_absorbs_more_input() {
        let step: Step<Strict, &str, Option<&str>> = head();
        let once = enum_vec(vec!["a", "b"]).apply(step).unwrap();
        let twice = enum_vec(vec!["x", "y", "z"]).apply(once).unwrap();
        assert_eq!(twice.into_done(), Some((Some("a"), vec!["b"])));
    }

    #[test]
    fn test_head_on_empty_input() {
        let step: Step<Strict, i32, Option<i32>> = head();
        assert_eq!(step.run().unwrap(), None);
    }

    #[test]
    fn test_peek_consumes_nothing() {
        let step: Step<Strict, i32, Option<i32>> = peek();
        let step = step.feed_chunk(4, 5, vec![]).unwrap();
        assert_eq!(step.into_done(), Some((Some(4), vec![4, 5])));
    }

    #[test]
    fn test_find() {
        let step: Step<Strict, i32, Option<i32>> = find(|n: &i32| *n > 2);
        let step = enum_vec(vec![1, 2]).append(3).chain(enum_vec(vec![4, 5])).apply(step).unwrap();
        assert_eq!(step.into_done(), Some((Some(3), vec![])));

        let step: Step<Strict, i32, Option<i32>> = find(|n: &i32| *n > 2);
        let step = enum_vec(vec![1, 3, 5, 7]).apply(step).unwrap();
        assert_eq!(step.into_done(), Some((Some(3), vec![5, 7])));
    }

    #[test]
    fn test_take_more_than_available() {
        let step: Step<Strict, i32, Vec<i32>> = take(10);
        assert_eq!(enum_vec(vec![1, 2, 3]).drive(step).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_take_while_and_drop_while() {
        let step: Step<Strict, i32, Vec<i32>> = take_while(|n: &i32| *n < 3);
        let step = enum_vec(vec![1, 2, 3, 4]).apply(step).unwrap();
        assert_eq!(step.into_done(), Some((vec![1, 2], vec![3, 4])));

        let step: Step<Strict, i32, ()> = drop_while(|n: &i32| *n < 3);
        let step = enum_vec(vec![1, 2, 3, 4]).apply(step).unwrap();
        assert_eq!(step.into_done(), Some(((), vec![3, 4])));
    }

    #[test]
    fn test_drop_then_consume() {
        let step: Step<Strict, i32, ()> = drop(2);
        let step = step.bind(|()| Ok(consume())).unwrap();
        assert_eq!(enum_iter(1..=5).drive(step).unwrap(), vec![3, 4, 5]);
    }

    #[test]
    fn test_is_end() {
        let step: Step<Strict, i32, bool> = is_end();
        let step = step.feed_el(1).unwrap();
        assert_eq!(step.into_done(), Some((false, vec![1])));

        let step: Step<Strict, i32, bool> = is_end();
        assert!(step.run().unwrap());
    }

    #[test]
    fn test_sum_and_for_each() {
        let step: Step<Strict, i64, i64> = sum();
        assert_eq!(enum_iter(1..=100).drive(step).unwrap(), 5050);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let step: Step<Strict, char, ()> = for_each({
            let seen = Rc::clone(&seen);
            move |c| seen.borrow_mut().push(c)
        });
        enum_vec(vec!['x', 'y']).drive(step).unwrap();
        assert_eq!(*seen.borrow(), vec!['x', 'y']);
    }

    #[test]
    fn test_identity_consumes_nothing() {
        let step: Step<Strict, i32, ()> = identity();
        let step = enum_one(1).apply(step).unwrap();
        assert_eq!(step.into_done(), Some(((), vec![])));
    }

    #[test]
    fn test_fold_m_propagates_failure() {
        let step: Step<Strict, u8, u8> = fold_m(0, |acc: u8, n: u8| acc.checked_add(n).ok_or_else(|| Error::msg("overflow")));
        let err = enum_vec(vec![200, 100]).drive(step).unwrap_err();
        assert_eq!(err.to_string(), "overflow");
    }

    #[test]
    fn test_fold_m_is_stack_safe_over_one_big_chunk() {
        let step: Step<Deferred, u32, u64> = fold_m(0, |acc: u64, n: u32| Deferred::pure(acc + u64::from(n)));
        let total = enum_vec((0..1_000_000).collect()).drive(step).run().unwrap();
        assert_eq!(total, 499_999_500_000);
    }

    #[test]
    fn test_length_over_a_million_elements_in_every_effect() {
        let step: Step<Strict, u32, u64> = length();
        assert_eq!(enum_iter(0..1_000_000_u32).drive(step).unwrap(), 1_000_000);

        let step: Step<Deferred, u32, u64> = length();
        assert_eq!(enum_iter(0..1_000_000_u32).drive(step).run().unwrap(), 1_000_000);

        let step: Step<Async, u32, u64> = length();
        assert_eq!(block_on(enum_iter(0..1_000_000_u32).drive(step)).unwrap(), 1_000_000);
    }

    #[test]
    fn test_leftovers_are_conserved_through_identity() {
        let fed: Vec<u32> = (0..10).collect();
        let step: Step<Strict, u32, Vec<u32>> = take(4);
        let step = step.through(enumeratee::identity()).unwrap();
        let (taken, leftovers) = enum_vec(fed.clone()).apply(step).unwrap().into_done().unwrap();
        assert_eq!(taken.len() + leftovers.len(), fed.len());
        assert_eq!([taken, leftovers].concat(), fed);
    }
}
