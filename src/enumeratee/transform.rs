//! Element-wise transducers.

use std::num::NonZeroUsize;

use either::Either;

use super::{transduce, transduce_signal, Enumeratee};
use crate::effect::Effect;
use crate::enumerator::Enumerator;
use crate::input::Signal;
use crate::step::Step;

/// Converts every element with a function.
#[derive(Debug, Clone)]
pub struct Map<G>(G);

/// Apply `f` to every element, keeping chunk boundaries.
pub fn map<G>(f: G) -> Map<G> {
    Map(f)
}

impl<F, O, I, G> Enumeratee<F, O, I> for Map<G>
where
    F: Effect,
    O: 'static,
    I: 'static,
    G: FnMut(O) -> I + 'static,
{
    fn apply<A: 'static>(self, step: Step<F, I, A>) -> F::Of<Step<F, O, Step<F, I, A>>> {
        let mut f = self.0;
        F::pure(transduce(step, move |input, step: Step<F, I, A>| {
            step.feed_input(input.map(&mut f))
        }))
    }
}

/// Keeps the elements a predicate accepts.
#[derive(Debug, Clone)]
pub struct Filter<P>(P);

/// Forward only the elements `predicate` accepts. Rejected elements are gone
/// for good, so the inner step's leftovers are not handed back.
pub fn filter<P>(predicate: P) -> Filter<P> {
    Filter(predicate)
}

impl<F, E, P> Enumeratee<F, E, E> for Filter<P>
where
    F: Effect,
    E: 'static,
    P: FnMut(&E) -> bool + 'static,
{
    fn apply<A: 'static>(self, step: Step<F, E, A>) -> F::Of<Step<F, E, Step<F, E, A>>> {
        let mut predicate = self.0;
        F::pure(transduce(step, move |input, step: Step<F, E, A>| {
            let kept: Vec<E> = input.into_iter().filter(|e| predicate(e)).collect();
            step.feed_all(kept)
        }))
    }
}

/// Converts elements with a partial function, dropping those it rejects.
#[derive(Debug, Clone)]
pub struct FilterMap<G>(G);

pub fn filter_map<G>(f: G) -> FilterMap<G> {
    FilterMap(f)
}

impl<F, O, I, G> Enumeratee<F, O, I> for FilterMap<G>
where
    F: Effect,
    O: 'static,
    I: 'static,
    G: FnMut(O) -> Option<I> + 'static,
{
    fn apply<A: 'static>(self, step: Step<F, I, A>) -> F::Of<Step<F, O, Step<F, I, A>>> {
        let mut f = self.0;
        F::pure(transduce(step, move |input, step: Step<F, I, A>| {
            let kept: Vec<I> = input.into_iter().filter_map(&mut f).collect();
            step.feed_all(kept)
        }))
    }
}

/// Replaces every element with everything an enumerator built from it produces.
#[derive(Debug, Clone)]
pub struct FlatMap<G>(G);

/// Drive the inner step with the enumerator `f` builds from each element.
pub fn flat_map<G>(f: G) -> FlatMap<G> {
    FlatMap(f)
}

impl<F, O, I, G, N> Enumeratee<F, O, I> for FlatMap<G>
where
    F: Effect,
    O: 'static,
    I: 'static,
    G: FnMut(O) -> N + 'static,
    N: Enumerator<F, I>,
{
    fn apply<A: 'static>(self, step: Step<F, I, A>) -> F::Of<Step<F, O, Step<F, I, A>>> {
        F::pure(flat_map_loop(self.0, step))
    }
}

fn flat_map_loop<F, O, I, A, G, N>(f: G, step: Step<F, I, A>) -> Step<F, O, Step<F, I, A>>
where
    F: Effect,
    O: 'static,
    I: 'static,
    A: 'static,
    G: FnMut(O) -> N + 'static,
    N: Enumerator<F, I>,
{
    if step.is_done() {
        return Step::done(step);
    }
    Step::cont(move |signal: Signal<O>| match signal {
        Signal::Data(input) => {
            let expanded = F::tail_rec(
                (f, input.into_iter(), step),
                |(mut f, mut elements, step): (G, std::vec::IntoIter<O>, Step<F, I, A>)| match elements.next() {
                    Some(element) if step.is_cont() => {
                        F::map(f(element).apply(step), move |next| Either::Left((f, elements, next)))
                    }
                    _ => F::pure(Either::Right((f, step))),
                },
            );
            F::map(expanded, |(f, next)| flat_map_loop::<F, O, I, A, G, N>(f, next))
        }
        Signal::End => F::pure(Step::done(step)),
    })
}

/// Collects elements into groups of a fixed size.
#[derive(Debug, Clone, Copy)]
pub struct Grouped(NonZeroUsize);

/// Emit every `size` elements as one `Vec`. A shorter final group is emitted
/// at end of input.
///
/// ```rust
/// use std::num::NonZeroUsize;
/// use stepwise::prelude::*;
///
/// let size = NonZeroUsize::new(2).unwrap();
/// let step: Step<Strict, Vec<i32>, Vec<Vec<i32>>> = iteratee::consume();
/// let groups = enum_vec(vec![1, 2, 3, 4, 5]).through(enumeratee::grouped(size)).drive(step);
/// assert_eq!(groups.unwrap(), vec![vec![1, 2], vec![3, 4], vec![5]]);
/// ```
pub fn grouped(size: NonZeroUsize) -> Grouped {
    Grouped(size)
}

impl<F: Effect, E: 'static> Enumeratee<F, E, Vec<E>> for Grouped {
    fn apply<A: 'static>(self, step: Step<F, Vec<E>, A>) -> F::Of<Step<F, E, Step<F, Vec<E>, A>>> {
        let size = self.0.get();
        let mut pending: Vec<E> = Vec::with_capacity(size);
        F::pure(transduce_signal(step, move |signal, step: Step<F, Vec<E>, A>| match signal {
            Signal::Data(input) => {
                let mut groups = Vec::new();
                for element in input {
                    pending.push(element);
                    if pending.len() == size {
                        groups.push(std::mem::replace(&mut pending, Vec::with_capacity(size)));
                    }
                }
                step.feed_all(groups)
            }
            Signal::End if pending.is_empty() => F::pure(step),
            Signal::End => step.feed_el(std::mem::take(&mut pending)),
        }))
    }
}

/// Emits a running accumulation.
#[derive(Debug, Clone)]
pub struct Scan<B, G> {
    init: B,
    f: G,
}

/// Emit `f(init, e1)`, then `f(f(init, e1), e2)`, and so on. `init` itself is not emitted.
pub fn scan<B, G>(init: B, f: G) -> Scan<B, G> {
    Scan { init, f }
}

impl<F, O, B, G> Enumeratee<F, O, B> for Scan<B, G>
where
    F: Effect,
    O: 'static,
    B: Clone + 'static,
    G: FnMut(B, O) -> B + 'static,
{
    fn apply<A: 'static>(self, step: Step<F, B, A>) -> F::Of<Step<F, O, Step<F, B, A>>> {
        F::pure(scan_loop(self.init, self.f, step))
    }
}

fn scan_loop<F, O, B, A, G>(acc: B, mut f: G, step: Step<F, B, A>) -> Step<F, O, Step<F, B, A>>
where
    F: Effect,
    O: 'static,
    B: Clone + 'static,
    A: 'static,
    G: FnMut(B, O) -> B + 'static,
{
    if step.is_done() {
        return Step::done(step);
    }
    Step::cont(move |signal: Signal<O>| match signal {
        Signal::Data(input) => {
            let mut acc = acc;
            let mut emitted = Vec::with_capacity(input.len());
            for element in input {
                acc = f(acc, element);
                emitted.push(acc.clone());
            }
            F::map(step.feed_all(emitted), move |next| scan_loop(acc, f, next))
        }
        Signal::End => F::pure(Step::done(step)),
    })
}

/// Pairs every element with its position, starting at zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipWithIndex;

pub fn zip_with_index() -> ZipWithIndex {
    ZipWithIndex
}

impl<F: Effect, E: 'static> Enumeratee<F, E, (E, u64)> for ZipWithIndex {
    fn apply<A: 'static>(self, step: Step<F, (E, u64), A>) -> F::Of<Step<F, E, Step<F, (E, u64), A>>> {
        let mut index = 0_u64;
        F::pure(transduce(step, move |input, step: Step<F, (E, u64), A>| {
            step.feed_input(input.map(|element| {
                let at = index;
                index += 1;
                (element, at)
            }))
        }))
    }
}

/// Inserts a separator between consecutive elements.
#[derive(Debug, Clone)]
pub struct Intersperse<E>(E);

/// Put `separator` between every two forwarded elements, across inputs.
pub fn intersperse<E: Clone>(separator: E) -> Intersperse<E> {
    Intersperse(separator)
}

impl<F: Effect, E: Clone + 'static> Enumeratee<F, E, E> for Intersperse<E> {
    fn apply<A: 'static>(self, step: Step<F, E, A>) -> F::Of<Step<F, E, Step<F, E, A>>> {
        let separator = self.0;
        let mut started = false;
        F::pure(transduce(step, move |input, step: Step<F, E, A>| {
            let mut out = Vec::with_capacity(input.len() * 2);
            for element in input {
                if started {
                    out.push(separator.clone());
                }
                out.push(element);
                started = true;
            }
            step.feed_all(out)
        }))
    }
}
