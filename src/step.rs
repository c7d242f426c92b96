//! The consumer state machine.
//!
//! A [`Step`] is either waiting for more input ([`Step::Cont`]) or finished
//! ([`Step::Done`]) with a result and whatever elements it was handed but did
//! not consume. Every consumer in the crate is a chain of transitions over
//! `Step`, and every transition returns its next state inside the effect `F`.
//!
//! ```rust
//! use stepwise::prelude::*;
//!
//! let step: Step<Strict, &str, Option<&str>> = iteratee::head();
//! let step = step.feed_chunk("a", "b", vec!["c"]).unwrap();
//!
//! assert!(step.is_done());
//! assert_eq!(step.leftovers(), &["b", "c"]);
//! assert_eq!(step.run().unwrap(), Some("a"));
//! ```

use std::fmt;

use crate::effect::Effect;
use crate::enumeratee::Enumeratee;
use crate::input::{Input, Signal};

/// The continuation held by a waiting step.
pub type Continuation<F, E, A> = Box<dyn FnOnce(Signal<E>) -> <F as Effect>::Of<Step<F, E, A>>>;

/// An incremental consumer of `E`s producing an `A` inside the effect `F`.
pub enum Step<F: Effect, E: 'static, A: 'static> {
    /// Waiting for the next [`Signal`].
    Cont(Continuation<F, E, A>),
    /// Finished with a value and the elements fed but not consumed.
    Done(A, Vec<E>),
}

impl<F: Effect, E: 'static, A: 'static> Step<F, E, A> {
    /// A waiting step that hands the next signal to `k`.
    pub fn cont<K>(k: K) -> Self
    where
        K: FnOnce(Signal<E>) -> F::Of<Self> + 'static,
    {
        Step::Cont(Box::new(k))
    }

    /// A finished step with nothing left over.
    #[inline]
    pub fn done(value: A) -> Self {
        Step::Done(value, Vec::new())
    }

    /// A finished step that was handed `leftovers` without consuming them.
    #[inline]
    pub fn done_with_leftovers(value: A, leftovers: Vec<E>) -> Self {
        Step::Done(value, leftovers)
    }

    /// Returns `true` if the step is `Done`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stepwise::{Step, Strict};
    ///
    /// let x: Step<Strict, i32, &str> = Step::done("finished");
    /// assert!(x.is_done());
    ///
    /// let y: Step<Strict, i32, &str> = Step::cont(|_| Ok(Step::done("later")));
    /// assert!(!y.is_done());
    /// ```
    #[inline]
    pub const fn is_done(&self) -> bool {
        matches!(self, Step::Done(..))
    }

    /// Returns `true` if the step is still waiting for input.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stepwise::{Step, Strict};
    ///
    /// let x: Step<Strict, i32, u8> = Step::cont(|_| Ok(Step::done(1)));
    /// assert!(x.is_cont());
    ///
    /// let y: Step<Strict, i32, u8> = Step::done(1);
    /// assert!(!y.is_cont());
    /// ```
    #[inline]
    pub const fn is_cont(&self) -> bool {
        matches!(self, Step::Cont(_))
    }

    /// A reference to the result of a finished step, `None` while waiting.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stepwise::{Step, Strict};
    ///
    /// let x: Step<Strict, char, u32> = Step::done_with_leftovers(3, vec!['z']);
    /// assert_eq!(x.done_value(), Some(&3));
    ///
    /// let y: Step<Strict, char, u32> = Step::cont(|_| Ok(Step::done(0)));
    /// assert_eq!(y.done_value(), None);
    /// ```
    pub fn done_value(&self) -> Option<&A> {
        match self {
            Step::Done(value, _) => Some(value),
            Step::Cont(_) => None,
        }
    }

    /// Unconsumed elements; always empty while waiting.
    pub fn leftovers(&self) -> &[E] {
        match self {
            Step::Done(_, leftovers) => leftovers,
            Step::Cont(_) => &[],
        }
    }

    /// Split a finished step into its value and leftovers.
    pub fn into_done(self) -> Option<(A, Vec<E>)> {
        match self {
            Step::Done(value, leftovers) => Some((value, leftovers)),
            Step::Cont(_) => None,
        }
    }

    /// Deliver a signal. A finished step returns itself unchanged.
    pub fn feed(self, signal: Signal<E>) -> F::Of<Self> {
        match self {
            Step::Cont(k) => k(signal),
            done => F::pure(done),
        }
    }

    #[inline]
    pub fn feed_input(self, input: Input<E>) -> F::Of<Self> {
        self.feed(Signal::Data(input))
    }

    /// Deliver a single element.
    #[inline]
    pub fn feed_el(self, element: E) -> F::Of<Self> {
        self.feed_input(Input::El(element))
    }

    /// Deliver a run of at least two elements as one chunk.
    #[inline]
    pub fn feed_chunk(self, first: E, second: E, rest: Vec<E>) -> F::Of<Self> {
        self.feed_input(Input::Chunk(first, second, rest))
    }

    /// Deliver `elements` as one unit: nothing for an empty vector, an element
    /// for one, a chunk otherwise.
    pub fn feed_all(self, elements: Vec<E>) -> F::Of<Self> {
        match Input::from_vec(elements) {
            Some(input) => self.feed_input(input),
            None => F::pure(self),
        }
    }

    /// Signal end of input without extracting the result.
    #[inline]
    pub fn end(self) -> F::Of<Self> {
        self.feed(Signal::End)
    }

    /// Signal end of input and extract the result.
    ///
    /// Fails with [`Error::Diverging`](crate::Error::Diverging) when the step is
    /// still waiting after end of input.
    pub fn run(self) -> F::Of<A> {
        crate::handler::run(self)
    }

    /// Transform the eventual result. Leftovers are kept.
    pub fn map<B, G>(self, f: G) -> Step<F, E, B>
    where
        B: 'static,
        G: FnOnce(A) -> B + 'static,
    {
        match self {
            Step::Done(value, leftovers) => Step::Done(f(value), leftovers),
            Step::Cont(k) => Step::cont(move |signal| F::map(k(signal), move |next| next.map(f))),
        }
    }

    /// Accept `E2`s by converting each one with `f` before it reaches this step.
    ///
    /// When the step finishes its leftovers are discarded: they are `E`s and
    /// `f` gives no way back to `E2`.
    pub fn contramap<E2, G>(self, f: G) -> Step<F, E2, A>
    where
        E2: 'static,
        G: FnMut(E2) -> E + 'static,
    {
        match self {
            Step::Done(value, _) => Step::done(value),
            Step::Cont(k) => Step::cont(move |signal: Signal<E2>| {
                let mut f = f;
                let signal = signal.map(&mut f);
                F::map(k(signal), move |next| next.contramap(f))
            }),
        }
    }

    /// Continue with the step `f` builds from this step's result.
    ///
    /// If this step finished with leftovers they are handed to the new step
    /// first: a waiting step receives them as its next input, a finished step
    /// keeps its own leftovers followed by ours. After end of input the new
    /// step is ended as well.
    pub fn bind<B, G>(self, f: G) -> F::Of<Step<F, E, B>>
    where
        B: 'static,
        G: FnOnce(A) -> F::Of<Step<F, E, B>> + 'static,
    {
        match self {
            Step::Done(value, leftovers) if leftovers.is_empty() => f(value),
            Step::Done(value, leftovers) => F::bind(f(value), move |next| match next {
                Step::Done(other, mut newer) => {
                    newer.extend(leftovers);
                    F::pure(Step::Done(other, newer))
                }
                waiting => waiting.feed_all(leftovers),
            }),
            Step::Cont(k) => F::pure(Step::cont(move |signal: Signal<E>| {
                let ended = signal.is_end();
                F::bind(k(signal), move |next| {
                    let bound = next.bind(f);
                    if ended {
                        F::bind(bound, Step::end)
                    } else {
                        bound
                    }
                })
            })),
        }
    }

    /// Consume the same input with `self` and `other`, finishing with both results.
    ///
    /// A side that is already finished hands its leftovers to the other side
    /// before anything new arrives, and the running side's leftovers are kept.
    /// Once both sides share input, a side that finishes first is never replayed
    /// into the other: the other side has already seen the same elements.
    /// When both finish, the shorter leftover sequence is kept (it belongs to
    /// the side that consumed more); on a tie the left side's leftovers win.
    ///
    /// ```rust
    /// use stepwise::prelude::*;
    ///
    /// let left: Step<Strict, i32, Option<i32>> = iteratee::head();
    /// let right: Step<Strict, i32, Vec<i32>> = iteratee::take(2);
    ///
    /// let both = left.zip(right).unwrap().feed_chunk(1, 2, vec![3]).unwrap();
    /// assert_eq!(both.leftovers(), &[3]);
    /// assert_eq!(both.run().unwrap(), (Some(1), vec![1, 2]));
    /// ```
    pub fn zip<B: 'static>(self, other: Step<F, E, B>) -> F::Of<Step<F, E, (A, B)>>
    where
        E: Clone,
    {
        match (self, other) {
            (Step::Cont(k1), Step::Cont(k2)) => F::pure(zip_running(k1, k2)),
            (Step::Done(a, leftovers), waiting @ Step::Cont(_)) => {
                F::map(waiting.feed_all(leftovers), move |right| right.map(move |b| (a, b)))
            }
            (waiting @ Step::Cont(_), Step::Done(b, leftovers)) => {
                F::map(waiting.feed_all(leftovers), move |left| left.map(move |a| (a, b)))
            }
            (left, right) => F::pure(rejoin(left, right)),
        }
    }

    /// Run this consumer behind a transducer, accepting the transducer's outer elements.
    pub fn through<O, T>(self, enumeratee: T) -> F::Of<Step<F, O, A>>
    where
        O: 'static,
        T: Enumeratee<F, O, E>,
    {
        F::bind(enumeratee.apply(self), Step::join)
    }
}

/// Both sides of a zip are waiting: every signal goes to both, left first.
fn zip_running<F, E, A, B>(k1: Continuation<F, E, A>, k2: Continuation<F, E, B>) -> Step<F, E, (A, B)>
where
    F: Effect,
    E: Clone + 'static,
    A: 'static,
    B: 'static,
{
    Step::cont(move |signal: Signal<E>| {
        let copy = signal.clone();
        F::bind(k1(copy), move |left| F::map(k2(signal), move |right| rejoin(left, right)))
    })
}

/// Recombine the two sides of a zip after they received the same signal.
fn rejoin<F, E, A, B>(left: Step<F, E, A>, right: Step<F, E, B>) -> Step<F, E, (A, B)>
where
    F: Effect,
    E: Clone + 'static,
    A: 'static,
    B: 'static,
{
    match (left, right) {
        (Step::Done(a, left), Step::Done(b, right)) => {
            let leftovers = if left.len() <= right.len() { left } else { right };
            Step::Done((a, b), leftovers)
        }
        (Step::Done(a, _), waiting) => waiting.map(move |b| (a, b)),
        (waiting, Step::Done(b, _)) => waiting.map(move |a| (a, b)),
        (Step::Cont(k1), Step::Cont(k2)) => zip_running(k1, k2),
    }
}

impl<F: Effect, O: 'static, I: 'static, A: 'static> Step<F, O, Step<F, I, A>> {
    /// Collapse a step whose result is another step, running the inner one.
    ///
    /// Outer leftovers are kept; inner leftovers are of the inner element type
    /// and are dropped.
    pub fn join(self) -> F::Of<Step<F, O, A>> {
        self.bind(|inner| match inner {
            Step::Done(value, _) => F::pure(Step::<F, O, A>::done(value)),
            waiting => F::map(waiting.run(), Step::<F, O, A>::done),
        })
    }
}

impl<F: Effect, E: fmt::Debug + 'static, A: fmt::Debug + 'static> fmt::Debug for Step<F, E, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Cont(_) => f.write_str("Cont(..)"),
            Step::Done(value, leftovers) => f.debug_tuple("Done").field(value).field(leftovers).finish(),
        }
    }
}
