//! Functions for driving steps to completion.
//!
//! [`run`] is the end-of-input protocol every consumer goes through: a waiting
//! step is sent [`Signal::End`] and must be finished afterwards. [`handle`]
//! pairs it with a producer.

use crate::effect::Effect;
use crate::enumerator::Enumerator;
use crate::error::Error;
use crate::input::Signal;
use crate::step::Step;

/// Signal end of input to `step` if it is still waiting, then extract its result.
///
/// A step that is still waiting after end of input fails with [`Error::Diverging`].
pub fn run<F, E, A>(step: Step<F, E, A>) -> F::Of<A>
where
    F: Effect,
    E: 'static,
    A: 'static,
{
    match step {
        Step::Done(value, _) => F::pure(value),
        Step::Cont(k) => F::bind(k(Signal::End), settle::<F, E, A>),
    }
}

fn settle<F, E, A>(step: Step<F, E, A>) -> F::Of<A>
where
    F: Effect,
    E: 'static,
    A: 'static,
{
    match step {
        Step::Done(value, _) => F::pure(value),
        Step::Cont(_) => {
            tracing::warn!("step still waiting after end of input");
            F::raise(Error::Diverging)
        }
    }
}

/// Drive `step` with every element `enumerator` produces, then run it.
///
/// ```rust
/// use stepwise::prelude::*;
///
/// let step: Step<Strict, i32, i32> = iteratee::fold(0, |acc: i32, n: i32| acc + n);
/// assert_eq!(handle(enum_vec(vec![1, 2, 3]), step).unwrap(), 6);
/// ```
pub fn handle<F, E, A, N>(enumerator: N, step: Step<F, E, A>) -> F::Of<A>
where
    F: Effect,
    E: 'static,
    A: 'static,
    N: Enumerator<F, E>,
{
    F::bind(enumerator.apply(step), run::<F, E, A>)
}
