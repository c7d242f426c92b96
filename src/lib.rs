//! # Stepwise: effect-polymorphic iteratees
//!
//! Incremental stream processing split into three composable pieces:
//!
//! - **[`Step`]**: a consumer state machine, either waiting for input or done
//!   with a result and its unconsumed leftovers
//! - **[`Enumerator`](enumerator::Enumerator)**: a producer that feeds a step
//! - **[`Enumeratee`](enumeratee::Enumeratee)**: a transducer between two steps
//!
//! None of them commits to a computation type. Every suspension point is a
//! value of the caller's [`Effect`]: [`Strict`] runs immediately, [`Deferred`]
//! builds a thunk, and [`Async`] builds a task to await. Loops go through
//! [`Effect::tail_rec`], so inputs of any length run in constant stack.
//!
//! ## Example
//!
//! ```
//! use stepwise::prelude::*;
//!
//! // Sum the squares of the even numbers among the first hundred.
//! let step: Step<Strict, u64, u64> = iteratee::sum();
//! let pipeline = enumeratee::filter(|n: &u64| n % 2 == 0).map(|n: u64| n * n);
//! let step = step.through(pipeline).unwrap();
//!
//! let total = enum_iter(1..=100).drive(step).unwrap();
//! assert_eq!(total, 171_700);
//! ```
//!
//! ## Common Functions
//!
//! **Producers:** [`enum_vec`](enumerator::enum_vec), [`enum_iter`](enumerator::enum_iter),
//! [`chain`](enumerator::chain), [`ensure_eval`](enumerator::Enumerator::ensure_eval),
//! and the file readers in [`enumerator::io`].
//!
//! **Consumers:** [`iteratee::consume`], [`iteratee::fold`], [`iteratee::head`],
//! [`iteratee::take`], [`Step::zip`] to run two at once.
//!
//! **Execution:** [`handle`] drives a step with a producer, [`run`] ends and
//! extracts it.

pub mod effect;
pub mod enumeratee;
pub mod enumerator;
mod error;
mod handler;
mod input;
pub mod iteratee;
pub mod prelude;
mod step;

#[cfg(test)]
mod test_support;

pub use effect::{Async, Deferred, Effect, Strict, Task, Thunk};
pub use error::{Error, Result};
pub use handler::{handle, run};
pub use input::{Input, Signal};
pub use step::{Continuation, Step};
