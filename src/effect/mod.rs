//! The effect capability that steps, enumerators and enumeratees sequence through.
//!
//! Nothing in this crate commits to a particular computation type. Every
//! suspension point produces a value of [`Effect::Of`], and the only operations
//! the core needs are the ones on [`Effect`]:
//!
//! - [`pure`](Effect::pure) and [`raise`](Effect::raise) to lift a value or a failure
//! - [`bind`](Effect::bind) to sequence
//! - [`tail_rec`](Effect::tail_rec) to loop without growing the stack
//! - [`handle_error_with`](Effect::handle_error_with) to recover
//! - [`delay`](Effect::delay) to suspend a fallible side effect
//!
//! Three bindings ship with the crate: [`Strict`] (plain `Result`), [`Deferred`]
//! (a thunk evaluated on [`Thunk::run`]) and [`Async`] (a [`Task`] awaited on any
//! executor). Both suspended effects evaluate binds on an explicit stack.
//!
//! ```rust
//! use stepwise::effect::{Effect, Strict};
//! use either::Either;
//!
//! // Sum 1..=10 with the stack-safe loop primitive.
//! let total = Strict::tail_rec((1, 0), |(n, acc)| {
//!     if n > 10 { Ok(Either::Right(acc)) } else { Ok(Either::Left((n + 1, acc + n))) }
//! });
//! assert_eq!(total.unwrap(), 55);
//! ```

mod deferred;
mod future;
mod strict;
mod trampoline;

pub use deferred::{Deferred, Thunk};
pub use future::{Async, LocalBoxFuture, Task};
pub use strict::Strict;

use either::Either;

use crate::error::{Error, Result};

/// Sequencing capability for a computation type `Of<A>`.
///
/// Implementations are zero-sized markers; all operations are associated functions.
pub trait Effect: Sized + 'static {
    /// The computation producing an `A` (or failing with [`Error`]).
    type Of<A: 'static>: 'static;

    /// Lift a value.
    fn pure<A: 'static>(value: A) -> Self::Of<A>;

    /// Lift a failure.
    fn raise<A: 'static>(error: Error) -> Self::Of<A>;

    /// Run `fa`, then feed its value to `f`.
    fn bind<A, B, G>(fa: Self::Of<A>, f: G) -> Self::Of<B>
    where
        A: 'static,
        B: 'static,
        G: FnOnce(A) -> Self::Of<B> + 'static;

    /// Repeat `f` from `init` until it returns `Either::Right`.
    ///
    /// Implementations must not grow the call stack with the number of iterations.
    fn tail_rec<S, A, G>(init: S, f: G) -> Self::Of<A>
    where
        S: 'static,
        A: 'static,
        G: FnMut(S) -> Self::Of<Either<S, A>> + 'static;

    /// Replace a failure of `fa` with the computation `f` builds from it.
    fn handle_error_with<A, G>(fa: Self::Of<A>, f: G) -> Self::Of<A>
    where
        A: 'static,
        G: FnOnce(Error) -> Self::Of<A> + 'static;

    /// Suspend a fallible side effect. Deferred effects do not call `thunk` until run.
    fn delay<A, G>(thunk: G) -> Self::Of<A>
    where
        A: 'static,
        G: FnOnce() -> Result<A> + 'static;

    fn map<A, B, G>(fa: Self::Of<A>, f: G) -> Self::Of<B>
    where
        A: 'static,
        B: 'static,
        G: FnOnce(A) -> B + 'static,
    {
        Self::bind(fa, move |a| Self::pure(f(a)))
    }

    /// Expose the failure of `fa` as a value.
    fn attempt<A: 'static>(fa: Self::Of<A>) -> Self::Of<Result<A>> {
        Self::handle_error_with(Self::map(fa, Ok), |error| Self::pure(Err(error)))
    }

    /// Build the computation only when it is sequenced.
    fn suspend<A, G>(thunk: G) -> Self::Of<A>
    where
        A: 'static,
        G: FnOnce() -> Self::Of<A> + 'static,
    {
        Self::bind(Self::pure(()), move |()| thunk())
    }
}
