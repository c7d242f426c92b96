use either::Either;

use super::Effect;
use crate::error::{Error, Result};

/// Immediate evaluation: a computation is just its `Result`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Strict;

impl Effect for Strict {
    type Of<A: 'static> = Result<A>;

    #[inline]
    fn pure<A: 'static>(value: A) -> Result<A> {
        Ok(value)
    }

    #[inline]
    fn raise<A: 'static>(error: Error) -> Result<A> {
        Err(error)
    }

    #[inline]
    fn bind<A, B, G>(fa: Result<A>, f: G) -> Result<B>
    where
        A: 'static,
        B: 'static,
        G: FnOnce(A) -> Result<B> + 'static,
    {
        fa.and_then(f)
    }

    fn tail_rec<S, A, G>(init: S, mut f: G) -> Result<A>
    where
        S: 'static,
        A: 'static,
        G: FnMut(S) -> Result<Either<S, A>> + 'static,
    {
        let mut state = init;
        loop {
            match f(state)? {
                Either::Left(next) => state = next,
                Either::Right(done) => return Ok(done),
            }
        }
    }

    #[inline]
    fn handle_error_with<A, G>(fa: Result<A>, f: G) -> Result<A>
    where
        A: 'static,
        G: FnOnce(Error) -> Result<A> + 'static,
    {
        fa.or_else(f)
    }

    #[inline]
    fn delay<A, G>(thunk: G) -> Result<A>
    where
        A: 'static,
        G: FnOnce() -> Result<A> + 'static,
    {
        thunk()
    }
}
