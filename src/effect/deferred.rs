use std::fmt;
use std::marker::PhantomData;

use either::Either;

use super::trampoline::{reveal, Node, Stack, Value};
use super::Effect;
use crate::error::{Error, Result};

type Call = Box<dyn FnOnce() -> Result<Value>>;

/// A one-shot suspended computation. Nothing runs until [`Thunk::run`].
///
/// Binds are evaluated on an explicit stack, so chains of any length run in
/// constant call-stack depth.
pub struct Thunk<A> {
    node: Node<Call>,
    _value: PhantomData<fn() -> A>,
}

impl<A: 'static> Thunk<A> {
    /// Suspend `f` until the thunk is run.
    pub fn new<G>(f: G) -> Self
    where
        G: FnOnce() -> Result<A> + 'static,
    {
        let call: Call = Box::new(move || f().map(|value| Box::new(value) as Value));
        Thunk::from_node(Node::Leaf(call))
    }

    fn from_node(node: Node<Call>) -> Self {
        Thunk {
            node,
            _value: PhantomData,
        }
    }

    /// Evaluate the computation.
    pub fn run(self) -> Result<A> {
        let mut stack = Stack::new();
        let mut node = self.node;
        loop {
            match stack.advance(node) {
                Either::Left(call) => node = Node::Now(call()),
                Either::Right(result) => return result.and_then(reveal::<A>),
            }
        }
    }
}

impl<A> fmt::Debug for Thunk<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Thunk(..)")
    }
}

/// Deferred synchronous evaluation: effects describe work, [`Thunk::run`] performs it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Deferred;

impl Effect for Deferred {
    type Of<A: 'static> = Thunk<A>;

    fn pure<A: 'static>(value: A) -> Thunk<A> {
        Thunk::from_node(Node::pure(value))
    }

    fn raise<A: 'static>(error: Error) -> Thunk<A> {
        Thunk::from_node(Node::raise(error))
    }

    fn bind<A, B, G>(fa: Thunk<A>, f: G) -> Thunk<B>
    where
        A: 'static,
        B: 'static,
        G: FnOnce(A) -> Thunk<B> + 'static,
    {
        Thunk::from_node(fa.node.bind(move |value: A| f(value).node))
    }

    fn tail_rec<S, A, G>(init: S, f: G) -> Thunk<A>
    where
        S: 'static,
        A: 'static,
        G: FnMut(S) -> Thunk<Either<S, A>> + 'static,
    {
        fn go<S, A, G>(state: S, mut f: G) -> Thunk<A>
        where
            S: 'static,
            A: 'static,
            G: FnMut(S) -> Thunk<Either<S, A>> + 'static,
        {
            let next = f(state);
            Deferred::bind(next, move |next| match next {
                Either::Left(state) => go(state, f),
                Either::Right(done) => Deferred::pure(done),
            })
        }

        Deferred::suspend(move || go(init, f))
    }

    fn handle_error_with<A, G>(fa: Thunk<A>, f: G) -> Thunk<A>
    where
        A: 'static,
        G: FnOnce(Error) -> Thunk<A> + 'static,
    {
        Thunk::from_node(fa.node.recover(move |error| f(error).node))
    }

    fn delay<A, G>(thunk: G) -> Thunk<A>
    where
        A: 'static,
        G: FnOnce() -> Result<A> + 'static,
    {
        Thunk::new(thunk)
    }
}
