use std::fmt;
use std::future::{Future, IntoFuture};
use std::marker::PhantomData;
use std::pin::Pin;

use either::Either;

use super::trampoline::{reveal, Node, Stack, Value};
use super::Effect;
use crate::error::{Error, Result};

/// A pinned, boxed, single-threaded future resolving to a `Result`.
pub type LocalBoxFuture<A> = Pin<Box<dyn Future<Output = Result<A>>>>;

type Pending = LocalBoxFuture<Value>;

/// An asynchronous computation. Await it (or call [`IntoFuture::into_future`])
/// to run it.
///
/// Binds are evaluated on an explicit stack between awaits, so the future
/// does not nest one poll per bind.
pub struct Task<A> {
    node: Node<Pending>,
    _value: PhantomData<fn() -> A>,
}

impl<A: 'static> Task<A> {
    /// Lift a future.
    pub fn new<Fut>(future: Fut) -> Self
    where
        Fut: Future<Output = Result<A>> + 'static,
    {
        let pending: Pending = Box::pin(async move { future.await.map(|value| Box::new(value) as Value) });
        Task::from_node(Node::Leaf(pending))
    }

    fn from_node(node: Node<Pending>) -> Self {
        Task {
            node,
            _value: PhantomData,
        }
    }
}

impl<A: 'static> IntoFuture for Task<A> {
    type Output = Result<A>;
    type IntoFuture = LocalBoxFuture<A>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(async move {
            let mut stack = Stack::new();
            let mut node = self.node;
            loop {
                match stack.advance(node) {
                    Either::Left(pending) => node = Node::Now(pending.await),
                    Either::Right(result) => return result.and_then(reveal::<A>),
                }
            }
        })
    }
}

impl<A> fmt::Debug for Task<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Task(..)")
    }
}

/// Asynchronous evaluation through boxed futures.
///
/// No executor is bundled: await the produced [`Task`] on whatever runtime
/// drives the rest of the program. Dropping the future cancels the computation
/// and drops every resource it owns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Async;

impl Effect for Async {
    type Of<A: 'static> = Task<A>;

    fn pure<A: 'static>(value: A) -> Task<A> {
        Task::from_node(Node::pure(value))
    }

    fn raise<A: 'static>(error: Error) -> Task<A> {
        Task::from_node(Node::raise(error))
    }

    fn bind<A, B, G>(fa: Task<A>, f: G) -> Task<B>
    where
        A: 'static,
        B: 'static,
        G: FnOnce(A) -> Task<B> + 'static,
    {
        Task::from_node(fa.node.bind(move |value: A| f(value).node))
    }

    fn tail_rec<S, A, G>(init: S, f: G) -> Task<A>
    where
        S: 'static,
        A: 'static,
        G: FnMut(S) -> Task<Either<S, A>> + 'static,
    {
        fn go<S, A, G>(state: S, mut f: G) -> Task<A>
        where
            S: 'static,
            A: 'static,
            G: FnMut(S) -> Task<Either<S, A>> + 'static,
        {
            let next = f(state);
            Async::bind(next, move |next| match next {
                Either::Left(state) => go(state, f),
                Either::Right(done) => Async::pure(done),
            })
        }

        Async::suspend(move || go(init, f))
    }

    fn handle_error_with<A, G>(fa: Task<A>, f: G) -> Task<A>
    where
        A: 'static,
        G: FnOnce(Error) -> Task<A> + 'static,
    {
        Task::from_node(fa.node.recover(move |error| f(error).node))
    }

    fn delay<A, G>(thunk: G) -> Task<A>
    where
        A: 'static,
        G: FnOnce() -> Result<A> + 'static,
    {
        Task::new(async move { thunk() })
    }
}
