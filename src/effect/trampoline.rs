//! The evaluator shared by the suspended effects.
//!
//! A computation is a tree of [`Node`]s. `Bind` and `Recover` nodes push
//! their continuation onto an explicit frame stack instead of calling it, so
//! arbitrarily long bind chains evaluate in constant call-stack depth. Leaves
//! of type `L` are the only points that need outside help to resolve: a thunk
//! for [`Deferred`](super::Deferred), a future for [`Async`](super::Async).

use std::any::Any;

use either::Either;

use crate::error::{Error, Result};

/// A value whose type is only known to the node that produced it.
pub(super) type Value = Box<dyn Any>;

pub(super) type Bound<L> = Box<dyn FnOnce(Value) -> Node<L>>;
pub(super) type Handler<L> = Box<dyn FnOnce(Error) -> Node<L>>;

pub(super) enum Node<L> {
    Now(Result<Value>),
    Leaf(L),
    Bind(Box<Node<L>>, Bound<L>),
    Recover(Box<Node<L>>, Handler<L>),
}

impl<L: 'static> Node<L> {
    pub(super) fn pure<A: 'static>(value: A) -> Self {
        Node::Now(Ok(Box::new(value)))
    }

    pub(super) fn raise(error: Error) -> Self {
        Node::Now(Err(error))
    }

    /// Continue with `f` once this node has produced an `A`.
    pub(super) fn bind<A, G>(self, f: G) -> Self
    where
        A: 'static,
        G: FnOnce(A) -> Node<L> + 'static,
    {
        Node::Bind(
            Box::new(self),
            Box::new(move |value| match reveal::<A>(value) {
                Ok(value) => f(value),
                Err(error) => Node::Now(Err(error)),
            }),
        )
    }

    pub(super) fn recover<G>(self, f: G) -> Self
    where
        G: FnOnce(Error) -> Node<L> + 'static,
    {
        Node::Recover(Box::new(self), Box::new(f))
    }
}

/// Recover the concrete type of a value produced by a typed node.
pub(super) fn reveal<A: 'static>(value: Value) -> Result<A> {
    value
        .downcast::<A>()
        .map(|value| *value)
        .map_err(|_| Error::msg(format!("suspended computation did not produce a `{}`", std::any::type_name::<A>())))
}

enum Frame<L> {
    Bind(Bound<L>),
    Recover(Handler<L>),
}

/// Pending continuations of one evaluation.
pub(super) struct Stack<L> {
    frames: Vec<Frame<L>>,
}

impl<L: 'static> Stack<L> {
    pub(super) fn new() -> Self {
        Stack { frames: Vec::new() }
    }

    /// Evaluate `node` until a leaf has to be resolved or the computation is finished.
    pub(super) fn advance(&mut self, mut node: Node<L>) -> Either<L, Result<Value>> {
        loop {
            node = match node {
                Node::Bind(inner, k) => {
                    self.frames.push(Frame::Bind(k));
                    *inner
                }
                Node::Recover(inner, h) => {
                    self.frames.push(Frame::Recover(h));
                    *inner
                }
                Node::Leaf(leaf) => return Either::Left(leaf),
                Node::Now(Ok(value)) => match self.next_bind() {
                    Some(k) => k(value),
                    None => return Either::Right(Ok(value)),
                },
                Node::Now(Err(error)) => match self.next_recover() {
                    Some(h) => h(error),
                    None => return Either::Right(Err(error)),
                },
            };
        }
    }

    // Success skips handlers; failure skips binds.
    fn next_bind(&mut self) -> Option<Bound<L>> {
        while let Some(frame) = self.frames.pop() {
            if let Frame::Bind(k) = frame {
                return Some(k);
            }
        }
        None
    }

    fn next_recover(&mut self) -> Option<Handler<L>> {
        while let Some(frame) = self.frames.pop() {
            if let Frame::Recover(h) = frame {
                return Some(h);
            }
        }
        None
    }
}
