//! Units of input delivered to a [`Step`](crate::Step).
//!
//! An [`Input`] is either one element or a chunk of at least two. A chunk is
//! never built from a single element, so consumers can match on the variant to
//! take a fast path for the common single-element case. [`Signal`] wraps an
//! input or the end-of-input marker that [`Step::run`](crate::Step::run) sends.

use std::iter;

/// One element, or a run of two or more elements delivered together.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Input<E> {
    El(E),
    Chunk(E, E, Vec<E>),
}

impl<E> Input<E> {
    /// Build an input from a vector. Empty vectors produce `None`.
    ///
    /// ```rust
    /// use stepwise::Input;
    ///
    /// assert_eq!(Input::<i32>::from_vec(vec![]), None);
    /// assert_eq!(Input::from_vec(vec![1]), Some(Input::El(1)));
    /// assert_eq!(Input::from_vec(vec![1, 2, 3]), Some(Input::Chunk(1, 2, vec![3])));
    /// ```
    pub fn from_vec(elements: Vec<E>) -> Option<Self> {
        let mut elements = elements.into_iter();
        let first = elements.next()?;
        match elements.next() {
            None => Some(Input::El(first)),
            Some(second) => Some(Input::Chunk(first, second, elements.collect())),
        }
    }

    /// Number of elements carried.
    pub fn len(&self) -> usize {
        match self {
            Input::El(_) => 1,
            Input::Chunk(_, _, rest) => 2 + rest.len(),
        }
    }

    /// Always `false`; present for symmetry with [`len`](Input::len).
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns `true` for a run of two or more elements.
    ///
    /// ```rust
    /// use stepwise::Input;
    ///
    /// assert!(Input::Chunk(1, 2, vec![]).is_chunk());
    /// assert!(!Input::El(1).is_chunk());
    /// ```
    #[inline]
    pub const fn is_chunk(&self) -> bool {
        matches!(self, Input::Chunk(..))
    }

    /// The element delivered first.
    pub fn first(&self) -> &E {
        match self {
            Input::El(e) | Input::Chunk(e, _, _) => e,
        }
    }

    /// Borrow the elements in delivery order.
    pub fn iter(&self) -> impl Iterator<Item = &E> + '_ {
        let (first, second, rest) = match self {
            Input::El(e) => (e, None, &[][..]),
            Input::Chunk(a, b, rest) => (a, Some(b), rest.as_slice()),
        };
        iter::once(first).chain(second).chain(rest.iter())
    }

    /// All elements in delivery order.
    pub fn into_vec(self) -> Vec<E> {
        match self {
            Input::El(e) => vec![e],
            Input::Chunk(first, second, rest) => {
                let mut all = Vec::with_capacity(2 + rest.len());
                all.push(first);
                all.push(second);
                all.extend(rest);
                all
            }
        }
    }

    /// Transform every element, keeping the element/chunk shape.
    pub fn map<E2, F>(self, mut f: F) -> Input<E2>
    where
        F: FnMut(E) -> E2,
    {
        match self {
            Input::El(e) => Input::El(f(e)),
            Input::Chunk(first, second, rest) => {
                let first = f(first);
                let second = f(second);
                Input::Chunk(first, second, rest.into_iter().map(f).collect())
            }
        }
    }
}

impl<E> IntoIterator for Input<E> {
    type Item = E;
    type IntoIter = std::vec::IntoIter<E>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}

/// What a waiting step can receive: data, or the end of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal<E> {
    Data(Input<E>),
    End,
}

impl<E> Signal<E> {
    /// Returns `true` for the end-of-input marker.
    #[inline]
    pub const fn is_end(&self) -> bool {
        matches!(self, Signal::End)
    }

    /// Transform the carried elements; `End` stays `End`.
    pub fn map<E2, F>(self, f: F) -> Signal<E2>
    where
        F: FnMut(E) -> E2,
    {
        match self {
            Signal::Data(input) => Signal::Data(input.map(f)),
            Signal::End => Signal::End,
        }
    }
}

impl<E> From<Input<E>> for Signal<E> {
    fn from(input: Input<E>) -> Self {
        Signal::Data(input)
    }
}
