//! Ordered, indexable collections the engine can walk.
//!
//! This module defines the [`Sequence`] trait. The engine reads a sequence's
//! length once when a run starts and then fetches items by index, so anything
//! with a stable length and random access can be iterated.
//!
//! Smart pointers and references forward to their target, so a caller that
//! wants to keep the collection while a deferred run is in flight can hand the
//! engine an `Rc<Vec<T>>` instead of the `Vec<T>` itself.
//!
//! # Examples
//!
//! ```rust
//! use stepwise::Sequence;
//!
//! let items = vec!["a", "b", "c"];
//! assert_eq!(Sequence::len(&items), 3);
//! assert_eq!(Sequence::get(&items, 1), Some(&"b"));
//! ```

use std::{collections::VecDeque, rc::Rc, sync::Arc};

use either::Either;

/// An ordered collection with a known length and access by index.
pub trait Sequence {
    /// Element type handed to the per-item callback
    type Item;

    /// Number of items. Read once per run.
    fn len(&self) -> usize;

    /// Item at `index`, or `None` past the end.
    fn get(&self, index: usize) -> Option<&Self::Item>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Sequence for [T] {
    type Item = T;

    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    fn get(&self, index: usize) -> Option<&T> {
        <[T]>::get(self, index)
    }
}

impl<T, const N: usize> Sequence for [T; N] {
    type Item = T;

    fn len(&self) -> usize {
        N
    }

    fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }
}

impl<T> Sequence for Vec<T> {
    type Item = T;

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }
}

impl<T> Sequence for VecDeque<T> {
    type Item = T;

    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    fn get(&self, index: usize) -> Option<&T> {
        VecDeque::get(self, index)
    }
}

impl<S> Sequence for &S
where
    S: Sequence + ?Sized,
{
    type Item = S::Item;

    fn len(&self) -> usize {
        (**self).len()
    }

    fn get(&self, index: usize) -> Option<&Self::Item> {
        (**self).get(index)
    }
}

impl<S> Sequence for &mut S
where
    S: Sequence + ?Sized,
{
    type Item = S::Item;

    fn len(&self) -> usize {
        (**self).len()
    }

    fn get(&self, index: usize) -> Option<&Self::Item> {
        (**self).get(index)
    }
}

impl<S> Sequence for Box<S>
where
    S: Sequence + ?Sized,
{
    type Item = S::Item;

    fn len(&self) -> usize {
        self.as_ref().len()
    }

    fn get(&self, index: usize) -> Option<&Self::Item> {
        self.as_ref().get(index)
    }
}

impl<S> Sequence for Rc<S>
where
    S: Sequence + ?Sized,
{
    type Item = S::Item;

    fn len(&self) -> usize {
        self.as_ref().len()
    }

    fn get(&self, index: usize) -> Option<&Self::Item> {
        self.as_ref().get(index)
    }
}

impl<S> Sequence for Arc<S>
where
    S: Sequence + ?Sized,
{
    type Item = S::Item;

    fn len(&self) -> usize {
        self.as_ref().len()
    }

    fn get(&self, index: usize) -> Option<&Self::Item> {
        self.as_ref().get(index)
    }
}

impl<L, R> Sequence for Either<L, R>
where
    L: Sequence,
    R: Sequence<Item = L::Item>,
{
    type Item = L::Item;

    fn len(&self) -> usize {
        match self {
            Either::Left(l) => l.len(),
            Either::Right(r) => r.len(),
        }
    }

    fn get(&self, index: usize) -> Option<&Self::Item> {
        match self {
            Either::Left(l) => l.get(index),
            Either::Right(r) => r.get(index),
        }
    }
}
