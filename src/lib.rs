//! # Stepwise: Sequential Iteration That Finishes Now or Later
//!
//! Walk an ordered sequence one item at a time. For each item the callback
//! decides, at call time, whether it finishes synchronously or defers its
//! result to a later event, all through the same entry point.
//!
//! ## Core Pieces
//!
//! - **[`for_each`] / [`for_each_then`]**: visit items in order, optionally
//!   reporting the outcome to a completion callback
//! - **[`Context`]**: capability passed to the callback; [`Context::defer`]
//!   hands out a [`Done`] continuation handle
//! - **[`Signal`]**: step result; only `false` / [`Signal::Abort`] stops the run
//! - **[`Sequence`]**: any indexable collection with a length read once per run
//!
//! ## Example
//!
//! ```
//! use std::{cell::RefCell, rc::Rc};
//! use stepwise::*;
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let outcome = Rc::new(RefCell::new(None));
//!
//! for_each_then(
//!     vec!["a", "b", "c"],
//!     {
//!         let seen = Rc::clone(&seen);
//!         move |item: &&str, index, _items: &Vec<&str>, cx| {
//!             seen.borrow_mut().push((*item, index));
//!             if index == 1 {
//!                 // finish this step through its handle instead of returning
//!                 cx.defer().proceed();
//!             }
//!         }
//!     },
//!     {
//!         let outcome = Rc::clone(&outcome);
//!         move |completed, items| *outcome.borrow_mut() = Some((completed, items))
//!     },
//! );
//!
//! assert_eq!(*seen.borrow(), vec![("a", 0), ("b", 1), ("c", 2)]);
//! assert_eq!(*outcome.borrow(), Some((true, vec!["a", "b", "c"])));
//! ```
//!
//! ## Common Functions
//!
//! **Running:**
//! - [`for_each(sequence, each)`](for_each) - Visit every item
//! - [`for_each_then(sequence, each, done)`](for_each_then) - Visit, then report the outcome
//! - [`for_each_completion(sequence, each)`](for_each_completion) - Visit, returning a future of the outcome
//! - [`for_each_async(sequence, each)`](for_each_async) - Visit with callbacks that return futures

mod completion;
mod cont;
mod error;
mod handler;
pub mod prelude;
mod sequence;
mod signal;
mod step;

pub use completion::*;
pub use cont::*;
pub use error::*;
pub use handler::*;
pub use sequence::*;
pub use signal::*;
