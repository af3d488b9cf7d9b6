//! Commonly used imports
//!
//! Use `use stepwise::prelude::*;` for quick access to the most common types and functions.

// Core types
pub use crate::{Context, Done, Sequence, Signal};

// Running
pub use crate::{for_each, for_each_async, for_each_completion, for_each_then};
