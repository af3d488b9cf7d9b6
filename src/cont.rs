use std::{fmt, rc::Rc};

use tracing::{debug, trace};

use crate::{
    error::ContinuationResult,
    signal::Signal,
    step::{self, SharedStep},
};

/// Capability handed to the per-item callback alongside the item.
///
/// A callback that finishes synchronously ignores it. A callback that needs
/// to finish later calls [`defer`](Context::defer) and keeps the returned
/// [`Done`] handle; the callback's own return value is then ignored.
///
/// ```rust
/// use std::{cell::RefCell, rc::Rc};
/// use stepwise::{for_each_then, Done};
///
/// let pending: Rc<RefCell<Vec<Done>>> = Rc::default();
/// let finished = Rc::new(RefCell::new(None));
///
/// for_each_then(
///     vec![1, 2],
///     {
///         let pending = Rc::clone(&pending);
///         move |_item: &i32, _index, _items: &Vec<i32>, cx| {
///             pending.borrow_mut().push(cx.defer());
///         }
///     },
///     {
///         let finished = Rc::clone(&finished);
///         move |completed, _items| *finished.borrow_mut() = Some(completed)
///     },
/// );
///
/// // Each handle resumes the run for exactly one item.
/// loop {
///     let next = pending.borrow_mut().pop();
///     let Some(done) = next else { break };
///     done.proceed();
/// }
/// assert_eq!(*finished.borrow(), Some(true));
/// ```
pub struct Context<'a> {
    step: SharedStep<'a>,
}

impl<'a> Context<'a> {
    pub(crate) fn new(step: SharedStep<'a>) -> Self {
        Self { step }
    }

    /// Declare that this step finishes later and get the handle that finishes it.
    ///
    /// Calling `defer` again within the same step hands out another handle to
    /// the same step.
    pub fn defer(&mut self) -> Done<'a> {
        let first = self.step.borrow_mut().declare();
        if first {
            trace!(index = self.index(), "step deferred");
        }
        Done {
            step: Rc::clone(&self.step),
        }
    }

    /// Whether [`defer`](Context::defer) was called during this step.
    pub fn is_deferred(&self) -> bool {
        self.step.borrow().is_declared()
    }

    /// Index of the item being visited.
    pub fn index(&self) -> usize {
        self.step.borrow().index()
    }
}

impl fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("step", &self.step.borrow())
            .finish()
    }
}

/// One-shot continuation handle for a deferred step.
///
/// Only the first invocation among all handles of a step decides it; later
/// ones do nothing. Invoking a handle before the callback that requested it
/// returns is allowed and is treated as a synchronous result.
#[derive(Clone)]
pub struct Done<'a> {
    step: SharedStep<'a>,
}

impl<'a> Done<'a> {
    /// Deliver the step result, resuming the run if it is parked.
    ///
    /// The remaining items are visited on the caller's stack, up to the next
    /// deferred step or the end of the run.
    pub fn resume(self, signal: impl Into<Signal>) {
        if let Err(err) = self.try_resume(signal) {
            debug!(%err, "ignoring repeated continuation");
        }
    }

    /// Like [`resume`](Done::resume), but reports a step that already had a result.
    ///
    /// ```rust
    /// use std::{cell::RefCell, rc::Rc};
    /// use stepwise::{for_each, ContinuationError};
    ///
    /// let errors = Rc::new(RefCell::new(Vec::new()));
    /// for_each(vec!["only"], {
    ///     let errors = Rc::clone(&errors);
    ///     move |_item: &&str, _index, _items: &Vec<&str>, cx| {
    ///         let done = cx.defer();
    ///         done.clone().proceed();
    ///         errors.borrow_mut().push(done.try_resume(false));
    ///     }
    /// });
    ///
    /// assert_eq!(
    ///     *errors.borrow(),
    ///     vec![Err(ContinuationError::AlreadySettled { index: 0 })]
    /// );
    /// ```
    pub fn try_resume(self, signal: impl Into<Signal>) -> ContinuationResult<()> {
        step::settle(&self.step, signal.into())
    }

    /// Resume with [`Signal::Continue`].
    pub fn proceed(self) {
        self.resume(Signal::Continue)
    }

    /// Resume with [`Signal::Abort`].
    pub fn abort(self) {
        self.resume(Signal::Abort)
    }

    /// Index of the item this handle finishes.
    pub fn index(&self) -> usize {
        self.step.borrow().index()
    }
}

impl fmt::Debug for Done<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Done")
            .field("step", &self.step.borrow())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{for_each, for_each_then, ContinuationError};
    use std::cell::RefCell;

    #[test]
    fn test_is_deferred_reflects_defer() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        for_each(vec![0, 1], {
            let seen = Rc::clone(&seen);
            move |_item: &i32, index, _items: &Vec<i32>, cx| {
                let before = cx.is_deferred();
                if index == 1 {
                    cx.defer().proceed();
                }
                seen.borrow_mut().push((cx.index(), before, cx.is_deferred()));
            }
        });
        assert_eq!(*seen.borrow(), vec![(0, false, false), (1, false, true)]);
    }

    #[test]
    fn test_repeated_defer_shares_step() {
        let handles: Rc<RefCell<Vec<Done<'static>>>> = Rc::default();
        let visited = Rc::new(RefCell::new(Vec::new()));
        for_each(vec!['a', 'b'], {
            let handles = Rc::clone(&handles);
            let visited = Rc::clone(&visited);
            move |item: &char, _index, _items: &Vec<char>, cx| {
                visited.borrow_mut().push(*item);
                let first = cx.defer();
                let second = cx.defer();
                handles.borrow_mut().extend([first, second]);
            }
        });
        assert_eq!(*visited.borrow(), vec!['a']);

        let (first, second) = {
            let mut handles = handles.borrow_mut();
            let second = handles.pop().unwrap();
            (handles.pop().unwrap(), second)
        };
        assert_eq!(first.index(), 0);
        assert_eq!(second.index(), 0);

        second.proceed();
        assert_eq!(*visited.borrow(), vec!['a', 'b']);
        assert_eq!(
            first.try_resume(()),
            Err(ContinuationError::AlreadySettled { index: 0 })
        );
        assert_eq!(*visited.borrow(), vec!['a', 'b']);
    }

    #[test]
    fn test_abort_through_handle() {
        let pending: Rc<RefCell<Option<Done<'static>>>> = Rc::default();
        let finished = Rc::new(RefCell::new(None));
        for_each_then(
            vec![1, 2, 3],
            {
                let pending = Rc::clone(&pending);
                move |_item: &i32, _index, _items: &Vec<i32>, cx| {
                    *pending.borrow_mut() = Some(cx.defer());
                }
            },
            {
                let finished = Rc::clone(&finished);
                move |completed, items: Vec<i32>| *finished.borrow_mut() = Some((completed, items))
            },
        );

        let done = pending.borrow_mut().take().unwrap();
        done.abort();
        assert_eq!(*finished.borrow(), Some((false, vec![1, 2, 3])));
    }

    #[test]
    fn test_debug_shows_state() {
        let rendered = Rc::new(RefCell::new(String::new()));
        for_each(vec![()], {
            let rendered = Rc::clone(&rendered);
            move |_item: &(), _index, _items: &Vec<()>, cx| {
                let done = cx.defer();
                *rendered.borrow_mut() = format!("{:?}", done);
                done.proceed();
            }
        });
        assert!(rendered.borrow().contains("Declared"));
    }
}
