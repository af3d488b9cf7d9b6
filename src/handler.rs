//! Functions for walking a sequence to completion.
//!
//! [`for_each`] and [`for_each_then`] drive callbacks that finish each item
//! either immediately or later through a [`Done`](crate::Done) handle.
//! [`for_each_async`] is the `async` counterpart for callbacks that return
//! futures.

use std::{future::Future, marker::PhantomData, rc::Rc};

use tracing::{debug, trace, warn};

use crate::{
    cont::Context,
    sequence::Sequence,
    signal::Signal,
    step::{Resolution, Resume, Step},
};

/// State of one run: the cursor plus everything the callbacks need.
///
/// While a step is deferred the whole run is parked inside that step, so no
/// engine frame stays on the stack until a handle resumes it.
struct Run<S, E, R, D> {
    sequence: S,
    each: E,
    done: Option<D>,
    len: usize,
    index: usize,
    _returns: PhantomData<fn() -> R>,
}

impl<'a, S, E, R, D> Run<S, E, R, D>
where
    S: Sequence + 'a,
    E: FnMut(&S::Item, usize, &S, &mut Context<'a>) -> R + 'a,
    R: Into<Signal> + 'a,
    D: FnOnce(bool, S) + 'a,
{
    fn start(sequence: S, each: E, done: Option<D>) {
        let len = sequence.len();
        trace!(len, "run started");
        Run {
            sequence,
            each,
            done,
            len,
            index: 0,
            _returns: PhantomData,
        }
        .drive(Signal::Continue)
    }

    /// Visit items until the run ends or a step is truly deferred.
    fn drive(mut self, mut signal: Signal) {
        loop {
            if signal.is_abort() || self.index >= self.len {
                return self.finish(signal);
            }

            let index = self.index;
            let Some(item) = self.sequence.get(index) else {
                warn!(index, len = self.len, "sequence shorter than its reported length");
                return self.finish(Signal::Continue);
            };

            trace!(index, "visiting item");
            let step = Step::shared(index);
            let mut cx = Context::new(Rc::clone(&step));
            let returned: Signal = (self.each)(item, index, &self.sequence, &mut cx).into();
            self.index += 1;

            let resolution = step.borrow_mut().resolve(returned);
            match resolution {
                Resolution::Now(next) => signal = next,
                Resolution::Later => {
                    trace!(index, "run parked");
                    step.borrow_mut().park(Box::new(self));
                    return;
                }
            }
        }
    }

    fn finish(self, signal: Signal) {
        let completed = signal.completed();
        if completed {
            debug!(visited = self.index, "run completed");
        } else {
            debug!(visited = self.index, len = self.len, "run aborted");
        }
        if let Some(done) = self.done {
            done(completed, self.sequence);
        }
    }
}

impl<'a, S, E, R, D> Resume for Run<S, E, R, D>
where
    S: Sequence + 'a,
    E: FnMut(&S::Item, usize, &S, &mut Context<'a>) -> R + 'a,
    R: Into<Signal> + 'a,
    D: FnOnce(bool, S) + 'a,
{
    fn resume(self: Box<Self>, signal: Signal) {
        (*self).drive(signal)
    }
}

/// Visit every item of `sequence` in order, one at a time.
///
/// `each` receives the item, its index, the sequence and a [`Context`]. It
/// either returns its step result directly (`()`/`true` continue, `false`
/// aborts) or calls [`Context::defer`] and later resolves the returned handle.
/// The length is read once, before the first item is visited.
///
/// ```rust
/// use std::{cell::RefCell, rc::Rc};
/// use stepwise::for_each;
///
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// for_each(vec!["a", "b", "c"], {
///     let seen = Rc::clone(&seen);
///     move |item: &&str, _index, _items: &Vec<&str>, _cx| {
///         seen.borrow_mut().push(*item);
///         *item != "b"
///     }
/// });
/// assert_eq!(*seen.borrow(), vec!["a", "b"]);
/// ```
pub fn for_each<'a, S, E, R>(sequence: S, each: E)
where
    S: Sequence + 'a,
    E: FnMut(&S::Item, usize, &S, &mut Context<'a>) -> R + 'a,
    R: Into<Signal> + 'a,
{
    Run::<S, E, R, fn(bool, S)>::start(sequence, each, None)
}

/// Like [`for_each`], then call `done` exactly once when the run ends.
///
/// `done` receives `true` if every item was visited, `false` if a step
/// aborted, together with the sequence. It never fires for a run whose
/// deferred step is never resolved.
///
/// ```rust
/// use std::{cell::RefCell, rc::Rc};
/// use stepwise::for_each_then;
///
/// let outcome = Rc::new(RefCell::new(None));
/// for_each_then(
///     vec![1, 2, 3],
///     |_item: &i32, _index, _items: &Vec<i32>, cx| cx.defer().proceed(),
///     {
///         let outcome = Rc::clone(&outcome);
///         move |completed, items| *outcome.borrow_mut() = Some((completed, items))
///     },
/// );
/// assert_eq!(*outcome.borrow(), Some((true, vec![1, 2, 3])));
/// ```
pub fn for_each_then<'a, S, E, R, D>(sequence: S, each: E, done: D)
where
    S: Sequence + 'a,
    E: FnMut(&S::Item, usize, &S, &mut Context<'a>) -> R + 'a,
    R: Into<Signal> + 'a,
    D: FnOnce(bool, S) + 'a,
{
    Run::<S, E, R, D>::start(sequence, each, Some(done))
}

/// Async version of [`for_each_then`].
///
/// Each callback returns a future whose output is the step result; it is
/// awaited before the next item is visited. Resolves to the `completed` flag
/// and the sequence. Dropping the returned future stops the run.
pub async fn for_each_async<S, E, F>(sequence: S, mut each: E) -> (bool, S)
where
    S: Sequence,
    E: FnMut(&S::Item, usize, &S) -> F,
    F: Future,
    F::Output: Into<Signal>,
{
    let len = sequence.len();
    let mut signal = Signal::Continue;
    let mut index = 0;

    while signal.is_continue() && index < len {
        let Some(item) = sequence.get(index) else {
            warn!(index, len, "sequence shorter than its reported length");
            break;
        };
        trace!(index, "visiting item");
        signal = each(item, index, &sequence).await.into();
        index += 1;
    }

    let completed = signal.completed();
    debug!(completed, visited = index, "async run finished");
    (completed, sequence)
}
