//! Awaiting the end of a callback-driven run.
//!
//! [`for_each_completion`] starts a run exactly like
//! [`for_each_then`](crate::for_each_then) but, instead of taking a completion
//! callback, returns a [`Completion`] future that resolves with the same
//! `(completed, sequence)` pair.

use std::{
    cell::RefCell,
    fmt,
    future::Future,
    mem,
    pin::Pin,
    rc::Rc,
    task::{self, Poll, Waker},
};

use crate::{cont::Context, handler::for_each_then, sequence::Sequence, signal::Signal};

enum CompletionState<S> {
    Waiting(Option<Waker>),
    Ready(bool, S),
    Taken,
}

impl<S> CompletionState<S> {
    fn take(&mut self) -> Self {
        mem::replace(self, CompletionState::Taken)
    }
}

/// Future returned by [`for_each_completion`].
///
/// Resolves to `(completed, sequence)` once the run ends. A run whose deferred
/// step is never resolved leaves the future pending forever.
pub struct Completion<S> {
    state: Rc<RefCell<CompletionState<S>>>,
}

impl<S> Completion<S> {
    /// Whether the run has ended and the output is waiting to be taken.
    pub fn is_finished(&self) -> bool {
        matches!(*self.state.borrow(), CompletionState::Ready(..))
    }
}

impl<S> Future for Completion<S> {
    type Output = (bool, S);

    fn poll(self: Pin<&mut Self>, cx: &mut task::Context<'_>) -> Poll<Self::Output> {
        let mut state = self.state.borrow_mut();
        match state.take() {
            CompletionState::Ready(completed, sequence) => Poll::Ready((completed, sequence)),
            CompletionState::Waiting(_) => {
                *state = CompletionState::Waiting(Some(cx.waker().clone()));
                Poll::Pending
            }
            CompletionState::Taken => panic!("`Completion` polled after it resolved"),
        }
    }
}

impl<S> fmt::Debug for Completion<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match *self.state.borrow() {
            CompletionState::Waiting(_) => "waiting",
            CompletionState::Ready(..) => "ready",
            CompletionState::Taken => "taken",
        };
        f.debug_struct("Completion").field("state", &state).finish()
    }
}

/// Start a run and get a future for its outcome.
///
/// Steps that complete synchronously run before this function returns;
/// deferred steps continue whenever their handles are resolved.
///
/// ```rust
/// use stepwise::{for_each_completion, Completion};
///
/// let completion: Completion<Vec<i32>> =
///     for_each_completion(vec![1, 2, 3], |item: &i32, _index, _items: &Vec<i32>, _cx| *item < 2);
/// assert!(completion.is_finished());
/// ```
pub fn for_each_completion<'a, S, E, R>(sequence: S, each: E) -> Completion<S>
where
    S: Sequence + 'a,
    E: FnMut(&S::Item, usize, &S, &mut Context<'a>) -> R + 'a,
    R: Into<Signal> + 'a,
{
    let state = Rc::new(RefCell::new(CompletionState::Waiting(None)));
    let sink = Rc::clone(&state);
    for_each_then(sequence, each, move |completed, sequence| {
        let waiting = mem::replace(
            &mut *sink.borrow_mut(),
            CompletionState::Ready(completed, sequence),
        );
        if let CompletionState::Waiting(Some(waker)) = waiting {
            waker.wake();
        }
    });
    Completion { state }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Done;
    use std::{sync::Arc, task::Wake, time::Duration};
    use tokio::task::LocalSet;

    struct Noop;

    impl Wake for Noop {
        fn wake(self: Arc<Self>) {}
    }

    fn poll_once<F: Future + Unpin>(future: &mut F) -> Poll<F::Output> {
        let waker = Waker::from(Arc::new(Noop));
        let mut cx = task::Context::from_waker(&waker);
        Pin::new(future).poll(&mut cx)
    }

    #[test]
    fn test_synchronous_run_is_ready_immediately() {
        let mut completion =
            for_each_completion(vec!["a", "b", "c"], |_item: &&str, _index, _items: &Vec<&str>, _cx| ());
        assert!(completion.is_finished());
        assert_eq!(poll_once(&mut completion), Poll::Ready((true, vec!["a", "b", "c"])));
    }

    #[test]
    fn test_abort_and_empty() {
        let mut aborted = for_each_completion(
            vec!["a", "b", "c"],
            |item: &&str, _index, _items: &Vec<&str>, _cx| *item != "b",
        );
        assert_eq!(poll_once(&mut aborted), Poll::Ready((false, vec!["a", "b", "c"])));

        let mut empty =
            for_each_completion(Vec::<u8>::new(), |_item: &u8, _index, _items: &Vec<u8>, _cx| false);
        assert_eq!(poll_once(&mut empty), Poll::Ready((true, Vec::new())));
    }

    #[test]
    fn test_pending_until_handle_resolves() {
        let pending: Rc<RefCell<Option<Done<'static>>>> = Rc::default();
        let mut completion = for_each_completion(vec![1_u8], {
            let pending = Rc::clone(&pending);
            move |_item: &u8, _index, _items: &Vec<u8>, cx| {
                *pending.borrow_mut() = Some(cx.defer());
            }
        });

        assert!(!completion.is_finished());
        assert_eq!(poll_once(&mut completion), Poll::Pending);

        let done = pending.borrow_mut().take().unwrap();
        done.proceed();
        assert!(completion.is_finished());
        assert_eq!(poll_once(&mut completion), Poll::Ready((true, vec![1])));
    }

    #[test]
    #[should_panic(expected = "polled after it resolved")]
    fn test_poll_after_ready_panics() {
        let mut completion = for_each_completion(vec![0], |_item: &i32, _index, _items: &Vec<i32>, _cx| ());
        let _ = poll_once(&mut completion);
        let _ = poll_once(&mut completion);
    }

    #[tokio::test(start_paused = true)]
    async fn test_await_timers() {
        let local = LocalSet::new();
        local
            .run_until(async {
                let order = Rc::new(RefCell::new(Vec::new()));
                let completion = for_each_completion(vec!["a", "b", "c"], {
                    let order = Rc::clone(&order);
                    move |item: &&'static str, _index, _items: &Vec<&'static str>, cx| {
                        order.borrow_mut().push(*item);
                        let done = cx.defer();
                        tokio::task::spawn_local(async move {
                            tokio::time::sleep(Duration::from_millis(10)).await;
                            done.proceed();
                        });
                    }
                });

                let start = tokio::time::Instant::now();
                let (completed, items) = completion.await;
                assert!(completed);
                assert_eq!(items, vec!["a", "b", "c"]);
                assert_eq!(*order.borrow(), vec!["a", "b", "c"]);
                assert!(start.elapsed() >= Duration::from_millis(30));
            })
            .await;
    }
}
