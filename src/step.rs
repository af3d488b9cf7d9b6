//! Per-item state machine deciding how a step completes.
//!
//! Every visited item gets a fresh [`Step`]. The callback's [`Context`](crate::Context)
//! and any [`Done`](crate::Done) handles share it, and the engine inspects it once the
//! callback returns:
//!
//! ```text
//! Pending  --defer-->         Declared
//! Declared --handle called--> Settled(signal)     (still inside the callback)
//! Declared --callback returns--> Parked(run)      (truly deferred)
//! Parked   --handle called--> Resumed             (run continues on the caller's stack)
//! Pending | Settled --engine consumes--> Resumed
//! ```

use std::{cell::RefCell, fmt, mem, rc::Rc};

use crate::{
    error::{ContinuationError, ContinuationResult},
    signal::Signal,
};

/// A suspended run waiting for its step result.
pub(crate) trait Resume {
    fn resume(self: Box<Self>, signal: Signal);
}

pub(crate) enum StepState<'a> {
    Pending,
    Declared,
    Settled(Signal),
    Parked(Box<dyn Resume + 'a>),
    Resumed,
}

impl<'a> StepState<'a> {
    fn take(&mut self) -> Self {
        mem::replace(self, StepState::Resumed)
    }
}

impl fmt::Debug for StepState<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepState::Pending => f.write_str("Pending"),
            StepState::Declared => f.write_str("Declared"),
            StepState::Settled(signal) => f.debug_tuple("Settled").field(signal).finish(),
            StepState::Parked(_) => f.write_str("Parked"),
            StepState::Resumed => f.write_str("Resumed"),
        }
    }
}

/// How the engine proceeds once the callback has returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Resolution {
    /// The step is decided; loop on with this signal.
    Now(Signal),
    /// A continuation is outstanding; park the run.
    Later,
}

#[derive(Debug)]
pub(crate) struct Step<'a> {
    index: usize,
    state: StepState<'a>,
}

pub(crate) type SharedStep<'a> = Rc<RefCell<Step<'a>>>;

impl<'a> Step<'a> {
    pub(crate) fn shared(index: usize) -> SharedStep<'a> {
        Rc::new(RefCell::new(Step {
            index,
            state: StepState::Pending,
        }))
    }

    pub(crate) fn index(&self) -> usize {
        self.index
    }

    /// Record that the callback asked for a continuation.
    ///
    /// Returns `false` when this is not the first request for the step.
    pub(crate) fn declare(&mut self) -> bool {
        match self.state {
            StepState::Pending => {
                self.state = StepState::Declared;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn is_declared(&self) -> bool {
        !matches!(self.state, StepState::Pending)
    }

    /// Decide the step after the callback returned `returned`.
    pub(crate) fn resolve(&mut self, returned: Signal) -> Resolution {
        match self.state.take() {
            StepState::Pending => Resolution::Now(returned),
            StepState::Settled(signal) => Resolution::Now(signal),
            StepState::Declared => {
                self.state = StepState::Declared;
                Resolution::Later
            }
            // resolve runs once per step, before any parking
            state @ (StepState::Parked(_) | StepState::Resumed) => {
                self.state = state;
                Resolution::Later
            }
        }
    }

    /// Hand the suspended run to whichever handle fires first.
    pub(crate) fn park(&mut self, run: Box<dyn Resume + 'a>) {
        self.state = StepState::Parked(run);
    }
}

/// Deliver `signal` for the step, resuming a parked run if there is one.
///
/// The `RefCell` borrow is released before the run resumes, so the resumed
/// callbacks may freely touch other handles of this step.
pub(crate) fn settle(step: &SharedStep<'_>, signal: Signal) -> ContinuationResult<()> {
    let run = {
        let mut step = step.borrow_mut();
        match step.state.take() {
            StepState::Declared => {
                step.state = StepState::Settled(signal);
                return Ok(());
            }
            StepState::Parked(run) => run,
            state => {
                step.state = state;
                return Err(ContinuationError::AlreadySettled { index: step.index });
            }
        }
    };
    run.resume(signal);
    Ok(())
}
