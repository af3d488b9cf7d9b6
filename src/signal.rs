use std::ops::ControlFlow;

/// Result of a single iteration step: keep going or stop the run.
///
/// A callback produces a `Signal` either by returning something that converts
/// into one or by passing it to its [`Done`](crate::Done) handle. Only an
/// explicit `false` (or [`Signal::Abort`]) stops iteration; every other value,
/// including `()`, continues.
///
/// # Examples
///
/// ```rust
/// use stepwise::Signal;
///
/// assert_eq!(Signal::from(()), Signal::Continue);
/// assert_eq!(Signal::from(true), Signal::Continue);
/// assert_eq!(Signal::from(false), Signal::Abort);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Signal {
    /// Visit the next item
    #[default]
    Continue,
    /// Stop before visiting any further item
    Abort,
}

impl Signal {
    /// Returns `true` if the signal is `Continue`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stepwise::Signal;
    ///
    /// assert!(Signal::Continue.is_continue());
    /// assert!(!Signal::Abort.is_continue());
    /// ```
    #[inline]
    pub const fn is_continue(&self) -> bool {
        matches!(self, Signal::Continue)
    }

    /// Returns `true` if the signal is `Abort`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stepwise::Signal;
    ///
    /// assert!(Signal::Abort.is_abort());
    /// assert!(!Signal::Continue.is_abort());
    /// ```
    #[inline]
    pub const fn is_abort(&self) -> bool {
        matches!(self, Signal::Abort)
    }

    /// Converts to the `completed` flag reported when a run ends on this signal.
    #[inline]
    pub const fn completed(self) -> bool {
        self.is_continue()
    }
}

impl From<()> for Signal {
    #[inline]
    fn from((): ()) -> Self {
        Signal::Continue
    }
}

impl From<bool> for Signal {
    #[inline]
    fn from(value: bool) -> Self {
        match value {
            false => Signal::Abort,
            true => Signal::Continue,
        }
    }
}

/// `None` stands for "no explicit value", which continues.
impl From<Option<bool>> for Signal {
    #[inline]
    fn from(value: Option<bool>) -> Self {
        value.map_or(Signal::Continue, Signal::from)
    }
}

impl<B> From<ControlFlow<B>> for Signal {
    #[inline]
    fn from(flow: ControlFlow<B>) -> Self {
        match flow {
            ControlFlow::Continue(()) => Signal::Continue,
            ControlFlow::Break(_) => Signal::Abort,
        }
    }
}

impl From<Signal> for ControlFlow<()> {
    #[inline]
    fn from(signal: Signal) -> Self {
        match signal {
            Signal::Continue => ControlFlow::Continue(()),
            Signal::Abort => ControlFlow::Break(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_continues() {
        assert_eq!(Signal::from(()), Signal::Continue);
    }

    #[test]
    fn test_only_false_aborts() {
        assert_eq!(Signal::from(false), Signal::Abort);
        assert_eq!(Signal::from(true), Signal::Continue);
        assert_eq!(Signal::from(None::<bool>), Signal::Continue);
        assert_eq!(Signal::from(Some(true)), Signal::Continue);
        assert_eq!(Signal::from(Some(false)), Signal::Abort);
    }

    #[test]
    fn test_control_flow_conversions() {
        assert_eq!(Signal::from(ControlFlow::<&str>::Break("stop")), Signal::Abort);
        assert_eq!(Signal::from(ControlFlow::<()>::Continue(())), Signal::Continue);
        assert_eq!(ControlFlow::from(Signal::Abort), ControlFlow::Break(()));
    }

    #[test]
    fn test_default_and_completed() {
        assert_eq!(Signal::default(), Signal::Continue);
        assert!(Signal::Continue.completed());
        assert!(!Signal::Abort.completed());
    }
}
