//! Lifecycle seam between the core and its owner: observer capability and
//! service bring-up/teardown errors.

use core::sync::atomic::{AtomicBool, Ordering};

/// Observer for debounced I/O events, injected at service start.
///
/// Callbacks are fire-and-forget notifications with no return-value error
/// channel; they run on the core's tasks and must not block for long.
pub trait IoObserver {
    /// The local output-enable button toggled. Fired at most once per
    /// debounce window.
    fn on_local_toggle(&self);

    /// Input `channel` settled on a new level. Fired once per settled
    /// transition.
    fn on_input_change(&self, channel: usize);
}

/// No observer registered
impl IoObserver for () {
    fn on_local_toggle(&self) {}
    fn on_input_change(&self, _channel: usize) {}
}

/// Gate wrapping an observer so teardown can drop callbacks to no-ops
/// without tearing down the tasks that hold it: unregistered = no-op.
#[derive(Copy, Clone)]
pub struct ObserverGate<O> {
    enabled: &'static AtomicBool,
    inner: O,
}

impl<O> ObserverGate<O> {
    pub const fn new(enabled: &'static AtomicBool, inner: O) -> Self {
        Self { enabled, inner }
    }
}

impl<O: IoObserver> IoObserver for ObserverGate<O> {
    fn on_local_toggle(&self) {
        if self.enabled.load(Ordering::Acquire) {
            self.inner.on_local_toggle();
        }
    }

    fn on_input_change(&self, channel: usize) {
        if self.enabled.load(Ordering::Acquire) {
            self.inner.on_input_change(channel);
        }
    }
}

/// Errors surfaced to the owner by service bring-up and teardown.
///
/// Bring-up failures are fatal: the owner must not proceed to enable I/O
/// services on top of them.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ServiceError {
    /// The edge queue could not be allocated
    QueueUnavailable,
    /// The debounce timer could not be allocated
    TimerUnavailable,
    /// A service task could not be spawned
    TaskSpawn,
    /// The service is already running
    AlreadyRunning,
    /// Teardown left the board in an undefined state
    Teardown,
}

#[cfg(feature = "std")]
impl core::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ServiceError::QueueUnavailable => write!(f, "Failed to create the edge queue"),
            ServiceError::TimerUnavailable => write!(f, "Failed to create the debounce timer"),
            ServiceError::TaskSpawn => write!(f, "Failed to spawn a service task"),
            ServiceError::AlreadyRunning => write!(f, "I/O services already running"),
            ServiceError::Teardown => write!(f, "I/O service teardown failed"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ServiceError {}
