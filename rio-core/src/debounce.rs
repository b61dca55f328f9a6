//! Button debounce: collapses a burst of press edges into one toggle.
//!
//! Split across contexts the same way as the input path: `ButtonEdge` is
//! the interrupt-facing side (a pending flag and a task wakeup, nothing
//! else), `Debouncer` is the restartable two-state countdown evaluated
//! outside interrupt context.

use core::sync::atomic::{AtomicBool, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use crate::hal::{Duration, Instant};

/// Interrupt-facing side of the output-enable button
pub struct ButtonEdge {
    pending: AtomicBool,
    edge: Signal<CriticalSectionRawMutex, ()>,
}

impl ButtonEdge {
    pub const fn new() -> Self {
        Self {
            pending: AtomicBool::new(false),
            edge: Signal::new(),
        }
    }

    /// Record a press edge. Safe to call from interrupt context: sets the
    /// pending flag and (re)starts the debounce window.
    pub fn on_press_edge(&self) {
        self.pending.store(true, Ordering::Release);
        self.edge.signal(());
    }

    /// Consume the pending flag
    pub fn take_pending(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Wait for the next press edge
    pub async fn wait_edge(&self) {
        self.edge.wait().await
    }
}

impl Default for ButtonEdge {
    fn default() -> Self {
        Self::new()
    }
}

/// Debounce window state
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum DebounceState {
    /// No window running
    Idle,
    /// Window running; expires at `deadline`
    Armed { deadline: Instant },
}

/// Restartable single-shot countdown.
///
/// Any number of edges within one window collapse into at most one emitted
/// toggle; each edge while armed restarts the window, so the emitted event
/// trails the last raw edge by the full window length.
pub struct Debouncer {
    window: Duration,
    state: DebounceState,
}

impl Debouncer {
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            state: DebounceState::Idle,
        }
    }

    pub fn state(&self) -> DebounceState {
        self.state
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Arm the window, or restart it if already armed
    pub fn on_press_edge(&mut self, now: Instant) {
        self.state = DebounceState::Armed {
            deadline: now + self.window,
        };
    }

    /// Expire the window if it is due. Returns true exactly once per armed
    /// window; further polls stay false until the next edge re-arms.
    pub fn try_expire(&mut self, now: Instant) -> bool {
        match self.state {
            DebounceState::Armed { deadline } if now >= deadline => {
                self.state = DebounceState::Idle;
                true
            }
            _ => false,
        }
    }

    /// Cancel a running window without emitting
    pub fn disarm(&mut self) {
        self.state = DebounceState::Idle;
    }
}

/// Async debounce driver: waits for press edges, runs the restartable
/// window, and emits at most one local toggle per window. Runs for the
/// life of the process.
#[cfg(feature = "embassy-time")]
pub async fn debounce_task<O>(button: &'static ButtonEdge, window: Duration, observer: O)
where
    O: crate::service::IoObserver,
{
    use embassy_futures::select::{select, Either};
    use embassy_time::Timer;

    let mut guard = Debouncer::new(window);
    loop {
        button.wait_edge().await;
        guard.on_press_edge(Instant::now());

        while let DebounceState::Armed { deadline } = guard.state() {
            match select(button.wait_edge(), Timer::at(deadline)).await {
                Either::First(()) => guard.on_press_edge(Instant::now()),
                Either::Second(()) => {
                    if guard.try_expire(Instant::now()) && button.take_pending() {
                        #[cfg(feature = "defmt")]
                        defmt::info!("button press debounced");
                        observer.on_local_toggle();
                    }
                }
            }
        }
    }
}
