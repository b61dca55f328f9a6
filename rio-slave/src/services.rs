//! I/O service lifecycle and observer wiring.
//!
//! `configure` / `start` / `stop` mirror the lifecycle the owner drives:
//! idempotent line setup, observer registration plus task spawn, and a
//! teardown that gates the observers off and forces the interlock safe.

use core::cell::RefCell;
use core::sync::atomic::{AtomicBool, Ordering};

use critical_section::Mutex;
use embassy_executor::Spawner;
use embassy_sync::channel::Channel;

use rio_core::debounce::{debounce_task, ButtonEdge};
use rio_core::edge::EdgeQueue;
use rio_core::events::input_event_task;
use rio_core::hal::{Duration, HalError, IndicatorLine, InputBoard, OutputBoard};
use rio_core::interlock::Interlock;
use rio_core::registers::RegisterStore;
use rio_core::service::{IoObserver, ObserverGate, ServiceError};
use rio_core::types::{InterlockState, IoConfig};

use crate::board::{Board, CHANNELS};

/// Process-lifetime register store
pub static STORE: RegisterStore = RegisterStore::new();

/// Interlock controller, shared by the debounce path and the bridge thread
static INTERLOCK: Mutex<RefCell<Interlock>> = Mutex::new(RefCell::new(Interlock::new()));

/// Input-edge queue, fed from the interrupt context
pub static EDGES: EdgeQueue = Channel::new();

/// Output-enable button, fed from the interrupt context
pub static BUTTON: ButtonEdge = ButtonEdge::new();

static OBSERVER_LIVE: AtomicBool = AtomicBool::new(false);
static RUNNING: AtomicBool = AtomicBool::new(false);

/// Observer registered at `start`: maintains the discrete-input mirror and
/// drives the interlock on local toggles.
#[derive(Copy, Clone)]
pub struct SlaveObserver {
    board: Board,
}

impl IoObserver for SlaveObserver {
    fn on_local_toggle(&self) {
        let mut board = self.board;
        let result = critical_section::with(|cs| {
            INTERLOCK
                .borrow_ref_mut(cs)
                .on_local_toggle(&STORE, &mut board)
        });
        match result {
            Ok(state) => tracing::info!(
                enabled = state.is_enabled(),
                "digital outputs toggled locally"
            ),
            Err(err) => tracing::error!(?err, "local toggle failed"),
        }
    }

    fn on_input_change(&self, channel: usize) {
        let mut board = self.board;
        match board.input_level(channel) {
            Ok(level) => {
                STORE.write_discrete_input(channel, level);
                tracing::info!(channel, level, "discrete input updated");
            }
            Err(err) => tracing::warn!(?err, channel, "input level read failed"),
        }
    }
}

#[embassy_executor::task]
async fn debounce(window: Duration, observer: ObserverGate<SlaveObserver>) {
    debounce_task(&BUTTON, window, observer).await
}

#[embassy_executor::task]
async fn consume_edges(board: Board, observer: ObserverGate<SlaveObserver>) {
    input_event_task(&EDGES, &CHANNELS, board, observer).await
}

/// Idempotent hardware line setup: all outputs and the indicator off
pub fn configure(mut board: Board) -> Result<(), HalError> {
    board.disable_all_outputs()?;
    board.set_indicator(false)
}

/// Bring up I/O services: register the observer and spawn the consumer and
/// debounce tasks. A failure here is fatal; the owner must not proceed to
/// enable I/O on top of it.
pub fn start(spawner: &Spawner, board: Board, config: &IoConfig) -> Result<(), ServiceError> {
    if RUNNING.swap(true, Ordering::AcqRel) {
        return Err(ServiceError::AlreadyRunning);
    }
    OBSERVER_LIVE.store(true, Ordering::Release);

    let observer = ObserverGate::new(&OBSERVER_LIVE, SlaveObserver { board });
    spawner
        .spawn(debounce(config.debounce, observer))
        .map_err(|_| ServiceError::TaskSpawn)?;
    spawner
        .spawn(consume_edges(board, observer))
        .map_err(|_| ServiceError::TaskSpawn)?;

    tracing::info!(debounce_ms = config.debounce.as_millis(), "I/O services started");
    Ok(())
}

/// Tear down I/O services. Observer callbacks become no-ops, the interlock
/// is forced safe; the long-lived tasks themselves run for the life of the
/// process. Safe to call once after `start`.
pub fn stop(board: Board) -> Result<(), ServiceError> {
    OBSERVER_LIVE.store(false, Ordering::Release);

    let mut board = board;
    let forced = critical_section::with(|cs| {
        INTERLOCK
            .borrow_ref_mut(cs)
            .force_disabled(&STORE, &mut board)
    });
    RUNNING.store(false, Ordering::Release);
    forced.map_err(|_| ServiceError::Teardown)?;

    tracing::info!("I/O services stopped");
    Ok(())
}

/// Interlock consequences of a remote coil write; called by the bridge
/// thread after the engine wait has returned.
pub fn on_remote_coil_write(board: Board) -> Result<InterlockState, HalError> {
    let mut board = board;
    critical_section::with(|cs| {
        INTERLOCK
            .borrow_ref_mut(cs)
            .on_remote_coil_write(&STORE, &mut board)
    })
}
