//! Simulated protocol engine: a remote master cycling through the register
//! map against the bound store.
//!
//! The real engine owns TCP sessions and frame decoding; this stand-in
//! preserves its contract exactly: a blocking event wait, event details on
//! request, and writes that land in the register area before the event is
//! reported.

use std::time::{Duration as StdDuration, Instant as StdInstant};

use rio_core::bridge::{EventInfo, EventMask, RegisterEngine};
use rio_core::hal::Duration;
use rio_core::registers::RegisterStore;
use rio_core::types::{COILS_PER_BANK, OE_COIL_ADDR};

/// The engine's transport dropped; no further events will arrive
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ConnectionLost;

impl std::fmt::Display for ConnectionLost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "protocol engine connection lost")
    }
}

impl std::error::Error for ConnectionLost {}

/// One master access per poll period
#[derive(Copy, Clone, Debug)]
enum MasterStep {
    ReadDiscrete,
    ReadCoils,
    WriteCoil(u16, bool),
}

/// The master's repeating round: enable, exercise a coil in each bank,
/// read back, disable.
const MASTER_CYCLE: [MasterStep; 8] = [
    MasterStep::ReadDiscrete,
    MasterStep::WriteCoil(OE_COIL_ADDR, true),
    MasterStep::WriteCoil(5, true),
    MasterStep::ReadCoils,
    MasterStep::WriteCoil(21, true),
    MasterStep::ReadDiscrete,
    MasterStep::WriteCoil(5, false),
    MasterStep::WriteCoil(OE_COIL_ADDR, false),
];

pub struct SimEngine {
    store: &'static RegisterStore,
    poll_period: StdDuration,
    started: StdInstant,
    step: usize,
    served: u32,
    drop_after: Option<u32>,
    last: Option<EventInfo>,
}

impl SimEngine {
    /// `drop_after`: serve that many events, then report the link lost
    pub fn new(store: &'static RegisterStore, poll_period_ms: u64, drop_after: Option<u32>) -> Self {
        Self {
            store,
            poll_period: StdDuration::from_millis(poll_period_ms),
            started: StdInstant::now(),
            step: 0,
            served: 0,
            drop_after,
            last: None,
        }
    }
}

impl RegisterEngine for SimEngine {
    type Error = ConnectionLost;

    fn wait_for_event(
        &mut self,
        mask: EventMask,
        _timeout: Duration,
    ) -> Result<EventMask, Self::Error> {
        std::thread::sleep(self.poll_period);
        if let Some(limit) = self.drop_after {
            if self.served >= limit {
                return Err(ConnectionLost);
            }
        }

        let step = MASTER_CYCLE[self.step % MASTER_CYCLE.len()];
        self.step += 1;
        self.served += 1;

        let (kind, offset, size) = match step {
            MasterStep::ReadDiscrete => (EventMask::DISCRETE_READ, 0, COILS_PER_BANK),
            MasterStep::ReadCoils => (EventMask::COILS_READ, 0, 2 * COILS_PER_BANK),
            MasterStep::WriteCoil(addr, on) => {
                self.store.write_coil(addr, on);
                (EventMask::COILS_WRITE, addr, 1)
            }
        };

        let info = EventInfo {
            kind,
            offset,
            size,
            timestamp_us: self.started.elapsed().as_micros() as u32,
        };
        if kind.intersects(mask) {
            self.last = Some(info);
            Ok(kind)
        } else {
            Ok(EventMask::empty())
        }
    }

    fn event_info(&mut self) -> Result<Option<EventInfo>, Self::Error> {
        Ok(self.last.take())
    }
}
