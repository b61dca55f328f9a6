//! Register bridge: polls the external protocol engine for register
//! activity and feeds coil-write events into the interlock path.
//!
//! The bridge never touches the register store itself; reads are observed
//! for logging only, and writes go through the caller-supplied handler
//! (which locks the interlock controller briefly, never across the wait).

use bitflags::bitflags;

use crate::hal::Duration;

bitflags! {
    /// Register-event classes reported by the protocol engine
    #[derive(Copy, Clone, PartialEq, Eq, Debug)]
    pub struct EventMask: u8 {
        /// A master read the discrete-input area
        const DISCRETE_READ = 1 << 0;
        /// A master read the coil area
        const COILS_READ = 1 << 1;
        /// A master wrote the coil area
        const COILS_WRITE = 1 << 2;
    }
}

/// Everything the bridge subscribes to
pub const READ_WRITE_MASK: EventMask = EventMask::DISCRETE_READ
    .union(EventMask::COILS_READ)
    .union(EventMask::COILS_WRITE);

/// Engine-side wait bound: a poll that sees no event within this window
/// returns empty-handed and is simply retried.
pub const DEFAULT_EVENT_WAIT: Duration = Duration::from_millis(100);

/// Details of one register access, fetched for observability
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EventInfo {
    pub kind: EventMask,
    /// Register offset of the access
    pub offset: u16,
    /// Access size in register bits
    pub size: u16,
    /// Engine-side timestamp of the access, in microseconds
    pub timestamp_us: u32,
}

/// Blocking interface onto the external protocol engine.
///
/// `wait_for_event` blocks until an event matching the mask occurs or the
/// engine's own wait bound elapses; an empty mask means nothing happened
/// and the caller retries. The engine owns frame decoding, sessions, and
/// address-space enforcement; none of that surfaces here.
pub trait RegisterEngine {
    type Error;

    fn wait_for_event(&mut self, mask: EventMask, timeout: Duration)
        -> Result<EventMask, Self::Error>;

    /// Details of the most recent event, if any
    fn event_info(&mut self) -> Result<Option<EventInfo>, Self::Error>;
}

/// Polls one engine on behalf of the interlock controller
pub struct RegisterBridge<E: RegisterEngine> {
    engine: E,
    mask: EventMask,
    wait_bound: Duration,
}

impl<E: RegisterEngine> RegisterBridge<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            mask: READ_WRITE_MASK,
            wait_bound: DEFAULT_EVENT_WAIT,
        }
    }

    /// Subscribe to a different event set
    pub fn with_mask(mut self, mask: EventMask) -> Self {
        self.mask = mask;
        self
    }

    /// One poll cycle: wait for an event, fetch its details, and invoke
    /// `on_coil_write` for coil-write events only. Read events are observed
    /// only. Returns the event details for the owner's logging.
    pub fn poll_once<F>(&mut self, mut on_coil_write: F) -> Result<Option<EventInfo>, E::Error>
    where
        F: FnMut(&EventInfo),
    {
        let fired = self.engine.wait_for_event(self.mask, self.wait_bound)?;
        if fired.is_empty() {
            // Engine wait bound elapsed with no event; retry
            return Ok(None);
        }
        let Some(info) = self.engine.event_info()? else {
            return Ok(None);
        };

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "register access: kind {=u8}, offset {=u16}, size {=u16}, at {=u32} us",
            info.kind.bits(),
            info.offset,
            info.size,
            info.timestamp_us
        );

        if info.kind.intersects(EventMask::COILS_WRITE) {
            on_coil_write(&info);
        }
        Ok(Some(info))
    }
}
