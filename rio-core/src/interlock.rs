//! Output-enable interlock: the state machine deciding whether
//! coil-requested levels are actually driven onto the output lines.
//!
//! Outputs are physically driven only while `Enabled`. Coil writes that
//! arrive while `Disabled` are recorded in the register store but have no
//! physical effect until the interlock is re-enabled; that is the safety
//! contract everything else hangs off. Coil bit 31 mirrors the state in
//! both directions: local transitions write it, remote writes of it drive
//! transitions.

use crate::hal::OutputBoard;
use crate::registers::RegisterStore;
use crate::types::{Bank, InterlockState, COILS_PER_BANK, NUM_IO_CHANNELS, OE_COIL_ADDR};

/// Interlock controller. One instance per process; the sole mutator of
/// [`InterlockState`]. Callers serialize access (the local-toggle and
/// remote-write paths run on different contexts).
pub struct Interlock {
    state: InterlockState,
}

impl Interlock {
    /// Starts `Disabled`: no output is driven until someone enables.
    pub const fn new() -> Self {
        Self {
            state: InterlockState::Disabled,
        }
    }

    pub fn state(&self) -> InterlockState {
        self.state
    }

    pub fn is_enabled(&self) -> bool {
        self.state.is_enabled()
    }

    /// Debounced local toggle: unconditionally flips the state.
    ///
    /// Returns the state after the transition so the owner can log it.
    pub fn on_local_toggle<B: OutputBoard>(
        &mut self,
        store: &RegisterStore,
        board: &mut B,
    ) -> Result<InterlockState, B::Error> {
        match self.state {
            InterlockState::Enabled => self.force_disabled(store, board)?,
            InterlockState::Disabled => self.enable(store, board, true)?,
        }
        Ok(self.state)
    }

    /// A remote coil write was observed: reconcile local state with the
    /// mirror bit as the writer left it.
    pub fn on_remote_coil_write<B: OutputBoard>(
        &mut self,
        store: &RegisterStore,
        board: &mut B,
    ) -> Result<InterlockState, B::Error> {
        let requested = store.coil(OE_COIL_ADDR);
        match (self.state, requested) {
            // Outputs disabled by the remote master
            (InterlockState::Enabled, false) => self.force_disabled(store, board)?,
            // Common case: individual coils updated, mirror untouched;
            // outputs must reflect the new coil values immediately
            (InterlockState::Enabled, true) => self.mirror_outputs(store, board)?,
            // Outputs enabled by the remote master; the writer already set
            // the mirror bit
            (InterlockState::Disabled, true) => self.enable(store, board, false)?,
            (InterlockState::Disabled, false) => {}
        }
        Ok(self.state)
    }

    /// Force the safe state: clear the mirror bit, drive every output line
    /// off, indicator off. Performed in full even when already `Disabled`.
    pub fn force_disabled<B: OutputBoard>(
        &mut self,
        store: &RegisterStore,
        board: &mut B,
    ) -> Result<(), B::Error> {
        self.state = InterlockState::Disabled;
        store.clear_coil(OE_COIL_ADDR);
        board.disable_all_outputs()?;
        board.set_indicator(false)?;
        #[cfg(feature = "defmt")]
        defmt::info!("digital outputs disabled");
        Ok(())
    }

    fn enable<B: OutputBoard>(
        &mut self,
        store: &RegisterStore,
        board: &mut B,
        set_mirror: bool,
    ) -> Result<(), B::Error> {
        // Outputs first, so they already match the coils when they go live
        self.mirror_outputs(store, board)?;
        self.state = InterlockState::Enabled;
        if set_mirror {
            store.set_coil(OE_COIL_ADDR);
        }
        board.set_indicator(true)?;
        #[cfg(feature = "defmt")]
        defmt::info!("digital outputs enabled");
        Ok(())
    }

    /// Drive every output line of both banks to match its coil bit
    fn mirror_outputs<B: OutputBoard>(
        &self,
        store: &RegisterStore,
        board: &mut B,
    ) -> Result<(), B::Error> {
        for channel in 0..NUM_IO_CHANNELS {
            let addr = channel as u16;
            board.set_output(Bank::Bank0, channel, store.coil(addr))?;
            board.set_output(Bank::Bank1, channel, store.coil(addr + COILS_PER_BANK))?;
        }
        Ok(())
    }
}

impl Default for Interlock {
    fn default() -> Self {
        Self::new()
    }
}
