//! Simulated I/O board: the reference line map with lock-free line state.
//!
//! Line state lives in atomics so board writes stay legal inside the
//! store's critical sections (nothing here can block). A real board would
//! implement the same three traits over its GPIO driver.

use core::sync::atomic::{AtomicBool, AtomicU16, Ordering};

use rio_core::hal::{HalError, IndicatorLine, InputBoard, OutputBoard};
use rio_core::types::{Bank, ChannelTable, LineId, NUM_IO_CHANNELS};

/// Input lines DI0..DI9
pub const DI_LINES: [LineId; NUM_IO_CHANNELS] = [4, 5, 6, 7, 15, 16, 17, 9, 8, 18];
/// Bank-0 output lines DQ00..DQ09
pub const DQ0_LINES: [LineId; NUM_IO_CHANNELS] = [10, 12, 14, 47, 39, 40, 41, 42, 2, 1];
/// Bank-1 output lines DQ10..DQ19
pub const DQ1_LINES: [LineId; NUM_IO_CHANNELS] = [46, 11, 13, 21, 48, 45, 35, 36, 37, 38];
/// Output-enable toggle button line (press edge only)
pub const OE_TOGGLE_LINE: LineId = 3;
/// Status LED line
pub const STATUS_LED_LINE: LineId = 43;

/// Channel table for the reference board
pub static CHANNELS: ChannelTable = ChannelTable {
    inputs: DI_LINES,
    outputs_bank0: DQ0_LINES,
    outputs_bank1: DQ1_LINES,
};

/// Lock-free line state shared by every context
pub struct BoardLines {
    inputs: AtomicU16,
    outputs: [AtomicU16; 2],
    indicator: AtomicBool,
}

impl BoardLines {
    pub const fn new() -> Self {
        Self {
            inputs: AtomicU16::new(0),
            outputs: [AtomicU16::new(0), AtomicU16::new(0)],
            indicator: AtomicBool::new(false),
        }
    }

    pub fn set_input(&self, channel: usize, on: bool) {
        let bit = 1 << channel;
        if on {
            self.inputs.fetch_or(bit, Ordering::AcqRel);
        } else {
            self.inputs.fetch_and(!bit, Ordering::AcqRel);
        }
    }

    pub fn input(&self, channel: usize) -> bool {
        self.inputs.load(Ordering::Acquire) & (1 << channel) != 0
    }

    /// Flip one input line; returns the new level
    pub fn toggle_input(&self, channel: usize) -> bool {
        let bit = 1 << channel;
        self.inputs.fetch_xor(bit, Ordering::AcqRel) & bit == 0
    }

    pub fn output_banks(&self) -> (u16, u16) {
        (
            self.outputs[0].load(Ordering::Acquire),
            self.outputs[1].load(Ordering::Acquire),
        )
    }

    pub fn indicator(&self) -> bool {
        self.indicator.load(Ordering::Acquire)
    }
}

impl Default for BoardLines {
    fn default() -> Self {
        Self::new()
    }
}

/// Cheap handle onto the shared lines, implementing the core board traits
#[derive(Copy, Clone)]
pub struct Board {
    lines: &'static BoardLines,
}

impl Board {
    pub const fn new(lines: &'static BoardLines) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &'static BoardLines {
        self.lines
    }
}

impl InputBoard for Board {
    type Error = HalError;

    fn input_level(&mut self, channel: usize) -> Result<bool, Self::Error> {
        if channel >= NUM_IO_CHANNELS {
            return Err(HalError::InvalidChannel);
        }
        Ok(self.lines.input(channel))
    }
}

impl IndicatorLine for Board {
    type Error = HalError;

    fn set_indicator(&mut self, on: bool) -> Result<(), Self::Error> {
        self.lines.indicator.store(on, Ordering::Release);
        Ok(())
    }
}

impl OutputBoard for Board {
    fn set_output(&mut self, bank: Bank, channel: usize, on: bool) -> Result<(), Self::Error> {
        if channel >= NUM_IO_CHANNELS {
            return Err(HalError::InvalidChannel);
        }
        let bit = 1 << channel;
        let word = &self.lines.outputs[bank.index()];
        if on {
            word.fetch_or(bit, Ordering::AcqRel);
        } else {
            word.fetch_and(!bit, Ordering::AcqRel);
        }
        Ok(())
    }
}
