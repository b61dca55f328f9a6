//! Shared register banks: two coil banks and one discrete-input bitfield.
//!
//! Every operation runs inside one short critical section shared across all
//! execution contexts (interrupt, timer callback, consumer task, bridge
//! task). Critical-section bodies are branch-and-bit-op only; nothing in
//! here blocks or logs.

use core::cell::Cell;

use critical_section::Mutex;

use crate::hal::InputBoard;
use crate::types::{COILS_PER_BANK, COIL_ADDR_SPACE, NUM_IO_CHANNELS};

/// The three register bitfields as one copyable unit
#[derive(Copy, Clone, Default)]
struct RegisterFile {
    coils_bank0: u16,
    coils_bank1: u16,
    discrete_inputs: u16,
}

/// Which register area a descriptor names
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum RegisterAreaKind {
    /// Read/write output-request bits
    Coils,
    /// Read-only input mirror bits
    DiscreteInputs,
}

/// Descriptor binding one register area into the engine's address space
#[derive(Copy, Clone, Debug)]
pub struct RegisterArea {
    pub kind: RegisterAreaKind,
    pub start_offset: u16,
    /// Area size in register bits
    pub bit_len: u16,
}

/// Concurrency-guarded register store.
///
/// A coil bit records the output request as last communicated by a writer,
/// local or remote; whether the physical line is driven is gated by the
/// interlock. A discrete-input bit mirrors the most recently
/// debounced-and-sampled level of its input channel and is written only by
/// the event consumer path.
pub struct RegisterStore {
    file: Mutex<Cell<RegisterFile>>,
}

impl RegisterStore {
    pub const fn new() -> Self {
        Self {
            file: Mutex::new(Cell::new(RegisterFile {
                coils_bank0: 0,
                coils_bank1: 0,
                discrete_inputs: 0,
            })),
        }
    }

    /// Test one coil bit. Addresses outside the coil space read as off.
    pub fn coil(&self, addr: u16) -> bool {
        critical_section::with(|cs| {
            let file = self.file.borrow(cs).get();
            if addr < COILS_PER_BANK {
                file.coils_bank0 & (1 << addr) != 0
            } else if addr < COIL_ADDR_SPACE {
                file.coils_bank1 & (1 << (addr - COILS_PER_BANK)) != 0
            } else {
                false
            }
        })
    }

    /// Write one coil bit. Addresses outside the coil space are ignored.
    pub fn write_coil(&self, addr: u16, on: bool) {
        critical_section::with(|cs| {
            let cell = self.file.borrow(cs);
            let mut file = cell.get();
            if addr < COILS_PER_BANK {
                if on {
                    file.coils_bank0 |= 1 << addr;
                } else {
                    file.coils_bank0 &= !(1 << addr);
                }
            } else if addr < COIL_ADDR_SPACE {
                let bit = addr - COILS_PER_BANK;
                if on {
                    file.coils_bank1 |= 1 << bit;
                } else {
                    file.coils_bank1 &= !(1 << bit);
                }
            }
            cell.set(file);
        })
    }

    pub fn set_coil(&self, addr: u16) {
        self.write_coil(addr, true);
    }

    pub fn clear_coil(&self, addr: u16) {
        self.write_coil(addr, false);
    }

    /// Snapshot of both coil banks, taken in one critical section
    pub fn coil_banks(&self) -> (u16, u16) {
        critical_section::with(|cs| {
            let file = self.file.borrow(cs).get();
            (file.coils_bank0, file.coils_bank1)
        })
    }

    /// Snapshot of the discrete-input bitfield
    pub fn discrete_inputs(&self) -> u16 {
        critical_section::with(|cs| self.file.borrow(cs).get().discrete_inputs)
    }

    /// Mirror one input channel's settled level into its discrete bit
    pub fn write_discrete_input(&self, channel: usize, on: bool) {
        if channel >= NUM_IO_CHANNELS {
            return;
        }
        critical_section::with(|cs| {
            let cell = self.file.borrow(cs);
            let mut file = cell.get();
            if on {
                file.discrete_inputs |= 1 << channel;
            } else {
                file.discrete_inputs &= !(1 << channel);
            }
            cell.set(file);
        })
    }

    /// Probe every input channel and seed the discrete-input bits.
    ///
    /// Called once before the protocol engine starts serving the area, so
    /// the first remote read already sees real levels.
    pub fn sample_inputs<B: InputBoard>(&self, board: &mut B) -> Result<(), B::Error> {
        for channel in 0..NUM_IO_CHANNELS {
            let level = board.input_level(channel)?;
            self.write_discrete_input(channel, level);
        }
        Ok(())
    }

    /// Descriptor for the coil area (offset 0, both banks)
    pub const fn coil_area() -> RegisterArea {
        RegisterArea {
            kind: RegisterAreaKind::Coils,
            start_offset: 0,
            bit_len: COIL_ADDR_SPACE,
        }
    }

    /// Descriptor for the discrete-input area (offset 0, one bank)
    pub const fn discrete_area() -> RegisterArea {
        RegisterArea {
            kind: RegisterAreaKind::DiscreteInputs,
            start_offset: 0,
            bit_len: COILS_PER_BANK,
        }
    }
}

impl Default for RegisterStore {
    fn default() -> Self {
        Self::new()
    }
}
