//! Hardware abstraction layer for the remote I/O unit

// Re-export time types based on feature
#[cfg(feature = "embassy-time")]
pub use embassy_time::{Duration, Instant};

#[cfg(not(feature = "embassy-time"))]
pub use self::mock_time::{Duration, Instant};

#[cfg(not(feature = "embassy-time"))]
mod mock_time {
    /// Mock instant type for compilation without embassy-time
    #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
    pub struct Instant(u64);

    impl Instant {
        pub fn now() -> Self {
            Self(0) // Placeholder implementation
        }

        pub const fn from_millis(ms: u64) -> Self {
            Self(ms)
        }

        pub const fn duration_since(&self, other: Instant) -> Duration {
            Duration::from_millis(self.0.saturating_sub(other.0))
        }

        pub const fn as_millis(&self) -> u64 {
            self.0
        }
    }

    impl core::ops::Add<Duration> for Instant {
        type Output = Instant;

        fn add(self, rhs: Duration) -> Instant {
            Instant(self.0 + rhs.0)
        }
    }

    /// Mock duration type
    #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
    pub struct Duration(u64);

    impl Duration {
        pub const fn from_millis(ms: u64) -> Self {
            Self(ms)
        }

        pub const fn as_millis(&self) -> u64 {
            self.0
        }
    }

    impl core::ops::Mul<u32> for Duration {
        type Output = Duration;

        fn mul(self, rhs: u32) -> Duration {
            Duration(self.0 * rhs as u64)
        }
    }
}

use crate::types::{Bank, NUM_IO_CHANNELS};
use embedded_hal::digital::{InputPin, OutputPin};

/// Error types for HAL operations
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HalError {
    /// GPIO operation failed
    GpioError,
    /// Channel index outside the channel table
    InvalidChannel,
    /// Invalid configuration
    InvalidConfig,
    /// Hardware not initialized
    NotInitialized,
}

#[cfg(feature = "std")]
impl core::fmt::Display for HalError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HalError::GpioError => write!(f, "GPIO operation failed"),
            HalError::InvalidChannel => write!(f, "Channel index outside the channel table"),
            HalError::InvalidConfig => write!(f, "Invalid configuration"),
            HalError::NotInitialized => write!(f, "Hardware not initialized"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for HalError {}

/// Trait for reading the settled level of input channels
pub trait InputBoard {
    type Error: From<HalError>;

    /// Instantaneous stable level of input `channel` (true = on)
    fn input_level(&mut self, channel: usize) -> Result<bool, Self::Error>;
}

/// Trait for driving the status indicator line
pub trait IndicatorLine {
    type Error: From<HalError>;

    /// Set the indicator level (true = on)
    fn set_indicator(&mut self, on: bool) -> Result<(), Self::Error>;
}

/// Trait for driving the physical output lines.
///
/// Callers gate all writes through the interlock controller; nothing else
/// should reach for these methods directly.
pub trait OutputBoard: IndicatorLine {
    /// Drive one output line (true = on)
    fn set_output(&mut self, bank: Bank, channel: usize, on: bool) -> Result<(), Self::Error>;

    /// Force every output line of both banks off
    fn disable_all_outputs(&mut self) -> Result<(), Self::Error> {
        for channel in 0..NUM_IO_CHANNELS {
            self.set_output(Bank::Bank0, channel, false)?;
            self.set_output(Bank::Bank1, channel, false)?;
        }
        Ok(())
    }
}

/// Board built from embedded-hal compatible pins
pub struct PinBoard<I, O> {
    inputs: [I; NUM_IO_CHANNELS],
    outputs: [[O; NUM_IO_CHANNELS]; 2],
    indicator: O,
}

impl<I, O> PinBoard<I, O>
where
    I: InputPin,
    O: OutputPin,
{
    pub fn new(
        inputs: [I; NUM_IO_CHANNELS],
        bank0: [O; NUM_IO_CHANNELS],
        bank1: [O; NUM_IO_CHANNELS],
        indicator: O,
    ) -> Self {
        Self {
            inputs,
            outputs: [bank0, bank1],
            indicator,
        }
    }
}

impl<I, O> InputBoard for PinBoard<I, O>
where
    I: InputPin,
    O: OutputPin,
{
    type Error = HalError;

    fn input_level(&mut self, channel: usize) -> Result<bool, Self::Error> {
        let pin = self.inputs.get_mut(channel).ok_or(HalError::InvalidChannel)?;
        pin.is_high().map_err(|_| HalError::GpioError)
    }
}

impl<I, O> IndicatorLine for PinBoard<I, O>
where
    I: InputPin,
    O: OutputPin,
{
    type Error = HalError;

    fn set_indicator(&mut self, on: bool) -> Result<(), Self::Error> {
        set_pin(&mut self.indicator, on)
    }
}

impl<I, O> OutputBoard for PinBoard<I, O>
where
    I: InputPin,
    O: OutputPin,
{
    fn set_output(&mut self, bank: Bank, channel: usize, on: bool) -> Result<(), Self::Error> {
        let pin = self.outputs[bank.index()]
            .get_mut(channel)
            .ok_or(HalError::InvalidChannel)?;
        set_pin(pin, on)
    }
}

fn set_pin<P: OutputPin>(pin: &mut P, on: bool) -> Result<(), HalError> {
    if on {
        pin.set_high().map_err(|_| HalError::GpioError)
    } else {
        pin.set_low().map_err(|_| HalError::GpioError)
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    //! Mock board for single-threaded tests

    use super::*;
    use core::cell::RefCell;

    /// Plain-value snapshot of the simulated lines
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    pub struct MockBoardState {
        pub inputs: [bool; NUM_IO_CHANNELS],
        pub outputs: [[bool; NUM_IO_CHANNELS]; 2],
        pub indicator: bool,
    }

    #[derive(Default)]
    pub struct MockBoard {
        state: RefCell<MockBoardState>,
    }

    impl MockBoard {
        pub fn new() -> Self {
            Self::default()
        }

        /// Drive a simulated input line
        pub fn set_input(&self, channel: usize, on: bool) {
            self.state.borrow_mut().inputs[channel] = on;
        }

        pub fn outputs(&self) -> [[bool; NUM_IO_CHANNELS]; 2] {
            self.state.borrow().outputs
        }

        pub fn indicator(&self) -> bool {
            self.state.borrow().indicator
        }

        pub fn snapshot(&self) -> MockBoardState {
            *self.state.borrow()
        }
    }

    impl InputBoard for &MockBoard {
        type Error = HalError;

        fn input_level(&mut self, channel: usize) -> Result<bool, Self::Error> {
            if channel >= NUM_IO_CHANNELS {
                return Err(HalError::InvalidChannel);
            }
            Ok(self.state.borrow().inputs[channel])
        }
    }

    impl IndicatorLine for &MockBoard {
        type Error = HalError;

        fn set_indicator(&mut self, on: bool) -> Result<(), Self::Error> {
            self.state.borrow_mut().indicator = on;
            Ok(())
        }
    }

    impl OutputBoard for &MockBoard {
        fn set_output(&mut self, bank: Bank, channel: usize, on: bool) -> Result<(), Self::Error> {
            if channel >= NUM_IO_CHANNELS {
                return Err(HalError::InvalidChannel);
            }
            self.state.borrow_mut().outputs[bank.index()][channel] = on;
            Ok(())
        }
    }
}
