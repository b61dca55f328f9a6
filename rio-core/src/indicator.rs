//! Status indicator behaviors.
//!
//! The steady behavior (on = outputs enabled) is driven synchronously by
//! the interlock controller and needs no code here. This module holds the
//! other behavior: the connectivity-loss alarm, a repeating short/long/long
//! blink that takes ownership of the line once started and runs until
//! process restart.

use crate::hal::{Duration, IndicatorLine};

/// Base element duration of the alarm pattern
pub const ALARM_UNIT: Duration = Duration::from_millis(250);

/// Long element: three base units
pub const ALARM_LONG: Duration = Duration::from_millis(750);

/// One step of a blink pattern
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BlinkStep {
    pub level: bool,
    pub hold: Duration,
}

/// Connectivity-loss alarm: short, long, long, with one base unit between
/// elements and a long pause before each repetition.
pub const ALARM_PATTERN: [BlinkStep; 6] = [
    BlinkStep {
        level: true,
        hold: ALARM_UNIT,
    },
    BlinkStep {
        level: false,
        hold: ALARM_UNIT,
    },
    BlinkStep {
        level: true,
        hold: ALARM_LONG,
    },
    BlinkStep {
        level: false,
        hold: ALARM_UNIT,
    },
    BlinkStep {
        level: true,
        hold: ALARM_LONG,
    },
    BlinkStep {
        level: false,
        hold: ALARM_LONG,
    },
];

/// Run the alarm pattern forever.
///
/// The task owns the line from the moment it starts and is not meant to be
/// stopped. Start it only once the interlock and store are already torn
/// down. Line errors are swallowed; there is nobody left to report them to.
#[cfg(feature = "embassy-time")]
pub async fn alarm_blink_task<L: IndicatorLine>(mut line: L) {
    use embassy_time::Timer;

    let _ = line.set_indicator(false);
    loop {
        for step in &ALARM_PATTERN {
            let _ = line.set_indicator(step.level);
            Timer::after(step.hold).await;
        }
    }
}
