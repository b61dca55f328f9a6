#![cfg_attr(not(feature = "std"), no_std)]

//! # Rio Core
//!
//! Core logic for a remote digital I/O unit: interrupt-level edge capture,
//! button debounce, the shared register store, the output-enable interlock,
//! and the bridge onto an external field-bus protocol engine.
//!
//! Everything here is runtime-agnostic. Async task bodies live behind the
//! `embassy-time` feature; executor wiring and real hardware belong to the
//! owning application crate.

pub mod types;
pub mod hal;
pub mod registers;
pub mod edge;
pub mod debounce;
pub mod events;
pub mod interlock;
pub mod bridge;
pub mod indicator;
pub mod service;

#[cfg(feature = "test-utils")]
pub mod test_utils;


pub use types::*;
pub use hal::{Duration, HalError, IndicatorLine, InputBoard, Instant, OutputBoard};
pub use registers::{RegisterArea, RegisterAreaKind, RegisterStore};
pub use edge::{EdgeCapture, EdgeQueue, EDGE_QUEUE_CAPACITY};
pub use debounce::{ButtonEdge, DebounceState, Debouncer};
pub use events::{drain_queued, sample_edge};
pub use interlock::Interlock;
pub use bridge::{EventInfo, EventMask, RegisterBridge, RegisterEngine, READ_WRITE_MASK};
pub use service::{IoObserver, ObserverGate, ServiceError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration for the reference board
pub fn default_config() -> IoConfig {
    IoConfig {
        debounce: Duration::from_millis(250),
    }
}
