//! Interrupt-side capture of input-channel edges.
//!
//! The interrupt context does O(1), non-blocking work only: it pushes the
//! raw hardware line identifier into a bounded queue and returns. Channel
//! resolution, level sampling, and register updates all happen later on the
//! consumer task.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use crate::types::LineId;

/// Capacity of the input-edge queue. An edge arriving while the queue is
/// full is dropped and no error is signaled; under sustained chatter the
/// discrete-input mirror can lag the lines.
pub const EDGE_QUEUE_CAPACITY: usize = 10;

/// Bounded FIFO carrying raw line identifiers from the interrupt context to
/// the event consumer.
pub type EdgeQueue = Channel<CriticalSectionRawMutex, LineId, EDGE_QUEUE_CAPACITY>;

/// Interrupt-facing handle for input-channel edges
#[derive(Copy, Clone)]
pub struct EdgeCapture {
    edges: &'static EdgeQueue,
}

impl EdgeCapture {
    pub const fn new(edges: &'static EdgeQueue) -> Self {
        Self { edges }
    }

    /// Record one raw edge. Safe to call from interrupt context: the
    /// enqueue is lock-free and a full queue drops the edge.
    pub fn on_input_edge(&self, line: LineId) {
        let _ = self.edges.try_send(line);
    }
}
