//! Event consumer: drains the edge queue and publishes settled level
//! changes to the registered observer.
//!
//! Queue draining is unconditional and single-threaded; there is no retry
//! or backpressure. Edges may coalesce while queued, so the consumer
//! samples the line level post hoc rather than trusting the level at
//! interrupt time.

use crate::edge::EdgeQueue;
use crate::hal::InputBoard;
use crate::service::IoObserver;
use crate::types::{ChannelTable, LineId};

/// Resolve one raw edge entry to its channel and sample the settled level.
///
/// Returns `None` for line identifiers that match no input channel (ignored
/// after the no-match scan) and for lines whose level cannot be read.
pub fn sample_edge<B: InputBoard>(
    line: LineId,
    table: &ChannelTable,
    board: &mut B,
) -> Option<(usize, bool)> {
    let Some(channel) = table.input_channel(line) else {
        #[cfg(feature = "defmt")]
        defmt::warn!("edge on unknown line {=u32}, ignored", line);
        return None;
    };
    match board.input_level(channel) {
        Ok(level) => Some((channel, level)),
        Err(_) => {
            #[cfg(feature = "defmt")]
            defmt::warn!("level read failed on channel {=usize}", channel);
            None
        }
    }
}

/// Drain whatever is queued right now, without waiting.
///
/// Returns the number of edges serviced. The async consumer is the normal
/// path; this sync variant serves owners that poll.
pub fn drain_queued<B, O>(
    edges: &EdgeQueue,
    table: &ChannelTable,
    board: &mut B,
    observer: &O,
) -> usize
where
    B: InputBoard,
    O: IoObserver,
{
    let mut serviced = 0;
    while let Ok(line) = edges.try_receive() {
        if let Some((channel, _level)) = sample_edge(line, table, board) {
            observer.on_input_change(channel);
            serviced += 1;
        }
    }
    serviced
}

/// Long-lived consumer: blocks on the edge queue forever and publishes one
/// observer notification per settled transition. Runs for the life of the
/// process.
#[cfg(feature = "embassy-time")]
pub async fn input_event_task<B, O>(
    edges: &'static EdgeQueue,
    table: &'static ChannelTable,
    mut board: B,
    observer: O,
) where
    B: InputBoard,
    O: IoObserver,
{
    loop {
        let line = edges.receive().await;
        #[cfg(feature = "defmt")]
        defmt::trace!("line {=u32} was interrupted", line);

        if let Some((channel, level)) = sample_edge(line, table, &mut board) {
            #[cfg(feature = "defmt")]
            defmt::info!("DI{=usize} changed to {=bool}", channel, level);
            #[cfg(not(feature = "defmt"))]
            let _ = level;
            observer.on_input_change(channel);
        }
    }
}
