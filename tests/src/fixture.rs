//! Shared fixtures: the reference channel table and an observer that wires
//! callbacks to a register store the way a real owner does.

use rio_core::hal::InputBoard;
use rio_core::registers::RegisterStore;
use rio_core::service::IoObserver;
use rio_core::test_utils::sim::SharedBoard;
use rio_core::types::ChannelTable;

/// Reference board line assignments
pub static TEST_CHANNELS: ChannelTable = ChannelTable {
    inputs: [4, 5, 6, 7, 15, 16, 17, 9, 8, 18],
    outputs_bank0: [10, 12, 14, 47, 39, 40, 41, 42, 2, 1],
    outputs_bank1: [46, 11, 13, 21, 48, 45, 35, 36, 37, 38],
};

/// A store with process lifetime, as the real owner holds it
pub fn leaked_store() -> &'static RegisterStore {
    Box::leak(Box::new(RegisterStore::new()))
}

/// Observer that mirrors settled input levels into the store, the way the
/// owning application wires it.
#[derive(Clone)]
pub struct StoreObserver {
    pub store: &'static RegisterStore,
    pub board: SharedBoard,
}

impl IoObserver for StoreObserver {
    fn on_local_toggle(&self) {}

    fn on_input_change(&self, channel: usize) {
        let mut board = self.board.clone();
        if let Ok(level) = board.input_level(channel) {
            self.store.write_discrete_input(channel, level);
        }
    }
}
