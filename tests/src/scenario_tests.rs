//! End-to-end scenarios over the simulated board, the scripted engine, and
//! the real bridge/interlock path.

use rio_core::bridge::{EventMask, RegisterBridge};
use rio_core::edge::{EdgeCapture, EdgeQueue};
use rio_core::events::drain_queued;
use rio_core::interlock::Interlock;
use rio_core::registers::RegisterStore;
use rio_core::test_utils::edge_script::EdgeScript;
use rio_core::test_utils::engine::{write_coil, MasterAction, ScriptedEngine};
use rio_core::test_utils::sim::SharedBoard;
use rio_core::types::{InterlockState, NUM_IO_CHANNELS, OE_COIL_ADDR};

use embassy_sync::channel::Channel;

use crate::fixture::{StoreObserver, TEST_CHANNELS};

/// Drive every scripted engine event through the bridge into the interlock
fn run_script(
    store: &RegisterStore,
    board: &SharedBoard,
    ctrl: &mut Interlock,
    script: Vec<MasterAction>,
) {
    let steps = script.len();
    let engine = ScriptedEngine::new(store, script);
    let mut bridge = RegisterBridge::new(engine);
    let mut handler_board = board.clone();
    for _ in 0..steps {
        bridge
            .poll_once(|_info| {
                ctrl.on_remote_coil_write(store, &mut handler_board).unwrap();
            })
            .unwrap();
    }
}

#[test]
fn local_toggle_from_disabled_mirrors_coils_to_outputs() {
    // Scenario: coils_bank0 = 0b101 requested while disabled
    let store = RegisterStore::new();
    store.set_coil(0);
    store.set_coil(2);
    let mut board = SharedBoard::new();
    let mut ctrl = Interlock::new();

    assert_eq!(
        ctrl.on_local_toggle(&store, &mut board).unwrap(),
        InterlockState::Enabled
    );

    let outputs = board.outputs();
    assert!(outputs[0][0] && outputs[0][2]);
    assert!(!outputs[0][1]);
    assert!(store.coil(OE_COIL_ADDR));
    assert!(board.indicator());
}

#[test]
fn remote_single_coil_write_drives_output_while_enabled() {
    // Scenario: enabled, master writes coil 5 on without touching the mirror
    let store = RegisterStore::new();
    let board = SharedBoard::new();
    let mut ctrl = Interlock::new();
    ctrl.on_local_toggle(&store, &mut board.clone()).unwrap();

    run_script(&store, &board, &mut ctrl, vec![write_coil(5, true)]);

    assert!(board.outputs()[0][5]);
    assert_eq!(ctrl.state(), InterlockState::Enabled);
}

#[test]
fn remote_clear_of_mirror_forces_all_outputs_off() {
    // Scenario: enabled with several outputs driven, master clears bit 31
    let store = RegisterStore::new();
    store.set_coil(1);
    store.set_coil(20);
    let board = SharedBoard::new();
    let mut ctrl = Interlock::new();
    ctrl.on_local_toggle(&store, &mut board.clone()).unwrap();
    assert!(board.outputs()[1][4]);

    run_script(
        &store,
        &board,
        &mut ctrl,
        vec![write_coil(OE_COIL_ADDR, false)],
    );

    assert_eq!(ctrl.state(), InterlockState::Disabled);
    assert_eq!(board.outputs(), [[false; NUM_IO_CHANNELS]; 2]);
    assert!(!board.indicator());
}

#[test]
fn writes_while_disabled_are_recorded_but_not_driven() {
    let store = RegisterStore::new();
    let board = SharedBoard::new();
    let mut ctrl = Interlock::new();

    run_script(
        &store,
        &board,
        &mut ctrl,
        vec![write_coil(3, true), write_coil(17, true)],
    );

    assert_eq!(ctrl.state(), InterlockState::Disabled);
    assert_eq!(board.outputs(), [[false; NUM_IO_CHANNELS]; 2]);
    assert!(store.coil(3) && store.coil(17));

    // The recorded requests surface the moment the master enables
    run_script(
        &store,
        &board,
        &mut ctrl,
        vec![write_coil(OE_COIL_ADDR, true)],
    );
    assert!(board.outputs()[0][3]);
    assert!(board.outputs()[1][1]);
}

#[test]
fn block_write_lands_as_one_event() {
    let store = RegisterStore::new();
    let board = SharedBoard::new();
    let mut ctrl = Interlock::new();
    ctrl.on_local_toggle(&store, &mut board.clone()).unwrap();

    let engine = ScriptedEngine::new(
        &store,
        vec![MasterAction::WriteCoils {
            start: 16,
            values: vec![true, false, true, true],
        }],
    );
    let mut bridge = RegisterBridge::new(engine);
    let mut handler_board = board.clone();
    let mut writes = 0;
    let info = bridge
        .poll_once(|info| {
            writes += 1;
            assert_eq!(info.offset, 16);
            assert_eq!(info.size, 4);
            ctrl.on_remote_coil_write(&store, &mut handler_board).unwrap();
        })
        .unwrap()
        .unwrap();

    assert_eq!(writes, 1);
    assert_eq!(info.kind, EventMask::COILS_WRITE);
    let outputs = board.outputs();
    assert_eq!(outputs[1][..4], [true, false, true, true]);
}

#[test]
fn read_events_are_observed_without_state_change() {
    let store = RegisterStore::new();
    let ctrl = Interlock::new();

    let engine = ScriptedEngine::new(
        &store,
        vec![
            MasterAction::ReadDiscrete { offset: 0, count: 16 },
            MasterAction::ReadCoils { offset: 0, count: 32 },
        ],
    );
    let mut bridge = RegisterBridge::new(engine);
    let mut writes = 0;

    let first = bridge.poll_once(|_| writes += 1).unwrap().unwrap();
    assert_eq!(first.kind, EventMask::DISCRETE_READ);
    let second = bridge.poll_once(|_| writes += 1).unwrap().unwrap();
    assert_eq!(second.kind, EventMask::COILS_READ);

    assert_eq!(writes, 0);
    assert_eq!(ctrl.state(), InterlockState::Disabled);
    // Engine timestamps advance monotonically
    assert!(second.timestamp_us > first.timestamp_us);
}

#[test]
fn settled_input_transitions_mirror_into_discrete_bits() {
    static QUEUE: EdgeQueue = Channel::new();
    let store = crate::fixture::leaked_store();
    let board = SharedBoard::new();
    let capture = EdgeCapture::new(&QUEUE);
    let observer = StoreObserver {
        store,
        board: board.clone(),
    };

    // Line 15 is channel 4; it bounces three times and settles high
    board.set_input(4, true);
    EdgeScript::input_burst(15, 3, 5).execute(&capture);

    let mut sample_board = board.clone();
    drain_queued(&QUEUE, &TEST_CHANNELS, &mut sample_board, &observer);

    assert_eq!(store.discrete_inputs(), 1 << 4);

    // Settling low clears exactly that bit
    board.set_input(4, false);
    capture.on_input_edge(15);
    drain_queued(&QUEUE, &TEST_CHANNELS, &mut sample_board, &observer);
    assert_eq!(store.discrete_inputs(), 0);
}

#[test]
fn spurious_lines_do_not_disturb_the_store() {
    static QUEUE: EdgeQueue = Channel::new();
    let store = crate::fixture::leaked_store();
    let board = SharedBoard::new();
    let capture = EdgeCapture::new(&QUEUE);
    let observer = StoreObserver {
        store,
        board: board.clone(),
    };

    capture.on_input_edge(3); // button line, not an input channel
    capture.on_input_edge(999);

    let mut sample_board = board.clone();
    let serviced = drain_queued(&QUEUE, &TEST_CHANNELS, &mut sample_board, &observer);
    assert_eq!(serviced, 0);
    assert_eq!(store.discrete_inputs(), 0);
}
