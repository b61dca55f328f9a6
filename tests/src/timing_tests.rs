//! Async tests driving the real task bodies under wall-clock time.

use std::time::Duration as StdDuration;

use embassy_sync::channel::Channel;
use tokio::time::sleep;

use rio_core::debounce::{debounce_task, ButtonEdge};
use rio_core::edge::{EdgeCapture, EdgeQueue};
use rio_core::events::input_event_task;
use rio_core::hal::Duration;
use rio_core::test_utils::observer::RecordingObserver;
use rio_core::test_utils::sim::SharedBoard;

use crate::fixture::TEST_CHANNELS;

const WINDOW: Duration = Duration::from_millis(100);

fn leaked_button() -> &'static ButtonEdge {
    Box::leak(Box::new(ButtonEdge::new()))
}

#[tokio::test]
async fn burst_of_presses_emits_one_toggle_per_window() {
    let button = leaked_button();
    let observer = RecordingObserver::new();

    let task = tokio::spawn(debounce_task(button, WINDOW, observer.clone()));

    // Five bouncy edges inside one window
    for _ in 0..5 {
        button.on_press_edge();
        sleep(StdDuration::from_millis(10)).await;
    }
    sleep(StdDuration::from_millis(300)).await;
    assert_eq!(observer.toggles(), 1);

    // A fresh press after the window is a fresh toggle
    button.on_press_edge();
    sleep(StdDuration::from_millis(300)).await;
    assert_eq!(observer.toggles(), 2);

    task.abort();
}

#[tokio::test]
async fn toggle_trails_the_last_edge_by_the_window() {
    let button = leaked_button();
    let observer = RecordingObserver::new();

    let task = tokio::spawn(debounce_task(button, WINDOW, observer.clone()));

    button.on_press_edge();
    // Halfway through, the contact bounces again: window restarts
    sleep(StdDuration::from_millis(60)).await;
    button.on_press_edge();

    // Original deadline passed, restarted window still open
    sleep(StdDuration::from_millis(60)).await;
    assert_eq!(observer.toggles(), 0);

    sleep(StdDuration::from_millis(100)).await;
    assert_eq!(observer.toggles(), 1);

    task.abort();
}

#[tokio::test]
async fn consumer_blocks_until_edges_arrive() {
    static QUEUE: EdgeQueue = Channel::new();
    let board = SharedBoard::new();
    let observer = RecordingObserver::new();
    let capture = EdgeCapture::new(&QUEUE);

    let task = tokio::spawn(input_event_task(
        &QUEUE,
        &TEST_CHANNELS,
        board.clone(),
        observer.clone(),
    ));

    sleep(StdDuration::from_millis(50)).await;
    assert!(observer.input_changes().is_empty());

    board.set_input(0, true);
    capture.on_input_edge(4); // channel 0
    capture.on_input_edge(18); // channel 9
    capture.on_input_edge(999); // spurious, ignored

    sleep(StdDuration::from_millis(100)).await;
    assert_eq!(observer.input_changes(), vec![0, 9]);

    task.abort();
}
