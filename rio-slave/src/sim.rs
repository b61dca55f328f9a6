//! Simulated field wiring: a thread that plays the interrupt context,
//! flipping input lines and pressing the output-enable button the way a
//! plant and an operator would (contact bounce included).

use std::thread;
use std::time::Duration as StdDuration;

use rio_core::edge::EdgeCapture;
use rio_core::types::NUM_IO_CHANNELS;

use crate::board::{BoardLines, DI_LINES};
use crate::services::{BUTTON, EDGES};

pub fn spawn_edge_generator(
    lines: &'static BoardLines,
    period: StdDuration,
) -> std::io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("edge-gen".into())
        .spawn(move || {
            let capture = EdgeCapture::new(&EDGES);
            let mut tick: usize = 0;
            loop {
                thread::sleep(period);

                // Walk the inputs; a changing line reports its raw edge
                let channel = tick % NUM_IO_CHANNELS;
                lines.toggle_input(channel);
                capture.on_input_edge(DI_LINES[channel]);

                // Press the OE button now and then; a real switch bounces,
                // so several raw edges arrive per press
                if tick % 7 == 3 {
                    for _ in 0..4 {
                        BUTTON.on_press_edge();
                    }
                }
                tick += 1;
            }
        })
}
