//! Test utilities: thread-safe board simulation, a scripted protocol
//! engine, and edge-burst scripting for integration tests.

pub mod sim {
    //! Thread-safe simulated board for multi-context tests

    use std::sync::{Arc, Mutex};

    use crate::hal::mock::MockBoardState;
    use crate::hal::{HalError, IndicatorLine, InputBoard, OutputBoard};
    use crate::types::{Bank, NUM_IO_CHANNELS};

    /// Cloneable board handle; all clones share one set of lines
    #[derive(Clone, Default)]
    pub struct SharedBoard {
        state: Arc<Mutex<MockBoardState>>,
    }

    impl SharedBoard {
        pub fn new() -> Self {
            Self::default()
        }

        /// Drive a simulated input line
        pub fn set_input(&self, channel: usize, on: bool) {
            self.state.lock().unwrap().inputs[channel] = on;
        }

        pub fn outputs(&self) -> [[bool; NUM_IO_CHANNELS]; 2] {
            self.state.lock().unwrap().outputs
        }

        pub fn indicator(&self) -> bool {
            self.state.lock().unwrap().indicator
        }

        pub fn snapshot(&self) -> MockBoardState {
            *self.state.lock().unwrap()
        }
    }

    impl InputBoard for SharedBoard {
        type Error = HalError;

        fn input_level(&mut self, channel: usize) -> Result<bool, Self::Error> {
            if channel >= NUM_IO_CHANNELS {
                return Err(HalError::InvalidChannel);
            }
            Ok(self.state.lock().unwrap().inputs[channel])
        }
    }

    impl IndicatorLine for SharedBoard {
        type Error = HalError;

        fn set_indicator(&mut self, on: bool) -> Result<(), Self::Error> {
            self.state.lock().unwrap().indicator = on;
            Ok(())
        }
    }

    impl OutputBoard for SharedBoard {
        fn set_output(&mut self, bank: Bank, channel: usize, on: bool) -> Result<(), Self::Error> {
            if channel >= NUM_IO_CHANNELS {
                return Err(HalError::InvalidChannel);
            }
            self.state.lock().unwrap().outputs[bank.index()][channel] = on;
            Ok(())
        }
    }
}

pub mod engine {
    //! Scripted protocol engine: replays a master's accesses against a
    //! register store

    use std::collections::VecDeque;
    use std::vec::Vec;

    use crate::bridge::{EventInfo, EventMask, RegisterEngine};
    use crate::hal::Duration;
    use crate::registers::RegisterStore;

    /// One master access in a script
    #[derive(Clone, Debug)]
    pub enum MasterAction {
        /// Write a run of coils starting at `start`
        WriteCoils { start: u16, values: Vec<bool> },
        ReadCoils { offset: u16, count: u16 },
        ReadDiscrete { offset: u16, count: u16 },
    }

    /// Convenience: a single-coil write
    pub fn write_coil(addr: u16, on: bool) -> MasterAction {
        MasterAction::WriteCoils {
            start: addr,
            values: vec![on],
        }
    }

    /// Engine stub that applies scripted writes to the bound store and
    /// reports them as events, one per `wait_for_event` call.
    pub struct ScriptedEngine<'s> {
        store: &'s RegisterStore,
        script: VecDeque<MasterAction>,
        last: Option<EventInfo>,
        clock_us: u32,
    }

    impl<'s> ScriptedEngine<'s> {
        pub fn new(store: &'s RegisterStore, script: impl IntoIterator<Item = MasterAction>) -> Self {
            Self {
                store,
                script: script.into_iter().collect(),
                last: None,
                clock_us: 0,
            }
        }

        /// Append another access to the running script
        pub fn push(&mut self, action: MasterAction) {
            self.script.push_back(action);
        }

        pub fn remaining(&self) -> usize {
            self.script.len()
        }
    }

    impl RegisterEngine for ScriptedEngine<'_> {
        type Error = ();

        fn wait_for_event(
            &mut self,
            mask: EventMask,
            _timeout: Duration,
        ) -> Result<EventMask, Self::Error> {
            self.clock_us += 1000;
            let Some(action) = self.script.pop_front() else {
                // Idle bus: the wait bound elapsed with no event
                return Ok(EventMask::empty());
            };

            let (kind, offset, size) = match action {
                MasterAction::WriteCoils { start, values } => {
                    for (i, on) in values.iter().enumerate() {
                        self.store.write_coil(start + i as u16, *on);
                    }
                    (EventMask::COILS_WRITE, start, values.len() as u16)
                }
                MasterAction::ReadCoils { offset, count } => {
                    (EventMask::COILS_READ, offset, count)
                }
                MasterAction::ReadDiscrete { offset, count } => {
                    (EventMask::DISCRETE_READ, offset, count)
                }
            };

            let info = EventInfo {
                kind,
                offset,
                size,
                timestamp_us: self.clock_us,
            };
            if kind.intersects(mask) {
                self.last = Some(info);
                Ok(kind)
            } else {
                Ok(EventMask::empty())
            }
        }

        fn event_info(&mut self) -> Result<Option<EventInfo>, Self::Error> {
            Ok(self.last.take())
        }
    }
}

pub mod edge_script {
    //! Edge-burst scripting against the interrupt-facing capture handles

    use heapless::{String, Vec};

    use crate::debounce::ButtonEdge;
    use crate::edge::EdgeCapture;
    use crate::types::LineId;

    /// One raw edge in a script
    #[derive(Copy, Clone, Debug)]
    pub struct EdgeEvent {
        /// Offset from script start, for timed replay
        pub at_ms: u64,
        pub line: LineId,
    }

    /// A burst of raw input edges
    #[derive(Clone, Debug)]
    pub struct EdgeScript {
        pub events: Vec<EdgeEvent, 64>,
        pub description: String<32>,
    }

    impl EdgeScript {
        /// `count` edges on one line, evenly spaced
        pub fn input_burst(line: LineId, count: usize, spacing_ms: u64) -> Self {
            let mut events = Vec::new();
            for i in 0..count {
                events
                    .push(EdgeEvent {
                        at_ms: i as u64 * spacing_ms,
                        line,
                    })
                    .ok();
            }
            Self {
                events,
                description: String::try_from("Input burst").unwrap(),
            }
        }

        /// Fire every edge immediately, ignoring the timing offsets.
        /// Timed replay belongs to async tests that own a clock.
        pub fn execute(&self, capture: &EdgeCapture) {
            for event in &self.events {
                capture.on_input_edge(event.line);
            }
        }
    }

    /// Fire `count` rapid button presses, as a bouncy contact would
    pub fn button_burst(button: &ButtonEdge, count: usize) {
        for _ in 0..count {
            button.on_press_edge();
        }
    }
}

pub mod observer {
    //! Recording observer for cross-thread assertions

    use std::sync::{Arc, Mutex};
    use std::vec::Vec;

    use crate::service::IoObserver;

    #[derive(Default)]
    struct Record {
        toggles: usize,
        input_changes: Vec<usize>,
    }

    /// Cloneable observer that records every callback
    #[derive(Clone, Default)]
    pub struct RecordingObserver {
        inner: Arc<Mutex<Record>>,
    }

    impl RecordingObserver {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn toggles(&self) -> usize {
            self.inner.lock().unwrap().toggles
        }

        pub fn input_changes(&self) -> Vec<usize> {
            self.inner.lock().unwrap().input_changes.clone()
        }
    }

    impl IoObserver for RecordingObserver {
        fn on_local_toggle(&self) {
            self.inner.lock().unwrap().toggles += 1;
        }

        fn on_input_change(&self, channel: usize) {
            self.inner.lock().unwrap().input_changes.push(channel);
        }
    }
}
