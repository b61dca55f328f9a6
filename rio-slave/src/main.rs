//! Remote digital I/O field-bus slave.
//!
//! Wires the core engine to the simulated board and protocol engine:
//! debounce and consumer tasks run on the embassy executor, the register
//! bridge runs on its own thread (its engine wait is blocking), and an
//! edge-generator thread plays the interrupt context.

use std::thread;
use std::time::Duration as StdDuration;

use anyhow::{anyhow, Context};
use clap::Parser;
use embassy_executor::Spawner;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use tracing_subscriber::EnvFilter;

use rio_core::bridge::RegisterBridge;
use rio_core::types::IoConfig;

use rio_slave::board::{Board, BoardLines};
use rio_slave::engine::{ConnectionLost, SimEngine};
use rio_slave::services::{self, STORE};
use rio_slave::sim;

#[derive(Parser, Debug)]
#[command(name = "rio-slave", about = "Remote digital I/O slave over a simulated field bus")]
struct Args {
    /// Button debounce window in milliseconds
    #[arg(long, default_value_t = 250)]
    debounce_ms: u64,

    /// Simulated master poll period in milliseconds
    #[arg(long, default_value_t = 500)]
    master_period_ms: u64,

    /// Simulated field-wiring edge period in milliseconds
    #[arg(long, default_value_t = 1500)]
    edge_period_ms: u64,

    /// Drop the simulated connection after serving this many events
    #[arg(long)]
    drop_connection_after: Option<u32>,
}

static LINES: BoardLines = BoardLines::new();
static CONNECTIVITY_LOST: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Waits for the connectivity-lost notification, then takes ownership of
/// the status line and blinks the alarm until process restart.
#[embassy_executor::task]
async fn alarm_on_connectivity_loss(board: Board) {
    CONNECTIVITY_LOST.wait().await;
    tracing::warn!("starting status alarm");
    rio_core::indicator::alarm_blink_task(board).await
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = run(spawner).await {
        tracing::error!("startup failed: {err:#}");
        std::process::exit(1);
    }
}

async fn run(spawner: Spawner) -> anyhow::Result<()> {
    let args = Args::parse();
    let config = IoConfig::new(args.debounce_ms).map_err(|err| anyhow!(err))?;

    let mut board = Board::new(&LINES);
    services::configure(board).map_err(|err| anyhow!("line setup failed: {err}"))?;

    // Seed the discrete-input bits before the engine serves the area
    STORE
        .sample_inputs(&mut board)
        .map_err(|err| anyhow!("input probe failed: {err}"))?;

    services::start(&spawner, board, &config)?;
    spawner
        .spawn(alarm_on_connectivity_loss(board))
        .map_err(|_| anyhow!("alarm task spawn failed"))?;

    sim::spawn_edge_generator(&LINES, StdDuration::from_millis(args.edge_period_ms))
        .context("edge generator spawn failed")?;

    let engine = SimEngine::new(&STORE, args.master_period_ms, args.drop_connection_after);
    thread::Builder::new()
        .name("bridge".into())
        .spawn(move || run_bridge(engine, board))
        .context("bridge thread spawn failed")?;

    tracing::info!(version = rio_core::VERSION, "slave running");
    loop {
        embassy_time::Timer::after(embassy_time::Duration::from_secs(60)).await;
        tracing::trace!("heartbeat");
    }
}

/// Bridge loop: blocks on the engine, observes reads, applies coil writes
/// through the interlock. Exits only when the engine reports the link lost.
fn run_bridge(engine: SimEngine, board: Board) {
    let mut bridge = RegisterBridge::new(engine);
    loop {
        let polled = bridge.poll_once(|info| {
            match services::on_remote_coil_write(board) {
                Ok(state) => tracing::info!(
                    offset = info.offset,
                    size = info.size,
                    enabled = state.is_enabled(),
                    "coils write applied"
                ),
                Err(err) => tracing::error!(?err, "remote coil write failed"),
            }
        });
        match polled {
            Ok(Some(info)) => tracing::debug!(
                kind = ?info.kind,
                offset = info.offset,
                size = info.size,
                timestamp_us = info.timestamp_us,
                "register access"
            ),
            Ok(None) => {} // engine wait bound elapsed; retry
            Err(ConnectionLost) => {
                tracing::warn!("protocol engine connection lost");
                if let Err(err) = services::stop(board) {
                    tracing::error!(%err, "teardown failed");
                }
                CONNECTIVITY_LOST.signal(());
                return;
            }
        }
    }
}
