//! TE line watcher task
//!
//! Mirrors every transition of the panel's tearing-effect line into the
//! shared [`TearGate`](rondel_core::tear::TearGate): rising edge opens
//! the gate (blanking interval), falling edge closes it. The flush
//! pipeline blocks on the gate when full-refresh mode is enabled.

use defmt::*;
use embassy_rp::gpio::Input;

use crate::channels::TEAR_GATE;

#[embassy_executor::task]
pub async fn tear_watch_task(mut te: Input<'static>) {
    info!("TE watcher started");

    loop {
        te.wait_for_any_edge().await;
        TEAR_GATE.on_te_edge(te.is_high());
    }
}
