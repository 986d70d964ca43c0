//! Encoder input tasks
//!
//! Two edge relay tasks (one per phase pin) and the single decoder task
//! consuming them. The relays do no decoding: they wake on a pin edge,
//! re-sample that pin only and hand the edge to the bounded queue with a
//! non-blocking send. All decode state lives in the decoder task.

use defmt::*;
use embassy_rp::gpio::Input;
use portable_atomic::Ordering;

use rondel_core::input::{EdgeEvent, EncoderCallbacks, EncoderEvent, Phase, QuadratureDecoder};

use crate::channels::{DROPPED_EDGES, EDGE_EVENTS, ENCODER};

/// Edge relay for one encoder phase pin
///
/// The enqueue must never block: on a full queue the edge is dropped and
/// counted. A dropped edge can cost a step, so the counter is the place
/// to look when navigation feels like it skips.
#[embassy_executor::task(pool_size = 2)]
pub async fn edge_relay_task(mut pin: Input<'static>, phase: Phase) {
    info!("Edge relay started for phase {:?}", phase);

    loop {
        pin.wait_for_any_edge().await;
        let event = EdgeEvent {
            phase,
            level: pin.is_high(),
        };
        if EDGE_EVENTS.try_send(event).is_err() {
            let total = DROPPED_EDGES.fetch_add(1, Ordering::Relaxed) + 1;
            warn!("Edge queue full, dropped {:?} edge ({} dropped total)", phase, total);
        }
    }
}

fn log_increment() {
    debug!("Encoder step: increment");
}

fn log_decrement() {
    debug!("Encoder step: decrement");
}

/// Decoder task - single consumer of the edge relay queue
///
/// Listeners run here, synchronously, never in interrupt context, so
/// they are free to block without affecting edge capture.
#[embassy_executor::task]
pub async fn decoder_task(initial_a: bool, initial_b: bool) {
    info!("Encoder decoder task started");

    let mut decoder = QuadratureDecoder::new(initial_a, initial_b);
    let mut callbacks = EncoderCallbacks::new();
    callbacks.register(EncoderEvent::Increment, &log_increment);
    callbacks.register(EncoderEvent::Decrement, &log_decrement);

    loop {
        let edge = EDGE_EVENTS.receive().await;
        if let Some(dir) = decoder.on_edge(edge) {
            ENCODER.apply(dir);
            callbacks.dispatch(dir.into());
        }
    }
}
