//! Inter-task communication channels
//!
//! Defines the static channels and synchronization primitives used for
//! communication between Embassy tasks. Uses embassy-sync primitives for
//! safe async communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use portable_atomic::AtomicU32;

use rondel_core::input::{EdgeEvent, EncoderCounter};
use rondel_core::tear::TearGate;

/// Queue depth for relayed encoder pin edges
pub const EDGE_QUEUE_DEPTH: usize = 10;

/// Encoder pin edges, relayed from the pin interrupts to the decoder task
///
/// FIFO order holds only among successfully enqueued edges; a full queue
/// drops the edge and bumps [`DROPPED_EDGES`].
pub static EDGE_EVENTS: Channel<CriticalSectionRawMutex, EdgeEvent, EDGE_QUEUE_DEPTH> =
    Channel::new();

/// Count of encoder edges lost to a full relay queue
///
/// A dropped edge costs at most one missed step; the decoder never
/// commits a stale direction because of one.
pub static DROPPED_EDGES: AtomicU32 = AtomicU32::new(0);

/// Signed encoder accumulator, written by the decoder task, polled by the UI
pub static ENCODER: EncoderCounter = EncoderCounter::new();

/// Tear-effect gate mirroring the panel's TE line
pub static TEAR_GATE: TearGate<CriticalSectionRawMutex> = TearGate::new();
