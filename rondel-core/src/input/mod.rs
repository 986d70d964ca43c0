//! Rotary encoder input primitives
//!
//! The decoder itself lives in [`quadrature`]; this module holds the
//! shared types around it: the edge events the relay hands to the decoder
//! task, the signed value store read by pollers, and the per-event
//! callback registry.

pub mod quadrature;

pub use quadrature::QuadratureDecoder;

use portable_atomic::{AtomicI32, Ordering};

/// Encoder phase line identifier
///
/// Carried through the edge relay so the decoder knows which phase an
/// edge belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    A,
    B,
}

/// A single sampled edge on one encoder phase line
///
/// Produced by the edge relay task immediately after the pin interrupt
/// fires; the level is re-sampled for that pin only, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EdgeEvent {
    pub phase: Phase,
    pub level: bool,
}

/// Committed rotation direction for one decode cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Clockwise step (phase A leading)
    Increment,
    /// Counter-clockwise step (phase B leading)
    Decrement,
}

/// Encoder events a listener can register for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncoderEvent {
    Increment,
    Decrement,
}

impl From<Direction> for EncoderEvent {
    fn from(dir: Direction) -> Self {
        match dir {
            Direction::Increment => EncoderEvent::Increment,
            Direction::Decrement => EncoderEvent::Decrement,
        }
    }
}

/// Signed encoder accumulator
///
/// Written only by the decoder task, exactly +-1 per committed decode
/// cycle. Read by any poller as a snapshot; single-word atomics keep the
/// reads tear-free without blocking the writer.
pub struct EncoderCounter {
    value: AtomicI32,
}

impl EncoderCounter {
    pub const fn new() -> Self {
        Self {
            value: AtomicI32::new(0),
        }
    }

    /// Apply one committed direction decision
    pub fn apply(&self, dir: Direction) {
        match dir {
            Direction::Increment => self.value.fetch_add(1, Ordering::Relaxed),
            Direction::Decrement => self.value.fetch_sub(1, Ordering::Relaxed),
        };
    }

    /// Snapshot the accumulated value
    pub fn get(&self) -> i32 {
        self.value.load(Ordering::Relaxed)
    }
}

impl Default for EncoderCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-event listener registry
///
/// One optional listener per [`EncoderEvent`]. Registration is a one-time
/// setup step before the decoder task starts; no synchronization is
/// provided for registering concurrently with dispatch. Listeners run
/// synchronously in the decoder task's context, never in interrupt
/// context, so they may block.
///
/// Closure capture takes the place of an opaque user-data pointer.
#[derive(Default)]
pub struct EncoderCallbacks<'a> {
    on_increment: Option<&'a (dyn Fn() + Sync)>,
    on_decrement: Option<&'a (dyn Fn() + Sync)>,
}

impl<'a> EncoderCallbacks<'a> {
    pub const fn new() -> Self {
        Self {
            on_increment: None,
            on_decrement: None,
        }
    }

    /// Register a listener for one encoder event
    pub fn register(&mut self, event: EncoderEvent, listener: &'a (dyn Fn() + Sync)) {
        match event {
            EncoderEvent::Increment => self.on_increment = Some(listener),
            EncoderEvent::Decrement => self.on_decrement = Some(listener),
        }
    }

    /// Look up and invoke the listener for an event, if any
    pub fn dispatch(&self, event: EncoderEvent) {
        let listener = match event {
            EncoderEvent::Increment => self.on_increment,
            EncoderEvent::Decrement => self.on_decrement,
        };
        if let Some(cb) = listener {
            cb();
        }
    }
}
