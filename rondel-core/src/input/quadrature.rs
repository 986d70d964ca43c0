//! Two-phase Gray-code quadrature decoder
//!
//! Decodes EC11-style rotary encoder edges into directional steps. Each
//! relayed edge re-samples a single phase line; a direction is decided on
//! the first phase edge of a cycle and committed when the second phase
//! catches up, so one decode cycle yields exactly one +-1 step.

use super::{Direction, EdgeEvent, Phase};

/// Quadrature decode state machine
///
/// Owned exclusively by the decoder task; never touched from interrupt
/// context. The relay queue delivers one [`EdgeEvent`] per pin interrupt
/// and [`on_edge`](Self::on_edge) advances the state machine.
pub struct QuadratureDecoder {
    /// Last observed level of phase A
    level_a: bool,
    /// Last observed level of phase B
    level_b: bool,
    /// Phase A has toggled in the current decode cycle
    changed_a: bool,
    /// Phase B has toggled in the current decode cycle
    changed_b: bool,
    /// Direction decided on the first edge of the cycle, committed on the second
    pending: Option<Direction>,
}

impl QuadratureDecoder {
    /// Create a decoder seeded with the initial phase levels
    ///
    /// The levels must be sampled once at startup, before any edge is
    /// relayed, or the first cycle may decode with an inverted sign.
    pub const fn new(initial_a: bool, initial_b: bool) -> Self {
        Self {
            level_a: initial_a,
            level_b: initial_b,
            changed_a: false,
            changed_b: false,
            pending: None,
        }
    }

    /// Feed one relayed edge; returns a direction when a cycle commits
    ///
    /// A decision is recorded on the first phase edge of a cycle (while
    /// the other phase is still unchanged and no decision is pending), by
    /// comparing the two stored levels: phase A moving while the levels
    /// differ is a clockwise step, phase B moving while they differ is
    /// counter-clockwise. The cycle closes, and the pending decision is
    /// committed, once both changed flags are set; the flags and the
    /// decision then reset together.
    ///
    /// Two consecutive edges on the same pin leave the other phase's
    /// changed flag unset, so the commit is deferred until that pin
    /// actually moves and the first toggle's direction stands.
    pub fn on_edge(&mut self, edge: EdgeEvent) -> Option<Direction> {
        match edge.phase {
            Phase::A => {
                if edge.level != self.level_a {
                    self.level_a = edge.level;
                    self.changed_a = true;
                    if !self.changed_b && self.pending.is_none() {
                        self.pending = Some(if self.level_a != self.level_b {
                            Direction::Increment
                        } else {
                            Direction::Decrement
                        });
                    }
                }
            }
            Phase::B => {
                if edge.level != self.level_b {
                    self.level_b = edge.level;
                    self.changed_b = true;
                    if !self.changed_a && self.pending.is_none() {
                        self.pending = Some(if self.level_a != self.level_b {
                            Direction::Decrement
                        } else {
                            Direction::Increment
                        });
                    }
                }
            }
        }

        if self.changed_a && self.changed_b {
            self.changed_a = false;
            self.changed_b = false;
            // A cycle that never recorded a decision (possible after
            // dropped edges) commits nothing rather than a stale step.
            return self.pending.take();
        }

        None
    }
}
