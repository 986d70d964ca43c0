//! Hardware abstraction traits
//!
//! Seams between the board-agnostic logic and the concrete transports:
//! the panel command interface and the panel capability set implemented
//! by each controller family.

pub mod panel;

pub use panel::{ColorOrder, Panel, PanelConfig, PanelError, PanelIo, Rect};
