//! Embassy task implementations

pub mod input;
pub mod tear;
pub mod ui;
