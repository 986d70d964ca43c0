//! Board-agnostic core logic for the Rondel smart knob
//!
//! This crate contains all input and display-synchronization logic that
//! does not depend on specific hardware implementations:
//!
//! - Quadrature decode state machine for the rotary encoder
//! - Encoder value store and event callback registry
//! - Tear-effect synchronization gate
//! - Panel capability traits and error types

#![no_std]
#![deny(unsafe_code)]

pub mod input;
pub mod tear;
pub mod traits;
