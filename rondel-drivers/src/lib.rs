//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the capabilities
//! defined in rondel-core:
//!
//! - GC9A01 round LCD panel driver (command protocol + init sequence)
//! - Tear-synchronized frame flush pipeline
//! - Push button level reader

#![no_std]
#![deny(unsafe_code)]

pub mod button;
pub mod flush;
pub mod gc9a01;
