//! Parameter pipeline for the fixed-point hardware inference engine.
//!
//! The pipeline turns a trained scene snapshot into the byte stream the
//! engine loads at startup: [`quantize`] maps floats onto signed 16-bit
//! fixed-point codes, [`layout`] reorders each weight matrix into the
//! weight-stationary buffer order, [`bitfield`] compresses the occupancy
//! grid, and [`stream`] frames everything into length-prefixed chunks.

pub mod bitfield;
pub mod layout;
pub mod quantize;
pub mod stream;

pub use crate::error::Error;
