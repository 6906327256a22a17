//! AWS-oriented adapters and handlers for the weather event pipeline.
//!
//! This crate owns runtime integration details (Lambda handlers, queue
//! publishing, and storage adapters) and exposes a single runtime module
//! boundary for the weather record contract and error primitives.

pub mod adapters;
pub mod handlers;
pub mod log;
pub mod runtime;
