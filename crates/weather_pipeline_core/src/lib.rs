//! Shared weather pipeline domain primitives.
//!
//! This crate owns the weather record contract, its JSON codec, and the
//! pipeline error set. It intentionally excludes AWS SDK and Lambda runtime
//! concerns.

pub mod error;
pub mod event;
