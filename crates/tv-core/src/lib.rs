//! # tv-core
//!
//! Core types and error handling for trigger-comparison.
//!
//! This crate provides:
//! - The shared error taxonomy
//! - `Histogram1D`, the in-memory histogram every input source produces
//! - Small enums shared by the statistics and rendering crates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod histogram;
pub mod types;

pub use error::{Error, Result};
pub use histogram::Histogram1D;
pub use types::{CorrelationMode, Dataset, ObjectKind, TriggerLevel};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
