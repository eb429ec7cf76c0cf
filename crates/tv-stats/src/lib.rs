//! # tv-stats
//!
//! Statistical core of trigger-comparison.
//!
//! - [`efficiency`]: per-path efficiencies and binomial uncertainties read off a
//!   trigger-bits histogram
//! - [`pulls`]: residuals and pulls between two efficiency tables
//! - [`compat`]: two-sample chi-square compatibility and the name → score map
//! - [`keys`]: the compatibility summary keys and their prefix selection

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod compat;
pub mod efficiency;
pub mod keys;
pub mod pulls;

pub use compat::{CompatibilityMap, CompatibilityScore, chi2_test};
pub use efficiency::{BinContent, EfficiencyEntry, EfficiencyTable};
pub use pulls::{PullCalculator, PullEntry, PullResult};
