//! # tv-viz
//!
//! Visualization data artifacts for trigger-comparison.
//!
//! Every artifact is a plot-friendly JSON structure (arrays instead of nested
//! objects) with a `schema_version` and a `meta` block. Renderers in
//! `tv-viz-render` consume them; the results file embeds them.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Compatibility summaries (one bar per trigger path) and the results bundle.
pub mod compat;
/// Per-path efficiency pages for both inputs.
pub mod efficiency;
/// Artifact metadata shared by all schemas.
pub mod meta;
/// Overlay of two distributions of the same quantity.
pub mod overlay;
/// Pulls and residuals per trigger path.
pub mod pulls;
/// The combined results file.
pub mod results;

pub use compat::{CompatibilityResultsArtifact, CompatibilitySummaryArtifact};
pub use efficiency::{EfficiencyArtifact, EfficiencyPage};
pub use meta::ArtifactMeta;
pub use overlay::{OverlayArtifact, OverlaySeries};
pub use pulls::PullsArtifact;
pub use results::{InputMeta, LevelResults, TriggerValidationResults};
