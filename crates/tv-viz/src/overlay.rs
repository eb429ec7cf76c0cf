//! Overlay of two distributions of the same quantity.
//!
//! Each series is scaled to unit area so shapes can be compared regardless
//! of sample size; errors are `sqrt(sumw2)` scaled by the same factor.

use serde::Serialize;
use tv_core::{Error, Histogram1D, Result};
use tv_stats::CompatibilityScore;

use crate::meta::ArtifactMeta;

#[derive(Debug, Clone, Serialize)]
pub struct OverlayArtifact {
    pub schema_version: String,
    pub meta: ArtifactMeta,
    pub name: String,
    pub title: String,
    pub bin_edges: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bin_labels: Option<Vec<String>>,
    pub series: Vec<OverlaySeries>,
    pub compatibility: CompatibilityScore,
}

#[derive(Debug, Clone, Serialize)]
pub struct OverlaySeries {
    pub label: String,
    pub entries: f64,
    pub y: Vec<f64>,
    pub yerr: Vec<f64>,
}

fn unit_area_series(h: &Histogram1D, label: &str) -> Result<OverlaySeries> {
    let total = h.total();
    if total <= 0.0 {
        return Err(Error::Computation(format!("{}: cannot normalise an empty histogram", h.name)));
    }
    Ok(OverlaySeries {
        label: label.to_string(),
        entries: h.entries(),
        y: h.bin_content.iter().map(|v| v / total).collect(),
        yerr: (0..h.n_bins()).map(|i| h.bin_error(i) / total).collect(),
    })
}

/// Build the overlay of `h1` (first input) and `h2` (second input).
pub fn overlay_artifact(
    name: &str,
    h1: &Histogram1D,
    h2: &Histogram1D,
    dataset_labels: [&str; 2],
    compatibility: CompatibilityScore,
) -> Result<OverlayArtifact> {
    h1.check_same_binning(h2)?;
    let title = if h1.title.is_empty() { name.to_string() } else { h1.title.clone() };
    Ok(OverlayArtifact {
        schema_version: "trigger_overlay_v0".to_string(),
        meta: ArtifactMeta::now()?,
        name: name.to_string(),
        title,
        bin_edges: h1.edges(),
        bin_labels: h1.labels.clone(),
        series: vec![
            unit_area_series(h1, dataset_labels[0])?,
            unit_area_series(h2, dataset_labels[1])?,
        ],
        compatibility,
    })
}
