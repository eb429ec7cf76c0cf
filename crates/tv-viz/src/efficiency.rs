//! Efficiency comparison pages.
//!
//! Paths are split into pages of at most `page_size` entries, in table order,
//! with the Total on the last page.

use serde::Serialize;
use tv_core::{Dataset, Error, Result, TriggerLevel};
use tv_stats::PullResult;

use crate::meta::ArtifactMeta;

/// Paths per efficiency page.
pub const DEFAULT_PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, Serialize)]
pub struct EfficiencyArtifact {
    pub schema_version: String,
    pub meta: ArtifactMeta,
    pub level: TriggerLevel,
    /// Legend labels of the two inputs.
    pub dataset_labels: [String; 2],
    pub pages: Vec<EfficiencyPage>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EfficiencyPage {
    /// 1-based page number, used in the output file name.
    pub page: usize,
    pub paths: Vec<String>,
    pub efficiency1: Vec<f64>,
    pub uncertainty1: Vec<f64>,
    pub efficiency2: Vec<f64>,
    pub uncertainty2: Vec<f64>,
}

impl EfficiencyPage {
    /// Output file stem, e.g. `L1Eff_2`.
    pub fn file_stem(&self, level: TriggerLevel) -> String {
        format!("{}Eff_{}", level.as_str(), self.page)
    }
}

/// Split the efficiencies of both inputs into pages.
pub fn efficiency_artifact(
    level: TriggerLevel,
    result: &PullResult,
    dataset_labels: [String; 2],
    page_size: usize,
) -> Result<EfficiencyArtifact> {
    if page_size == 0 {
        return Err(Error::Validation("efficiency page size must be positive".into()));
    }
    let first = result.table(Dataset::First).entries();
    let second = result.table(Dataset::Second).entries();

    let pages = first
        .chunks(page_size)
        .zip(second.chunks(page_size))
        .enumerate()
        .map(|(i, (a, b))| EfficiencyPage {
            page: i + 1,
            paths: a.iter().map(|e| e.label.clone()).collect(),
            efficiency1: a.iter().map(|e| e.efficiency).collect(),
            uncertainty1: a.iter().map(|e| e.uncertainty).collect(),
            efficiency2: b.iter().map(|e| e.efficiency).collect(),
            uncertainty2: b.iter().map(|e| e.uncertainty).collect(),
        })
        .collect();

    Ok(EfficiencyArtifact {
        schema_version: "trigger_efficiency_v0".to_string(),
        meta: ArtifactMeta::now()?,
        level,
        dataset_labels,
        pages,
    })
}
