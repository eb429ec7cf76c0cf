//! Pull / residual artifact per trigger level.

use serde::Serialize;
use tv_core::{CorrelationMode, Result, TriggerLevel};
use tv_stats::PullResult;

use crate::meta::ArtifactMeta;

#[derive(Debug, Clone, Serialize)]
pub struct PullsArtifact {
    pub schema_version: String,
    pub meta: ArtifactMeta,
    pub level: TriggerLevel,
    pub correlation: CorrelationMode,
    pub labels: Vec<String>,
    pub efficiency1: Vec<f64>,
    pub efficiency2: Vec<f64>,
    pub residual: Vec<f64>,
    pub sigma: Vec<f64>,
    pub pull: Vec<f64>,
    /// False where the combined uncertainty was zero and `pull` is a placeholder.
    pub pull_defined: Vec<bool>,
}

impl PullsArtifact {
    /// Output file stem of the pull plot, e.g. `HLTPulls`.
    pub fn pulls_stem(&self) -> String {
        format!("{}Pulls", self.level.as_str())
    }

    /// Output file stem of the residual plot, e.g. `L1Residuals`.
    pub fn residuals_stem(&self) -> String {
        format!("{}Residuals", self.level.as_str())
    }
}

/// Flatten a [`PullResult`] into parallel arrays.
pub fn pulls_artifact(level: TriggerLevel, result: &PullResult) -> Result<PullsArtifact> {
    let e = result.entries();
    Ok(PullsArtifact {
        schema_version: "trigger_pulls_v0".to_string(),
        meta: ArtifactMeta::now()?,
        level,
        correlation: result.mode(),
        labels: e.iter().map(|p| p.label.clone()).collect(),
        efficiency1: e.iter().map(|p| p.efficiency1).collect(),
        efficiency2: e.iter().map(|p| p.efficiency2).collect(),
        residual: e.iter().map(|p| p.residual).collect(),
        sigma: e.iter().map(|p| p.sigma).collect(),
        pull: e.iter().map(|p| p.pull).collect(),
        pull_defined: e.iter().map(|p| p.pull_defined).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tv_core::Histogram1D;
    use tv_stats::PullCalculator;

    #[test]
    fn arrays_are_parallel_and_serialisable() {
        let h1 = Histogram1D::new("HltPaths", vec![50.0, 30.0, 80.0])
            .with_labels(["HLT_A", "HLT_B", "Total"])
            .with_entries(100.0);
        let h2 = Histogram1D::new("HltPaths", vec![55.0, 25.0, 80.0])
            .with_labels(["HLT_A", "HLT_B", "Total"])
            .with_entries(100.0);
        let r = PullCalculator::new(CorrelationMode::Correlated).compare(&h1, &h2).unwrap();
        let a = pulls_artifact(TriggerLevel::Hlt, &r).unwrap();

        assert_eq!(a.labels.len(), 3);
        assert_eq!(a.pull.len(), a.residual.len());
        assert_eq!(a.pull_defined, vec![true, true, false]);
        assert_eq!(a.pulls_stem(), "HLTPulls");

        let v = serde_json::to_value(&a).unwrap();
        assert_eq!(v["schema_version"], "trigger_pulls_v0");
        assert_eq!(v["level"], "HLT");
        assert_eq!(v["correlation"], "correlated");
    }
}
