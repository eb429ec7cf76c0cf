//! The combined results file written at the end of a run.

use serde::Serialize;
use tv_core::{CorrelationMode, Dataset, Result, TriggerLevel};
use tv_stats::{BinContent, EfficiencyTable, PullResult};

use crate::meta::ArtifactMeta;
use crate::pulls::{PullsArtifact, pulls_artifact};

#[derive(Debug, Clone, Serialize)]
pub struct TriggerValidationResults {
    pub schema_version: String,
    pub meta: ResultsMeta,
    pub levels: Vec<LevelResults>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResultsMeta {
    #[serde(flatten)]
    pub artifact: ArtifactMeta,
    pub correlation: CorrelationMode,
    pub bin_content: BinContent,
    pub efficiency_threshold: f64,
    pub inputs: [InputMeta; 2],
}

/// Identification of one input file.
#[derive(Debug, Clone, Serialize)]
pub struct InputMeta {
    pub label: String,
    pub path: String,
    pub sha256: String,
}

/// Everything computed for one trigger level.
#[derive(Debug, Clone, Serialize)]
pub struct LevelResults {
    pub level: TriggerLevel,
    /// Efficiency tables of the first and second input.
    pub efficiencies: [EfficiencyTable; 2],
    pub pulls: PullsArtifact,
    /// Paths passing the efficiency threshold in both inputs.
    pub selected_paths: Vec<String>,
}

impl LevelResults {
    /// Collect the tables and pulls of one level.
    pub fn new(level: TriggerLevel, result: &PullResult, threshold: f64) -> Result<Self> {
        Ok(Self {
            level,
            efficiencies: [
                result.table(Dataset::First).clone(),
                result.table(Dataset::Second).clone(),
            ],
            pulls: pulls_artifact(level, result)?,
            selected_paths: result.paths_above(threshold).into_iter().map(String::from).collect(),
        })
    }
}

/// Assemble the results file.
pub fn results_file(
    correlation: CorrelationMode,
    bin_content: BinContent,
    efficiency_threshold: f64,
    inputs: [InputMeta; 2],
    levels: Vec<LevelResults>,
) -> Result<TriggerValidationResults> {
    Ok(TriggerValidationResults {
        schema_version: "trigger_validation_results_v0".to_string(),
        meta: ResultsMeta {
            artifact: ArtifactMeta::now()?,
            correlation,
            bin_content,
            efficiency_threshold,
            inputs,
        },
        levels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tv_core::Histogram1D;
    use tv_stats::PullCalculator;

    #[test]
    fn results_file_layout() {
        let h1 = Histogram1D::new("L1Paths", vec![50.0, 30.0, 80.0])
            .with_labels(["A", "B", "Total"])
            .with_entries(100.0);
        let h2 = Histogram1D::new("L1Paths", vec![55.0, 25.0, 80.0])
            .with_labels(["A", "B", "Total"])
            .with_entries(100.0);
        let r = PullCalculator::default().compare(&h1, &h2).unwrap();
        let level = LevelResults::new(TriggerLevel::L1, &r, 0.3).unwrap();
        assert_eq!(level.selected_paths, vec!["A"]);

        let input = |label: &str| InputMeta {
            label: label.into(),
            path: format!("{label}/validation.root"),
            sha256: "00".repeat(32),
        };
        let out = results_file(
            CorrelationMode::Uncorrelated,
            BinContent::Auto,
            0.3,
            [input("run1"), input("run2")],
            vec![level],
        )
        .unwrap();

        let v = serde_json::to_value(&out).unwrap();
        assert_eq!(v["schema_version"], "trigger_validation_results_v0");
        assert_eq!(v["meta"]["tool"], "trigger-comparison");
        assert_eq!(v["meta"]["inputs"][1]["label"], "run2");
        assert_eq!(v["levels"][0]["level"], "L1");
        assert_eq!(v["levels"][0]["efficiencies"][0]["interpretation"], "counts");
        assert_eq!(v["levels"][0]["pulls"]["labels"][2], "Total");
    }
}
