//! Compatibility summary artifacts.

use serde::Serialize;
use tv_core::{ObjectKind, Result, TriggerLevel};
use tv_stats::CompatibilityMap;
use tv_stats::keys::SummaryKey;

use crate::meta::ArtifactMeta;

/// Scores of every histogram selected by one summary key.
#[derive(Debug, Clone, Serialize)]
pub struct CompatibilitySummaryArtifact {
    pub schema_version: String,
    pub meta: ArtifactMeta,
    pub key: String,
    pub object: ObjectKind,
    pub level: TriggerLevel,
    /// Trigger path of each bar.
    pub paths: Vec<String>,
    /// Full histogram name of each bar.
    pub histograms: Vec<String>,
    pub score: Vec<f64>,
    pub chi2: Vec<f64>,
    pub ndf: Vec<usize>,
    pub p_value: Vec<f64>,
}

/// Everything the compatibility stage produced.
#[derive(Debug, Clone, Serialize)]
pub struct CompatibilityResultsArtifact {
    pub schema_version: String,
    pub meta: ArtifactMeta,
    /// Keys that were requested but matched nothing.
    pub skipped_keys: Vec<String>,
    pub summaries: Vec<CompatibilitySummaryArtifact>,
    pub scores: CompatibilityMap,
}

/// Summary for `key`, or `None` when no map entry matches it.
pub fn summary_artifact(
    key: &SummaryKey,
    map: &CompatibilityMap,
) -> Result<Option<CompatibilitySummaryArtifact>> {
    let selected = key.select(map);
    if selected.is_empty() {
        return Ok(None);
    }
    Ok(Some(CompatibilitySummaryArtifact {
        schema_version: "trigger_compatibility_v0".to_string(),
        meta: ArtifactMeta::now()?,
        key: key.as_str().to_string(),
        object: key.kind,
        level: key.level,
        paths: selected.iter().map(|(name, _)| key.path_label(name).to_string()).collect(),
        histograms: selected.iter().map(|(name, _)| name.to_string()).collect(),
        score: selected.iter().map(|(_, s)| s.score).collect(),
        chi2: selected.iter().map(|(_, s)| s.chi2).collect(),
        ndf: selected.iter().map(|(_, s)| s.ndf).collect(),
        p_value: selected.iter().map(|(_, s)| s.p_value).collect(),
    }))
}

/// Bundle the drawn summaries with the full score map.
pub fn results_artifact(
    summaries: Vec<CompatibilitySummaryArtifact>,
    skipped_keys: Vec<String>,
    map: &CompatibilityMap,
) -> Result<CompatibilityResultsArtifact> {
    Ok(CompatibilityResultsArtifact {
        schema_version: "trigger_compatibility_results_v0".to_string(),
        meta: ArtifactMeta::now()?,
        skipped_keys,
        summaries,
        scores: map.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tv_stats::CompatibilityScore;
    use tv_stats::keys::requested_keys;

    fn map() -> CompatibilityMap {
        let mut m = CompatibilityMap::new();
        let scores = [("JetMult_L1_Jet15", 0.5), ("JetMult_L1_Jet30", 2.0), ("JetMult", 1.0)];
        for (name, score) in scores {
            m.insert(name, CompatibilityScore { chi2: score * 3.0, ndf: 3, p_value: 0.5, score });
        }
        m
    }

    #[test]
    fn absent_key_yields_nothing() {
        let keys = requested_keys(false);
        let elec = keys.iter().find(|k| k.as_str() == "ElecMult_L1").unwrap();
        assert!(summary_artifact(elec, &map()).unwrap().is_none());
    }

    #[test]
    fn present_key_lists_paths_in_name_order() {
        let keys = requested_keys(false);
        let jets = keys.iter().find(|k| k.as_str() == "JetMult_L1").unwrap();
        let a = summary_artifact(jets, &map()).unwrap().unwrap();
        assert_eq!(a.paths, vec!["L1_Jet15", "L1_Jet30"]);
        assert_eq!(a.score, vec![0.5, 2.0]);
        assert_eq!(a.object, ObjectKind::Jet);

        let results = results_artifact(vec![a], vec!["ElecMult_L1".into()], &map()).unwrap();
        let v = serde_json::to_value(&results).unwrap();
        assert_eq!(v["scores"]["JetMult"]["score"], 1.0);
        assert_eq!(v["summaries"][0]["key"], "JetMult_L1");
    }
}
