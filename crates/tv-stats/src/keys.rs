//! Compatibility summary keys.
//!
//! A key such as `JetMult_L1` groups every per-path histogram named
//! `JetMult_<path>` whose path label starts with the level tag.

use tv_core::{ObjectKind, TriggerLevel};

use crate::compat::{CompatibilityMap, CompatibilityScore};

/// Level tag used for L1 keys with the legacy path naming.
pub const LEGACY_L1_TAG: &str = "A";

/// One requested compatibility summary plot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryKey {
    /// Object family.
    pub kind: ObjectKind,
    /// Trigger level.
    pub level: TriggerLevel,
    key: String,
}

impl SummaryKey {
    /// Key for `kind` at `level`, with `tag` as the level suffix.
    pub fn new(kind: ObjectKind, level: TriggerLevel, tag: &str) -> Self {
        Self { kind, level, key: format!("{}_{}", kind.histogram(), tag) }
    }

    /// The key string, e.g. `ElecMult_HLT`.
    pub fn as_str(&self) -> &str {
        &self.key
    }

    /// Output file stem, `compat_<key>`.
    pub fn file_stem(&self) -> String {
        format!("compat_{}", self.key)
    }

    /// Map entries selected by this key, in name order.
    pub fn select<'a>(
        &'a self,
        map: &'a CompatibilityMap,
    ) -> Vec<(&'a str, &'a CompatibilityScore)> {
        map.with_prefix(&self.key).collect()
    }

    /// Trigger path shown for a selected histogram: its name without the object prefix.
    pub fn path_label<'n>(&self, name: &'n str) -> &'n str {
        name.strip_prefix(self.kind.histogram())
            .and_then(|rest| rest.strip_prefix('_'))
            .unwrap_or(name)
    }
}

/// Keys in drawing order: all object kinds at L1 (or the legacy tag), then at HLT.
pub fn requested_keys(old_l1_names: bool) -> Vec<SummaryKey> {
    let l1_tag = if old_l1_names { LEGACY_L1_TAG } else { TriggerLevel::L1.as_str() };
    let mut keys = Vec::with_capacity(2 * ObjectKind::SUMMARY_ORDER.len());
    let hlt_tag = TriggerLevel::Hlt.as_str();
    for (level, tag) in [(TriggerLevel::L1, l1_tag), (TriggerLevel::Hlt, hlt_tag)] {
        keys.extend(ObjectKind::SUMMARY_ORDER.iter().map(|&k| SummaryKey::new(k, level, tag)));
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_order_and_naming() {
        let keys: Vec<String> =
            requested_keys(false).iter().map(|k| k.as_str().to_string()).collect();
        assert_eq!(
            keys,
            [
                "ElecMult_L1", "MuonMult_L1", "PhotonMult_L1", "JetMult_L1", "MET_L1",
                "ElecMult_HLT", "MuonMult_HLT", "PhotonMult_HLT", "JetMult_HLT", "MET_HLT",
            ]
        );
    }

    #[test]
    fn legacy_l1_tag() {
        let keys = requested_keys(true);
        assert_eq!(keys[0].as_str(), "ElecMult_A");
        assert_eq!(keys[0].file_stem(), "compat_ElecMult_A");
        assert_eq!(keys[5].as_str(), "ElecMult_HLT");
    }

    #[test]
    fn selection_and_labels() {
        let score = CompatibilityScore { chi2: 2.0, ndf: 2, p_value: 0.37, score: 1.0 };
        let mut map = CompatibilityMap::new();
        map.insert("MET_L1_ETM20", score);
        map.insert("MET_HLT_MET25", score);
        map.insert("MET", score);

        let key = SummaryKey::new(ObjectKind::Met, TriggerLevel::L1, "L1");
        let selected = key.select(&map);
        assert_eq!(selected.len(), 1);
        assert_eq!(key.path_label(selected[0].0), "L1_ETM20");

        let missing = SummaryKey::new(ObjectKind::Photon, TriggerLevel::Hlt, "HLT");
        assert!(missing.select(&map).is_empty());
    }
}
