//! Small shared enums.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// How the uncertainties of two efficiencies are combined before forming a pull.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationMode {
    /// Independent samples: quadrature sum.
    #[default]
    Uncorrelated,
    /// Fully correlated samples: `|s1 - s2|`.
    Correlated,
}

impl CorrelationMode {
    /// Correlation coefficient used in `s1² + s2² - 2·rho·s1·s2`.
    pub fn rho(self) -> f64 {
        match self {
            CorrelationMode::Uncorrelated => 0.0,
            CorrelationMode::Correlated => 1.0,
        }
    }

    /// Stable lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            CorrelationMode::Uncorrelated => "uncorrelated",
            CorrelationMode::Correlated => "correlated",
        }
    }
}

impl fmt::Display for CorrelationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CorrelationMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "uncorrelated" => Ok(CorrelationMode::Uncorrelated),
            "correlated" => Ok(CorrelationMode::Correlated),
            other => Err(Error::Validation(format!("unknown correlation mode: {other}"))),
        }
    }
}

/// Which of the two compared inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    /// The reference input (`-File1`).
    First,
    /// The candidate input (`-File2`).
    Second,
}

impl Dataset {
    /// Zero-based index (0 for `First`).
    pub fn index(self) -> usize {
        match self {
            Dataset::First => 0,
            Dataset::Second => 1,
        }
    }
}

/// Trigger decision stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerLevel {
    /// Level-1 hardware trigger.
    L1,
    /// High-level (software) trigger.
    #[serde(rename = "HLT")]
    Hlt,
}

impl TriggerLevel {
    /// Both levels, in the order the comparison processes them.
    pub const ALL: [TriggerLevel; 2] = [TriggerLevel::L1, TriggerLevel::Hlt];

    /// Short name used in file names and directory paths (`L1`, `HLT`).
    pub fn as_str(self) -> &'static str {
        match self {
            TriggerLevel::L1 => "L1",
            TriggerLevel::Hlt => "HLT",
        }
    }

    /// Path of the trigger-bits histogram inside an input file.
    pub fn trigger_bits_path(self) -> &'static str {
        match self {
            TriggerLevel::L1 => "TriggerBits/L1Paths",
            TriggerLevel::Hlt => "TriggerBits/HltPaths",
        }
    }

    /// Name of the plain-text comparison log.
    pub fn log_file_name(self) -> &'static str {
        match self {
            TriggerLevel::L1 => "L1comparison.log",
            TriggerLevel::Hlt => "HLTcomparison.log",
        }
    }
}

impl fmt::Display for TriggerLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reconstructed object family whose multiplicity (or MET) is compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    /// Jets.
    Jet,
    /// Muons.
    Muon,
    /// Electrons.
    Electron,
    /// Photons.
    Photon,
    /// Missing transverse energy.
    Met,
}

impl ObjectKind {
    /// Order in which histograms are read and compared.
    pub const ALL: [ObjectKind; 5] = [
        ObjectKind::Jet,
        ObjectKind::Muon,
        ObjectKind::Electron,
        ObjectKind::Photon,
        ObjectKind::Met,
    ];

    /// Order in which compatibility summaries are drawn.
    pub const SUMMARY_ORDER: [ObjectKind; 5] = [
        ObjectKind::Electron,
        ObjectKind::Muon,
        ObjectKind::Photon,
        ObjectKind::Jet,
        ObjectKind::Met,
    ];

    /// Top-level directory holding this object's histograms.
    pub fn directory(self) -> &'static str {
        match self {
            ObjectKind::Jet => "RecoJets",
            ObjectKind::Muon => "RecoMuons",
            ObjectKind::Electron => "RecoElectrons",
            ObjectKind::Photon => "RecoPhotons",
            ObjectKind::Met => "RecoMET",
        }
    }

    /// Base histogram name (`JetMult`, `MET`, ...).
    pub fn histogram(self) -> &'static str {
        match self {
            ObjectKind::Jet => "JetMult",
            ObjectKind::Muon => "MuonMult",
            ObjectKind::Electron => "ElecMult",
            ObjectKind::Photon => "PhotonMult",
            ObjectKind::Met => "MET",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correlation_mode_parse_roundtrip() {
        for m in [CorrelationMode::Uncorrelated, CorrelationMode::Correlated] {
            assert_eq!(m.as_str().parse::<CorrelationMode>().unwrap(), m);
        }
        assert!("partial".parse::<CorrelationMode>().is_err());
    }

    #[test]
    fn level_paths() {
        assert_eq!(TriggerLevel::L1.trigger_bits_path(), "TriggerBits/L1Paths");
        assert_eq!(TriggerLevel::Hlt.log_file_name(), "HLTcomparison.log");
        assert_eq!(serde_json::to_string(&TriggerLevel::Hlt).unwrap(), "\"HLT\"");
    }

    #[test]
    fn summary_order_is_a_permutation() {
        let mut a: Vec<_> = ObjectKind::ALL.iter().map(|k| k.histogram()).collect();
        let mut b: Vec<_> = ObjectKind::SUMMARY_ORDER.iter().map(|k| k.histogram()).collect();
        assert_eq!(b[0], "ElecMult");
        a.sort_unstable();
        b.sort_unstable();
        assert_eq!(a, b);
    }
}
