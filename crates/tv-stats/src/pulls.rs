//! Residuals and pulls between two efficiency tables.

use std::io::{self, Write};

use serde::Serialize;
use tv_core::{CorrelationMode, Dataset, Error, Histogram1D, Result};

use crate::efficiency::{BinContent, EfficiencyTable};

/// Combined uncertainty `sqrt(max(s1² + s2² − 2·rho·s1·s2, 0))`.
pub fn combined_sigma(s1: f64, s2: f64, mode: CorrelationMode) -> f64 {
    let var = s1 * s1 + s2 * s2 - 2.0 * mode.rho() * (s1 * s2);
    var.max(0.0).sqrt()
}

/// Comparison of one trigger path between the two inputs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PullEntry {
    /// Trigger path label.
    pub label: String,
    /// Efficiency in the first input.
    pub efficiency1: f64,
    /// Efficiency in the second input.
    pub efficiency2: f64,
    /// `efficiency2 − efficiency1`.
    pub residual: f64,
    /// Combined uncertainty.
    pub sigma: f64,
    /// `residual / sigma`, or `0.0` when `sigma` is zero.
    pub pull: f64,
    /// False when `sigma` was zero or non-finite.
    pub pull_defined: bool,
    /// Whether this is the inclusive-OR entry.
    pub is_total: bool,
}

/// Computes pulls for pairs of trigger-bits histograms.
#[derive(Debug, Clone, Copy, Default)]
pub struct PullCalculator {
    mode: CorrelationMode,
    bin_content: BinContent,
}

impl PullCalculator {
    /// Calculator with the given correlation mode and `Auto` bin interpretation.
    pub fn new(mode: CorrelationMode) -> Self {
        Self { mode, bin_content: BinContent::Auto }
    }

    /// Override how bin contents are interpreted.
    pub fn with_bin_content(mut self, bin_content: BinContent) -> Self {
        self.bin_content = bin_content;
        self
    }

    /// Correlation mode in use.
    pub fn mode(&self) -> CorrelationMode {
        self.mode
    }

    /// Compare two trigger-bits histograms with identical labelling.
    pub fn compare(&self, h1: &Histogram1D, h2: &Histogram1D) -> Result<PullResult> {
        h1.check_same_binning(h2)?;
        let policy = self.bin_content.resolve_pair(h1, h2);
        let first = EfficiencyTable::from_histogram(h1, policy)?;
        let second = EfficiencyTable::from_histogram(h2, policy)?;
        self.compare_tables(first, second)
    }

    /// Compare two efficiency tables with identical label sequences.
    pub fn compare_tables(
        &self,
        first: EfficiencyTable,
        second: EfficiencyTable,
    ) -> Result<PullResult> {
        if first.len() != second.len() {
            return Err(Error::BinningMismatch(format!(
                "{} has {} entries, {} has {}",
                first.name(),
                first.len(),
                second.name(),
                second.len()
            )));
        }

        let mut entries = Vec::with_capacity(first.len());
        for (a, b) in first.entries().iter().zip(second.entries()) {
            if a.label != b.label {
                return Err(Error::BinningMismatch(format!(
                    "path label differs: '{}' vs '{}'",
                    a.label, b.label
                )));
            }
            let residual = b.efficiency - a.efficiency;
            let sigma = combined_sigma(a.uncertainty, b.uncertainty, self.mode);
            let pull_defined = sigma > 0.0 && sigma.is_finite();
            let pull = if pull_defined { residual / sigma } else { 0.0 };
            if !pull_defined {
                tracing::debug!(path = %a.label, "zero combined uncertainty; pull set to 0");
            }
            entries.push(PullEntry {
                label: a.label.clone(),
                efficiency1: a.efficiency,
                efficiency2: b.efficiency,
                residual,
                sigma,
                pull,
                pull_defined,
                is_total: a.is_total,
            });
        }

        Ok(PullResult { mode: self.mode, first, second, entries })
    }
}

/// Per-path pulls and residuals together with both source tables.
#[derive(Debug, Clone, PartialEq)]
pub struct PullResult {
    mode: CorrelationMode,
    first: EfficiencyTable,
    second: EfficiencyTable,
    entries: Vec<PullEntry>,
}

impl PullResult {
    /// Correlation mode the pulls were computed with.
    pub fn mode(&self) -> CorrelationMode {
        self.mode
    }

    /// Source table of one input.
    pub fn table(&self, which: Dataset) -> &EfficiencyTable {
        match which {
            Dataset::First => &self.first,
            Dataset::Second => &self.second,
        }
    }

    /// Efficiency of `label` in one input.
    pub fn efficiency(&self, label: &str, which: Dataset) -> Option<f64> {
        self.table(which).efficiency(label)
    }

    /// All entries in table order, Total last.
    pub fn entries(&self) -> &[PullEntry] {
        &self.entries
    }

    /// Pull sequence in table order.
    pub fn pulls(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.pull).collect()
    }

    /// Residual sequence in table order.
    pub fn residuals(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.residual).collect()
    }

    /// Path labels (Total excluded) whose efficiency exceeds `threshold` in both inputs.
    pub fn paths_above(&self, threshold: f64) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| !e.is_total && e.efficiency1 > threshold && e.efficiency2 > threshold)
            .map(|e| e.label.as_str())
            .collect()
    }

    /// Write the plain-text comparison log: a header, then one line per path.
    pub fn write_log<W: Write>(&self, mut w: W, header: &str) -> io::Result<()> {
        writeln!(w, "{header}")?;
        for line in self.log_lines() {
            writeln!(w, "{line}")?;
        }
        w.flush()
    }

    /// Log lines, one per entry.
    pub fn log_lines(&self) -> Vec<String> {
        let width = self.entries.iter().map(|e| e.label.len()).max().unwrap_or(0);
        self.entries
            .iter()
            .map(|e| {
                let pull =
                    if e.pull_defined { format!("{:+.3}", e.pull) } else { "n/a".to_string() };
                format!(
                    "{:<width$}  eff1={:.4}  eff2={:.4}  diff={:+.4}  pull={}",
                    e.label, e.efficiency1, e.efficiency2, e.residual, pull
                )
            })
            .collect()
    }
}
