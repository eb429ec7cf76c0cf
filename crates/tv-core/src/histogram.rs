//! `Histogram1D`: the histogram type shared by every input source.
//!
//! ROOT files, JSON bundles and the results artifact all go through this type.
//! Bin vectors exclude under/overflow.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Relative tolerance for comparing bin edges of two histograms.
const EDGE_RTOL: f64 = 1e-9;

/// A 1D histogram with optional alphanumeric bin labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram1D {
    /// Object name (last path component in the source file).
    pub name: String,
    /// Histogram title.
    #[serde(default)]
    pub title: String,
    /// Bin edges (length = n_bins + 1). Empty means unit-width bins from 0.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bin_edges: Vec<f64>,
    /// Bin contents (length = n_bins).
    pub bin_content: Vec<f64>,
    /// Sum of weights squared per bin, if stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sumw2: Option<Vec<f64>>,
    /// Bin labels, if the axis is alphanumeric.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    /// Stored number of entries. Falls back to the sum of contents when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entries: Option<f64>,
}

impl Histogram1D {
    /// Histogram with unit-width bins and no errors.
    pub fn new(name: impl Into<String>, bin_content: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            title: String::new(),
            bin_edges: Vec::new(),
            bin_content,
            sumw2: None,
            labels: None,
            entries: None,
        }
    }

    /// Attach bin labels.
    pub fn with_labels<S: Into<String>>(mut self, labels: impl IntoIterator<Item = S>) -> Self {
        self.labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    /// Attach per-bin errors (stored as sumw2).
    pub fn with_errors(mut self, errors: &[f64]) -> Self {
        self.sumw2 = Some(errors.iter().map(|e| e * e).collect());
        self
    }

    /// Attach an explicit entry count.
    pub fn with_entries(mut self, entries: f64) -> Self {
        self.entries = Some(entries);
        self
    }

    /// Attach explicit bin edges.
    pub fn with_edges(mut self, edges: Vec<f64>) -> Self {
        self.bin_edges = edges;
        self
    }

    /// Number of bins (excluding under/overflow).
    pub fn n_bins(&self) -> usize {
        self.bin_content.len()
    }

    /// Entry count: the stored value or the sum of contents.
    pub fn entries(&self) -> f64 {
        self.entries.unwrap_or_else(|| self.total())
    }

    /// Sum of bin contents.
    pub fn total(&self) -> f64 {
        self.bin_content.iter().sum()
    }

    /// Bin edges, synthesising unit-width edges when none are stored.
    pub fn edges(&self) -> Vec<f64> {
        if self.bin_edges.is_empty() {
            (0..=self.n_bins()).map(|i| i as f64).collect()
        } else {
            self.bin_edges.clone()
        }
    }

    /// Statistical error of bin `i`: `sqrt(sumw2)` when stored, otherwise `sqrt(|n|)`.
    pub fn bin_error(&self, i: usize) -> f64 {
        match &self.sumw2 {
            Some(w2) => w2.get(i).copied().unwrap_or(0.0).max(0.0).sqrt(),
            None => self.bin_content.get(i).copied().unwrap_or(0.0).abs().sqrt(),
        }
    }

    /// Whether per-bin errors were stored with the histogram.
    pub fn has_stored_errors(&self) -> bool {
        self.sumw2.as_ref().is_some_and(|w| w.iter().any(|&v| v > 0.0))
    }

    /// Label of bin `i`: the stored label, or its edge range when unlabelled.
    pub fn bin_label(&self, i: usize) -> String {
        if let Some(label) = self.labels.as_ref().and_then(|l| l.get(i)) {
            if !label.is_empty() {
                return label.clone();
            }
        }
        let edges = self.edges();
        match (edges.get(i), edges.get(i + 1)) {
            (Some(lo), Some(hi)) => format!("[{lo}, {hi})"),
            _ => format!("bin{}", i + 1),
        }
    }

    /// Labels for every bin (see [`Histogram1D::bin_label`]).
    pub fn bin_labels(&self) -> Vec<String> {
        (0..self.n_bins()).map(|i| self.bin_label(i)).collect()
    }

    /// Check internal consistency of vector lengths and values.
    pub fn validate(&self) -> Result<()> {
        let n = self.n_bins();
        if !self.bin_edges.is_empty() {
            if self.bin_edges.len() != n + 1 {
                return Err(Error::Validation(format!(
                    "{}: bin_edges length {} != n_bins + 1 ({})",
                    self.name,
                    self.bin_edges.len(),
                    n + 1
                )));
            }
            if self.bin_edges.windows(2).any(|w| w[1] <= w[0]) {
                return Err(Error::Validation(format!(
                    "{}: bin_edges must be strictly increasing",
                    self.name
                )));
            }
        }
        if let Some(w2) = &self.sumw2 {
            if w2.len() != n {
                return Err(Error::Validation(format!(
                    "{}: sumw2 length {} != n_bins {}",
                    self.name,
                    w2.len(),
                    n
                )));
            }
        }
        if let Some(labels) = &self.labels {
            if labels.len() != n {
                return Err(Error::Validation(format!(
                    "{}: labels length {} != n_bins {}",
                    self.name,
                    labels.len(),
                    n
                )));
            }
        }
        if let Some(i) = self.bin_content.iter().position(|v| !v.is_finite()) {
            return Err(Error::Validation(format!(
                "{}: bin {} content is not finite",
                self.name,
                i + 1
            )));
        }
        Ok(())
    }

    /// Require `other` to have the same bin count, labels and edges.
    pub fn check_same_binning(&self, other: &Histogram1D) -> Result<()> {
        if self.n_bins() != other.n_bins() {
            return Err(Error::BinningMismatch(format!(
                "{} has {} bins, {} has {}",
                self.name,
                self.n_bins(),
                other.name,
                other.n_bins()
            )));
        }
        if self.labels.is_some() || other.labels.is_some() {
            let a = self.bin_labels();
            let b = other.bin_labels();
            if let Some(i) = (0..a.len()).find(|&i| a[i] != b[i]) {
                return Err(Error::BinningMismatch(format!(
                    "bin {} label differs: '{}' vs '{}'",
                    i + 1,
                    a[i],
                    b[i]
                )));
            }
        }
        if !self.bin_edges.is_empty() && !other.bin_edges.is_empty() {
            for (i, (a, b)) in self.bin_edges.iter().zip(&other.bin_edges).enumerate() {
                let scale = a.abs().max(b.abs()).max(1.0);
                if (a - b).abs() > EDGE_RTOL * scale {
                    return Err(Error::BinningMismatch(format!(
                        "edge {} differs: {} vs {}",
                        i, a, b
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn unlabelled_bins_use_edges() {
        let h = Histogram1D::new("h", vec![1.0, 2.0]).with_edges(vec![0.0, 0.5, 1.0]);
        assert_eq!(h.bin_label(1), "[0.5, 1)");
        assert_eq!(h.n_bins(), 2);
    }

    #[test]
    fn bin_error_prefers_sumw2() {
        let h = Histogram1D::new("h", vec![4.0, 9.0]);
        assert_abs_diff_eq!(h.bin_error(1), 3.0, epsilon = 1e-12);
        let h = h.with_errors(&[0.5, 0.25]);
        assert_abs_diff_eq!(h.bin_error(0), 0.5, epsilon = 1e-12);
        assert!(h.has_stored_errors());
    }

    #[test]
    fn entries_fall_back_to_total() {
        let h = Histogram1D::new("h", vec![1.0, 2.0, 3.0]);
        assert_abs_diff_eq!(h.entries(), 6.0, epsilon = 1e-12);
        assert_abs_diff_eq!(h.with_entries(100.0).entries(), 100.0, epsilon = 1e-12);
    }

    #[test]
    fn validate_rejects_bad_lengths() {
        let h = Histogram1D::new("h", vec![1.0, 2.0]).with_labels(["a"]);
        assert!(matches!(h.validate(), Err(Error::Validation(_))));
        let h = Histogram1D::new("h", vec![1.0, 2.0]).with_edges(vec![0.0, 1.0]);
        assert!(h.validate().is_err());
        let h = Histogram1D::new("h", vec![1.0, f64::NAN]);
        assert!(h.validate().is_err());
    }

    #[test]
    fn binning_mismatch_on_count_and_labels() {
        let a = Histogram1D::new("a", vec![1.0, 2.0]).with_labels(["x", "y"]);
        let b = Histogram1D::new("b", vec![1.0, 2.0, 3.0]);
        assert!(matches!(a.check_same_binning(&b), Err(Error::BinningMismatch(_))));

        let c = Histogram1D::new("c", vec![1.0, 2.0]).with_labels(["x", "z"]);
        assert!(matches!(a.check_same_binning(&c), Err(Error::BinningMismatch(_))));

        let d = Histogram1D::new("d", vec![5.0, 6.0]).with_labels(["x", "y"]);
        assert!(a.check_same_binning(&d).is_ok());
    }

    #[test]
    fn json_roundtrip_keeps_labels() {
        let h = Histogram1D::new("L1Paths", vec![50.0, 80.0])
            .with_labels(["L1_A", "Total"])
            .with_entries(100.0);
        let s = serde_json::to_string(&h).unwrap();
        let back: Histogram1D = serde_json::from_str(&s).unwrap();
        assert_eq!(back, h);
    }
}
