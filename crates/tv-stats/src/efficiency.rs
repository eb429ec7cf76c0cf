//! Per-path trigger efficiencies.
//!
//! A trigger-bits histogram has one bin per trigger path followed by a final
//! inclusive-OR bin counting events that fired any path. Each bin becomes one
//! [`EfficiencyEntry`]; the last one is always labelled [`TOTAL_LABEL`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tv_core::{Error, Histogram1D, Result};

/// Label of the synthetic inclusive-OR entry.
pub const TOTAL_LABEL: &str = "Total";

/// How bin contents of a trigger-bits histogram are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BinContent {
    /// `Efficiencies` if every content lies in [0,1] and one is fractional, else `Counts`.
    #[default]
    Auto,
    /// Contents are pass counts out of the histogram's entry count.
    Counts,
    /// Contents are already efficiencies; errors come from `sumw2`.
    Efficiencies,
}

impl BinContent {
    /// Stable lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            BinContent::Auto => "auto",
            BinContent::Counts => "counts",
            BinContent::Efficiencies => "efficiencies",
        }
    }

    /// Concrete interpretation for one histogram. Never returns `Auto`.
    pub fn resolve(self, h: &Histogram1D) -> BinContent {
        match self {
            BinContent::Auto if looks_normalised(h) => BinContent::Efficiencies,
            BinContent::Auto => BinContent::Counts,
            other => other,
        }
    }

    /// Concrete interpretation shared by two histograms being compared.
    ///
    /// Under `Auto`, both must look normalised for `Efficiencies` to be chosen.
    pub fn resolve_pair(self, h1: &Histogram1D, h2: &Histogram1D) -> BinContent {
        match self {
            BinContent::Auto if looks_normalised(h1) && looks_normalised(h2) => {
                BinContent::Efficiencies
            }
            BinContent::Auto => BinContent::Counts,
            other => other,
        }
    }
}

fn looks_normalised(h: &Histogram1D) -> bool {
    let c = &h.bin_content;
    c.iter().all(|v| (0.0..=1.0).contains(v)) && c.iter().any(|v| v.fract() != 0.0)
}

impl fmt::Display for BinContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BinContent {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(BinContent::Auto),
            "counts" => Ok(BinContent::Counts),
            "efficiencies" | "efficiency" => Ok(BinContent::Efficiencies),
            other => Err(Error::Validation(format!("unknown bin-content policy: {other}"))),
        }
    }
}

/// Binomial uncertainty `sqrt(e·(1−e)/n)`; zero when `n` is not positive.
pub fn binomial_uncertainty(eff: f64, n: f64) -> f64 {
    if n <= 0.0 || !n.is_finite() || !eff.is_finite() {
        return 0.0;
    }
    (eff * (1.0 - eff) / n).max(0.0).sqrt()
}

/// One trigger path (or the Total) of an [`EfficiencyTable`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyEntry {
    /// Trigger path label.
    pub label: String,
    /// Fraction of events passing the path.
    pub efficiency: f64,
    /// Uncertainty on `efficiency` (≥ 0).
    pub uncertainty: f64,
    /// Whether this is the inclusive-OR entry.
    #[serde(default)]
    pub is_total: bool,
}

/// Ordered efficiencies of all trigger paths of one input, Total last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyTable {
    name: String,
    interpretation: BinContent,
    #[serde(skip_serializing_if = "Option::is_none")]
    trials: Option<f64>,
    entries: Vec<EfficiencyEntry>,
}

impl EfficiencyTable {
    /// Build a table from a trigger-bits histogram.
    ///
    /// `policy` may be `Auto`; the resolved interpretation is recorded.
    pub fn from_histogram(h: &Histogram1D, policy: BinContent) -> Result<Self> {
        h.validate()?;
        let n_bins = h.n_bins();
        if n_bins < 2 {
            return Err(Error::Validation(format!(
                "{}: a trigger-bits histogram needs at least one path and a Total bin, got {} bins",
                h.name, n_bins
            )));
        }

        let interpretation = policy.resolve(h);
        let labels = h.bin_labels();
        let (trials, values): (Option<f64>, Vec<(f64, f64)>) = match interpretation {
            BinContent::Counts => {
                if let Some(i) = h.bin_content.iter().position(|&k| k < 0.0) {
                    return Err(Error::Validation(format!(
                        "{}: negative count in bin '{}'",
                        h.name, labels[i]
                    )));
                }
                // The bin sum is not an event count once paths overlap.
                let Some(n) = h.entries.filter(|n| *n > 0.0 && n.is_finite()) else {
                    return Err(Error::Validation(format!(
                        "{}: counts need a stored entry count",
                        h.name
                    )));
                };
                let values = h
                    .bin_content
                    .iter()
                    .map(|&k| {
                        let eff = k / n;
                        (eff, binomial_uncertainty(eff, n))
                    })
                    .collect();
                (Some(n), values)
            }
            BinContent::Efficiencies | BinContent::Auto => {
                let n = h.entries.filter(|n| *n > 0.0);
                let stored = h.has_stored_errors();
                let values = h
                    .bin_content
                    .iter()
                    .enumerate()
                    .map(|(i, &eff)| {
                        let unc = if stored {
                            h.bin_error(i)
                        } else {
                            n.map_or(0.0, |n| binomial_uncertainty(eff, n))
                        };
                        (eff, unc)
                    })
                    .collect();
                (n, values)
            }
        };

        let entries = labels
            .into_iter()
            .zip(values)
            .enumerate()
            .map(|(i, (label, (efficiency, uncertainty)))| {
                let is_total = i + 1 == n_bins;
                EfficiencyEntry {
                    label: if is_total { TOTAL_LABEL.to_string() } else { label },
                    efficiency,
                    uncertainty,
                    is_total,
                }
            })
            .collect();

        tracing::debug!(
            histogram = %h.name,
            interpretation = %interpretation,
            paths = n_bins - 1,
            "built efficiency table"
        );
        Ok(Self { name: h.name.clone(), interpretation, trials, entries })
    }

    /// Build a table from explicit `(label, efficiency, uncertainty)` triples.
    ///
    /// The last triple becomes the Total entry.
    pub fn from_triples(
        name: impl Into<String>,
        triples: impl IntoIterator<Item = (String, f64, f64)>,
    ) -> Result<Self> {
        let name = name.into();
        let mut entries: Vec<EfficiencyEntry> = triples
            .into_iter()
            .map(|(label, efficiency, uncertainty)| EfficiencyEntry {
                label,
                efficiency,
                uncertainty,
                is_total: false,
            })
            .collect();
        if entries.len() < 2 {
            return Err(Error::Validation(format!("{name}: need at least one path and a Total")));
        }
        let invalid = |e: &&EfficiencyEntry| {
            !e.efficiency.is_finite() || e.uncertainty < 0.0 || e.uncertainty.is_nan()
        };
        if let Some(e) = entries.iter().find(invalid) {
            return Err(Error::Validation(format!(
                "{name}: invalid efficiency/uncertainty for '{}'",
                e.label
            )));
        }
        if let Some(last) = entries.last_mut() {
            last.label = TOTAL_LABEL.to_string();
            last.is_total = true;
        }
        Ok(Self { name, interpretation: BinContent::Efficiencies, trials: None, entries })
    }

    /// Name of the source histogram.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Interpretation the table was built with.
    pub fn interpretation(&self) -> BinContent {
        self.interpretation
    }

    /// Denominator used for binomial uncertainties, if any.
    pub fn trials(&self) -> Option<f64> {
        self.trials
    }

    /// All entries, Total last.
    pub fn entries(&self) -> &[EfficiencyEntry] {
        &self.entries
    }

    /// Entries for individual paths (Total excluded).
    pub fn paths(&self) -> impl Iterator<Item = &EfficiencyEntry> {
        self.entries.iter().filter(|e| !e.is_total)
    }

    /// The inclusive-OR entry.
    pub fn total(&self) -> Option<&EfficiencyEntry> {
        self.entries.last().filter(|e| e.is_total)
    }

    /// Entry for `label`.
    pub fn get(&self, label: &str) -> Option<&EfficiencyEntry> {
        self.entries.iter().find(|e| e.label == label)
    }

    /// Efficiency for `label`.
    pub fn efficiency(&self, label: &str) -> Option<f64> {
        self.get(label).map(|e| e.efficiency)
    }

    /// Labels in table order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.label.as_str())
    }

    /// Number of entries, Total included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
