//! Two-sample chi-square compatibility between histograms.

use std::collections::BTreeMap;
use std::ops::Bound;

use serde::{Deserialize, Serialize};
use statrs::distribution::{ChiSquared, ContinuousCDF};
use tv_core::{Error, Histogram1D, Result};

/// Outcome of comparing two histograms of the same quantity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityScore {
    /// Chi-square statistic.
    pub chi2: f64,
    /// Non-empty bins minus one.
    pub ndf: usize,
    /// Upper-tail probability of `chi2` under χ²(ndf); 1 when `ndf == 0`.
    pub p_value: f64,
    /// `chi2 / max(ndf, 1)`, the value that gets plotted.
    pub score: f64,
}

/// Unweighted two-sample chi-square test.
///
/// ```text
/// chi2 = Σ_i (N2·n1_i − N1·n2_i)² / (N1·N2·(n1_i + n2_i))
/// ```
/// summed over bins where `n1_i + n2_i > 0`. Symmetric in its arguments and
/// zero for identical inputs.
pub fn chi2_test(h1: &Histogram1D, h2: &Histogram1D) -> Result<CompatibilityScore> {
    h1.check_same_binning(h2)?;

    for h in [h1, h2] {
        if let Some(i) = h.bin_content.iter().position(|v| *v < 0.0 || !v.is_finite()) {
            return Err(Error::Validation(format!(
                "{}: bin {} has invalid content {}",
                h.name,
                i + 1,
                h.bin_content[i]
            )));
        }
    }

    let n1_tot = h1.total();
    let n2_tot = h2.total();
    if n1_tot <= 0.0 || n2_tot <= 0.0 {
        let empty = if n1_tot <= 0.0 { &h1.name } else { &h2.name };
        return Err(Error::Computation(format!("{empty}: histogram is empty")));
    }

    let mut chi2 = 0.0;
    let mut non_empty = 0usize;
    for (&n1, &n2) in h1.bin_content.iter().zip(&h2.bin_content) {
        let sum = n1 + n2;
        if sum == 0.0 {
            continue;
        }
        non_empty += 1;
        let d = n2_tot * n1 - n1_tot * n2;
        chi2 += d * d / (n1_tot * n2_tot * sum);
    }

    let ndf = non_empty.saturating_sub(1);
    let p_value = if ndf == 0 {
        1.0
    } else {
        ChiSquared::new(ndf as f64)
            .map_err(|e| Error::Computation(format!("chi-square distribution: {e}")))?
            .sf(chi2)
    };

    Ok(CompatibilityScore { chi2, ndf, p_value, score: chi2 / ndf.max(1) as f64 })
}

/// Histogram name → compatibility score, iterated in name order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompatibilityMap(BTreeMap<String, CompatibilityScore>);

impl CompatibilityMap {
    /// Empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the score of a compared pair, replacing any earlier entry.
    pub fn insert(&mut self, name: impl Into<String>, score: CompatibilityScore) {
        self.0.insert(name.into(), score);
    }

    /// Score recorded for `name`.
    pub fn get(&self, name: &str) -> Option<&CompatibilityScore> {
        self.0.get(name)
    }

    /// Entries whose name starts with `prefix`, in name order.
    pub fn with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a CompatibilityScore)> + 'a {
        self.0
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(move |(name, _)| name.starts_with(prefix))
            .map(|(name, score)| (name.as_str(), score))
    }

    /// All entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CompatibilityScore)> {
        self.0.iter().map(|(name, score)| (name.as_str(), score))
    }

    /// Number of recorded pairs.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no pair has been recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
