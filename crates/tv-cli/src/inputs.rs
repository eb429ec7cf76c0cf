//! Input files: anything that can hand out histograms by object path.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tv_core::{Error, Histogram1D};
use tv_root::RootFile;

/// A source of named histograms.
pub trait HistogramSource {
    /// Path the source was opened from.
    fn path(&self) -> &Path;

    /// Histogram at `object_path` (e.g. `TriggerBits/L1Paths`).
    ///
    /// An absent object is [`Error::MissingObject`] carrying the full path.
    fn histogram(&self, object_path: &str) -> tv_core::Result<Histogram1D>;
}

/// A ROOT file read with the native reader.
pub struct RootSource {
    file: RootFile,
}

impl RootSource {
    pub fn open(path: &Path) -> Result<Self> {
        let file = RootFile::open(path)
            .with_context(|| format!("failed to open ROOT file {}", path.display()))?;
        Ok(Self { file })
    }
}

impl HistogramSource for RootSource {
    fn path(&self) -> &Path {
        self.file.path()
    }

    fn histogram(&self, object_path: &str) -> tv_core::Result<Histogram1D> {
        Ok(self.file.get_histogram(object_path)?)
    }
}

/// `{"histograms": {"<object path>": Histogram1D, ...}}`
#[derive(Debug, Deserialize)]
struct HistogramBundle {
    histograms: BTreeMap<String, Histogram1D>,
}

/// A JSON histogram bundle, parsed up front.
pub struct JsonSource {
    path: PathBuf,
    histograms: BTreeMap<String, Histogram1D>,
}

impl JsonSource {
    pub fn open(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let bundle: HistogramBundle = serde_json::from_slice(&bytes)
            .with_context(|| format!("invalid histogram bundle {}", path.display()))?;
        tracing::debug!(path = %path.display(), objects = bundle.histograms.len(), "bundle loaded");
        Ok(Self { path: path.to_path_buf(), histograms: bundle.histograms })
    }
}

impl HistogramSource for JsonSource {
    fn path(&self) -> &Path {
        &self.path
    }

    fn histogram(&self, object_path: &str) -> tv_core::Result<Histogram1D> {
        let h = self
            .histograms
            .get(object_path.trim_start_matches('/'))
            .ok_or_else(|| Error::MissingObject(object_path.to_string()))?;
        h.validate()?;
        Ok(h.clone())
    }
}

/// Open `path` with the reader matching its extension.
pub fn open_source(path: &Path) -> Result<Box<dyn HistogramSource>> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();
    tracing::info!(path = %path.display(), "opening input");
    match ext.as_str() {
        "root" => Ok(Box::new(RootSource::open(path)?)),
        "json" => Ok(Box::new(JsonSource::open(path)?)),
        _ => anyhow::bail!(
            "unsupported input file {}: expected a .root file or a .json histogram bundle",
            path.display()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle_file(name: &str, body: &str) -> PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!("trigger_comparison_inputs_{}_{}", std::process::id(), name));
        std::fs::write(&p, body).unwrap();
        p
    }

    #[test]
    fn json_bundle_lookup() {
        let p = bundle_file(
            "lookup.json",
            r#"{"histograms": {"TriggerBits/L1Paths":
                {"name": "L1Paths", "bin_content": [5, 10], "labels": ["L1_A", "Total"]}}}"#,
        );
        let src = open_source(&p).unwrap();
        let h = src.histogram("TriggerBits/L1Paths").unwrap();
        assert_eq!(h.bin_labels(), vec!["L1_A", "Total"]);

        let err = src.histogram("TriggerBits/HltPaths").unwrap_err();
        assert!(matches!(err, Error::MissingObject(ref p) if p == "TriggerBits/HltPaths"));
        std::fs::remove_file(p).ok();
    }

    #[test]
    fn malformed_object_is_a_per_item_error() {
        let p = bundle_file(
            "malformed.json",
            r#"{"histograms": {"RecoMET/General/MET":
                {"name": "MET", "bin_content": [1, 2], "bin_edges": [0, 1]}}}"#,
        );
        let src = open_source(&p).unwrap();
        let err = src.histogram("RecoMET/General/MET").unwrap_err();
        assert!(err.is_per_item());
        std::fs::remove_file(p).ok();
    }

    #[test]
    fn unknown_extension_is_rejected() {
        assert!(open_source(Path::new("histograms.csv")).is_err());
    }
}
