//! The fixed comparison pipeline: efficiencies and pulls per trigger level,
//! then per-path distribution comparisons and their compatibility summaries.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tv_core::{CorrelationMode, Histogram1D, ObjectKind, TriggerLevel};
use tv_stats::keys::requested_keys;
use tv_stats::{BinContent, CompatibilityMap, PullCalculator, PullResult, chi2_test};
use tv_viz::compat::{results_artifact, summary_artifact};
use tv_viz::efficiency::{DEFAULT_PAGE_SIZE, efficiency_artifact};
use tv_viz::overlay::overlay_artifact;
use tv_viz::pulls::pulls_artifact;
use tv_viz::results::results_file;
use tv_viz::{InputMeta, LevelResults};
use tv_viz_render::config::VizConfig;
use tv_viz_render::output::OutputFormat;
use tv_viz_render::{Plot, RenderError, render_to_file};

use crate::inputs::{HistogramSource, open_source};
use crate::paths;

/// Name of the compatibility results artifact in the output directory.
pub const COMPATIBILITY_FILE: &str = "compatibility.json";

/// Everything the pipeline needs, resolved from the command line.
#[derive(Debug, Clone)]
pub struct Options {
    pub inputs: [PathBuf; 2],
    pub labels: [String; 2],
    pub output_file: PathBuf,
    pub output_dir: PathBuf,
    pub correlation: CorrelationMode,
    pub old_l1_names: bool,
    pub bin_content: BinContent,
    pub eff_threshold: f64,
    pub format: OutputFormat,
    pub viz: VizConfig,
}

/// Counts reported at the end of a run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub images: usize,
    pub compared: usize,
    pub summaries: usize,
    /// One line per item that was logged and skipped.
    pub skipped: Vec<String>,
}

impl RunSummary {
    /// Log a per-item failure and carry on; I/O failures abort the run.
    fn skip_or_fail<T>(&mut self, what: &str, r: tv_core::Result<T>) -> Result<Option<T>> {
        match r {
            Ok(v) => Ok(Some(v)),
            Err(e) if e.is_per_item() => {
                tracing::warn!(item = what, error = %e, "skipping");
                self.skipped.push(format!("{what}: {e}"));
                Ok(None)
            }
            Err(e) => Err(anyhow::Error::new(e).context(format!("failed on {what}"))),
        }
    }
}

struct Pipeline<'a> {
    opts: &'a Options,
    sources: [Box<dyn HistogramSource>; 2],
    summary: RunSummary,
}

/// Run the whole comparison.
pub fn run(opts: &Options) -> Result<RunSummary> {
    let sources = [open_source(&opts.inputs[0])?, open_source(&opts.inputs[1])?];
    std::fs::create_dir_all(&opts.output_dir).with_context(|| {
        format!("failed to create output directory {}", opts.output_dir.display())
    })?;

    let mut p = Pipeline { opts, sources, summary: RunSummary::default() };

    let mut levels = Vec::with_capacity(TriggerLevel::ALL.len());
    let mut selected: Vec<(TriggerLevel, Vec<String>)> = Vec::new();
    for level in TriggerLevel::ALL {
        let Some(result) = p.compare_level(level)? else {
            continue;
        };
        let paths = result.paths_above(opts.eff_threshold);
        tracing::info!(level = %level, selected = paths.len(), "paths above threshold");
        selected.push((level, paths.into_iter().map(String::from).collect()));
        if let Some(l) = p.summary.skip_or_fail(
            level.trigger_bits_path(),
            LevelResults::new(level, &result, opts.eff_threshold),
        )? {
            levels.push(l);
        }
    }

    let map = p.compare_distributions(&selected)?;
    p.write_summaries(&map)?;
    p.write_results(levels)?;

    let summary = p.summary;
    for item in &summary.skipped {
        tracing::info!(item = %item, "skipped");
    }
    tracing::info!(
        images = summary.images,
        compared = summary.compared,
        summaries = summary.summaries,
        skipped = summary.skipped.len(),
        "comparison finished"
    );
    Ok(summary)
}

impl Pipeline<'_> {
    fn fetch_pair(&mut self, object_path: &str) -> Result<Option<(Histogram1D, Histogram1D)>> {
        let Some(h1) = self.summary.skip_or_fail(
            &format!("{} ({})", object_path, self.opts.labels[0]),
            self.sources[0].histogram(object_path),
        )?
        else {
            return Ok(None);
        };
        let Some(h2) = self.summary.skip_or_fail(
            &format!("{} ({})", object_path, self.opts.labels[1]),
            self.sources[1].histogram(object_path),
        )?
        else {
            return Ok(None);
        };
        Ok(Some((h1, h2)))
    }

    /// Render one plot. A render failure skips the plot; a write failure is fatal.
    fn write_plot(&mut self, plot: Plot<'_>, stem: &str) -> Result<()> {
        let path = paths::image_file(&self.opts.output_dir, stem, self.opts.format);
        match render_to_file(&plot, &path, &self.opts.viz) {
            Ok(()) => {
                self.summary.images += 1;
                Ok(())
            }
            Err(RenderError::Io(e)) => {
                Err(anyhow::Error::new(e).context(format!("failed to write {}", path.display())))
            }
            Err(e) => {
                tracing::warn!(plot = plot.kind(), file = %path.display(), error = %e, "skipping");
                self.summary.skipped.push(format!("{}: {e}", path.display()));
                Ok(())
            }
        }
    }

    /// Efficiencies, pulls, log file and plots of one trigger level.
    fn compare_level(&mut self, level: TriggerLevel) -> Result<Option<PullResult>> {
        let bits = level.trigger_bits_path();
        let Some((h1, h2)) = self.fetch_pair(bits)? else {
            return Ok(None);
        };
        let calc =
            PullCalculator::new(self.opts.correlation).with_bin_content(self.opts.bin_content);
        let Some(result) = self.summary.skip_or_fail(bits, calc.compare(&h1, &h2))? else {
            return Ok(None);
        };
        tracing::info!(
            level = %level,
            paths = result.entries().len(),
            interpretation = %result.table(tv_core::Dataset::First).interpretation(),
            "pulls computed"
        );

        let log_path = self.opts.output_dir.join(level.log_file_name());
        write_log(&log_path, &result, &self.log_header(level))?;

        let labels = self.opts.labels.clone();
        if let Some(eff) = self.summary.skip_or_fail(
            bits,
            efficiency_artifact(level, &result, labels, DEFAULT_PAGE_SIZE),
        )? {
            for (i, page) in eff.pages.iter().enumerate() {
                let plot = Plot::EfficiencyPage { artifact: &eff, page: i };
                self.write_plot(plot, &page.file_stem(level))?;
            }
        }
        if let Some(pulls) = self.summary.skip_or_fail(bits, pulls_artifact(level, &result))? {
            self.write_plot(Plot::Pulls(&pulls), &pulls.pulls_stem())?;
            self.write_plot(Plot::Residuals(&pulls), &pulls.residuals_stem())?;
        }
        Ok(Some(result))
    }

    fn log_header(&self, level: TriggerLevel) -> String {
        format!(
            "# {} efficiency comparison: {} vs {} ({} uncertainties)",
            level, self.opts.labels[0], self.opts.labels[1], self.opts.correlation
        )
    }

    /// Inclusive distributions, then per-path distributions of every selected path.
    fn compare_distributions(
        &mut self,
        selected: &[(TriggerLevel, Vec<String>)],
    ) -> Result<CompatibilityMap> {
        let mut objects: Vec<String> =
            ObjectKind::ALL.iter().map(|&k| paths::general_histogram(k)).collect();
        for (level, labels) in selected {
            for label in labels {
                objects.extend(
                    ObjectKind::ALL.iter().map(|&k| paths::path_histogram(k, *level, label)),
                );
            }
        }

        let mut map = CompatibilityMap::new();
        for object in &objects {
            let Some((h1, h2)) = self.fetch_pair(object)? else {
                continue;
            };
            let name = paths::histogram_name(object);
            let Some(score) = self.summary.skip_or_fail(object, chi2_test(&h1, &h2))? else {
                continue;
            };
            tracing::debug!(histogram = name, chi2 = score.chi2, ndf = score.ndf, "compared");
            if map.get(name).is_some() {
                tracing::warn!(histogram = name, "duplicate histogram name, keeping the last");
            }
            map.insert(name, score);
            self.summary.compared += 1;

            let labels = [self.opts.labels[0].as_str(), self.opts.labels[1].as_str()];
            if let Some(overlay) =
                self.summary.skip_or_fail(object, overlay_artifact(name, &h1, &h2, labels, score))?
            {
                self.write_plot(Plot::Overlay(&overlay), name)?;
            }
        }
        Ok(map)
    }

    /// One summary plot per requested key present in the map, then `compatibility.json`.
    fn write_summaries(&mut self, map: &CompatibilityMap) -> Result<()> {
        let mut summaries = Vec::new();
        let mut skipped_keys = Vec::new();
        for key in requested_keys(self.opts.old_l1_names) {
            let summary = summary_artifact(&key, map);
            let Some(artifact) = self.summary.skip_or_fail(key.as_str(), summary)? else {
                continue;
            };
            match artifact {
                Some(a) => {
                    self.write_plot(Plot::Compatibility(&a), &key.file_stem())?;
                    self.summary.summaries += 1;
                    summaries.push(a);
                }
                None => {
                    tracing::debug!(key = key.as_str(), "no histograms for summary key");
                    skipped_keys.push(key.as_str().to_string());
                }
            }
        }
        let Some(results) = self
            .summary
            .skip_or_fail(COMPATIBILITY_FILE, results_artifact(summaries, skipped_keys, map))?
        else {
            return Ok(());
        };
        write_json(&self.opts.output_dir.join(COMPATIBILITY_FILE), &results)
    }

    fn write_results(&mut self, levels: Vec<LevelResults>) -> Result<()> {
        let inputs = [self.input_meta(0)?, self.input_meta(1)?];
        let results = results_file(
            self.opts.correlation,
            self.opts.bin_content,
            self.opts.eff_threshold,
            inputs,
            levels,
        )?;
        write_json(&self.opts.output_file, &results)
    }

    fn input_meta(&self, i: usize) -> Result<InputMeta> {
        let path = self.sources[i].path();
        let bytes =
            std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        Ok(InputMeta {
            label: self.opts.labels[i].clone(),
            path: path.display().to_string(),
            sha256: sha256_hex(&bytes),
        })
    }
}

fn write_log(path: &Path, result: &PullResult, header: &str) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let w = BufWriter::new(file);
    result.write_log(w, header).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "log written");
    Ok(())
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut w, value)?;
    w.write_all(b"\n")?;
    w.flush().with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "results written");
    Ok(())
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut h = Sha256::new();
    h.update(bytes);
    let out = h.finalize();
    let mut s = String::with_capacity(64);
    for b in out {
        s.push_str(&format!("{:02x}", b));
    }
    s
}
