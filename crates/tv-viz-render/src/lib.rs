//! # tv-viz-render
//!
//! Renders `tv-viz` artifacts to SVG, and to PNG with the `png` feature.
//!
//! Every plot draws onto its own [`canvas::Canvas`], which is dropped once
//! the SVG string has been produced.

pub mod canvas;
pub mod color;
pub mod config;
pub mod header;
pub mod layout;
pub mod output;
pub mod plots;
pub mod primitives;
pub mod text;
pub mod theme;

use std::path::Path;

use config::VizConfig;
use output::OutputFormat;
use thiserror::Error;
use tv_viz::{
    CompatibilitySummaryArtifact, EfficiencyArtifact, OverlayArtifact, PullsArtifact,
};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unknown output format: {0}")]
    UnknownFormat(String),
    #[error("output format {0} is not available in this build")]
    FormatUnavailable(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("layout error: {0}")]
    Layout(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "png")]
    #[error("PNG encoding error: {0}")]
    Png(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;

/// One drawable plot, borrowed from its artifact.
#[derive(Debug, Clone, Copy)]
pub enum Plot<'a> {
    /// One page (0-based index into `pages`) of an efficiency artifact.
    EfficiencyPage { artifact: &'a EfficiencyArtifact, page: usize },
    Pulls(&'a PullsArtifact),
    Residuals(&'a PullsArtifact),
    Overlay(&'a OverlayArtifact),
    Compatibility(&'a CompatibilitySummaryArtifact),
}

impl Plot<'_> {
    /// Short name used in log messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Plot::EfficiencyPage { .. } => "efficiency",
            Plot::Pulls(_) => "pulls",
            Plot::Residuals(_) => "residuals",
            Plot::Overlay(_) => "overlay",
            Plot::Compatibility(_) => "compatibility",
        }
    }
}

/// Render a plot to an SVG string.
pub fn render_svg(plot: &Plot<'_>, config: &VizConfig) -> Result<String> {
    match *plot {
        Plot::EfficiencyPage { artifact, page } => {
            plots::efficiency::render(artifact, page, config)
        }
        Plot::Pulls(art) => plots::pulls::render_pulls(art, config),
        Plot::Residuals(art) => plots::pulls::render_residuals(art, config),
        Plot::Overlay(art) => plots::overlay::render(art, config),
        Plot::Compatibility(art) => plots::compat::render(art, config),
    }
}

/// Render a plot to bytes in the requested format.
pub fn render_to_bytes(
    plot: &Plot<'_>,
    format: OutputFormat,
    config: &VizConfig,
) -> Result<Vec<u8>> {
    let svg = render_svg(plot, config)?;
    match format {
        OutputFormat::Svg => Ok(svg.into_bytes()),
        #[cfg(feature = "png")]
        OutputFormat::Png => output::png::svg_to_png(&svg, config.output.dpi),
        #[cfg(not(feature = "png"))]
        OutputFormat::Png => Err(RenderError::FormatUnavailable(format.to_string())),
    }
}

/// Render a plot to a file, format inferred from the extension.
pub fn render_to_file(plot: &Plot<'_>, path: &Path, config: &VizConfig) -> Result<()> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("svg");
    let format: OutputFormat = ext.parse()?;
    let bytes = render_to_bytes(plot, format, config)?;
    std::fs::write(path, bytes)?;
    tracing::debug!(kind = plot.kind(), path = %path.display(), "plot written");
    Ok(())
}
