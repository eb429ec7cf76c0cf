use tv_viz::PullsArtifact;

use crate::canvas::Canvas;
use crate::color::Color;
use crate::config::VizConfig;
use crate::header::{draw_header, header_height};
use crate::layout::axes::Axis;
use crate::layout::margins::PlotArea;
use crate::plots::axes_draw::{draw_axes, draw_row_labels, row_label_width};
use crate::plots::{check_lengths, empty_svg};
use crate::primitives::*;

/// One row per trigger path, labels on the left.
fn row_canvas(labels: &[String], row_h: f64, config: &VizConfig) -> (Canvas, PlotArea) {
    let n = labels.len() as f64;
    let top = header_height(config);
    let bottom = config.font.tick_size + config.font.label_size + 30.0;
    let fig_w = config.figure.width;
    let fig_h = row_h * n + top + bottom;
    let canvas = Canvas::new(fig_w, fig_h).with_font_family(&config.figure.font_family);
    let label_w = row_label_width(&canvas, labels, config);
    let area = PlotArea::manual(label_w + 15.0, top, fig_w - label_w - 30.0, row_h * n);
    (canvas, area)
}

fn check(artifact: &PullsArtifact) -> crate::Result<usize> {
    let n = artifact.labels.len();
    check_lengths(
        "pulls artifact",
        n,
        &[
            ("residual", artifact.residual.len()),
            ("sigma", artifact.sigma.len()),
            ("pull", artifact.pull.len()),
            ("pull_defined", artifact.pull_defined.len()),
        ],
    )?;
    Ok(n)
}

/// Pull per trigger path, with ±1σ/±2σ bands.
pub fn render_pulls(artifact: &PullsArtifact, config: &VizConfig) -> crate::Result<String> {
    let n = check(artifact)?;
    if n == 0 {
        return Ok(empty_svg("No pull entries"));
    }

    let row_h = config.pulls.row_height;
    let (mut canvas, area) = row_canvas(&artifact.labels, row_h, config);

    let max_abs = artifact
        .pull
        .iter()
        .zip(&artifact.pull_defined)
        .filter(|(_, defined)| **defined)
        .map(|(p, _)| p.abs())
        .fold(0.0_f64, f64::max);
    let x_axis = Axis::symmetric(max_abs, config.pulls.min_range, 7)
        .with_label("Pull  (eff\u{2082} \u{2212} eff\u{2081}) / \u{03C3}");
    let y_axis = Axis::fixed(0.0, n as f64);
    let x_px = |v: f64| x_axis.data_to_pixel_clamped(v, area.left, area.right());

    let title = format!("{} pulls ({})", artifact.level.as_str(), artifact.correlation.as_str());
    draw_header(&mut canvas, &area, config, &title);

    for (sigmas, color) in [(2.0, config.colors.band_2sigma), (1.0, config.colors.band_1sigma)] {
        let lo = x_px(-sigmas);
        let band = Style::filled(color.with_alpha(0.35));
        canvas.rect(lo, area.top, x_px(sigmas) - lo, area.height, &band);
    }
    let x_zero = x_px(0.0);
    canvas.line(
        x_zero,
        area.top,
        x_zero,
        area.bottom(),
        &LineStyle::dashed(Color::rgb(100, 100, 100), 0.6),
    );

    draw_axes(&mut canvas, &area, &x_axis, &y_axis, config);
    draw_row_labels(&mut canvas, &area, &artifact.labels, row_h, config);

    let na_style = TextStyle::sized(config.font.tick_size * 0.85)
        .color(config.colors.undefined_pull)
        .baseline(TextBaseline::Central);
    let undefined = Marker::hollow(config.colors.undefined_pull, 2.5);
    for i in 0..n {
        let y = area.top + (i as f64 + 0.5) * row_h;
        if !artifact.pull_defined[i] {
            canvas.marker(x_zero, y, &undefined);
            canvas.text(x_zero + 6.0, y, "n/a", &na_style);
            continue;
        }
        let pull = artifact.pull[i];
        let color =
            if pull >= 0.0 { config.colors.positive_pull } else { config.colors.negative_pull };
        let px = x_px(pull);
        canvas.rect(
            px.min(x_zero),
            y - row_h * 0.3,
            (px - x_zero).abs(),
            row_h * 0.6,
            &Style::filled(color.with_alpha(0.7)),
        );
        canvas.marker(px, y, &Marker::filled(Color::rgb(0, 0, 0), 2.0));
    }

    Ok(canvas.finish_svg())
}

/// Residual `eff2 − eff1` per trigger path with its ±σ error bar.
pub fn render_residuals(artifact: &PullsArtifact, config: &VizConfig) -> crate::Result<String> {
    let n = check(artifact)?;
    if n == 0 {
        return Ok(empty_svg("No residual entries"));
    }

    let row_h = config.pulls.row_height;
    let (mut canvas, area) = row_canvas(&artifact.labels, row_h, config);

    let max_abs = artifact
        .residual
        .iter()
        .zip(&artifact.sigma)
        .map(|(r, s)| r.abs() + if s.is_finite() { *s } else { 0.0 })
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);
    let x_axis = Axis::symmetric(max_abs, 0.01, 7)
        .with_label("Residual  eff\u{2082} \u{2212} eff\u{2081}");
    let y_axis = Axis::fixed(0.0, n as f64);
    let x_px = |v: f64| x_axis.data_to_pixel_clamped(v, area.left, area.right());

    let title = format!("{} residuals", artifact.level.as_str());
    draw_header(&mut canvas, &area, config, &title);

    let x_zero = x_px(0.0);
    canvas.line(
        x_zero,
        area.top,
        x_zero,
        area.bottom(),
        &LineStyle::dashed(Color::rgb(100, 100, 100), 0.6),
    );
    draw_axes(&mut canvas, &area, &x_axis, &y_axis, config);
    draw_row_labels(&mut canvas, &area, &artifact.labels, row_h, config);

    let err_style = LineStyle::solid(Color::rgb(0, 0, 0), 0.9);
    for i in 0..n {
        let y = area.top + (i as f64 + 0.5) * row_h;
        let (residual, sigma) = (artifact.residual[i], artifact.sigma[i]);
        if !residual.is_finite() {
            continue;
        }
        if sigma > 0.0 && sigma.is_finite() {
            canvas.error_bar_h(x_px(residual - sigma), x_px(residual + sigma), y, 4.0, &err_style);
        }
        let color = if residual >= 0.0 {
            config.colors.positive_pull
        } else {
            config.colors.negative_pull
        };
        canvas.marker(x_px(residual), y, &Marker::filled(color, 2.8));
    }

    Ok(canvas.finish_svg())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tv_core::{CorrelationMode, Histogram1D, TriggerLevel};
    use tv_stats::PullCalculator;
    use tv_viz::pulls::pulls_artifact;

    fn artifact() -> PullsArtifact {
        let h1 = Histogram1D::new("L1Paths", vec![50.0, 30.0, 100.0, 80.0])
            .with_labels(["L1_A", "L1_B", "L1_Always", "Total"])
            .with_entries(100.0);
        let h2 = Histogram1D::new("L1Paths", vec![55.0, 25.0, 100.0, 80.0])
            .with_labels(["L1_A", "L1_B", "L1_Always", "Total"])
            .with_entries(100.0);
        let r = PullCalculator::new(CorrelationMode::Uncorrelated).compare(&h1, &h2).unwrap();
        pulls_artifact(TriggerLevel::L1, &r).unwrap()
    }

    #[test]
    fn pulls_mark_undefined_entries() {
        let a = artifact();
        // L1_Always is fully efficient in both inputs: zero uncertainty
        assert!(!a.pull_defined[2]);
        let svg = render_pulls(&a, &VizConfig::default()).unwrap();
        assert!(svg.contains(">L1_Always</text>"));
        assert!(svg.contains(">n/a</text>"));
        assert!(svg.contains("L1 pulls (uncorrelated)"));
        assert!(svg.contains(r#"font-weight="bold""#));
    }

    #[test]
    fn residuals_render() {
        let svg = render_residuals(&artifact(), &VizConfig::default()).unwrap();
        assert!(svg.contains("L1 residuals"));
        assert!(svg.contains("<circle"));
    }

    #[test]
    fn empty_and_ragged() {
        let mut a = artifact();
        a.pull.pop();
        assert!(render_pulls(&a, &VizConfig::default()).is_err());

        let mut empty = artifact();
        for v in [&mut empty.residual, &mut empty.sigma, &mut empty.pull] {
            v.clear();
        }
        empty.labels.clear();
        empty.pull_defined.clear();
        let svg = render_pulls(&empty, &VizConfig::default()).unwrap();
        assert!(svg.contains("No pull entries"));
    }
}
