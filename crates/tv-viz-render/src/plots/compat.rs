use tv_viz::CompatibilitySummaryArtifact;

use crate::canvas::Canvas;
use crate::config::VizConfig;
use crate::header::draw_header;
use crate::layout::axes::Axis;
use crate::layout::margins::PlotArea;
use crate::plots::axes_draw::{category_label_depth, draw_axes, draw_category_labels};
use crate::plots::{check_lengths, empty_svg};
use crate::primitives::*;

/// One bar per trigger path, height = χ²/ndf.
pub fn render(
    artifact: &CompatibilitySummaryArtifact,
    config: &VizConfig,
) -> crate::Result<String> {
    let n = artifact.paths.len();
    check_lengths(
        &format!("compatibility summary {}", artifact.key),
        n,
        &[("score", artifact.score.len()), ("histograms", artifact.histograms.len())],
    )?;
    if n == 0 {
        return Ok(empty_svg("No compatibility scores"));
    }

    let mut canvas = Canvas::new(config.figure.width, config.figure.height)
        .with_font_family(&config.figure.font_family);

    let angle = config.compat.label_angle;
    let depth = category_label_depth(&canvas, &artifact.paths, angle, config.font.tick_size);
    let reference = config.compat.reference.filter(|r| r.is_finite() && *r > 0.0);
    let y_top = artifact
        .score
        .iter()
        .copied()
        .filter(|s| s.is_finite())
        .chain(reference)
        .fold(0.0_f64, f64::max);
    let y_axis =
        Axis::auto_linear(0.0, (y_top * 1.15).max(1e-3), 5).with_label("\u{03C7}\u{00B2} / ndf");
    let x_axis = Axis::fixed(0.0, n as f64);
    let area = PlotArea::auto(&canvas, &y_axis, &x_axis, depth, config);

    let title = format!("{} compatibility", artifact.key);
    draw_header(&mut canvas, &area, config, &title);
    draw_axes(&mut canvas, &area, &x_axis, &y_axis, config);

    let slot = area.width / n as f64;
    let bar_w = slot * 0.7;
    let palette = config.palette_colors();
    let bar_style = Style::filled(palette[2 % palette.len()].with_alpha(0.85));
    let centers: Vec<f64> = (0..n).map(|i| area.left + (i as f64 + 0.5) * slot).collect();
    for (i, &score) in artifact.score.iter().enumerate() {
        if !score.is_finite() {
            continue;
        }
        let top = y_axis.data_to_pixel_clamped(score, area.bottom(), area.top);
        canvas.rect(centers[i] - bar_w / 2.0, top, bar_w, area.bottom() - top, &bar_style);
    }

    if let Some(r) = reference {
        let py = y_axis.data_to_pixel_clamped(r, area.bottom(), area.top);
        let style = LineStyle::dashed(config.colors.reference_line, 0.8);
        canvas.line(area.left, py, area.right(), py, &style);
    }

    let size = config.font.tick_size;
    draw_category_labels(&mut canvas, &area, &centers, &artifact.paths, angle, size);

    Ok(canvas.finish_svg())
}
