//! Horizontal efficiency bars, two per trigger path.

use tv_viz::EfficiencyArtifact;

use crate::RenderError;
use crate::canvas::Canvas;
use crate::color::Color;
use crate::config::VizConfig;
use crate::header::{draw_header, header_height};
use crate::layout::axes::Axis;
use crate::layout::legend::{LegendCorner, LegendEntry, LegendKind, draw_legend};
use crate::layout::margins::PlotArea;
use crate::plots::axes_draw::{draw_axes, draw_row_labels, is_total, row_label_width};
use crate::plots::{check_lengths, empty_svg};
use crate::primitives::*;

/// Render page `page` (0-based) of an efficiency artifact.
pub fn render(
    artifact: &EfficiencyArtifact,
    page: usize,
    config: &VizConfig,
) -> crate::Result<String> {
    let data = artifact.pages.get(page).ok_or_else(|| {
        RenderError::Layout(format!(
            "efficiency page {} requested, artifact has {}",
            page + 1,
            artifact.pages.len()
        ))
    })?;
    let n = data.paths.len();
    check_lengths(
        "efficiency page",
        n,
        &[
            ("efficiency1", data.efficiency1.len()),
            ("uncertainty1", data.uncertainty1.len()),
            ("efficiency2", data.efficiency2.len()),
            ("uncertainty2", data.uncertainty2.len()),
        ],
    )?;
    if n == 0 {
        return Ok(empty_svg("No trigger paths"));
    }

    let row_h = config.efficiency.row_height;
    let top = header_height(config);
    let bottom = config.font.tick_size + config.font.label_size + 30.0;
    let fig_w = config.figure.width;
    let fig_h = (row_h * n as f64 + top + bottom).max(config.figure.height * 0.5);
    let mut canvas = Canvas::new(fig_w, fig_h).with_font_family(&config.figure.font_family);

    let label_w = row_label_width(&canvas, &data.paths, config);
    let area = PlotArea::manual(label_w + 15.0, top, fig_w - label_w - 30.0, row_h * n as f64);

    let x_max = data
        .efficiency1
        .iter()
        .zip(&data.uncertainty1)
        .chain(data.efficiency2.iter().zip(&data.uncertainty2))
        .map(|(e, u)| e + u)
        .filter(|v| v.is_finite())
        .fold(1.0_f64, f64::max);
    let x_axis = Axis::auto_linear(0.0, x_max, 6).with_label("Efficiency");
    let y_axis = Axis::fixed(0.0, n as f64);

    let title = format!(
        "{} efficiency, page {}/{}",
        artifact.level.as_str(),
        data.page,
        artifact.pages.len()
    );
    draw_header(&mut canvas, &area, config, &title);
    draw_axes(&mut canvas, &area, &x_axis, &y_axis, config);
    draw_row_labels(&mut canvas, &area, &data.paths, row_h, config);

    let colors = config.dataset_colors();
    let bar_h = row_h * 0.36;
    let err_style = LineStyle::solid(Color::rgb(0, 0, 0), 0.8);
    let value_style = TextStyle::sized(config.font.tick_size * 0.8)
        .color(Color::rgb(80, 80, 80))
        .baseline(TextBaseline::Central);
    let x_px = |v: f64| x_axis.data_to_pixel_clamped(v, area.left, area.right());

    for i in 0..n {
        let center = area.top + (i as f64 + 0.5) * row_h;
        if is_total(&data.paths[i]) && i > 0 {
            let sep = LineStyle::solid(Color::rgb(120, 120, 120), 0.6);
            canvas.line(area.left, center - row_h / 2.0, area.right(), center - row_h / 2.0, &sep);
        }

        let series = [
            (data.efficiency1[i], data.uncertainty1[i], center - bar_h - 0.5),
            (data.efficiency2[i], data.uncertainty2[i], center + 0.5),
        ];
        for (k, &(eff, unc, y)) in series.iter().enumerate() {
            if !eff.is_finite() {
                continue;
            }
            let end = x_px(eff);
            let fill = Style::filled(colors[k].with_alpha(0.8));
            canvas.rect(area.left, y, end - area.left, bar_h, &fill);
            if unc > 0.0 && unc.is_finite() {
                let (lo, hi) = (x_px(eff - unc), x_px(eff + unc));
                canvas.error_bar_h(lo, hi, y + bar_h / 2.0, bar_h * 0.6, &err_style);
            }
            if config.efficiency.show_values {
                canvas.text(end + 3.0, y + bar_h / 2.0, &format!("{eff:.3}"), &value_style);
            }
        }
    }

    let legend = [
        LegendEntry::new(artifact.dataset_labels[0].as_str(), colors[0], LegendKind::FilledRect),
        LegendEntry::new(artifact.dataset_labels[1].as_str(), colors[1], LegendKind::FilledRect),
    ];
    draw_legend(&mut canvas, &area, &legend, config.font.size, LegendCorner::BottomRight);

    Ok(canvas.finish_svg())
}
