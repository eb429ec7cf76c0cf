//! Two unit-area distributions overlaid, with an optional ratio panel.

use tv_viz::OverlayArtifact;

use crate::canvas::Canvas;
use crate::color::Color;
use crate::config::VizConfig;
use crate::header::draw_header;
use crate::layout::axes::Axis;
use crate::layout::legend::{LegendCorner, LegendEntry, LegendKind, draw_legend};
use crate::layout::margins::PlotArea;
use crate::layout::multi_panel::MainRatioLayout;
use crate::plots::axes_draw::{category_label_depth, draw_axes, draw_category_labels};
use crate::plots::{check_lengths, empty_svg};
use crate::primitives::*;

const LABEL_ANGLE: f64 = -45.0;

pub fn render(artifact: &OverlayArtifact, config: &VizConfig) -> crate::Result<String> {
    let [first, second] = artifact.series.as_slice() else {
        return Err(crate::RenderError::Layout(format!(
            "overlay {}: expected 2 series, got {}",
            artifact.name,
            artifact.series.len()
        )));
    };
    let n = first.y.len();
    let mut lens = vec![
        ("bin_edges", artifact.bin_edges.len().saturating_sub(1)),
        ("first yerr", first.yerr.len()),
        ("second y", second.y.len()),
        ("second yerr", second.yerr.len()),
    ];
    if let Some(labels) = &artifact.bin_labels {
        lens.push(("bin_labels", labels.len()));
    }
    check_lengths(&format!("overlay {}", artifact.name), n, &lens)?;
    if n == 0 {
        return Ok(empty_svg("No bins"));
    }

    let fig_h = if config.overlay.show_ratio {
        config.figure.height * 1.3
    } else {
        config.figure.height
    };
    let mut canvas =
        Canvas::new(config.figure.width, fig_h).with_font_family(&config.figure.font_family);

    let edges = &artifact.bin_edges;
    let (x_min, x_max) = (edges[0], edges[n]);
    let (x_axis, label_depth) = match &artifact.bin_labels {
        Some(labels) => (
            Axis::fixed(x_min, x_max),
            category_label_depth(&canvas, labels, LABEL_ANGLE, config.font.tick_size),
        ),
        None => (Axis::auto_linear(x_min, x_max, 6).with_label(&artifact.title), 0.0),
    };
    let y_max = first
        .y
        .iter()
        .zip(&first.yerr)
        .chain(second.y.iter().zip(&second.yerr))
        .map(|(y, e)| y + e)
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);
    let y_axis =
        Axis::auto_linear(0.0, (y_max * 1.35).max(1e-3), 5).with_label("Fraction of entries");

    let outer = PlotArea::auto(&canvas, &y_axis, &x_axis, label_depth, config);
    let layout = if config.overlay.show_ratio {
        MainRatioLayout::new(&outer, 6.0, 0.28)
    } else {
        MainRatioLayout { main: outer, ratio: outer }
    };
    let main = layout.main;

    draw_header(&mut canvas, &main, config, &artifact.name);

    // x ticks belong to the bottom-most panel only
    let x_bare = Axis { tick_labels: Vec::new(), label: String::new(), ..x_axis.clone() };
    let main_x = if config.overlay.show_ratio { &x_bare } else { &x_axis };
    draw_axes(&mut canvas, &main, main_x, &y_axis, config);

    let colors = config.dataset_colors();
    let x_px = |v: f64, area: &PlotArea| x_axis.data_to_pixel(v, area.left, area.right());
    let centers: Vec<f64> = (0..n).map(|i| x_px(0.5 * (edges[i] + edges[i + 1]), &main)).collect();
    let y_px = |v: f64| y_axis.data_to_pixel_clamped(v, main.bottom(), main.top);

    // first input: step outline with error bars
    let mut steps = Vec::with_capacity(2 * n);
    for i in 0..n {
        let y = y_px(first.y[i]);
        steps.push((x_px(edges[i], &main), y));
        steps.push((x_px(edges[i + 1], &main), y));
    }
    canvas.polyline(&steps, &LineStyle::solid(colors[0], 1.5));
    let err_first = LineStyle::solid(colors[0], 0.8);
    for i in 0..n {
        if first.yerr[i] > 0.0 {
            let (lo, hi) = (y_px(first.y[i] - first.yerr[i]), y_px(first.y[i] + first.yerr[i]));
            canvas.error_bar(centers[i], lo, hi, 0.0, &err_first);
        }
    }

    // second input: markers
    let err_second = LineStyle::solid(colors[1], 1.0);
    let marker = Marker::filled(colors[1], 2.5);
    for i in 0..n {
        if second.yerr[i] > 0.0 {
            let (lo, hi) =
                (y_px(second.y[i] - second.yerr[i]), y_px(second.y[i] + second.yerr[i]));
            canvas.error_bar(centers[i], lo, hi, 0.0, &err_second);
        }
        canvas.marker(centers[i], y_px(second.y[i]), &marker);
    }

    let score = &artifact.compatibility;
    let fit = format!(
        "\u{03C7}\u{00B2}/ndf = {:.2}/{}, p = {:.3}",
        score.chi2, score.ndf, score.p_value
    );
    let legend = [
        LegendEntry::new(
            format!("{} ({:.0})", first.label, first.entries),
            colors[0],
            LegendKind::Line,
        ),
        LegendEntry::new(
            format!("{} ({:.0})", second.label, second.entries),
            colors[1],
            LegendKind::Marker,
        ),
        LegendEntry::new(fit, Color::rgb(0, 0, 0), LegendKind::Note),
    ];
    draw_legend(&mut canvas, &main, &legend, config.font.size, LegendCorner::TopRight);

    let bottom = if config.overlay.show_ratio {
        draw_ratio(&mut canvas, &layout.ratio, artifact, &x_axis, &centers, config);
        layout.ratio
    } else {
        main
    };
    if let Some(labels) = &artifact.bin_labels {
        let size = config.font.tick_size;
        draw_category_labels(&mut canvas, &bottom, &centers, labels, LABEL_ANGLE, size);
    }

    Ok(canvas.finish_svg())
}

/// second / first per bin, over bins where both are non-empty.
fn draw_ratio(
    canvas: &mut Canvas,
    area: &PlotArea,
    artifact: &OverlayArtifact,
    x_axis: &Axis,
    centers: &[f64],
    config: &VizConfig,
) {
    let [lo, hi] = config.overlay.ratio_y_range;
    let y_axis = Axis::auto_linear(lo, hi, 3).with_label("Ratio");
    draw_axes(canvas, area, x_axis, &y_axis, config);

    let one = y_axis.data_to_pixel(1.0, area.bottom(), area.top);
    canvas.line(
        area.left,
        one,
        area.right(),
        one,
        &LineStyle::dashed(config.colors.reference_line, 0.8),
    );

    let (first, second) = (&artifact.series[0], &artifact.series[1]);
    let color = config.dataset_colors()[1];
    let y_px = |v: f64| y_axis.data_to_pixel_clamped(v, area.bottom(), area.top);
    for (i, &px) in centers.iter().enumerate() {
        let (a, b) = (first.y[i], second.y[i]);
        if a <= 0.0 || b <= 0.0 {
            continue;
        }
        let r = b / a;
        let err = r * ((first.yerr[i] / a).powi(2) + (second.yerr[i] / b).powi(2)).sqrt();
        if err > 0.0 && err.is_finite() {
            canvas.error_bar(px, y_px(r - err), y_px(r + err), 0.0, &LineStyle::solid(color, 1.0));
        }
        canvas.marker(px, y_px(r), &Marker::filled(color, 2.2));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tv_core::Histogram1D;
    use tv_stats::chi2_test;
    use tv_viz::overlay::overlay_artifact;

    fn artifact(labels: bool) -> OverlayArtifact {
        let mut h1 = Histogram1D::new("JetMult", vec![10.0, 20.0, 15.0, 0.0])
            .with_edges(vec![-0.5, 0.5, 1.5, 2.5, 3.5]);
        let mut h2 = Histogram1D::new("JetMult", vec![12.0, 18.0, 15.0, 1.0])
            .with_edges(vec![-0.5, 0.5, 1.5, 2.5, 3.5]);
        if labels {
            h1 = h1.with_labels(["0j", "1j", "2j", "3j"]);
            h2 = h2.with_labels(["0j", "1j", "2j", "3j"]);
        }
        let s = chi2_test(&h1, &h2).unwrap();
        overlay_artifact("JetMult", &h1, &h2, ["run1", "run2"], s).unwrap()
    }

    #[test]
    fn overlay_with_ratio_panel() {
        let svg = render(&artifact(false), &VizConfig::default()).unwrap();
        assert!(svg.contains("<polyline"));
        assert!(svg.contains(">Ratio</text>"));
        assert!(svg.contains("run1 (45)"));
        assert!(svg.contains("run2 (46)"));
        assert!(svg.contains("ndf = "));
    }

    #[test]
    fn labelled_bins_are_drawn_as_categories() {
        let mut config = VizConfig::default();
        config.overlay.show_ratio = false;
        let svg = render(&artifact(true), &config).unwrap();
        assert!(svg.contains(">2j</text>"));
        assert!(svg.contains("rotate(-45.0"));
        assert!(!svg.contains(">Ratio</text>"));
    }

    #[test]
    fn wrong_series_count_is_rejected() {
        let mut a = artifact(false);
        a.series.pop();
        assert!(render(&a, &VizConfig::default()).is_err());
    }
}
