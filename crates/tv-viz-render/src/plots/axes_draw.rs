use crate::canvas::Canvas;
use crate::color::Color;
use crate::config::VizConfig;
use crate::layout::axes::Axis;
use crate::layout::margins::PlotArea;
use crate::primitives::{LineStyle, TextAnchor, TextBaseline, TextStyle};

/// Tick geometry shared by both axes.
struct Ticks {
    major: LineStyle,
    minor: LineStyle,
    grid: Option<LineStyle>,
    /// -1 for ticks pointing into the plot area.
    dir: f64,
    len: f64,
    minor_len: f64,
}

impl Ticks {
    fn from_config(config: &VizConfig) -> Self {
        let black = Color::rgb(0, 0, 0);
        let grid_color = config.grid.color.with_alpha(config.grid.alpha);
        Self {
            major: LineStyle::solid(black, 0.6),
            minor: LineStyle::solid(black, 0.4),
            grid: config.grid.show.then(|| LineStyle::grid(grid_color, 0.5)),
            dir: if config.axes.tick_direction == "in" { -1.0 } else { 1.0 },
            len: config.axes.tick_length,
            minor_len: config.axes.minor_tick_length,
        }
    }

    fn inward(&self) -> bool {
        self.dir < 0.0
    }

    /// Room taken outside the frame by the ticks themselves.
    fn outside(&self) -> f64 {
        if self.inward() { 0.0 } else { self.len }
    }
}

fn within(px: f64, lo: f64, hi: f64) -> bool {
    px >= lo - 0.5 && px <= hi + 0.5
}

fn draw_x_ticks(
    canvas: &mut Canvas,
    area: &PlotArea,
    axis: &Axis,
    ticks: &Ticks,
    config: &VizConfig,
) {
    let label_style = TextStyle::sized(config.font.tick_size)
        .anchor(TextAnchor::Middle)
        .baseline(TextBaseline::Hanging);
    let (top, bottom) = (area.top, area.bottom());
    let label_y = bottom + ticks.outside() + 3.0;

    for (i, &val) in axis.tick_positions.iter().enumerate() {
        let px = axis.data_to_pixel(val, area.left, area.right());
        if !within(px, area.left, area.right()) {
            continue;
        }
        if let Some(grid) = &ticks.grid {
            canvas.line(px, top, px, bottom, grid);
        }
        canvas.line(px, bottom, px, bottom + ticks.dir * ticks.len, &ticks.major);
        if config.axes.show_top_ticks {
            canvas.line(px, top, px, top - ticks.dir * ticks.len, &ticks.major);
        }
        if let Some(label) = axis.tick_labels.get(i) {
            canvas.text(px, label_y, label, &label_style);
        }
    }
    for &val in &axis.minor_ticks {
        let px = axis.data_to_pixel(val, area.left, area.right());
        if within(px, area.left, area.right()) {
            canvas.line(px, bottom, px, bottom + ticks.dir * ticks.minor_len, &ticks.minor);
        }
    }
}

/// Returns the x position of the right edge of the tick labels and their widest width.
fn draw_y_ticks(
    canvas: &mut Canvas,
    area: &PlotArea,
    axis: &Axis,
    ticks: &Ticks,
    config: &VizConfig,
) -> (f64, f64) {
    let label_style = TextStyle::sized(config.font.tick_size)
        .anchor(TextAnchor::End)
        .baseline(TextBaseline::Central);
    let (left, right) = (area.left, area.right());
    let label_x = left - ticks.outside() - 4.0;

    for (i, &val) in axis.tick_positions.iter().enumerate() {
        let py = axis.data_to_pixel(val, area.bottom(), area.top);
        if !within(py, area.top, area.bottom()) {
            continue;
        }
        if let Some(grid) = &ticks.grid {
            canvas.line(left, py, right, py, grid);
        }
        canvas.line(left, py, left - ticks.dir * ticks.len, py, &ticks.major);
        if config.axes.show_right_ticks {
            canvas.line(right, py, right + ticks.dir * ticks.len, py, &ticks.major);
        }
        if let Some(label) = axis.tick_labels.get(i) {
            canvas.text(label_x, py, label, &label_style);
        }
    }
    for &val in &axis.minor_ticks {
        let py = axis.data_to_pixel(val, area.bottom(), area.top);
        if within(py, area.top, area.bottom()) {
            canvas.line(left, py, left - ticks.dir * ticks.minor_len, py, &ticks.minor);
        }
    }

    let widest = widest_label(canvas, &axis.tick_labels, &label_style);
    (label_x, widest)
}

fn widest_label(canvas: &Canvas, labels: &[String], style: &TextStyle) -> f64 {
    labels.iter().map(|l| canvas.measure_text(l, style).width).fold(0.0_f64, f64::max)
}

/// Frame, ticks, grid and titles of both axes.
pub fn draw_axes(
    canvas: &mut Canvas,
    area: &PlotArea,
    x_axis: &Axis,
    y_axis: &Axis,
    config: &VizConfig,
) {
    let ticks = Ticks::from_config(config);
    draw_x_ticks(canvas, area, x_axis, &ticks, config);
    let (y_label_x, y_label_w) = draw_y_ticks(canvas, area, y_axis, &ticks, config);
    draw_frame(canvas, area);

    let title_style = TextStyle::sized(config.font.label_size).anchor(TextAnchor::Middle);
    if !x_axis.label.is_empty() {
        let y = area.bottom() + ticks.outside() + config.font.tick_size + 14.0;
        canvas.text(area.left + area.width / 2.0, y, &x_axis.label, &title_style);
    }
    if !y_axis.label.is_empty() {
        let x = y_label_x - y_label_w - config.font.label_size * 0.6;
        let y = area.top + area.height / 2.0;
        canvas.text_rotated(x, y, &y_axis.label, &title_style, -90.0);
    }
}

/// Draw the frame only (row-based plots render their own category labels).
pub fn draw_frame(canvas: &mut Canvas, area: &PlotArea) {
    let style = LineStyle::solid(Color::rgb(0, 0, 0), 0.8);
    canvas.line(area.left, area.top, area.right(), area.top, &style);
    canvas.line(area.left, area.bottom(), area.right(), area.bottom(), &style);
    canvas.line(area.left, area.top, area.left, area.bottom(), &style);
    canvas.line(area.right(), area.top, area.right(), area.bottom(), &style);
}

/// Vertical space taken by category labels drawn at `angle` degrees.
pub fn category_label_depth(canvas: &Canvas, labels: &[String], angle: f64, size: f64) -> f64 {
    let widest = widest_label(canvas, labels, &TextStyle::sized(size));
    widest * angle.to_radians().sin().abs() + size + 6.0
}

/// Category labels under the x axis, one per pixel position.
pub fn draw_category_labels(
    canvas: &mut Canvas,
    area: &PlotArea,
    centers: &[f64],
    labels: &[String],
    angle: f64,
    size: f64,
) {
    let flat = angle.abs() < 1.0;
    let style = if flat {
        TextStyle::sized(size).anchor(TextAnchor::Middle).baseline(TextBaseline::Hanging)
    } else {
        TextStyle::sized(size).anchor(TextAnchor::End).baseline(TextBaseline::Central)
    };
    let y = area.bottom() + 6.0;
    for (&px, label) in centers.iter().zip(labels) {
        if flat {
            canvas.text(px, y, label, &style);
        } else {
            canvas.text_rotated(px, y, label, &style, angle);
        }
    }
}

/// Trigger-path labels to the left of row-based plots; the Total row is bold.
pub fn draw_row_labels(
    canvas: &mut Canvas,
    area: &PlotArea,
    labels: &[String],
    row_h: f64,
    config: &VizConfig,
) {
    let regular = TextStyle::sized(config.font.tick_size)
        .anchor(TextAnchor::End)
        .baseline(TextBaseline::Central);
    let bold = regular.clone().bold();
    for (i, label) in labels.iter().enumerate() {
        let y = area.top + (i as f64 + 0.5) * row_h;
        let style = if is_total(label) { &bold } else { &regular };
        canvas.text(area.left - 5.0, y, label, style);
    }
}

/// Width needed by [`draw_row_labels`].
pub fn row_label_width(canvas: &Canvas, labels: &[String], config: &VizConfig) -> f64 {
    widest_label(canvas, labels, &TextStyle::sized(config.font.tick_size).bold()) + 10.0
}

pub fn is_total(label: &str) -> bool {
    label == tv_stats::efficiency::TOTAL_LABEL
}
