use crate::canvas::Canvas;
use crate::config::VizConfig;
use crate::header::header_height;
use crate::layout::axes::Axis;
use crate::primitives::TextStyle;

/// Rectangular plot area within the canvas.
#[derive(Debug, Clone, Copy)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Margins from the y tick labels and axis labels.
    ///
    /// `x_label_depth` is the extra space category labels below the x axis
    /// need (0 for numeric ticks).
    pub fn auto(
        canvas: &Canvas,
        y_axis: &Axis,
        x_axis: &Axis,
        x_label_depth: f64,
        config: &VizConfig,
    ) -> Self {
        let tick_style = TextStyle::sized(config.font.tick_size);
        let label_style = TextStyle::sized(config.font.label_size);

        let max_tick_w = y_axis
            .tick_labels
            .iter()
            .map(|l| canvas.measure_text(l, &tick_style).width)
            .fold(0.0_f64, f64::max);
        let mut left = 15.0 + max_tick_w + 8.0;
        if !y_axis.label.is_empty() {
            left += label_style.size + 6.0;
        }

        let mut bottom = 15.0 + tick_style.size + 6.0 + x_label_depth;
        if !x_axis.label.is_empty() {
            bottom += label_style.size + 6.0;
        }

        let top = header_height(config);
        let right = 15.0;

        let width = canvas.width - left - right;
        let height = canvas.height - top - bottom;
        Self { left, top, width: width.max(50.0), height: height.max(50.0) }
    }

    /// Manual margins (row-based and multi-panel layouts).
    pub fn manual(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_area_fits_canvas() {
        let config = VizConfig::default();
        let canvas = Canvas::new(config.figure.width, config.figure.height);
        let y = Axis::auto_linear(0.0, 1000.0, 5).with_label("Score");
        let x = Axis::fixed(0.0, 4.0);
        let area = PlotArea::auto(&canvas, &y, &x, 40.0, &config);
        assert!(area.left > 15.0);
        assert!(area.right() <= canvas.width);
        assert!(area.bottom() <= canvas.height - 40.0);
    }
}
