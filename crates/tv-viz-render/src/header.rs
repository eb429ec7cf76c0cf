use crate::canvas::Canvas;
use crate::color::Color;
use crate::config::VizConfig;
use crate::layout::margins::PlotArea;
use crate::primitives::{TextAnchor, TextStyle};

const GAP_ABOVE_AREA: f64 = 6.0;

fn label_size(config: &VizConfig) -> f64 {
    config.font.label_size * 1.3
}

/// Experiment label (bold name, italic status) at the top left of `area`,
/// `title` at the top right. Empty parts are left out.
pub fn draw_header(canvas: &mut Canvas, area: &PlotArea, config: &VizConfig, title: &str) {
    let baseline = area.top - GAP_ABOVE_AREA;
    let experiment = &config.experiment;

    if !experiment.name.is_empty() {
        let name_style = TextStyle::sized(label_size(config)).bold();
        canvas.text(area.left, baseline, &experiment.name, &name_style);

        if !experiment.status.is_empty() {
            let offset = canvas.measure_text(&experiment.name, &name_style).width + 5.0;
            let status_style = TextStyle::sized(label_size(config) * 0.85).italic();
            canvas.text(area.left + offset, baseline, &experiment.status, &status_style);
        }
    }

    if !title.is_empty() {
        let title_style = TextStyle::sized(config.font.size)
            .color(Color::rgb(60, 60, 60))
            .anchor(TextAnchor::End);
        canvas.text(area.right(), baseline, title, &title_style);
    }
}

/// Space reserved above the plot area for [`draw_header`].
pub fn header_height(config: &VizConfig) -> f64 {
    label_size(config) + 20.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_follows_experiment_name() {
        let mut config = VizConfig::default();
        config.experiment.name = "CMS".into();
        config.experiment.status = "Preliminary".into();
        let area = PlotArea { left: 50.0, top: 40.0, width: 200.0, height: 100.0 };
        let mut canvas = Canvas::new(300.0, 200.0);
        draw_header(&mut canvas, &area, &config, "L1 pulls");
        let svg = canvas.finish_svg();
        assert!(svg.contains(">CMS</text>"));
        assert!(svg.contains(r#"font-style="italic""#));
        assert!(svg.contains(r#"text-anchor="end""#));
    }
}
