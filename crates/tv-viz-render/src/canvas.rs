//! SVG drawing surface.
//!
//! Every call appends its element to the document body straight away; the
//! `<svg>` wrapper is added by [`Canvas::finish_svg`].

use std::fmt::Write as _;

use crate::color::Color;
use crate::primitives::{LineStyle, Marker, Style, TextStyle};
use crate::text::{TextMetrics, measure_styled};

/// Drawing surface in points (1pt = 1/72"), origin at the top left.
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    font_family: String,
    body: String,
}

impl Canvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            font_family: "Helvetica, Arial, sans-serif".into(),
            body: String::with_capacity(16 * 1024),
        }
    }

    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, style: &Style) {
        let attrs = shape_attrs(style);
        self.push(format_args!(
            r#"<rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}"{attrs} />"#
        ));
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, style: &LineStyle) {
        let attrs = stroke_attrs(style);
        self.push(format_args!(
            r#"<line x1="{x1:.2}" y1="{y1:.2}" x2="{x2:.2}" y2="{y2:.2}"{attrs} />"#
        ));
    }

    pub fn polyline(&mut self, points: &[(f64, f64)], style: &LineStyle) {
        let coords: Vec<String> = points.iter().map(|(x, y)| format!("{x:.2},{y:.2}")).collect();
        let attrs = stroke_attrs(style);
        self.push(format_args!(
            r#"<polyline points="{}" fill="none"{attrs} />"#,
            coords.join(" ")
        ));
    }

    pub fn text(&mut self, x: f64, y: f64, content: &str, style: &TextStyle) {
        self.write_text(x, y, content, style, None);
    }

    /// Text turned by `angle` degrees around its anchor point.
    pub fn text_rotated(&mut self, x: f64, y: f64, content: &str, style: &TextStyle, angle: f64) {
        self.write_text(x, y, content, style, Some(angle));
    }

    /// Vertical error bar; no caps when `cap_width` is zero.
    pub fn error_bar(&mut self, x: f64, y_lo: f64, y_hi: f64, cap_width: f64, style: &LineStyle) {
        self.line(x, y_lo, x, y_hi, style);
        if cap_width > 0.0 {
            let half = cap_width / 2.0;
            for y in [y_lo, y_hi] {
                self.line(x - half, y, x + half, y, style);
            }
        }
    }

    /// Horizontal error bar; no caps when `cap_height` is zero.
    pub fn error_bar_h(
        &mut self,
        x_lo: f64,
        x_hi: f64,
        y: f64,
        cap_height: f64,
        style: &LineStyle,
    ) {
        self.line(x_lo, y, x_hi, y, style);
        if cap_height > 0.0 {
            let half = cap_height / 2.0;
            for x in [x_lo, x_hi] {
                self.line(x, y - half, x, y + half, style);
            }
        }
    }

    pub fn marker(&mut self, x: f64, y: f64, marker: &Marker) {
        let style = if marker.hollow {
            Style::filled(Color::rgb(255, 255, 255)).with_stroke(marker.color, 1.0)
        } else {
            Style::filled(marker.color).with_stroke(marker.color, 0.5)
        };
        let attrs = shape_attrs(&style);
        let r = marker.radius;
        self.push(format_args!(r#"<circle cx="{x:.2}" cy="{y:.2}" r="{r:.2}"{attrs} />"#));
    }

    pub fn measure_text(&self, content: &str, style: &TextStyle) -> TextMetrics {
        measure_styled(content, style)
    }

    /// The complete SVG document.
    pub fn finish_svg(self) -> String {
        let (w, h) = (self.width, self.height);
        let mut out = String::with_capacity(self.body.len() + 256);
        out.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
        ));
        out.push('\n');
        out.push_str(&format!(r#"<rect width="{w}" height="{h}" fill="white" />"#));
        out.push('\n');
        out.push_str(&self.body);
        out.push_str("</svg>\n");
        out
    }

    fn push(&mut self, element: std::fmt::Arguments<'_>) {
        // Writing into a String cannot fail.
        let _ = self.body.write_fmt(element);
        self.body.push('\n');
    }

    fn write_text(
        &mut self,
        x: f64,
        y: f64,
        content: &str,
        style: &TextStyle,
        rotate: Option<f64>,
    ) {
        let mut attrs = format!(
            r#" font-family="{}" font-size="{:.1}" fill="{}" text-anchor="{}" dominant-baseline="{}""#,
            self.font_family,
            style.size,
            style.color.to_svg_fill(),
            style.anchor.svg_value(),
            style.baseline.svg_value(),
        );
        if style.bold {
            attrs.push_str(r#" font-weight="bold""#);
        }
        if style.italic {
            attrs.push_str(r#" font-style="italic""#);
        }
        if let Some(angle) = rotate {
            attrs.push_str(&format!(r#" transform="rotate({angle:.1},{x:.2},{y:.2})""#));
        }
        let text = escape(content);
        self.push(format_args!(r#"<text x="{x:.2}" y="{y:.2}"{attrs}>{text}</text>"#));
    }
}

fn escape(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for ch in content.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

fn shape_attrs(style: &Style) -> String {
    let mut attrs = match style.fill {
        Some(fill) => format!(r#" fill="{}""#, fill.to_svg_fill()),
        None => r#" fill="none""#.to_string(),
    };
    if let Some(stroke) = style.stroke {
        attrs.push_str(&format!(
            r#" stroke="{}" stroke-width="{:.2}""#,
            stroke.to_svg_fill(),
            style.stroke_width
        ));
    }
    if (style.opacity - 1.0).abs() > 1e-4 {
        attrs.push_str(&format!(r#" opacity="{:.3}""#, style.opacity));
    }
    attrs
}

fn stroke_attrs(style: &LineStyle) -> String {
    let mut attrs =
        format!(r#" stroke="{}" stroke-width="{:.2}""#, style.color.to_svg_fill(), style.width);
    if let Some(dash) = style.dash.pattern() {
        attrs.push_str(&format!(r#" stroke-dasharray="{dash}""#));
    }
    attrs
}
