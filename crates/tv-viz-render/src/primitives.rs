use crate::color::Color;

/// Fill and outline of a rectangle or circle.
#[derive(Debug, Clone)]
pub struct Style {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: f64,
    pub opacity: f64,
}

impl Style {
    pub fn filled(color: Color) -> Self {
        Self { fill: Some(color), stroke: None, stroke_width: 1.0, opacity: 1.0 }
    }

    pub fn outlined(color: Color, width: f64) -> Self {
        Self { fill: None, stroke: Some(color), stroke_width: width, opacity: 1.0 }
    }

    /// Same style with an outline added.
    pub fn with_stroke(mut self, color: Color, width: f64) -> Self {
        self.stroke = Some(color);
        self.stroke_width = width;
        self
    }
}

/// Dash pattern of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dash {
    #[default]
    Solid,
    /// Reference lines (zero pull, unit ratio, χ²/ndf = 1).
    Dashed,
    /// Background grid.
    Fine,
}

impl Dash {
    /// Value of `stroke-dasharray`, if any.
    pub fn pattern(self) -> Option<&'static str> {
        match self {
            Dash::Solid => None,
            Dash::Dashed => Some("6 3"),
            Dash::Fine => Some("3 3"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LineStyle {
    pub color: Color,
    pub width: f64,
    pub dash: Dash,
}

impl LineStyle {
    pub fn solid(color: Color, width: f64) -> Self {
        Self { color, width, dash: Dash::Solid }
    }

    pub fn dashed(color: Color, width: f64) -> Self {
        Self { color, width, dash: Dash::Dashed }
    }

    pub fn grid(color: Color, width: f64) -> Self {
        Self { color, width, dash: Dash::Fine }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    pub fn svg_value(self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextBaseline {
    Alphabetic,
    Central,
    Hanging,
}

impl TextBaseline {
    pub fn svg_value(self) -> &'static str {
        match self {
            TextBaseline::Alphabetic => "auto",
            TextBaseline::Central => "central",
            TextBaseline::Hanging => "hanging",
        }
    }
}

/// Text appearance. Built with [`TextStyle::sized`] and the chained setters.
#[derive(Debug, Clone)]
pub struct TextStyle {
    pub size: f64,
    pub color: Color,
    pub bold: bool,
    pub italic: bool,
    pub anchor: TextAnchor,
    pub baseline: TextBaseline,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::sized(10.0)
    }
}

impl TextStyle {
    /// Black, regular, start-anchored text of `size` points.
    pub fn sized(size: f64) -> Self {
        Self {
            size,
            color: Color::rgb(0, 0, 0),
            bold: false,
            italic: false,
            anchor: TextAnchor::Start,
            baseline: TextBaseline::Alphabetic,
        }
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn anchor(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn baseline(mut self, baseline: TextBaseline) -> Self {
        self.baseline = baseline;
        self
    }
}

/// Circular data marker; `radius` in points.
#[derive(Debug, Clone, Copy)]
pub struct Marker {
    pub radius: f64,
    pub color: Color,
    pub hollow: bool,
}

impl Marker {
    pub fn filled(color: Color, radius: f64) -> Self {
        Self { radius, color, hollow: false }
    }

    /// White-filled circle with a coloured outline (undefined values).
    pub fn hollow(color: Color, radius: f64) -> Self {
        Self { radius, color, hollow: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_style_builder() {
        let s = TextStyle::sized(12.0).bold().anchor(TextAnchor::End);
        assert!(s.bold && !s.italic);
        assert_eq!(s.anchor.svg_value(), "end");
        assert_eq!(TextStyle::default().size, 10.0);
    }

    #[test]
    fn dash_patterns() {
        assert_eq!(LineStyle::solid(Color::rgb(0, 0, 0), 1.0).dash.pattern(), None);
        assert_eq!(LineStyle::grid(Color::rgb(0, 0, 0), 0.5).dash.pattern(), Some("3 3"));
    }
}
