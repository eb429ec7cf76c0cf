use crate::color::Color;
use crate::config::*;

/// Built-in theme presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinTheme {
    Trigger,
    Cms,
    Minimal,
}

impl BuiltinTheme {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "trigger" | "default" => Some(Self::Trigger),
            "cms" => Some(Self::Cms),
            "minimal" => Some(Self::Minimal),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Trigger => "trigger",
            Self::Cms => "cms",
            Self::Minimal => "minimal",
        }
    }

    pub fn base_config(self) -> VizConfig {
        match self {
            Self::Trigger => trigger(),
            Self::Cms => cms(),
            Self::Minimal => minimal(),
        }
    }
}

fn trigger() -> VizConfig {
    VizConfig {
        theme: "trigger".into(),
        figure: FigureConfig::default(),
        font: FontConfig::default(),
        axes: AxesConfig::default(),
        grid: GridConfig::default(),
        experiment: ExperimentConfig::default(),
        colors: ColorsConfig::default(),
        palette: "trigger".into(),
        output: OutputConfig::default(),
        efficiency: EfficiencyConfig::default(),
        pulls: PullsConfig::default(),
        overlay: OverlayConfig::default(),
        compat: CompatConfig::default(),
    }
}

fn cms() -> VizConfig {
    VizConfig {
        theme: "cms".into(),
        figure: FigureConfig { width: 576.0, height: 432.0, ..FigureConfig::default() },
        font: FontConfig { size: 10.0, label_size: 11.0, tick_size: 9.0 },
        grid: GridConfig { show: false, ..GridConfig::default() },
        experiment: ExperimentConfig { name: "CMS".into(), status: "Preliminary".into() },
        palette: "cms_petroff6".into(),
        ..trigger()
    }
}

fn minimal() -> VizConfig {
    VizConfig {
        theme: "minimal".into(),
        figure: FigureConfig { width: 432.0, height: 302.4, ..FigureConfig::default() },
        font: FontConfig { size: 9.0, label_size: 10.0, tick_size: 8.0 },
        axes: AxesConfig {
            tick_direction: "out".into(),
            show_top_ticks: false,
            show_right_ticks: false,
            tick_length: 4.0,
            minor_tick_length: 2.0,
        },
        grid: GridConfig { show: false, color: Color::hex("#E5E7EB"), alpha: 1.0 },
        experiment: ExperimentConfig { name: String::new(), status: String::new() },
        palette: "okabe_ito".into(),
        ..trigger()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for t in [BuiltinTheme::Trigger, BuiltinTheme::Cms, BuiltinTheme::Minimal] {
            assert_eq!(BuiltinTheme::parse(t.name()), Some(t));
            assert_eq!(t.base_config().theme, t.name());
        }
        assert_eq!(BuiltinTheme::parse("CMS"), Some(BuiltinTheme::Cms));
        assert_eq!(BuiltinTheme::parse("atlas"), None);
    }

    #[test]
    fn minimal_has_no_header() {
        let c = BuiltinTheme::Minimal.base_config();
        assert!(c.experiment.name.is_empty());
        assert_eq!(c.axes.tick_direction, "out");
    }
}
