use serde::{Deserialize, Serialize};
use serde_yaml_ng::Value;

use crate::RenderError;
use crate::color::Color;
use crate::theme::BuiltinTheme;

/// Top-level rendering configuration (YAML or programmatic).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VizConfig {
    pub theme: String,
    pub figure: FigureConfig,
    pub font: FontConfig,
    pub axes: AxesConfig,
    pub grid: GridConfig,
    pub experiment: ExperimentConfig,
    pub colors: ColorsConfig,
    /// Palette for the two input datasets and the compatibility bars.
    pub palette: String,
    pub output: OutputConfig,
    pub efficiency: EfficiencyConfig,
    pub pulls: PullsConfig,
    pub overlay: OverlayConfig,
    pub compat: CompatConfig,
}

impl Default for VizConfig {
    fn default() -> Self {
        BuiltinTheme::Trigger.base_config()
    }
}

impl VizConfig {
    pub fn palette_colors(&self) -> &'static [Color] {
        crate::color::palette_colors(&self.palette)
    }

    /// Colors of the first and second input.
    pub fn dataset_colors(&self) -> [Color; 2] {
        let p = self.palette_colors();
        [p[0], p[1 % p.len()]]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureConfig {
    pub width: f64,
    pub height: f64,
    pub font_family: String,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            width: 518.4,  // 7.2" * 72
            height: 345.6, // 4.8" * 72
            font_family: "Helvetica, Arial, sans-serif".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub size: f64,
    pub label_size: f64,
    pub tick_size: f64,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self { size: 10.0, label_size: 11.0, tick_size: 8.5 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AxesConfig {
    pub tick_direction: String,
    pub show_top_ticks: bool,
    pub show_right_ticks: bool,
    pub tick_length: f64,
    pub minor_tick_length: f64,
}

impl Default for AxesConfig {
    fn default() -> Self {
        Self {
            tick_direction: "in".into(),
            show_top_ticks: true,
            show_right_ticks: true,
            tick_length: 5.0,
            minor_tick_length: 3.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub show: bool,
    pub color: Color,
    pub alpha: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { show: true, color: Color::hex("#CBD5E1"), alpha: 0.55 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Bold label in the top-left corner; empty hides the header label.
    pub name: String,
    pub status: String,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self { name: "TRIGGER".into(), status: "Validation".into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorsConfig {
    pub band_1sigma: Color,
    pub band_2sigma: Color,
    pub positive_pull: Color,
    pub negative_pull: Color,
    /// Markers of pulls with zero combined uncertainty.
    pub undefined_pull: Color,
    pub reference_line: Color,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self {
            band_1sigma: Color::hex("#7BD389"),
            band_2sigma: Color::hex("#F2D95C"),
            positive_pull: Color::hex("#1D4ED8"),
            negative_pull: Color::hex("#DC2626"),
            undefined_pull: Color::hex("#9CA3AF"),
            reference_line: Color::hex("#6B7280"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dpi: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { dpi: 220 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EfficiencyConfig {
    /// Height of one trigger-path row, in points.
    pub row_height: f64,
    pub show_values: bool,
}

impl Default for EfficiencyConfig {
    fn default() -> Self {
        Self { row_height: 18.0, show_values: false }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PullsConfig {
    /// Smallest half-width of the pull axis, in units of sigma.
    pub min_range: f64,
    pub row_height: f64,
}

impl Default for PullsConfig {
    fn default() -> Self {
        Self { min_range: 3.0, row_height: 16.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub show_ratio: bool,
    pub ratio_y_range: [f64; 2],
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self { show_ratio: true, ratio_y_range: [0.5, 1.5] }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompatConfig {
    /// Horizontal reference line on the score axis.
    pub reference: Option<f64>,
    pub label_angle: f64,
}

impl Default for CompatConfig {
    fn default() -> Self {
        Self { reference: Some(1.0), label_angle: -45.0 }
    }
}

fn config_error(e: serde_yaml_ng::Error) -> RenderError {
    RenderError::Config(e.to_string())
}

/// Overlay `user` onto `base`, mapping by mapping.
fn merge(base: &mut Value, user: Value) {
    match (base, user) {
        (Value::Mapping(base), Value::Mapping(user)) => {
            for (key, value) in user {
                match base.get_mut(&key) {
                    Some(slot) => merge(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

/// Resolve a VizConfig from an optional YAML string.
/// Priority: user YAML overrides → base config of the named theme.
pub fn resolve_config(user_yaml: Option<&str>) -> crate::Result<VizConfig> {
    let Some(yaml) = user_yaml else {
        return Ok(VizConfig::default());
    };
    let user: Value = serde_yaml_ng::from_str(yaml).map_err(config_error)?;
    let theme = match user.get("theme").and_then(Value::as_str) {
        Some(name) => BuiltinTheme::parse(name)
            .ok_or_else(|| RenderError::Config(format!("unknown theme: {name}")))?,
        None => BuiltinTheme::Trigger,
    };
    tracing::debug!(theme = theme.name(), "resolving render config");

    let mut merged = serde_yaml_ng::to_value(theme.base_config()).map_err(config_error)?;
    if !user.is_null() {
        merge(&mut merged, user);
    }
    serde_yaml_ng::from_value(merged).map_err(config_error)
}
