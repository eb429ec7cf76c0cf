/// Linear axis with tick generation and data→pixel mapping.
#[derive(Debug, Clone)]
pub struct Axis {
    pub min: f64,
    pub max: f64,
    pub label: String,
    pub tick_positions: Vec<f64>,
    pub tick_labels: Vec<String>,
    pub minor_ticks: Vec<f64>,
}

impl Axis {
    /// Auto-scale with "nice number" ticks covering `[data_min, data_max]`.
    pub fn auto_linear(data_min: f64, data_max: f64, target_ticks: usize) -> Self {
        let (nice_min, nice_max, step) = nice_range(data_min, data_max, target_ticks);
        Self::with_step(nice_min, nice_max, step)
    }

    /// Range symmetric around zero, at least `[-min_half, min_half]`.
    pub fn symmetric(max_abs: f64, min_half: f64, target_ticks: usize) -> Self {
        let half = if max_abs.is_finite() { max_abs.max(min_half) } else { min_half };
        let (_, nice_max, step) = nice_range(0.0, half, target_ticks / 2 + 1);
        Self::with_step(-nice_max, nice_max, step)
    }

    /// Fixed limits, no ticks.
    pub fn fixed(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            label: String::new(),
            tick_positions: Vec::new(),
            tick_labels: Vec::new(),
            minor_ticks: Vec::new(),
        }
    }

    fn with_step(min: f64, max: f64, step: f64) -> Self {
        let n_major = ((max - min) / step).round() as usize;
        let ticks: Vec<f64> = (0..=n_major).map(|i| min + i as f64 * step).collect();
        let labels = ticks.iter().map(|&v| format_tick(v, step)).collect();

        // 5 subdivisions per major
        let minor_step = step / 5.0;
        let minor = (0..=n_major * 5)
            .filter(|i| i % 5 != 0)
            .map(|i| min + i as f64 * minor_step)
            .collect();

        Self {
            min,
            max,
            label: String::new(),
            tick_positions: ticks,
            tick_labels: labels,
            minor_ticks: minor,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Map a data value to a pixel coordinate.
    pub fn data_to_pixel(&self, value: f64, px_min: f64, px_max: f64) -> f64 {
        let frac = (value - self.min) / (self.max - self.min);
        px_min + frac * (px_max - px_min)
    }

    /// Like [`Axis::data_to_pixel`], clamped to the axis range.
    pub fn data_to_pixel_clamped(&self, value: f64, px_min: f64, px_max: f64) -> f64 {
        self.data_to_pixel(value.clamp(self.min, self.max), px_min, px_max)
    }
}

/// "Nice numbers" algorithm for pleasant tick spacing.
fn nice_range(data_min: f64, data_max: f64, target_ticks: usize) -> (f64, f64, f64) {
    if !(data_max - data_min).is_finite() || (data_max - data_min).abs() < 1e-15 {
        let c = if data_min.is_finite() { data_min } else { 0.0 };
        return (c - 1.0, c + 1.0, 1.0);
    }
    let range = data_max - data_min;
    let rough_step = range / (target_ticks.max(2) - 1) as f64;
    let step = nice_step(rough_step);
    let nice_min = (data_min / step).floor() * step;
    let nice_max = (data_max / step).ceil() * step;
    (nice_min, nice_max, step)
}

fn nice_step(rough: f64) -> f64 {
    let exp = rough.abs().log10().floor();
    let frac = rough / 10.0_f64.powf(exp);
    let nice_frac = if frac <= 1.5 {
        1.0
    } else if frac <= 3.5 {
        2.0
    } else if frac <= 7.5 {
        5.0
    } else {
        10.0
    };
    nice_frac * 10.0_f64.powf(exp)
}

fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step >= 1.0 { 0 } else { (-step.log10().floor()) as usize };
    // no "-0"
    let v = if value.abs() < step * 0.01 { 0.0 } else { value };
    if decimals == 0 { format!("{}", v.round() as i64) } else { format!("{v:.decimals$}") }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_linear_covers_data() {
        let ax = Axis::auto_linear(0.0, 1.0, 6);
        assert!(ax.min <= 0.0 && ax.max >= 1.0);
        assert_eq!(ax.tick_labels.first().map(String::as_str), Some("0.0"));
        assert_eq!(ax.tick_labels.last().map(String::as_str), Some("1.0"));
        assert_eq!(ax.minor_ticks.len(), (ax.tick_positions.len() - 1) * 4);
    }

    #[test]
    fn symmetric_axis() {
        let ax = Axis::symmetric(1.2, 3.0, 7);
        assert_eq!(ax.min, -ax.max);
        assert!(ax.max >= 3.0);
        assert!(ax.tick_labels.iter().any(|l| l == "0"));
        let wide = Axis::symmetric(7.3, 3.0, 7);
        assert!(wide.max >= 7.3);
        let nan = Axis::symmetric(f64::NAN, 3.0, 7);
        assert!(nan.max >= 3.0);
    }

    #[test]
    fn degenerate_range() {
        let ax = Axis::auto_linear(0.0, 0.0, 5);
        assert!(ax.min < ax.max);
    }

    #[test]
    fn data_to_pixel_linear() {
        let ax = Axis::auto_linear(0.0, 100.0, 5);
        assert!((ax.data_to_pixel(50.0, 0.0, 500.0) - 250.0).abs() < 1.0);
        assert_eq!(ax.data_to_pixel_clamped(1e9, 0.0, 500.0), 500.0);
    }

    #[test]
    fn nice_step_values() {
        assert!((nice_step(3.2) - 2.0).abs() < 1e-9);
        assert!((nice_step(0.7) - 0.5).abs() < 1e-9);
        assert!((nice_step(15.0) - 10.0).abs() < 1e-9);
        assert!((nice_step(4.5) - 5.0).abs() < 1e-9);
    }
}
