use crate::layout::margins::PlotArea;

/// Main + ratio panel layout (overlay plots).
#[derive(Debug, Clone)]
pub struct MainRatioLayout {
    pub main: PlotArea,
    pub ratio: PlotArea,
}

impl MainRatioLayout {
    pub fn new(outer: &PlotArea, gap: f64, ratio_frac: f64) -> Self {
        let ratio_h = outer.height * ratio_frac;
        let main_h = outer.height - ratio_h - gap;
        Self {
            main: PlotArea::manual(outer.left, outer.top, outer.width, main_h),
            ratio: PlotArea::manual(outer.left, outer.top + main_h + gap, outer.width, ratio_h),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panels_tile_the_outer_area() {
        let outer = PlotArea::manual(10.0, 20.0, 300.0, 200.0);
        let l = MainRatioLayout::new(&outer, 4.0, 0.25);
        assert!((l.ratio.height - 50.0).abs() < 1e-9);
        assert!((l.main.bottom() + 4.0 - l.ratio.top).abs() < 1e-9);
        assert!((l.ratio.bottom() - outer.bottom()).abs() < 1e-9);
    }
}
