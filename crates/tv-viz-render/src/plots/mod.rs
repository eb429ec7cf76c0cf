pub mod compat;
pub mod efficiency;
pub mod overlay;
pub mod pulls;

mod axes_draw;

use crate::canvas::Canvas;
use crate::primitives::{TextAnchor, TextBaseline, TextStyle};

/// Small placeholder drawing for an artifact with nothing to plot.
pub(crate) fn empty_svg(message: &str) -> String {
    let mut canvas = Canvas::new(200.0, 50.0);
    let style = TextStyle::default().anchor(TextAnchor::Middle).baseline(TextBaseline::Central);
    canvas.text(100.0, 25.0, message, &style);
    canvas.finish_svg()
}

/// Error unless every array has `n` entries.
pub(crate) fn check_lengths(what: &str, n: usize, lens: &[(&str, usize)]) -> crate::Result<()> {
    match lens.iter().find(|(_, len)| *len != n) {
        Some((field, len)) => Err(crate::RenderError::Layout(format!(
            "{what}: {field} has {len} entries, expected {n}"
        ))),
        None => Ok(()),
    }
}
