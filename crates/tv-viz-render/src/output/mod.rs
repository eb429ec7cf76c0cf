use std::fmt;
use std::str::FromStr;

use crate::RenderError;

#[cfg(feature = "png")]
pub mod png;

/// Image format of rendered plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Svg,
    Png,
}

impl OutputFormat {
    /// File extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
        }
    }

    /// Whether this build can produce the format.
    pub fn is_available(self) -> bool {
        match self {
            OutputFormat::Svg => true,
            OutputFormat::Png => cfg!(feature = "png"),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "svg" => Ok(OutputFormat::Svg),
            "png" => Ok(OutputFormat::Png),
            other => Err(RenderError::UnknownFormat(other.to_string())),
        }
    }
}
