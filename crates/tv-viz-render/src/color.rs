use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rrggbb` (the `#` is optional).
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.strip_prefix('#').unwrap_or(s);
        if s.len() != 6 || !s.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&s[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Like [`Color::parse`], black on malformed input. For literals.
    pub fn hex(s: &str) -> Self {
        Self::parse(s).unwrap_or_default()
    }

    pub const fn with_alpha(mut self, a: f64) -> Self {
        self.a = a;
        self
    }

    fn is_opaque(&self) -> bool {
        (self.a - 1.0).abs() < 1e-6
    }

    /// `#rrggbb` when opaque, `rgba(..)` otherwise.
    pub fn to_svg_fill(&self) -> String {
        match self.is_opaque() {
            true => self.to_hex(),
            false => format!("rgba({},{},{},{:.3})", self.r, self.g, self.b, self.a),
        }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_svg_fill())
    }
}

/// Colours appear in YAML configs as `"#rrggbb"` strings.
impl Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::parse(&s).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid color {s:?}, expected #rrggbb"))
        })
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::rgb(0, 0, 0)
    }
}

/// Default: first input blue, second orange, compatibility bars green.
pub const TRIGGER: &[Color] = &[
    Color::rgb(0x1d, 0x4e, 0xd8),
    Color::rgb(0xea, 0x58, 0x0c),
    Color::rgb(0x16, 0xa3, 0x4a),
    Color::rgb(0x7c, 0x3a, 0xed),
];

pub const CMS_PETROFF6: &[Color] = &[
    Color::rgb(0x57, 0x90, 0xfc),
    Color::rgb(0xf8, 0x9c, 0x20),
    Color::rgb(0xe4, 0x25, 0x36),
    Color::rgb(0x96, 0x4a, 0x8b),
    Color::rgb(0x9c, 0x9c, 0xa1),
    Color::rgb(0x7a, 0x21, 0xdd),
];

/// Colour-blind safe (Okabe & Ito).
pub const OKABE_ITO: &[Color] = &[
    Color::rgb(0x00, 0x72, 0xb2),
    Color::rgb(0xe6, 0x9f, 0x00),
    Color::rgb(0x00, 0x9e, 0x73),
    Color::rgb(0xcc, 0x79, 0xa7),
    Color::rgb(0x56, 0xb4, 0xe9),
    Color::rgb(0xd5, 0x5e, 0x00),
];

/// Palette by name; unknown names fall back to [`TRIGGER`].
pub fn palette_colors(name: &str) -> &'static [Color] {
    match name {
        "cms_petroff6" => CMS_PETROFF6,
        "okabe_ito" => OKABE_ITO,
        _ => TRIGGER,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsing() {
        let c = Color::hex("#1D4ED8");
        assert_eq!((c.r, c.g, c.b), (0x1D, 0x4E, 0xD8));
        assert!((c.a - 1.0).abs() < 1e-9);
        assert_eq!(Color::parse("1d4ed8"), Some(c));
    }

    #[test]
    fn malformed_hex_does_not_panic() {
        assert_eq!(Color::parse("#12"), None);
        assert_eq!(Color::parse("#zzzzzz"), None);
        assert_eq!(Color::parse("#ééé"), None);
        assert_eq!(Color::hex("#12"), Color::rgb(0, 0, 0));
    }

    #[test]
    fn svg_fill() {
        assert_eq!(Color::rgb(29, 78, 216).to_svg_fill(), "#1d4ed8");
        assert_eq!(Color::rgb(29, 78, 216).with_alpha(0.5).to_svg_fill(), "rgba(29,78,216,0.500)");
    }

    #[test]
    fn palette_lookup() {
        assert_eq!(palette_colors("cms_petroff6")[0], Color::hex("#5790fc"));
        assert_eq!(palette_colors("okabe_ito").len(), 6);
        assert_eq!(palette_colors("unknown"), palette_colors("trigger"));
    }
}
