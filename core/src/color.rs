//! Color names accepted as leaf values.
//!
//! A color name is valid when it belongs to one of four disjoint families:
//! the normal palette (rendered as a bare identifier), the simple X11 names,
//! the numbered X11 names (a base name followed by `1`–`4`), or the
//! `grey0`–`grey100` ramp. The last three render through `x11-color`.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

/// Colors predefined as bare identifiers.
pub const NORMAL_COLORS: &[&str] = &[
    "black",
    "white",
    "red",
    "green",
    "blue",
    "cyan",
    "magenta",
    "yellow",
    "grey",
    "darkred",
    "darkgreen",
    "darkblue",
    "darkcyan",
    "darkmagenta",
    "darkyellow",
];

/// X11 names without a numeric suffix.
pub const X11_COLORS: &[&str] = &[
    "snow",
    "GhostWhite",
    "WhiteSmoke",
    "gainsboro",
    "FloralWhite",
    "OldLace",
    "linen",
    "AntiqueWhite",
    "PapayaWhip",
    "BlanchedAlmond",
    "bisque",
    "PeachPuff",
    "NavajoWhite",
    "moccasin",
    "cornsilk",
    "ivory",
    "LemonChiffon",
    "seashell",
    "honeydew",
    "MintCream",
    "azure",
    "AliceBlue",
    "lavender",
    "LavenderBlush",
    "MistyRose",
    "DarkSlateGray",
    "DarkSlateGrey",
    "DimGray",
    "DimGrey",
    "SlateGray",
    "SlateGrey",
    "LightSlateGray",
    "LightSlateGrey",
    "gray",
    "LightGrey",
    "LightGray",
    "DarkGrey",
    "DarkGray",
    "MidnightBlue",
    "navy",
    "NavyBlue",
    "CornflowerBlue",
    "DarkSlateBlue",
    "SlateBlue",
    "MediumSlateBlue",
    "LightSlateBlue",
    "MediumBlue",
    "RoyalBlue",
    "DodgerBlue",
    "DeepSkyBlue",
    "SkyBlue",
    "LightSkyBlue",
    "SteelBlue",
    "LightSteelBlue",
    "LightBlue",
    "PowderBlue",
    "PaleTurquoise",
    "DarkTurquoise",
    "MediumTurquoise",
    "turquoise",
    "LightCyan",
    "CadetBlue",
    "MediumAquamarine",
    "aquamarine",
    "DarkOliveGreen",
    "DarkSeaGreen",
    "SeaGreen",
    "MediumSeaGreen",
    "LightSeaGreen",
    "PaleGreen",
    "SpringGreen",
    "LawnGreen",
    "chartreuse",
    "MediumSpringGreen",
    "GreenYellow",
    "LimeGreen",
    "YellowGreen",
    "ForestGreen",
    "OliveDrab",
    "DarkKhaki",
    "khaki",
    "PaleGoldenrod",
    "LightGoldenrodYellow",
    "LightYellow",
    "gold",
    "LightGoldenrod",
    "goldenrod",
    "DarkGoldenrod",
    "RosyBrown",
    "IndianRed",
    "SaddleBrown",
    "sienna",
    "peru",
    "burlywood",
    "beige",
    "wheat",
    "SandyBrown",
    "tan",
    "chocolate",
    "firebrick",
    "brown",
    "DarkSalmon",
    "salmon",
    "LightSalmon",
    "orange",
    "DarkOrange",
    "coral",
    "LightCoral",
    "tomato",
    "OrangeRed",
    "HotPink",
    "DeepPink",
    "pink",
    "LightPink",
    "PaleVioletRed",
    "maroon",
    "MediumVioletRed",
    "VioletRed",
    "violet",
    "plum",
    "orchid",
    "MediumOrchid",
    "DarkOrchid",
    "DarkViolet",
    "BlueViolet",
    "purple",
    "MediumPurple",
    "thistle",
    "LightGreen",
];

/// X11 base names that exist with the suffixes `1` to `4`.
pub const X11_NUMBERED_BASES: &[&str] = &[
    "snow",
    "seashell",
    "AntiqueWhite",
    "bisque",
    "PeachPuff",
    "NavajoWhite",
    "LemonChiffon",
    "cornsilk",
    "ivory",
    "honeydew",
    "LavenderBlush",
    "MistyRose",
    "azure",
    "SlateBlue",
    "RoyalBlue",
    "blue",
    "DodgerBlue",
    "SteelBlue",
    "DeepSkyBlue",
    "SkyBlue",
    "LightSkyBlue",
    "SlateGray",
    "LightSteelBlue",
    "LightBlue",
    "LightCyan",
    "PaleTurquoise",
    "CadetBlue",
    "turquoise",
    "cyan",
    "DarkSlateGray",
    "aquamarine",
    "DarkSeaGreen",
    "SeaGreen",
    "PaleGreen",
    "SpringGreen",
    "green",
    "chartreuse",
    "OliveDrab",
    "DarkOliveGreen",
    "khaki",
    "LightGoldenrod",
    "LightYellow",
    "yellow",
    "gold",
    "goldenrod",
    "DarkGoldenrod",
    "RosyBrown",
    "IndianRed",
    "sienna",
    "burlywood",
    "wheat",
    "tan",
    "chocolate",
    "firebrick",
    "brown",
    "salmon",
    "LightSalmon",
    "orange",
    "DarkOrange",
    "coral",
    "tomato",
    "OrangeRed",
    "red",
    "DeepPink",
    "HotPink",
    "pink",
    "LightPink",
    "PaleVioletRed",
    "maroon",
    "VioletRed",
    "magenta",
    "orchid",
    "plum",
    "MediumOrchid",
    "DarkOrchid",
    "purple",
    "MediumPurple",
    "thistle",
];

static NUMBERED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z]+)([1-4])$").expect("static regex must compile"));
static GREY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^grey([0-9]{1,3})$").expect("static regex must compile"));

/// Family a color name was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorFamily {
    Normal,
    X11,
    X11Numbered,
    Grey,
}

/// A validated color name.
///
/// # Examples
///
/// ```
/// use lilyflower_core::Color;
///
/// assert_eq!(Color::parse("blue").unwrap().nested(), "blue");
/// assert_eq!(Color::parse("snow4").unwrap().nested(), r#"(x11-color "snow4")"#);
/// assert!(Color::parse("grey37").is_ok());
/// assert!(Color::parse("not-a-color").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Color {
    name: String,
    family: ColorFamily,
}

impl Color {
    /// Validates `name` against the four color families.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the name is in none of them.
    pub fn parse(name: &str) -> Result<Self> {
        let family = classify(name)
            .ok_or_else(|| Error::InvalidArgument(format!("{name:?} is not a known color")))?;
        Ok(Self {
            name: name.to_string(),
            family,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn family(&self) -> ColorFamily {
        self.family
    }

    /// Scheme expression for the color, without the top-level `#`.
    pub fn nested(&self) -> String {
        match self.family {
            ColorFamily::Normal => self.name.clone(),
            _ => format!("(x11-color \"{}\")", self.name),
        }
    }
}

fn classify(name: &str) -> Option<ColorFamily> {
    if NORMAL_COLORS.contains(&name) {
        return Some(ColorFamily::Normal);
    }
    if X11_COLORS.contains(&name) {
        return Some(ColorFamily::X11);
    }
    if let Some(caps) = NUMBERED_RE.captures(name) {
        if X11_NUMBERED_BASES.contains(&&caps[1]) {
            return Some(ColorFamily::X11Numbered);
        }
    }
    if let Some(caps) = GREY_RE.captures(name) {
        let level: u32 = caps[1].parse().ok()?;
        if level <= 100 {
            return Some(ColorFamily::Grey);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_families_are_disjoint() {
        for name in NORMAL_COLORS {
            assert!(!X11_COLORS.contains(name), "{name} in two families");
            assert_eq!(classify(name), Some(ColorFamily::Normal));
        }
        for name in X11_COLORS {
            assert!(!NUMBERED_RE.is_match(name), "{name} looks numbered");
            assert!(!GREY_RE.is_match(name), "{name} looks like a grey level");
        }
    }

    #[test]
    fn test_normal_color_is_bare() {
        let color = Color::parse("darkyellow").unwrap();
        assert_eq!(color.family(), ColorFamily::Normal);
        assert_eq!(color.nested(), "darkyellow");
    }

    #[test]
    fn test_x11_color_uses_x11_lookup() {
        let color = Color::parse("AliceBlue").unwrap();
        assert_eq!(color.family(), ColorFamily::X11);
        assert_eq!(color.nested(), r#"(x11-color "AliceBlue")"#);
    }

    #[test]
    fn test_numbered_suffix_range() {
        assert_eq!(Color::parse("snow1").unwrap().family(), ColorFamily::X11Numbered);
        assert_eq!(Color::parse("thistle4").unwrap().family(), ColorFamily::X11Numbered);
        assert!(Color::parse("snow5").is_err());
        assert!(Color::parse("snow0").is_err());
        assert!(Color::parse("navy2").is_err());
    }

    #[test]
    fn test_grey_ramp_bounds() {
        assert_eq!(Color::parse("grey0").unwrap().family(), ColorFamily::Grey);
        assert_eq!(
            Color::parse("grey37").unwrap().nested(),
            r#"(x11-color "grey37")"#
        );
        assert!(Color::parse("grey100").is_ok());
        assert!(Color::parse("grey101").is_err());
    }

    #[test]
    fn test_unknown_color_is_invalid_argument() {
        assert!(matches!(
            Color::parse("not-a-color"),
            Err(Error::InvalidArgument(_))
        ));
    }
}
