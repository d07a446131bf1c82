//! Color parsing and theme resolution.
//!
//! Turns the color strings of a [`ChartConfig`] into concrete plotters colors
//! once, so the compiler never handles strings.

use anyhow::{anyhow, Result};
use plotters::style::RGBColor;

use crate::config::{ChartConfig, ThemeConfig};

/// Fully resolved non-data colors ready for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTheme {
    pub panel_background: RGBColor,
    pub grid: RGBColor,
    pub axis: RGBColor,
    pub text: RGBColor,
    pub error: RGBColor,
}

impl ThemeConfig {
    pub fn resolve(&self) -> Result<ResolvedTheme> {
        Ok(ResolvedTheme {
            panel_background: require_color(&self.panel_background)?,
            grid: require_color(&self.grid)?,
            axis: require_color(&self.axis)?,
            text: require_color(&self.text)?,
            error: require_color(&self.error)?,
        })
    }
}

impl ChartConfig {
    /// Palette entries with parsed colors, in configured order.
    pub fn resolved_palette(&self) -> Result<Vec<(String, RGBColor)>> {
        self.palette
            .iter()
            .map(|entry| Ok((entry.category.clone(), require_color(&entry.color)?)))
            .collect()
    }
}

pub fn require_color(color_str: &str) -> Result<RGBColor> {
    parse_color(color_str).ok_or_else(|| anyhow!("Unrecognized color '{}'", color_str))
}

/// Parse a color string into RGBColor, supporting hex (#RRGGBB, #RGB) and named colors
pub fn parse_color(color_str: &str) -> Option<RGBColor> {
    let color_str = color_str.trim();

    if color_str.starts_with('#') {
        return parse_hex_color(color_str);
    }

    match color_str.to_lowercase().as_str() {
        "white" => Some(RGBColor(255, 255, 255)),
        "black" => Some(RGBColor(0, 0, 0)),
        "red" => Some(RGBColor(255, 0, 0)),
        "green" => Some(RGBColor(0, 128, 0)),
        "blue" => Some(RGBColor(0, 0, 255)),
        "orange" => Some(RGBColor(255, 165, 0)),
        "crimson" => Some(RGBColor(220, 20, 60)),
        "steelblue" => Some(RGBColor(70, 130, 180)),
        "gray" | "grey" => Some(RGBColor(128, 128, 128)),
        "darkgray" | "darkgrey" => Some(RGBColor(64, 64, 64)),
        "lightgray" | "lightgrey" => Some(RGBColor(192, 192, 192)),
        // ggplot2-style grayscale (gray0 to gray100)
        s if s.starts_with("gray") || s.starts_with("grey") => {
            let n = s[4..].parse::<u8>().ok().filter(|n| *n <= 100)?;
            let v = (n as f64 * 2.55).round() as u8;
            Some(RGBColor(v, v, v))
        }
        _ => None,
    }
}

/// Parse hex color (#RRGGBB or #RGB)
fn parse_hex_color(hex: &str) -> Option<RGBColor> {
    let hex = hex.trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(RGBColor(r, g, b))
        }
        3 => {
            let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
            Some(RGBColor(r, g, b))
        }
        _ => None,
    }
}

/// `#rrggbb` form used in SVG/HTML attributes.
pub fn to_hex(color: &RGBColor) -> String {
    format!("#{:02x}{:02x}{:02x}", color.0, color.1, color.2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_color("#4E79A7"), Some(RGBColor(0x4E, 0x79, 0xA7)));
        assert_eq!(parse_color("#F00"), Some(RGBColor(255, 0, 0)));
        assert_eq!(parse_color("#CCCCCC"), Some(RGBColor(204, 204, 204)));
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("#GGGGGG"), None);
    }

    #[test]
    fn test_parse_named_color() {
        assert_eq!(parse_color("white"), Some(RGBColor(255, 255, 255)));
        assert_eq!(parse_color("Crimson"), Some(RGBColor(220, 20, 60)));
        assert_eq!(parse_color("chartreuse-ish"), None);
    }

    #[test]
    fn test_parse_gray_scale() {
        assert_eq!(parse_color("gray0"), Some(RGBColor(0, 0, 0)));
        assert_eq!(parse_color("gray100"), Some(RGBColor(255, 255, 255)));
        assert_eq!(parse_color("grey92"), Some(RGBColor(235, 235, 235)));
        assert_eq!(parse_color("gray101"), None);
    }

    #[test]
    fn test_resolve_default_theme() {
        let resolved = ThemeConfig::default().resolve().unwrap();
        assert_eq!(resolved.panel_background, RGBColor(0xEB, 0xEB, 0xEB));
        assert_eq!(resolved.grid, RGBColor(255, 255, 255));
        assert_eq!(resolved.error, RGBColor(220, 20, 60));
    }

    #[test]
    fn test_resolved_palette_order() {
        let palette = ChartConfig::default().resolved_palette().unwrap();
        let names: Vec<&str> = palette.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["Adelie", "Chinstrap", "Gentoo"]);
        assert_eq!(palette[0].1, RGBColor(0x4E, 0x79, 0xA7));
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(to_hex(&RGBColor(0x4E, 0x79, 0xA7)), "#4e79a7");
    }
}
