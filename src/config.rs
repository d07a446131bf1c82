use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use serde::Deserialize;
use std::fs::File;
use std::path::Path;

use crate::theme_resolve::parse_color;

/// Largest accepted canvas edge, in pixels.
pub const MAX_CANVAS_SIDE: u32 = 10_000;

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[serde(rename = "png")]
    Png,
    #[serde(rename = "svg")]
    Svg,
    #[serde(rename = "html")]
    #[default]
    Html,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct Margin {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl Default for Margin {
    fn default() -> Self {
        Self { top: 20, right: 30, bottom: 60, left: 70 }
    }
}

/// A category label and the hex color it is drawn with.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CategoryColor {
    pub category: String,
    pub color: String,
}

impl CategoryColor {
    fn new(category: &str, color: &str) -> Self {
        Self { category: category.to_string(), color: color.to_string() }
    }
}

/// Color strings for the non-data parts of the chart.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ThemeConfig {
    pub panel_background: String,
    pub grid: String,
    pub axis: String,
    pub text: String,
    pub error: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        // ggplot2 grey92 panel with white grid lines
        Self {
            panel_background: "#EBEBEB".to_string(),
            grid: "#FFFFFF".to_string(),
            axis: "#4D4D4D".to_string(),
            text: "#333333".to_string(),
            error: "crimson".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default)]
    pub margin: Margin,
    #[serde(default = "default_radius_range")]
    pub radius_range: (f64, f64),
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    /// Fraction of the extent added on both ends of the x and y domains.
    #[serde(default = "default_padding")]
    pub padding: f64,
    #[serde(default = "default_ticks")]
    pub ticks: usize,
    #[serde(default = "default_palette")]
    pub palette: Vec<CategoryColor>,
    #[serde(default = "default_fallback_color")]
    pub fallback_color: String,
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub x_label: Option<String>,
    #[serde(default)]
    pub y_label: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub legend: bool,
    #[serde(default, rename = "type")]
    pub format: OutputFormat,
}

fn default_width() -> u32 { 900 }
fn default_height() -> u32 { 520 }
fn default_radius_range() -> (f64, f64) { (3.0, 13.0) }
fn default_opacity() -> f64 { 0.8 }
fn default_padding() -> f64 { 0.05 }
fn default_ticks() -> usize { 10 }
fn default_fallback_color() -> String { "#999999".to_string() }

fn default_palette() -> Vec<CategoryColor> {
    vec![
        CategoryColor::new("Adelie", "#4E79A7"),
        CategoryColor::new("Chinstrap", "#F28E2B"),
        CategoryColor::new("Gentoo", "#E15759"),
    ]
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            margin: Margin::default(),
            radius_range: default_radius_range(),
            opacity: default_opacity(),
            padding: default_padding(),
            ticks: default_ticks(),
            palette: default_palette(),
            fallback_color: default_fallback_color(),
            theme: ThemeConfig::default(),
            x_label: None,
            y_label: None,
            title: None,
            legend: false,
            format: OutputFormat::Html,
        }
    }
}

impl ChartConfig {
    /// Load a JSON config file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open config '{}'", path.display()))?;
        let config: ChartConfig = serde_json::from_reader(file)
            .with_context(|| format!("Failed to parse config '{}'", path.display()))?;
        Ok(config)
    }

    pub fn inner_width(&self) -> f64 {
        self.width as f64 - (self.margin.left as f64 + self.margin.right as f64)
    }

    pub fn inner_height(&self) -> f64 {
        self.height as f64 - (self.margin.top as f64 + self.margin.bottom as f64)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width > MAX_CANVAS_SIDE || self.height > MAX_CANVAS_SIDE {
            bail!(
                "Canvas {}x{} exceeds the {}px limit per side",
                self.width,
                self.height,
                MAX_CANVAS_SIDE
            );
        }
        if self.inner_width() <= 0.0 || self.inner_height() <= 0.0 {
            bail!(
                "Margins leave no room for the plot ({}x{} canvas, inner {}x{})",
                self.width,
                self.height,
                self.inner_width(),
                self.inner_height()
            );
        }
        let (r0, r1) = self.radius_range;
        if !(r0 >= 0.0 && r1 >= r0) {
            bail!("Invalid radius range [{}, {}]", r0, r1);
        }
        if !(0.0..=1.0).contains(&self.opacity) {
            bail!("Opacity must be within [0, 1], got {}", self.opacity);
        }
        if !(self.padding >= 0.0) {
            bail!("Padding must be non-negative, got {}", self.padding);
        }
        if self.ticks == 0 {
            bail!("Tick count must be at least 1");
        }

        let colors = self
            .palette
            .iter()
            .map(|c| c.color.as_str())
            .chain([
                self.fallback_color.as_str(),
                self.theme.panel_background.as_str(),
                self.theme.grid.as_str(),
                self.theme.axis.as_str(),
                self.theme.text.as_str(),
                self.theme.error.as_str(),
            ]);
        for color in colors {
            if parse_color(color).is_none() {
                bail!("Unrecognized color '{}'", color);
            }
        }
        Ok(())
    }
}
