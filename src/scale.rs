use anyhow::{bail, Result};
use plotters::style::RGBColor;
use tracing::debug;

use crate::config::ChartConfig;
use crate::theme_resolve::require_color;
use crate::transform::NormalizedRecord;

/// Continuous linear mapping from a data domain to a pixel range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn map(&self, value: f64) -> f64 {
        interpolate(self.domain, self.range, value)
    }

    /// Nice tick values within the domain, roughly `count` of them.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        ticks(self.domain.0, self.domain.1, count)
    }
}

/// Square-root scale: visual area, not radius, grows linearly with the value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SqrtScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl SqrtScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn map(&self, value: f64) -> f64 {
        let d = (signed_sqrt(self.domain.0), signed_sqrt(self.domain.1));
        interpolate(d, self.range, signed_sqrt(value))
    }
}

/// Ordinal lookup from category label to color with an explicit fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    pub entries: Vec<(String, RGBColor)>,
    pub fallback: RGBColor,
}

impl ColorScale {
    pub fn map(&self, category: &str) -> RGBColor {
        self.entries
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, color)| *color)
            .unwrap_or(self.fallback)
    }
}

/// The four scales of the chart, all derived once from the full record set.
#[derive(Debug, Clone)]
pub struct ScaleSystem {
    pub x: LinearScale,
    pub y: LinearScale,
    pub size: SqrtScale,
    pub color: ColorScale,
}

/// Build the scale system for the plot
pub fn build_scales(records: &[NormalizedRecord], config: &ChartConfig) -> Result<ScaleSystem> {
    let Some(x_ext) = extent(records.iter().map(|r| r.x)) else {
        bail!("Cannot build scales without any records");
    };
    let Some(y_ext) = extent(records.iter().map(|r| r.y)) else {
        bail!("Cannot build scales without any records");
    };
    let Some(r_ext) = extent(records.iter().map(|r| r.r)) else {
        bail!("Cannot build scales without any records");
    };

    let x = LinearScale::new(
        pad_range(x_ext, config.padding),
        (0.0, config.inner_width()),
    );
    // Inverted so larger values plot higher.
    let y = LinearScale::new(
        pad_range(y_ext, config.padding),
        (config.inner_height(), 0.0),
    );
    let size = SqrtScale::new(r_ext, config.radius_range);
    let color = ColorScale {
        entries: config.resolved_palette()?,
        fallback: require_color(&config.fallback_color)?,
    };

    debug!(x_domain = ?x.domain, y_domain = ?y.domain, size_domain = ?size.domain, "built scales");

    Ok(ScaleSystem { x, y, size, color })
}

/// [min, max] of the values, `None` when empty.
pub fn extent<I: IntoIterator<Item = f64>>(values: I) -> Option<(f64, f64)> {
    values.into_iter().fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

fn pad_range((min, max): (f64, f64), fraction: f64) -> (f64, f64) {
    if min == max {
        (min - 1.0, max + 1.0)
    } else {
        let padding = (max - min) * fraction;
        (min - padding, max + padding)
    }
}

fn interpolate(domain: (f64, f64), range: (f64, f64), value: f64) -> f64 {
    let span = domain.1 - domain.0;
    if span == 0.0 {
        return (range.0 + range.1) / 2.0;
    }
    let t = (value - domain.0) / span;
    range.0 + t * (range.1 - range.0)
}

fn signed_sqrt(v: f64) -> f64 {
    v.signum() * v.abs().sqrt()
}

/// Step between ticks: 1, 2 or 5 times a power of ten.
fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let raw = (stop - start).abs() / count.max(1) as f64;
    let mut step = 10f64.powf(raw.log10().floor());
    let error = raw / step;
    if error >= 50f64.sqrt() {
        step *= 10.0;
    } else if error >= 10f64.sqrt() {
        step *= 5.0;
    } else if error >= 2f64.sqrt() {
        step *= 2.0;
    }
    step
}

/// Evenly spaced round values covering `[start, stop]`.
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    let (lo, hi) = if start <= stop { (start, stop) } else { (stop, start) };
    if !(lo.is_finite() && hi.is_finite()) || lo == hi || count == 0 {
        return if lo == hi && lo.is_finite() { vec![lo] } else { Vec::new() };
    }

    let step = tick_step(lo, hi, count);
    if step >= 1.0 {
        let first = (lo / step).ceil() as i64;
        let last = (hi / step).floor() as i64;
        (first..=last).map(|i| i as f64 * step).collect()
    } else {
        // Divide by the inverse to keep decimal ticks free of float noise.
        let inv = (1.0 / step).round();
        let first = (lo * inv).ceil() as i64;
        let last = (hi * inv).floor() as i64;
        (first..=last).map(|i| i as f64 / inv).collect()
    }
}

/// Format a tick with as many decimals as the tick spacing needs.
pub fn format_tick(value: f64, ticks: &[f64]) -> String {
    let step = match ticks {
        [a, b, ..] => (b - a).abs(),
        _ => 1.0,
    };
    let decimals = if step > 0.0 && step < 1.0 {
        (-step.log10().floor()) as usize
    } else {
        0
    };
    let s = format!("{:.*}", decimals, value);
    // Avoid "-0"
    if s.trim_start_matches('-').chars().all(|c| c == '0' || c == '.') {
        s.trim_start_matches('-').to_string()
    } else {
        s
    }
}
