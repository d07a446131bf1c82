use anyhow::Result;
use std::collections::HashSet;

use crate::config::ChartConfig;
use crate::ir::{DrawCommand, Mark, SceneGraph, TextAnchor};
use crate::resolve::Role;
use crate::scale::{format_tick, ScaleSystem};
use crate::transform::NormalizedRecord;

const TICK_SIZE: f64 = 6.0;
const TICK_PADDING: f64 = 3.0;
const TICK_FONT: f64 = 12.0;
const CAPTION_FONT: f64 = 13.0;
const TITLE_FONT: f64 = 16.0;
const LEGEND_ROW: f64 = 18.0;
const LEGEND_SWATCH: f64 = 5.0;

/// Compile records and scales into a SceneGraph of drawing commands.
///
/// Draw order: panel background, gridlines, axes with tick labels, axis
/// captions, marks, then the optional title and legend.
pub fn compile_scene(
    records: &[NormalizedRecord],
    scales: &ScaleSystem,
    config: &ChartConfig,
) -> Result<SceneGraph> {
    let theme = config.theme.resolve()?;
    let left = config.margin.left as f64;
    let top = config.margin.top as f64;
    let inner_w = config.inner_width();
    let inner_h = config.inner_height();
    let bottom = top + inner_h;
    let right = left + inner_w;

    let mut commands = Vec::new();

    commands.push(DrawCommand::FillRect {
        tl: (left, top),
        br: (right, bottom),
        color: theme.panel_background,
    });

    let x_ticks = scales.x.ticks(config.ticks);
    let y_ticks = scales.y.ticks(config.ticks);

    // Gridlines share the tick positions but carry no labels.
    for &t in &x_ticks {
        let px = left + scales.x.map(t);
        commands.push(DrawCommand::Line {
            from: (px, top),
            to: (px, bottom),
            color: theme.grid,
            width: 1,
        });
    }
    for &t in &y_ticks {
        let py = top + scales.y.map(t);
        commands.push(DrawCommand::Line {
            from: (left, py),
            to: (right, py),
            color: theme.grid,
            width: 1,
        });
    }

    // X axis
    commands.push(DrawCommand::Line {
        from: (left, bottom),
        to: (right, bottom),
        color: theme.axis,
        width: 1,
    });
    for &t in &x_ticks {
        let px = left + scales.x.map(t);
        commands.push(DrawCommand::Line {
            from: (px, bottom),
            to: (px, bottom + TICK_SIZE),
            color: theme.axis,
            width: 1,
        });
        commands.push(DrawCommand::Text {
            pos: (px, bottom + TICK_SIZE + TICK_PADDING + TICK_FONT / 2.0),
            text: format_tick(t, &x_ticks),
            size: TICK_FONT,
            color: theme.text,
            anchor: TextAnchor::Middle,
            vertical: false,
        });
    }

    // Y axis
    commands.push(DrawCommand::Line {
        from: (left, top),
        to: (left, bottom),
        color: theme.axis,
        width: 1,
    });
    for &t in &y_ticks {
        let py = top + scales.y.map(t);
        commands.push(DrawCommand::Line {
            from: (left - TICK_SIZE, py),
            to: (left, py),
            color: theme.axis,
            width: 1,
        });
        commands.push(DrawCommand::Text {
            pos: (left - TICK_SIZE - TICK_PADDING, py),
            text: format_tick(t, &y_ticks),
            size: TICK_FONT,
            color: theme.text,
            anchor: TextAnchor::End,
            vertical: false,
        });
    }

    // Axis captions
    let x_caption = config.x_label.clone().unwrap_or_else(|| Role::X.caption().to_string());
    let y_caption = config.y_label.clone().unwrap_or_else(|| Role::Y.caption().to_string());
    commands.push(DrawCommand::Text {
        pos: (left + inner_w / 2.0, bottom + 45.0),
        text: x_caption,
        size: CAPTION_FONT,
        color: theme.text,
        anchor: TextAnchor::Middle,
        vertical: false,
    });
    commands.push(DrawCommand::Text {
        pos: (left - 50.0, top + inner_h / 2.0),
        text: y_caption,
        size: CAPTION_FONT,
        color: theme.text,
        anchor: TextAnchor::Middle,
        vertical: true,
    });

    // Marks
    let mut marks = Vec::with_capacity(records.len());
    for record in records {
        let center = (left + scales.x.map(record.x), top + scales.y.map(record.y));
        // Backends draw whole-pixel radii; marks use the same value for hit testing.
        let radius = scales.size.map(record.r).round();
        commands.push(DrawCommand::Circle {
            center,
            radius,
            color: scales.color.map(&record.species),
            opacity: config.opacity,
        });
        marks.push(Mark { center, radius, record: record.clone() });
    }

    if let Some(title) = &config.title {
        commands.push(DrawCommand::Text {
            pos: (config.width as f64 / 2.0, top / 2.0),
            text: title.clone(),
            size: TITLE_FONT,
            color: theme.text,
            anchor: TextAnchor::Middle,
            vertical: false,
        });
    }

    if config.legend {
        commands.extend(legend_commands(records, scales, config, (right, top), theme.text));
    }

    Ok(SceneGraph {
        width: config.width,
        height: config.height,
        commands,
        marks,
    })
}

/// Scene that replaces the chart when the pipeline fails: the message,
/// word-wrapped, in the error color on an empty canvas.
pub fn compile_error_scene(message: &str, config: &ChartConfig) -> Result<SceneGraph> {
    let theme = config.theme.resolve()?;
    let left = config.margin.left as f64;
    let max_chars = ((config.width as f64 - left * 2.0) / (TITLE_FONT * 0.55)).max(20.0) as usize;

    let commands = wrap(&format!("Error: {}", message), max_chars)
        .into_iter()
        .enumerate()
        .map(|(i, line)| DrawCommand::Text {
            pos: (left, config.margin.top as f64 + TITLE_FONT * (1.0 + 1.4 * i as f64)),
            text: line,
            size: TITLE_FONT,
            color: theme.error,
            anchor: TextAnchor::Start,
            vertical: false,
        })
        .collect();

    Ok(SceneGraph {
        width: config.width,
        height: config.height,
        commands,
        marks: Vec::new(),
    })
}

fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Species legend in the top-right corner of the panel, in first-seen order.
fn legend_commands(
    records: &[NormalizedRecord],
    scales: &ScaleSystem,
    config: &ChartConfig,
    (right, top): (f64, f64),
    text_color: plotters::style::RGBColor,
) -> Vec<DrawCommand> {
    let mut seen = HashSet::new();
    let species: Vec<&str> = records
        .iter()
        .map(|r| r.species.as_str())
        .filter(|s| seen.insert(*s))
        .collect();

    let x = right - 100.0;
    let mut commands = Vec::new();
    for (i, name) in species.into_iter().enumerate() {
        let y = top + LEGEND_ROW * (i as f64 + 1.0);
        commands.push(DrawCommand::Circle {
            center: (x, y),
            radius: LEGEND_SWATCH,
            color: scales.color.map(name),
            opacity: config.opacity,
        });
        commands.push(DrawCommand::Text {
            pos: (x + LEGEND_SWATCH * 2.0, y),
            text: name.to_string(),
            size: TICK_FONT,
            color: text_color,
            anchor: TextAnchor::Start,
            vertical: false,
        });
    }
    commands
}
