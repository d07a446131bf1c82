// Runtime executor: data -> scene -> output document

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::compiler::{compile_error_scene, compile_scene};
use crate::config::{ChartConfig, OutputFormat};
use crate::data::PlotData;
use crate::error::ChartError;
use crate::graph;
use crate::ir::SceneGraph;
use crate::page;
use crate::resolve::{resolve, AliasTable};
use crate::scale::build_scales;
use crate::transform::normalize;

/// Run the pipeline up to a compiled scene.
///
/// Fails with a [`ChartError`] (reachable through `downcast_ref`) for an
/// empty source, unresolved columns or no plottable rows.
pub fn build_scene(data: &PlotData, config: &ChartConfig) -> Result<SceneGraph> {
    if data.is_empty() {
        return Err(ChartError::EmptySource.into());
    }

    info!(columns = ?data.columns, "detected columns");
    let binding = resolve(&data.columns, &AliasTable::default())?;
    info!(
        x = %binding.x,
        y = %binding.y,
        size = %binding.size,
        color = %binding.color,
        "using columns"
    );

    let records = normalize(&data.records, &binding)?;
    let scales = build_scales(&records, config)?;
    let scene = compile_scene(&records, &scales, config)?;
    debug!(commands = scene.commands.len(), marks = scene.marks.len(), "compiled scene");
    Ok(scene)
}

/// Render a dataset to document bytes in the configured format.
pub fn render_plot(data: &PlotData, config: &ChartConfig) -> Result<Vec<u8>> {
    let scene = build_scene(data, config)?;
    render_scene(&scene, config)
}

pub fn render_scene(scene: &SceneGraph, config: &ChartConfig) -> Result<Vec<u8>> {
    match config.format {
        OutputFormat::Png => graph::render_png(scene).context("Failed to render PNG"),
        OutputFormat::Svg => graph::render_svg(scene)
            .map(String::into_bytes)
            .context("Failed to render SVG"),
        OutputFormat::Html => {
            let svg = graph::render_svg(scene).context("Failed to render SVG")?;
            Ok(page::chart_page(&svg, scene, config).into_bytes())
        }
    }
}

/// Render a failure into the same kind of document the chart would have been.
pub fn render_failure(err: &anyhow::Error, config: &ChartConfig) -> Result<Vec<u8>> {
    let message = format!("{:#}", err);
    match config.format {
        OutputFormat::Html => Ok(page::error_page(&message, config).into_bytes()),
        _ => {
            let scene = compile_error_scene(&message, config)?;
            render_scene(&scene, config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{RawRecord, Value};

    fn penguins(rows: &[(f64, Option<f64>, f64, &str)]) -> PlotData {
        let records = rows
            .iter()
            .map(|&(x, y, r, s)| {
                RawRecord::new()
                    .with("flipper_length_mm", Value::Number(x))
                    .with("body_mass_g", y.map(Value::Number).unwrap_or(Value::Missing))
                    .with("bill_length_mm", Value::Number(r))
                    .with("species", Value::Text(s.to_string()))
            })
            .collect();
        PlotData::new(
            vec![
                "species".into(),
                "bill_length_mm".into(),
                "flipper_length_mm".into(),
                "body_mass_g".into(),
            ],
            records,
        )
    }

    fn chart_error(err: &anyhow::Error) -> &ChartError {
        err.downcast_ref::<ChartError>().expect("expected a ChartError")
    }

    #[test]
    fn test_build_scene_success() {
        let data = penguins(&[
            (181.0, Some(3750.0), 39.1, "Adelie"),
            (195.0, Some(3650.0), 37.8, "Adelie"),
        ]);
        let scene = build_scene(&data, &ChartConfig::default()).unwrap();
        assert_eq!(scene.marks.len(), 2);
    }

    #[test]
    fn test_empty_source_before_resolution() {
        // No columns would resolve either, but emptiness is reported first.
        let data = PlotData::new(vec!["island".into()], vec![]);
        let err = build_scene(&data, &ChartConfig::default()).unwrap_err();
        assert_eq!(chart_error(&err), &ChartError::EmptySource);
    }

    #[test]
    fn test_unresolved_columns() {
        let data = PlotData::new(
            vec!["flipper_length_mm".into(), "body_mass_g".into(), "species".into()],
            vec![RawRecord::new().with("species", Value::Text("Adelie".into()))],
        );
        let err = build_scene(&data, &ChartConfig::default()).unwrap_err();
        assert!(matches!(chart_error(&err), ChartError::UnresolvedColumns { .. }));
        assert!(err.to_string().contains("size (bill length)"));
    }

    #[test]
    fn test_no_plottable_rows() {
        let data = penguins(&[(181.0, None, 39.1, "Adelie")]);
        let err = build_scene(&data, &ChartConfig::default()).unwrap_err();
        assert_eq!(chart_error(&err), &ChartError::NoPlottableRows { total: 1 });
    }

    #[test]
    fn test_render_plot_svg_and_html() {
        let data = penguins(&[
            (181.0, Some(3750.0), 39.1, "Adelie"),
            (210.0, None, 46.1, "Gentoo"),
            (196.0, Some(3500.0), 49.5, "Chinstrap"),
        ]);
        let mut config = ChartConfig::default();
        config.format = OutputFormat::Svg;
        let svg = String::from_utf8(render_plot(&data, &config).unwrap()).unwrap();
        assert_eq!(svg.matches("<circle").count(), 2);

        config.format = OutputFormat::Html;
        let html = String::from_utf8(render_plot(&data, &config).unwrap()).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("data-tooltip=\"Chinstrap&#10;Flipper: 196"));
    }

    #[test]
    fn test_render_failure_html() {
        let err: anyhow::Error = ChartError::EmptySource.into();
        let bytes = render_failure(&err, &ChartConfig::default()).unwrap();
        let html = String::from_utf8(bytes).unwrap();
        assert!(html.contains("Error: Data source loaded but contains no rows"));
    }

    #[test]
    fn test_render_failure_svg() {
        let err: anyhow::Error = ChartError::NoPlottableRows { total: 4 }.into();
        let mut config = ChartConfig::default();
        config.format = OutputFormat::Svg;
        let svg = String::from_utf8(render_failure(&err, &config).unwrap()).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Error:"));
        assert!(!svg.contains("<circle"));
    }
}
