use anyhow::{anyhow, Context, Result};
use image::ImageEncoder;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::ir::{DrawCommand, SceneGraph, TextAnchor};

/// Execute a scene on an SVG backend and return the document.
pub fn render_svg(scene: &SceneGraph) -> Result<String> {
    let mut svg = String::new();
    {
        let root =
            SVGBackend::with_string(&mut svg, (scene.width, scene.height)).into_drawing_area();
        draw_scene(&root, scene)?;
    }
    Ok(svg)
}

/// Execute a scene on a bitmap backend and encode it as PNG.
pub fn render_png(scene: &SceneGraph) -> Result<Vec<u8>> {
    let len = (scene.width as usize)
        .checked_mul(scene.height as usize)
        .and_then(|pixels| pixels.checked_mul(3))
        .ok_or_else(|| anyhow!("Canvas {}x{} is too large", scene.width, scene.height))?;
    let mut buffer = vec![0u8; len];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (scene.width, scene.height))
            .into_drawing_area();
        draw_scene(&root, scene)?;
    }
    encode_png(&buffer, scene.width, scene.height)
}

/// Encode an RGB8 buffer as PNG
pub fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    let mut png_bytes = Vec::new();
    {
        let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
        encoder
            .write_image(buffer, width, height, image::ColorType::Rgb8)
            .context("Failed to encode PNG")?;
    }
    Ok(png_bytes)
}

fn draw_scene<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, scene: &SceneGraph) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).context("Failed to fill background")?;
    for command in &scene.commands {
        draw_command(root, command)?;
    }
    root.present().context("Failed to present drawing")?;
    Ok(())
}

fn draw_command<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    command: &DrawCommand,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    match command {
        DrawCommand::FillRect { tl, br, color } => {
            root.draw(&Rectangle::new([px(*tl), px(*br)], color.filled()))
                .context("Failed to draw rectangle")?;
        }
        DrawCommand::Line { from, to, color, width } => {
            root.draw(&PathElement::new(vec![px(*from), px(*to)], color.stroke_width(*width)))
                .context("Failed to draw line")?;
        }
        DrawCommand::Text { pos, text, size, color, anchor, vertical } => {
            let mut font = FontDesc::new(FontFamily::SansSerif, *size, FontStyle::Normal);
            if *vertical {
                font = font.transform(FontTransform::Rotate270);
            }
            let h_pos = match anchor {
                TextAnchor::Start => HPos::Left,
                TextAnchor::Middle => HPos::Center,
                TextAnchor::End => HPos::Right,
            };
            let style = TextStyle::from(font)
                .color(color)
                .pos(Pos::new(h_pos, VPos::Center));
            root.draw(&Text::new(text.clone(), px(*pos), style))
                .context("Failed to draw text")?;
        }
        DrawCommand::Circle { center, radius, color, opacity } => {
            // No outline stroke, fill only. Backends take whole-pixel radii.
            root.draw(&Circle::new(
                px(*center),
                radius.round() as i32,
                color.mix(*opacity).filled(),
            ))
            .context("Failed to draw circle")?;
        }
    }
    Ok(())
}

fn px((x, y): (f64, f64)) -> (i32, i32) {
    (x.round() as i32, y.round() as i32)
}
