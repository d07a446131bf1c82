//! Standalone HTML documents around the rendered SVG.

use std::fmt::Write;

use crate::config::ChartConfig;
use crate::interaction::{TooltipContent, TOOLTIP_OFFSET};
use crate::ir::SceneGraph;
use crate::theme_resolve::{parse_color, to_hex};

const DEFAULT_PAGE_TITLE: &str = "Penguins Scatterplot";

/// Wrap the chart SVG in a page and attach a hover target with a tooltip to every mark.
pub fn chart_page(svg: &str, scene: &SceneGraph, config: &ChartConfig) -> String {
    let chart = format!("{}\n{}", with_hover_targets(svg, scene), tooltip_script());
    document(config, &chart)
}

/// Page showing a failure in place of the chart.
pub fn error_page(message: &str, config: &ChartConfig) -> String {
    let color = parse_color(&config.theme.error)
        .map(|c| to_hex(&c))
        .unwrap_or_else(|| "#dc143c".to_string());
    let body = format!(
        "<p class=\"error\" style=\"color: {}; font-weight: 600\">Error: {}</p>",
        color,
        escape(message)
    );
    document(config, &body)
}

fn document(config: &ChartConfig, chart: &str) -> String {
    let title = config.title.as_deref().unwrap_or(DEFAULT_PAGE_TITLE);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {{ font-family: sans-serif; margin: 24px; }}
#chart svg {{ display: block; }}
#chart .hover-targets circle {{ cursor: pointer; }}
#tooltip {{
  position: absolute; pointer-events: none; opacity: 0; white-space: pre;
  background: #fff; border: 1px solid #ccc; border-radius: 4px;
  padding: 6px 8px; font-size: 12px; transition: opacity 0.2s;
}}
</style>
</head>
<body>
<div id="chart">
{chart}
</div>
</body>
</html>
"#,
        title = escape(title),
        chart = chart
    )
}

/// Insert an invisible, hoverable circle over each mark carrying its tooltip text.
///
/// The overlay goes last so it sits above everything plotters drew.
fn with_hover_targets(svg: &str, scene: &SceneGraph) -> String {
    let mut overlay = String::from("<g class=\"hover-targets\">\n");
    for mark in &scene.marks {
        let tooltip = TooltipContent::from(&mark.record);
        // Writing to a String cannot fail.
        let _ = writeln!(
            overlay,
            "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"#000\" fill-opacity=\"0\" \
             data-tooltip=\"{}\"/>",
            mark.center.0,
            mark.center.1,
            mark.radius,
            escape(&tooltip.to_string())
        );
    }
    overlay.push_str("</g>\n");

    match svg.rfind("</svg>") {
        Some(idx) => format!("{}{}{}", &svg[..idx], overlay, &svg[idx..]),
        None => format!("{}{}", svg, overlay),
    }
}

/// Tooltip box driven by pointer events on the hover targets.
///
/// It tracks the pointer at [`TOOLTIP_OFFSET`] while over a mark and fades out on leave.
fn tooltip_script() -> String {
    let (dx, dy) = TOOLTIP_OFFSET;
    format!(
        r##"<div id="tooltip"></div>
<script>
(function () {{
  var tip = document.getElementById("tooltip");
  var place = function (e) {{
    tip.style.left = (e.pageX + {dx}) + "px";
    tip.style.top = (e.pageY + {dy}) + "px";
  }};
  document.querySelectorAll("#chart .hover-targets circle").forEach(function (mark) {{
    mark.addEventListener("mouseenter", function (e) {{
      tip.textContent = mark.getAttribute("data-tooltip");
      place(e);
      tip.style.opacity = "0.9";
    }});
    mark.addEventListener("mousemove", place);
    mark.addEventListener("mouseleave", function () {{
      tip.style.opacity = "0";
    }});
  }});
}})();
</script>"##,
        dx = dx,
        dy = dy
    )
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '\n' => out.push_str("&#10;"),
            _ => out.push(c),
        }
    }
    out
}
