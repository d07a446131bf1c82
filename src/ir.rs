use plotters::style::RGBColor;

use crate::transform::NormalizedRecord;

// =============================================================================
// Scene Graph
// =============================================================================

/// A list of primitive drawing commands in canvas pixel coordinates.
/// The backend just executes these blindly, in order.
#[derive(Debug, Clone)]
pub struct SceneGraph {
    pub width: u32,
    pub height: u32,
    pub commands: Vec<DrawCommand>,
    /// Hover targets, one per plotted record, in draw order.
    pub marks: Vec<Mark>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect {
        // Top-Left, Bottom-Right
        tl: (f64, f64),
        br: (f64, f64),
        color: RGBColor,
    },
    Line {
        from: (f64, f64),
        to: (f64, f64),
        color: RGBColor,
        width: u32,
    },
    Text {
        pos: (f64, f64),
        text: String,
        size: f64,
        color: RGBColor,
        anchor: TextAnchor,
        /// Rotated a quarter turn counter-clockwise (vertical axis captions).
        vertical: bool,
    },
    Circle {
        center: (f64, f64),
        radius: f64,
        color: RGBColor,
        opacity: f64,
    },
}

/// A plotted point together with the record it represents.
#[derive(Debug, Clone, PartialEq)]
pub struct Mark {
    pub center: (f64, f64),
    pub radius: f64,
    pub record: NormalizedRecord,
}

impl Mark {
    pub fn contains(&self, point: (f64, f64)) -> bool {
        let dx = point.0 - self.center.0;
        let dy = point.1 - self.center.1;
        dx * dx + dy * dy <= self.radius * self.radius
    }
}
