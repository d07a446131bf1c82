//! Hover tooltips as a pure state machine.
//!
//! Pointer events go in, a new [`TooltipState`] comes out. Nothing here
//! touches a drawing surface, so the same logic backs the HTML output and
//! the headless `--hover` lookup.

use std::fmt;

use crate::ir::Mark;
use crate::transform::NormalizedRecord;

/// Offset of the tooltip box from the pointer, in pixels.
pub const TOOLTIP_OFFSET: (f64, f64) = (12.0, 12.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Pointer moved to a canvas position (also covers entering a mark).
    Move { x: f64, y: f64 },
    /// Pointer left the drawing surface.
    Leave,
}

/// Text shown for one record.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipContent {
    pub species: String,
    pub lines: Vec<String>,
}

impl From<&NormalizedRecord> for TooltipContent {
    fn from(record: &NormalizedRecord) -> Self {
        Self {
            species: record.species.clone(),
            lines: vec![
                format!("Flipper: {}", record.x),
                format!("Body Mass: {}", record.y),
                format!("Bill: {}", record.r),
            ],
        }
    }
}

impl fmt::Display for TooltipContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.species)?;
        for line in &self.lines {
            write!(f, "\n{}", line)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActiveTooltip {
    /// Index into the scene's marks.
    pub mark: usize,
    pub position: (f64, f64),
    pub content: TooltipContent,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum TooltipState {
    #[default]
    Hidden,
    Visible(ActiveTooltip),
}

impl TooltipState {
    /// Apply one pointer event. The latest event always wins.
    pub fn update(&self, event: PointerEvent, marks: &[Mark]) -> TooltipState {
        match event {
            PointerEvent::Leave => TooltipState::Hidden,
            PointerEvent::Move { x, y } => match hit_test(marks, (x, y)) {
                None => TooltipState::Hidden,
                Some(idx) => {
                    let position = (x + TOOLTIP_OFFSET.0, y + TOOLTIP_OFFSET.1);
                    match self {
                        // Same mark: only follow the pointer.
                        TooltipState::Visible(active) if active.mark == idx => {
                            TooltipState::Visible(ActiveTooltip { position, ..active.clone() })
                        }
                        _ => TooltipState::Visible(ActiveTooltip {
                            mark: idx,
                            position,
                            content: TooltipContent::from(&marks[idx].record),
                        }),
                    }
                }
            },
        }
    }

    pub fn visible(&self) -> Option<&ActiveTooltip> {
        match self {
            TooltipState::Visible(active) => Some(active),
            TooltipState::Hidden => None,
        }
    }
}

/// Topmost mark under the point. Later marks are drawn on top.
pub fn hit_test(marks: &[Mark], point: (f64, f64)) -> Option<usize> {
    marks.iter().rposition(|m| m.contains(point))
}

/// Run a sequence of events from the hidden state.
pub fn replay<I: IntoIterator<Item = PointerEvent>>(events: I, marks: &[Mark]) -> TooltipState {
    events
        .into_iter()
        .fold(TooltipState::Hidden, |state, event| state.update(event, marks))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mark(cx: f64, cy: f64, r: f64, species: &str) -> Mark {
        Mark {
            center: (cx, cy),
            radius: r,
            record: NormalizedRecord { x: 181.0, y: 3750.0, r: 39.1, species: species.to_string() },
        }
    }

    fn marks() -> Vec<Mark> {
        vec![
            mark(100.0, 100.0, 10.0, "Adelie"),
            mark(105.0, 100.0, 10.0, "Gentoo"),
            mark(300.0, 50.0, 5.0, "Chinstrap"),
        ]
    }

    #[test]
    fn test_enter_shows_tooltip() {
        let state = TooltipState::Hidden.update(PointerEvent::Move { x: 300.0, y: 52.0 }, &marks());
        let active = state.visible().unwrap();
        assert_eq!(active.mark, 2);
        assert_eq!(active.content.species, "Chinstrap");
        assert_eq!(active.position, (312.0, 64.0));
    }

    #[test]
    fn test_topmost_mark_wins() {
        // Overlap of marks 0 and 1 resolves to the one drawn last.
        assert_eq!(hit_test(&marks(), (102.0, 100.0)), Some(1));
        assert_eq!(hit_test(&marks(), (92.0, 100.0)), Some(0));
        assert_eq!(hit_test(&marks(), (0.0, 0.0)), None);
    }

    #[test]
    fn test_move_follows_pointer() {
        let m = marks();
        let entered = TooltipState::Hidden.update(PointerEvent::Move { x: 298.0, y: 50.0 }, &m);
        let moved = entered.update(PointerEvent::Move { x: 302.0, y: 49.0 }, &m);
        let active = moved.visible().unwrap();
        assert_eq!(active.mark, 2);
        assert_eq!(active.position, (314.0, 61.0));
        assert_eq!(active.content, entered.visible().unwrap().content);
    }

    #[test]
    fn test_leave_hides() {
        let m = marks();
        let state = replay(
            [PointerEvent::Move { x: 300.0, y: 50.0 }, PointerEvent::Leave],
            &m,
        );
        assert_eq!(state, TooltipState::Hidden);

        let off_mark = replay(
            [PointerEvent::Move { x: 300.0, y: 50.0 }, PointerEvent::Move { x: 500.0, y: 500.0 }],
            &m,
        );
        assert_eq!(off_mark, TooltipState::Hidden);
    }

    #[test]
    fn test_switching_marks_replaces_content() {
        let m = marks();
        let state = replay(
            [PointerEvent::Move { x: 300.0, y: 50.0 }, PointerEvent::Move { x: 92.0, y: 100.0 }],
            &m,
        );
        assert_eq!(state.visible().unwrap().content.species, "Adelie");
    }

    #[test]
    fn test_tooltip_text() {
        let content = TooltipContent::from(&NormalizedRecord {
            x: 181.0,
            y: 3750.0,
            r: 39.1,
            species: "Adelie".to_string(),
        });
        assert_eq!(content.to_string(), "Adelie\nFlipper: 181\nBody Mass: 3750\nBill: 39.1");
    }
}
