//! Default placement rules for floating windows.
//!
//! An anchor is only consulted while a window has not been dragged by the
//! user. It is resolved against the current viewport every time, so a
//! centered window stays centered across viewport resizes.

use std::fmt;

use serde_json::{json, Value};

use crate::dialogwm::{Length, Position, Size, Viewport};

mod position;
pub use position::*;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Anchor {
    /// Window center sits on the viewport center, on both axes.
    #[default]
    Centered,
    Edges {
        horizontal: AxisAnchor,
        vertical: AxisAnchor,
    },
}

/// Placement along one axis. Offsets are measured inward from the named
/// edge, so they never carry a sign of their own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AxisAnchor {
    Start(Length),
    Center,
    End(Length),
}

impl AxisAnchor {
    fn place(&self, extent: i32, span: i32) -> i32 {
        match self {
            AxisAnchor::Start(offset) => offset.resolve(extent),
            AxisAnchor::Center => extent.saturating_sub(span) / 2,
            AxisAnchor::End(offset) => extent
                .saturating_sub(span)
                .saturating_sub(offset.resolve(extent)),
        }
    }

    fn write(&self, f: &mut fmt::Formatter<'_>, start: &str, end: &str) -> fmt::Result {
        match self {
            AxisAnchor::Center => write!(f, "center"),
            AxisAnchor::Start(offset) => write_edge(f, start, '+', offset),
            AxisAnchor::End(offset) => write_edge(f, end, '-', offset),
        }
    }
}

fn write_edge(f: &mut fmt::Formatter<'_>, edge: &str, sign: char, offset: &Length) -> fmt::Result {
    match offset {
        Length::Px(0) => write!(f, "{}", edge),
        Length::Px(px) => write!(f, "{}{}{}", edge, sign, px),
        Length::Percent(pct) => write!(f, "{}{}{}%", edge, sign, pct),
    }
}

impl Anchor {
    pub fn edges(horizontal: AxisAnchor, vertical: AxisAnchor) -> Self {
        Anchor::Edges {
            horizontal,
            vertical,
        }
    }

    /// Top-left corner for a window of `size`, kept inside the viewport.
    pub fn resolve(&self, viewport: Viewport, size: Size) -> Position {
        let (horizontal, vertical) = match self {
            Anchor::Centered => (AxisAnchor::Center, AxisAnchor::Center),
            Anchor::Edges {
                horizontal,
                vertical,
            } => (*horizontal, *vertical),
        };
        let origin = Position {
            x: horizontal.place(viewport.width, size.width),
            y: vertical.place(viewport.height, size.height),
        };
        viewport.clamp(origin, size)
    }

    /// Legacy `{my, at}` form, as the option getter reports it.
    pub fn to_json(&self) -> Value {
        let at = self.to_string();
        json!({ "my": at.clone(), "at": at })
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anchor::Centered => write!(f, "center"),
            Anchor::Edges {
                horizontal,
                vertical,
            } => {
                horizontal.write(f, "left", "right")?;
                write!(f, " ")?;
                vertical.write(f, "top", "bottom")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VP: Viewport = Viewport {
        width: 1000,
        height: 800,
    };

    #[test]
    fn centered_puts_center_on_viewport_center() {
        let size = Size {
            width: 300,
            height: 200,
        };
        let p = Anchor::Centered.resolve(VP, size);
        assert_eq!(p.x + size.width / 2, 500);
        assert_eq!(p.y + size.height / 2, 400);
    }

    #[test]
    fn end_edges_measure_inward() {
        let anchor = Anchor::edges(
            AxisAnchor::End(Length::Px(10)),
            AxisAnchor::Start(Length::Px(10)),
        );
        let p = anchor.resolve(
            VP,
            Size {
                width: 200,
                height: 100,
            },
        );
        assert_eq!(p, Position { x: 790, y: 10 });
    }

    #[test]
    fn percent_offsets_follow_the_axis() {
        let anchor = Anchor::edges(AxisAnchor::Center, AxisAnchor::Start(Length::Percent(5.0)));
        let p = anchor.resolve(
            VP,
            Size {
                width: 200,
                height: 100,
            },
        );
        assert_eq!(p, Position { x: 400, y: 40 });
    }

    #[test]
    fn oversized_spans_do_not_overflow() {
        let anchor = Anchor::edges(
            AxisAnchor::End(Length::Px(i32::MAX)),
            AxisAnchor::Center,
        );
        let p = anchor.resolve(
            VP,
            Size {
                width: i32::MAX,
                height: i32::MAX,
            },
        );
        assert_eq!(p, Position { x: 0, y: 0 });
    }

    #[test]
    fn display_round_trips_through_parser() {
        let anchor = Anchor::edges(
            AxisAnchor::End(Length::Px(10)),
            AxisAnchor::Start(Length::Percent(5.0)),
        );
        assert_eq!(anchor.to_string(), "right-10 top+5%");
        assert_eq!(parse_at(&anchor.to_string()).unwrap(), anchor);
    }
}
