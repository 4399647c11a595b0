use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Viewport {
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Viewport {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Keeps a box of `size` whose top-left is `origin` inside the viewport.
    /// A box larger than the viewport is pinned to the leading edge.
    pub fn clamp(&self, origin: Position, size: Size) -> Position {
        Position {
            x: clamp_axis(origin.x, self.width.saturating_sub(size.width)),
            y: clamp_axis(origin.y, self.height.saturating_sub(size.height)),
        }
    }
}

fn clamp_axis(value: i32, max: i32) -> i32 {
    value.min(max).max(0)
}
