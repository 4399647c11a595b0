use super::{Position, WindowId};

/// A pointer-down on a title bar, kept until pointer-up or cancel.
///
/// Moves are computed from the drag start rather than accumulated, so a
/// pointer that leaves the viewport and comes back finds the window where
/// it left it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    pub window: WindowId,
    start: Position,
    origin: Position,
}

impl DragSession {
    pub fn new(window: WindowId, pointer: Position, origin: Position) -> Self {
        DragSession {
            window,
            start: pointer,
            origin,
        }
    }

    /// Unclamped top-left for the current pointer sample.
    pub fn target(&self, pointer: Position) -> Position {
        Position {
            x: self.origin.x.saturating_add(pointer.x.saturating_sub(self.start.x)),
            y: self.origin.y.saturating_add(pointer.y.saturating_sub(self.start.y)),
        }
    }
}
