use serde::Serialize;

use super::{CloseCallback, Dimension, Length, Position, Settings, Size, Viewport, WindowId};
use crate::host::View;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WindowState {
    /// Registered but not displayed: before the first show, or after close.
    Closed,
    Open,
    /// Collapsed to its title bar, body detached from layout.
    Minimized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Overflow {
    Hidden,
    Visible,
}

/// Resolved geometry and visibility of a window, in viewport pixels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
    pub overflow: Overflow,
    pub body_visible: bool,
    pub button_pane_visible: bool,
}

impl Frame {
    pub fn origin(&self) -> Position {
        Position {
            x: self.left,
            y: self.top,
        }
    }

    pub fn size(&self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }
}

impl Default for Frame {
    fn default() -> Self {
        Frame {
            left: 0,
            top: 0,
            width: 0,
            height: 0,
            overflow: Overflow::Hidden,
            body_visible: true,
            button_pane_visible: true,
        }
    }
}

/// Upper size bounds: a share of the viewport, minus a margin on each side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constraints {
    pub max_width_fraction: f64,
    pub max_height_fraction: f64,
    pub margin: i32,
}

impl Constraints {
    fn max_extent(fraction: f64, margin: i32, extent: i32) -> i32 {
        ((extent as f64 * fraction).round() as i32).saturating_sub(margin.saturating_mul(2))
    }
}

fn resolve_axis(dimension: Dimension, natural: Option<i32>, min: Length, max: i32, extent: i32) -> i32 {
    let min = min.resolve(extent);
    let base = match dimension.length() {
        Some(length) => length.resolve(extent),
        None => natural.unwrap_or(min),
    };
    // min wins over max, like css
    base.min(max).max(min)
}

pub struct Window<C> {
    pub id: WindowId,
    pub settings: Settings,
    pub constraints: Constraints,
    pub state: WindowState,
    pub z_order: u64,
    pub frame: Frame,
    snapshot: Option<Frame>,
    user_positioned: bool,
    on_close: Option<CloseCallback>,
    content: C,
}

impl<C> Window<C> {
    pub fn new(
        id: WindowId,
        content: C,
        settings: Settings,
        constraints: Constraints,
        on_close: Option<CloseCallback>,
        z_order: u64,
    ) -> Self {
        Window {
            id,
            settings,
            constraints,
            state: WindowState::Closed,
            z_order,
            frame: Frame::default(),
            snapshot: None,
            user_positioned: false,
            on_close,
            content,
        }
    }

    pub fn is_live(&self) -> bool {
        self.state != WindowState::Closed
    }

    pub fn is_user_positioned(&self) -> bool {
        self.user_positioned
    }

    pub fn into_content(self) -> C {
        self.content
    }

    pub fn snapshot(&self) -> Option<&Frame> {
        self.snapshot.as_ref()
    }

    pub(super) fn on_close_mut(&mut self) -> Option<&mut CloseCallback> {
        self.on_close.as_mut()
    }

    pub fn resolve_size(&self, viewport: Viewport, natural: Option<Size>) -> Size {
        let c = self.constraints;
        Size {
            width: resolve_axis(
                self.settings.width,
                natural.map(|s| s.width),
                self.settings.min_width,
                Constraints::max_extent(c.max_width_fraction, c.margin, viewport.width),
                viewport.width,
            ),
            height: resolve_axis(
                self.settings.height,
                natural.map(|s| s.height),
                self.settings.min_height,
                Constraints::max_extent(c.max_height_fraction, c.margin, viewport.height),
                viewport.height,
            ),
        }
    }

    /// Recomputes size and position. A dragged window keeps its origin,
    /// pulled back inside the viewport if the new size pushes it out.
    /// A minimized window keeps its collapsed frame.
    pub fn layout(&mut self, viewport: Viewport, natural: Option<Size>) {
        if self.state == WindowState::Minimized {
            return;
        }
        let size = self.resolve_size(viewport, natural);
        let origin = if self.user_positioned {
            viewport.clamp(self.frame.origin(), size)
        } else {
            self.settings.anchor.resolve(viewport, size)
        };
        self.frame.width = size.width;
        self.frame.height = size.height;
        self.frame.left = origin.x;
        self.frame.top = origin.y;
    }

    pub fn place(&mut self, origin: Position) {
        self.frame.left = origin.x;
        self.frame.top = origin.y;
        self.user_positioned = true;
    }

    pub fn reset_anchor(&mut self) {
        self.user_positioned = false;
    }

    pub fn minimize(&mut self, title_bar_height: i32) {
        self.snapshot = Some(self.frame.clone());
        self.frame.height = title_bar_height;
        self.frame.overflow = Overflow::Visible;
        self.frame.body_visible = false;
        self.frame.button_pane_visible = false;
        self.state = WindowState::Minimized;
    }

    pub fn restore(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            self.frame = snapshot;
        }
        self.state = WindowState::Open;
    }

    pub fn view(&self) -> View {
        View {
            id: self.id.clone(),
            title: self.settings.title.clone(),
            frame: self.frame.clone(),
            z_order: self.z_order,
            minimized: self.state == WindowState::Minimized,
            draggable: self.settings.draggable,
            modal: self.settings.modal,
            buttons: self
                .settings
                .buttons
                .iter()
                .map(|b| b.label.clone())
                .collect(),
        }
    }
}
