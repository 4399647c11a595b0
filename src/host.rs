// The platform side of the window manager: whatever renders window views
// (a WebView bridge, a test recorder) and owns the content nodes.

use serde::Serialize;
use thiserror::Error;

use crate::dialogwm::{Frame, Size, Viewport, WindowId};

#[derive(Debug, Error)]
pub enum HostError {
    #[error("host rejected the operation: {0}")]
    Rejected(String),
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

/// Everything a host needs to draw one window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct View {
    pub id: WindowId,
    pub title: String,
    pub frame: Frame,
    pub z_order: u64,
    pub minimized: bool,
    pub draggable: bool,
    pub modal: bool,
    pub buttons: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum NotificationKind {
    Opened,
    Closed,
    Minimized,
    Restored,
    ButtonClicked { label: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub window: WindowId,
    #[serde(flatten)]
    pub kind: NotificationKind,
}

pub trait Host {
    /// Opaque content node handed to a window for its lifetime.
    type Content;

    fn resolve(&mut self, selector: &str) -> Option<Self::Content>;
    /// Takes back a content node the manager could not keep.
    fn release(&mut self, id: &WindowId, content: Self::Content);

    fn viewport(&self) -> Viewport;
    fn is_touch_primary(&self) -> bool {
        false
    }
    /// Size the content would take with `auto` dimensions.
    fn natural_size(&self, _id: &WindowId) -> Option<Size> {
        None
    }

    fn attach(&mut self, view: &View) -> Result<(), HostError>;
    // called from pointer handlers, so it has no way to fail
    fn update(&mut self, view: &View);
    fn detach(&mut self, id: &WindowId) -> Result<(), HostError>;

    fn notify(&mut self, notification: Notification);
}
