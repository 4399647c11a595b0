use std::collections::BTreeSet;

use log::{debug, error, info, trace};
use serde_json::Value;

use super::{
    CloseDecision, Constraints, DialogOption, DialogOptions, DragSession, Length,
    Position, Registry, Settings, Window, WindowId, WindowState, WmError,
};
use crate::anchor::{Anchor, AxisAnchor};
use crate::config::Config;
use crate::host::{Host, Notification, NotificationKind, View};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    Closed,
    /// The close callback vetoed; nothing changed.
    Cancelled,
}

#[derive(Debug, PartialEq, Eq)]
pub enum DestroyOutcome<C> {
    Destroyed(C),
    Cancelled,
}

/// Owns every window of one document and the state they share: the
/// registry, the stacking counter, the escape listeners and the drag in
/// progress. All calls run to completion on the UI thread.
pub struct WindowManager<H: Host> {
    host: H,
    config: Config,
    registry: Registry<H::Content>,
    escape_listeners: BTreeSet<WindowId>,
    drag: Option<DragSession>,
}

impl<H: Host> WindowManager<H> {
    pub fn new(host: H, config: Config) -> Self {
        let registry = Registry::new(config.z_index_base);
        WindowManager {
            host,
            config,
            registry,
            escape_listeners: BTreeSet::new(),
            drag: None,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn window(&self, id: &WindowId) -> Result<&Window<H::Content>, WmError> {
        self.registry.get(id)
    }

    pub fn contains(&self, id: &WindowId) -> bool {
        self.registry.contains(id)
    }

    pub fn view(&self, id: &WindowId) -> Result<View, WmError> {
        Ok(self.registry.get(id)?.view())
    }

    /// Live windows, back to front.
    pub fn stacking(&self) -> Vec<WindowId> {
        self.registry.stacking()
    }

    pub fn is_open(&self, id: &WindowId) -> Result<bool, WmError> {
        Ok(self.registry.get(id)?.is_live())
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// z of the frontmost live modal window; the host puts its blocking
    /// overlay right beneath it.
    pub fn modal_floor(&self) -> Option<u64> {
        self.registry
            .live()
            .filter(|w| w.settings.modal)
            .map(|w| w.z_order)
            .max()
    }

    fn title_bar_height(&self) -> i32 {
        if self.host.is_touch_primary() {
            self.config.touch_title_bar_height
        } else {
            self.config.title_bar_height
        }
    }

    fn is_compact(&self) -> bool {
        self.host.viewport().width <= self.config.compact_breakpoint
    }

    /// Opens the element `selector` names. Its id becomes the window id.
    pub fn open(&mut self, selector: &str, options: DialogOptions) -> Result<WindowId, WmError> {
        let id = WindowId::from(selector);
        if self.registry.contains(&id) {
            return Err(WmError::AlreadyRegistered(id));
        }
        let content = self
            .host
            .resolve(selector)
            .ok_or_else(|| WmError::NotFound(id.clone()))?;
        self.open_content(Some(id), content, options)
    }

    pub fn open_content(
        &mut self,
        id: Option<WindowId>,
        content: H::Content,
        options: DialogOptions,
    ) -> Result<WindowId, WmError> {
        let id = match id {
            Some(id) => id,
            None => self.registry.generate_id(),
        };
        if self.registry.contains(&id) {
            self.host.release(&id, content);
            return Err(WmError::AlreadyRegistered(id));
        }

        let compact = self.is_compact();
        let DialogOptions {
            title,
            width,
            height,
            min_width,
            min_height,
            draggable,
            modal,
            anchor,
            buttons,
            auto_open,
            on_close,
            extra,
        } = options;
        let anchor = anchor.unwrap_or(if compact {
            Anchor::edges(AxisAnchor::Center, AxisAnchor::Start(Length::Percent(5.0)))
        } else {
            Anchor::Centered
        });
        let settings = Settings {
            title: title.unwrap_or_else(|| String::from("Dialog")),
            width,
            height,
            min_width: min_width.unwrap_or(Length::Px(self.config.min_width)),
            min_height: min_height.unwrap_or(Length::Px(self.config.min_height)),
            draggable: draggable.unwrap_or(!compact),
            modal,
            anchor,
            buttons,
            auto_open: auto_open.unwrap_or(true),
            extra,
        };
        let constraints = if compact {
            Constraints {
                max_width_fraction: 1.0,
                max_height_fraction: 1.0,
                margin: self.config.compact_margin,
            }
        } else {
            Constraints {
                max_width_fraction: self.config.max_width_fraction,
                max_height_fraction: self.config.max_height_fraction,
                margin: 0,
            }
        };

        let z = self.registry.next_z();
        let auto_open = settings.auto_open;
        let window = Window::new(id.clone(), content, settings, constraints, on_close, z);
        self.registry.insert(window)?;
        info!("registering window {} (z {})", id, z);

        if auto_open {
            if let Err(e) = self.show(&id) {
                // nothing half-built stays behind
                let window = self.registry.remove(&id)?;
                self.host.release(&id, window.into_content());
                return Err(e);
            }
        }
        Ok(id)
    }

    /// Displays a closed window: lays it out, raises it, attaches it.
    /// Does nothing on a window that is already open or minimized.
    pub fn show(&mut self, id: &WindowId) -> Result<(), WmError> {
        let viewport = self.host.viewport();
        let natural = self.host.natural_size(id);
        let window = self.registry.get_mut(id)?;
        if window.is_live() {
            return Ok(());
        }

        let prior = window.frame.clone();
        window.layout(viewport, natural);
        let z = self.registry.top_z() + 1;
        let window = self.registry.get_mut(id)?;
        let mut view = window.view();
        view.z_order = z;

        if let Err(source) = self.host.attach(&view) {
            error!("unable to attach window {}: {}", id, source);
            window.frame = prior;
            return Err(WmError::AttachmentFailed {
                id: id.clone(),
                source,
            });
        }
        window.state = WindowState::Open;
        self.registry.raise(id)?;
        self.escape_listeners.insert(id.clone());
        info!("showing window {}", id);
        self.host.notify(Notification {
            window: id.clone(),
            kind: NotificationKind::Opened,
        });
        Ok(())
    }

    /// Hides a window, keeping its record so `show` can bring it back.
    /// The close callback runs first and may veto.
    pub fn close(&mut self, id: &WindowId) -> Result<CloseOutcome, WmError> {
        let window = self.registry.get_mut(id)?;
        if !window.is_live() {
            return Ok(CloseOutcome::Closed);
        }
        if let Some(callback) = window.on_close_mut() {
            if callback(id) == CloseDecision::Veto {
                debug!("close of {} vetoed by its callback", id);
                return Ok(CloseOutcome::Cancelled);
            }
        }

        if let Err(source) = self.host.detach(id) {
            error!("unable to detach window {}: {}", id, source);
            return Err(WmError::AttachmentFailed {
                id: id.clone(),
                source,
            });
        }
        if window.state == WindowState::Minimized {
            window.restore();
        }
        window.state = WindowState::Closed;
        self.release_listeners(id);
        info!("closed window {}", id);
        self.host.notify(Notification {
            window: id.clone(),
            kind: NotificationKind::Closed,
        });
        Ok(CloseOutcome::Closed)
    }

    /// Closes (if needed) and forgets a window, handing its content back.
    pub fn destroy(&mut self, id: &WindowId) -> Result<DestroyOutcome<H::Content>, WmError> {
        if self.close(id)? == CloseOutcome::Cancelled {
            return Ok(DestroyOutcome::Cancelled);
        }
        let window = self.registry.remove(id)?;
        self.release_listeners(id);
        info!("destroyed window {}", id);
        Ok(DestroyOutcome::Destroyed(window.into_content()))
    }

    /// Destroys a window and gives its content back to the host, the way
    /// the title-bar close button and the legacy `close` verb do.
    pub fn dismiss(&mut self, id: &WindowId) -> Result<bool, WmError> {
        match self.destroy(id)? {
            DestroyOutcome::Destroyed(content) => {
                self.host.release(id, content);
                Ok(true)
            }
            DestroyOutcome::Cancelled => Ok(false),
        }
    }

    fn release_listeners(&mut self, id: &WindowId) {
        self.escape_listeners.remove(id);
        if self.drag.as_ref().map(|d| &d.window) == Some(id) {
            self.drag = None;
        }
    }

    pub fn toggle_minimize(&mut self, id: &WindowId) -> Result<WindowState, WmError> {
        let title_bar_height = self.title_bar_height();
        let viewport = self.host.viewport();
        let natural = self.host.natural_size(id);
        let window = self.registry.get_mut(id)?;
        let current = window.state;
        let kind = match current {
            WindowState::Closed => return Ok(WindowState::Closed),
            WindowState::Open => {
                window.minimize(title_bar_height);
                NotificationKind::Minimized
            }
            WindowState::Minimized => {
                window.restore();
                // options set while collapsed only apply now
                window.layout(viewport, natural);
                self.registry.raise(id)?;
                NotificationKind::Restored
            }
        };
        let window = self.registry.get(id)?;
        let state = window.state;
        self.host.update(&window.view());
        self.host.notify(Notification {
            window: id.clone(),
            kind,
        });
        Ok(state)
    }

    /// Moves a window by `delta`, keeping it fully inside the viewport.
    /// From then on its anchor is no longer applied.
    pub fn reposition(&mut self, id: &WindowId, delta: Position) -> Result<Position, WmError> {
        let origin = self.registry.get(id)?.frame.origin();
        self.move_to(
            id,
            Position {
                x: origin.x.saturating_add(delta.x),
                y: origin.y.saturating_add(delta.y),
            },
        )
    }

    fn move_to(&mut self, id: &WindowId, target: Position) -> Result<Position, WmError> {
        let viewport = self.host.viewport();
        let window = self.registry.get_mut(id)?;
        let origin = viewport.clamp(target, window.frame.size());
        window.place(origin);
        trace!("moved {} to {},{}", id, origin.x, origin.y);
        if window.is_live() {
            self.host.update(&window.view());
        }
        Ok(origin)
    }

    /// Pointer down on a title bar. Returns false when the window can't be
    /// dragged, in which case no session starts.
    pub fn begin_drag(&mut self, id: &WindowId, pointer: Position) -> Result<bool, WmError> {
        let window = self.registry.get(id)?;
        if !window.is_live() || !window.settings.draggable {
            return Ok(false);
        }
        let origin = window.frame.origin();
        self.registry.raise(id)?;
        self.drag = Some(DragSession::new(id.clone(), pointer, origin));
        let window = self.registry.get(id)?;
        self.host.update(&window.view());
        debug!("drag of {} started", id);
        Ok(true)
    }

    /// Pointer move. Never fails: a session whose window went away is
    /// dropped.
    pub fn drag_move(&mut self, pointer: Position) -> Option<Position> {
        let session = self.drag.as_ref()?;
        let id = session.window.clone();
        let target = session.target(pointer);
        match self.move_to(&id, target) {
            Ok(origin) => Some(origin),
            Err(e) => {
                debug!("dropping drag session: {}", e);
                self.drag = None;
                None
            }
        }
    }

    /// Pointer up or cancel.
    pub fn end_drag(&mut self) {
        if let Some(session) = self.drag.take() {
            debug!("drag of {} ended", session.window);
        }
    }

    pub fn move_to_top(&mut self, id: &WindowId) -> Result<u64, WmError> {
        let z = self.registry.raise(id)?;
        let window = self.registry.get(id)?;
        if window.is_live() {
            self.host.update(&window.view());
        }
        Ok(z)
    }

    /// Escape key: closes the frontmost window listening for it.
    pub fn handle_escape(&mut self) -> Option<WindowId> {
        let target = self
            .escape_listeners
            .iter()
            .filter_map(|id| self.registry.get(id).ok())
            .max_by_key(|w| w.z_order)
            .map(|w| w.id.clone())?;
        match self.close(&target) {
            Ok(CloseOutcome::Closed) => Some(target),
            Ok(CloseOutcome::Cancelled) => None,
            Err(e) => {
                debug!("escape could not close {}: {}", target, e);
                None
            }
        }
    }

    /// Re-anchors every open window the user has not dragged.
    pub fn viewport_changed(&mut self) {
        let viewport = self.host.viewport();
        for id in self.registry.ids() {
            let natural = self.host.natural_size(&id);
            if let Ok(window) = self.registry.get_mut(&id) {
                if window.state != WindowState::Open {
                    continue;
                }
                window.layout(viewport, natural);
                self.host.update(&window.view());
            }
        }
    }

    pub fn set_option(&mut self, id: &WindowId, option: DialogOption) -> Result<(), WmError> {
        let viewport = self.host.viewport();
        let natural = self.host.natural_size(id);
        let window = self.registry.get_mut(id)?;
        let mut relayout = false;
        match option {
            DialogOption::Title(title) => window.settings.title = title,
            DialogOption::Width(width) => {
                window.settings.width = width;
                relayout = true;
            }
            DialogOption::Height(height) => {
                window.settings.height = height;
                relayout = true;
            }
            DialogOption::MinWidth(min) => {
                window.settings.min_width = min;
                relayout = true;
            }
            DialogOption::MinHeight(min) => {
                window.settings.min_height = min;
                relayout = true;
            }
            DialogOption::Position(anchor) => {
                window.settings.anchor = anchor;
                window.reset_anchor();
                relayout = true;
            }
            DialogOption::Buttons(buttons) => window.settings.buttons = buttons,
            DialogOption::Draggable(draggable) => {
                window.settings.draggable = draggable;
                if !draggable && self.drag.as_ref().map(|d| &d.window) == Some(id) {
                    self.drag = None;
                }
            }
            DialogOption::Modal(modal) => window.settings.modal = modal,
            DialogOption::AutoOpen(auto_open) => window.settings.auto_open = auto_open,
            DialogOption::Other(key, value) => {
                debug!("storing unknown option {} on {}", key, id);
                window.settings.extra.insert(key, value);
                return Ok(());
            }
        }
        if relayout {
            window.layout(viewport, natural);
        }
        if window.is_live() {
            self.host.update(&window.view());
        }
        Ok(())
    }

    pub fn option(&self, id: &WindowId, key: &str) -> Result<Option<Value>, WmError> {
        Ok(self.registry.get(id)?.settings.get(key))
    }

    pub fn options(&self, id: &WindowId) -> Result<Value, WmError> {
        Ok(self.registry.get(id)?.settings.to_json())
    }

    /// Runs the action behind a button of the action pane. Buttons without
    /// a callback are reported to the host.
    pub fn click_button(&mut self, id: &WindowId, label: &str) -> Result<bool, WmError> {
        let window = self.registry.get_mut(id)?;
        let Some(action) = window.settings.buttons.iter_mut().find(|b| b.label == label) else {
            return Ok(false);
        };
        if !action.trigger(id) {
            self.host.notify(Notification {
                window: id.clone(),
                kind: NotificationKind::ButtonClicked {
                    label: label.to_string(),
                },
            });
        }
        Ok(true)
    }
}
