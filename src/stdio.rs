// JSON-lines bridge between a WebView shell and the window manager.
// The shell writes host events on our stdin, we answer with render
// commands on stdout. One object per line in both directions.

use std::collections::{HashMap, HashSet};
use std::io::{BufRead, Write};

use log::{debug, error, info, trace, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::compat::{self, LegacyCall, Returned};
use crate::dialogwm::{Position, Size, Viewport, WindowId, WindowManager};
use crate::host::{Host, HostError, Notification, View};

#[derive(Debug, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    /// An element the shell can hand over as dialog content.
    Register { id: String },
    Dialog {
        selection: Vec<WindowId>,
        #[serde(default)]
        method: Option<String>,
        #[serde(default)]
        options: Option<Map<String, Value>>,
        #[serde(default)]
        args: Vec<Value>,
    },
    PointerDown { id: WindowId, x: i32, y: i32 },
    PointerMove { x: i32, y: i32 },
    PointerUp,
    PointerCancel,
    Key { key: String },
    Resize { width: i32, height: i32 },
    Measure { id: WindowId, width: i32, height: i32 },
    Touch { primary: bool },
    Minimize { id: WindowId },
    Close { id: WindowId },
    Button { id: WindowId, label: String },
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Output<'a> {
    Attach { view: &'a View },
    Update { view: &'a View },
    Detach { id: &'a WindowId },
    Release { id: &'a WindowId, element: &'a str },
    Notify { notification: &'a Notification },
    Reply { value: &'a Value },
}

pub struct StdioHost<W: Write> {
    out: W,
    elements: HashSet<String>,
    natural: HashMap<WindowId, Size>,
    viewport: Viewport,
    touch: bool,
}

impl<W: Write> StdioHost<W> {
    pub fn new(out: W, viewport: Viewport) -> Self {
        StdioHost {
            out,
            elements: HashSet::new(),
            natural: HashMap::new(),
            viewport,
            touch: false,
        }
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn send(&mut self, output: &Output) -> Result<(), HostError> {
        let line = serde_json::to_string(output)?;
        writeln!(self.out, "{}", line)?;
        self.out.flush()?;
        Ok(())
    }

    // for outputs the manager can't be told about
    fn send_or_log(&mut self, output: &Output) {
        if let Err(e) = self.send(output) {
            error!("unable to write to the shell: {}", e);
        }
    }

    pub fn reply(&mut self, value: &Value) {
        self.send_or_log(&Output::Reply { value });
    }
}

impl<W: Write> Host for StdioHost<W> {
    type Content = String;

    fn resolve(&mut self, selector: &str) -> Option<String> {
        let element = selector.trim_start_matches('#');
        self.elements.take(element)
    }

    fn release(&mut self, id: &WindowId, content: String) {
        self.send_or_log(&Output::Release {
            id,
            element: &content,
        });
        self.elements.insert(content);
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn is_touch_primary(&self) -> bool {
        self.touch
    }

    fn natural_size(&self, id: &WindowId) -> Option<Size> {
        self.natural.get(id).copied()
    }

    fn attach(&mut self, view: &View) -> Result<(), HostError> {
        self.send(&Output::Attach { view })
    }

    fn update(&mut self, view: &View) {
        self.send_or_log(&Output::Update { view });
    }

    fn detach(&mut self, id: &WindowId) -> Result<(), HostError> {
        self.send(&Output::Detach { id })
    }

    fn notify(&mut self, notification: Notification) {
        self.send_or_log(&Output::Notify {
            notification: &notification,
        });
    }
}

/// Reads host events until the shell closes our stdin.
pub fn run<R: BufRead, W: Write>(input: R, wm: &mut WindowManager<StdioHost<W>>) -> Result<(), HostError> {
    info!("waiting for host events");
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<HostEvent>(&line) {
            Ok(event) => handle_event(wm, event),
            Err(e) => warn!("skipping malformed event {:?}: {}", line, e),
        }
    }
    info!("host closed the event stream");
    Ok(())
}

pub fn handle_event<W: Write>(wm: &mut WindowManager<StdioHost<W>>, event: HostEvent) {
    match event {
        HostEvent::Register { id } => {
            debug!("element {} registered", id);
            wm.host_mut().elements.insert(id.trim_start_matches('#').to_string());
        }
        HostEvent::Dialog {
            selection,
            method,
            options,
            args,
        } => {
            let call = match (method, options) {
                (Some(verb), _) => LegacyCall::Method { verb, args },
                (None, Some(options)) => LegacyCall::Init(options),
                (None, None) => LegacyCall::Init(Map::new()),
            };
            let value = match compat::dialog(wm, &selection, &call) {
                Returned::Selection => Value::Null,
                Returned::Value(value) => value,
            };
            wm.host_mut().reply(&value);
        }
        HostEvent::PointerDown { id, x, y } => {
            if let Err(e) = wm.begin_drag(&id, Position { x, y }) {
                debug!("pointer down ignored: {}", e);
            }
        }
        HostEvent::PointerMove { x, y } => {
            trace!("pointer at {},{}", x, y);
            wm.drag_move(Position { x, y });
        }
        HostEvent::PointerUp | HostEvent::PointerCancel => wm.end_drag(),
        HostEvent::Key { key } => {
            if key == "Escape" {
                wm.handle_escape();
            }
        }
        HostEvent::Resize { width, height } => {
            wm.host_mut().set_viewport(Viewport::new(width, height));
            wm.viewport_changed();
        }
        HostEvent::Measure { id, width, height } => {
            wm.host_mut().natural.insert(id, Size { width, height });
        }
        HostEvent::Touch { primary } => wm.host_mut().touch = primary,
        HostEvent::Minimize { id } => {
            if let Err(e) = wm.toggle_minimize(&id) {
                warn!("{}", e);
            }
        }
        HostEvent::Close { id } => {
            if let Err(e) = wm.dismiss(&id) {
                warn!("{}", e);
            }
        }
        HostEvent::Button { id, label } => {
            if let Err(e) = wm.click_button(&id, &label) {
                warn!("{}", e);
            }
        }
    }
}
