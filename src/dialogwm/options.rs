use std::collections::BTreeMap;
use std::fmt;

use serde_json::{json, Map, Value};
use thiserror::Error;

use super::WindowId;
use crate::anchor::{parse_position, Anchor, PositionError};

#[derive(Error, Debug)]
pub enum OptionError {
    #[error("option {key} expects {expected}")]
    InvalidValue { key: String, expected: &'static str },
    #[error("option position: {0}")]
    Position(#[from] PositionError),
}

/// A length measured either in pixels or as a share of a viewport axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    Px(i32),
    Percent(f64),
}

impl Length {
    pub fn resolve(&self, extent: i32) -> i32 {
        match self {
            Length::Px(px) => *px,
            Length::Percent(pct) => (extent as f64 * pct / 100.0).round() as i32,
        }
    }

    pub fn from_json(value: &Value) -> Option<Length> {
        match value {
            Value::Number(n) => n.as_f64().map(|px| Length::Px(px.round() as i32)),
            Value::String(s) => {
                let s = s.trim();
                for unit in ["%", "vw", "vh"] {
                    if let Some(number) = s.strip_suffix(unit) {
                        return number.trim().parse().ok().map(Length::Percent);
                    }
                }
                let number = s.strip_suffix("px").unwrap_or(s);
                number.trim().parse::<f64>().ok().map(|px| Length::Px(px.round() as i32))
            }
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Length::Px(px) => json!(px),
            Length::Percent(pct) => json!(format!("{}%", pct)),
        }
    }
}

/// Width or height of a window. `Auto` follows the content's natural size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Dimension {
    #[default]
    Auto,
    Px(i32),
    Percent(f64),
}

impl Dimension {
    pub fn length(&self) -> Option<Length> {
        match self {
            Dimension::Auto => None,
            Dimension::Px(px) => Some(Length::Px(*px)),
            Dimension::Percent(pct) => Some(Length::Percent(*pct)),
        }
    }

    pub fn from_json(value: &Value) -> Option<Dimension> {
        if value.as_str().map(str::trim) == Some("auto") {
            return Some(Dimension::Auto);
        }
        Length::from_json(value).map(|length| match length {
            Length::Px(px) => Dimension::Px(px),
            Length::Percent(pct) => Dimension::Percent(pct),
        })
    }

    pub fn to_json(&self) -> Value {
        match self.length() {
            Some(length) => length.to_json(),
            None => json!("auto"),
        }
    }
}

pub type ActionCallback = Box<dyn FnMut(&WindowId)>;

/// What a close callback wants done with the close request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseDecision {
    Proceed,
    Veto,
}

pub type CloseCallback = Box<dyn FnMut(&WindowId) -> CloseDecision>;

/// One button of the action pane. Without a callback, a click is reported
/// to the host instead.
pub struct Action {
    pub label: String,
    callback: Option<ActionCallback>,
}

impl Action {
    pub fn new(label: impl Into<String>, callback: impl FnMut(&WindowId) + 'static) -> Self {
        Action {
            label: label.into(),
            callback: Some(Box::new(callback)),
        }
    }

    pub fn label_only(label: impl Into<String>) -> Self {
        Action {
            label: label.into(),
            callback: None,
        }
    }

    /// Runs the callback, returns false when there was none.
    pub fn trigger(&mut self, id: &WindowId) -> bool {
        match self.callback.as_mut() {
            Some(callback) => {
                callback(id);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("label", &self.label)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

/// Options given to `open`. Fields left as `None` get a default that may
/// depend on the viewport the window opens in.
#[derive(Default)]
pub struct DialogOptions {
    pub title: Option<String>,
    pub width: Dimension,
    pub height: Dimension,
    pub min_width: Option<Length>,
    pub min_height: Option<Length>,
    pub draggable: Option<bool>,
    pub modal: bool,
    pub anchor: Option<Anchor>,
    pub buttons: Vec<Action>,
    pub auto_open: Option<bool>,
    pub on_close: Option<CloseCallback>,
    pub extra: BTreeMap<String, Value>,
}

impl DialogOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn size(mut self, width: Dimension, height: Dimension) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = Some(anchor);
        self
    }

    pub fn draggable(mut self, draggable: bool) -> Self {
        self.draggable = Some(draggable);
        self
    }

    pub fn modal(mut self, modal: bool) -> Self {
        self.modal = modal;
        self
    }

    pub fn auto_open(mut self, auto_open: bool) -> Self {
        self.auto_open = Some(auto_open);
        self
    }

    pub fn button(mut self, action: Action) -> Self {
        self.buttons.push(action);
        self
    }

    pub fn on_close(mut self, callback: impl FnMut(&WindowId) -> CloseDecision + 'static) -> Self {
        self.on_close = Some(Box::new(callback));
        self
    }

    /// Builds options from a legacy options object.
    pub fn from_json(map: &Map<String, Value>) -> Result<DialogOptions, OptionError> {
        let mut options = DialogOptions::new();
        for (key, value) in map {
            options.apply(DialogOption::from_json(key, value)?);
        }
        Ok(options)
    }

    fn apply(&mut self, option: DialogOption) {
        match option {
            DialogOption::Title(title) => self.title = Some(title),
            DialogOption::Width(width) => self.width = width,
            DialogOption::Height(height) => self.height = height,
            DialogOption::MinWidth(min) => self.min_width = Some(min),
            DialogOption::MinHeight(min) => self.min_height = Some(min),
            DialogOption::Position(anchor) => self.anchor = Some(anchor),
            DialogOption::Buttons(buttons) => self.buttons = buttons,
            DialogOption::Draggable(draggable) => self.draggable = Some(draggable),
            DialogOption::Modal(modal) => self.modal = modal,
            DialogOption::AutoOpen(auto_open) => self.auto_open = Some(auto_open),
            DialogOption::Other(key, value) => {
                self.extra.insert(key, value);
            }
        }
    }
}

/// Recognized option keys, each with its typed value. Anything else lands
/// in `Other` and is kept without visual effect.
#[derive(Debug)]
pub enum DialogOption {
    Title(String),
    Width(Dimension),
    Height(Dimension),
    MinWidth(Length),
    MinHeight(Length),
    Position(Anchor),
    Buttons(Vec<Action>),
    Draggable(bool),
    Modal(bool),
    AutoOpen(bool),
    Other(String, Value),
}

impl DialogOption {
    pub fn from_json(key: &str, value: &Value) -> Result<DialogOption, OptionError> {
        let invalid = |expected| OptionError::InvalidValue {
            key: key.to_string(),
            expected,
        };
        let option = match key {
            "title" => DialogOption::Title(match value {
                Value::String(s) => s.clone(),
                Value::Null => String::new(),
                other => other.to_string(),
            }),
            "width" => DialogOption::Width(Dimension::from_json(value).ok_or_else(|| invalid("a size"))?),
            "height" => DialogOption::Height(Dimension::from_json(value).ok_or_else(|| invalid("a size"))?),
            "minWidth" => DialogOption::MinWidth(Length::from_json(value).ok_or_else(|| invalid("a length"))?),
            "minHeight" => DialogOption::MinHeight(Length::from_json(value).ok_or_else(|| invalid("a length"))?),
            "position" => DialogOption::Position(parse_position(value)?),
            "buttons" => DialogOption::Buttons(buttons_from_json(value).ok_or_else(|| invalid("an object or array of buttons"))?),
            "draggable" => DialogOption::Draggable(value.as_bool().ok_or_else(|| invalid("a boolean"))?),
            "modal" => DialogOption::Modal(value.as_bool().ok_or_else(|| invalid("a boolean"))?),
            "autoOpen" => DialogOption::AutoOpen(value.as_bool().ok_or_else(|| invalid("a boolean"))?),
            other => DialogOption::Other(other.to_string(), value.clone()),
        };
        Ok(option)
    }
}

// `{"Ok": ..., "Cancel": ...}` or `[{"text": "Ok"}, "Cancel"]`
fn buttons_from_json(value: &Value) -> Option<Vec<Action>> {
    match value {
        Value::Null => Some(Vec::new()),
        Value::Object(map) => Some(map.keys().map(Action::label_only).collect()),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(label) => Some(Action::label_only(label.as_str())),
                Value::Object(button) => button
                    .get("text")
                    .and_then(Value::as_str)
                    .map(Action::label_only),
                _ => None,
            })
            .collect(),
        _ => None,
    }
}

/// Resolved options of a live window.
#[derive(Debug)]
pub struct Settings {
    pub title: String,
    pub width: Dimension,
    pub height: Dimension,
    pub min_width: Length,
    pub min_height: Length,
    pub draggable: bool,
    pub modal: bool,
    pub anchor: Anchor,
    pub buttons: Vec<Action>,
    pub auto_open: bool,
    pub extra: BTreeMap<String, Value>,
}

impl Settings {
    pub fn get(&self, key: &str) -> Option<Value> {
        let value = match key {
            "title" => json!(self.title),
            "width" => self.width.to_json(),
            "height" => self.height.to_json(),
            "minWidth" => self.min_width.to_json(),
            "minHeight" => self.min_height.to_json(),
            "position" => self.anchor.to_json(),
            "buttons" => Value::Array(self.buttons.iter().map(|b| json!(b.label)).collect()),
            "draggable" => json!(self.draggable),
            "modal" => json!(self.modal),
            "autoOpen" => json!(self.auto_open),
            other => return self.extra.get(other).cloned(),
        };
        Some(value)
    }

    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        for key in [
            "title",
            "width",
            "height",
            "minWidth",
            "minHeight",
            "position",
            "buttons",
            "draggable",
            "modal",
            "autoOpen",
        ] {
            if let Some(value) = self.get(key) {
                map.insert(key.to_string(), value);
            }
        }
        for (key, value) in &self.extra {
            map.insert(key.clone(), value.clone());
        }
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lengths_accept_numbers_and_units() {
        assert_eq!(Length::from_json(&json!(150)), Some(Length::Px(150)));
        assert_eq!(Length::from_json(&json!("150px")), Some(Length::Px(150)));
        assert_eq!(Length::from_json(&json!("40%")), Some(Length::Percent(40.0)));
        assert_eq!(Length::from_json(&json!("90vh")), Some(Length::Percent(90.0)));
        assert_eq!(Length::from_json(&json!(true)), None);
        assert_eq!(Dimension::from_json(&json!("auto")), Some(Dimension::Auto));
        assert_eq!(Length::Percent(50.0).resolve(1000), 500);
    }

    #[test]
    fn unknown_keys_pass_through() {
        let option = DialogOption::from_json("resizable", &json!(false)).unwrap();
        assert!(matches!(option, DialogOption::Other(ref k, Value::Bool(false)) if k == "resizable"));
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(DialogOption::from_json("draggable", &json!("yes")).is_err());
        assert!(DialogOption::from_json("width", &json!([1])).is_err());
        assert!(matches!(
            DialogOption::from_json("position", &json!("nowhere")),
            Err(OptionError::Position(_))
        ));
    }

    #[test]
    fn buttons_keep_declaration_order() {
        let options = DialogOptions::from_json(
            json!({"title": "Regenerate", "buttons": {"Zebra": null, "Apply": null}, "resizable": false})
                .as_object()
                .unwrap(),
        )
        .unwrap();
        let labels: Vec<_> = options.buttons.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, ["Zebra", "Apply"]);
        assert_eq!(options.title.as_deref(), Some("Regenerate"));
        assert_eq!(options.extra.get("resizable"), Some(&json!(false)));
    }
}
