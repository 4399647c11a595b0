//! String-verb entry point for legacy call sites written against the
//! jQuery UI `dialog` plugin: `$(sel).dialog(options)`,
//! `$(sel).dialog("option", "title", "Burgs")` and so on.
//!
//! Nothing here throws. Unknown windows and unknown verbs are logged and the
//! selection is handed back so call chains keep working.

use log::{error, warn};
use serde_json::{Map, Value};

use crate::dialogwm::{Command, DialogOption, DialogOptions, Reply, WindowId, WindowManager, WmError};
use crate::host::Host;

#[derive(Debug, Clone, PartialEq)]
pub enum LegacyCall {
    Method { verb: String, args: Vec<Value> },
    /// `dialog({...})`: create, or update and open.
    Init(Map<String, Value>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Returned {
    /// The selection itself, for chaining.
    Selection,
    Value(Value),
}

pub fn parse_call(verb: &str, args: &[Value]) -> Result<Command, WmError> {
    let command = match verb {
        "open" => Command::Open,
        "close" => Command::Close,
        "destroy" => Command::Destroy,
        "isOpen" => Command::IsOpen,
        "widget" => Command::Widget,
        "moveToTop" => Command::MoveToTop,
        "minimize" | "toggleMinimize" => Command::ToggleMinimize,
        "option" => match args {
            [] => Command::Options,
            [Value::String(key)] => Command::GetOption(key.clone()),
            [Value::String(key), value, ..] => Command::SetOption(DialogOption::from_json(key, value)?),
            [Value::Object(map), ..] => Command::SetOptions(
                map.iter()
                    .map(|(key, value)| DialogOption::from_json(key, value))
                    .collect::<Result<_, _>>()?,
            ),
            _ => return Err(WmError::UnsupportedOperation(String::from("option"))),
        },
        other => return Err(WmError::UnsupportedOperation(other.to_string())),
    };
    Ok(command)
}

/// Single-window form of [`dialog`].
pub fn dispatch<H: Host>(wm: &mut WindowManager<H>, id: &WindowId, verb: &str, args: &[Value]) -> Returned {
    dialog(
        wm,
        std::slice::from_ref(id),
        &LegacyCall::Method {
            verb: verb.to_string(),
            args: args.to_vec(),
        },
    )
}

/// Applies a legacy call to every window of `selection`. Getters answer for
/// the first window that has a dialog; setters apply to all of them.
pub fn dialog<H: Host>(wm: &mut WindowManager<H>, selection: &[WindowId], call: &LegacyCall) -> Returned {
    match call {
        LegacyCall::Method { verb, args } => {
            for id in selection {
                if !wm.contains(id) {
                    warn!("dialog method {:?} on uninitialized element {}", verb, id);
                    continue;
                }
                // parsed per window: options own their button actions
                let command = match parse_call(verb, args) {
                    Ok(command) => command,
                    Err(e) => {
                        warn!("{}", e);
                        return Returned::Selection;
                    }
                };
                let getter = command.is_getter();
                match wm.execute(id, command) {
                    Ok(Reply::Value(value)) if getter => return Returned::Value(value),
                    Ok(_) => {}
                    Err(e) => log_swallowed(&e),
                }
            }
            Returned::Selection
        }
        LegacyCall::Init(options) => {
            for id in selection {
                if let Err(e) = init(wm, id, options) {
                    log_swallowed(&e);
                }
            }
            Returned::Selection
        }
    }
}

fn init<H: Host>(wm: &mut WindowManager<H>, id: &WindowId, options: &Map<String, Value>) -> Result<(), WmError> {
    if !wm.contains(id) {
        wm.open(id.as_str(), DialogOptions::from_json(options)?)?;
        return Ok(());
    }
    for (key, value) in options {
        wm.set_option(id, DialogOption::from_json(key, value)?)?;
    }
    let auto_open = options.get("autoOpen").and_then(Value::as_bool) != Some(false);
    if auto_open && !wm.is_open(id)? {
        wm.show(id)?;
    }
    Ok(())
}

fn log_swallowed(e: &WmError) {
    match e {
        WmError::AttachmentFailed { .. } => error!("{}", e),
        _ => warn!("{}", e),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::config::Config;
    use crate::host::testing::RecordingHost;

    fn manager(elements: &[&str]) -> WindowManager<RecordingHost> {
        WindowManager::new(
            RecordingHost::new(1000, 800).with_elements(elements),
            Config::default(),
        )
    }

    fn init_call(options: Value) -> LegacyCall {
        LegacyCall::Init(options.as_object().cloned().unwrap())
    }

    fn method(verb: &str, args: Vec<Value>) -> LegacyCall {
        LegacyCall::Method {
            verb: verb.to_string(),
            args,
        }
    }

    fn ids(names: &[&str]) -> Vec<WindowId> {
        names.iter().map(|n| WindowId::from(*n)).collect()
    }

    #[test]
    fn unknown_verb_returns_selection() {
        let mut wm = manager(&["a"]);
        let a = WindowId::from("a");
        dialog(&mut wm, &[a.clone()], &init_call(json!({"title": "Options"})));
        assert_eq!(dispatch(&mut wm, &a, "frobnicate", &[]), Returned::Selection);
        assert!(wm.is_open(&a).unwrap());
    }

    #[test]
    fn init_creates_then_updates() {
        let mut wm = manager(&["a"]);
        let sel = ids(&["a"]);
        dialog(
            &mut wm,
            &sel,
            &init_call(json!({"title": "Units", "width": 300, "autoOpen": false})),
        );
        assert!(!wm.is_open(&sel[0]).unwrap());

        dialog(&mut wm, &sel, &init_call(json!({"title": "Units editor"})));
        assert!(wm.is_open(&sel[0]).unwrap());
        assert_eq!(
            dialog(&mut wm, &sel, &method("option", vec![json!("title")])),
            Returned::Value(json!("Units editor"))
        );
    }

    #[test]
    fn getters_answer_for_first_match_setters_for_all() {
        let mut wm = manager(&["a", "b"]);
        let sel = ids(&["ghost", "a", "b"]);
        dialog(&mut wm, &sel, &init_call(json!({"autoOpen": false})));
        dispatch(&mut wm, &sel[1], "open", &[]);

        assert_eq!(
            dialog(&mut wm, &sel, &method("isOpen", vec![])),
            Returned::Value(json!(true))
        );

        assert_eq!(
            dialog(&mut wm, &sel, &method("option", vec![json!("title"), json!("Both")])),
            Returned::Selection
        );
        assert_eq!(wm.option(&sel[1], "title").unwrap(), Some(json!("Both")));
        assert_eq!(wm.option(&sel[2], "title").unwrap(), Some(json!("Both")));
    }

    #[test]
    fn option_forms() {
        let mut wm = manager(&["a"]);
        let a = WindowId::from("a");
        dialog(&mut wm, &[a.clone()], &init_call(json!({"width": 320})));

        dispatch(&mut wm, &a, "option", &[json!({"height": 240, "position": {"my": "right top", "at": "right-10 top+10"}})]);
        let view = wm.view(&a).unwrap();
        assert_eq!(view.frame.height, 240);
        assert_eq!((view.frame.left, view.frame.top), (670, 10));

        let Returned::Value(all) = dispatch(&mut wm, &a, "option", &[]) else {
            panic!("option getter");
        };
        assert_eq!(all["width"], json!(320));
        assert_eq!(all["position"]["at"], json!("right-10 top+10"));

        // bad value: logged, nothing changes
        assert_eq!(
            dispatch(&mut wm, &a, "option", &[json!("draggable"), json!("sure")]),
            Returned::Selection
        );
        assert_eq!(wm.option(&a, "draggable").unwrap(), Some(json!(true)));
    }

    #[test]
    fn close_and_destroy_release_content() {
        let mut wm = manager(&["a", "b"]);
        let sel = ids(&["a", "b"]);
        dialog(&mut wm, &sel, &init_call(json!({})));
        dispatch(&mut wm, &sel[0], "close", &[]);
        dispatch(&mut wm, &sel[1], "destroy", &[]);
        assert!(wm.stacking().is_empty());
        assert_eq!(wm.host().released.len(), 2);
        // a second close is a logged no-op
        assert_eq!(dispatch(&mut wm, &sel[0], "close", &[]), Returned::Selection);
    }

    #[test]
    fn move_to_top_via_verbs() {
        let mut wm = manager(&["a", "b"]);
        let sel = ids(&["a", "b"]);
        dialog(&mut wm, &sel, &init_call(json!({})));
        dispatch(&mut wm, &sel[0], "moveToTop", &[]);
        assert_eq!(wm.stacking(), ids(&["b", "a"]));
    }

    #[test]
    fn parse_rejects_unknown_verbs() {
        assert!(matches!(
            parse_call("frobnicate", &[]),
            Err(WmError::UnsupportedOperation(ref v)) if v == "frobnicate"
        ));
        assert!(matches!(parse_call("option", &[json!(3)]), Err(WmError::UnsupportedOperation(_))));
    }
}
