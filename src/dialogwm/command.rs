use log::info;
use serde_json::Value;

use super::{DialogOption, WindowId, WindowManager, WmError};
use crate::host::Host;

/// Every operation reachable through the compatibility layer.
#[derive(Debug)]
pub enum Command {
    Open,
    /// Destroys an open window, as the legacy `close` verb does.
    Close,
    Destroy,
    IsOpen,
    Widget,
    MoveToTop,
    ToggleMinimize,
    Options,
    GetOption(String),
    SetOption(DialogOption),
    SetOptions(Vec<DialogOption>),
}

impl Command {
    /// Getters answer with a value instead of the selection.
    pub fn is_getter(&self) -> bool {
        matches!(
            self,
            Command::IsOpen | Command::Widget | Command::Options | Command::GetOption(_)
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Nothing to report; the caller keeps chaining on its handle.
    Chain,
    Value(Value),
}

impl<H: Host> WindowManager<H> {
    pub fn execute(&mut self, id: &WindowId, command: Command) -> Result<Reply, WmError> {
        match command {
            Command::Open => {
                self.show(id)?;
            }
            Command::Close => {
                if self.is_open(id)? {
                    self.dismiss(id)?;
                }
            }
            Command::Destroy => {
                self.dismiss(id)?;
            }
            Command::IsOpen => return Ok(Reply::Value(Value::Bool(self.is_open(id)?))),
            Command::Widget => {
                let view = self.view(id)?;
                return Ok(Reply::Value(
                    serde_json::to_value(view).unwrap_or(Value::Null),
                ));
            }
            Command::MoveToTop => {
                self.move_to_top(id)?;
            }
            Command::ToggleMinimize => {
                self.toggle_minimize(id)?;
            }
            Command::Options => return Ok(Reply::Value(self.options(id)?)),
            Command::GetOption(key) => {
                return Ok(Reply::Value(self.option(id, &key)?.unwrap_or(Value::Null)))
            }
            Command::SetOption(option) => self.set_option(id, option)?,
            Command::SetOptions(options) => {
                info!("updating {} options on {}", options.len(), id);
                for option in options {
                    self.set_option(id, option)?;
                }
            }
        }
        Ok(Reply::Chain)
    }
}
