use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::host::HostError;

mod command;
mod drag;
mod manager;
mod options;
mod registry;
mod viewport;
mod window;

pub use command::*;
pub use drag::*;
pub use manager::*;
pub use options::*;
pub use registry::*;
pub use viewport::*;
pub use window::*;

#[derive(Error, Debug)]
pub enum WmError {
    #[error("window {0} not found")]
    NotFound(WindowId),
    #[error("unsupported operation {0:?}")]
    UnsupportedOperation(String),
    #[error("unable to attach or detach window {id}: {source}")]
    AttachmentFailed {
        id: WindowId,
        #[source]
        source: HostError,
    },
    #[error("window {0} is already registered")]
    AlreadyRegistered(WindowId),
    #[error("{0}")]
    InvalidOption(#[from] OptionError),
}

/// Handle of a registered window. Listeners and callbacks hold this id and
/// look the window up through the manager.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct WindowId(String);

impl WindowId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WindowId {
    fn from(value: &str) -> Self {
        Self(value.trim_start_matches('#').to_string())
    }
}

impl From<String> for WindowId {
    fn from(value: String) -> Self {
        WindowId::from(value.as_str())
    }
}

impl From<WindowId> for String {
    fn from(value: WindowId) -> Self {
        value.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
