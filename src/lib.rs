//! Floating dialog windows for a WebView shell: a registry with shared
//! stacking order, anchored placement, drag, minimize/restore and a
//! drop-in dispatcher for jQuery UI style `dialog(...)` call sites.

pub mod anchor;
pub mod compat;
pub mod config;
pub mod dialogwm;
pub mod host;
pub mod stdio;

pub use dialogwm::{WindowId, WindowManager, WmError};
