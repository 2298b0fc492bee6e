//! Usage: Application layer (Tauri-managed state, window/tray lifecycle, startup wiring).

pub(crate) mod app_state;
pub(crate) mod content;
pub(crate) mod instance;
pub(crate) mod lifecycle;
pub(crate) mod logging;
pub(crate) mod resident;
#[cfg(desktop)]
pub(crate) mod shortcut;
pub(crate) mod toast;
