//! Usage: Single-instance guard (process-wide lock + activation forwarding).
//!
//! A second launch exits inside the plugin before any window, tray or shortcut exists. The
//! running instance receives the argv/cwd of that launch and refocuses its window.

use super::lifecycle::ShellEvent;
use super::resident;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationRequest {
    pub argv: Vec<String>,
    pub cwd: String,
}

pub fn on_second_instance(app: &tauri::AppHandle, request: ActivationRequest) {
    tracing::info!(
        argv = ?request.argv,
        cwd = %request.cwd,
        "second instance detected, focusing existing window"
    );
    resident::dispatch(app, ShellEvent::SecondInstance);
}

/// Must be the first plugin registered so a losing process initialises nothing else.
#[cfg(desktop)]
pub fn plugin() -> tauri::plugin::TauriPlugin<tauri::Wry> {
    tauri_plugin_single_instance::init(|app, argv, cwd| {
        on_second_instance(app, ActivationRequest { argv, cwd });
    })
}
