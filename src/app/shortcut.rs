//! Usage: System-wide keyboard shortcut that sends "reset" to the web content.
//!
//! Conflicts with other applications are left to the OS: a failed registration is logged
//! and the shell keeps running without the shortcut.

use super::lifecycle::ShellEvent;
use super::resident;
use tauri_plugin_global_shortcut::{GlobalShortcutExt, Shortcut, ShortcutState};

pub(crate) fn parse_accelerator(accelerator: &str) -> Result<Shortcut, String> {
    accelerator
        .trim()
        .parse::<Shortcut>()
        .map_err(|e| format!("SHORTCUT_PARSE: accelerator={accelerator}: {e}"))
}

pub fn register(app: &tauri::AppHandle, accelerator: &str) {
    let shortcut = match parse_accelerator(accelerator) {
        Ok(shortcut) => shortcut,
        Err(err) => {
            tracing::warn!("global shortcut not registered: {}", err);
            return;
        }
    };

    let result = app
        .global_shortcut()
        .on_shortcut(shortcut, |app, _shortcut, event| {
            if event.state != ShortcutState::Pressed {
                return;
            }
            tracing::debug!("global shortcut pressed, forwarding reset");
            resident::dispatch(app, ShellEvent::ResetRequested);
        });

    match result {
        Ok(()) => tracing::info!(accelerator, "global shortcut registered"),
        Err(err) => tracing::warn!(accelerator, "global shortcut registration failed: {}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tauri_plugin_global_shortcut::{Code, Modifiers};

    #[test]
    fn default_accelerator_parses_to_space() {
        let shortcut = parse_accelerator(crate::settings::DEFAULT_GLOBAL_SHORTCUT).expect("parse");
        assert_eq!(shortcut.key, Code::Space);
        #[cfg(target_os = "macos")]
        assert!(shortcut.matches(Modifiers::SUPER, Code::Space));
        #[cfg(not(target_os = "macos"))]
        assert!(shortcut.matches(Modifiers::CONTROL, Code::Space));
    }

    #[test]
    fn accelerator_is_trimmed() {
        assert!(parse_accelerator("  CommandOrControl+Shift+R ").is_ok());
    }

    #[test]
    fn garbage_accelerator_is_rejected() {
        let err = parse_accelerator("NotAKey+Whatever").unwrap_err();
        assert!(err.starts_with("SHORTCUT_PARSE:"), "{err}");
    }
}
