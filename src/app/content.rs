//! Usage: Messaging between the shell and the web content.
//!
//! - Shell -> content: fire-and-forget Tauri events, no ack
//! - Content -> shell: `window.ipcRenderer.invoke("show-toast", title, body)`, bridged onto
//!   the `show_toast` command by [`bridge_script`]

use tauri::{Emitter, EventTarget, Runtime};

pub const MAIN_PROCESS_MESSAGE_EVENT: &str = "main-process-message";
pub const KEYBOARD_SHORTCUT_EVENT: &str = "keyboard-shortcut";
pub const RESET_COMMAND: &str = "reset";
pub const SHOW_TOAST_CHANNEL: &str = "show-toast";
const SHOW_TOAST_COMMAND: &str = "show_toast";

// `window.ipcRenderer` as the page expects it, on top of the Tauri IPC internals.
const BRIDGE_TEMPLATE: &str = r#"(() => {
  if (window.ipcRenderer) return;
  const internals = window.__TAURI_INTERNALS__;
  const toastChannel = __SHOW_TOAST_CHANNEL__;
  const toastCommand = __SHOW_TOAST_COMMAND__;
  const events = __CONTENT_EVENTS__;
  const registrations = [];

  const invoke = (channel, ...args) => {
    if (channel !== toastChannel) {
      return Promise.reject(new Error(`unknown channel: ${channel}`));
    }
    const [title, body] = args;
    return internals.invoke(toastCommand, {
      title: String(title ?? ""),
      body: String(body ?? ""),
    });
  };

  window.ipcRenderer = {
    on(channel, listener) {
      if (!events.includes(channel)) {
        console.warn(`ipcRenderer: no such event ${channel}`);
        return window.ipcRenderer;
      }
      const handler = internals.transformCallback((event) => listener(event, event.payload));
      const eventId = internals.invoke("plugin:event|listen", {
        event: channel,
        target: { kind: "Any" },
        handler,
      });
      registrations.push({ channel, listener, eventId });
      return window.ipcRenderer;
    },
    off(channel, listener) {
      const index = registrations.findIndex(
        (r) => r.channel === channel && (listener === undefined || r.listener === listener),
      );
      if (index < 0) return window.ipcRenderer;
      const [registration] = registrations.splice(index, 1);
      registration.eventId.then((eventId) =>
        internals.invoke("plugin:event|unlisten", { event: channel, eventId }),
      );
      return window.ipcRenderer;
    },
    send(channel, ...args) {
      invoke(channel, ...args).catch((err) => console.warn("ipcRenderer.send:", err));
    },
    invoke,
  };
})();"#;

fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

/// Initialization script for the main window. Exposes the `ipcRenderer` surface the remote
/// page is written against.
pub fn bridge_script() -> String {
    let events = serde_json::to_string(&[MAIN_PROCESS_MESSAGE_EVENT, KEYBOARD_SHORTCUT_EVENT])
        .unwrap_or_else(|_| "[]".to_string());
    BRIDGE_TEMPLATE
        .replace("__SHOW_TOAST_CHANNEL__", &js_string(SHOW_TOAST_CHANNEL))
        .replace("__SHOW_TOAST_COMMAND__", &js_string(SHOW_TOAST_COMMAND))
        .replace("__CONTENT_EVENTS__", &events)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentMessage {
    /// Sent once per finished page load; carries a local timestamp.
    MainProcessMessage(String),
    /// Keyboard-originated command for the page (global shortcut or tray menu).
    KeyboardShortcut(&'static str),
}

impl ContentMessage {
    pub fn reset() -> Self {
        Self::KeyboardShortcut(RESET_COMMAND)
    }

    pub fn event_name(&self) -> &'static str {
        match self {
            Self::MainProcessMessage(_) => MAIN_PROCESS_MESSAGE_EVENT,
            Self::KeyboardShortcut(_) => KEYBOARD_SHORTCUT_EVENT,
        }
    }

    pub fn payload(&self) -> &str {
        match self {
            Self::MainProcessMessage(timestamp) => timestamp,
            Self::KeyboardShortcut(command) => command,
        }
    }
}

pub fn post<R: Runtime>(app: &tauri::AppHandle<R>, window_label: &str, message: &ContentMessage) {
    let event = message.event_name();
    if let Err(err) = app.emit_to(
        EventTarget::webview_window(window_label),
        event,
        message.payload(),
    ) {
        tracing::warn!(event, "content message dropped: {}", err);
        return;
    }
    tracing::debug!(event, payload = message.payload(), "content message sent");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_maps_to_keyboard_shortcut_channel() {
        let message = ContentMessage::reset();
        assert_eq!(message.event_name(), "keyboard-shortcut");
        assert_eq!(message.payload(), "reset");
    }

    #[test]
    fn bridge_script_maps_page_channels() {
        let script = bridge_script();
        assert!(script.contains(r#"const toastChannel = "show-toast";"#), "{script}");
        assert!(script.contains(r#"const toastCommand = "show_toast";"#), "{script}");
        assert!(
            script.contains(r#"const events = ["main-process-message","keyboard-shortcut"];"#),
            "{script}"
        );
        assert!(script.contains("window.ipcRenderer = {"));
        assert!(!script.contains("__SHOW_TOAST_"));
        assert!(!script.contains("__CONTENT_EVENTS__"));
    }

    #[test]
    fn bridge_script_passes_named_toast_arguments() {
        let script = bridge_script();
        assert!(script.contains("title: String(title ?? \"\"),"));
        assert!(script.contains("body: String(body ?? \"\"),"));
        assert!(script.contains("\"plugin:event|listen\""));
    }

    #[test]
    fn main_process_message_carries_timestamp() {
        let message = ContentMessage::MainProcessMessage("2024. 3. 7. PM 2:05:09".to_string());
        assert_eq!(message.event_name(), "main-process-message");
        assert_eq!(message.payload(), "2024. 3. 7. PM 2:05:09");
    }
}
