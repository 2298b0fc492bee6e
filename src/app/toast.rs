//! Usage: Transient OS notifications requested by the web content.
//!
//! - Frontend: `ipcRenderer.invoke("show-toast", title, body)` (see `content::bridge_script`),
//!   always resolves to `true`
//! - Rust: `toast::request(app, toast)` shows the notification in the background and
//!   dismisses it after three seconds
//!
//! On freedesktop systems the popup is closed through the handle the daemon returns. Windows
//! and macOS give no handle back, so there the OS expires the banner.
//!
//! The acknowledgement never reflects whether the OS actually displayed anything.

use crate::shared::mutex_ext::MutexExt;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const TOAST_DISMISS_DELAY: Duration = Duration::from_millis(3000);
#[cfg(xdg_notifications)]
const TOAST_APP_NAME: &str = "HolySymbol";

static NEXT_TOAST_ID: AtomicI32 = AtomicI32::new(1);

pub type ToastId = i32;

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct ToastRequest {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastOutcome {
    Unsupported,
    Failed,
    Dismissed(ToastId),
}

pub trait NotificationSink: Send + Sync + 'static {
    fn is_supported(&self) -> bool;
    fn show(&self, id: ToastId, toast: &ToastRequest) -> Result<(), String>;
    fn dismiss(&self, id: ToastId);
}

fn next_toast_id() -> ToastId {
    NEXT_TOAST_ID.fetch_add(1, Ordering::Relaxed)
}

/// Shows `toast` and dismisses it once [`TOAST_DISMISS_DELAY`] has elapsed. The timer is not
/// cancellable.
pub async fn present<S: NotificationSink>(sink: Arc<S>, toast: ToastRequest) -> ToastOutcome {
    if !sink.is_supported() {
        tracing::debug!("notifications unsupported, toast dropped");
        return ToastOutcome::Unsupported;
    }

    let id = next_toast_id();
    if let Err(err) = sink.show(id, &toast) {
        tracing::warn!(toast_id = id, "toast show failed: {}", err);
        return ToastOutcome::Failed;
    }
    tracing::debug!(toast_id = id, title = %toast.title, "toast shown");

    tokio::time::sleep(TOAST_DISMISS_DELAY).await;
    sink.dismiss(id);
    ToastOutcome::Dismissed(id)
}

/// A host notification that can be closed after it was shown.
#[cfg_attr(not(xdg_notifications), allow(dead_code))]
pub trait CloseHandle: Send + 'static {
    fn close(self);
}

/// Shown notifications that have not been dismissed yet, keyed by toast id.
#[cfg_attr(not(xdg_notifications), allow(dead_code))]
pub struct OpenToasts<H> {
    handles: Mutex<HashMap<ToastId, H>>,
}

#[cfg_attr(not(xdg_notifications), allow(dead_code))]
impl<H> Default for OpenToasts<H> {
    fn default() -> Self {
        Self {
            handles: Mutex::new(HashMap::new()),
        }
    }
}

#[cfg_attr(not(xdg_notifications), allow(dead_code))]
impl<H: CloseHandle> OpenToasts<H> {
    pub fn insert(&self, id: ToastId, handle: H) {
        self.handles.lock_or_recover().insert(id, handle);
    }

    /// Closes the notification for `id`. Returns `false` when it was never shown or is
    /// already closed.
    pub fn close(&self, id: ToastId) -> bool {
        // Released before `close`, which may block on the notification daemon.
        let handle = self.handles.lock_or_recover().remove(&id);
        match handle {
            Some(handle) => {
                handle.close();
                true
            }
            None => false,
        }
    }

    #[cfg(test)]
    fn open_count(&self) -> usize {
        self.handles.lock_or_recover().len()
    }
}

#[cfg(not(desktop))]
pub fn request<R: tauri::Runtime>(_app: &tauri::AppHandle<R>, _toast: ToastRequest) {}

#[cfg(desktop)]
pub use desktop::request;

#[cfg(desktop)]
mod desktop {
    use super::{present, NotificationSink, ToastId, ToastRequest};
    use crate::app_paths;
    use std::sync::Arc;
    use tauri::{AppHandle, Manager, Runtime};
    use tauri_plugin_notification::{Notification, PermissionState};

    pub struct TauriNotificationSink<R: Runtime> {
        app: AppHandle<R>,
        icon: Option<String>,
        #[cfg(xdg_notifications)]
        open: super::OpenToasts<notify_rust::NotificationHandle>,
    }

    impl<R: Runtime> TauriNotificationSink<R> {
        pub fn new(app: &AppHandle<R>) -> Self {
            let icon = match app_paths::asset_roots(app) {
                Ok(roots) => {
                    tracing::debug!(
                        app_root = %roots.app_root.display(),
                        dev_server_url = ?roots.dev_server_url,
                        "resolving toast icon"
                    );
                    let path = roots.icon_path();
                    path.exists().then(|| path.to_string_lossy().into_owned())
                }
                Err(err) => {
                    tracing::debug!("toast icon unavailable: {}", err);
                    None
                }
            };
            Self {
                app: app.clone(),
                icon,
                #[cfg(xdg_notifications)]
                open: super::OpenToasts::default(),
            }
        }
    }

    #[cfg(xdg_notifications)]
    impl super::CloseHandle for notify_rust::NotificationHandle {
        fn close(self) {
            notify_rust::NotificationHandle::close(self);
        }
    }

    impl<R: Runtime> NotificationSink for TauriNotificationSink<R> {
        fn is_supported(&self) -> bool {
            let Some(notification) = self.app.try_state::<Notification<R>>() else {
                return false;
            };
            matches!(
                notification.permission_state(),
                Ok(PermissionState::Granted)
            )
        }

        // The notification daemon hands back a closable handle here, so the toast is shown
        // directly instead of through the plugin (which drops it).
        #[cfg(xdg_notifications)]
        fn show(&self, id: ToastId, toast: &ToastRequest) -> Result<(), String> {
            let expire_ms =
                u32::try_from(super::TOAST_DISMISS_DELAY.as_millis()).unwrap_or(u32::MAX);
            let mut notification = notify_rust::Notification::new();
            notification
                .appname(super::TOAST_APP_NAME)
                .summary(&toast.title)
                .body(&toast.body)
                .timeout(notify_rust::Timeout::Milliseconds(expire_ms));
            if let Some(icon) = &self.icon {
                notification.icon(icon);
            }
            let handle = notification
                .show()
                .map_err(|e| format!("TOAST_SHOW: {e}"))?;
            self.open.insert(id, handle);
            Ok(())
        }

        #[cfg(not(xdg_notifications))]
        fn show(&self, id: ToastId, toast: &ToastRequest) -> Result<(), String> {
            use tauri_plugin_notification::NotificationExt;

            let mut builder = self
                .app
                .notification()
                .builder()
                .id(id)
                .title(&toast.title)
                .body(&toast.body);
            if let Some(icon) = &self.icon {
                builder = builder.icon(icon);
            }
            builder.show().map_err(|e| format!("TOAST_SHOW: {e}"))
        }

        #[cfg(xdg_notifications)]
        fn dismiss(&self, id: ToastId) {
            if self.open.close(id) {
                tracing::debug!(toast_id = id, "toast closed");
            } else {
                tracing::debug!(toast_id = id, "toast already closed");
            }
        }

        #[cfg(not(xdg_notifications))]
        fn dismiss(&self, id: ToastId) {
            // Windows and macOS notification centers give no handle back; the OS expires
            // the banner.
            tracing::debug!(toast_id = id, "toast dismiss deadline reached");
        }
    }

    pub fn request<R: Runtime>(app: &AppHandle<R>, toast: ToastRequest) {
        let sink = Arc::new(TauriNotificationSink::new(app));
        tauri::async_runtime::spawn(async move {
            let outcome = present(sink, toast).await;
            tracing::debug!(outcome = ?outcome, "toast finished");
        });
    }
}
