//! Usage: App-level Tauri commands (toast requests, about info).

use crate::settings::ShellSettings;
use crate::toast::{self, ToastRequest};
use tauri::{AppHandle, Manager, Runtime};

#[derive(Debug, Clone, serde::Serialize)]
pub(crate) struct AppAboutInfo {
    os: String,
    arch: String,
    profile: String,
    app_version: String,
    content_url: String,
}

/// Always acknowledges with `true`, even when the platform cannot show notifications.
#[tauri::command]
pub(crate) fn show_toast<R: Runtime>(app: AppHandle<R>, title: String, body: String) -> bool {
    toast::request(&app, ToastRequest { title, body });
    true
}

#[tauri::command]
pub(crate) fn app_about_get<R: Runtime>(app: AppHandle<R>) -> AppAboutInfo {
    let content_url = app
        .try_state::<ShellSettings>()
        .map(|settings| settings.content_url.clone())
        .unwrap_or_else(|| ShellSettings::default().content_url);

    AppAboutInfo {
        os: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
        profile: if cfg!(debug_assertions) {
            "debug".to_string()
        } else {
            "release".to_string()
        },
        app_version: env!("CARGO_PKG_VERSION").to_string(),
        content_url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::DEFAULT_CONTENT_URL;
    use tauri::test::mock_app;

    #[test]
    fn show_toast_acknowledges_without_notification_support() {
        let app = mock_app();
        assert!(show_toast(
            app.handle().clone(),
            "홀리 심볼".to_string(),
            "버프가 곧 끝납니다".to_string()
        ));
        assert!(show_toast(app.handle().clone(), String::new(), String::new()));
    }

    #[test]
    fn app_about_get_reports_managed_content_url() {
        let app = mock_app();
        let about = app_about_get(app.handle().clone());
        assert_eq!(about.content_url, DEFAULT_CONTENT_URL);
        assert_eq!(about.app_version, env!("CARGO_PKG_VERSION"));

        app.manage(ShellSettings {
            content_url: "https://example.com/timer".to_string(),
            ..ShellSettings::default()
        });
        let about = app_about_get(app.handle().clone());
        assert_eq!(about.content_url, "https://example.com/timer");
    }
}
