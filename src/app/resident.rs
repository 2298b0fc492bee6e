//! Usage: Desktop resident mode (main window, tray icon, window lifecycle hooks).
//!
//! Every host callback is turned into a `ShellEvent` and routed through [`dispatch`].

use super::app_state::ShellState;
use super::content;
use super::lifecycle::{HostAction, ShellEvent, WindowSnapshot};
use crate::settings::ShellSettings;
use crate::shared::mutex_ext::MutexExt;
use tauri::{AppHandle, Manager, Runtime, WebviewWindow};

pub const MAIN_WINDOW_LABEL: &str = "main";
const WINDOW_TITLE: &str = "HolySymbol";
const WINDOW_WIDTH: f64 = 500.0;
const WINDOW_HEIGHT: f64 = 1000.0;
const TRAY_ID: &str = "main-tray";
const TRAY_TOOLTIP: &str = "HolySymbol";
const TRAY_MENU_SHOW_ID: &str = "tray.show";
const TRAY_MENU_RESET_ID: &str = "tray.reset";
const TRAY_MENU_QUIT_ID: &str = "tray.quit";

pub fn dispatch<R: Runtime>(app: &AppHandle<R>, event: ShellEvent) {
    let snapshot = snapshot(app);
    let plan = {
        let state = app.state::<ShellState>();
        let mut context = state.0.lock_or_recover();
        let from = context.phase();
        tracing::debug!(event = ?event, from = ?from, "shell event");
        let plan = context.apply(event, snapshot);
        if context.phase() != from {
            tracing::debug!(
                from = ?from,
                to = ?context.phase(),
                tray = context.tray_present(),
                "window phase changed"
            );
        }
        plan
    };

    for action in plan {
        execute(app, action);
    }
}

pub fn is_quitting<R: Runtime>(app: &AppHandle<R>) -> bool {
    app.state::<ShellState>().0.lock_or_recover().is_quitting()
}

fn snapshot<R: Runtime>(app: &AppHandle<R>) -> WindowSnapshot {
    let Some(window) = app.get_webview_window(MAIN_WINDOW_LABEL) else {
        return WindowSnapshot::default();
    };
    WindowSnapshot {
        visible: window.is_visible().unwrap_or(false),
        minimized: window.is_minimized().unwrap_or(false),
    }
}

fn execute<R: Runtime>(app: &AppHandle<R>, action: HostAction) {
    match &action {
        HostAction::CreateWindow => {
            if let Err(err) = create_main_window(app) {
                tracing::error!("main window creation failed: {}", err);
                app.state::<ShellState>()
                    .0
                    .lock_or_recover()
                    .window_creation_failed();
            }
        }
        HostAction::CreateTray => {
            if let Err(err) = setup_tray(app) {
                tracing::error!("system tray setup failed: {}", err);
                app.state::<ShellState>()
                    .0
                    .lock_or_recover()
                    .tray_creation_failed();
            }
        }
        HostAction::DestroyTray => destroy_tray(app),
        HostAction::PostToContent(message) => content::post(app, MAIN_WINDOW_LABEL, message),
        HostAction::ShowWindow => on_main_window(app, &action, |w| w.show()),
        HostAction::HideWindow => on_main_window(app, &action, |w| w.hide()),
        HostAction::UnminimizeWindow => on_main_window(app, &action, |w| w.unminimize()),
        HostAction::FocusWindow => on_main_window(app, &action, |w| w.set_focus()),
        HostAction::DestroyWindow => on_main_window(app, &action, |w| w.destroy()),
    }
}

fn on_main_window<R: Runtime>(
    app: &AppHandle<R>,
    action: &HostAction,
    op: impl FnOnce(&WebviewWindow<R>) -> tauri::Result<()>,
) {
    let Some(window) = app.get_webview_window(MAIN_WINDOW_LABEL) else {
        tracing::debug!(action = ?action, "main window missing, action skipped");
        return;
    };
    if let Err(err) = op(&window) {
        tracing::warn!(action = ?action, "window action failed: {}", err);
    }
}

fn create_main_window<R: Runtime>(app: &AppHandle<R>) -> Result<(), String> {
    if app.get_webview_window(MAIN_WINDOW_LABEL).is_some() {
        return Ok(());
    }

    let url = app
        .try_state::<ShellSettings>()
        .map(|settings| settings.content_url())
        .unwrap_or_else(|| ShellSettings::default().content_url())?;

    let builder = tauri::WebviewWindowBuilder::new(
        app,
        MAIN_WINDOW_LABEL,
        tauri::WebviewUrl::External(url.clone()),
    )
    .initialization_script(content::bridge_script())
    .on_page_load(|window, payload| {
        if payload.event() != tauri::webview::PageLoadEvent::Finished {
            return;
        }
        dispatch(
            window.app_handle(),
            ShellEvent::ContentLoaded {
                timestamp: crate::shared::time::now_local_string(),
            },
        );
    });

    #[cfg(desktop)]
    let builder = {
        let builder = builder
            .title(WINDOW_TITLE)
            .inner_size(WINDOW_WIDTH, WINDOW_HEIGHT)
            .min_inner_size(WINDOW_WIDTH, WINDOW_HEIGHT)
            .always_on_top(false)
            .skip_taskbar(false);
        match app.default_window_icon() {
            Some(icon) => builder
                .icon(icon.clone())
                .map_err(|e| format!("WINDOW_CREATE: failed to set window icon: {e}"))?,
            None => builder,
        }
    };

    builder
        .build()
        .map_err(|e| format!("WINDOW_CREATE: {e}"))?;

    tracing::info!(url = %url, "main window created");
    Ok(())
}

#[cfg(not(desktop))]
fn setup_tray<R: Runtime>(_app: &AppHandle<R>) -> Result<(), String> {
    Ok(())
}

#[cfg(not(desktop))]
fn destroy_tray<R: Runtime>(_app: &AppHandle<R>) {}

#[cfg(not(desktop))]
pub fn on_window_event<R: Runtime>(_window: &tauri::Window<R>, _event: &tauri::WindowEvent) {}

#[cfg(not(desktop))]
pub fn remove_app_menu<R: Runtime>(_app: &AppHandle<R>) {}

#[cfg(desktop)]
use tauri::menu::{Menu, MenuItem, PredefinedMenuItem};
#[cfg(desktop)]
use tauri::tray::{MouseButton, MouseButtonState, TrayIconBuilder, TrayIconEvent};

#[cfg(desktop)]
fn setup_tray<R: Runtime>(app: &AppHandle<R>) -> Result<(), String> {
    let show_item = MenuItem::with_id(app, TRAY_MENU_SHOW_ID, "창 보이기", true, None::<&str>)
        .map_err(|e| format!("TRAY_BUILD: failed to create show menu item: {e}"))?;
    let reset_item = MenuItem::with_id(app, TRAY_MENU_RESET_ID, "리셋", true, None::<&str>)
        .map_err(|e| format!("TRAY_BUILD: failed to create reset menu item: {e}"))?;
    let quit_item = MenuItem::with_id(app, TRAY_MENU_QUIT_ID, "종료", true, None::<&str>)
        .map_err(|e| format!("TRAY_BUILD: failed to create quit menu item: {e}"))?;
    let separator = PredefinedMenuItem::separator(app)
        .map_err(|e| format!("TRAY_BUILD: failed to create menu separator: {e}"))?;

    let menu = Menu::with_items(app, &[&show_item, &reset_item, &separator, &quit_item])
        .map_err(|e| format!("TRAY_BUILD: failed to create tray menu: {e}"))?;

    let mut tray_builder = TrayIconBuilder::with_id(TRAY_ID)
        .tooltip(TRAY_TOOLTIP)
        .menu(&menu);

    if let Some(icon) = app.default_window_icon() {
        tray_builder = tray_builder.icon(icon.clone());
    }

    tray_builder
        .show_menu_on_left_click(false)
        .on_menu_event(|app, event| match event.id.as_ref() {
            TRAY_MENU_SHOW_ID => dispatch(app, ShellEvent::ShowRequested),
            TRAY_MENU_RESET_ID => dispatch(app, ShellEvent::ResetRequested),
            TRAY_MENU_QUIT_ID => quit(app),
            _ => {}
        })
        .on_tray_icon_event(|tray, event| {
            if let TrayIconEvent::Click {
                button: MouseButton::Left,
                button_state: MouseButtonState::Up,
                ..
            } = event
            {
                dispatch(tray.app_handle(), ShellEvent::TrayClicked);
            }
        })
        .build(app)
        .map_err(|e| format!("TRAY_BUILD: failed to build tray icon: {e}"))?;

    Ok(())
}

#[cfg(desktop)]
fn destroy_tray<R: Runtime>(app: &AppHandle<R>) {
    if app.remove_tray_by_id(TRAY_ID).is_none() {
        tracing::debug!("tray already gone");
    }
}

#[cfg(desktop)]
pub fn quit<R: Runtime>(app: &AppHandle<R>) {
    tracing::info!("quit requested from tray");
    dispatch(app, ShellEvent::QuitRequested);
    app.exit(0);
}

#[cfg(desktop)]
pub fn on_window_event<R: Runtime>(window: &tauri::Window<R>, event: &tauri::WindowEvent) {
    if window.label() != MAIN_WINDOW_LABEL {
        return;
    }

    let tauri::WindowEvent::CloseRequested { api, .. } = event else {
        return;
    };

    if intercept_close(window.app_handle()) {
        api.prevent_close();
    }
}

/// Turns a close gesture into a hide. Returns `false` once quitting, when the host close
/// must go through.
#[cfg(desktop)]
fn intercept_close<R: Runtime>(app: &AppHandle<R>) -> bool {
    if is_quitting(app) {
        return false;
    }
    dispatch(app, ShellEvent::CloseRequested);
    true
}

/// Drops the default application menu; the shell only exposes the tray menu.
#[cfg(desktop)]
pub fn remove_app_menu<R: Runtime>(app: &AppHandle<R>) {
    if let Err(err) = app.remove_menu() {
        tracing::debug!("application menu removal failed: {}", err);
    }
}
