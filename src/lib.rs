mod app;
mod commands;
mod infra;
mod shared;

pub(crate) use app::{app_state, instance, lifecycle, resident, toast};
pub(crate) use infra::{app_paths, settings};

use lifecycle::{exit_decision, ExitDecision, ShellEvent};
use tauri::Manager;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    crate::app::logging::init();

    let builder = tauri::Builder::default();

    // The single-instance plugin goes first: a losing process exits before anything else
    // gets initialised.
    #[cfg(desktop)]
    tracing::info!("acquiring single-instance lock; a running instance takes over this launch");
    #[cfg(desktop)]
    let builder = builder
        .plugin(instance::plugin())
        .plugin(tauri_plugin_notification::init())
        .plugin(tauri_plugin_global_shortcut::Builder::new().build());

    let app = builder
        .manage(app_state::ShellState::default())
        .on_window_event(resident::on_window_event)
        .setup(|app| {
            crate::app::logging::attach_file_log(app.handle());
            #[cfg(desktop)]
            tracing::info!("single-instance lock acquired");

            let settings = settings::read_or_default(app.handle());
            tracing::info!(
                content_url = %settings.content_url,
                global_shortcut = %settings.global_shortcut,
                "shell settings loaded"
            );
            #[cfg(desktop)]
            let accelerator = settings.global_shortcut.clone();
            app.manage(settings);

            resident::remove_app_menu(app.handle());
            resident::dispatch(app.handle(), ShellEvent::Ready);

            #[cfg(desktop)]
            crate::app::shortcut::register(app.handle(), &accelerator);

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::app::show_toast,
            commands::app::app_about_get
        ])
        .build(tauri::generate_context!())
        .expect("error while building tauri application");

    app.run(|app_handle, event| match event {
        tauri::RunEvent::ExitRequested { api, code, .. } => {
            match exit_decision(code, cfg!(target_os = "macos")) {
                ExitDecision::Prevent => {
                    tracing::debug!("last window gone, staying resident");
                    api.prevent_exit();
                }
                ExitDecision::QuitAndExit => {
                    tracing::info!(code = ?code, "exit requested, releasing window and tray");
                    resident::dispatch(app_handle, ShellEvent::QuitRequested);
                }
            }
        }
        #[cfg(target_os = "macos")]
        tauri::RunEvent::Reopen {
            has_visible_windows,
            ..
        } => {
            resident::dispatch(
                app_handle,
                ShellEvent::Reopen {
                    has_visible_windows,
                },
            );
        }
        _ => {}
    });
}
