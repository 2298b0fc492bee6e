//! Usage: Tracing setup (stdout from process start, daily rolling file once the app data dir
//! is known, `log` bridge).
//!
//! - `init()` runs before the Tauri builder, so a launch that loses the single-instance lock
//!   still leaves a trace on stdout
//! - `attach_file_log(app)` runs in `setup` and swaps the file layer in

use crate::app_paths;
use std::path::Path;
use std::sync::OnceLock;
use tauri::{AppHandle, Runtime};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, reload, EnvFilter, Registry};

const LOG_FILE_PREFIX: &str = "holysymbol";
const LOG_FILE_SUFFIX: &str = "log";
const LOG_MAX_FILES: usize = 7;

type FileLayer = fmt::Layer<Registry, fmt::format::DefaultFields, fmt::format::Format, NonBlocking>;

static FILE_LAYER: OnceLock<reload::Handle<Option<FileLayer>, Registry>> = OnceLock::new();
static FILE_WRITER_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

fn default_directives() -> &'static str {
    if cfg!(debug_assertions) {
        "holysymbol_lib=debug,info"
    } else {
        "holysymbol_lib=info,warn"
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives()))
}

/// Daily files named `holysymbol.<date>.log`; rotation keeps the newest [`LOG_MAX_FILES`].
fn file_appender(dir: &Path) -> Result<RollingFileAppender, String> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix(LOG_FILE_SUFFIX)
        .max_log_files(LOG_MAX_FILES)
        .build(dir)
        .map_err(|e| format!("LOG_INIT: failed to create log file appender: {e}"))
}

pub(crate) fn init() {
    let (file_layer, file_handle) = reload::Layer::new(None::<FileLayer>);
    let subscriber = tracing_subscriber::registry()
        .with(file_layer)
        .with(env_filter())
        .with(fmt::layer().with_target(true).compact());

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        // Already initialised; keep the first subscriber.
        return;
    }
    let _ = FILE_LAYER.set(file_handle);

    if let Err(err) = tracing_log::LogTracer::init() {
        tracing::debug!("log bridge not installed: {}", err);
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        profile = if cfg!(debug_assertions) { "debug" } else { "release" },
        pid = std::process::id(),
        "logging initialised"
    );
}

pub(crate) fn attach_file_log<R: Runtime>(app: &AppHandle<R>) {
    let Some(handle) = FILE_LAYER.get() else {
        return;
    };

    let appender = match app_paths::log_dir(app).and_then(|dir| file_appender(&dir)) {
        Ok(appender) => appender,
        Err(err) => {
            tracing::warn!("file logging disabled: {}", err);
            return;
        }
    };

    let (writer, guard) = tracing_appender::non_blocking(appender);
    let _ = FILE_WRITER_GUARD.set(guard);
    let layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(writer);

    match handle.reload(Some(layer)) {
        Ok(()) => tracing::debug!(max_files = LOG_MAX_FILES, "file logging enabled"),
        Err(err) => tracing::warn!("file logging disabled: {}", err),
    }
}
