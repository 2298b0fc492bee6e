//! Usage: Persisted shell settings (schema + read/write helpers).

use crate::app_paths;
use crate::shared::fs::{read_optional_file, write_file_atomic};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SCHEMA_VERSION: u32 = 2;
const SCHEMA_VERSION_ADD_GLOBAL_SHORTCUT: u32 = 2;
pub const DEFAULT_CONTENT_URL: &str = "https://holy-symbol-timer.vercel.app";
pub const DEFAULT_GLOBAL_SHORTCUT: &str = "CommandOrControl+Space";
const SETTINGS_FILE_NAME: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellSettings {
    pub schema_version: u32,
    // Remote page shown in the main window.
    pub content_url: String,
    // Accelerator that sends "reset" to the page, in global-shortcut plugin syntax.
    pub global_shortcut: String,
}

impl Default for ShellSettings {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            content_url: DEFAULT_CONTENT_URL.to_string(),
            global_shortcut: DEFAULT_GLOBAL_SHORTCUT.to_string(),
        }
    }
}

impl ShellSettings {
    pub fn content_url(&self) -> Result<tauri::Url, String> {
        parse_content_url(&self.content_url)
    }
}

fn parse_content_url(raw: &str) -> Result<tauri::Url, String> {
    let url = tauri::Url::parse(raw.trim())
        .map_err(|e| format!("SETTINGS_INVALID: content_url={raw}: {e}"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!(
            "SETTINGS_INVALID: content_url scheme must be http(s), got {other}"
        )),
    }
}

fn sanitize_content_url(settings: &mut ShellSettings) -> bool {
    if parse_content_url(&settings.content_url).is_ok() {
        return false;
    }
    tracing::warn!(
        content_url = %settings.content_url,
        "settings: content_url is not a valid http(s) url, using default"
    );
    settings.content_url = DEFAULT_CONTENT_URL.to_string();
    true
}

fn sanitize_global_shortcut(settings: &mut ShellSettings) -> bool {
    let trimmed = settings.global_shortcut.trim();
    if trimmed.is_empty() {
        settings.global_shortcut = DEFAULT_GLOBAL_SHORTCUT.to_string();
        return true;
    }
    if trimmed.len() != settings.global_shortcut.len() {
        settings.global_shortcut = trimmed.to_string();
        return true;
    }
    false
}

fn migrate_add_global_shortcut(settings: &mut ShellSettings, schema_version_present: bool) -> bool {
    if schema_version_present && settings.schema_version >= SCHEMA_VERSION_ADD_GLOBAL_SHORTCUT {
        return false;
    }
    // Older files never carried the field, so serde already filled in the default.
    settings.schema_version = SCHEMA_VERSION_ADD_GLOBAL_SHORTCUT;
    true
}

fn parse_settings_json(content: &[u8]) -> Result<(ShellSettings, bool), String> {
    let raw: serde_json::Value = serde_json::from_slice(content)
        .map_err(|e| format!("SETTINGS_PARSE: failed to parse settings.json: {e}"))?;
    let schema_version_present = raw.get("schema_version").is_some();
    let settings: ShellSettings = serde_json::from_value(raw)
        .map_err(|e| format!("SETTINGS_PARSE: failed to parse settings.json: {e}"))?;
    Ok((settings, schema_version_present))
}

/// Loads settings from `path`. Returns the settings plus whether the file should be
/// (re)written: missing, migrated or repaired files are flagged so callers can persist them.
pub(crate) fn load_from_path(path: &Path) -> Result<(ShellSettings, bool), String> {
    let Some(bytes) = read_optional_file(path).map_err(|e| format!("SETTINGS_READ: {e}"))? else {
        return Ok((ShellSettings::default(), true));
    };

    let (mut settings, schema_version_present) = parse_settings_json(&bytes)?;

    let mut repaired = false;
    repaired |= migrate_add_global_shortcut(&mut settings, schema_version_present);
    repaired |= sanitize_content_url(&mut settings);
    repaired |= sanitize_global_shortcut(&mut settings);

    Ok((settings, repaired))
}

pub(crate) fn write_to_path(path: &Path, settings: &ShellSettings) -> Result<(), String> {
    parse_content_url(&settings.content_url)?;
    if settings.global_shortcut.trim().is_empty() {
        return Err("SETTINGS_INVALID: global_shortcut must not be empty".to_string());
    }

    let content = serde_json::to_vec_pretty(settings)
        .map_err(|e| format!("SETTINGS_WRITE: failed to serialize settings: {e}"))?;
    write_file_atomic(path, &content).map_err(|e| format!("SETTINGS_WRITE: {e}"))
}

fn settings_path(app: &tauri::AppHandle) -> Result<PathBuf, String> {
    Ok(app_paths::app_data_dir(app)?.join(SETTINGS_FILE_NAME))
}

pub fn read(app: &tauri::AppHandle) -> Result<ShellSettings, String> {
    let path = settings_path(app)?;
    let (settings, needs_write) = load_from_path(&path)?;
    if needs_write {
        // Best-effort: keep the file discoverable/editable and in the current schema.
        if let Err(err) = write_to_path(&path, &settings) {
            tracing::warn!(path = %path.display(), "settings persist failed: {}", err);
        }
    }
    Ok(settings)
}

/// Reads settings, falling back to defaults when the file is unreadable or malformed.
pub fn read_or_default(app: &tauri::AppHandle) -> ShellSettings {
    match read(app) {
        Ok(settings) => settings,
        Err(err) => {
            tracing::warn!("settings read failed, using defaults: {}", err);
            ShellSettings::default()
        }
    }
}
