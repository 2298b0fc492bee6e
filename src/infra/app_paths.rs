//! Usage: Resolve per-user app data directory, log directory and bundled asset roots.

use std::path::{Path, PathBuf};
use tauri::{AppHandle, Manager, Runtime};

pub const APP_DOTDIR_NAME: &str = ".holysymbol";
const APP_DOTDIR_NAME_ENV: &str = "HOLYSYMBOL_DOTDIR_NAME";
const DEV_SERVER_URL_ENV: &str = "VITE_DEV_SERVER_URL";
const LOG_DIR_NAME: &str = "logs";
pub const APP_ICON_FILE_NAME: &str = "holysymbol.png";

fn is_safe_dotdir_name(name: &str) -> bool {
    if name.is_empty() || name == "." || name == ".." {
        return false;
    }
    if !name.starts_with('.') {
        return false;
    }
    if name.contains('/') || name.contains('\\') {
        return false;
    }
    name.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_')
}

fn dotdir_name_from_env(value: Option<String>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| is_safe_dotdir_name(v))
        .unwrap_or_else(|| APP_DOTDIR_NAME.to_string())
}

pub fn app_data_dir<R: Runtime>(app: &AppHandle<R>) -> Result<PathBuf, String> {
    let home_dir = app
        .path()
        .home_dir()
        .map_err(|e| format!("failed to resolve home dir: {e}"))?;

    let dotdir_name = dotdir_name_from_env(std::env::var(APP_DOTDIR_NAME_ENV).ok());

    let dir = home_dir.join(dotdir_name);
    std::fs::create_dir_all(&dir).map_err(|e| format!("failed to create app dir: {e}"))?;

    Ok(dir)
}

pub fn log_dir<R: Runtime>(app: &AppHandle<R>) -> Result<PathBuf, String> {
    let dir = app_data_dir(app)?.join(LOG_DIR_NAME);
    std::fs::create_dir_all(&dir).map_err(|e| format!("failed to create log dir: {e}"))?;
    Ok(dir)
}

/// Where bundled static assets live. With a dev server the unbundled `public/` folder is
/// served directly; packaged builds ship them inside `dist/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRoots {
    pub app_root: PathBuf,
    pub public_root: PathBuf,
    pub dev_server_url: Option<String>,
}

impl AssetRoots {
    pub fn resolve(app_root: &Path, dev_server_url: Option<String>) -> Self {
        let dev_server_url = dev_server_url
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let public_root = if dev_server_url.is_some() {
            app_root.join("public")
        } else {
            app_root.join("dist")
        };

        Self {
            app_root: app_root.to_path_buf(),
            public_root,
            dev_server_url,
        }
    }

    pub fn icon_path(&self) -> PathBuf {
        self.public_root.join(APP_ICON_FILE_NAME)
    }
}

pub fn asset_roots<R: Runtime>(app: &AppHandle<R>) -> Result<AssetRoots, String> {
    let app_root = app
        .path()
        .resource_dir()
        .map_err(|e| format!("failed to resolve resource dir: {e}"))?;
    Ok(AssetRoots::resolve(
        &app_root,
        std::env::var(DEV_SERVER_URL_ENV).ok(),
    ))
}
