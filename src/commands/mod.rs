//! Usage: Tauri command handlers exposed to the web content.

pub(crate) mod app;
