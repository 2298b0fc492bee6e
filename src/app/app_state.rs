//! Usage: Shared Tauri state types used by `resident` and `commands/*`.

use super::lifecycle::ShellContext;
use std::sync::Mutex;

/// Process-wide window/tray bookkeeping. Only locked to compute a plan, never across host calls.
#[derive(Default)]
pub(crate) struct ShellState(pub(crate) Mutex<ShellContext>);
