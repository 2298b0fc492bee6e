//! Usage: Window lifecycle state machine (single window + tray handle, close-to-hide, quit).
//!
//! `ShellContext::apply` maps one shell event to a plan of host actions and updates the
//! phase. It never touches Tauri directly; `resident::dispatch` runs the plan after the
//! state lock is released.

use super::content::ContentMessage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowPhase {
    Uncreated,
    Visible,
    Hidden,
    Destroyed,
}

impl WindowPhase {
    pub fn has_window(self) -> bool {
        matches!(self, Self::Visible | Self::Hidden)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    /// Host finished booting.
    Ready,
    /// Dock/taskbar reactivation on platforms where the app outlives its windows.
    Reopen { has_visible_windows: bool },
    /// Another process tried to start while this one holds the instance lock.
    SecondInstance,
    TrayClicked,
    ShowRequested,
    CloseRequested,
    ContentLoaded { timestamp: String },
    ResetRequested,
    QuitRequested,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostAction {
    CreateWindow,
    CreateTray,
    ShowWindow,
    HideWindow,
    UnminimizeWindow,
    FocusWindow,
    DestroyWindow,
    DestroyTray,
    PostToContent(ContentMessage),
}

/// Live window state as reported by the host right before an event is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowSnapshot {
    pub visible: bool,
    pub minimized: bool,
}

#[derive(Debug)]
pub struct ShellContext {
    phase: WindowPhase,
    tray_present: bool,
}

impl Default for ShellContext {
    fn default() -> Self {
        Self {
            phase: WindowPhase::Uncreated,
            tray_present: false,
        }
    }
}

impl ShellContext {
    pub fn phase(&self) -> WindowPhase {
        self.phase
    }

    pub fn tray_present(&self) -> bool {
        self.tray_present
    }

    pub fn is_quitting(&self) -> bool {
        self.phase == WindowPhase::Destroyed
    }

    pub fn apply(&mut self, event: ShellEvent, window: WindowSnapshot) -> Vec<HostAction> {
        use HostAction::*;

        if self.phase == WindowPhase::Destroyed {
            return Vec::new();
        }

        match event {
            ShellEvent::Ready => {
                let mut plan = Vec::new();
                if self.phase == WindowPhase::Uncreated {
                    plan.push(CreateWindow);
                    self.phase = WindowPhase::Visible;
                }
                if !self.tray_present {
                    plan.push(CreateTray);
                    self.tray_present = true;
                }
                plan
            }
            ShellEvent::Reopen {
                has_visible_windows,
            } => match self.phase {
                WindowPhase::Uncreated => {
                    self.phase = WindowPhase::Visible;
                    vec![CreateWindow]
                }
                WindowPhase::Hidden if !has_visible_windows => {
                    self.phase = WindowPhase::Visible;
                    vec![ShowWindow, FocusWindow]
                }
                _ => Vec::new(),
            },
            ShellEvent::SecondInstance => {
                if !self.phase.has_window() {
                    return Vec::new();
                }
                let mut plan = Vec::with_capacity(3);
                if window.minimized {
                    plan.push(UnminimizeWindow);
                }
                plan.push(ShowWindow);
                plan.push(FocusWindow);
                self.phase = WindowPhase::Visible;
                plan
            }
            ShellEvent::TrayClicked => {
                if !self.phase.has_window() {
                    return Vec::new();
                }
                if window.visible {
                    self.phase = WindowPhase::Hidden;
                    vec![HideWindow]
                } else {
                    self.phase = WindowPhase::Visible;
                    vec![ShowWindow, FocusWindow]
                }
            }
            ShellEvent::ShowRequested => {
                if !self.phase.has_window() {
                    return Vec::new();
                }
                self.phase = WindowPhase::Visible;
                vec![ShowWindow, FocusWindow]
            }
            ShellEvent::CloseRequested => {
                if !self.phase.has_window() {
                    return Vec::new();
                }
                self.phase = WindowPhase::Hidden;
                vec![HideWindow]
            }
            ShellEvent::ContentLoaded { timestamp } => {
                if !self.phase.has_window() {
                    return Vec::new();
                }
                vec![PostToContent(ContentMessage::MainProcessMessage(timestamp))]
            }
            ShellEvent::ResetRequested => {
                if !self.phase.has_window() {
                    return Vec::new();
                }
                vec![PostToContent(ContentMessage::reset())]
            }
            ShellEvent::QuitRequested => {
                let mut plan = Vec::with_capacity(2);
                if self.tray_present {
                    plan.push(DestroyTray);
                    self.tray_present = false;
                }
                if self.phase.has_window() {
                    plan.push(DestroyWindow);
                }
                self.phase = WindowPhase::Destroyed;
                plan
            }
        }
    }

    /// Host could not build the window; a later `Ready`/`Reopen` may retry.
    pub fn window_creation_failed(&mut self) {
        if self.phase != WindowPhase::Destroyed {
            self.phase = WindowPhase::Uncreated;
        }
    }

    pub fn tray_creation_failed(&mut self) {
        self.tray_present = false;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitDecision {
    /// Keep running; the app lives on without windows (macOS convention).
    Prevent,
    /// Release handles and let the process exit.
    QuitAndExit,
}

/// `exit_code` is `None` when the host asks to exit because its last window went away.
pub fn exit_decision(exit_code: Option<i32>, persistent_platform: bool) -> ExitDecision {
    if exit_code.is_none() && persistent_platform {
        return ExitDecision::Prevent;
    }
    ExitDecision::QuitAndExit
}

#[cfg(test)]
mod tests {
    use super::HostAction::*;
    use super::*;

    const VISIBLE: WindowSnapshot = WindowSnapshot {
        visible: true,
        minimized: false,
    };
    const HIDDEN: WindowSnapshot = WindowSnapshot {
        visible: false,
        minimized: false,
    };
    const MINIMIZED: WindowSnapshot = WindowSnapshot {
        visible: true,
        minimized: true,
    };

    fn booted() -> ShellContext {
        let mut ctx = ShellContext::default();
        ctx.apply(ShellEvent::Ready, WindowSnapshot::default());
        ctx
    }

    fn count(plan: &[HostAction], action: &HostAction) -> usize {
        plan.iter().filter(|a| *a == action).count()
    }

    #[test]
    fn ready_creates_window_and_tray_once() {
        let mut ctx = ShellContext::default();
        assert_eq!(
            ctx.apply(ShellEvent::Ready, WindowSnapshot::default()),
            vec![CreateWindow, CreateTray]
        );
        assert_eq!(ctx.phase(), WindowPhase::Visible);
        assert!(ctx.tray_present());

        assert!(ctx.apply(ShellEvent::Ready, VISIBLE).is_empty());
    }

    #[test]
    fn events_before_window_exists_are_noops() {
        let mut ctx = ShellContext::default();
        for event in [
            ShellEvent::SecondInstance,
            ShellEvent::TrayClicked,
            ShellEvent::ShowRequested,
            ShellEvent::CloseRequested,
            ShellEvent::ResetRequested,
            ShellEvent::ContentLoaded {
                timestamp: "t".into(),
            },
        ] {
            assert!(ctx.apply(event, WindowSnapshot::default()).is_empty());
        }
        assert_eq!(ctx.phase(), WindowPhase::Uncreated);
    }

    #[test]
    fn repeated_second_instances_focus_without_creating_windows() {
        let mut ctx = ShellContext::default();
        let mut created = count(
            &ctx.apply(ShellEvent::Ready, WindowSnapshot::default()),
            &CreateWindow,
        );

        for snapshot in [VISIBLE, HIDDEN, MINIMIZED, VISIBLE] {
            let plan = ctx.apply(ShellEvent::SecondInstance, snapshot);
            created += count(&plan, &CreateWindow);
            assert_eq!(count(&plan, &ShowWindow), 1);
            assert_eq!(plan.last(), Some(&FocusWindow));
            assert_eq!(ctx.phase(), WindowPhase::Visible);
        }

        assert_eq!(created, 1);
    }

    #[test]
    fn second_instance_restores_minimized_window_first() {
        let mut ctx = booted();
        assert_eq!(
            ctx.apply(ShellEvent::SecondInstance, MINIMIZED),
            vec![UnminimizeWindow, ShowWindow, FocusWindow]
        );
    }

    #[test]
    fn close_gesture_hides_and_show_restores() {
        let mut ctx = booted();
        assert_eq!(ctx.apply(ShellEvent::CloseRequested, VISIBLE), vec![HideWindow]);
        assert_eq!(ctx.phase(), WindowPhase::Hidden);
        assert!(ctx.phase().has_window());

        assert_eq!(
            ctx.apply(ShellEvent::ShowRequested, HIDDEN),
            vec![ShowWindow, FocusWindow]
        );
        assert_eq!(ctx.phase(), WindowPhase::Visible);
    }

    #[test]
    fn tray_click_toggles_visibility() {
        let mut ctx = booted();
        assert_eq!(ctx.apply(ShellEvent::TrayClicked, VISIBLE), vec![HideWindow]);
        assert_eq!(ctx.phase(), WindowPhase::Hidden);
        assert_eq!(
            ctx.apply(ShellEvent::TrayClicked, HIDDEN),
            vec![ShowWindow, FocusWindow]
        );
        assert_eq!(ctx.phase(), WindowPhase::Visible);
    }

    #[test]
    fn reset_posts_exactly_one_message_without_state_change() {
        let mut ctx = booted();
        ctx.apply(ShellEvent::CloseRequested, VISIBLE);
        let plan = ctx.apply(ShellEvent::ResetRequested, HIDDEN);
        assert_eq!(plan, vec![PostToContent(ContentMessage::reset())]);
        assert_eq!(ctx.phase(), WindowPhase::Hidden);
        assert!(ctx.tray_present());
    }

    #[test]
    fn content_loaded_forwards_timestamp() {
        let mut ctx = booted();
        let plan = ctx.apply(
            ShellEvent::ContentLoaded {
                timestamp: "2024. 1. 1. AM 9:00:00".into(),
            },
            VISIBLE,
        );
        assert_eq!(
            plan,
            vec![PostToContent(ContentMessage::MainProcessMessage(
                "2024. 1. 1. AM 9:00:00".into()
            ))]
        );
        assert_eq!(ctx.phase(), WindowPhase::Visible);
    }

    #[test]
    fn quit_destroys_each_handle_once_then_goes_silent() {
        let mut ctx = booted();
        assert_eq!(
            ctx.apply(ShellEvent::QuitRequested, VISIBLE),
            vec![DestroyTray, DestroyWindow]
        );
        assert!(ctx.is_quitting());
        assert!(!ctx.tray_present());

        for event in [
            ShellEvent::QuitRequested,
            ShellEvent::Ready,
            ShellEvent::Reopen {
                has_visible_windows: false,
            },
            ShellEvent::SecondInstance,
            ShellEvent::TrayClicked,
            ShellEvent::ShowRequested,
            ShellEvent::ResetRequested,
        ] {
            assert!(ctx.apply(event, HIDDEN).is_empty());
        }
        assert_eq!(ctx.phase(), WindowPhase::Destroyed);
    }

    #[test]
    fn quit_without_tray_only_destroys_window() {
        let mut ctx = booted();
        ctx.tray_creation_failed();
        assert_eq!(
            ctx.apply(ShellEvent::QuitRequested, VISIBLE),
            vec![DestroyWindow]
        );
    }

    #[test]
    fn reopen_creates_window_only_when_uncreated() {
        let mut ctx = ShellContext::default();
        assert_eq!(
            ctx.apply(
                ShellEvent::Reopen {
                    has_visible_windows: false
                },
                WindowSnapshot::default()
            ),
            vec![CreateWindow]
        );
        assert_eq!(ctx.phase(), WindowPhase::Visible);

        assert!(ctx
            .apply(
                ShellEvent::Reopen {
                    has_visible_windows: true
                },
                VISIBLE
            )
            .is_empty());

        ctx.apply(ShellEvent::CloseRequested, VISIBLE);
        assert_eq!(
            ctx.apply(
                ShellEvent::Reopen {
                    has_visible_windows: false
                },
                HIDDEN
            ),
            vec![ShowWindow, FocusWindow]
        );
    }

    #[test]
    fn failed_window_creation_allows_retry() {
        let mut ctx = ShellContext::default();
        ctx.apply(ShellEvent::Ready, WindowSnapshot::default());
        ctx.window_creation_failed();
        assert_eq!(ctx.phase(), WindowPhase::Uncreated);
        assert_eq!(
            ctx.apply(ShellEvent::Ready, WindowSnapshot::default()),
            vec![CreateWindow]
        );
    }

    #[test]
    fn exit_decision_keeps_persistent_platforms_alive_on_last_window() {
        assert_eq!(exit_decision(None, true), ExitDecision::Prevent);
        assert_eq!(exit_decision(None, false), ExitDecision::QuitAndExit);
        assert_eq!(exit_decision(Some(0), true), ExitDecision::QuitAndExit);
        assert_eq!(exit_decision(Some(0), false), ExitDecision::QuitAndExit);
    }
}
