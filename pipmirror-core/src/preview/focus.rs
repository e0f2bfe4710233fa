//! Window-focus state
//!
//! Selection controls and the title bar are only shown while the preview is
//! the main window, leaving a bare video tile when it is in the background.

use tracing::debug;

/// Chrome toggled with focus
pub trait WindowChrome {
    /// Show or hide the source picker and refresh button
    fn set_controls_visible(&mut self, visible: bool);

    /// Show or hide the standard title bar
    fn set_title_bar_visible(&mut self, visible: bool);
}

/// Whether the preview window is the main window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusState {
    #[default]
    Main,
    NotMain,
}

impl FocusState {
    pub fn is_main(&self) -> bool {
        matches!(self, Self::Main)
    }
}

/// Window activation notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    DidBecomeMain,
    DidResignMain,
}

/// Applies focus transitions to the window chrome
pub struct FocusTracker<C> {
    state: FocusState,
    chrome: C,
}

impl<C: WindowChrome> FocusTracker<C> {
    /// Start in [`FocusState::Main`] with the chrome visible
    pub fn new(chrome: C) -> Self {
        let mut tracker = Self {
            state: FocusState::Main,
            chrome,
        };
        tracker.apply();
        tracker
    }

    pub fn state(&self) -> FocusState {
        self.state
    }

    pub fn chrome(&self) -> &C {
        &self.chrome
    }

    /// Feed a window notification
    pub fn handle(&mut self, event: WindowEvent) {
        self.state = match event {
            WindowEvent::DidBecomeMain => FocusState::Main,
            WindowEvent::DidResignMain => FocusState::NotMain,
        };
        // Re-applied even when unchanged so repeated notifications converge.
        self.apply();
    }

    pub fn window_did_become_main(&mut self) {
        self.handle(WindowEvent::DidBecomeMain);
    }

    pub fn window_did_resign_main(&mut self) {
        self.handle(WindowEvent::DidResignMain);
    }

    fn apply(&mut self) {
        let visible = self.state.is_main();
        debug!("Focus {:?}: chrome visible = {}", self.state, visible);
        self.chrome.set_title_bar_visible(visible);
        self.chrome.set_controls_visible(visible);
    }
}
