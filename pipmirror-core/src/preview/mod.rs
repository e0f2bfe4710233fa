//! Preview window collaborators
//!
//! The core never draws or lays out anything itself. It talks to a
//! [`PresentationSurface`] that displays frames and a [`HostWindow`] whose
//! proportions follow the captured content.

mod focus;
mod geometry;
mod sink;

pub use focus::{FocusState, FocusTracker, WindowChrome, WindowEvent};
pub use geometry::{adapt_geometry, needs_update, AspectRatio, ASPECT_TOLERANCE};
pub use sink::{FrameSink, SinkStats};

use crate::types::VideoFrame;

/// Displays decoded frames
pub trait PresentationSurface: Send {
    /// Show `frame` as soon as possible; must not block
    fn enqueue(&mut self, frame: &VideoFrame);
}

/// Stacking level of the preview window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowLevel {
    #[default]
    Normal,
    Floating,
    /// Above floating panels and menus
    PopUpMenu,
}

/// The window hosting the preview surface
pub trait HostWindow: Send {
    /// Current aspect-ratio constraint; [`AspectRatio::UNSET`] when none
    fn aspect_ratio(&self) -> AspectRatio;

    fn set_aspect_ratio(&mut self, ratio: AspectRatio);

    /// Apply pending layout immediately
    fn layout_if_needed(&mut self);

    fn set_level(&mut self, level: WindowLevel);

    fn set_movable_by_background(&mut self, movable: bool);
}

/// One-time window setup for the always-on-top, drag-anywhere preview
pub fn configure_pip_window<W: HostWindow + ?Sized>(window: &mut W) {
    window.set_movable_by_background(true);
    window.set_level(WindowLevel::PopUpMenu);
}
