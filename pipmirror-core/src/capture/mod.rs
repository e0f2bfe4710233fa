//! Capture provider seam
//!
//! The platform enumeration and streaming subsystem sits behind
//! [`CaptureProvider`] and [`CaptureStream`]. [`XcapProvider`] is the
//! built-in backend; tests substitute their own.

pub mod backend;

pub use backend::{XcapProvider, XcapStream};

use std::future::Future;

use crate::config::StreamConfig;
use crate::delivery::FrameSender;
use crate::error::Result;
use crate::types::{CapturableTarget, DisplayInfo, Handle, WindowInfo};

/// Scoping rule restricting a stream to one display or window
#[derive(Debug, Clone, PartialEq)]
pub enum ContentFilter {
    /// Exactly one window, independent of where it sits on the desktop
    DesktopIndependentWindow(WindowInfo),
    /// A whole display minus the listed windows
    Display {
        display: DisplayInfo,
        excluded_windows: Vec<WindowInfo>,
    },
}

impl ContentFilter {
    /// Build the filter for a selected target.
    ///
    /// Displays are captured without excluding any windows.
    pub fn for_target(target: &CapturableTarget) -> Self {
        match target {
            CapturableTarget::Window(window) => Self::DesktopIndependentWindow(window.clone()),
            CapturableTarget::Display(display) => Self::Display {
                display: display.clone(),
                excluded_windows: Vec::new(),
            },
        }
    }
}

impl std::fmt::Display for ContentFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DesktopIndependentWindow(w) => write!(f, "window {}", w.id),
            Self::Display {
                display,
                excluded_windows,
            } => write!(
                f,
                "display {} excluding {} windows",
                display.id,
                excluded_windows.len()
            ),
        }
    }
}

/// Media type of a stream output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputType {
    /// Video frames of the captured content
    Screen,
    /// Audio samples (not produced by any backend here)
    Audio,
}

/// Capture state of a stream session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamState {
    #[default]
    Stopped,
    Capturing,
}

/// Platform capability that lists sources and opens streams
pub trait CaptureProvider: Send + Sync + 'static {
    /// Stream type produced by this provider
    type Stream: CaptureStream;

    /// List displays in enumeration order
    fn list_displays(&self) -> impl Future<Output = Result<Vec<DisplayInfo>>> + Send;

    /// List windows in enumeration order
    fn list_windows(
        &self,
        exclude_desktop_owners: bool,
        on_screen_only: bool,
    ) -> impl Future<Output = Result<Vec<WindowInfo>>> + Send;

    /// Construct a stopped stream bound to `filter`
    fn create_stream(&self, filter: ContentFilter, config: StreamConfig) -> Result<Self::Stream>;
}

/// One capture stream session
pub trait CaptureStream: Send + 'static {
    /// Identity of this session
    fn id(&self) -> Handle;

    /// Filter this session was built from
    fn filter(&self) -> &ContentFilter;

    /// Register the consumer for `kind` frames
    fn add_output(&mut self, output: FrameSender, kind: OutputType) -> Result<()>;

    /// Begin delivering frames
    fn start_capture(&mut self);

    /// Request the stream to stop.
    ///
    /// Returns immediately; teardown completes in the background. Calling it
    /// again, or receiving late frames afterwards, must be harmless.
    fn stop_capture(&mut self);

    /// Current capture state
    fn state(&self) -> StreamState;
}
