//! pipmirror core library
//!
//! Picture-in-picture mirroring of a display or window.
//!
//! This library provides:
//! - A catalog of capturable displays and windows
//! - A controller owning the single live capture stream
//! - A frame sink that presents frames and locks the preview window to the
//!   source's aspect ratio
//! - Focus-driven visibility of the preview chrome
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────┐   ┌───────────────────┐   ┌─────────────┐   ┌────────────┐
//! │ SourceCatalog  │──▶│ StreamController  │──▶│ FrameQueue  │──▶│ FrameSink  │
//! │ (refresh)      │   │ (select_target)   │   │ (serialize) │   │ (present)  │
//! └────────────────┘   └───────────────────┘   └─────────────┘   └────────────┘
//! ```

pub mod capture;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod delivery;
pub mod error;
pub mod preview;
pub mod types;

pub use capture::{CaptureProvider, CaptureStream, ContentFilter, XcapProvider};
pub use catalog::{SourceCatalog, TargetEntry, TargetList};
pub use config::{ConfigFile, MirrorConfig, StreamConfig};
pub use controller::{StartStatus, StreamController};
pub use delivery::{FrameConsumer, FrameQueue, FrameSender};
pub use error::{MirrorError, Result};
pub use preview::{FocusTracker, FrameSink, HostWindow, PresentationSurface};
pub use types::{CapturableTarget, DisplayInfo, Handle, VideoFrame, WindowInfo};
