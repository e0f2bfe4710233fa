//! Core types for pipmirror
//!
//! These types describe capturable sources and the frames a capture
//! session delivers.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Global handle counter for unique session IDs
static HANDLE_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Opaque handle for a capture session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(u64);

impl Handle {
    /// Create a new unique handle
    pub fn new() -> Self {
        Self(HANDLE_COUNTER.fetch_add(1, Ordering::SeqCst))
    }

    /// Get the raw handle value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for Handle {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Session({})", self.0)
    }
}

/// Kind of capture source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Full display capture
    Display,
    /// Individual window capture
    Window,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Display => write!(f, "Display"),
            SourceKind::Window => write!(f, "Window"),
        }
    }
}

/// A display reported by the capture provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayInfo {
    /// Stable numeric display identifier
    pub id: u32,
}

impl DisplayInfo {
    pub fn new(id: u32) -> Self {
        Self { id }
    }
}

/// An on-screen window reported by the capture provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowInfo {
    /// Provider-assigned window identifier
    pub id: u32,
    /// Window title, if the window has one
    pub title: Option<String>,
    /// Name of the owning application, if known
    pub app_name: Option<String>,
    /// Stacking layer
    pub layer: i32,
    /// Frame size (width, height)
    pub size: (f64, f64),
}

impl WindowInfo {
    /// Create a window with no title or owner
    pub fn new(id: u32, layer: i32, size: (f64, f64)) -> Self {
        Self {
            id,
            title: None,
            app_name: None,
            layer,
            size,
        }
    }

    /// Set the window title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the owning application name
    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    /// Frame height
    pub fn height(&self) -> f64 {
        self.size.1
    }
}

/// Something that can be captured
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CapturableTarget {
    /// An entire display
    Display(DisplayInfo),
    /// A single window
    Window(WindowInfo),
}

impl CapturableTarget {
    /// Get the source kind
    pub fn kind(&self) -> SourceKind {
        match self {
            Self::Display(_) => SourceKind::Display,
            Self::Window(_) => SourceKind::Window,
        }
    }

    /// Get the provider identifier
    pub fn id(&self) -> u32 {
        match self {
            Self::Display(d) => d.id,
            Self::Window(w) => w.id,
        }
    }
}

impl std::fmt::Display for CapturableTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Display(d) => write!(f, "Display({})", d.id),
            Self::Window(w) => write!(f, "Window({})", w.id),
        }
    }
}

/// Pixel layout of captured frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PixelFormat {
    /// 32 bits per pixel, byte order B, G, R, A
    #[default]
    Bgra32,
}

impl PixelFormat {
    /// Bytes per pixel
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::Bgra32 => 4,
        }
    }
}

/// Decoded pixel data attached to a frame
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Pixel layout
    pub format: PixelFormat,
    /// Row stride in bytes
    pub stride: u32,
    /// Pixel bytes
    pub data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap BGRA bytes with a tightly packed stride
    pub fn bgra(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            format: PixelFormat::Bgra32,
            stride: width * PixelFormat::Bgra32.bytes_per_pixel() as u32,
            data,
        }
    }
}

/// One video sample delivered by a capture session
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// Session that produced this frame
    pub session: Handle,
    /// Per-session sequence number, starting at 0
    pub sequence: u64,
    /// Presentation timestamp in nanoseconds
    pub pts: u64,
    /// Decoded pixels; idle or status-only samples carry none
    pub pixel_buffer: Option<PixelBuffer>,
}

impl VideoFrame {
    /// Create a frame carrying pixels
    pub fn new(session: Handle, sequence: u64, pixel_buffer: PixelBuffer) -> Self {
        Self {
            session,
            sequence,
            pts: now_ns(),
            pixel_buffer: Some(pixel_buffer),
        }
    }

    /// Create a frame without a pixel buffer
    pub fn empty(session: Handle, sequence: u64) -> Self {
        Self {
            session,
            sequence,
            pts: now_ns(),
            pixel_buffer: None,
        }
    }

    /// Pixel dimensions, if the frame carries pixels
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.pixel_buffer.as_ref().map(|p| (p.width, p.height))
    }
}

fn now_ns() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
