//! Frame sink: presentation plus geometry adaptation

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, trace};

use super::geometry::adapt_geometry;
use super::{HostWindow, PresentationSurface};
use crate::delivery::FrameConsumer;
use crate::types::{Handle, VideoFrame};

/// Session whose frames the sink currently accepts
#[derive(Debug, Clone, Copy)]
struct ActiveSession {
    handle: Handle,
    frames: u64,
}

/// Counters describing what the sink has done
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SinkStats {
    /// Frames enqueued to the surface
    pub presented: u64,
    /// Frames discarded because their session was no longer current
    pub stale: u64,
    /// Frames that carried no pixel buffer
    pub without_pixels: u64,
    /// Aspect-ratio updates applied to the window
    pub resizes: u64,
}

/// Consumer that displays frames and keeps the window proportional
pub struct FrameSink<S, W> {
    surface: Mutex<S>,
    window: Mutex<Option<W>>,
    active: Mutex<Option<ActiveSession>>,
    presented: AtomicU64,
    stale: AtomicU64,
    without_pixels: AtomicU64,
    resizes: AtomicU64,
}

impl<S, W> FrameSink<S, W>
where
    S: PresentationSurface + 'static,
    W: HostWindow + 'static,
{
    /// Create a sink with no host window attached yet
    pub fn new(surface: S) -> Self {
        Self {
            surface: Mutex::new(surface),
            window: Mutex::new(None),
            active: Mutex::new(None),
            presented: AtomicU64::new(0),
            stale: AtomicU64::new(0),
            without_pixels: AtomicU64::new(0),
            resizes: AtomicU64::new(0),
        }
    }

    /// Create a sink already attached to its window
    pub fn with_window(surface: S, window: W) -> Self {
        let sink = Self::new(surface);
        sink.attach_window(window);
        sink
    }

    /// Attach the host window; geometry adaptation starts with the next frame
    pub fn attach_window(&self, window: W) {
        *self.window.lock() = Some(window);
    }

    /// Detach and return the host window
    pub fn detach_window(&self) -> Option<W> {
        self.window.lock().take()
    }

    /// Run `f` against the presentation surface
    pub fn with_surface<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut *self.surface.lock())
    }

    /// Run `f` against the host window, if attached
    pub fn with_window_mut<R>(&self, f: impl FnOnce(&mut W) -> R) -> Option<R> {
        self.window.lock().as_mut().map(f)
    }

    pub fn stats(&self) -> SinkStats {
        SinkStats {
            presented: self.presented.load(Ordering::Relaxed),
            stale: self.stale.load(Ordering::Relaxed),
            without_pixels: self.without_pixels.load(Ordering::Relaxed),
            resizes: self.resizes.load(Ordering::Relaxed),
        }
    }

    /// Count the frame against the active session; false if it is stale
    fn admit(&self, frame: &VideoFrame) -> bool {
        let mut active = self.active.lock();
        match active.as_mut() {
            Some(session) if session.handle == frame.session => {
                session.frames += 1;
                true
            }
            _ => false,
        }
    }
}

impl<S, W> FrameConsumer for FrameSink<S, W>
where
    S: PresentationSurface + 'static,
    W: HostWindow + 'static,
{
    fn on_frame(&self, frame: VideoFrame) {
        if !self.admit(&frame) {
            self.stale.fetch_add(1, Ordering::Relaxed);
            trace!("Discarding frame {} from superseded {}", frame.sequence, frame.session);
            return;
        }

        self.surface.lock().enqueue(&frame);
        self.presented.fetch_add(1, Ordering::Relaxed);

        let Some((width, height)) = frame.dimensions() else {
            self.without_pixels.fetch_add(1, Ordering::Relaxed);
            trace!("Frame {} has no pixel buffer, skipping geometry", frame.sequence);
            return;
        };

        let mut window = self.window.lock();
        let Some(window) = window.as_mut() else {
            return;
        };

        if adapt_geometry(window, width, height) {
            self.resizes.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn set_active_session(&self, session: Option<Handle>) {
        debug!(
            "Frame sink now accepting {}",
            session.map_or_else(|| "nothing".to_string(), |h| h.to_string())
        );
        *self.active.lock() = session.map(|handle| ActiveSession { handle, frames: 0 });
    }

    fn frames_from(&self, session: Handle) -> u64 {
        match *self.active.lock() {
            Some(active) if active.handle == session => active.frames,
            _ => 0,
        }
    }
}
