//! Stream controller
//!
//! Owns the single current capture session. Selecting a target builds a
//! content filter, swaps the new session in (stopping the one it replaces),
//! registers the frame consumer and starts capture.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::capture::{CaptureProvider, CaptureStream, ContentFilter, OutputType, StreamState};
use crate::catalog::TargetEntry;
use crate::config::StreamConfig;
use crate::delivery::{FrameConsumer, FrameSender};
use crate::error::{MirrorError, Result, ResultExt};
use crate::types::{CapturableTarget, Handle};

/// Whether the current session has shown signs of life
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartStatus {
    /// No session
    Idle,
    /// Started, no frame accepted yet
    Pending,
    /// At least one frame accepted
    Running,
    /// No frame accepted before the start timeout
    TimedOut,
}

/// Manages the lifecycle of the one active capture stream
pub struct StreamController<P: CaptureProvider> {
    provider: Arc<P>,
    consumer: Arc<dyn FrameConsumer>,
    output: FrameSender,
    current: Option<P::Stream>,
    target: Option<CapturableTarget>,
    stops_issued: u64,
    start_timeout: Option<Duration>,
    timed_out: Arc<Mutex<Option<Handle>>>,
    watchdog: Option<JoinHandle<()>>,
}

impl<P: CaptureProvider> StreamController<P> {
    /// Create a controller with no session.
    ///
    /// `output` must feed `consumer`, normally through a
    /// [`FrameQueue`](crate::delivery::FrameQueue).
    pub fn new(provider: Arc<P>, consumer: Arc<dyn FrameConsumer>, output: FrameSender) -> Self {
        Self {
            provider,
            consumer,
            output,
            current: None,
            target: None,
            stops_issued: 0,
            start_timeout: None,
            timed_out: Arc::new(Mutex::new(None)),
            watchdog: None,
        }
    }

    /// Warn when a started session produces no frame within `timeout`
    pub fn with_start_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.start_timeout = timeout;
        self
    }

    /// Handle of the current session
    pub fn current_session(&self) -> Option<Handle> {
        self.current.as_ref().map(|s| s.id())
    }

    /// Target the current session was built from
    pub fn current_target(&self) -> Option<&CapturableTarget> {
        self.target.as_ref()
    }

    /// Capture state of the current session
    pub fn state(&self) -> StreamState {
        self.current
            .as_ref()
            .map_or(StreamState::Stopped, |s| s.state())
    }

    /// Stops issued to superseded sessions so far
    pub fn stops_issued(&self) -> u64 {
        self.stops_issued
    }

    /// Start progress of the current session
    pub fn start_status(&self) -> StartStatus {
        let Some(handle) = self.current_session() else {
            return StartStatus::Idle;
        };
        if self.consumer.frames_from(handle) > 0 {
            StartStatus::Running
        } else if *self.timed_out.lock() == Some(handle) {
            StartStatus::TimedOut
        } else {
            StartStatus::Pending
        }
    }

    /// The start timeout as an error, if the current session hit it
    pub fn start_error(&self) -> Option<MirrorError> {
        match (self.start_status(), self.current_session(), self.start_timeout) {
            (StartStatus::TimedOut, Some(handle), Some(timeout)) => Some(MirrorError::StartTimeout {
                handle,
                timeout_ms: timeout.as_millis() as u64,
            }),
            _ => None,
        }
    }

    /// Capture the entry's target.
    ///
    /// Separators are ignored and return `Ok(None)`. Stream construction
    /// failures leave the current session untouched. A consumer registration
    /// failure is fatal: see [`MirrorError::is_fatal`].
    pub fn select_target(&mut self, entry: &TargetEntry) -> Result<Option<Handle>> {
        let Some(target) = entry.target() else {
            debug!("Separator selected, ignoring");
            return Ok(None);
        };

        let filter = ContentFilter::for_target(target);
        let stream = self
            .provider
            .create_stream(filter, StreamConfig::fixed())
            .context(format!("Creating stream for {}", target))?;
        let handle = stream.id();

        if !self.replace_session(Some(stream)) {
            return Ok(Some(handle));
        }
        self.target = Some(target.clone());

        let Some(stream) = self.current.as_mut() else {
            return Ok(None);
        };

        if let Err(e) = stream.add_output(self.output.clone(), OutputType::Screen) {
            error!("Frame consumer rejected for {}: {}", handle, e);
            let err = if matches!(e, MirrorError::ConsumerRegistrationFailed(_)) {
                e
            } else {
                MirrorError::ConsumerRegistrationFailed(e.to_string())
            };
            return Err(err.with_context(format!("Selecting {}", target)));
        }

        stream.start_capture();
        info!("Selected {} as {}", target, handle);

        self.arm_watchdog(handle);
        Ok(Some(handle))
    }

    /// Stop and discard the current session
    pub fn stop(&mut self) {
        self.replace_session(None);
        self.target = None;
    }

    /// Swap in `next`, stopping the superseded session exactly once.
    ///
    /// Assigning a session with the current handle keeps the existing one,
    /// issues no stop and returns false.
    fn replace_session(&mut self, next: Option<P::Stream>) -> bool {
        let next_id = next.as_ref().map(|s| s.id());

        if let Some(current) = self.current.as_mut() {
            if Some(current.id()) == next_id {
                debug!("{} is already current", current.id());
                return false;
            }
            current.stop_capture();
            self.stops_issued += 1;
            info!("Stopped superseded {}", current.id());
        }

        if let Some(watchdog) = self.watchdog.take() {
            watchdog.abort();
        }

        self.consumer.set_active_session(next_id);
        self.current = next;
        true
    }

    fn arm_watchdog(&mut self, handle: Handle) {
        let Some(timeout) = self.start_timeout else {
            return;
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            debug!("No tokio runtime, start watchdog disabled for {}", handle);
            return;
        };

        let consumer = self.consumer.clone();
        let timed_out = self.timed_out.clone();
        self.watchdog = Some(runtime.spawn(async move {
            tokio::time::sleep(timeout).await;
            if consumer.frames_from(handle) == 0 {
                warn!("{} produced no frames within {:?}", handle, timeout);
                *timed_out.lock() = Some(handle);
            }
        }));
    }
}

impl<P: CaptureProvider> Drop for StreamController<P> {
    fn drop(&mut self) {
        if let Some(watchdog) = self.watchdog.take() {
            watchdog.abort();
        }
    }
}
