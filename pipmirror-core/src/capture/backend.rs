//! Capture backend built on xcap
//!
//! Enumerates monitors and windows through xcap and streams a source by
//! grabbing it at a fixed rate on the blocking pool.

use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, trace, warn};

use super::{CaptureProvider, CaptureStream, ContentFilter, OutputType, StreamState};
use crate::config::{MirrorConfig, StreamConfig};
use crate::delivery::FrameSender;
use crate::error::{MirrorError, Result};
use crate::types::{DisplayInfo, Handle, PixelBuffer, PixelFormat, VideoFrame, WindowInfo};

/// Capture provider backed by xcap
#[derive(Debug, Clone)]
pub struct XcapProvider {
    frame_interval: Duration,
    desktop_owner_apps: Vec<String>,
}

impl XcapProvider {
    /// Create a provider from runtime settings
    pub fn new(config: &MirrorConfig) -> Self {
        Self {
            frame_interval: config.frame_interval(),
            desktop_owner_apps: config.desktop_owner_apps.clone(),
        }
    }
}

impl Default for XcapProvider {
    fn default() -> Self {
        Self::new(&MirrorConfig::default())
    }
}

impl CaptureProvider for XcapProvider {
    type Stream = XcapStream;

    async fn list_displays(&self) -> Result<Vec<DisplayInfo>> {
        tokio::task::spawn_blocking(enumerate_displays)
            .await
            .map_err(|e| MirrorError::capture(format!("Display enumeration task failed: {}", e)))?
    }

    async fn list_windows(
        &self,
        exclude_desktop_owners: bool,
        on_screen_only: bool,
    ) -> Result<Vec<WindowInfo>> {
        let owners = if exclude_desktop_owners {
            self.desktop_owner_apps.clone()
        } else {
            Vec::new()
        };

        tokio::task::spawn_blocking(move || enumerate_windows(&owners, on_screen_only))
            .await
            .map_err(|e| MirrorError::capture(format!("Window enumeration task failed: {}", e)))?
    }

    fn create_stream(&self, filter: ContentFilter, config: StreamConfig) -> Result<XcapStream> {
        if config.queue_depth == 0 {
            return Err(MirrorError::stream_start("queue depth must be at least 1"));
        }
        if config.shows_cursor {
            warn!("Cursor overlay is not supported by the xcap backend; frames omit the cursor");
        }

        Ok(XcapStream {
            id: Handle::new(),
            filter,
            config,
            frame_interval: self.frame_interval,
            output: None,
            state: StreamState::Stopped,
            shutdown: None,
        })
    }
}

fn enumerate_displays() -> Result<Vec<DisplayInfo>> {
    let monitors = ::xcap::Monitor::all()?;

    let displays: Vec<DisplayInfo> = monitors
        .iter()
        .enumerate()
        .filter_map(|(idx, m)| match m.id() {
            Ok(id) => Some(DisplayInfo::new(id)),
            Err(e) => {
                debug!("Skipping monitor {}: failed to read id: {}", idx, e);
                None
            }
        })
        .collect();

    debug!("Enumerated {} displays", displays.len());
    Ok(displays)
}

fn enumerate_windows(desktop_owner_apps: &[String], on_screen_only: bool) -> Result<Vec<WindowInfo>> {
    let windows = ::xcap::Window::all()?;
    let total = windows.len();

    let result: Vec<WindowInfo> = windows
        .iter()
        .filter_map(|w| {
            let id = w.id().ok()?;

            if on_screen_only && w.is_minimized().unwrap_or(false) {
                trace!("Skipping minimized window {}", id);
                return None;
            }

            let app_name = w.app_name().ok().filter(|name| !name.is_empty());
            if let Some(app) = &app_name {
                if desktop_owner_apps.iter().any(|owner| owner == app) {
                    trace!("Skipping desktop-owner window {} ({})", id, app);
                    return None;
                }
            }

            let (width, height) = match (w.width(), w.height()) {
                (Ok(width), Ok(height)) => (width, height),
                _ => {
                    debug!("Skipping window {}: failed to read frame size", id);
                    return None;
                }
            };

            Some(WindowInfo {
                id,
                title: w.title().ok().filter(|title| !title.is_empty()),
                app_name,
                layer: w.z().unwrap_or(0),
                size: (f64::from(width), f64::from(height)),
            })
        })
        .collect();

    debug!("Enumerated {} of {} windows", result.len(), total);
    Ok(result)
}

/// Grab one frame of the filtered content as BGRA
fn grab(filter: &ContentFilter) -> Result<PixelBuffer> {
    let image = match filter {
        ContentFilter::DesktopIndependentWindow(target) => ::xcap::Window::all()?
            .into_iter()
            .find(|w| w.id().ok() == Some(target.id))
            .ok_or_else(|| MirrorError::stream_start(format!("window {} is gone", target.id)))?
            .capture_image()?,
        ContentFilter::Display { display, .. } => ::xcap::Monitor::all()?
            .into_iter()
            .find(|m| m.id().ok() == Some(display.id))
            .ok_or_else(|| MirrorError::stream_start(format!("display {} is gone", display.id)))?
            .capture_image()?,
    };

    let (width, height) = (image.width(), image.height());
    let mut data = image.into_raw();
    // RGBA -> BGRA
    for px in data.chunks_exact_mut(PixelFormat::Bgra32.bytes_per_pixel()) {
        px.swap(0, 2);
    }

    Ok(PixelBuffer::bgra(width, height, data))
}

/// Polling capture stream for one content filter
pub struct XcapStream {
    id: Handle,
    filter: ContentFilter,
    config: StreamConfig,
    frame_interval: Duration,
    output: Option<FrameSender>,
    state: StreamState,
    shutdown: Option<watch::Sender<bool>>,
}

impl XcapStream {
    /// Configuration this stream was created with
    pub fn config(&self) -> &StreamConfig {
        &self.config
    }
}

impl CaptureStream for XcapStream {
    fn id(&self) -> Handle {
        self.id
    }

    fn filter(&self) -> &ContentFilter {
        &self.filter
    }

    fn add_output(&mut self, output: FrameSender, kind: OutputType) -> Result<()> {
        if kind != OutputType::Screen {
            return Err(MirrorError::ConsumerRegistrationFailed(format!(
                "{:?} output is not supported",
                kind
            )));
        }
        if self.config.pixel_format != PixelFormat::Bgra32 {
            return Err(MirrorError::ConsumerRegistrationFailed(format!(
                "pixel format {:?} is not supported",
                self.config.pixel_format
            )));
        }
        if self.output.is_some() {
            return Err(MirrorError::ConsumerRegistrationFailed(
                "screen output already registered".to_string(),
            ));
        }

        self.output = Some(output);
        Ok(())
    }

    fn start_capture(&mut self) {
        if self.state == StreamState::Capturing {
            return;
        }

        let Some(output) = self.output.clone() else {
            warn!("{} started without a screen output; ignoring", self.id);
            return;
        };

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                warn!("{} cannot start outside a tokio runtime: {}", self.id, e);
                return;
            }
        };

        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let id = self.id;
        let filter = self.filter.clone();
        let interval = self.frame_interval;

        // Detached: stop_capture signals the task and never waits for it.
        runtime.spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut sequence = 0u64;

            loop {
                tokio::select! {
                    _ = shutdown_rx.changed() => break,
                    _ = ticker.tick() => {}
                }

                let filter = filter.clone();
                match tokio::task::spawn_blocking(move || grab(&filter)).await {
                    Ok(Ok(buffer)) => {
                        if *shutdown_rx.borrow() {
                            break;
                        }
                        output.try_deliver(VideoFrame::new(id, sequence, buffer));
                        sequence += 1;
                    }
                    Ok(Err(e)) => debug!("{} failed to grab frame: {}", id, e),
                    Err(e) => {
                        warn!("{} capture task failed: {}", id, e);
                        break;
                    }
                }

                if output.is_closed() {
                    break;
                }
            }

            info!("{} capture loop ended after {} frames", id, sequence);
        });

        self.shutdown = Some(shutdown_tx);
        self.state = StreamState::Capturing;
        info!("{} capturing {} every {:?}", self.id, self.filter, interval);
    }

    fn stop_capture(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(true);
            info!("{} stop requested", self.id);
        }
        self.state = StreamState::Stopped;
    }

    fn state(&self) -> StreamState {
        self.state
    }
}

impl Drop for XcapStream {
    fn drop(&mut self) {
        self.stop_capture();
    }
}
