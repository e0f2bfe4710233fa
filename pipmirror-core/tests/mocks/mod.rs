//! Mock infrastructure for testing
//!
//! Provides a scriptable capture provider, streams that record their
//! lifecycle, and recording preview collaborators.

#![allow(dead_code)]

use parking_lot::Mutex;
use pipmirror_core::capture::{
    CaptureProvider, CaptureStream, ContentFilter, OutputType, StreamState,
};
use pipmirror_core::config::StreamConfig;
use pipmirror_core::delivery::FrameSender;
use pipmirror_core::error::{MirrorError, Result};
use pipmirror_core::preview::{AspectRatio, HostWindow, PresentationSurface, WindowChrome, WindowLevel};
use pipmirror_core::types::{DisplayInfo, Handle, PixelBuffer, VideoFrame, WindowInfo};
use std::sync::Arc;

/// Create a BGRA frame of the given size filled with one color
pub fn create_test_frame(session: Handle, sequence: u64, width: u32, height: u32) -> VideoFrame {
    let data = [0x20, 0x40, 0x80, 0xff].repeat((width * height) as usize);
    VideoFrame::new(session, sequence, PixelBuffer::bgra(width, height, data))
}

/// Lifecycle event recorded by a mock stream
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    Created(Handle, ContentFilter),
    OutputAdded(Handle),
    Started(Handle),
    Stopped(Handle),
}

/// Shared record of everything mock streams did
#[derive(Default)]
pub struct StreamLog {
    events: Mutex<Vec<StreamEvent>>,
    outputs: Mutex<Vec<(Handle, FrameSender)>>,
}

impl StreamLog {
    pub fn events(&self) -> Vec<StreamEvent> {
        self.events.lock().clone()
    }

    /// Handles of every stop call, in order
    pub fn stops(&self) -> Vec<Handle> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                StreamEvent::Stopped(h) => Some(*h),
                _ => None,
            })
            .collect()
    }

    /// The sender registered with `session`
    pub fn sender_for(&self, session: Handle) -> Option<FrameSender> {
        self.outputs
            .lock()
            .iter()
            .find(|(h, _)| *h == session)
            .map(|(_, s)| s.clone())
    }

    fn push(&self, event: StreamEvent) {
        self.events.lock().push(event);
    }
}

/// Stream that records its lifecycle in a [`StreamLog`]
pub struct MockStream {
    id: Handle,
    filter: ContentFilter,
    state: StreamState,
    reject_output: bool,
    log: Arc<StreamLog>,
}

impl CaptureStream for MockStream {
    fn id(&self) -> Handle {
        self.id
    }

    fn filter(&self) -> &ContentFilter {
        &self.filter
    }

    fn add_output(&mut self, output: FrameSender, kind: OutputType) -> Result<()> {
        if self.reject_output || kind != OutputType::Screen {
            return Err(MirrorError::ConsumerRegistrationFailed(
                "mock rejected output".to_string(),
            ));
        }
        let mut outputs = self.log.outputs.lock();
        if outputs.iter().any(|(h, _)| *h == self.id) {
            return Err(MirrorError::ConsumerRegistrationFailed(
                "screen output already registered".to_string(),
            ));
        }
        outputs.push((self.id, output));
        drop(outputs);
        self.log.push(StreamEvent::OutputAdded(self.id));
        Ok(())
    }

    fn start_capture(&mut self) {
        self.state = StreamState::Capturing;
        self.log.push(StreamEvent::Started(self.id));
    }

    fn stop_capture(&mut self) {
        self.state = StreamState::Stopped;
        self.log.push(StreamEvent::Stopped(self.id));
    }

    fn state(&self) -> StreamState {
        self.state
    }
}

/// Scriptable capture provider
#[derive(Default)]
pub struct MockProvider {
    pub displays: Mutex<Vec<DisplayInfo>>,
    pub windows: Mutex<Vec<WindowInfo>>,
    pub fail_enumeration: Mutex<bool>,
    pub fail_create: Mutex<bool>,
    pub reject_output: Mutex<bool>,
    pub fixed_handle: Mutex<Option<Handle>>,
    pub list_window_args: Mutex<Vec<(bool, bool)>>,
    pub log: Arc<StreamLog>,
}

impl MockProvider {
    pub fn new(displays: Vec<DisplayInfo>, windows: Vec<WindowInfo>) -> Self {
        Self {
            displays: Mutex::new(displays),
            windows: Mutex::new(windows),
            ..Self::default()
        }
    }

    pub fn set_fail_enumeration(&self, fail: bool) {
        *self.fail_enumeration.lock() = fail;
    }
}

impl CaptureProvider for MockProvider {
    type Stream = MockStream;

    async fn list_displays(&self) -> Result<Vec<DisplayInfo>> {
        if *self.fail_enumeration.lock() {
            return Err(MirrorError::capture("screen recording not authorized"));
        }
        Ok(self.displays.lock().clone())
    }

    async fn list_windows(
        &self,
        exclude_desktop_owners: bool,
        on_screen_only: bool,
    ) -> Result<Vec<WindowInfo>> {
        self.list_window_args
            .lock()
            .push((exclude_desktop_owners, on_screen_only));
        if *self.fail_enumeration.lock() {
            return Err(MirrorError::capture("screen recording not authorized"));
        }
        Ok(self.windows.lock().clone())
    }

    fn create_stream(&self, filter: ContentFilter, config: StreamConfig) -> Result<MockStream> {
        assert_eq!(config, StreamConfig::fixed());
        if *self.fail_create.lock() {
            return Err(MirrorError::stream_start("mock create failure"));
        }
        let id = (*self.fixed_handle.lock()).unwrap_or_default();
        self.log.push(StreamEvent::Created(id, filter.clone()));
        Ok(MockStream {
            id,
            filter,
            state: StreamState::Stopped,
            reject_output: *self.reject_output.lock(),
            log: self.log.clone(),
        })
    }
}

/// Surface that remembers which frames it was given
#[derive(Default)]
pub struct RecordingSurface {
    pub frames: Vec<(Handle, u64)>,
}

impl PresentationSurface for RecordingSurface {
    fn enqueue(&mut self, frame: &VideoFrame) {
        self.frames.push((frame.session, frame.sequence));
    }
}

/// Host window that records geometry changes
#[derive(Default)]
pub struct RecordingWindow {
    pub ratio: AspectRatio,
    pub ratio_sets: Vec<AspectRatio>,
    pub layouts: u32,
    pub level: WindowLevel,
    pub movable: bool,
}

impl HostWindow for RecordingWindow {
    fn aspect_ratio(&self) -> AspectRatio {
        self.ratio
    }

    fn set_aspect_ratio(&mut self, ratio: AspectRatio) {
        self.ratio = ratio;
        self.ratio_sets.push(ratio);
    }

    fn layout_if_needed(&mut self) {
        self.layouts += 1;
    }

    fn set_level(&mut self, level: WindowLevel) {
        self.level = level;
    }

    fn set_movable_by_background(&mut self, movable: bool) {
        self.movable = movable;
    }
}

/// Chrome that records visibility calls
#[derive(Default)]
pub struct RecordingChrome {
    pub controls_visible: Option<bool>,
    pub title_bar_visible: Option<bool>,
    pub calls: u32,
}

impl WindowChrome for RecordingChrome {
    fn set_controls_visible(&mut self, visible: bool) {
        self.controls_visible = Some(visible);
        self.calls += 1;
    }

    fn set_title_bar_visible(&mut self, visible: bool) {
        self.title_bar_visible = Some(visible);
        self.calls += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_frame_dimensions() {
        let frame = create_test_frame(Handle::new(), 0, 16, 9);
        assert_eq!(frame.dimensions(), Some((16, 9)));
        assert_eq!(frame.pixel_buffer.map(|p| p.data.len()), Some(16 * 9 * 4));
    }

    #[test]
    fn test_mock_stream_logs_stop() {
        let provider = MockProvider::default();
        let filter = ContentFilter::for_target(&pipmirror_core::CapturableTarget::Display(
            DisplayInfo::new(1),
        ));
        let mut stream = provider
            .create_stream(filter, StreamConfig::fixed())
            .expect("Should create stream");
        stream.stop_capture();
        assert_eq!(provider.log.stops(), vec![stream.id()]);
    }
}
