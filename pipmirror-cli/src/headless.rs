//! Terminal stand-ins for the preview window
//!
//! The surface counts frames instead of drawing them and the window prints
//! geometry changes, so the full capture path can run from a shell.

use pipmirror_core::preview::{
    AspectRatio, HostWindow, PresentationSurface, WindowChrome, WindowLevel,
};
use pipmirror_core::types::VideoFrame;
use tracing::{debug, trace};

/// Surface that tallies frames
#[derive(Debug, Default)]
pub struct TerminalSurface {
    frames: u64,
    last_size: Option<(u32, u32)>,
}

impl TerminalSurface {
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn last_size(&self) -> Option<(u32, u32)> {
        self.last_size
    }
}

impl PresentationSurface for TerminalSurface {
    fn enqueue(&mut self, frame: &VideoFrame) {
        self.frames += 1;
        if let Some(size) = frame.dimensions() {
            self.last_size = Some(size);
        }
        trace!("Presented frame {} of {}", frame.sequence, frame.session);
    }
}

/// Window that reports geometry instead of laying anything out
#[derive(Debug, Default)]
pub struct HeadlessWindow {
    ratio: AspectRatio,
    layouts: u32,
}

impl HeadlessWindow {
    pub fn layouts(&self) -> u32 {
        self.layouts
    }
}

impl HostWindow for HeadlessWindow {
    fn aspect_ratio(&self) -> AspectRatio {
        self.ratio
    }

    fn set_aspect_ratio(&mut self, ratio: AspectRatio) {
        println!("Preview aspect ratio -> {}", ratio);
        self.ratio = ratio;
    }

    fn layout_if_needed(&mut self) {
        self.layouts += 1;
    }

    fn set_level(&mut self, level: WindowLevel) {
        debug!("Preview window level: {:?}", level);
    }

    fn set_movable_by_background(&mut self, movable: bool) {
        debug!("Preview movable by background: {}", movable);
    }
}

/// Chrome of the terminal preview: the status lines around the video
#[derive(Debug, Default)]
pub struct TerminalChrome {
    controls: bool,
    title_bar: bool,
}

impl TerminalChrome {
    pub fn visible(&self) -> bool {
        self.controls && self.title_bar
    }
}

impl WindowChrome for TerminalChrome {
    fn set_controls_visible(&mut self, visible: bool) {
        debug!("Preview controls visible: {}", visible);
        self.controls = visible;
    }

    fn set_title_bar_visible(&mut self, visible: bool) {
        debug!("Preview title bar visible: {}", visible);
        self.title_bar = visible;
    }
}
