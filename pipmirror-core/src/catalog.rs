//! Capturable-source catalog
//!
//! Turns the provider's displays and windows into the flat, labelled list
//! the selection menu shows: every display first, a separator, then every
//! window tall enough to be more than menu-bar chrome.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::capture::CaptureProvider;
use crate::config::MIN_WINDOW_HEIGHT;
use crate::error::{MirrorError, Result, ResultExt};
use crate::types::{CapturableTarget, DisplayInfo, WindowInfo};

/// Placeholder for windows without a title
pub const UNTITLED: &str = "(Untitled)";

/// One row of the selection menu
#[derive(Debug, Clone, PartialEq)]
pub enum TargetEntry {
    /// A selectable source with its precomputed label
    Target {
        target: CapturableTarget,
        label: String,
    },
    /// Divider between displays and windows
    Separator,
}

impl TargetEntry {
    /// Build an entry for a display
    pub fn display(display: DisplayInfo) -> Self {
        Self::Target {
            label: display_label(&display),
            target: CapturableTarget::Display(display),
        }
    }

    /// Build an entry for a window
    pub fn window(window: WindowInfo) -> Self {
        Self::Target {
            label: window_label(&window),
            target: CapturableTarget::Window(window),
        }
    }

    /// The target, unless this is a separator
    pub fn target(&self) -> Option<&CapturableTarget> {
        match self {
            Self::Target { target, .. } => Some(target),
            Self::Separator => None,
        }
    }

    /// Menu label; empty for separators
    pub fn label(&self) -> &str {
        match self {
            Self::Target { label, .. } => label,
            Self::Separator => "",
        }
    }

    pub fn is_separator(&self) -> bool {
        matches!(self, Self::Separator)
    }
}

/// Display entries are labelled with the display id
pub fn display_label(display: &DisplayInfo) -> String {
    display.id.to_string()
}

/// `Title — App (Layer: L, Size: WxH)`; the app part is omitted when unknown
pub fn window_label(window: &WindowInfo) -> String {
    let mut label = window.title.as_deref().unwrap_or(UNTITLED).to_string();
    if let Some(app) = &window.app_name {
        label.push_str(" — ");
        label.push_str(app);
    }
    label.push_str(&format!(
        " (Layer: {}, Size: {}x{})",
        window.layer, window.size.0, window.size.1
    ));
    label
}

/// Ordered selection menu contents
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TargetList {
    entries: Vec<TargetEntry>,
}

impl TargetList {
    /// Build the list from enumeration results.
    ///
    /// Windows whose height does not exceed `min_window_height` are dropped;
    /// enumeration order is preserved otherwise.
    pub fn build(displays: Vec<DisplayInfo>, windows: Vec<WindowInfo>, min_window_height: f64) -> Self {
        let mut entries = Vec::with_capacity(displays.len() + windows.len() + 1);
        entries.extend(displays.into_iter().map(TargetEntry::display));
        entries.push(TargetEntry::Separator);

        let total = windows.len();
        entries.extend(
            windows
                .into_iter()
                .filter(|w| w.height() > min_window_height)
                .map(TargetEntry::window),
        );

        let list = Self { entries };
        debug!(
            "Built target list: {} displays, {} of {} windows",
            list.displays().count(),
            list.windows().count(),
            total
        );
        list
    }

    pub fn entries(&self) -> &[TargetEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `index`, rejecting out-of-range indices and separators
    pub fn selectable(&self, index: usize) -> Result<&TargetEntry> {
        match self.entries.get(index) {
            Some(TargetEntry::Separator) => Err(MirrorError::InvalidSelection(format!(
                "entry {} is a separator",
                index
            ))),
            Some(entry) => Ok(entry),
            None => Err(MirrorError::InvalidSelection(format!(
                "entry {} does not exist ({} entries)",
                index,
                self.entries.len()
            ))),
        }
    }

    /// Selectable targets in menu order
    pub fn targets(&self) -> impl Iterator<Item = &CapturableTarget> {
        self.entries.iter().filter_map(TargetEntry::target)
    }

    pub fn displays(&self) -> impl Iterator<Item = &DisplayInfo> {
        self.targets().filter_map(|t| match t {
            CapturableTarget::Display(d) => Some(d),
            CapturableTarget::Window(_) => None,
        })
    }

    pub fn windows(&self) -> impl Iterator<Item = &WindowInfo> {
        self.targets().filter_map(|t| match t {
            CapturableTarget::Window(w) => Some(w),
            CapturableTarget::Display(_) => None,
        })
    }
}

/// Source catalog holding the most recent successful refresh
pub struct SourceCatalog<P: CaptureProvider> {
    provider: Arc<P>,
    min_window_height: f64,
    current: TargetList,
}

impl<P: CaptureProvider> SourceCatalog<P> {
    /// Create an empty catalog using the default height threshold
    pub fn new(provider: Arc<P>) -> Self {
        Self {
            provider,
            min_window_height: MIN_WINDOW_HEIGHT,
            current: TargetList::default(),
        }
    }

    /// Override the minimum window height
    pub fn with_min_window_height(mut self, height: f64) -> Self {
        self.min_window_height = height;
        self
    }

    /// The list from the last successful refresh
    pub fn current(&self) -> &TargetList {
        &self.current
    }

    /// Re-enumerate sources and replace the list.
    ///
    /// On failure the previous list is kept and the error is returned; no
    /// retry is attempted.
    pub async fn refresh(&mut self) -> Result<&TargetList> {
        match self.enumerate().await {
            Ok(list) => {
                info!(
                    "Source catalog refreshed: {} selectable entries",
                    list.targets().count()
                );
                self.current = list;
                Ok(&self.current)
            }
            Err(e) => {
                warn!("Source catalog refresh failed, keeping previous list: {}", e);
                Err(e)
            }
        }
    }

    async fn enumerate(&self) -> Result<TargetList> {
        let displays = self
            .provider
            .list_displays()
            .await
            .context("Listing displays")?;
        let windows = self
            .provider
            .list_windows(true, true)
            .await
            .context("Listing windows")?;

        Ok(TargetList::build(displays, windows, self.min_window_height))
    }
}
