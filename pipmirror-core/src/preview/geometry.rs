//! Aspect-ratio tracking for the preview window

use tracing::debug;

use super::HostWindow;

/// Ratio difference tolerated before the window is resized
pub const ASPECT_TOLERANCE: f64 = 0.01;

/// Width:height constraint of a window
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AspectRatio {
    pub width: f64,
    pub height: f64,
}

impl AspectRatio {
    /// No constraint; its ratio is NaN
    pub const UNSET: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Constraint matching a frame's pixel dimensions
    pub fn from_pixels(width: u32, height: u32) -> Self {
        Self::new(f64::from(width), f64::from(height))
    }

    /// `width / height`, NaN or infinite when unset or degenerate
    pub fn ratio(&self) -> f64 {
        self.width / self.height
    }

    /// Whether this constraint yields a usable ratio
    pub fn is_set(&self) -> bool {
        self.ratio().is_finite()
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

/// Whether a `width`x`height` frame calls for a new window constraint
pub fn needs_update(current: AspectRatio, width: u32, height: u32) -> bool {
    if width == 0 || height == 0 {
        return false;
    }
    let ratio = f64::from(width) / f64::from(height);
    !current.is_set() || (current.ratio() - ratio).abs() > ASPECT_TOLERANCE
}

/// Lock the window to the frame's proportions if they drifted.
///
/// Returns true when the constraint was replaced and a layout pass forced.
pub fn adapt_geometry<W: HostWindow + ?Sized>(window: &mut W, width: u32, height: u32) -> bool {
    let current = window.aspect_ratio();
    if !needs_update(current, width, height) {
        return false;
    }

    let next = AspectRatio::from_pixels(width, height);
    debug!("Aspect ratio {} -> {}", current, next);
    window.set_aspect_ratio(next);
    window.layout_if_needed();
    true
}
