use super::padding::{reduce_horizontal_padding, reduce_vertical_padding};
use crate::layout::Padding;

/// Pixel viewport size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn aspect_ratio(&self) -> f64 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitConfig {
    /// Preferred space around the grid (pixels)
    pub padding: Padding,
    /// Content width below which padding gives way (pixels)
    pub min_content_width: f64,
    /// Content height below which padding gives way (pixels)
    pub min_content_height: f64,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            padding: Padding::uniform(16.0),
            min_content_width: 200.0,
            min_content_height: 150.0,
        }
    }
}

/// Placement of a grid's bounding box inside a viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewFit {
    /// Pixels per packing unit
    pub scale: f64,
    /// Pixel position of the grid's top-left corner
    pub offset_x: f64,
    pub offset_y: f64,
    /// Padding actually applied after reduction
    pub padding: Padding,
    /// Grid-space point at the centre of the padded area
    pub center_x: f64,
    pub center_y: f64,
}

impl ViewFit {
    /// Map a grid-space point to viewport pixels (y grows downward in both).
    pub fn to_view(&self, x: f64, y: f64) -> (f64, f64) {
        (self.offset_x + x * self.scale, self.offset_y + y * self.scale)
    }
}

/// Fit a `width` x `height` grid into `viewport`, preserving aspect ratio and
/// centring it in whatever space the (possibly reduced) padding leaves.
pub fn fit_to_viewport(width: f64, height: f64, viewport: Viewport, config: &FitConfig) -> ViewFit {
    let padding = reduce_horizontal_padding(viewport.width, config.min_content_width, config.padding);
    let padding = reduce_vertical_padding(viewport.height, config.min_content_height, padding);

    let available_width = (viewport.width - padding.horizontal()).max(0.0);
    let available_height = (viewport.height - padding.vertical()).max(0.0);

    let scale = if width > 0.0 && height > 0.0 {
        (available_width / width).min(available_height / height)
    } else {
        1.0
    };

    let offset_x = padding.left + (available_width - width * scale) / 2.0;
    let offset_y = padding.top + (available_height - height * scale) / 2.0;

    tracing::trace!(
        "Fit {:.2}x{:.2} grid into {:.0}x{:.0} viewport at scale {:.4}",
        width,
        height,
        viewport.width,
        viewport.height,
        scale
    );

    ViewFit {
        scale,
        offset_x,
        offset_y,
        padding,
        center_x: width / 2.0,
        center_y: height / 2.0,
    }
}
