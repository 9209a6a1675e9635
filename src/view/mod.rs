//! Presentation-side helpers that consume a finished grid's bounding box.

pub mod fit;
pub mod padding;

pub use self::fit::{fit_to_viewport, FitConfig, ViewFit, Viewport};
pub use self::padding::{reduce_horizontal_padding, reduce_vertical_padding};
