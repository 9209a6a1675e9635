pub mod grid;
pub mod pack;
pub mod search;
pub mod solve;

pub use self::grid::{Cell, CellId, Grid, GridItem, Siblings};
pub use self::pack::{pack, PackConfig, Packing};
pub use self::search::{bisect, BisectConfig, BisectResult, Midpoint};

use crate::error::{GridError, Result};

/// Per-side padding in packing units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Padding {
    pub const ZERO: Padding = Padding::uniform(0.0);

    pub const fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

/// Whether cells sharing a row/column keep their own footprint or stretch to
/// the row/column maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridAlignment {
    Tight,
    #[default]
    Uniform,
}

/// Configuration for grid layout. Everything here may change between
/// `arrange()` calls without re-faceting.
#[derive(Debug, Clone)]
pub struct GridConfig {
    /// Gap between adjacent cells (packing units)
    pub cell_margin: f64,
    /// Space between a cell's edge and its items
    pub cell_padding: Padding,
    /// Width:height of one item
    pub item_aspect_ratio: f64,
    /// Width:height each cell's item block approaches (1.0 = square-ish).
    /// This is what `compute_optimal_cell_aspect_ratio` solves for.
    pub cell_aspect_ratio: f64,
    /// Hard lower bound on a cell's item block width:height
    pub min_cell_aspect_ratio: f64,
    /// Hard upper bound on a cell's item block width:height
    pub max_cell_aspect_ratio: f64,
    /// Row heights: Uniform stretches each cell to its row's tallest cell
    pub vertical_alignment: GridAlignment,
    /// Column widths: Uniform stretches each cell to its column's widest cell
    pub horizontal_alignment: GridAlignment,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_margin: 0.0,
            cell_padding: Padding::ZERO,
            item_aspect_ratio: 1.0,
            cell_aspect_ratio: 1.0,
            min_cell_aspect_ratio: 0.0,
            max_cell_aspect_ratio: f64::INFINITY,
            vertical_alignment: GridAlignment::Uniform,
            horizontal_alignment: GridAlignment::Uniform,
        }
    }
}

impl GridConfig {
    /// Reject values that would produce NaN or negative geometry.
    pub fn validate(&self) -> Result<()> {
        non_negative("cell_margin", self.cell_margin)?;
        non_negative("cell_padding.top", self.cell_padding.top)?;
        non_negative("cell_padding.right", self.cell_padding.right)?;
        non_negative("cell_padding.bottom", self.cell_padding.bottom)?;
        non_negative("cell_padding.left", self.cell_padding.left)?;
        positive("item_aspect_ratio", self.item_aspect_ratio)?;
        positive("cell_aspect_ratio", self.cell_aspect_ratio)?;
        // Bounds may be infinite, and may even cross; only NaN is meaningless.
        if self.min_cell_aspect_ratio.is_nan() {
            return Err(invalid("min_cell_aspect_ratio", self.min_cell_aspect_ratio));
        }
        if self.max_cell_aspect_ratio.is_nan() {
            return Err(invalid("max_cell_aspect_ratio", self.max_cell_aspect_ratio));
        }
        Ok(())
    }

    /// Packer settings for one cell, packing toward `cell_aspect_ratio`.
    pub fn pack_config(&self, cell_aspect_ratio: f64) -> PackConfig {
        PackConfig {
            item_aspect_ratio: self.item_aspect_ratio,
            target_ratio: cell_aspect_ratio,
            min_ratio: self.min_cell_aspect_ratio,
            max_ratio: self.max_cell_aspect_ratio,
        }
    }
}

fn invalid(field: &'static str, value: f64) -> GridError {
    GridError::InvalidConfig { field, value }
}

fn non_negative(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value))
    }
}

fn positive(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value))
    }
}
