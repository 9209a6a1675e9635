use super::grid::{Grid, GridItem};
use super::search::{bisect, BisectConfig, Midpoint};
use crate::error::Result;

/// Upper bound on bisection steps, whatever the cell sizes.
pub const MAX_ATTEMPTS: usize = 20;
/// Relative aspect-ratio error at which the search stops early.
pub const EPSILON: f64 = 0.01;

impl<'a, T> Grid<'a, T> {
    /// Width:height of the whole grid if every cell's item block were packed
    /// toward `cell_aspect_ratio`. Nothing is written to cells or items.
    ///
    /// Returns 0 for a grid without items or with an invalid configuration.
    pub fn compute_grid_aspect_ratio(&mut self, cell_aspect_ratio: f64) -> f64 {
        if let Err(e) = self.config.validate() {
            tracing::warn!("Cannot compute grid aspect ratio: {}", e);
            return 0.0;
        }
        if !self.is_faceted() {
            self.facet_items_into_cells();
        }
        self.grid_aspect_ratio(cell_aspect_ratio)
    }

    fn grid_aspect_ratio(&self, cell_aspect_ratio: f64) -> f64 {
        let frame = self.frame(&self.packings(cell_aspect_ratio));
        if frame.height <= 0.0 {
            return 0.0;
        }
        frame.width / frame.height
    }

    /// Search for the cell aspect ratio that makes the grid's aspect ratio
    /// match `target_aspect_ratio` (typically the viewport's).
    ///
    /// The bracket runs from the longest cell packed as one column to the
    /// longest cell packed as one row. The search is best effort: when the
    /// attempt budget runs out the closest candidate seen is returned. Empty
    /// grids, unusable targets and invalid configurations return the
    /// configured `cell_aspect_ratio` unchanged.
    pub fn compute_optimal_cell_aspect_ratio(&mut self, target_aspect_ratio: f64) -> f64 {
        let current = self.config.cell_aspect_ratio;
        if !(target_aspect_ratio.is_finite() && target_aspect_ratio > 0.0) {
            tracing::warn!(
                "Ignoring aspect ratio target {} (must be positive and finite)",
                target_aspect_ratio
            );
            return current;
        }
        if let Err(e) = self.config.validate() {
            tracing::warn!("Skipping aspect ratio search: {}", e);
            return current;
        }
        if !self.is_faceted() {
            self.facet_items_into_cells();
        }

        let longest = self.longest_cell_length();
        if longest == 0 {
            return current;
        }

        let item_ratio = self.config.item_aspect_ratio;
        let low = item_ratio / longest as f64;
        let high = item_ratio * longest as f64;
        let config = BisectConfig {
            max_attempts: MAX_ATTEMPTS.min((longest + 1).div_ceil(2)).max(1),
            epsilon: EPSILON,
            midpoint: Midpoint::Geometric,
        };

        let result = bisect(low, high, target_aspect_ratio, &config, |ratio| {
            self.grid_aspect_ratio(ratio)
        });

        tracing::debug!(
            "Cell aspect ratio {:.4} gives grid ratio {:.4} for target {:.4} (error {:.4}, {} attempts, converged={})",
            result.value,
            result.output,
            target_aspect_ratio,
            result.error,
            result.attempts,
            result.converged
        );
        result.value
    }

    /// Solve for `target_aspect_ratio`, store the result as the configured
    /// cell aspect ratio and arrange. Returns the chosen cell aspect ratio.
    pub fn fit_to_aspect_ratio(&mut self, target_aspect_ratio: f64) -> Result<f64>
    where
        T: GridItem,
    {
        self.config.validate()?;
        let ratio = self.compute_optimal_cell_aspect_ratio(target_aspect_ratio);
        self.config.cell_aspect_ratio = ratio;
        self.arrange()?;
        Ok(ratio)
    }
}
