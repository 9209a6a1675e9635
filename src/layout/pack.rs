/// Inputs for packing `n` equally-sized elements into a rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackConfig {
    /// Width:height of one element.
    pub item_aspect_ratio: f64,
    /// Width:height the packed block should approach (1.0 = square-ish).
    pub target_ratio: f64,
    /// Hard lower bound on the packed block's width:height.
    pub min_ratio: f64,
    /// Hard upper bound on the packed block's width:height.
    pub max_ratio: f64,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            item_aspect_ratio: 1.0,
            target_ratio: 1.0,
            min_ratio: 0.0,
            max_ratio: f64::INFINITY,
        }
    }
}

/// Column/row count chosen for a block of elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Packing {
    pub columns: usize,
    pub rows: usize,
}

impl Packing {
    /// Width:height of the packed block for elements of `item_aspect_ratio`.
    pub fn aspect_ratio(self, item_aspect_ratio: f64) -> f64 {
        if self.rows == 0 {
            return 0.0;
        }
        self.columns as f64 * item_aspect_ratio / self.rows as f64
    }

    /// Row-major `(column, row)` slot of the element at `index`.
    pub fn position(self, index: usize) -> (usize, usize) {
        if self.columns == 0 {
            return (0, 0);
        }
        (index % self.columns, index / self.columns)
    }

    pub fn capacity(self) -> usize {
        self.columns * self.rows
    }
}

/// Choose columns/rows for `n` elements, closest to `target_ratio` within the
/// hard bounds.
///
/// Closed form: the unconstrained candidate is the column count whose block
/// ratio is nearest the target. If that violates a bound, the single row
/// (widest possible block) or single column (tallest possible block) is the
/// only packing that can do better, so it is taken outright. With
/// `min_ratio > max_ratio` the lower bound is checked first and wins.
pub fn pack(n: usize, config: &PackConfig) -> Packing {
    if n == 0 {
        return Packing::default();
    }

    let item_ratio = sanitize_ratio(config.item_aspect_ratio);
    let target = sanitize_ratio(config.target_ratio);

    let columns = ((n as f64 * target / item_ratio).sqrt().round() as usize).clamp(1, n);
    let rows = n.div_ceil(columns);
    let candidate = Packing { columns, rows };
    let ratio = candidate.aspect_ratio(item_ratio);

    if ratio < config.min_ratio {
        Packing { columns: n, rows: 1 }
    } else if ratio > config.max_ratio {
        Packing { columns: 1, rows: n }
    } else {
        candidate
    }
}

/// Unusable ratios fall back to square.
fn sanitize_ratio(ratio: f64) -> f64 {
    if ratio.is_finite() && ratio > 0.0 {
        ratio
    } else {
        1.0
    }
}
