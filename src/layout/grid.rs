use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fmt;

use rayon::prelude::*;

use super::pack::{pack, Packing};
use super::{GridAlignment, GridConfig};
use crate::error::Result;
use crate::facet::{
    horizontal_string_compare, no_facet, vertical_string_compare, Comparator, FacetFn, Key,
};

/// Grids with at least this many cells pack them on the rayon pool.
const PARALLEL_CELL_THRESHOLD: usize = 512;

/// A record the grid can place. `arrange()` writes each item's final
/// top-left position (packing units) through this.
pub trait GridItem {
    fn set_position(&mut self, x: f64, y: f64);
}

/// Index into the grid's cell arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(pub u32);

impl CellId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Neighbouring cells by key rank. `above` is one vertical rank higher,
/// `right` one horizontal rank higher. Pure lookups, never ownership.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Siblings {
    pub above: Option<CellId>,
    pub below: Option<CellId>,
    pub left: Option<CellId>,
    pub right: Option<CellId>,
}

/// One (vertical key, horizontal key) bucket and its geometry.
#[derive(Debug, Clone)]
pub struct Cell {
    pub vertical_key: Key,
    pub horizontal_key: Key,
    /// Indices into the source items, in source order
    pub items: Vec<usize>,
    /// Column rank (index into `horizontal_keys`)
    pub x: usize,
    /// Row rank (index into `vertical_keys`)
    pub y: usize,
    /// Offset of the cell's left edge within the grid
    pub left: f64,
    /// Offset of the cell's top edge within the grid
    pub top: f64,
    pub width: f64,
    pub height: f64,
    /// `width` minus left/right padding
    pub inner_width: f64,
    /// `height` minus top/bottom padding
    pub inner_height: f64,
    /// Offset of the item block from the cell's left edge
    pub content_x: f64,
    /// Offset of the item block from the cell's top edge
    pub content_y: f64,
    /// Columns/rows of the item block
    pub packing: Packing,
    pub siblings: Siblings,
}

impl Cell {
    fn new(vertical_key: Key, horizontal_key: Key) -> Self {
        Self {
            vertical_key,
            horizontal_key,
            items: Vec::new(),
            x: 0,
            y: 0,
            left: 0.0,
            top: 0.0,
            width: 0.0,
            height: 0.0,
            inner_width: 0.0,
            inner_height: 0.0,
            content_x: 0.0,
            content_y: 0.0,
            packing: Packing::default(),
            siblings: Siblings::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Slot sizes and per-cell offsets for one set of cell packings.
#[derive(Debug, Clone, Default)]
pub(crate) struct Frame {
    pub column_widths: Vec<f64>,
    pub row_heights: Vec<f64>,
    /// Left edge of each cell, in cell order
    pub lefts: Vec<f64>,
    /// Top edge of each cell, in cell order
    pub tops: Vec<f64>,
    pub width: f64,
    pub height: f64,
}

/// Faceted grid over a caller-owned slice of items.
///
/// The grid borrows the items for its whole lifetime; it never reorders them
/// and only writes positions through [`GridItem::set_position`].
pub struct Grid<'a, T> {
    items: &'a mut [T],
    pub config: GridConfig,
    vertical_facet: FacetFn<'a, T>,
    horizontal_facet: FacetFn<'a, T>,
    vertical_key_compare: Comparator,
    horizontal_key_compare: Comparator,

    cells: Vec<Cell>,
    cell_index: HashMap<(Key, Key), CellId>,
    vertical_keys: Vec<Key>,
    horizontal_keys: Vec<Key>,
    longest_cell_length: usize,
    width: f64,
    height: f64,
    faceted: bool,
}

impl<'a, T> Grid<'a, T> {
    /// Grid with a single bucket (no facets) and default configuration.
    pub fn new(items: &'a mut [T]) -> Self {
        Self {
            items,
            config: GridConfig::default(),
            vertical_facet: Box::new(no_facet::<T>),
            horizontal_facet: Box::new(no_facet::<T>),
            vertical_key_compare: vertical_string_compare,
            horizontal_key_compare: horizontal_string_compare,
            cells: Vec::new(),
            cell_index: HashMap::new(),
            vertical_keys: Vec::new(),
            horizontal_keys: Vec::new(),
            longest_cell_length: 0,
            width: 0.0,
            height: 0.0,
            faceted: false,
        }
    }

    pub fn with_config(mut self, config: GridConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_vertical_facet<F>(mut self, facet: F) -> Self
    where
        F: Fn(&T) -> Key + Send + Sync + 'a,
    {
        self.set_vertical_facet(facet);
        self
    }

    pub fn with_horizontal_facet<F>(mut self, facet: F) -> Self
    where
        F: Fn(&T) -> Key + Send + Sync + 'a,
    {
        self.set_horizontal_facet(facet);
        self
    }

    pub fn with_vertical_key_compare(mut self, compare: Comparator) -> Self {
        self.set_vertical_key_compare(compare);
        self
    }

    pub fn with_horizontal_key_compare(mut self, compare: Comparator) -> Self {
        self.set_horizontal_key_compare(compare);
        self
    }

    // Changing how items are bucketed or ordered invalidates the faceting.

    pub fn set_vertical_facet<F>(&mut self, facet: F)
    where
        F: Fn(&T) -> Key + Send + Sync + 'a,
    {
        self.vertical_facet = Box::new(facet);
        self.faceted = false;
    }

    pub fn set_horizontal_facet<F>(&mut self, facet: F)
    where
        F: Fn(&T) -> Key + Send + Sync + 'a,
    {
        self.horizontal_facet = Box::new(facet);
        self.faceted = false;
    }

    pub fn set_vertical_key_compare(&mut self, compare: Comparator) {
        self.vertical_key_compare = compare;
        self.faceted = false;
    }

    pub fn set_horizontal_key_compare(&mut self, compare: Comparator) {
        self.horizontal_key_compare = compare;
        self.faceted = false;
    }

    /// Bucket every item by its (vertical, horizontal) key pair and sort the
    /// distinct keys of each axis. Any previous buckets are discarded.
    pub fn facet_items_into_cells(&mut self) {
        self.cells.clear();
        self.cell_index.clear();
        self.vertical_keys.clear();
        self.horizontal_keys.clear();
        self.width = 0.0;
        self.height = 0.0;

        for (index, item) in self.items.iter().enumerate() {
            let vertical = (self.vertical_facet)(item);
            let horizontal = (self.horizontal_facet)(item);

            let id = match self.cell_index.entry((vertical, horizontal)) {
                Entry::Occupied(entry) => *entry.get(),
                Entry::Vacant(entry) => {
                    let id = CellId(self.cells.len() as u32);
                    let (v, h) = entry.key().clone();
                    self.cells.push(Cell::new(v, h));
                    entry.insert(id);
                    id
                }
            };
            self.cells[id.index()].items.push(index);
        }

        self.vertical_keys = distinct_sorted(
            self.cells.iter().map(|c| &c.vertical_key),
            self.vertical_key_compare,
        );
        self.horizontal_keys = distinct_sorted(
            self.cells.iter().map(|c| &c.horizontal_key),
            self.horizontal_key_compare,
        );

        let vertical_rank = rank_map(&self.vertical_keys);
        let horizontal_rank = rank_map(&self.horizontal_keys);
        for cell in &mut self.cells {
            cell.y = vertical_rank[&cell.vertical_key];
            cell.x = horizontal_rank[&cell.horizontal_key];
        }

        self.longest_cell_length = self.cells.iter().map(Cell::len).max().unwrap_or(0);
        self.faceted = true;

        tracing::debug!(
            "Faceted {} items into {} cells ({} rows x {} columns, longest cell {})",
            self.items.len(),
            self.cells.len(),
            self.vertical_keys.len(),
            self.horizontal_keys.len(),
            self.longest_cell_length
        );
    }

    /// Compute geometry for every cell and item, faceting first if needed.
    ///
    /// The configuration is validated before anything is written; on error the
    /// grid and the items are left as they were.
    pub fn arrange(&mut self) -> Result<()>
    where
        T: GridItem,
    {
        self.config.validate()?;
        if !self.faceted {
            self.facet_items_into_cells();
        }

        let packings = self.packings(self.config.cell_aspect_ratio);
        let frame = self.frame(&packings);

        let padding = self.config.cell_padding;
        let item_ratio = self.config.item_aspect_ratio;
        let horizontal_alignment = self.config.horizontal_alignment;
        let vertical_alignment = self.config.vertical_alignment;

        for (i, (cell, &packing)) in self.cells.iter_mut().zip(&packings).enumerate() {
            let content_width = packing.columns as f64 * item_ratio;
            let content_height = packing.rows as f64;

            cell.packing = packing;
            cell.left = frame.lefts[i];
            cell.top = frame.tops[i];
            cell.width = match horizontal_alignment {
                GridAlignment::Uniform => frame.column_widths[cell.x],
                GridAlignment::Tight => content_width + padding.horizontal(),
            };
            cell.height = match vertical_alignment {
                GridAlignment::Uniform => frame.row_heights[cell.y],
                GridAlignment::Tight => content_height + padding.vertical(),
            };
            cell.inner_width = cell.width - padding.horizontal();
            cell.inner_height = cell.height - padding.vertical();
            cell.content_x = padding.left;
            cell.content_y = padding.top;

            let origin_x = cell.left + cell.content_x;
            let origin_y = cell.top + cell.content_y;
            for (slot, &index) in cell.items.iter().enumerate() {
                let (column, row) = packing.position(slot);
                self.items[index]
                    .set_position(origin_x + column as f64 * item_ratio, origin_y + row as f64);
            }
        }

        self.width = frame.width;
        self.height = frame.height;
        self.link_siblings();

        tracing::debug!(
            "Arranged {} cells: grid {:.2}x{:.2} (cell aspect ratio {:.3})",
            self.cells.len(),
            self.width,
            self.height,
            self.config.cell_aspect_ratio
        );
        Ok(())
    }

    fn link_siblings(&mut self) {
        let by_rank: HashMap<(usize, usize), CellId> = self
            .cells
            .iter()
            .enumerate()
            .map(|(i, cell)| ((cell.x, cell.y), CellId(i as u32)))
            .collect();
        let at = |x: Option<usize>, y: Option<usize>| -> Option<CellId> {
            by_rank.get(&(x?, y?)).copied()
        };

        for cell in &mut self.cells {
            let (x, y) = (cell.x, cell.y);
            cell.siblings = Siblings {
                above: at(Some(x), y.checked_add(1)),
                below: at(Some(x), y.checked_sub(1)),
                left: at(x.checked_sub(1), Some(y)),
                right: at(x.checked_add(1), Some(y)),
            };
        }
    }

    /// Packing of every cell toward `cell_aspect_ratio`, in cell order.
    pub(crate) fn packings(&self, cell_aspect_ratio: f64) -> Vec<Packing> {
        let config = self.config.pack_config(cell_aspect_ratio);
        if self.cells.len() >= PARALLEL_CELL_THRESHOLD {
            self.cells
                .par_iter()
                .map(|cell| pack(cell.len(), &config))
                .collect()
        } else {
            self.cells.iter().map(|cell| pack(cell.len(), &config)).collect()
        }
    }

    /// Slot sizes and cell offsets for the given packings.
    ///
    /// Slots are as large as their largest cell and `cell_margin` separates
    /// neighbours. With `Tight` horizontal alignment each row is laid out from
    /// its cells' own widths, so columns no longer line up and the bounding
    /// box shrinks to the widest row. Otherwise `Tight` vertical alignment does
    /// the same per column. Rows take precedence when both axes are `Tight`,
    /// which keeps cells from overlapping.
    pub(crate) fn frame(&self, packings: &[Packing]) -> Frame {
        let padding = self.config.cell_padding;
        let item_ratio = self.config.item_aspect_ratio;
        let margin = self.config.cell_margin;

        let outer_widths: Vec<f64> = packings
            .iter()
            .map(|p| p.columns as f64 * item_ratio + padding.horizontal())
            .collect();
        let outer_heights: Vec<f64> = packings
            .iter()
            .map(|p| p.rows as f64 + padding.vertical())
            .collect();

        let mut column_widths = vec![0.0f64; self.horizontal_keys.len()];
        let mut row_heights = vec![0.0f64; self.vertical_keys.len()];
        for (i, cell) in self.cells.iter().enumerate() {
            column_widths[cell.x] = column_widths[cell.x].max(outer_widths[i]);
            row_heights[cell.y] = row_heights[cell.y].max(outer_heights[i]);
        }

        let (column_offsets, mut width) = accumulate(&column_widths, margin);
        let (row_offsets, mut height) = accumulate(&row_heights, margin);
        let mut lefts: Vec<f64> = self.cells.iter().map(|c| column_offsets[c.x]).collect();
        let mut tops: Vec<f64> = self.cells.iter().map(|c| row_offsets[c.y]).collect();

        let columns: Vec<usize> = self.cells.iter().map(|c| c.x).collect();
        let rows: Vec<usize> = self.cells.iter().map(|c| c.y).collect();
        if self.config.horizontal_alignment == GridAlignment::Tight {
            (lefts, width) = flow(&rows, &columns, &outer_widths, row_heights.len(), margin);
        } else if self.config.vertical_alignment == GridAlignment::Tight {
            (tops, height) = flow(&columns, &rows, &outer_heights, column_widths.len(), margin);
        }

        Frame {
            column_widths,
            row_heights,
            lefts,
            tops,
            width,
            height,
        }
    }

    pub fn is_faceted(&self) -> bool {
        self.faceted
    }

    pub fn items(&self) -> &[T] {
        &*self.items
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, id: CellId) -> &Cell {
        &self.cells[id.index()]
    }

    pub fn cell_id(&self, vertical_key: &Key, horizontal_key: &Key) -> Option<CellId> {
        self.cell_index
            .get(&(vertical_key.clone(), horizontal_key.clone()))
            .copied()
    }

    pub fn get_cell(&self, vertical_key: &Key, horizontal_key: &Key) -> Option<&Cell> {
        self.cell_id(vertical_key, horizontal_key)
            .map(|id| self.cell(id))
    }

    /// The cell the item at `index` was bucketed into.
    pub fn cell_for_item(&self, index: usize) -> Option<&Cell> {
        let item = self.items.get(index)?;
        self.get_cell(&(self.vertical_facet)(item), &(self.horizontal_facet)(item))
    }

    /// Vertical keys in row order (row 0 first).
    pub fn vertical_keys(&self) -> &[Key] {
        &self.vertical_keys
    }

    /// Horizontal keys in column order (column 0 first).
    pub fn horizontal_keys(&self) -> &[Key] {
        &self.horizontal_keys
    }

    /// Item count of the most populous cell.
    pub fn longest_cell_length(&self) -> usize {
        self.longest_cell_length
    }

    /// Bounding box width after `arrange()`.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Bounding box height after `arrange()`.
    pub fn height(&self) -> f64 {
        self.height
    }
}

impl<T> fmt::Debug for Grid<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("items", &self.items.len())
            .field("config", &self.config)
            .field("cells", &self.cells.len())
            .field("vertical_keys", &self.vertical_keys)
            .field("horizontal_keys", &self.horizontal_keys)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

fn distinct_sorted<'k>(keys: impl Iterator<Item = &'k Key>, compare: Comparator) -> Vec<Key> {
    let mut seen = HashSet::new();
    let mut distinct: Vec<Key> = keys.filter(|k| seen.insert(*k)).cloned().collect();
    distinct.sort_by(compare);
    debug_assert!(
        distinct.windows(2).all(|w| compare(&w[0], &w[1]).is_lt()),
        "key comparator must order distinct keys strictly"
    );
    distinct
}

fn rank_map(keys: &[Key]) -> HashMap<&Key, usize> {
    keys.iter().enumerate().map(|(rank, key)| (key, rank)).collect()
}

/// Running offsets of `sizes` separated by `margin`, and the total extent.
fn accumulate(sizes: &[f64], margin: f64) -> (Vec<f64>, f64) {
    let mut offsets = Vec::with_capacity(sizes.len());
    let mut cursor = 0.0;
    for (i, &size) in sizes.iter().enumerate() {
        if i > 0 {
            cursor += margin;
        }
        offsets.push(cursor);
        cursor += size;
    }
    (offsets, cursor)
}

/// Offsets of cells laid edge to edge within their lane (a row or a column),
/// in rank order, and the extent of the longest lane.
fn flow(lane: &[usize], rank: &[usize], sizes: &[f64], lanes: usize, margin: f64) -> (Vec<f64>, f64) {
    let mut order: Vec<usize> = (0..sizes.len()).collect();
    order.sort_by_key(|&i| rank[i]);

    let mut offsets = vec![0.0; sizes.len()];
    let mut ends: Vec<Option<f64>> = vec![None; lanes];
    for i in order {
        let end = &mut ends[lane[i]];
        let start = end.map_or(0.0, |e| e + margin);
        offsets[i] = start;
        *end = Some(start + sizes[i]);
    }
    let extent = ends.into_iter().flatten().fold(0.0, f64::max);
    (offsets, extent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GridError;
    use crate::layout::Padding;

    #[derive(Debug, Clone, PartialEq)]
    struct Record {
        kind: &'static str,
        year: Option<i32>,
        x: f64,
        y: f64,
    }

    impl Record {
        fn new(kind: &'static str, year: Option<i32>) -> Self {
            Self {
                kind,
                year,
                x: f64::NAN,
                y: f64::NAN,
            }
        }
    }

    impl GridItem for Record {
        fn set_position(&mut self, x: f64, y: f64) {
            self.x = x;
            self.y = y;
        }
    }

    fn records() -> Vec<Record> {
        vec![
            Record::new("cat", Some(2020)),
            Record::new("dog", Some(2021)),
            Record::new("cat", Some(2021)),
            Record::new("cat", Some(2020)),
            Record::new("bird", None),
            Record::new("dog", Some(2020)),
            Record::new("cat", Some(2020)),
        ]
    }

    fn faceted(items: &mut [Record]) -> Grid<'_, Record> {
        Grid::new(items)
            .with_horizontal_facet(|r: &Record| Key::from(r.kind))
            .with_vertical_facet(|r: &Record| Key::from(r.year))
    }

    #[test]
    fn single_bucket_of_three() {
        let mut items = vec![Record::new("a", None); 3];
        let mut grid = Grid::new(&mut items);
        grid.arrange().unwrap();

        assert_eq!(grid.width(), 2.0);
        assert_eq!(grid.height(), 2.0);
        assert_eq!(grid.cells().len(), 1);
        assert_eq!(grid.vertical_keys(), &[Key::Undefined]);
        assert_eq!(grid.horizontal_keys(), &[Key::Undefined]);

        let positions: Vec<(f64, f64)> = grid.items().iter().map(|r| (r.x, r.y)).collect();
        assert_eq!(positions, vec![(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
    }

    #[test]
    fn facets_bucket_every_item_once() {
        let mut items = records();
        let mut grid = faceted(&mut items);
        grid.arrange().unwrap();

        let total: usize = grid.cells().iter().map(Cell::len).sum();
        assert_eq!(total, grid.items().len());

        for (index, item) in grid.items().iter().enumerate() {
            let cell = grid
                .get_cell(&Key::from(item.year), &Key::from(item.kind))
                .expect("cell for item keys");
            assert!(cell.items.contains(&index));
            assert!(std::ptr::eq(cell, grid.cell_for_item(index).unwrap()));
        }

        // cat/2020 keeps source order.
        let cat_2020 = grid.get_cell(&Key::from(2020), &Key::from("cat")).unwrap();
        assert_eq!(cat_2020.items, vec![0, 3, 6]);
        assert_eq!(grid.longest_cell_length(), 3);
    }

    #[test]
    fn keys_sorted_per_axis() {
        let mut items = records();
        let mut grid = faceted(&mut items);
        grid.facet_items_into_cells();

        assert_eq!(
            grid.horizontal_keys(),
            &[Key::from("bird"), Key::from("cat"), Key::from("dog")]
        );
        // Vertical: null first, then numbers descending.
        assert_eq!(
            grid.vertical_keys(),
            &[Key::Null, Key::from(2021), Key::from(2020)]
        );
    }

    #[test]
    fn siblings_are_symmetric_and_rank_based() {
        let mut items = records();
        let mut grid = faceted(&mut items);
        grid.arrange().unwrap();

        for (i, cell) in grid.cells().iter().enumerate() {
            let id = CellId(i as u32);
            if let Some(above) = cell.siblings.above {
                assert_eq!(grid.cell(above).siblings.below, Some(id));
                assert_eq!(grid.cell(above).y, cell.y + 1);
            }
            if let Some(right) = cell.siblings.right {
                assert_eq!(grid.cell(right).siblings.left, Some(id));
                assert_eq!(grid.cell(right).x, cell.x + 1);
            }
        }

        let cat_2021 = grid.cell_id(&Key::from(2021), &Key::from("cat")).unwrap();
        let cat_2020 = grid.cell_id(&Key::from(2020), &Key::from("cat")).unwrap();
        let dog_2021 = grid.cell_id(&Key::from(2021), &Key::from("dog")).unwrap();
        assert_eq!(grid.cell(cat_2021).siblings.above, Some(cat_2020));
        assert_eq!(grid.cell(cat_2021).siblings.right, Some(dog_2021));
        // bird/null is at rank (0, 0); nothing exists at (0, 1) or (1, 0).
        let bird = grid.get_cell(&Key::Null, &Key::from("bird")).unwrap();
        assert_eq!(bird.siblings, Siblings::default());
    }

    #[test]
    fn items_and_cells_stay_in_bounds() {
        let mut items = records();
        let mut grid = faceted(&mut items).with_config(GridConfig {
            cell_margin: 0.5,
            cell_padding: Padding {
                top: 0.25,
                right: 0.1,
                bottom: 0.3,
                left: 0.2,
            },
            item_aspect_ratio: 1.5,
            horizontal_alignment: GridAlignment::Tight,
            ..GridConfig::default()
        });
        grid.arrange().unwrap();

        let eps = 1e-9;
        for cell in grid.cells() {
            assert!(cell.left >= 0.0 && cell.top >= 0.0);
            assert!(cell.left + cell.width <= grid.width() + eps);
            assert!(cell.top + cell.height <= grid.height() + eps);

            let content_left = cell.left + cell.content_x;
            let content_top = cell.top + cell.content_y;
            for &index in &cell.items {
                let item = &grid.items()[index];
                assert!(item.x >= content_left - eps);
                assert!(item.y >= content_top - eps);
                assert!(item.x + 1.5 <= content_left + cell.inner_width + eps);
                assert!(item.y + 1.0 <= content_top + cell.inner_height + eps);
            }
        }
    }

    #[test]
    fn margins_and_padding_accumulate() {
        let mut items = vec![
            Record::new("a", None),
            Record::new("b", None),
            Record::new("b", None),
        ];
        let mut grid = Grid::new(&mut items)
            .with_horizontal_facet(|r: &Record| Key::from(r.kind))
            .with_config(GridConfig {
                cell_margin: 1.0,
                cell_padding: Padding::uniform(0.5),
                ..GridConfig::default()
            });
        grid.arrange().unwrap();

        // "a": 1x1 block -> 2x2 cell. "b": 2 items -> round(sqrt 2) = 1 column, 2 rows.
        let a = grid.get_cell(&Key::Undefined, &Key::from("a")).unwrap();
        let b = grid.get_cell(&Key::Undefined, &Key::from("b")).unwrap();
        assert_eq!(b.packing, Packing { columns: 1, rows: 2 });
        assert_eq!((a.left, a.width), (0.0, 2.0));
        assert_eq!((b.left, b.width), (3.0, 2.0));
        // Uniform rows: "a" stretches to the row's 3-unit height.
        assert_eq!(a.height, 3.0);
        assert_eq!(a.inner_height, 2.0);
        assert_eq!(grid.width(), 5.0);
        assert_eq!(grid.height(), 3.0);

        assert_eq!((grid.items()[0].x, grid.items()[0].y), (0.5, 0.5));
        assert_eq!((grid.items()[1].x, grid.items()[1].y), (3.5, 0.5));
        assert_eq!((grid.items()[2].x, grid.items()[2].y), (3.5, 1.5));
    }

    #[test]
    fn tight_alignment_keeps_own_footprint() {
        let mut items = vec![
            Record::new("a", None),
            Record::new("b", None),
            Record::new("b", None),
        ];
        let mut grid = Grid::new(&mut items)
            .with_horizontal_facet(|r: &Record| Key::from(r.kind))
            .with_config(GridConfig {
                vertical_alignment: GridAlignment::Tight,
                ..GridConfig::default()
            });
        grid.arrange().unwrap();

        let a = grid.get_cell(&Key::Undefined, &Key::from("a")).unwrap();
        let b = grid.get_cell(&Key::Undefined, &Key::from("b")).unwrap();
        assert_eq!(a.height, 1.0);
        assert_eq!(b.height, 2.0);
        assert_eq!(grid.height(), 2.0);
    }

    /// 2x2 cells holding 1, 9, 9 and 1 items along the diagonals.
    fn diagonal_records() -> Vec<Record> {
        let mut items = vec![Record::new("a", Some(2021)), Record::new("b", Some(2020))];
        items.extend(std::iter::repeat(Record::new("b", Some(2021))).take(9));
        items.extend(std::iter::repeat(Record::new("a", Some(2020))).take(9));
        items
    }

    fn diagonal_layout(
        items: &mut [Record],
        horizontal: GridAlignment,
        vertical: GridAlignment,
    ) -> (f64, f64, f64, f64) {
        let mut grid = faceted(items).with_config(GridConfig {
            horizontal_alignment: horizontal,
            vertical_alignment: vertical,
            ..GridConfig::default()
        });
        grid.arrange().unwrap();
        // Rank (1, 0): the 9-item cell beside the single item.
        let wide = grid.get_cell(&Key::from(2021), &Key::from("b")).unwrap();
        // Rank (0, 1): the 9-item cell below the single item.
        let tall = grid.get_cell(&Key::from(2020), &Key::from("a")).unwrap();
        assert_eq!((wide.x, wide.y, tall.x, tall.y), (1, 0, 0, 1));
        (grid.width(), grid.height(), wide.left, tall.top)
    }

    #[test]
    fn tight_rows_shrink_bounding_box() {
        use GridAlignment::{Tight, Uniform};

        let mut items = diagonal_records();
        assert_eq!(diagonal_layout(&mut items, Uniform, Uniform), (6.0, 6.0, 3.0, 3.0));
        // Each row flows from its own cells: 1 + 3 units wide.
        assert_eq!(diagonal_layout(&mut items, Tight, Uniform), (4.0, 6.0, 1.0, 3.0));
        assert_eq!(diagonal_layout(&mut items, Uniform, Tight), (6.0, 4.0, 3.0, 1.0));
        // Rows win when both axes are tight.
        assert_eq!(diagonal_layout(&mut items, Tight, Tight), (4.0, 6.0, 1.0, 3.0));
    }

    #[test]
    fn tight_cells_never_overlap() {
        let mut items = diagonal_records();
        let mut grid = faceted(&mut items).with_config(GridConfig {
            cell_margin: 0.5,
            horizontal_alignment: GridAlignment::Tight,
            vertical_alignment: GridAlignment::Tight,
            ..GridConfig::default()
        });
        grid.arrange().unwrap();

        let cells = grid.cells();
        for (i, a) in cells.iter().enumerate() {
            for b in &cells[i + 1..] {
                let apart = a.left + a.width <= b.left
                    || b.left + b.width <= a.left
                    || a.top + a.height <= b.top
                    || b.top + b.height <= a.top;
                assert!(apart, "{a:?} overlaps {b:?}");
            }
        }
        assert_eq!(grid.width(), 4.5);
    }

    #[test]
    fn refaceting_clears_previous_buckets() {
        let mut items = records();
        let mut grid = faceted(&mut items);
        grid.facet_items_into_cells();
        assert_eq!(grid.cells().len(), 5);

        grid.set_vertical_facet(no_facet);
        assert!(!grid.is_faceted());
        grid.arrange().unwrap();
        assert_eq!(grid.cells().len(), 3);
        assert_eq!(grid.vertical_keys(), &[Key::Undefined]);
        let total: usize = grid.cells().iter().map(Cell::len).sum();
        assert_eq!(total, 7);
    }

    #[test]
    fn custom_comparator_reorders_axis() {
        let mut items = records();
        let mut grid = faceted(&mut items).with_vertical_key_compare(crate::facet::number_compare);
        grid.facet_items_into_cells();
        assert_eq!(
            grid.vertical_keys(),
            &[Key::Null, Key::from(2020), Key::from(2021)]
        );
    }

    #[test]
    fn empty_grid_has_zero_extent() {
        let mut items: Vec<Record> = Vec::new();
        let mut grid = Grid::new(&mut items);
        grid.arrange().unwrap();
        assert_eq!(grid.width(), 0.0);
        assert_eq!(grid.height(), 0.0);
        assert!(grid.cells().is_empty());
        assert_eq!(grid.longest_cell_length(), 0);
    }

    #[test]
    fn invalid_config_leaves_items_untouched() {
        let mut items = records();
        let mut grid = faceted(&mut items).with_config(GridConfig {
            item_aspect_ratio: -1.0,
            ..GridConfig::default()
        });
        let err = grid.arrange().unwrap_err();
        assert!(matches!(
            err,
            GridError::InvalidConfig {
                field: "item_aspect_ratio",
                ..
            }
        ));
        assert!(!grid.is_faceted());
        assert!(grid.items().iter().all(|r| r.x.is_nan() && r.y.is_nan()));
    }

    #[test]
    fn parallel_packing_matches_sequential() {
        let mut items: Vec<Record> = (0..2000)
            .map(|i| Record::new("k", Some(i % 700)))
            .collect();
        let mut grid = Grid::new(&mut items).with_horizontal_facet(|r: &Record| Key::from(r.year));
        grid.facet_items_into_cells();
        assert!(grid.cells().len() >= PARALLEL_CELL_THRESHOLD);

        let config = grid.config.pack_config(1.0);
        let sequential: Vec<Packing> = grid.cells().iter().map(|c| pack(c.len(), &config)).collect();
        assert_eq!(grid.packings(1.0), sequential);
    }
}
