// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resolved grid geometry and the index ↔ rect mappings derived from it.
//!
//! A grid is a row-major strip of cells. Rows are the *tracks* along the scroll
//! axis; every row has the same height and holds `cells_per_row` cells, except
//! possibly the last one.

use core::num::NonZeroUsize;

use kurbo::{Point, Rect, Size};

use crate::util::{clamp_to_usize, floor_to_isize};

/// Geometry parameters for a vertically scrolling grid.
///
/// All values are in logical pixels and are expected to be finite. Negative
/// sizes are clamped to zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridMetrics {
    cell_size: Size,
    cells_per_row: NonZeroUsize,
    padding: Size,
    row_height: Option<f64>,
    cell_row_offset: f64,
    header_height: f64,
    overscan_rows: usize,
}

impl GridMetrics {
    /// Creates metrics for cells of `cell_size`, `cells_per_row` to a row.
    ///
    /// Padding, header height and the in-row cell offset default to zero, the
    /// row height defaults to `cell_size.height + padding.height`, and one row of
    /// overscan is kept above and below the viewport.
    #[must_use]
    pub fn new(cell_size: Size, cells_per_row: NonZeroUsize) -> Self {
        Self {
            cell_size: clamp_size(cell_size),
            cells_per_row,
            padding: Size::ZERO,
            row_height: None,
            cell_row_offset: 0.0,
            header_height: 0.0,
            overscan_rows: 1,
        }
    }

    /// Sets the inset between the grid edges and the outermost cells.
    ///
    /// The vertical component also separates consecutive rows when no explicit
    /// row height is set.
    #[must_use]
    pub fn with_padding(mut self, padding: Size) -> Self {
        self.padding = clamp_size(padding);
        self
    }

    /// Sets an explicit row height (for example, the height of per-row decorations).
    #[must_use]
    pub fn with_row_height(mut self, row_height: f64) -> Self {
        self.row_height = Some(row_height.max(0.0));
        self
    }

    /// Sets the vertical offset of cells inside their row.
    #[must_use]
    pub fn with_cell_row_offset(mut self, offset: f64) -> Self {
        self.cell_row_offset = offset;
        self
    }

    /// Sets the height reserved above the first row.
    #[must_use]
    pub fn with_header_height(mut self, header_height: f64) -> Self {
        self.header_height = header_height.max(0.0);
        self
    }

    /// Sets how many rows beyond each viewport edge count as visible.
    #[must_use]
    pub fn with_overscan_rows(mut self, rows: usize) -> Self {
        self.overscan_rows = rows;
        self
    }

    /// Size of every cell.
    #[must_use]
    pub const fn cell_size(&self) -> Size {
        self.cell_size
    }

    /// Number of cells in each full row.
    #[must_use]
    pub const fn cells_per_row(&self) -> usize {
        self.cells_per_row.get()
    }

    /// Inset between the grid edges and the outermost cells.
    #[must_use]
    pub const fn padding(&self) -> Size {
        self.padding
    }

    /// Height of each row, explicit or derived from the cell height and padding.
    #[must_use]
    pub fn row_height(&self) -> f64 {
        self.row_height
            .unwrap_or(self.cell_size.height + self.padding.height)
    }

    /// Vertical offset of cells inside their row.
    #[must_use]
    pub const fn cell_row_offset(&self) -> f64 {
        self.cell_row_offset
    }

    /// Height reserved above the first row.
    #[must_use]
    pub const fn header_height(&self) -> f64 {
        self.header_height
    }

    /// Rows of slack kept on each side of the viewport.
    #[must_use]
    pub const fn overscan_rows(&self) -> usize {
        self.overscan_rows
    }

    /// Returns the row containing `index`.
    #[must_use]
    pub const fn row_of(&self, index: usize) -> usize {
        index / self.cells_per_row.get()
    }

    /// Returns the zero-based column of `index` within its row.
    #[must_use]
    pub const fn column_of(&self, index: usize) -> usize {
        index % self.cells_per_row.get()
    }

    /// Returns the number of rows needed for `cell_count` cells.
    #[must_use]
    pub const fn row_count(&self, cell_count: usize) -> usize {
        cell_count.div_ceil(self.cells_per_row.get())
    }

    /// Horizontal gap between neighbouring cells so that each row spans the
    /// padded viewport width evenly.
    #[must_use]
    pub fn width_between_cells(&self, viewport_width: f64) -> f64 {
        let n = self.cells_per_row.get();
        if n < 2 {
            return 0.0;
        }
        let free = self.inner_width(viewport_width) - self.cell_size.width * n as f64;
        (free / (n - 1) as f64).max(0.0)
    }

    /// Top edge of `row` in content coordinates.
    #[must_use]
    pub fn row_top(&self, row: usize) -> f64 {
        self.header_height + row as f64 * self.row_height()
    }

    /// Rect covered by `row`, spanning the full viewport width.
    #[must_use]
    pub fn row_rect(&self, row: usize, viewport_width: f64) -> Rect {
        let top = self.row_top(row);
        Rect::new(0.0, top, viewport_width.max(0.0), top + self.row_height())
    }

    /// Origin of the cell at `index` in content coordinates.
    #[must_use]
    pub fn origin_of(&self, index: usize, viewport_width: f64) -> Point {
        let row = self.row_of(index);
        let column = self.column_of(index);
        let y = self.row_top(row) + self.padding.height + self.cell_row_offset;
        let x = if self.cells_per_row.get() == 1 {
            let slack = (self.inner_width(viewport_width) - self.cell_size.width).max(0.0);
            self.padding.width + slack / 2.0
        } else {
            let stride = self.cell_size.width + self.width_between_cells(viewport_width);
            self.padding.width + column as f64 * stride
        };
        Point::new(x, y)
    }

    /// Rect of the cell at `index` in content coordinates.
    #[must_use]
    pub fn rect_of(&self, index: usize, viewport_width: f64) -> Rect {
        Rect::from_origin_size(self.origin_of(index, viewport_width), self.cell_size)
    }

    /// Total scrollable height for `cell_count` cells, including the header and
    /// the trailing padding.
    #[must_use]
    pub fn content_height(&self, cell_count: usize) -> f64 {
        let rows = self.row_count(cell_count);
        if rows == 0 {
            return self.header_height;
        }
        self.header_height + rows as f64 * self.row_height() + self.padding.height
    }

    /// Returns the index whose cell rect contains `point`, if any.
    ///
    /// Points in the gaps between cells, in the header, or past the last cell
    /// resolve to `None`.
    #[must_use]
    pub fn index_at(&self, point: Point, cell_count: usize, viewport_width: f64) -> Option<usize> {
        let index = self.slot_at(point, cell_count, viewport_width)?;
        self.rect_of(index, viewport_width)
            .contains(point)
            .then_some(index)
    }

    /// Returns the slot nearest to `point`, clamped to `0..cell_count`.
    ///
    /// Rows are resolved from row bands and columns from the centre lines of the
    /// gaps, so every point in content space maps to exactly one slot. Points
    /// above the first row map into the first row; points below the last cell map
    /// to the last cell.
    #[must_use]
    pub fn slot_at(&self, point: Point, cell_count: usize, viewport_width: f64) -> Option<usize> {
        if cell_count == 0 {
            return None;
        }
        let rows = self.row_count(cell_count);
        let row_height = self.row_height();
        let row = if row_height > 0.0 {
            clamp_to_usize(
                floor_to_isize((point.y - self.header_height) / row_height),
                rows - 1,
            )
        } else {
            0
        };

        let n = self.cells_per_row.get();
        let column = if n == 1 {
            0
        } else {
            let gap = self.width_between_cells(viewport_width);
            let stride = self.cell_size.width + gap;
            if stride > 0.0 {
                clamp_to_usize(
                    floor_to_isize((point.x - self.padding.width + gap / 2.0) / stride),
                    n - 1,
                )
            } else {
                0
            }
        };

        Some((row * n + column).min(cell_count - 1))
    }

    fn inner_width(&self, viewport_width: f64) -> f64 {
        (viewport_width - 2.0 * self.padding.width).max(0.0)
    }
}

fn clamp_size(size: Size) -> Size {
    Size::new(size.width.max(0.0), size.height.max(0.0))
}

#[cfg(test)]
mod tests {
    use core::num::NonZeroUsize;

    use kurbo::{Point, Rect, Size};

    use super::GridMetrics;

    fn four_up() -> GridMetrics {
        GridMetrics::new(Size::new(80.0, 80.0), NonZeroUsize::new(4).unwrap())
    }

    #[test]
    fn row_and_column_mapping() {
        let m = four_up();
        assert_eq!(m.row_of(0), 0);
        assert_eq!(m.row_of(3), 0);
        assert_eq!(m.row_of(4), 1);
        assert_eq!(m.column_of(7), 3);
        assert_eq!(m.row_count(0), 0);
        assert_eq!(m.row_count(9), 3);
    }

    #[test]
    fn cells_distribute_across_padded_width() {
        let m = four_up().with_padding(Size::new(10.0, 10.0));
        // 400 wide, 20 of padding, 320 of cells → 60 left for three gaps.
        assert_eq!(m.width_between_cells(400.0), 20.0);
        assert_eq!(m.row_height(), 90.0);
        assert_eq!(m.origin_of(0, 400.0), Point::new(10.0, 10.0));
        assert_eq!(m.origin_of(3, 400.0), Point::new(310.0, 10.0));
        assert_eq!(m.origin_of(5, 400.0), Point::new(110.0, 100.0));
        assert_eq!(m.content_height(8), 190.0);
    }

    #[test]
    fn header_and_row_offset_shift_cells_down() {
        let m = four_up()
            .with_header_height(44.0)
            .with_row_height(100.0)
            .with_cell_row_offset(6.0);
        assert_eq!(m.origin_of(4, 320.0), Point::new(0.0, 150.0));
        assert_eq!(m.row_rect(1, 320.0), Rect::new(0.0, 144.0, 320.0, 244.0));
    }

    #[test]
    fn single_column_is_centred() {
        let m = GridMetrics::new(Size::new(100.0, 50.0), NonZeroUsize::MIN);
        assert_eq!(m.width_between_cells(300.0), 0.0);
        assert_eq!(m.origin_of(2, 300.0), Point::new(100.0, 100.0));
    }

    #[test]
    fn narrow_viewport_never_yields_negative_gaps() {
        let m = four_up();
        assert_eq!(m.width_between_cells(200.0), 0.0);
    }

    #[test]
    fn index_at_requires_containment() {
        let m = four_up().with_padding(Size::new(10.0, 10.0));
        assert_eq!(m.index_at(Point::new(15.0, 15.0), 8, 400.0), Some(0));
        // In the horizontal gap between cell 0 and cell 1.
        assert_eq!(m.index_at(Point::new(95.0, 15.0), 8, 400.0), None);
        // Past the last cell of a partial row.
        assert_eq!(m.index_at(Point::new(315.0, 105.0), 7, 400.0), None);
    }

    #[test]
    fn slot_at_clamps_to_valid_indices() {
        let m = four_up();
        assert_eq!(m.slot_at(Point::new(10.0, -50.0), 10, 320.0), Some(0));
        assert_eq!(m.slot_at(Point::new(170.0, 90.0), 10, 320.0), Some(6));
        assert_eq!(m.slot_at(Point::new(300.0, 5000.0), 10, 320.0), Some(9));
        assert_eq!(m.slot_at(Point::new(1000.0, 10.0), 10, 320.0), Some(3));
        assert_eq!(m.slot_at(Point::new(0.0, 0.0), 0, 320.0), None);
    }
}
